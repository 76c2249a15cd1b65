use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::runtime::error::Error;
use crate::runtime::handle::TaskHandle;
use crate::runtime::task::Task;

pub trait Scheduler: Send + Sync {
    type Handle<T>: Future<Output = Result<T, Error>> + Send
    where
        T: Send + 'static;

    fn submit<T>(&self, task: T) -> Self::Handle<T::Output>
    where
        T: Task;
}

/// Runs tasks on the current tokio runtime's blocking pool.
#[derive(Debug, Default)]
pub struct LocalScheduler {}

impl LocalScheduler {
    pub fn new() -> Self {
        Self {}
    }
}

impl Scheduler for LocalScheduler {
    type Handle<T>
        = TaskHandle<T>
    where
        T: Send + 'static;

    fn submit<T>(&self, task: T) -> Self::Handle<T::Output>
    where
        T: Task,
    {
        let task_id = Uuid::new_v4();
        let (sender, receiver) = oneshot::channel();

        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                debug!(%task_id, "task submitted");
                // a panicking task drops the sender, which the handle reports as Canceled
                rt.spawn_blocking(move || {
                    let _ = sender.send(Ok(task.call()));
                });
            }
            Err(_) => {
                warn!(%task_id, "task submitted outside a tokio runtime");
                let _ = sender.send(Err(Error::NoRuntime));
            }
        }

        TaskHandle::new(task_id, receiver)
    }
}
