use crate::runtime::{LocalScheduler, Scheduler, Task, TaskHandle};
use std::sync::OnceLock;

static GLOBAL_SCHEDULER: OnceLock<LocalScheduler> = OnceLock::new();

pub fn global() -> &'static LocalScheduler {
    GLOBAL_SCHEDULER.get_or_init(LocalScheduler::new)
}

/// Submit to the process-wide scheduler.
pub fn submit<T>(task: T) -> TaskHandle<T::Output>
where
    T: Task,
{
    global().submit(task)
}
