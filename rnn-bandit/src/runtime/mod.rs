pub mod error;
pub mod global;
pub mod handle;
pub mod scheduler;
pub mod task;

pub use error::Error;
pub use global::{global, submit};
pub use handle::TaskHandle;
pub use scheduler::{LocalScheduler, Scheduler};
pub use task::{FnTask, Task};
