mod config;
mod errors;
mod record;
mod run;
mod sweep;

pub use config::TrainConfig;
pub use errors::{ConfigError, TrainError};
pub use record::{TrainOutcome, TrialRecord};
pub use run::{train, train_with};
pub use sweep::{TrainTask, sweep_contexts};
