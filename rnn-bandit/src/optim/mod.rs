mod adam;
mod sgd;
mod traits;

pub use adam::{Adam, AdamConfig, AdamState};
pub use sgd::Sgd;
pub use traits::Optimizer;
