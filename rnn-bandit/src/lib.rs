//! Online recurrent actor-critic training on a stationary contextual bandit.
//!
//! A single tanh RNN carries its hidden state from trial to trial. A joint
//! head reads out a softmax policy and a scalar value. After every trial the
//! network takes one Adam step on the one-step TD actor-critic loss.

pub mod env;
pub mod history;
pub mod model;
pub mod optim;
pub mod runtime;
pub mod train;

#[cfg(feature = "python")]
mod python;

pub use env::{Context, ContextualBandit, RewardTable};
pub use model::{Dims, ParameterSet};
pub use train::{TrainConfig, TrainError, TrainOutcome, sweep_contexts, train};
