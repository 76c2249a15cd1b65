use thiserror::Error;

use crate::env::EnvError;
use crate::model::ModelError;
use crate::runtime;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("hidden width must be positive")]
    ZeroHiddenWidth,

    #[error("discount factor must be finite and non-negative, got {0}")]
    InvalidDiscount(f64),

    #[error("learning rate must be finite and positive, got {0}")]
    InvalidLearningRate(f64),

    #[error("{name} must lie in [0, 1), got {value}")]
    InvalidMomentDecay { name: &'static str, value: f64 },

    #[error("adam epsilon must be finite and positive, got {0}")]
    InvalidEpsilon(f64),

    #[error("hidden init scale must be finite and non-negative, got {0}")]
    InvalidHiddenScale(f64),

    #[error("context has dimension {got}, parameters expect {expected}")]
    ContextDim { expected: usize, got: usize },

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum TrainError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("environment error: {0}")]
    Env(#[from] EnvError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("numerical divergence at trial {trial}: {quantity}")]
    Divergence { trial: usize, quantity: String },

    #[error("runtime error: {0}")]
    Runtime(#[from] runtime::Error),
}
