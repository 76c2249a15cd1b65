use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("reward table is empty")]
    EmptyRewardTable,

    #[error("reward probability {value} at arm {index} is not in [0, 1]")]
    InvalidProbability { index: usize, value: f64 },

    #[error("unknown context {index} (bandit has {available} contexts)")]
    UnknownContext { index: usize, available: usize },

    #[error("action has {got} components, expected {expected}")]
    ActionShape { expected: usize, got: usize },

    #[error("reward table rows have inconsistent arm counts: {expected} vs {got}")]
    RaggedTable { expected: usize, got: usize },
}
