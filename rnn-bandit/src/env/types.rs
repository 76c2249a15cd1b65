use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step<O> {
    pub obs: O,
    pub rew: f64,
    /// Index of the arm that was pulled.
    pub arm: usize,
}

/// How the success/failure pair `[1 - p, p]` is turned into sampling weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardNormalization {
    /// Max-subtracted softmax over `[1 - p, p]`.
    #[default]
    Softmax,
    /// Use `[1 - p, p]` as-is, i.e. an exact Bernoulli(p).
    Linear,
}

/// What the recurrent encoder observes each trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// An all-zero vector of context dimension. The context only selects the
    /// reward table.
    #[default]
    Zero,
    /// The context vector itself.
    Context,
}
