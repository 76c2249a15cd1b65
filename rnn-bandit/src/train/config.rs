use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use crate::env::{InputMode, RewardNormalization};
use crate::model::Dims;
use crate::optim::AdamConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub num_trials: usize,
    pub hidden_width: usize,
    pub discount_factor: f64,

    /// Seed for `ParameterSet::initialize`.
    pub param_seed: u64,
    /// Seed for the initial hidden state.
    pub hidden_seed: u64,
    /// Seed for the shared action/reward random source.
    pub sampling_seed: u64,
    pub hidden_init_scale: f64,

    pub input_mode: InputMode,
    pub reward_normalization: RewardNormalization,
    pub optimizer: AdamConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_trials: 1000,
            hidden_width: 64,
            discount_factor: 0.95,
            param_seed: 0,
            hidden_seed: 0,
            sampling_seed: 0,
            hidden_init_scale: 0.1,
            input_mode: InputMode::Zero,
            reward_normalization: RewardNormalization::Softmax,
            optimizer: AdamConfig::default(),
        }
    }
}

impl TrainConfig {
    /// Parse a config, filling unspecified fields from `Default`.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hidden_width == 0 {
            return Err(ConfigError::ZeroHiddenWidth);
        }
        if !self.discount_factor.is_finite() || self.discount_factor < 0.0 {
            return Err(ConfigError::InvalidDiscount(self.discount_factor));
        }
        let lr = self.optimizer.learning_rate;
        if !lr.is_finite() || lr <= 0.0 {
            return Err(ConfigError::InvalidLearningRate(lr));
        }
        let AdamConfig { beta1, beta2, .. } = self.optimizer;
        for (name, value) in [("beta1", beta1), ("beta2", beta2)] {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::InvalidMomentDecay { name, value });
            }
        }
        let eps = self.optimizer.eps;
        if !eps.is_finite() || eps <= 0.0 {
            return Err(ConfigError::InvalidEpsilon(eps));
        }
        let scale = self.hidden_init_scale;
        if !scale.is_finite() || scale < 0.0 {
            return Err(ConfigError::InvalidHiddenScale(scale));
        }
        Ok(())
    }

    pub fn dims(&self, context_dim: usize, num_actions: usize) -> Dims {
        Dims::new(context_dim, self.hidden_width, num_actions)
    }
}
