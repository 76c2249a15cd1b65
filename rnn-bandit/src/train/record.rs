use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::history::moving_average;
use crate::model::{ParameterSet, argmax};

/// Everything observed and computed during one trial. Never mutated after
/// it is appended to the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial: usize,
    pub policy: Array1<f64>,
    /// One-hot encoding of the sampled action.
    pub action: Array1<f64>,
    pub reward: f64,
    pub value: f64,
    pub next_value: f64,
    pub td_error: f64,
    pub loss: f64,
}

impl TrialRecord {
    pub fn arm(&self) -> usize {
        argmax(self.action.view())
    }
}

/// Result of a full training run, handed to reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainOutcome {
    pub context_index: usize,
    /// Frozen copy of the parameters the run started from.
    pub initial_params: ParameterSet,
    pub final_params: ParameterSet,
    pub trials: Vec<TrialRecord>,
}

impl TrainOutcome {
    pub fn loss_history(&self) -> Vec<f64> {
        self.trials.iter().map(|t| t.loss).collect()
    }

    pub fn reward_history(&self) -> Vec<f64> {
        self.trials.iter().map(|t| t.reward).collect()
    }

    pub fn action_history(&self) -> Vec<usize> {
        self.trials.iter().map(TrialRecord::arm).collect()
    }

    /// How many times each arm was pulled.
    pub fn action_counts(&self) -> Vec<usize> {
        let arms = self.final_params.wha.ncols();
        let mut counts = vec![0; arms];
        for arm in self.action_history() {
            counts[arm] += 1;
        }
        counts
    }

    pub fn mean_reward(&self) -> Option<f64> {
        if self.trials.is_empty() {
            return None;
        }
        Some(self.trials.iter().map(|t| t.reward).sum::<f64>() / self.trials.len() as f64)
    }

    /// Edge-padded moving average of the reward history.
    pub fn smoothed_rewards(&self, window: usize) -> Vec<f64> {
        moving_average(&self.reward_history(), window)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
