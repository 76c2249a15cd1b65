use ndarray::{Array1, Array2, ArrayView1, array};
use rand::Rng;
use rand::distributions::{Bernoulli, Distribution};
use serde::{Deserialize, Serialize};

use super::{Env, EnvError, InputMode, RewardNormalization, Step};
use crate::model::{argmax, softmax};

/// Per-arm success probabilities under one context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTable(Array1<f64>);

impl RewardTable {
    pub fn new(probs: Vec<f64>) -> Result<Self, EnvError> {
        Self::from_array(Array1::from(probs))
    }

    pub fn from_array(probs: Array1<f64>) -> Result<Self, EnvError> {
        if probs.is_empty() {
            return Err(EnvError::EmptyRewardTable);
        }
        if let Some((index, &value)) = probs
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || !(0.0..=1.0).contains(*p))
        {
            return Err(EnvError::InvalidProbability { index, value });
        }
        Ok(Self(probs))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_array(&self) -> &Array1<f64> {
        &self.0
    }

    /// Index of the arm with the highest success probability.
    pub fn best_arm(&self) -> usize {
        argmax(self.0.view())
    }
}

/// The context a run is bound to: its index and its one-hot vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub index: usize,
    pub vector: Array1<f64>,
}

impl Context {
    pub fn one_hot(index: usize, num_contexts: usize) -> Result<Self, EnvError> {
        if index >= num_contexts {
            return Err(EnvError::UnknownContext {
                index,
                available: num_contexts,
            });
        }
        let mut vector = Array1::zeros(num_contexts);
        vector[index] = 1.0;
        Ok(Self { index, vector })
    }

    pub fn dim(&self) -> usize {
        self.vector.len()
    }
}

/// A stationary contextual bandit: one reward table row per context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualBandit {
    probs: Array2<f64>,
}

impl ContextualBandit {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, EnvError> {
        let arms = rows.first().map(Vec::len).ok_or(EnvError::EmptyRewardTable)?;
        let mut flat = Vec::with_capacity(rows.len() * arms);
        for row in &rows {
            if row.len() != arms {
                return Err(EnvError::RaggedTable {
                    expected: arms,
                    got: row.len(),
                });
            }
            RewardTable::new(row.clone())?;
            flat.extend_from_slice(row);
        }
        let probs = Array2::from_shape_vec((rows.len(), arms), flat)
            .map_err(|_| EnvError::EmptyRewardTable)?;
        Ok(Self { probs })
    }

    pub fn num_contexts(&self) -> usize {
        self.probs.nrows()
    }

    pub fn num_arms(&self) -> usize {
        self.probs.ncols()
    }

    pub fn context(&self, index: usize) -> Result<Context, EnvError> {
        Context::one_hot(index, self.num_contexts())
    }

    pub fn contexts(&self) -> impl Iterator<Item = Context> + '_ {
        (0..self.num_contexts()).filter_map(|i| self.context(i).ok())
    }

    pub fn reward_table(&self, context: &Context) -> Result<RewardTable, EnvError> {
        if context.index >= self.num_contexts() {
            return Err(EnvError::UnknownContext {
                index: context.index,
                available: self.num_contexts(),
            });
        }
        RewardTable::from_array(self.probs.row(context.index).to_owned())
    }
}

impl Default for ContextualBandit {
    fn default() -> Self {
        Self {
            probs: array![[0.9, 0.1], [0.2, 0.8], [0.6, 0.4]],
        }
    }
}

/// Draws a 0/1 reward for the arm selected by a one-hot `action`.
pub fn simulate_reward<R: Rng + ?Sized>(
    table: &RewardTable,
    action: ArrayView1<'_, f64>,
    normalization: RewardNormalization,
    rng: &mut R,
) -> Result<f64, EnvError> {
    if action.len() != table.len() {
        return Err(EnvError::ActionShape {
            expected: table.len(),
            got: action.len(),
        });
    }
    let arm = argmax(action);
    let p = table.0[arm];
    let outcome = array![1.0 - p, p];
    let weights = match normalization {
        RewardNormalization::Softmax => softmax(outcome.view()),
        RewardNormalization::Linear => outcome,
    };
    let success = Bernoulli::new(weights[1])
        .map_err(|_| EnvError::InvalidProbability {
            index: arm,
            value: weights[1],
        })?
        .sample(rng);
    Ok(if success { 1.0 } else { 0.0 })
}

/// A bandit bound to a single context for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct BanditEnv {
    context: Context,
    table: RewardTable,
    normalization: RewardNormalization,
    input_mode: InputMode,
}

impl BanditEnv {
    pub fn new(
        context: Context,
        table: RewardTable,
        normalization: RewardNormalization,
        input_mode: InputMode,
    ) -> Self {
        Self {
            context,
            table,
            normalization,
            input_mode,
        }
    }

    pub fn bind(
        bandit: &ContextualBandit,
        context: &Context,
        normalization: RewardNormalization,
        input_mode: InputMode,
    ) -> Result<Self, EnvError> {
        let table = bandit.reward_table(context)?;
        Ok(Self::new(context.clone(), table, normalization, input_mode))
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn table(&self) -> &RewardTable {
        &self.table
    }

    /// The vector fed to the encoder each trial.
    pub fn input(&self) -> Array1<f64> {
        match self.input_mode {
            InputMode::Zero => Array1::zeros(self.context.dim()),
            InputMode::Context => self.context.vector.clone(),
        }
    }
}

impl Env for BanditEnv {
    type Obs = Array1<f64>;
    type Act = Array1<f64>;

    fn reset(&mut self) -> Result<Self::Obs, EnvError> {
        Ok(self.input())
    }

    fn step<R: Rng + ?Sized>(
        &mut self,
        act: &Self::Act,
        rng: &mut R,
    ) -> Result<Step<Self::Obs>, EnvError> {
        let rew = simulate_reward(&self.table, act.view(), self.normalization, rng)?;
        Ok(Step {
            obs: self.input(),
            rew,
            arm: argmax(act.view()),
        })
    }

    fn num_actions(&self) -> usize {
        self.table.len()
    }
}
