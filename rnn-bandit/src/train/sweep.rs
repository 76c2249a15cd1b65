use futures::future::join_all;
use tracing::info;

use super::config::TrainConfig;
use super::errors::TrainError;
use super::record::TrainOutcome;
use super::run::train;
use crate::env::{Context, ContextualBandit, RewardTable};
use crate::model::ParameterSet;
use crate::runtime::{self, Task};

/// One independent training run, ready to hand to the scheduler.
pub struct TrainTask {
    pub initial_params: ParameterSet,
    pub context: Context,
    pub reward_table: RewardTable,
    pub cfg: TrainConfig,
}

impl Task for TrainTask {
    type Output = Result<TrainOutcome, TrainError>;

    fn call(self) -> Self::Output {
        train(&self.initial_params, &self.context, &self.reward_table, &self.cfg)
    }
}

/// Train one run per context of `bandit` concurrently.
///
/// Runs share nothing: each gets its own copy of the initial parameters and
/// its own random source. Results come back in context order.
pub async fn sweep_contexts(
    bandit: &ContextualBandit,
    cfg: &TrainConfig,
) -> Result<Vec<TrainOutcome>, TrainError> {
    let dims = cfg.dims(bandit.num_contexts(), bandit.num_arms());
    let initial_params = ParameterSet::initialize(cfg.param_seed, dims);

    let handles = bandit
        .contexts()
        .map(|context| -> Result<_, TrainError> {
            let reward_table = bandit.reward_table(&context)?;
            Ok(runtime::submit(TrainTask {
                initial_params: initial_params.clone(),
                context,
                reward_table,
                cfg: cfg.clone(),
            }))
        })
        .collect::<Result<Vec<_>, _>>()?;
    info!(runs = handles.len(), "sweep submitted");

    join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.map_err(TrainError::from).and_then(|run| run))
        .collect()
}
