use ndarray::Array1;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, info_span};

use super::config::TrainConfig;
use super::errors::{ConfigError, TrainError};
use super::record::{TrainOutcome, TrialRecord};
use crate::env::{BanditEnv, Context, Env, RewardTable};
use crate::model::{
    HiddenState, LossInputs, ParameterSet, encode, evaluate, loss_and_grad, sample_action,
    validate_distribution,
};
use crate::optim::{Adam, Optimizer};

/// Everything threaded from one trial to the next.
struct RunState<S> {
    params: ParameterSet,
    hidden: HiddenState,
    opt_state: S,
    input: Array1<f64>,
    trials: Vec<TrialRecord>,
}

/// The fixed parts of a run.
struct Trainer<O> {
    optimizer: O,
    env: BanditEnv,
    gamma: f64,
    rng: ChaCha8Rng,
}

fn diverged(trial: usize, quantity: impl Into<String>) -> TrainError {
    let quantity = quantity.into();
    error!(trial, %quantity, "training diverged");
    TrainError::Divergence { trial, quantity }
}

impl<O: Optimizer> Trainer<O> {
    fn trial(
        &mut self,
        state: RunState<O::State>,
        trial: usize,
    ) -> Result<RunState<O::State>, TrainError> {
        let RunState {
            params,
            hidden,
            opt_state,
            input,
            mut trials,
        } = state;

        let current = evaluate(&params, hidden.0.view());
        validate_distribution(current.policy.view())
            .map_err(|e| diverged(trial, format!("policy: {e}")))?;
        let action = sample_action(current.policy.view(), &mut self.rng)?;
        let step = self.env.step(&action, &mut self.rng)?;

        let next_hidden = encode(&params, input.view(), hidden.0.view());
        let next_value = evaluate(&params, next_hidden.view()).value;

        let eval = loss_and_grad(
            &params,
            &LossInputs {
                input: input.view(),
                prev_hidden: hidden.0.view(),
                action: action.view(),
                reward: step.rew,
                next_value,
            },
            self.gamma,
        );
        if !eval.loss.is_finite() {
            return Err(diverged(trial, format!("loss is {}", eval.loss)));
        }
        if let Some(name) = eval.grads.first_non_finite() {
            return Err(diverged(trial, format!("gradient of {name}")));
        }

        let (delta, opt_state) = self.optimizer.update(&eval.grads, opt_state, &params);
        let next_params = self.optimizer.apply(&params, &delta);
        if let Some(name) = next_params.first_non_finite() {
            return Err(diverged(trial, format!("updated {name}")));
        }

        debug!(
            trial,
            policy = ?current.policy.as_slice(),
            arm = step.arm,
            reward = step.rew,
            loss = eval.loss,
            td_error = eval.td_error,
            grad_whh_00 = eval.grads.whh.get((0, 0)).copied().unwrap_or_default(),
            "trial complete"
        );

        trials.push(TrialRecord {
            trial,
            policy: current.policy,
            action,
            reward: step.rew,
            value: eval.value,
            next_value,
            td_error: eval.td_error,
            loss: eval.loss,
        });

        Ok(RunState {
            params: next_params,
            hidden: HiddenState(next_hidden),
            opt_state,
            input: step.obs,
            trials,
        })
    }
}

/// Train with Adam configured from `cfg.optimizer`.
pub fn train(
    initial_params: &ParameterSet,
    context: &Context,
    reward_table: &RewardTable,
    cfg: &TrainConfig,
) -> Result<TrainOutcome, TrainError> {
    train_with(
        Adam::new(cfg.optimizer),
        initial_params,
        context,
        reward_table,
        cfg,
    )
}

/// Run `cfg.num_trials` sequential trials, threading parameters, hidden state
/// and optimizer state from each trial into the next.
///
/// `context` only fixes the encoder input width (and, with
/// [`InputMode::Context`](crate::env::InputMode::Context), its content); the
/// reward probabilities come from `reward_table`.
pub fn train_with<O: Optimizer>(
    optimizer: O,
    initial_params: &ParameterSet,
    context: &Context,
    reward_table: &RewardTable,
    cfg: &TrainConfig,
) -> Result<TrainOutcome, TrainError> {
    let span = info_span!("train", context = context.index);
    let _enter = span.enter();

    cfg.validate()?;
    let dims = initial_params.dims();
    if context.dim() != dims.context {
        return Err(ConfigError::ContextDim {
            expected: dims.context,
            got: context.dim(),
        }
        .into());
    }
    initial_params.validate(cfg.dims(context.dim(), reward_table.len()))?;

    let mut env = BanditEnv::new(
        context.clone(),
        reward_table.clone(),
        cfg.reward_normalization,
        cfg.input_mode,
    );
    let init = RunState {
        params: initial_params.clone(),
        hidden: HiddenState::initial(cfg.hidden_seed, cfg.hidden_width, cfg.hidden_init_scale),
        opt_state: optimizer.init(initial_params),
        input: env.reset()?,
        trials: Vec::with_capacity(cfg.num_trials),
    };
    let mut trainer = Trainer {
        optimizer,
        env,
        gamma: cfg.discount_factor,
        rng: ChaCha8Rng::seed_from_u64(cfg.sampling_seed),
    };

    info!(
        trials = cfg.num_trials,
        hidden = cfg.hidden_width,
        arms = reward_table.len(),
        "starting run"
    );
    let done = (0..cfg.num_trials).try_fold(init, |state, t| trainer.trial(state, t))?;

    let outcome = TrainOutcome {
        context_index: context.index,
        initial_params: initial_params.clone(),
        final_params: done.params,
        trials: done.trials,
    };
    info!(
        mean_reward = outcome.mean_reward().unwrap_or_default(),
        counts = ?outcome.action_counts(),
        "run finished"
    );
    Ok(outcome)
}
