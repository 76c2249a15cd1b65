use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::env::ContextualBandit;
use crate::history;
use crate::model::ParameterSet;
use crate::train::{TrainConfig, TrainOutcome};

fn run(
    reward_probs: Option<Vec<Vec<f64>>>,
    context: usize,
    cfg: TrainConfig,
) -> PyResult<TrainOutcome> {
    let bandit = match reward_probs {
        Some(rows) => {
            ContextualBandit::new(rows).map_err(|e| PyValueError::new_err(e.to_string()))?
        }
        None => ContextualBandit::default(),
    };
    let context = bandit
        .context(context)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let table = bandit
        .reward_table(&context)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let params = ParameterSet::initialize(cfg.param_seed, cfg.dims(context.dim(), table.len()));
    crate::train::train(&params, &context, &table, &cfg)
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

/// Train on one context and return `(loss_history, reward_history)`.
#[pyfunction]
#[pyo3(signature = (
    context=0,
    num_trials=1000,
    hidden_width=64,
    discount_factor=0.95,
    seed=0,
    reward_probs=None
))]
fn train(
    py: Python<'_>,
    context: usize,
    num_trials: usize,
    hidden_width: usize,
    discount_factor: f64,
    seed: u64,
    reward_probs: Option<Vec<Vec<f64>>>,
) -> PyResult<(Vec<f64>, Vec<f64>)> {
    let cfg = TrainConfig {
        num_trials,
        hidden_width,
        discount_factor,
        param_seed: seed,
        hidden_seed: seed,
        sampling_seed: seed,
        ..TrainConfig::default()
    };
    let outcome = py.allow_threads(|| run(reward_probs, context, cfg))?;
    Ok((outcome.loss_history(), outcome.reward_history()))
}

/// Train from a JSON config and return the full report as JSON.
#[pyfunction]
#[pyo3(signature = (config_json, context=0, reward_probs=None))]
fn train_report(
    py: Python<'_>,
    config_json: &str,
    context: usize,
    reward_probs: Option<Vec<Vec<f64>>>,
) -> PyResult<String> {
    let cfg = TrainConfig::from_json_str(config_json)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let outcome = py.allow_threads(|| run(reward_probs, context, cfg))?;
    outcome
        .to_json()
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

#[pyfunction]
fn moving_average(signal: Vec<f64>, window: usize) -> Vec<f64> {
    history::moving_average(&signal, window)
}

/// The name of this function must match the lib.name in Cargo.toml
#[pymodule]
fn rnn_bandit(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(train, m)?)?;
    m.add_function(wrap_pyfunction!(train_report, m)?)?;
    m.add_function(wrap_pyfunction!(moving_average, m)?)?;
    Ok(())
}
