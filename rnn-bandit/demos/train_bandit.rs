//! Reference run: context 0 of the default three-context bandit.
//!
//! Usage: `cargo run --example train_bandit [config.json] [report.json]`

use rnn_bandit::{ContextualBandit, ParameterSet, TrainConfig, train};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut args = std::env::args().skip(1);
    let cfg = match args.next() {
        Some(path) => TrainConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => TrainConfig::default(),
    };

    let bandit = ContextualBandit::default();
    let context = bandit.context(0)?;
    let table = bandit.reward_table(&context)?;
    let params = ParameterSet::initialize(cfg.param_seed, cfg.dims(context.dim(), table.len()));

    let outcome = train(&params, &context, &table, &cfg)?;

    let window = (cfg.num_trials / 10).max(1);
    let smoothed = outcome.smoothed_rewards(window);
    for (trial, reward) in smoothed.iter().enumerate().step_by(window) {
        info!(trial, smoothed_reward = *reward, "reward");
    }
    info!(
        mean_reward = outcome.mean_reward().unwrap_or_default(),
        counts = ?outcome.action_counts(),
        "done"
    );

    if let Some(path) = args.next() {
        std::fs::write(&path, outcome.to_json()?)?;
        info!(%path, "report written");
    }
    Ok(())
}
