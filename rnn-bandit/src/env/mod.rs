mod bandit;
mod errors;
mod traits;
mod types;

pub use bandit::{BanditEnv, Context, ContextualBandit, RewardTable, simulate_reward};
pub use errors::EnvError;
pub use traits::Env;
pub use types::{InputMode, RewardNormalization, Step};
