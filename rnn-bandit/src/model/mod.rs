mod encoder;
mod errors;
mod head;
mod loss;
mod params;
mod sampler;

pub use encoder::encode;
pub use errors::ModelError;
pub use head::{PROB_SUM_TOLERANCE, PolicyValue, evaluate, softmax, validate_distribution};
pub use loss::{LossEval, LossInputs, VALUE_LOSS_COEF, actor_critic_loss, loss_and_grad};
pub use params::{Dims, HiddenState, ParameterSet, READOUT_INIT_SCALE};
pub use sampler::{argmax, one_hot, sample_action};
