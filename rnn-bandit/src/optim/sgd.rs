use super::Optimizer;
use crate::model::ParameterSet;

/// Plain gradient descent, stateless.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Optimizer for Sgd {
    type State = ();

    fn init(&self, _params: &ParameterSet) -> Self::State {}

    fn update(
        &self,
        grads: &ParameterSet,
        _state: (),
        _params: &ParameterSet,
    ) -> (ParameterSet, ()) {
        (grads.map(|g| g.mapv(|g| -self.learning_rate * g)), ())
    }
}
