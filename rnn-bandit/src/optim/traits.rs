use crate::model::ParameterSet;

/// A gradient-based optimizer in functional form.
///
/// `update` never touches `params`; it returns a step that `apply` adds on.
pub trait Optimizer {
    type State: Clone;

    fn init(&self, params: &ParameterSet) -> Self::State;

    fn update(
        &self,
        grads: &ParameterSet,
        state: Self::State,
        params: &ParameterSet,
    ) -> (ParameterSet, Self::State);

    fn apply(&self, params: &ParameterSet, delta: &ParameterSet) -> ParameterSet {
        params.zip_with(delta, |p, d| p + d)
    }
}
