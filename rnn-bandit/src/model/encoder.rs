use ndarray::{Array1, ArrayView1};

use super::params::ParameterSet;

/// One recurrent step: `tanh(input · wxh + prev_hidden · whh)`.
///
/// Every output component lies in (-1, 1) for finite inputs, which keeps the
/// recurrent state bounded over arbitrarily long runs.
///
/// # Panics
///
/// If `input` or `prev_hidden` disagree with the parameter shapes. Shapes are
/// validated once when a run is constructed.
pub fn encode(
    params: &ParameterSet,
    input: ArrayView1<'_, f64>,
    prev_hidden: ArrayView1<'_, f64>,
) -> Array1<f64> {
    pre_activation(params, input, prev_hidden).mapv_into(f64::tanh)
}

pub(crate) fn pre_activation(
    params: &ParameterSet,
    input: ArrayView1<'_, f64>,
    prev_hidden: ArrayView1<'_, f64>,
) -> Array1<f64> {
    input.dot(&params.wxh) + prev_hidden.dot(&params.whh)
}
