use ndarray::{Array1, ArrayView1};

use super::errors::ModelError;
use super::params::ParameterSet;

/// Tolerance on `sum(p) == 1` when checking a policy.
pub const PROB_SUM_TOLERANCE: f64 = 1e-6;

/// Max-subtracted softmax.
pub fn softmax(logits: ArrayView1<'_, f64>) -> Array1<f64> {
    let max = logits.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    let exp = logits.mapv(|v| (v - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Output of the joint policy/value head.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyValue {
    pub policy: Array1<f64>,
    pub value: f64,
}

/// `policy = softmax(hidden · wha)`, `value = hidden · whc`.
pub fn evaluate(params: &ParameterSet, hidden: ArrayView1<'_, f64>) -> PolicyValue {
    let logits = hidden.dot(&params.wha);
    let value = hidden.dot(&params.whc)[0];
    PolicyValue {
        policy: softmax(logits.view()),
        value,
    }
}

/// Rejects vectors with negative or non-finite entries, or that do not sum to one.
pub fn validate_distribution(p: ArrayView1<'_, f64>) -> Result<(), ModelError> {
    if p.is_empty() {
        return Err(ModelError::InvalidDistribution {
            reason: "empty".into(),
        });
    }
    if let Some((i, v)) = p.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0) {
        return Err(ModelError::InvalidDistribution {
            reason: format!("component {i} is {v}"),
        });
    }
    let sum = p.sum();
    if (sum - 1.0).abs() > PROB_SUM_TOLERANCE {
        return Err(ModelError::InvalidDistribution {
            reason: format!("sums to {sum}"),
        });
    }
    Ok(())
}
