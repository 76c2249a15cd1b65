use ndarray::{Array1, ArrayView1};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use super::errors::ModelError;

pub fn one_hot(index: usize, len: usize) -> Array1<f64> {
    let mut v = Array1::zeros(len);
    v[index] = 1.0;
    v
}

/// Index of the largest component; the first one wins ties.
pub fn argmax(v: ArrayView1<'_, f64>) -> usize {
    v.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, &x)| {
            if x > bv { (i, x) } else { (bi, bv) }
        })
        .0
}

/// Draws an action index from `policy` and returns it one-hot encoded.
pub fn sample_action<R: Rng + ?Sized>(
    policy: ArrayView1<'_, f64>,
    rng: &mut R,
) -> Result<Array1<f64>, ModelError> {
    let dist = WeightedIndex::new(policy.iter()).map_err(|e| ModelError::InvalidDistribution {
        reason: e.to_string(),
    })?;
    Ok(one_hot(dist.sample(rng), policy.len()))
}
