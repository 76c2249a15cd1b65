use ndarray::Zip;
use serde::{Deserialize, Serialize};

use super::Optimizer;
use crate::model::ParameterSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdamConfig {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    /// Added to the root of the second moment.
    pub eps: f64,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
        }
    }
}

/// Running moments, shaped like the parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AdamState {
    pub step: u64,
    pub m: ParameterSet,
    pub v: ParameterSet,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Adam {
    pub config: AdamConfig,
}

impl Adam {
    pub fn new(config: AdamConfig) -> Self {
        Self { config }
    }
}

impl Optimizer for Adam {
    type State = AdamState;

    fn init(&self, params: &ParameterSet) -> AdamState {
        AdamState {
            step: 0,
            m: params.zeros_like(),
            v: params.zeros_like(),
        }
    }

    fn update(
        &self,
        grads: &ParameterSet,
        state: AdamState,
        _params: &ParameterSet,
    ) -> (ParameterSet, AdamState) {
        let AdamConfig {
            learning_rate,
            beta1,
            beta2,
            eps,
        } = self.config;
        let step = state.step + 1;
        let m = state
            .m
            .zip_with(grads, |m, g| beta1 * m + (1.0 - beta1) * g);
        let v = state
            .v
            .zip_with(grads, |v, g| beta2 * v + (1.0 - beta2) * g * g);

        let m_correction = 1.0 - beta1.powf(step as f64);
        let v_correction = 1.0 - beta2.powf(step as f64);
        let delta = m.zip_map(&v, |m, v| {
            Zip::from(m).and(v).map_collect(|&m, &v| {
                let m_hat = m / m_correction;
                let v_hat = v / v_correction;
                -learning_rate * m_hat / (v_hat.sqrt() + eps)
            })
        });
        (delta, AdamState { step, m, v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dims;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = AdamConfig::default();
        assert_eq!(config.learning_rate, 1e-3);
        assert_eq!(config.beta1, 0.9);
        assert_eq!(config.beta2, 0.999);
    }

    #[test]
    fn test_first_step_is_learning_rate_times_sign() {
        let adam = Adam::default();
        let params = ParameterSet::initialize(0, Dims::new(2, 3, 2));
        let grads = params.map(|w| w.mapv(|x| if x >= 0.0 { 5.0 } else { -0.01 }));
        let state = adam.init(&params);
        let (delta, state) = adam.update(&grads, state, &params);
        assert_eq!(state.step, 1);
        for ((_, d), (_, g)) in delta.named().into_iter().zip(grads.named()) {
            for (&d, &g) in d.iter().zip(g.iter()) {
                assert_relative_eq!(d, -1e-3 * g.signum(), max_relative = 1e-4);
            }
        }
    }

    #[test]
    fn test_update_does_not_touch_params() {
        let adam = Adam::default();
        let params = ParameterSet::initialize(1, Dims::new(2, 3, 2));
        let before = params.clone();
        let state = adam.init(&params);
        let (delta, _) = adam.update(&params, state, &params);
        assert_eq!(params, before);
        let next = adam.apply(&params, &delta);
        assert_ne!(next, params);
        assert_eq!(next.dims(), params.dims());
    }

    #[test]
    fn test_minimizes_quadratic() {
        // L = ½‖θ‖², so the gradient is θ itself
        let adam = Adam::new(AdamConfig {
            learning_rate: 1e-2,
            ..AdamConfig::default()
        });
        let mut params = ParameterSet::initialize(2, Dims::new(2, 4, 2));
        params = params.map(|w| w.mapv(|x| x + 0.5));
        let norm = |p: &ParameterSet| {
            p.named()
                .iter()
                .map(|(_, w)| w.mapv(|x| x * x).sum())
                .sum::<f64>()
        };
        let start = norm(&params);
        let mut state = adam.init(&params);
        for _ in 0..500 {
            let (delta, next) = adam.update(&params, state, &params);
            params = adam.apply(&params, &delta);
            state = next;
        }
        assert!(norm(&params) < 0.01 * start, "{} vs {}", norm(&params), start);
    }
}
