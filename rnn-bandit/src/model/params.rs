use ndarray::{Array1, Array2, Zip};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use super::errors::ModelError;

/// Scale applied to the readout weights at init so the policy starts near
/// uniform and the value estimate near zero.
pub const READOUT_INIT_SCALE: f64 = 1e-3;

/// Network shape: context width `C`, hidden width `H`, action count `A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims {
    pub context: usize,
    pub hidden: usize,
    pub actions: usize,
}

impl Dims {
    pub fn new(context: usize, hidden: usize, actions: usize) -> Self {
        Self {
            context,
            hidden,
            actions,
        }
    }
}

/// The four weight matrices of the recurrent actor-critic.
///
/// Row-vector convention throughout: `hidden = tanh(x · wxh + h · whh)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Input to hidden, `C × H`.
    pub wxh: Array2<f64>,
    /// Hidden to hidden, `H × H`.
    pub whh: Array2<f64>,
    /// Hidden to action logits, `H × A`.
    pub wha: Array2<f64>,
    /// Hidden to value, `H × 1`.
    pub whc: Array2<f64>,
}

impl ParameterSet {
    /// Seeded init: recurrent path `N(0, 1) / sqrt(H)`, readouts `N(0, 1) · 1e-3`.
    pub fn initialize(seed: u64, dims: Dims) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let recurrent_scale = 1.0 / (dims.hidden as f64).sqrt();
        let mut normal = |shape: (usize, usize), scale: f64| {
            Array2::from_shape_simple_fn(shape, || rng.sample::<f64, _>(StandardNormal) * scale)
        };
        let wxh = normal((dims.context, dims.hidden), recurrent_scale);
        let whh = normal((dims.hidden, dims.hidden), recurrent_scale);
        let wha = normal((dims.hidden, dims.actions), READOUT_INIT_SCALE);
        let whc = normal((dims.hidden, 1), READOUT_INIT_SCALE);
        Self { wxh, whh, wha, whc }
    }

    /// Assemble a parameter set from explicit matrices, checking that their
    /// shapes agree with one another.
    pub fn from_matrices(
        wxh: Array2<f64>,
        whh: Array2<f64>,
        wha: Array2<f64>,
        whc: Array2<f64>,
    ) -> Result<Self, ModelError> {
        let params = Self { wxh, whh, wha, whc };
        params.check_consistent()?;
        Ok(params)
    }

    fn check_consistent(&self) -> Result<(), ModelError> {
        let hidden = self.whh.nrows();
        let expect = |what: &'static str, got: (usize, usize), expected: (usize, usize)| {
            if got == expected {
                Ok(())
            } else {
                Err(ModelError::ShapeMismatch {
                    what,
                    expected: vec![expected.0, expected.1],
                    got: vec![got.0, got.1],
                })
            }
        };
        expect("whh", self.whh.dim(), (hidden, hidden))?;
        expect("wxh", self.wxh.dim(), (self.wxh.nrows(), hidden))?;
        expect("wha", self.wha.dim(), (hidden, self.wha.ncols()))?;
        expect("whc", self.whc.dim(), (hidden, 1))?;
        Ok(())
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.wxh.nrows(), self.whh.nrows(), self.wha.ncols())
    }

    /// Checks internal consistency and that the shapes match `dims`.
    pub fn validate(&self, dims: Dims) -> Result<(), ModelError> {
        self.check_consistent()?;
        let got = self.dims();
        if got != dims {
            return Err(ModelError::ShapeMismatch {
                what: "parameter set",
                expected: vec![dims.context, dims.hidden, dims.actions],
                got: vec![got.context, got.hidden, got.actions],
            });
        }
        Ok(())
    }

    pub fn zeros_like(&self) -> Self {
        self.map(|w| Array2::zeros(w.raw_dim()))
    }

    pub fn map(&self, mut f: impl FnMut(&Array2<f64>) -> Array2<f64>) -> Self {
        Self {
            wxh: f(&self.wxh),
            whh: f(&self.whh),
            wha: f(&self.wha),
            whc: f(&self.whc),
        }
    }

    /// Combine two same-shaped parameter sets field by field.
    pub fn zip_map(
        &self,
        other: &Self,
        mut f: impl FnMut(&Array2<f64>, &Array2<f64>) -> Array2<f64>,
    ) -> Self {
        Self {
            wxh: f(&self.wxh, &other.wxh),
            whh: f(&self.whh, &other.whh),
            wha: f(&self.wha, &other.wha),
            whc: f(&self.whc, &other.whc),
        }
    }

    /// Elementwise `f(a, b)` over two same-shaped parameter sets.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        self.zip_map(other, |a, b| Zip::from(a).and(b).map_collect(|&x, &y| f(x, y)))
    }

    /// Field-name / matrix pairs, for diagnostics.
    pub fn named(&self) -> [(&'static str, &Array2<f64>); 4] {
        [
            ("wxh", &self.wxh),
            ("whh", &self.whh),
            ("wha", &self.wha),
            ("whc", &self.whc),
        ]
    }

    /// Name of the first matrix holding a NaN or infinity, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        self.named()
            .into_iter()
            .find(|(_, w)| w.iter().any(|v| !v.is_finite()))
            .map(|(name, _)| name)
    }

    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }

    pub fn num_parameters(&self) -> usize {
        self.named().iter().map(|(_, w)| w.len()).sum()
    }
}

/// The agent's working memory, `H` components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenState(pub Array1<f64>);

impl HiddenState {
    /// Seeded `N(0, 1) · scale` start state.
    pub fn initial(seed: u64, hidden: usize, scale: f64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self(Array1::from_shape_simple_fn(hidden, || {
            rng.sample::<f64, _>(StandardNormal) * scale
        }))
    }

    pub fn zeros(hidden: usize) -> Self {
        Self(Array1::zeros(hidden))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
