//! One-step actor-critic loss and its closed-form gradient.
//!
//! With `h = tanh(x·Wxh + h₀·Whh)`, `p = softmax(h·Wha)`, `v = h·Whc` and
//! `δ = r + γ·v' − v` (the bootstrapped `v'` is a constant), the loss is
//!
//! ```text
//! L = mean_j(−ln p_j · a_j · δ) + ½ · δ²
//! ```
//!
//! `δ` is not detached from `v`, so the policy term also pushes on the critic.

use ndarray::{Array1, Array2, ArrayView1, Axis};

use super::encoder::pre_activation;
use super::head::evaluate;
use super::params::ParameterSet;

/// Weight of the squared TD error in the total loss.
pub const VALUE_LOSS_COEF: f64 = 0.5;

/// Everything the loss needs besides the parameters.
#[derive(Debug, Clone, Copy)]
pub struct LossInputs<'a> {
    pub input: ArrayView1<'a, f64>,
    pub prev_hidden: ArrayView1<'a, f64>,
    /// One-hot encoding of the sampled action.
    pub action: ArrayView1<'a, f64>,
    pub reward: f64,
    /// Value estimate of the next hidden state. Treated as a constant.
    pub next_value: f64,
}

#[derive(Debug, Clone)]
pub struct LossEval {
    pub loss: f64,
    pub policy_loss: f64,
    pub value_loss: f64,
    pub td_error: f64,
    pub value: f64,
    pub grads: ParameterSet,
}

struct Forward {
    hidden: Array1<f64>,
    policy: Array1<f64>,
    log_policy: Array1<f64>,
    value: f64,
    td_error: f64,
    policy_loss: f64,
    value_loss: f64,
}

fn forward(params: &ParameterSet, inputs: &LossInputs<'_>, gamma: f64) -> Forward {
    let hidden = pre_activation(params, inputs.input, inputs.prev_hidden).mapv_into(f64::tanh);
    let out = evaluate(params, hidden.view());
    let td_error = inputs.reward + gamma * inputs.next_value - out.value;
    let log_policy = out.policy.mapv(f64::ln);
    let policy_loss = (-&log_policy * &inputs.action * td_error)
        .mean()
        .unwrap_or(0.0);
    let value_loss = td_error * td_error;
    Forward {
        hidden,
        policy: out.policy,
        log_policy,
        value: out.value,
        td_error,
        policy_loss,
        value_loss,
    }
}

/// Scalar loss only. Deterministic in its arguments.
pub fn actor_critic_loss(params: &ParameterSet, inputs: &LossInputs<'_>, gamma: f64) -> f64 {
    let f = forward(params, inputs, gamma);
    f.policy_loss + VALUE_LOSS_COEF * f.value_loss
}

fn outer(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Array2<f64> {
    a.insert_axis(Axis(1)).dot(&b.insert_axis(Axis(0)))
}

/// Loss together with its gradient with respect to every weight matrix.
pub fn loss_and_grad(params: &ParameterSet, inputs: &LossInputs<'_>, gamma: f64) -> LossEval {
    let f = forward(params, inputs, gamma);
    let n_actions = f.policy.len() as f64;
    let action = inputs.action;

    // dL/dlogits = (δ / A) · (p · Σa − a)
    let grad_logits = (&f.policy * action.sum() - &action) * (f.td_error / n_actions);
    // dL/dv: the policy term sees δ through −v, the value term is −2cδ
    let grad_value =
        action.dot(&f.log_policy) / n_actions - 2.0 * VALUE_LOSS_COEF * f.td_error;

    let wha = outer(f.hidden.view(), grad_logits.view());
    let whc = f.hidden.view().insert_axis(Axis(1)).mapv(|h| h * grad_value);

    let grad_hidden = params.wha.dot(&grad_logits) + &params.whc.column(0) * grad_value;
    let grad_pre = grad_hidden * f.hidden.mapv(|h| 1.0 - h * h);

    let wxh = outer(inputs.input, grad_pre.view());
    let whh = outer(inputs.prev_hidden, grad_pre.view());

    LossEval {
        loss: f.policy_loss + VALUE_LOSS_COEF * f.value_loss,
        policy_loss: f.policy_loss,
        value_loss: f.value_loss,
        td_error: f.td_error,
        value: f.value,
        grads: ParameterSet { wxh, whh, wha, whc },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dims, encode};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn fixture() -> (ParameterSet, Array1<f64>, Array1<f64>, Array1<f64>) {
        let mut params = ParameterSet::initialize(3, Dims::new(3, 5, 3));
        // larger readouts so every gradient component is well away from zero
        params.wha.mapv_inplace(|w| w * 500.0);
        params.whc.mapv_inplace(|w| w * 500.0);
        let input = array![0.3, -0.7, 1.0];
        let prev = array![0.1, -0.4, 0.25, 0.6, -0.9];
        let action = array![0.0, 1.0, 0.0];
        (params, input, prev, action)
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let (params, input, prev, action) = fixture();
        let inputs = LossInputs {
            input: input.view(),
            prev_hidden: prev.view(),
            action: action.view(),
            reward: 1.0,
            next_value: 0.3,
        };
        let gamma = 0.95;
        let eval = loss_and_grad(&params, &inputs, gamma);
        let eps = 1e-6;

        let perturbed = |name: &str, idx: (usize, usize), delta: f64| {
            let mut p = params.clone();
            let w = match name {
                "wxh" => &mut p.wxh,
                "whh" => &mut p.whh,
                "wha" => &mut p.wha,
                _ => &mut p.whc,
            };
            w[idx] += delta;
            actor_critic_loss(&p, &inputs, gamma)
        };

        for (name, grad) in eval.grads.named() {
            for ((i, j), &analytic) in grad.indexed_iter() {
                let numeric =
                    (perturbed(name, (i, j), eps) - perturbed(name, (i, j), -eps)) / (2.0 * eps);
                assert_abs_diff_eq!(analytic, numeric, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_loss_value_matches_formula() {
        let (params, input, prev, action) = fixture();
        let inputs = LossInputs {
            input: input.view(),
            prev_hidden: prev.view(),
            action: action.view(),
            reward: 0.0,
            next_value: -0.2,
        };
        let eval = loss_and_grad(&params, &inputs, 0.95);

        let h = encode(&params, input.view(), prev.view());
        let out = evaluate(&params, h.view());
        let td = 0.0 + 0.95 * -0.2 - out.value;
        let expected = -out.policy[1].ln() * td / 3.0 + 0.5 * td * td;

        assert_abs_diff_eq!(eval.td_error, td, epsilon = 1e-12);
        assert_abs_diff_eq!(eval.loss, expected, epsilon = 1e-12);
        assert_abs_diff_eq!(
            eval.loss,
            actor_critic_loss(&params, &inputs, 0.95),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_loss_is_deterministic() {
        let (params, input, prev, action) = fixture();
        let inputs = LossInputs {
            input: input.view(),
            prev_hidden: prev.view(),
            action: action.view(),
            reward: 1.0,
            next_value: 0.1,
        };
        let a = loss_and_grad(&params, &inputs, 0.95);
        let b = loss_and_grad(&params, &inputs, 0.95);
        assert_eq!(a.loss, b.loss);
        assert_eq!(a.grads, b.grads);
    }

    #[test]
    fn test_loss_depends_only_on_next_value_number() {
        let (params, input, prev, action) = fixture();
        // next value computed through the network ...
        let next_hidden = encode(&params, input.view(), prev.view());
        let computed = evaluate(&params, next_hidden.view()).value;
        // ... and the same number written down as a literal
        let literal: f64 = format!("{computed:e}").parse().unwrap();
        assert_eq!(computed, literal);

        let with = |next_value| {
            let inputs = LossInputs {
                input: input.view(),
                prev_hidden: prev.view(),
                action: action.view(),
                reward: 1.0,
                next_value,
            };
            actor_critic_loss(&params, &inputs, 0.95)
        };
        assert_eq!(with(computed), with(literal));
    }

    #[test]
    fn test_zero_input_has_zero_input_gradient() {
        let (params, _, prev, action) = fixture();
        let zero = Array1::zeros(3);
        let inputs = LossInputs {
            input: zero.view(),
            prev_hidden: prev.view(),
            action: action.view(),
            reward: 1.0,
            next_value: 0.0,
        };
        let eval = loss_and_grad(&params, &inputs, 0.95);
        assert!(eval.grads.wxh.iter().all(|&g| g == 0.0));
        assert!(eval.grads.whh.iter().any(|&g| g != 0.0));
    }
}
