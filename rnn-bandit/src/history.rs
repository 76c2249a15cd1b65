//! Smoothing helpers for per-trial histories.

use std::iter;

/// Moving average with edge padding.
///
/// The signal is extended by `window / 2` copies of its first and last
/// values before averaging, so an odd window returns one value per input
/// sample and an even window returns one extra. Windows of 0 or 1 return the
/// signal unchanged.
pub fn moving_average(signal: &[f64], window: usize) -> Vec<f64> {
    let (Some(&first), Some(&last)) = (signal.first(), signal.last()) else {
        return Vec::new();
    };
    if window <= 1 {
        return signal.to_vec();
    }
    let half = window / 2;
    let padded: Vec<f64> = iter::repeat_n(first, half)
        .chain(signal.iter().copied())
        .chain(iter::repeat_n(last, half))
        .collect();
    padded
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_signal_unchanged() {
        let out = moving_average(&[2.0; 9], 5);
        assert_eq!(out.len(), 9);
        for v in out {
            assert_relative_eq!(v, 2.0);
        }
    }

    #[test]
    fn test_edges_are_padded() {
        let out = moving_average(&[0.0, 0.0, 0.0, 3.0, 3.0, 3.0], 3);
        assert_eq!(out.len(), 6);
        assert_relative_eq!(out[0], 0.0);
        assert_relative_eq!(out[2], 1.0);
        assert_relative_eq!(out[3], 2.0);
        assert_relative_eq!(out[5], 3.0);
    }

    #[test]
    fn test_even_window_length() {
        assert_eq!(moving_average(&[1.0, 2.0, 3.0, 4.0], 2).len(), 5);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(moving_average(&[], 4).is_empty());
        assert_eq!(moving_average(&[1.0, 5.0], 1), vec![1.0, 5.0]);
        assert_eq!(moving_average(&[1.0, 5.0], 0), vec![1.0, 5.0]);
    }
}
