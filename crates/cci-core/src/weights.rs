//! Decay weights that bias the scale choice toward large windows.

use crate::CciError;

/// Per-scale decay weights derived from a tolerance.
///
/// With `decay = 1 - tolerance / 100`, the weight of scale `i` out of `S` is
/// `decay^(S - 1 - i)`. The largest scale always has weight 1 and smaller
/// scales get geometrically smaller weights.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightVector {
    tolerance: f64,
    decay: f64,
    weights: Vec<f64>,
}

impl WeightVector {
    /// Weights for `num_scales` scales.
    ///
    /// `tolerance` must lie in `[0, 100)`; at 100 the decay would be zero and
    /// every smaller scale would lose its weight entirely.
    pub fn from_tolerance(tolerance: f64, num_scales: usize) -> Result<Self, CciError> {
        check_tolerance(tolerance)?;
        let decay = 1.0 - tolerance / 100.0;
        let weights = (0..num_scales)
            .map(|i| decay.powi((num_scales - 1 - i) as i32))
            .collect();
        Ok(Self {
            tolerance,
            decay,
            weights,
        })
    }

    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[inline]
    pub fn decay(&self) -> f64 {
        self.decay
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Fail with `InvalidTolerance` unless `0 <= tolerance < 100`. NaN fails.
pub fn check_tolerance(tolerance: f64) -> Result<(), CciError> {
    if (0.0..100.0).contains(&tolerance) {
        Ok(())
    } else {
        Err(CciError::InvalidTolerance(tolerance))
    }
}
