use thiserror::Error;

/// Failures of the contrast-code computation.
///
/// Every variant is a caller-input error. The pipeline validates before it
/// computes, so an `Err` never comes with a partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CciError {
    /// Image dimensions, channel count or buffer length are inconsistent.
    #[error("invalid image shape: expected {expected}, got {actual}")]
    InvalidShape { expected: String, actual: String },

    /// A NaN or infinite sample was found at the given flat buffer index.
    #[error("non-finite sample at index {index}")]
    NonFiniteSample { index: usize },

    /// A constant border fill that is NaN or infinite.
    #[error("border fill value {0} is not finite")]
    NonFiniteFill(f64),

    /// Tolerance outside `[0, 100)`.
    #[error("tolerance {0} is outside [0, 100)")]
    InvalidTolerance(f64),

    /// A neighborhood side length that is even or smaller than 3.
    #[error("neighborhood size {0} must be odd and >= 3")]
    InvalidScale(u32),

    /// A scale set that is empty, unsorted or too long.
    #[error("invalid scale set: {0}")]
    InvalidScaleSet(&'static str),

    /// The window does not fit inside the image.
    #[error("neighborhood size {size} exceeds the smaller image dimension {limit}")]
    ScaleTooLarge { size: u32, limit: usize },

    /// Weight vector and dispersion stack disagree on the number of scales.
    #[error("expected {expected} weights, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },
}

impl CciError {
    pub(crate) fn shape(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::InvalidShape {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
