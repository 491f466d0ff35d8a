//! Core primitives for computing the contrast code image (CCI).
//!
//! # Overview
//!
//! The contrast code of a pixel is the index of the square neighborhood size,
//! out of a small ordered [`ScaleSet`], whose local standard deviation is
//! smallest once a tolerance-driven decay penalty has been applied. The
//! penalty favors larger neighborhoods, so a small window only wins where it
//! is clearly flatter than the large ones. The measure was introduced in
//! "A Contrast-Guided Approach for the Enhancement of Low-Lighting Underwater
//! Images" (Marques, Branzan-Albu, Hoeberechts) to pick per-pixel patch sizes.
//!
//! The pipeline is split into small modules:
//!
//! - [`gray`] – [`ColorImage`] input and BT.601 reduction to an
//!   [`IntensityImage`].
//! - [`border`] – how windows read samples past the image edge.
//! - [`scales`] – the ordered window sizes (3, 5, .., 15 by default).
//! - [`dispersion`] – dense local standard deviation, one map per scale.
//! - [`weights`] – decay weights derived from the tolerance.
//! - [`select`] – weighting and per-pixel arg-min over scales.
//! - [`pipeline`] – the end-to-end entry points.
//!
//! # Features
//!
//! - `rayon` – computes scales in parallel and, within a scale, rows in
//!   parallel. Every task writes its own output slice; results are identical
//!   to the single-threaded path.
//! - `tracing` – wraps the pipeline stages in `tracing` spans.

pub mod border;
pub mod dispersion;
mod error;
pub mod gray;
pub mod pipeline;
pub mod scales;
pub mod select;
pub mod weights;

pub use crate::border::BorderMode;
pub use crate::dispersion::{
    dispersion_stack, local_std, local_std_direct, DispersionMap, DispersionStack,
};
pub use crate::error::CciError;
pub use crate::gray::{ChannelOrder, ColorImage, IntensityImage};
pub use crate::pipeline::{
    compute_cci_intensity, compute_contrast_code_image, compute_contrast_code_image_trace,
    compute_contrast_code_image_with, CciResult,
};
pub use crate::scales::{ScaleSet, DEFAULT_SCALES};
pub use crate::select::{
    apply_weights, argmin_scales, select_scales, ContrastCodeImage, WeightedDispersionStack,
};
pub use crate::weights::WeightVector;

/// Tunable parameters for the contrast code computation.
///
/// The tolerance is passed separately to each call since it is the knob users
/// sweep most often.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CciParams {
    /// Window sizes to evaluate, smallest first.
    pub scales: ScaleSet,
    /// Edge handling used for every scale.
    pub border: BorderMode,
}
