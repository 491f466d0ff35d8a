//! End-to-end contrast code computation.
use crate::dispersion::dispersion_stack;
use crate::gray::{ColorImage, IntensityImage};
use crate::select::{select_scales, ContrastCodeImage};
use crate::weights::{check_tolerance, WeightVector};
use crate::{CciError, CciParams};
use std::time::Instant;
#[cfg(feature = "tracing")]
use tracing::{debug_span, instrument};

/// Contrast code image together with per-stage timings.
pub struct CciResult {
    pub cci: ContrastCodeImage,
    /// Time spent on the grayscale reduction (milliseconds).
    pub gray_ms: f64,
    /// Time spent building the dispersion stack (milliseconds).
    pub dispersion_ms: f64,
    /// Time spent weighting and selecting scales (milliseconds).
    pub select_ms: f64,
}

/// Contrast code image of a 3-channel color image with the reference scales.
///
/// Equivalent to [`compute_contrast_code_image_with`] using
/// [`CciParams::default`].
pub fn compute_contrast_code_image(
    image: &ColorImage,
    tolerance: f64,
) -> Result<ContrastCodeImage, CciError> {
    compute_contrast_code_image_with(image, tolerance, &CciParams::default())
}

/// Contrast code image of a 3-channel color image.
pub fn compute_contrast_code_image_with(
    image: &ColorImage,
    tolerance: f64,
    params: &CciParams,
) -> Result<ContrastCodeImage, CciError> {
    compute_contrast_code_image_trace(image, tolerance, params).map(|res| res.cci)
}

/// Contrast code image of an intensity image.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img, params), fields(w = img.w, h = img.h))
)]
pub fn compute_cci_intensity(
    img: &IntensityImage,
    tolerance: f64,
    params: &CciParams,
) -> Result<ContrastCodeImage, CciError> {
    let weights = WeightVector::from_tolerance(tolerance, params.scales.len())?;
    let stack = dispersion_stack(img, &params.scales, params.border)?;
    select_scales(&stack, &weights)
}

/// Contrast code image of a color image, reporting how long each stage took.
///
/// Tolerance, channel layout and scale fit are all checked before the
/// dispersion stack is built.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(image, params),
        fields(w = image.w, h = image.h, scales = params.scales.len())
    )
)]
pub fn compute_contrast_code_image_trace(
    image: &ColorImage,
    tolerance: f64,
    params: &CciParams,
) -> Result<CciResult, CciError> {
    check_tolerance(tolerance)?;

    let gray_started = Instant::now();
    let gray = image.to_intensity()?;
    let gray_ms = gray_started.elapsed().as_secs_f64() * 1000.0;

    params.scales.check_fits(gray.w, gray.h)?;
    let weights = WeightVector::from_tolerance(tolerance, params.scales.len())?;

    #[cfg(feature = "tracing")]
    let dispersion_span = debug_span!("dispersion").entered();
    let dispersion_started = Instant::now();
    let stack = dispersion_stack(&gray, &params.scales, params.border)?;
    let dispersion_ms = dispersion_started.elapsed().as_secs_f64() * 1000.0;
    #[cfg(feature = "tracing")]
    drop(dispersion_span);

    #[cfg(feature = "tracing")]
    let select_span = debug_span!("select").entered();
    let select_started = Instant::now();
    let cci = select_scales(&stack, &weights)?;
    let select_ms = select_started.elapsed().as_secs_f64() * 1000.0;
    #[cfg(feature = "tracing")]
    drop(select_span);

    Ok(CciResult {
        cci,
        gray_ms,
        dispersion_ms,
        select_ms,
    })
}
