//! `image` crate adapters for the contrast code pipeline.
//!
//! Images decoded by the `image` crate are always RGB, so every color
//! conversion here tags the buffer with [`ChannelOrder::Rgb`].

use cci_core::pipeline::{compute_contrast_code_image_trace, CciResult};
use cci_core::{
    compute_contrast_code_image_with, CciError, CciParams, ChannelOrder, ColorImage,
    ContrastCodeImage, IntensityImage,
};
use image::{DynamicImage, GrayImage, Luma, RgbImage};

/// Wrap an `RgbImage` as a [`ColorImage`].
pub fn color_image_from_rgb(img: &RgbImage) -> ColorImage {
    ColorImage::from_u8(
        img.width() as usize,
        img.height() as usize,
        3,
        ChannelOrder::Rgb,
        img.as_raw(),
    )
    .expect("RgbImage buffers hold width * height * 3 finite samples")
}

/// Use an already-gray image as the intensity input, skipping luma reduction.
pub fn intensity_from_gray(img: &GrayImage) -> Result<IntensityImage, CciError> {
    IntensityImage::from_u8(img.width() as usize, img.height() as usize, img.as_raw())
}

/// Contrast code image of an `RgbImage`.
#[inline]
pub fn cci_image(
    img: &RgbImage,
    tolerance: f64,
    params: &CciParams,
) -> Result<ContrastCodeImage, CciError> {
    compute_contrast_code_image_with(&color_image_from_rgb(img), tolerance, params)
}

/// Contrast code image of an `RgbImage`, with per-stage timings.
#[inline]
pub fn cci_image_trace(
    img: &RgbImage,
    tolerance: f64,
    params: &CciParams,
) -> Result<CciResult, CciError> {
    compute_contrast_code_image_trace(&color_image_from_rgb(img), tolerance, params)
}

/// Contrast code image of any decoded image; it is converted to 8-bit RGB first.
pub fn cci_dynamic_image(
    img: &DynamicImage,
    tolerance: f64,
    params: &CciParams,
) -> Result<ContrastCodeImage, CciError> {
    cci_image(&img.to_rgb8(), tolerance, params)
}

/// Render codes as gray levels, stretching `0..num_scales` onto `0..=255`.
pub fn cci_to_gray_image(cci: &ContrastCodeImage, num_scales: usize) -> GrayImage {
    let top = num_scales.saturating_sub(1).max(1) as u32;
    GrayImage::from_fn(cci.w as u32, cci.h as u32, |x, y| {
        let code = u32::from(cci.at(x as usize, y as usize)).min(top);
        Luma([(code * 255 / top) as u8])
    })
}
