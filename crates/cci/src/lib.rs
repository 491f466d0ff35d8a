//! Ergonomic wrappers over `cci-core` for `image` crate inputs.
//!
//! This crate is organized into a few focused modules:
//! - [`image`] – contrast code images straight from `RgbImage` /
//!   `DynamicImage`, and a grayscale rendering of the result.
//! - [`app`] – config loading and JSON/PNG output shared by the CLI and the
//!   examples.
//! - [`logger`] – a small `log` implementation writing to stderr.

pub mod app;
pub mod image;
pub mod logger;

// Consumers that need the lower-level stages (dispersion maps, weights,
// selection) get them from the core re-export.
pub use cci_core::*;

pub use crate::image::{
    cci_dynamic_image, cci_image, cci_image_trace, cci_to_gray_image, color_image_from_rgb,
    intensity_from_gray,
};
