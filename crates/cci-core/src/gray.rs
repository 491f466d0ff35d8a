//! Color input and the single-channel intensity image derived from it.

use crate::CciError;

/// BT.601 luma weights for (red, green, blue).
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Channel layout of an interleaved color buffer.
///
/// The order belongs to whoever decoded the image: `image` yields RGB,
/// OpenCV-style decoders yield BGR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// Luma weights in the order the channels appear in memory.
    #[inline]
    pub fn weights(self) -> [f64; 3] {
        let [r, g, b] = LUMA_WEIGHTS;
        match self {
            ChannelOrder::Rgb => [r, g, b],
            ChannelOrder::Bgr => [b, g, r],
        }
    }
}

/// Interleaved multi-channel image, row-major.
///
/// Shape is only checked for consistency here. Whether there are exactly three
/// channels is checked by [`ColorImage::to_intensity`].
#[derive(Clone, Debug, PartialEq)]
pub struct ColorImage {
    pub w: usize,
    pub h: usize,
    pub channels: usize,
    pub order: ChannelOrder,
    pub data: Vec<f64>,
}

impl ColorImage {
    pub fn from_vec(
        w: usize,
        h: usize,
        channels: usize,
        order: ChannelOrder,
        data: Vec<f64>,
    ) -> Result<Self, CciError> {
        let img = Self {
            w,
            h,
            channels,
            order,
            data,
        };
        img.check_shape()?;
        Ok(img)
    }

    /// Build from 8-bit samples.
    pub fn from_u8(
        w: usize,
        h: usize,
        channels: usize,
        order: ChannelOrder,
        data: &[u8],
    ) -> Result<Self, CciError> {
        Self::from_vec(
            w,
            h,
            channels,
            order,
            data.iter().map(|&v| f64::from(v)).collect(),
        )
    }

    /// Re-check the invariants of [`ColorImage::from_vec`].
    ///
    /// Fields are public, so a value may have been built without it.
    pub fn check_shape(&self) -> Result<(), CciError> {
        let (w, h, channels) = (self.w, self.h, self.channels);
        let expected = w
            .checked_mul(h)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| CciError::shape("addressable image size", format!("{w}x{h}x{channels}")))?;
        if self.data.len() != expected {
            return Err(CciError::shape(
                format!("{expected} samples for {w}x{h}x{channels}"),
                format!("{} samples", self.data.len()),
            ));
        }
        if let Some(index) = self.data.iter().position(|v| !v.is_finite()) {
            return Err(CciError::NonFiniteSample { index });
        }
        Ok(())
    }

    /// Collapse to luminance with [`LUMA_WEIGHTS`].
    pub fn to_intensity(&self) -> Result<IntensityImage, CciError> {
        if self.channels != 3 {
            return Err(CciError::shape(
                "3 channels",
                format!("{} channels", self.channels),
            ));
        }
        if self.w == 0 || self.h == 0 {
            return Err(CciError::shape(
                "non-empty spatial extent",
                format!("{}x{}", self.w, self.h),
            ));
        }
        self.check_shape()?;

        let [c0, c1, c2] = self.order.weights();
        let data = self
            .data
            .chunks_exact(3)
            .map(|px| c0 * px[0] + c1 * px[1] + c2 * px[2])
            .collect();

        Ok(IntensityImage {
            w: self.w,
            h: self.h,
            data,
        })
    }
}

/// Single-channel intensity image, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct IntensityImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<f64>,
}

impl IntensityImage {
    pub fn from_vec(w: usize, h: usize, data: Vec<f64>) -> Result<Self, CciError> {
        let img = Self { w, h, data };
        img.check_shape()?;
        Ok(img)
    }

    /// Re-check the invariants of [`IntensityImage::from_vec`]: non-empty
    /// extent, `w * h` samples, all finite.
    pub fn check_shape(&self) -> Result<(), CciError> {
        let (w, h) = (self.w, self.h);
        if w == 0 || h == 0 {
            return Err(CciError::shape(
                "non-empty spatial extent",
                format!("{w}x{h}"),
            ));
        }
        let expected = w
            .checked_mul(h)
            .ok_or_else(|| CciError::shape("addressable image size", format!("{w}x{h}")))?;
        if self.data.len() != expected {
            return Err(CciError::shape(
                format!("{expected} samples for {w}x{h}"),
                format!("{} samples", self.data.len()),
            ));
        }
        if let Some(index) = self.data.iter().position(|v| !v.is_finite()) {
            return Err(CciError::NonFiniteSample { index });
        }
        Ok(())
    }

    pub fn from_u8(w: usize, h: usize, data: &[u8]) -> Result<Self, CciError> {
        Self::from_vec(w, h, data.iter().map(|&v| f64::from(v)).collect())
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.w..(y + 1) * self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn luma_respects_channel_order() {
        let rgb = ColorImage::from_u8(1, 1, 3, ChannelOrder::Rgb, &[255, 0, 0]).unwrap();
        let bgr = ColorImage::from_u8(1, 1, 3, ChannelOrder::Bgr, &[255, 0, 0]).unwrap();

        assert_relative_eq!(rgb.to_intensity().unwrap().at(0, 0), 0.299 * 255.0);
        assert_relative_eq!(bgr.to_intensity().unwrap().at(0, 0), 0.114 * 255.0);
    }

    #[test]
    fn white_maps_to_full_intensity() {
        let img = ColorImage::from_u8(2, 1, 3, ChannelOrder::Bgr, &[255; 6]).unwrap();
        let gray = img.to_intensity().unwrap();
        assert_eq!((gray.w, gray.h), (2, 1));
        for &v in &gray.data {
            assert_relative_eq!(v, 255.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn rejects_wrong_channel_count() {
        let img = ColorImage::from_u8(2, 2, 4, ChannelOrder::Rgb, &[0; 16]).unwrap();
        assert!(matches!(
            img.to_intensity(),
            Err(CciError::InvalidShape { .. })
        ));

        let gray_like = ColorImage::from_u8(2, 2, 1, ChannelOrder::Rgb, &[0; 4]).unwrap();
        assert!(matches!(
            gray_like.to_intensity(),
            Err(CciError::InvalidShape { .. })
        ));
    }

    #[test]
    fn rejects_length_mismatch_and_empty_images() {
        assert!(matches!(
            ColorImage::from_vec(2, 2, 3, ChannelOrder::Rgb, vec![0.0; 11]),
            Err(CciError::InvalidShape { .. })
        ));

        let empty = ColorImage::from_vec(0, 4, 3, ChannelOrder::Rgb, Vec::new()).unwrap();
        assert!(matches!(
            empty.to_intensity(),
            Err(CciError::InvalidShape { .. })
        ));
        assert!(IntensityImage::from_vec(0, 0, Vec::new()).is_err());
    }

    #[test]
    fn rejects_non_finite_samples() {
        let mut data = vec![0.0; 12];
        data[5] = f64::NAN;
        assert_eq!(
            ColorImage::from_vec(2, 2, 3, ChannelOrder::Rgb, data),
            Err(CciError::NonFiniteSample { index: 5 })
        );
        assert_eq!(
            IntensityImage::from_vec(2, 1, vec![1.0, f64::INFINITY]),
            Err(CciError::NonFiniteSample { index: 1 })
        );
    }

    #[test]
    fn hand_built_images_are_rechecked() {
        let short = ColorImage {
            w: 20,
            h: 20,
            channels: 3,
            order: ChannelOrder::Rgb,
            data: vec![1.0; 30],
        };
        assert!(matches!(
            short.to_intensity(),
            Err(CciError::InvalidShape { .. })
        ));

        let gray = IntensityImage {
            w: 4,
            h: 4,
            data: vec![0.0; 15],
        };
        assert!(matches!(
            gray.check_shape(),
            Err(CciError::InvalidShape { .. })
        ));
    }
}
