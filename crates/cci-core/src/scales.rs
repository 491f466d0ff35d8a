//! Neighborhood sizes evaluated per pixel.

use crate::CciError;

/// Window side lengths of the published contrast code, smallest first.
pub const DEFAULT_SCALES: [u32; 7] = [3, 5, 7, 9, 11, 13, 15];

/// Ordered set of odd window sizes.
///
/// The position of a size in the set is the contrast code reported for it and
/// also fixes the exponent of its decay weight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScaleSet {
    sizes: Vec<u32>,
}

impl ScaleSet {
    /// Validate and wrap a list of sizes.
    ///
    /// Sizes must be odd, at least 3 and strictly increasing. At most 255
    /// scales are allowed so every code fits in a `u8`.
    pub fn new(sizes: Vec<u32>) -> Result<Self, CciError> {
        if sizes.is_empty() {
            return Err(CciError::InvalidScaleSet("no sizes given"));
        }
        if sizes.len() > usize::from(u8::MAX) {
            return Err(CciError::InvalidScaleSet("more than 255 sizes"));
        }
        for &k in &sizes {
            check_window(k)?;
        }
        if sizes.windows(2).any(|p| p[0] >= p[1]) {
            return Err(CciError::InvalidScaleSet("sizes must be strictly increasing"));
        }
        Ok(Self { sizes })
    }

    /// The seven reference sizes 3, 5, .., 15.
    pub fn reference() -> Self {
        Self {
            sizes: DEFAULT_SCALES.to_vec(),
        }
    }

    #[inline]
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Always false for a validated set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.sizes.get(index).copied()
    }

    #[inline]
    pub fn largest(&self) -> u32 {
        self.sizes[self.sizes.len() - 1]
    }

    /// Fail with `ScaleTooLarge` unless every window fits in a `w`x`h` image.
    pub fn check_fits(&self, w: usize, h: usize) -> Result<(), CciError> {
        check_fits(self.largest(), w, h)
    }
}

impl Default for ScaleSet {
    fn default() -> Self {
        Self::reference()
    }
}

impl TryFrom<Vec<u32>> for ScaleSet {
    type Error = CciError;

    fn try_from(sizes: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(sizes)
    }
}

pub(crate) fn check_window(k: u32) -> Result<(), CciError> {
    if k < 3 || k % 2 == 0 {
        return Err(CciError::InvalidScale(k));
    }
    Ok(())
}

pub(crate) fn check_fits(k: u32, w: usize, h: usize) -> Result<(), CciError> {
    let limit = w.min(h);
    if k as usize > limit {
        return Err(CciError::ScaleTooLarge { size: k, limit });
    }
    Ok(())
}
