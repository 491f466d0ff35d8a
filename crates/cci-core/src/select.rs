//! Per-pixel scale selection on a weighted dispersion stack.
use crate::dispersion::{DispersionMap, DispersionStack};
use crate::scales::ScaleSet;
use crate::weights::WeightVector;
use crate::CciError;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Dispersion stack after the decay weights have been applied.
///
/// Cell `(x, y, s)` holds `dispersion(x, y, s) / weight[s]`. Weights are at most
/// 1 and shrink toward small scales, so small windows are penalised and a
/// large window wins unless a smaller one is clearly flatter. Dividing by
/// `decay^(S-1-s)` orders candidates exactly like multiplying by `decay^s`,
/// which is the published scheme, while keeping the largest scale's values
/// untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedDispersionStack {
    pub w: usize,
    pub h: usize,
    pub maps: Vec<DispersionMap>,
}

impl WeightedDispersionStack {
    #[inline]
    pub fn num_scales(&self) -> usize {
        self.maps.len()
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize, s: usize) -> f64 {
        self.maps[s].at(x, y)
    }
}

/// Per-pixel index of the winning scale, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContrastCodeImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl ContrastCodeImage {
    /// Contrast code at an integer coordinate.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.w + x]
    }

    /// Window side length selected at `(x, y)`.
    #[inline]
    pub fn patch_size_at(&self, x: usize, y: usize, scales: &ScaleSet) -> Option<u32> {
        scales.get(usize::from(self.at(x, y)))
    }

    /// Replace every code by the window side length it stands for.
    pub fn patch_size_map(&self, scales: &ScaleSet) -> Option<Vec<u32>> {
        self.data
            .iter()
            .map(|&c| scales.get(usize::from(c)))
            .collect()
    }

    /// Number of pixels carrying each code, for codes `0..num_scales`.
    pub fn histogram(&self, num_scales: usize) -> Vec<usize> {
        let mut counts = vec![0usize; num_scales];
        for &c in &self.data {
            if let Some(slot) = counts.get_mut(usize::from(c)) {
                *slot += 1;
            }
        }
        counts
    }
}

/// Scale every slice of `stack` by the reciprocal of its weight.
pub fn apply_weights(
    stack: &DispersionStack,
    weights: &WeightVector,
) -> Result<WeightedDispersionStack, CciError> {
    if weights.len() != stack.num_scales() {
        return Err(CciError::WeightCountMismatch {
            expected: stack.num_scales(),
            actual: weights.len(),
        });
    }

    let maps = stack
        .maps
        .iter()
        .zip(weights.as_slice())
        .map(|(map, &weight)| {
            let inv = 1.0 / weight;
            DispersionMap {
                w: map.w,
                h: map.h,
                size: map.size,
                data: map.data.iter().map(|&v| v * inv).collect(),
            }
        })
        .collect();

    Ok(WeightedDispersionStack {
        w: stack.w,
        h: stack.h,
        maps,
    })
}

/// Index of the smallest value; the first one wins ties. NaN never wins.
#[inline]
fn argmin(values: impl Iterator<Item = f64>) -> u8 {
    let mut best = 0u8;
    let mut best_v = f64::INFINITY;
    for (s, v) in values.enumerate() {
        if v < best_v {
            best_v = v;
            best = s as u8;
        }
    }
    best
}

fn argmin_row(weighted: &WeightedDispersionStack, y: usize, out: &mut [u8]) {
    for (x, code) in out.iter_mut().enumerate() {
        *code = argmin(weighted.maps.iter().map(|m| m.at(x, y)));
    }
}

/// Reduce the scale axis to the index of the minimal weighted dispersion.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(weighted), fields(w = weighted.w, h = weighted.h))
)]
pub fn argmin_scales(weighted: &WeightedDispersionStack) -> ContrastCodeImage {
    let mut data = vec![0u8; weighted.w * weighted.h];
    if weighted.w == 0 {
        return ContrastCodeImage {
            w: weighted.w,
            h: weighted.h,
            data,
        };
    }

    #[cfg(feature = "rayon")]
    data.par_chunks_mut(weighted.w)
        .enumerate()
        .for_each(|(y, row)| argmin_row(weighted, y, row));

    #[cfg(not(feature = "rayon"))]
    data.chunks_mut(weighted.w)
        .enumerate()
        .for_each(|(y, row)| argmin_row(weighted, y, row));

    ContrastCodeImage {
        w: weighted.w,
        h: weighted.h,
        data,
    }
}

/// Weight the stack and pick the winning scale per pixel.
pub fn select_scales(
    stack: &DispersionStack,
    weights: &WeightVector,
) -> Result<ContrastCodeImage, CciError> {
    let weighted = apply_weights(stack, weights)?;
    Ok(argmin_scales(&weighted))
}
