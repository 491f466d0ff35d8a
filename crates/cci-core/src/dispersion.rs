//! Dense local standard deviation over square windows.
//!
//! For every pixel the population standard deviation (divide by `n`) of the
//! `k`x`k` window centered on it is computed. Windows that cross the image edge
//! read samples through a [`BorderMode`]. The same mode is used for every scale
//! of a run.
//!
//! [`local_std`] sums the padded image column-wise per output row and slides a
//! running sum horizontally, which costs O(k) per pixel instead of the O(k²) of
//! [`local_std_direct`]. Both compute the same quantity up to round-off.

use crate::border::{map_index, BorderMode};
use crate::gray::IntensityImage;
use crate::scales::{check_fits, check_window, ScaleSet};
use crate::CciError;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Local standard deviation for one window size, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct DispersionMap {
    pub w: usize,
    pub h: usize,
    /// Window side length this map was computed with.
    pub size: u32,
    pub data: Vec<f64>,
}

impl DispersionMap {
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.w + x]
    }
}

/// One [`DispersionMap`] per scale, in scale order.
///
/// Conceptually an H×W×S array; each scale owns its own slice.
#[derive(Clone, Debug, PartialEq)]
pub struct DispersionStack {
    pub w: usize,
    pub h: usize,
    pub maps: Vec<DispersionMap>,
}

impl DispersionStack {
    #[inline]
    pub fn num_scales(&self) -> usize {
        self.maps.len()
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize, s: usize) -> f64 {
        self.maps[s].at(x, y)
    }

    #[inline]
    pub fn slice(&self, s: usize) -> &DispersionMap {
        &self.maps[s]
    }
}

/// Image copy extended by `radius` samples on every side.
///
/// Samples are stored relative to the first image sample. Variance does not
/// change under a shift, and a constant image then sums to exactly zero.
struct Padded {
    pw: usize,
    radius: usize,
    data: Vec<f64>,
}

impl Padded {
    fn new(img: &IntensityImage, radius: usize, border: BorderMode) -> Self {
        let reference = img.data[0];
        let pw = img.w + 2 * radius;
        let ph = img.h + 2 * radius;
        let fill = match border {
            BorderMode::Constant(c) => c - reference,
            _ => 0.0,
        };

        let col_map: Vec<Option<usize>> = (0..pw)
            .map(|px| map_index(px as isize - radius as isize, img.w, border))
            .collect();

        let mut data = Vec::with_capacity(pw * ph);
        for py in 0..ph {
            match map_index(py as isize - radius as isize, img.h, border) {
                Some(sy) => {
                    let src = img.row(sy);
                    data.extend(col_map.iter().map(|sx| match sx {
                        Some(sx) => src[*sx] - reference,
                        None => fill,
                    }));
                }
                None => data.extend(std::iter::repeat(fill).take(pw)),
            }
        }

        Self { pw, radius, data }
    }

    #[inline]
    fn row(&self, py: usize) -> &[f64] {
        &self.data[py * self.pw..(py + 1) * self.pw]
    }
}

#[inline]
fn std_from_sums(sum: f64, sum_sq: f64, n: f64) -> f64 {
    let mean = sum / n;
    let var = sum_sq / n - mean * mean;
    // round-off can push a flat window slightly negative
    var.max(0.0).sqrt()
}

/// Fill one output row for window size `k`.
fn std_row(padded: &Padded, k: usize, y: usize, out: &mut [f64]) {
    let w = out.len();
    let off = padded.radius - k / 2;
    let span = w + k - 1;
    let n = (k * k) as f64;

    let mut col_sum = vec![0.0f64; span];
    let mut col_sq = vec![0.0f64; span];
    for dy in 0..k {
        let row = &padded.row(y + off + dy)[off..off + span];
        for ((s, s2), &v) in col_sum.iter_mut().zip(col_sq.iter_mut()).zip(row) {
            *s += v;
            *s2 += v * v;
        }
    }

    let mut sum: f64 = col_sum[..k].iter().sum();
    let mut sum_sq: f64 = col_sq[..k].iter().sum();
    out[0] = std_from_sums(sum, sum_sq, n);
    for x in 1..w {
        sum += col_sum[x + k - 1] - col_sum[x - 1];
        sum_sq += col_sq[x + k - 1] - col_sq[x - 1];
        out[x] = std_from_sums(sum, sum_sq, n);
    }
}

fn validate(img: &IntensityImage, k: u32, border: BorderMode) -> Result<(), CciError> {
    img.check_shape()?;
    border.check()?;
    check_window(k)?;
    check_fits(k, img.w, img.h)
}

fn std_from_padded(img: &IntensityImage, padded: &Padded, k: u32) -> DispersionMap {
    let k_us = k as usize;
    let mut data = vec![0.0f64; img.w * img.h];

    #[cfg(feature = "rayon")]
    data.par_chunks_mut(img.w)
        .enumerate()
        .for_each(|(y, row)| std_row(padded, k_us, y, row));

    #[cfg(not(feature = "rayon"))]
    data.chunks_mut(img.w)
        .enumerate()
        .for_each(|(y, row)| std_row(padded, k_us, y, row));

    DispersionMap {
        w: img.w,
        h: img.h,
        size: k,
        data,
    }
}

/// Local population standard deviation over `k`x`k` windows.
///
/// `k` must be odd, at least 3 and no larger than the smaller image
/// dimension.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img, border), fields(w = img.w, h = img.h))
)]
pub fn local_std(img: &IntensityImage, k: u32, border: BorderMode) -> Result<DispersionMap, CciError> {
    validate(img, k, border)?;
    let padded = Padded::new(img, k as usize / 2, border);
    Ok(std_from_padded(img, &padded, k))
}

/// Reference implementation of [`local_std`] that visits every window sample.
pub fn local_std_direct(
    img: &IntensityImage,
    k: u32,
    border: BorderMode,
) -> Result<DispersionMap, CciError> {
    validate(img, k, border)?;
    let r = (k / 2) as isize;
    let n = f64::from(k * k);

    let sample = |x: isize, y: isize| -> f64 {
        match (map_index(x, img.w, border), map_index(y, img.h, border)) {
            (Some(sx), Some(sy)) => img.at(sx, sy),
            _ => match border {
                BorderMode::Constant(c) => c,
                _ => unreachable!("only constant borders leave the image"),
            },
        }
    };

    let mut data = Vec::with_capacity(img.w * img.h);
    for y in 0..img.h as isize {
        for x in 0..img.w as isize {
            let mut sum = 0.0;
            for dy in -r..=r {
                for dx in -r..=r {
                    sum += sample(x + dx, y + dy);
                }
            }
            let mean = sum / n;
            let mut ss = 0.0;
            for dy in -r..=r {
                for dx in -r..=r {
                    let d = sample(x + dx, y + dy) - mean;
                    ss += d * d;
                }
            }
            data.push((ss / n).sqrt());
        }
    }

    Ok(DispersionMap {
        w: img.w,
        h: img.h,
        size: k,
        data,
    })
}

/// Run [`local_std`] once per scale and stack the results.
///
/// All scales are checked against the image before any work starts. The
/// image is padded once for the largest window and every scale reads its own
/// sub-window of that copy.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(img, scales, border),
        fields(w = img.w, h = img.h, scales = scales.len())
    )
)]
pub fn dispersion_stack(
    img: &IntensityImage,
    scales: &ScaleSet,
    border: BorderMode,
) -> Result<DispersionStack, CciError> {
    img.check_shape()?;
    border.check()?;
    scales.check_fits(img.w, img.h)?;
    let padded = Padded::new(img, scales.largest() as usize / 2, border);

    #[cfg(feature = "rayon")]
    let maps: Vec<DispersionMap> = scales
        .sizes()
        .par_iter()
        .map(|&k| std_from_padded(img, &padded, k))
        .collect();

    #[cfg(not(feature = "rayon"))]
    let maps: Vec<DispersionMap> = scales
        .sizes()
        .iter()
        .map(|&k| std_from_padded(img, &padded, k))
        .collect();

    Ok(DispersionStack {
        w: img.w,
        h: img.h,
        maps,
    })
}
