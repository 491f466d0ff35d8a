//! Index mapping for samples that fall outside the image.

use crate::CciError;

/// How out-of-range sample coordinates are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BorderMode {
    /// Symmetric reflection that repeats the edge sample: `d c b a | a b c d`.
    #[default]
    Reflect,
    /// Reflection about the edge sample without repeating it: `d c b | a b c d`.
    Reflect101,
    /// Repeat the edge sample: `a a a | a b c d`.
    Replicate,
    /// Fill with a fixed value.
    Constant(f64),
}

impl BorderMode {
    /// Fail with `NonFiniteFill` for a NaN or infinite constant.
    pub fn check(self) -> Result<(), CciError> {
        match self {
            BorderMode::Constant(c) if !c.is_finite() => Err(CciError::NonFiniteFill(c)),
            _ => Ok(()),
        }
    }
}

/// Map a possibly out-of-range index onto `[0, len)`.
///
/// Returns `None` for `Constant` outside the range (the caller substitutes the
/// fill value) and for `len == 0`.
pub fn map_index(i: isize, len: usize, mode: BorderMode) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if (0..len as isize).contains(&i) {
        return Some(i as usize);
    }

    match mode {
        BorderMode::Constant(_) => None,
        BorderMode::Replicate => {
            if i < 0 {
                Some(0)
            } else {
                Some(len - 1)
            }
        }
        BorderMode::Reflect => {
            let period = (2 * len) as isize;
            let r = i.rem_euclid(period) as usize;
            if r < len {
                Some(r)
            } else {
                Some(2 * len - 1 - r)
            }
        }
        BorderMode::Reflect101 => {
            if len == 1 {
                return Some(0);
            }
            let period = (2 * len - 2) as isize;
            let r = i.rem_euclid(period) as usize;
            if r < len {
                Some(r)
            } else {
                Some(2 * len - 2 - r)
            }
        }
    }
}
