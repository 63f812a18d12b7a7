use rand::{Rng, RngCore};

use crate::foundation::error::{SynthError, SynthResult};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// SplitMix64 finalizer.
pub(crate) fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Per-sample seed derived from a run seed and a dataset index.
pub fn sample_seed(seed: u64, index: u64) -> u64 {
    mix64(seed ^ mix64(index))
}

/// Uniform draw from `[lo, hi]`; a degenerate range returns `lo` without consuming randomness.
pub(crate) fn uniform_f64(rng: &mut dyn RngCore, [lo, hi]: [f64; 2]) -> f64 {
    if hi <= lo {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

pub(crate) fn uniform_f32(rng: &mut dyn RngCore, [lo, hi]: [f32; 2]) -> f32 {
    uniform_f64(rng, [f64::from(lo), f64::from(hi)]) as f32
}

pub(crate) fn uniform_u32(rng: &mut dyn RngCore, [lo, hi]: [u32; 2]) -> u32 {
    if hi <= lo {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

/// `true` with probability `p`.
pub(crate) fn chance(rng: &mut dyn RngCore, p: f64) -> bool {
    rng.r#gen::<f64>() < p
}

pub(crate) fn check_prob(name: &str, p: f64) -> SynthResult<()> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(SynthError::validation(format!(
            "{name} must be a probability in [0, 1] (got {p})"
        )));
    }
    Ok(())
}

pub(crate) fn check_range_f64(name: &str, [lo, hi]: [f64; 2], min: f64, max: f64) -> SynthResult<()> {
    if !lo.is_finite() || !hi.is_finite() || lo > hi || lo < min || hi > max {
        return Err(SynthError::validation(format!(
            "{name} must be an ordered range within [{min}, {max}] (got [{lo}, {hi}])"
        )));
    }
    Ok(())
}

pub(crate) fn check_weights(name: &str, weights: &[f64], expected: usize) -> SynthResult<()> {
    if weights.is_empty() {
        return Ok(());
    }
    if weights.len() != expected {
        return Err(SynthError::validation(format!(
            "{name} has {} entries but {expected} paths were given",
            weights.len()
        )));
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
        return Err(SynthError::validation(format!(
            "{name} must be finite, non-negative and not all zero"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
