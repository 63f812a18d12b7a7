use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::effects::gate::Effect;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::math::{check_prob, check_range_f64, uniform_f64};
use crate::render::raster::Raster;

/// Gaussian blur stage configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Activation probability.
    pub prob: f64,
    /// Inclusive sigma range in pixels.
    pub sigma: [f64; 2],
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            prob: 0.5,
            sigma: [0.0, 2.0],
        }
    }
}

impl BlurConfig {
    /// Check the probability and sigma range.
    pub fn validate(&self) -> SynthResult<()> {
        check_prob("postprocess.blur.prob", self.prob)?;
        check_range_f64("postprocess.blur.sigma", self.sigma, 0.0, 64.0)
    }
}

/// Separable Gaussian blur with a kernel radius of `ceil(3 * sigma)`.
#[derive(Clone, Debug)]
pub struct GaussianBlur {
    sigma: [f64; 2],
}

impl GaussianBlur {
    /// Build from a validated config.
    pub fn new(cfg: &BlurConfig) -> SynthResult<Self> {
        cfg.validate()?;
        Ok(Self { sigma: cfg.sigma })
    }
}

impl Effect for GaussianBlur {
    fn name(&self) -> &'static str {
        "blur"
    }

    fn apply(&self, src: &Raster, rng: &mut dyn RngCore) -> SynthResult<Raster> {
        let sigma = uniform_f64(rng, self.sigma) as f32;
        if sigma <= 0.0 || src.is_empty() {
            return Ok(src.clone());
        }
        let radius = (3.0 * sigma).ceil() as u32;
        let data = blur_rgba8_premul(&src.data, src.width, src.height, radius, sigma)?;
        Raster::from_rgba8_premul(src.width, src.height, data)
    }
}

pub(crate) fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> SynthResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SynthError::evaluation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(SynthError::evaluation(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    convolve_pass(src, &mut tmp, width, height, &kernel, Axis::Horizontal);
    convolve_pass(&tmp, &mut out, width, height, &kernel, Axis::Vertical);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> SynthResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(SynthError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(SynthError::evaluation("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    // fold the rounding residue into the center tap so the kernel sums to exactly 1.0
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn convolve_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as i32 - radius;
                let (sx, sy) = match axis {
                    Axis::Horizontal => ((x + d).clamp(0, w - 1), y),
                    Axis::Vertical => (x, (y + d).clamp(0, h - 1)),
                };
                let idx = ((sy * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
