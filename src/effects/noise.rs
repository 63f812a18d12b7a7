use std::f64::consts::TAU;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::effects::gate::Effect;
use crate::foundation::error::SynthResult;
use crate::foundation::math::{chance, check_prob, check_range_f64, uniform_f64};
use crate::render::raster::Raster;

/// Additive Gaussian noise stage configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Activation probability.
    pub prob: f64,
    /// Inclusive standard deviation range, in 8-bit intensity units.
    pub scale: [f64; 2],
    /// Probability of drawing independent noise per color channel.
    pub per_channel: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            prob: 0.5,
            scale: [4.0, 8.0],
            per_channel: 0.5,
        }
    }
}

impl NoiseConfig {
    /// Check probabilities and the sigma range.
    pub fn validate(&self) -> SynthResult<()> {
        check_prob("postprocess.noise.prob", self.prob)?;
        check_prob("postprocess.noise.per_channel", self.per_channel)?;
        check_range_f64("postprocess.noise.scale", self.scale, 0.0, 255.0)
    }
}

/// Adds zero-mean Gaussian noise to the color channels.
#[derive(Clone, Debug)]
pub struct AdditiveGaussianNoise {
    scale: [f64; 2],
    per_channel: f64,
}

impl AdditiveGaussianNoise {
    /// Build from a validated config.
    pub fn new(cfg: &NoiseConfig) -> SynthResult<Self> {
        cfg.validate()?;
        Ok(Self {
            scale: cfg.scale,
            per_channel: cfg.per_channel,
        })
    }
}

impl Effect for AdditiveGaussianNoise {
    fn name(&self) -> &'static str {
        "noise"
    }

    fn apply(&self, src: &Raster, rng: &mut dyn RngCore) -> SynthResult<Raster> {
        let sigma = uniform_f64(rng, self.scale);
        let per_channel = chance(rng, self.per_channel);
        let mut out = src.clone();
        if sigma <= 0.0 {
            return Ok(out);
        }

        for px in out.data.chunks_exact_mut(4) {
            let a = f64::from(px[3]);
            let shared = sigma * standard_normal(rng);
            for c in px.iter_mut().take(3) {
                let n = if per_channel {
                    sigma * standard_normal(rng)
                } else {
                    shared
                };
                // premultiplied: color never exceeds alpha
                *c = (f64::from(*c) + n).round().clamp(0.0, a) as u8;
            }
        }
        Ok(out)
    }
}

/// Box-Muller standard normal draw.
fn standard_normal(rng: &mut dyn RngCore) -> f64 {
    let u1 = 1.0 - rng.r#gen::<f64>();
    let u2 = rng.r#gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/noise.rs"]
mod tests;
