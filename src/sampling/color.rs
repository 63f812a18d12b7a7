use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::math::{chance, check_prob};
use crate::sampling::Sampler;

/// RGB color sampler configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Inclusive `[min, max]` range for the red, green and blue channels.
    pub rgb: [[u8; 2]; 3],
    /// Probability of collapsing the drawn color to its luma.
    pub grayscale: f64,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            rgb: [[0, 255]; 3],
            grayscale: 0.0,
        }
    }
}

impl ColorConfig {
    /// Check channel ranges and the grayscale probability.
    pub fn validate(&self) -> SynthResult<()> {
        for (name, [lo, hi]) in ["r", "g", "b"].iter().zip(self.rgb) {
            if lo > hi {
                return Err(SynthError::validation(format!(
                    "color channel {name} range must satisfy min <= max (got [{lo}, {hi}])"
                )));
            }
        }
        check_prob("color.grayscale", self.grayscale)
    }
}

/// Drawn color descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorPick {
    /// Drawn channels.
    pub rgb: [u8; 3],
    /// Collapse to luma on materialization.
    pub grayscale: bool,
}

/// Independent per-channel uniform color sampler.
#[derive(Clone, Debug)]
pub struct RgbSampler {
    cfg: ColorConfig,
}

impl RgbSampler {
    /// Build a sampler from a validated config.
    pub fn new(cfg: &ColorConfig) -> SynthResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg: cfg.clone() })
    }

    /// Sampler that always yields `color`.
    pub fn fixed(color: Rgb8) -> Self {
        Self {
            cfg: ColorConfig {
                rgb: [[color.r; 2], [color.g; 2], [color.b; 2]],
                grayscale: 0.0,
            },
        }
    }
}

impl Sampler for RgbSampler {
    type Descriptor = ColorPick;
    type Output = Rgb8;

    fn sample(&self, rng: &mut dyn RngCore) -> SynthResult<ColorPick> {
        let mut rgb = [0u8; 3];
        for (c, [lo, hi]) in rgb.iter_mut().zip(self.cfg.rgb) {
            *c = rng.gen_range(lo..=hi);
        }
        let grayscale = chance(rng, self.cfg.grayscale);
        Ok(ColorPick { rgb, grayscale })
    }

    fn data(&self, desc: &ColorPick) -> SynthResult<Rgb8> {
        let [r, g, b] = desc.rgb;
        let color = Rgb8::new(r, g, b);
        Ok(if desc.grayscale {
            color.to_gray()
        } else {
            color
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/color.rs"]
mod tests;
