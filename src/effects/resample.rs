use image::imageops::{self, FilterType};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::effects::gate::Effect;
use crate::foundation::error::SynthResult;
use crate::foundation::math::{check_prob, check_range_f64, uniform_f64};
use crate::render::raster::Raster;

/// Down/up resampling stage configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Activation probability.
    pub prob: f64,
    /// Inclusive scale factor range for the intermediate image.
    pub size: [f64; 2],
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            prob: 0.5,
            size: [0.4, 1.0],
        }
    }
}

impl ResampleConfig {
    /// Check the probability and factor range.
    pub fn validate(&self) -> SynthResult<()> {
        check_prob("postprocess.resample.prob", self.prob)?;
        check_range_f64("postprocess.resample.size", self.size, 0.01, 1.0)
    }
}

/// Shrinks the image by a random factor and scales it back, losing detail.
#[derive(Clone, Debug)]
pub struct Resample {
    size: [f64; 2],
}

impl Resample {
    /// Build from a validated config.
    pub fn new(cfg: &ResampleConfig) -> SynthResult<Self> {
        cfg.validate()?;
        Ok(Self { size: cfg.size })
    }
}

impl Effect for Resample {
    fn name(&self) -> &'static str {
        "resample"
    }

    fn apply(&self, src: &Raster, rng: &mut dyn RngCore) -> SynthResult<Raster> {
        let factor = uniform_f64(rng, self.size);
        if src.is_empty() {
            return Ok(src.clone());
        }
        let w = (f64::from(src.width) * factor).round().max(1.0) as u32;
        let h = (f64::from(src.height) * factor).round().max(1.0) as u32;
        if (w, h) == (src.width, src.height) {
            return Ok(src.clone());
        }

        let small = imageops::resize(&src.to_rgba_image()?, w, h, FilterType::Triangle);
        let back = imageops::resize(&small, src.width, src.height, FilterType::Triangle);
        Raster::from_rgba_image(back)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/resample.rs"]
mod tests;
