use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::effects::gate::Effect;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::math::{check_prob, uniform_u32};
use crate::render::raster::Raster;

/// Median blur stage configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedianConfig {
    /// Activation probability.
    pub prob: f64,
    /// Inclusive window radius range; the window is `(2k + 1)` pixels square.
    pub k: [u32; 2],
}

impl Default for MedianConfig {
    fn default() -> Self {
        Self {
            prob: 0.5,
            k: [1, 1],
        }
    }
}

impl MedianConfig {
    /// Check the probability and radius range.
    pub fn validate(&self) -> SynthResult<()> {
        check_prob("postprocess.median.prob", self.prob)?;
        let [lo, hi] = self.k;
        if lo > hi || hi > 16 {
            return Err(SynthError::validation(format!(
                "postprocess.median.k must be an ordered range within [0, 16] (got [{lo}, {hi}])"
            )));
        }
        Ok(())
    }
}

/// Per-channel median over a square window, with edges clamped.
#[derive(Clone, Debug)]
pub struct MedianBlur {
    k: [u32; 2],
}

impl MedianBlur {
    /// Build from a validated config.
    pub fn new(cfg: &MedianConfig) -> SynthResult<Self> {
        cfg.validate()?;
        Ok(Self { k: cfg.k })
    }
}

impl Effect for MedianBlur {
    fn name(&self) -> &'static str {
        "median"
    }

    fn apply(&self, src: &Raster, rng: &mut dyn RngCore) -> SynthResult<Raster> {
        let k = uniform_u32(rng, self.k);
        if k == 0 || src.is_empty() {
            return Ok(src.clone());
        }

        let r = k as i64;
        let w = i64::from(src.width);
        let h = i64::from(src.height);
        let mut out = src.clone();
        let mut window = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
        for y in 0..h {
            for x in 0..w {
                let oi = out.index(x as u32, y as u32);
                for c in 0..4 {
                    window.clear();
                    for dy in -r..=r {
                        let sy = (y + dy).clamp(0, h - 1) as u32;
                        for dx in -r..=r {
                            let sx = (x + dx).clamp(0, w - 1) as u32;
                            window.push(src.data[src.index(sx, sy) + c]);
                        }
                    }
                    let mid = window.len() / 2;
                    out.data[oi + c] = *window.select_nth_unstable(mid).1;
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/median.rs"]
mod tests;
