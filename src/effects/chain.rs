use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::effects::blur::{BlurConfig, GaussianBlur};
use crate::effects::gate::{Effect, Gate, Gated};
use crate::effects::median::{MedianBlur, MedianConfig};
use crate::effects::noise::{AdditiveGaussianNoise, NoiseConfig};
use crate::effects::resample::{Resample, ResampleConfig};
use crate::foundation::error::SynthResult;
use crate::layers::layer::Layer;
use crate::render::raster::Raster;

/// Post-processing configuration, one section per stage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostprocessConfig {
    /// Additive Gaussian noise.
    pub noise: NoiseConfig,
    /// Gaussian blur.
    pub blur: BlurConfig,
    /// Down/up resampling.
    pub resample: ResampleConfig,
    /// Median blur.
    pub median: MedianConfig,
}

impl PostprocessConfig {
    /// Validate every stage.
    pub fn validate(&self) -> SynthResult<()> {
        self.noise.validate()?;
        self.blur.validate()?;
        self.resample.validate()?;
        self.median.validate()
    }

    /// Every stage switched off.
    pub fn disabled() -> Self {
        let mut cfg = Self::default();
        cfg.noise.prob = 0.0;
        cfg.blur.prob = 0.0;
        cfg.resample.prob = 0.0;
        cfg.median.prob = 0.0;
        cfg
    }
}

/// Ordered sequence of independently gated effects.
pub struct EffectChain {
    stages: Vec<Gated<Box<dyn Effect>>>,
}

impl std::fmt::Debug for EffectChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.stages
                    .iter()
                    .map(|s| (s.effect.name(), s.gate.prob())),
            )
            .finish()
    }
}

impl EffectChain {
    /// Chain over explicit stages, run in the given order.
    pub fn new(stages: Vec<Gated<Box<dyn Effect>>>) -> Self {
        Self { stages }
    }

    /// Noise, blur, resample, median; in that order.
    pub fn from_config(cfg: &PostprocessConfig) -> SynthResult<Self> {
        cfg.validate()?;
        let stage = |prob: f64, effect: Box<dyn Effect>| -> SynthResult<Gated<Box<dyn Effect>>> {
            Ok(Gated::new(Gate::new(prob)?, effect))
        };
        Ok(Self::new(vec![
            stage(cfg.noise.prob, Box::new(AdditiveGaussianNoise::new(&cfg.noise)?))?,
            stage(cfg.blur.prob, Box::new(GaussianBlur::new(&cfg.blur)?))?,
            stage(cfg.resample.prob, Box::new(Resample::new(&cfg.resample)?))?,
            stage(cfg.median.prob, Box::new(MedianBlur::new(&cfg.median)?))?,
        ]))
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.effect.name()).collect()
    }

    /// Run the chain over one raster; returns the stages that fired, in order.
    pub fn apply_raster(
        &self,
        raster: &mut Raster,
        rng: &mut dyn RngCore,
    ) -> SynthResult<Vec<&'static str>> {
        let mut fired = Vec::new();
        for stage in &self.stages {
            if stage.run(raster, rng)?.is_open() {
                fired.push(stage.effect.name());
            }
        }
        Ok(fired)
    }

    /// Run the chain over each layer with fresh gate draws per layer.
    pub fn apply(
        &self,
        layers: &mut [Layer],
        rng: &mut dyn RngCore,
    ) -> SynthResult<Vec<&'static str>> {
        let mut fired = Vec::new();
        for layer in layers {
            fired.extend(self.apply_raster(&mut layer.raster, rng)?);
        }
        Ok(fired)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/chain.rs"]
mod tests;
