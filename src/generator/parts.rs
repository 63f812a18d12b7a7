use std::sync::Arc;

use crate::foundation::error::SynthResult;
use crate::generator::config::GeneratorConfig;
use crate::render::text::{ParleyRasterizer, TextRasterizer};
use crate::sampling::color::RgbSampler;
use crate::sampling::corpus::LineCorpus;
use crate::sampling::font::FontCatalog;
use crate::sampling::texture::TextureCatalog;
use crate::sampling::{ColorSampler, CorpusSampler, FontSampler, TextureSampler};

/// Samplers shared between generators; cloning only bumps reference counts.
#[derive(Clone)]
pub struct SamplerSet {
    /// Text fragments.
    pub corpus: CorpusSampler,
    /// One font per sample.
    pub font: FontSampler,
    /// Foreground color per fragment.
    pub color: ColorSampler,
    /// Background color.
    pub bgcolor: ColorSampler,
    /// Background textures; `None` when no texture files are configured.
    pub texture: Option<TextureSampler>,
}

impl std::fmt::Debug for SamplerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplerSet")
            .field("texture", &self.texture.is_some())
            .finish_non_exhaustive()
    }
}

impl SamplerSet {
    /// Read corpus, font and texture files named by `cfg`.
    #[tracing::instrument(skip_all)]
    pub fn load(cfg: &GeneratorConfig) -> SynthResult<Self> {
        let texture: Option<TextureSampler> = if cfg.texture.paths.is_empty() {
            None
        } else {
            Some(Arc::new(TextureCatalog::load(&cfg.texture)?))
        };
        Ok(Self {
            corpus: Arc::new(LineCorpus::load(&cfg.corpus)?),
            font: Arc::new(FontCatalog::load(&cfg.font)?),
            color: Arc::new(RgbSampler::new(&cfg.color)?),
            bgcolor: Arc::new(RgbSampler::new(&cfg.bgcolor)?),
            texture,
        })
    }
}

/// Collaborators a [`crate::SampleGenerator`] draws from.
pub struct GeneratorParts {
    /// Stochastic sources.
    pub samplers: SamplerSet,
    /// Turns text fragments into rasters. Owned per generator since it caches shaping state.
    pub rasterizer: Box<dyn TextRasterizer>,
}

impl GeneratorParts {
    /// Load samplers from disk and pair them with a Parley rasterizer.
    pub fn load(cfg: &GeneratorConfig) -> SynthResult<Self> {
        Ok(Self::new(SamplerSet::load(cfg)?))
    }

    /// Parts over `samplers` with a fresh Parley rasterizer.
    pub fn new(samplers: SamplerSet) -> Self {
        Self::with_rasterizer(samplers, Box::new(ParleyRasterizer::new()))
    }

    /// Parts over `samplers` with a caller-provided rasterizer.
    pub fn with_rasterizer(samplers: SamplerSet, rasterizer: Box<dyn TextRasterizer>) -> Self {
        Self {
            samplers,
            rasterizer,
        }
    }
}
