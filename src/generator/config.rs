use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::effects::chain::PostprocessConfig;
use crate::foundation::core::CountRange;
use crate::foundation::error::{SynthError, SynthResult};
use crate::layout::flow::FlowLayoutConfig;
use crate::sampling::color::ColorConfig;
use crate::sampling::corpus::CorpusConfig;
use crate::sampling::font::FontConfig;
use crate::sampling::texture::TextureConfig;

/// Default cap on the arranged text extent along either axis.
pub const DEFAULT_MAX_EXTENT_PX: u32 = 16384;

/// Root generator configuration.
///
/// Every section defaults, so a partial JSON document (even `{}`) deserializes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Half-open range of text fragments per sample.
    pub count: CountRange,
    /// Text source.
    pub corpus: CorpusConfig,
    /// Font catalog.
    pub font: FontConfig,
    /// Foreground text colors.
    pub color: ColorConfig,
    /// Background colors.
    pub bgcolor: ColorConfig,
    /// Arrangement of text fragments.
    pub layout: FlowLayoutConfig,
    /// Background texture blending.
    pub texture: TextureConfig,
    /// Degradation chain applied to the flattened image.
    pub postprocess: PostprocessConfig,
    /// Largest accepted arranged extent in pixels.
    pub max_extent_px: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: CountRange::default(),
            corpus: CorpusConfig::default(),
            font: FontConfig::default(),
            color: ColorConfig::default(),
            bgcolor: ColorConfig::default(),
            layout: FlowLayoutConfig::default(),
            texture: TextureConfig::default(),
            postprocess: PostprocessConfig::default(),
            max_extent_px: DEFAULT_MAX_EXTENT_PX,
        }
    }
}

impl GeneratorConfig {
    /// Validate every section.
    pub fn validate(&self) -> SynthResult<()> {
        self.count.validate()?;
        self.corpus.validate()?;
        self.font.validate()?;
        self.color.validate()?;
        self.bgcolor.validate()?;
        self.layout.validate()?;
        self.texture.validate()?;
        self.postprocess.validate()?;
        if self.max_extent_px == 0 {
            return Err(SynthError::validation("max_extent_px must be > 0"));
        }
        Ok(())
    }

    /// Parse a JSON document and validate it.
    pub fn from_json_str(s: &str) -> SynthResult<Self> {
        let cfg: Self = serde_json::from_str(s).context("parse generator config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_path(path: &Path) -> SynthResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open generator config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse generator config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generator/config.rs"]
mod tests;
