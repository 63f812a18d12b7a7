use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::math::{chance, check_prob, check_range_f64, check_weights, uniform_f32};
use crate::sampling::{Sampler, pick_index};

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

/// Font catalog configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font files, or directories scanned (non-recursively) for `.ttf`, `.otf` and `.ttc` files.
    pub paths: Vec<PathBuf>,
    /// Relative weight per configured path; files found in a directory share its weight.
    pub weights: Vec<f64>,
    /// Inclusive font size range in pixels.
    pub size: [f32; 2],
    /// Probability of rendering bold.
    pub bold: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            weights: Vec::new(),
            size: [16.0, 48.0],
            bold: 0.0,
        }
    }
}

impl FontConfig {
    /// Check ranges and probabilities.
    pub fn validate(&self) -> SynthResult<()> {
        let [lo, hi] = self.size;
        check_range_f64("font.size", [f64::from(lo), f64::from(hi)], 1.0, 4096.0)?;
        check_prob("font.bold", self.bold)?;
        check_weights("font.weights", &self.weights, self.paths.len())
    }
}

/// Font bytes loaded up front.
#[derive(Clone)]
pub struct PreparedFont {
    /// Display name (file stem for fonts loaded from disk).
    pub family: String,
    /// Source path, empty for in-memory fonts.
    pub path: PathBuf,
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for PreparedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedFont")
            .field("family", &self.family)
            .field("path", &self.path)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Drawn font descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontPick {
    /// Index into the catalog.
    pub index: usize,
    /// Font size in pixels.
    pub size_px: f32,
    /// Bold weight requested.
    pub bold: bool,
}

/// Materialized font shared by every fragment of one sample.
#[derive(Clone)]
pub struct FontSpec {
    /// Display name.
    pub family: String,
    /// Source path, empty for in-memory fonts.
    pub path: PathBuf,
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Font size in pixels.
    pub size_px: f32,
    /// Bold weight requested.
    pub bold: bool,
}

impl FontSpec {
    /// Identity of the underlying font data, independent of size and weight.
    pub fn cache_key(&self) -> String {
        format!("{}|{}|{}", self.path.display(), self.family, self.bytes.len())
    }
}

impl std::fmt::Debug for FontSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSpec")
            .field("family", &self.family)
            .field("path", &self.path)
            .field("bytes_len", &self.bytes.len())
            .field("size_px", &self.size_px)
            .field("bold", &self.bold)
            .finish()
    }
}

/// Weighted catalog of fonts.
#[derive(Clone, Debug)]
pub struct FontCatalog {
    cfg: FontConfig,
    fonts: Vec<PreparedFont>,
    weights: Vec<f64>,
}

impl FontCatalog {
    /// Load every configured font file.
    #[tracing::instrument(skip(cfg), fields(paths = cfg.paths.len()))]
    pub fn load(cfg: &FontConfig) -> SynthResult<Self> {
        cfg.validate()?;
        let mut fonts = Vec::new();
        let mut weights = Vec::new();
        for (i, path) in cfg.paths.iter().enumerate() {
            let files = expand_font_path(path)?;
            if files.is_empty() {
                tracing::warn!(path = %path.display(), "font directory contains no font files");
                continue;
            }
            let share = cfg.weights.get(i).map(|w| w / files.len() as f64);
            for file in files {
                let bytes = std::fs::read(&file)
                    .with_context(|| format!("failed to read font '{}'", file.display()))?;
                let family = file
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                fonts.push(PreparedFont {
                    family,
                    path: file,
                    bytes: Arc::new(bytes),
                });
                if let Some(w) = share {
                    weights.push(w);
                }
            }
        }
        tracing::debug!(fonts = fonts.len(), "font catalog loaded");
        Ok(Self {
            cfg: cfg.clone(),
            fonts,
            weights,
        })
    }

    /// Build a uniformly weighted catalog from already loaded fonts.
    pub fn from_fonts(cfg: &FontConfig, fonts: Vec<PreparedFont>) -> SynthResult<Self> {
        let mut cfg = cfg.clone();
        cfg.paths.clear();
        cfg.weights.clear();
        cfg.validate()?;
        Ok(Self {
            cfg,
            fonts,
            weights: Vec::new(),
        })
    }

    /// Number of fonts in the catalog.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// `true` when no font is available.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl Sampler for FontCatalog {
    type Descriptor = FontPick;
    type Output = FontSpec;

    fn sample(&self, rng: &mut dyn RngCore) -> SynthResult<FontPick> {
        if self.fonts.is_empty() {
            return Err(SynthError::sampling("font catalog is empty"));
        }
        let index = pick_index(rng, self.fonts.len(), &self.weights)?;
        let size_px = uniform_f32(rng, self.cfg.size).round().max(1.0);
        let bold = chance(rng, self.cfg.bold);
        Ok(FontPick {
            index,
            size_px,
            bold,
        })
    }

    fn data(&self, desc: &FontPick) -> SynthResult<FontSpec> {
        let font = self.fonts.get(desc.index).ok_or_else(|| {
            SynthError::sampling(format!("font index {} is out of range", desc.index))
        })?;
        Ok(FontSpec {
            family: font.family.clone(),
            path: font.path.clone(),
            bytes: font.bytes.clone(),
            size_px: desc.size_px,
            bold: desc.bold,
        })
    }
}

fn expand_font_path(path: &Path) -> SynthResult<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let entries = std::fs::read_dir(path)
        .with_context(|| format!("failed to list font directory '{}'", path.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list '{}'", path.display()))?;
        let p = entry.path();
        let is_font = p
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if is_font && p.is_file() {
            files.push(p);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/font.rs"]
mod tests;
