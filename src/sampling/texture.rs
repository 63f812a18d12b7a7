use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context as _;
use lru::LruCache;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::math::{chance, check_prob, check_range_f64, check_weights, uniform_f32};
use crate::render::raster::Raster;
use crate::sampling::{Sampler, pick_index};

/// Background texture configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Probability that a texture is blended into the background.
    pub prob: f64,
    /// Texture image files (any format the `image` crate decodes).
    pub paths: Vec<PathBuf>,
    /// Relative weight per file; empty means uniform.
    pub weights: Vec<f64>,
    /// Inclusive blend weight range in `[0, 1]`.
    pub alpha: [f32; 2],
    /// Probability of converting the texture to grayscale.
    pub grayscale: f64,
    /// Inclusive texture scale factor range.
    pub scale: [f32; 2],
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            prob: 0.0,
            paths: Vec::new(),
            weights: Vec::new(),
            alpha: [1.0, 1.0],
            grayscale: 0.0,
            scale: [1.0, 1.0],
        }
    }
}

impl TextureConfig {
    /// Check ranges and probabilities.
    pub fn validate(&self) -> SynthResult<()> {
        check_prob("texture.prob", self.prob)?;
        check_prob("texture.grayscale", self.grayscale)?;
        let [a0, a1] = self.alpha;
        check_range_f64("texture.alpha", [f64::from(a0), f64::from(a1)], 0.0, 1.0)?;
        let [s0, s1] = self.scale;
        check_range_f64("texture.scale", [f64::from(s0), f64::from(s1)], 0.01, 64.0)?;
        check_weights("texture.weights", &self.weights, self.paths.len())
    }
}

/// Drawn texture descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TexturePick {
    /// Index into the catalog.
    pub index: usize,
    /// Blend weight.
    pub alpha: f32,
    /// Convert to grayscale.
    pub grayscale: bool,
    /// Scale factor applied before tiling.
    pub scale: f32,
    /// Tiling phase as fractions of the scaled texture size, each in `[0, 1)`.
    pub phase: [f32; 2],
}

/// Scaled rasters kept per catalog; scale draws map to a bounded set of pixel sizes.
const SCALED_CACHE_ENTRIES: usize = 64;

type ScaledKey = (usize, u32, u32);

/// Texture ready to be tiled over a layer.
#[derive(Clone, Debug)]
pub struct TextureData {
    /// Scaled (and possibly grayscale) texture pixels, shared with the catalog's cache.
    pub raster: Arc<Raster>,
    /// Blend weight.
    pub alpha: f32,
    /// Pixel offset of the tiling origin.
    pub offset: (u32, u32),
}

/// Weighted catalog of decoded textures.
#[derive(Debug)]
pub struct TextureCatalog {
    cfg: TextureConfig,
    textures: Vec<Arc<Raster>>,
    scaled: Mutex<LruCache<ScaledKey, Arc<Raster>>>,
}

impl TextureCatalog {
    /// Decode every configured texture file.
    #[tracing::instrument(skip(cfg), fields(paths = cfg.paths.len()))]
    pub fn load(cfg: &TextureConfig) -> SynthResult<Self> {
        cfg.validate()?;
        let mut textures = Vec::with_capacity(cfg.paths.len());
        for path in &cfg.paths {
            let img = image::open(path)
                .with_context(|| format!("failed to decode texture '{}'", path.display()))?
                .to_rgba8();
            let (w, h) = img.dimensions();
            textures.push(Arc::new(Raster::from_rgba8_straight(w, h, img.into_raw())?));
        }
        Ok(Self::with_textures(cfg.clone(), textures))
    }

    /// Build a uniformly weighted catalog from in-memory rasters.
    pub fn from_rasters(cfg: &TextureConfig, rasters: Vec<Raster>) -> SynthResult<Self> {
        let mut cfg = cfg.clone();
        cfg.paths.clear();
        cfg.weights.clear();
        cfg.validate()?;
        Ok(Self::with_textures(
            cfg,
            rasters.into_iter().map(Arc::new).collect(),
        ))
    }

    fn with_textures(cfg: TextureConfig, textures: Vec<Arc<Raster>>) -> Self {
        let entries = NonZeroUsize::new(SCALED_CACHE_ENTRIES).unwrap_or(NonZeroUsize::MIN);
        Self {
            cfg,
            textures,
            scaled: Mutex::new(LruCache::new(entries)),
        }
    }

    /// Scaled rasters currently cached.
    pub fn cached_scales(&self) -> usize {
        self.scaled.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn scaled(&self, index: usize, src: &Arc<Raster>, w: u32, h: u32) -> SynthResult<Arc<Raster>> {
        if (w, h) == (src.width, src.height) {
            return Ok(Arc::clone(src));
        }
        let key = (index, w, h);
        let mut cache = self
            .scaled
            .lock()
            .map_err(|_| SynthError::evaluation("texture cache lock is poisoned"))?;
        if let Some(hit) = cache.get(&key) {
            return Ok(Arc::clone(hit));
        }
        let resized = image::imageops::resize(
            &src.to_rgba_image()?,
            w,
            h,
            image::imageops::FilterType::Triangle,
        );
        let raster = Arc::new(Raster::from_rgba_image(resized)?);
        cache.put(key, Arc::clone(&raster));
        Ok(raster)
    }
}

impl Sampler for TextureCatalog {
    type Descriptor = TexturePick;
    type Output = TextureData;

    fn sample(&self, rng: &mut dyn RngCore) -> SynthResult<TexturePick> {
        if self.textures.is_empty() {
            return Err(SynthError::sampling("texture catalog is empty"));
        }
        let index = pick_index(rng, self.textures.len(), &self.cfg.weights)?;
        let alpha = uniform_f32(rng, self.cfg.alpha);
        let grayscale = chance(rng, self.cfg.grayscale);
        let scale = uniform_f32(rng, self.cfg.scale);
        let phase = [rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)];
        Ok(TexturePick {
            index,
            alpha,
            grayscale,
            scale,
            phase,
        })
    }

    fn data(&self, desc: &TexturePick) -> SynthResult<TextureData> {
        let src = self.textures.get(desc.index).ok_or_else(|| {
            SynthError::sampling(format!("texture index {} is out of range", desc.index))
        })?;
        if src.is_empty() {
            return Err(SynthError::sampling("texture has no pixels"));
        }

        let w = ((src.width as f32) * desc.scale).round().max(1.0) as u32;
        let h = ((src.height as f32) * desc.scale).round().max(1.0) as u32;
        let mut raster = self.scaled(desc.index, src, w, h)?;

        if desc.grayscale {
            for px in Arc::make_mut(&mut raster).data.chunks_exact_mut(4) {
                let y = Rgb8::new(px[0], px[1], px[2]).luma();
                px[0] = y;
                px[1] = y;
                px[2] = y;
            }
        }

        let offset = (
            ((desc.phase[0] * raster.width as f32) as u32).min(raster.width - 1),
            ((desc.phase[1] * raster.height as f32) as u32).min(raster.height - 1),
        );
        Ok(TextureData {
            raster,
            alpha: desc.alpha,
            offset,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/texture.rs"]
mod tests;
