pub(crate) mod color;
pub(crate) mod corpus;
pub(crate) mod font;
pub(crate) mod texture;

use std::sync::Arc;

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{SynthError, SynthResult};

/// Stochastic source split into a cheap draw and its materialization.
///
/// `sample` picks a descriptor using the injected random source; `data` turns a descriptor into the
/// value the generator consumes. `data` is deterministic for a given descriptor.
pub trait Sampler: Send + Sync {
    /// What a single draw records.
    type Descriptor: Clone + std::fmt::Debug;
    /// What a descriptor materializes into.
    type Output;

    /// Draw a descriptor.
    fn sample(&self, rng: &mut dyn RngCore) -> SynthResult<Self::Descriptor>;

    /// Materialize a previously drawn descriptor.
    fn data(&self, desc: &Self::Descriptor) -> SynthResult<Self::Output>;
}

/// Shared corpus sampler producing text strings.
pub type CorpusSampler = Arc<dyn Sampler<Descriptor = corpus::TextPick, Output = String>>;
/// Shared font sampler producing font specs.
pub type FontSampler = Arc<dyn Sampler<Descriptor = font::FontPick, Output = font::FontSpec>>;
/// Shared color sampler producing opaque RGB colors.
pub type ColorSampler = Arc<dyn Sampler<Descriptor = color::ColorPick, Output = Rgb8>>;
/// Shared texture sampler producing blendable textures.
pub type TextureSampler =
    Arc<dyn Sampler<Descriptor = texture::TexturePick, Output = texture::TextureData>>;

/// Pick an index in `0..n`, weighted when `weights` is non-empty.
pub(crate) fn pick_index(rng: &mut dyn RngCore, n: usize, weights: &[f64]) -> SynthResult<usize> {
    if n == 0 {
        return Err(SynthError::sampling("cannot pick from an empty set"));
    }
    if weights.is_empty() {
        return Ok(rng.gen_range(0..n));
    }
    let dist = WeightedIndex::new(weights)
        .map_err(|e| SynthError::validation(format!("invalid sampling weights: {e}")))?;
    Ok(dist.sample(rng))
}
