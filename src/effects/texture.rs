use rand::RngCore;

use crate::effects::composite::{crossfade, over};
use crate::effects::gate::{Gate, GateState};
use crate::foundation::error::{SynthError, SynthResult};
use crate::layers::layer::Layer;
use crate::render::raster::Raster;
use crate::sampling::TextureSampler;
use crate::sampling::texture::TextureData;

/// Gated blend of a sampled, tiled texture into background layers.
pub struct TextureApplicator {
    gate: Gate,
    sampler: Option<TextureSampler>,
}

impl std::fmt::Debug for TextureApplicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureApplicator")
            .field("gate", &self.gate)
            .field("has_sampler", &self.sampler.is_some())
            .finish()
    }
}

impl TextureApplicator {
    /// A positive probability requires a sampler.
    pub fn new(prob: f64, sampler: Option<TextureSampler>) -> SynthResult<Self> {
        let gate = Gate::new(prob)?;
        if prob > 0.0 && sampler.is_none() {
            return Err(SynthError::validation(
                "texture.prob > 0 requires at least one texture path",
            ));
        }
        Ok(Self { gate, sampler })
    }

    /// Applicator that never fires.
    pub fn disabled() -> Self {
        Self {
            gate: Gate::NEVER,
            sampler: None,
        }
    }

    /// Draw the gate and, when open, blend a freshly sampled texture into every layer.
    pub fn apply(&self, layers: &mut [Layer], rng: &mut dyn RngCore) -> SynthResult<GateState> {
        let state = self.gate.draw(rng);
        let (GateState::Open, Some(sampler)) = (state, self.sampler.as_ref()) else {
            return Ok(GateState::Closed);
        };
        for layer in layers {
            let pick = sampler.sample(rng)?;
            let tex = sampler.data(&pick)?;
            blend_tiled(&mut layer.raster, &tex)?;
        }
        Ok(GateState::Open)
    }
}

/// Weighted blend of `tex` tiled from its offset over `dst`, keeping `dst`'s coverage.
pub(crate) fn blend_tiled(dst: &mut Raster, tex: &TextureData) -> SynthResult<()> {
    let t = &tex.raster;
    if t.is_empty() {
        return Err(SynthError::evaluation("texture has no pixels"));
    }
    let (ox, oy) = tex.offset;
    for y in 0..dst.height {
        let ty = (y + oy) % t.height;
        for x in 0..dst.width {
            let tx = (x + ox) % t.width;
            let di = dst.index(x, y);
            let d = [
                dst.data[di],
                dst.data[di + 1],
                dst.data[di + 2],
                dst.data[di + 3],
            ];
            let mut out = crossfade(d, over(d, t.pixel(tx, ty), 1.0), tex.alpha);
            out[3] = d[3];
            for c in 0..3 {
                out[c] = out[c].min(d[3]);
            }
            dst.data[di..di + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/texture.rs"]
mod tests;
