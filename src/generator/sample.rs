use rand::{Rng, RngCore};

use crate::effects::chain::EffectChain;
use crate::effects::gate::GateState;
use crate::effects::texture::TextureApplicator;
use crate::foundation::core::{CountRange, Point, Size};
use crate::foundation::error::SynthResult;
use crate::generator::config::GeneratorConfig;
use crate::generator::parts::{GeneratorParts, SamplerSet};
use crate::layers::layer::{Group, Layer, flatten};
use crate::layout::flow::FlowLayout;
use crate::render::raster::Raster;
use crate::render::text::TextRasterizer;
use crate::sampling::font::FontSpec;

/// What happened while producing one sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleTrace {
    /// Number of text fragments drawn.
    pub count: usize,
    /// Top-left of the arranged text group.
    pub group_topleft: Point,
    /// Top-left of the background layer.
    pub background_topleft: Point,
    /// Whether a texture was blended into the background.
    pub texture: GateState,
    /// Effect stages that fired, in execution order.
    pub effects: Vec<&'static str>,
}

/// One generated image with its ground-truth label.
#[derive(Clone, Debug)]
pub struct Sample {
    /// Flattened, post-processed image.
    pub image: Raster,
    /// Sampled texts joined by single spaces; empty for blank samples.
    pub label: String,
    /// Font used for every fragment.
    pub font: FontSpec,
    /// Generation record.
    pub trace: SampleTrace,
}

impl Sample {
    /// `true` when no text was drawn.
    pub fn is_blank(&self) -> bool {
        self.trace.count == 0
    }
}

/// Composes text fragments over a background and degrades the result.
pub struct SampleGenerator {
    count: CountRange,
    samplers: SamplerSet,
    rasterizer: Box<dyn TextRasterizer>,
    layout: FlowLayout,
    texture: TextureApplicator,
    chain: EffectChain,
}

impl std::fmt::Debug for SampleGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleGenerator")
            .field("count", &self.count)
            .field("layout", &self.layout)
            .field("texture", &self.texture)
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

impl SampleGenerator {
    /// Load every collaborator named by `cfg` and build a generator.
    #[tracing::instrument(skip_all)]
    pub fn from_config(cfg: &GeneratorConfig) -> SynthResult<Self> {
        cfg.validate()?;
        Self::new(cfg, GeneratorParts::load(cfg)?)
    }

    /// Build a generator over injected collaborators.
    ///
    /// Sampler sections of `cfg` are ignored in favor of `parts`; counts, layout, texture gate and
    /// post-processing still come from `cfg`.
    pub fn new(cfg: &GeneratorConfig, parts: GeneratorParts) -> SynthResult<Self> {
        cfg.validate()?;
        let GeneratorParts {
            samplers,
            rasterizer,
        } = parts;
        let texture = TextureApplicator::new(cfg.texture.prob, samplers.texture.clone())?;
        let generator = Self {
            count: cfg.count,
            layout: FlowLayout::new(&cfg.layout, cfg.max_extent_px)?,
            chain: EffectChain::from_config(&cfg.postprocess)?,
            texture,
            samplers,
            rasterizer,
        };
        tracing::debug!(generator = ?generator, "sample generator ready");
        Ok(generator)
    }

    /// Produce one sample, drawing every random decision from `rng`.
    pub fn generate(&mut self, rng: &mut dyn RngCore) -> SynthResult<Sample> {
        let count = rng.gen_range(self.count.min..self.count.max);

        let corpus = &self.samplers.corpus;
        let mut texts = Vec::with_capacity(count);
        for _ in 0..count {
            let pick = corpus.sample(rng)?;
            texts.push(corpus.data(&pick)?);
        }

        let font_pick = self.samplers.font.sample(rng)?;
        let font = self.samplers.font.data(&font_pick)?;

        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            let pick = self.samplers.color.sample(rng)?;
            colors.push(self.samplers.color.data(&pick)?);
        }

        let mut group = Group::default();
        for (text, color) in texts.iter().zip(colors) {
            let raster = self.rasterizer.rasterize(text, &font, color)?;
            group.layers.push(Layer::new(raster));
        }
        self.layout.apply(&mut group)?;

        let bg_pick = self.samplers.bgcolor.sample(rng)?;
        let bg_color = self.samplers.bgcolor.data(&bg_pick)?;
        let bg_size = if group.is_empty() {
            let side = f64::from(font.size_px).ceil().max(1.0);
            Size::new(side, side)
        } else {
            group.size()
        };
        let mut background = Layer::rect(bg_size, bg_color)?;
        background.topleft = group.topleft();

        let mut backgrounds = [background];
        let texture = self.texture.apply(&mut backgrounds, rng)?;
        let [background] = backgrounds;
        let background_topleft = background.topleft;

        let mut flat = [Layer::new(flatten(
            std::iter::once(&background).chain(group.layers.iter()),
        )?)];
        let effects = self.chain.apply(&mut flat, rng)?;
        let [flat] = flat;

        let label = texts.join(" ");
        tracing::debug!(
            count,
            label_len = label.len(),
            texture = ?texture,
            effects = ?effects,
            "generated sample"
        );

        Ok(Sample {
            image: flat.raster,
            label,
            font,
            trace: SampleTrace {
                count,
                group_topleft: group.topleft(),
                background_topleft,
                texture,
                effects,
            },
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generator/sample.rs"]
mod tests;
