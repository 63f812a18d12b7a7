//! Synthline generates synthetic labeled text-line images for training text-recognition models.
//!
//! Each sample is built by one pipeline:
//!
//! 1. **Sample**: draw a fragment count, texts, one shared font and per-fragment colors.
//! 2. **Lay out**: rasterize each fragment and arrange the group with a wrapping flow layout.
//! 3. **Compose**: build a background matching the group, optionally blend a texture into it,
//!    then flatten text over background.
//! 4. **Degrade**: run the gated effect chain (noise, blur, resample, median) over the result.
//! 5. **Persist**: write `images/<index / 1000>/<index>.jpg` and append `<path>\t<label>` to
//!    `gt.txt`.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Injected randomness**: every draw comes from a caller-provided [`rand::RngCore`]; dataset
//!   runs seed one stream per index, so output does not depend on thread count.
//! - **IO up front**: corpus, font and texture files are read when samplers are built.
//! - **Premultiplied RGBA8** end-to-end until JPEG encoding drops alpha.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod dataset;
mod effects;
mod foundation;
mod generator;
mod layers;
mod layout;
mod render;
mod sampling;

pub use dataset::run::{RunOpts, RunStats, build_thread_pool, generate_dataset, sample_rng};
pub use dataset::sink::{InMemorySink, SampleSink};
pub use dataset::writer::{
    DatasetWriter, JPEG_QUALITY, MANIFEST_FILE, ManifestEntry, SHARD_SIZE, check_label,
    image_rel_path,
};
pub use effects::blur::{BlurConfig, GaussianBlur};
pub use effects::chain::{EffectChain, PostprocessConfig};
pub use effects::gate::{Effect, Gate, GateState, Gated};
pub use effects::median::{MedianBlur, MedianConfig};
pub use effects::noise::{AdditiveGaussianNoise, NoiseConfig};
pub use effects::resample::{Resample, ResampleConfig};
pub use effects::texture::TextureApplicator;
pub use foundation::core::{CountRange, Point, Rect, Rgb8, Size, Vec2};
pub use foundation::error::{SynthError, SynthResult};
pub use foundation::math::sample_seed;
pub use generator::config::{DEFAULT_MAX_EXTENT_PX, GeneratorConfig};
pub use generator::parts::{GeneratorParts, SamplerSet};
pub use generator::sample::{Sample, SampleGenerator, SampleTrace};
pub use layers::layer::{Group, Layer, flatten};
pub use layout::flow::{FlowAlign, FlowLayout, FlowLayoutConfig};
pub use render::raster::Raster;
pub use render::text::{BlockTextRasterizer, ParleyRasterizer, TextRasterizer};
pub use sampling::color::{ColorConfig, ColorPick, RgbSampler};
pub use sampling::corpus::{CorpusConfig, LineCorpus, TextCase, TextPick};
pub use sampling::font::{FontCatalog, FontConfig, FontPick, FontSpec, PreparedFont};
pub use sampling::texture::{TextureCatalog, TextureConfig, TextureData, TexturePick};
pub use sampling::{ColorSampler, CorpusSampler, FontSampler, Sampler, TextureSampler};
