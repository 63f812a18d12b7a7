use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::ImageEncoder as _;
use image::codecs::jpeg::JpegEncoder;
use rand::{Rng, RngCore};

use crate::dataset::sink::SampleSink;
use crate::foundation::error::{SynthError, SynthResult};
use crate::generator::sample::Sample;
use crate::render::raster::Raster;

/// Manifest file name under the dataset root.
pub const MANIFEST_FILE: &str = "gt.txt";
/// Images per shard directory.
pub const SHARD_SIZE: u64 = 1000;
/// JPEG quality is drawn uniformly from this half-open range per image.
pub const JPEG_QUALITY: std::ops::Range<u8> = 30..95;

/// Record of one persisted sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Dataset index.
    pub index: u64,
    /// Image path relative to the dataset root, always `/`-separated.
    pub image_path: String,
    /// Ground-truth label.
    pub label: String,
    /// JPEG quality the image was encoded with.
    pub quality: u8,
}

impl ManifestEntry {
    /// The manifest line, newline included.
    pub fn line(&self) -> String {
        format!("{}\t{}\n", self.image_path, self.label)
    }
}

/// Relative image path for `index`: `images/<index / 1000>/<index>.jpg`.
pub fn image_rel_path(index: u64) -> String {
    format!("images/{}/{index}.jpg", index / SHARD_SIZE)
}

/// Reject labels that would break the tab-separated, line-oriented manifest.
pub fn check_label(label: &str) -> SynthResult<()> {
    if let Some(c) = label.chars().find(|c| matches!(c, '\t' | '\r' | '\n')) {
        return Err(SynthError::label(format!(
            "label contains manifest delimiter {c:?}: {label:?}"
        )));
    }
    Ok(())
}

/// Writes sharded JPEG images and appends one manifest line per image.
///
/// The manifest handle lives from [`DatasetWriter::init`] until [`DatasetWriter::finalize`] (or
/// drop). Indices are taken as given; the writer neither reorders nor deduplicates.
#[derive(Debug)]
pub struct DatasetWriter {
    root: PathBuf,
    manifest: Option<File>,
    written: u64,
}

impl DatasetWriter {
    /// Create `root` if needed and open `root/gt.txt` for appending.
    #[tracing::instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn init(root: impl AsRef<Path>) -> SynthResult<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create dataset root '{}'", root.display()))?;
        let manifest_path = root.join(MANIFEST_FILE);
        let manifest = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&manifest_path)
            .with_context(|| format!("open manifest '{}'", manifest_path.display()))?;
        tracing::info!("dataset writer opened");
        Ok(Self {
            root,
            manifest: Some(manifest),
            written: 0,
        })
    }

    /// Dataset root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Samples written since `init`.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Persist `sample` as `index`; the manifest line is appended only after the image is on disk.
    pub fn write(
        &mut self,
        sample: &Sample,
        index: u64,
        rng: &mut dyn RngCore,
    ) -> SynthResult<ManifestEntry> {
        check_label(&sample.label)?;
        let manifest = self
            .manifest
            .as_mut()
            .ok_or_else(|| SynthError::validation("dataset writer is already finalized"))?;

        let quality = rng.gen_range(JPEG_QUALITY);
        let bytes = encode_jpeg(&sample.image, quality)?;

        let shard_dir = self
            .root
            .join("images")
            .join((index / SHARD_SIZE).to_string());
        std::fs::create_dir_all(&shard_dir)
            .with_context(|| format!("create shard dir '{}'", shard_dir.display()))?;
        let image_path = shard_dir.join(format!("{index}.jpg"));
        std::fs::write(&image_path, &bytes)
            .with_context(|| format!("write image '{}'", image_path.display()))?;

        let entry = ManifestEntry {
            index,
            image_path: image_rel_path(index),
            label: sample.label.clone(),
            quality,
        };
        manifest
            .write_all(entry.line().as_bytes())
            .with_context(|| format!("append to manifest in '{}'", self.root.display()))?;
        self.written += 1;
        Ok(entry)
    }

    /// Flush and close the manifest.
    pub fn finalize(mut self) -> SynthResult<u64> {
        self.close()?;
        Ok(self.written)
    }

    fn close(&mut self) -> SynthResult<()> {
        if let Some(mut manifest) = self.manifest.take() {
            manifest
                .flush()
                .with_context(|| format!("flush manifest in '{}'", self.root.display()))?;
            tracing::info!(written = self.written, "dataset writer closed");
        }
        Ok(())
    }
}

impl SampleSink for DatasetWriter {
    fn begin(&mut self) -> SynthResult<()> {
        if self.manifest.is_none() {
            return Err(SynthError::validation("dataset writer is already finalized"));
        }
        Ok(())
    }

    fn push_sample(
        &mut self,
        index: u64,
        sample: &Sample,
        rng: &mut dyn RngCore,
    ) -> SynthResult<()> {
        self.write(sample, index, rng).map(|_| ())
    }

    fn end(&mut self) -> SynthResult<()> {
        self.close()
    }
}

/// Encode the color channels of `image` as a JPEG, dropping alpha.
pub(crate) fn encode_jpeg(image: &Raster, quality: u8) -> SynthResult<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .with_context(|| format!("encode {}x{} jpeg", image.width, image.height))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/writer.rs"]
mod tests;
