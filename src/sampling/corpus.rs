use std::path::PathBuf;

use anyhow::Context as _;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::math::{chance, check_prob, check_weights};
use crate::sampling::{Sampler, pick_index};

/// Case transform applied to drawn text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    /// All lowercase.
    Lower,
    /// All uppercase.
    Upper,
    /// First character uppercase, the rest lowercase.
    Capitalize,
}

impl TextCase {
    fn apply(self, text: &str) -> String {
        match self {
            Self::Lower => text.to_lowercase(),
            Self::Upper => text.to_uppercase(),
            Self::Capitalize => {
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.as_str().to_lowercase().chars())
                        .collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// Corpus configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// UTF-8 text files, one candidate per line.
    pub paths: Vec<PathBuf>,
    /// Relative weight per file; empty means uniform.
    pub weights: Vec<f64>,
    /// Minimum text length in characters (>= 1).
    pub min_length: usize,
    /// Maximum text length in characters; longer lines are cut to a random window.
    pub max_length: usize,
    /// Case transforms to choose from; empty leaves text unchanged.
    pub textcase: Vec<TextCase>,
    /// Probability of replacing the text with random characters from `augmentation_charset`.
    pub augmentation: f64,
    /// Characters used for augmentation.
    pub augmentation_charset: String,
    /// Inclusive length range of augmented text.
    pub augmentation_length: [usize; 2],
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            weights: Vec::new(),
            min_length: 1,
            max_length: 25,
            textcase: Vec::new(),
            augmentation: 0.0,
            augmentation_charset: "abcdefghijklmnopqrstuvwxyz0123456789".to_string(),
            augmentation_length: [1, 25],
        }
    }
}

impl CorpusConfig {
    /// Check ranges and probabilities.
    pub fn validate(&self) -> SynthResult<()> {
        if self.min_length == 0 || self.min_length > self.max_length {
            return Err(SynthError::validation(format!(
                "corpus length range must satisfy 1 <= min_length <= max_length (got {}..={})",
                self.min_length, self.max_length
            )));
        }
        check_prob("corpus.augmentation", self.augmentation)?;
        if self.augmentation > 0.0 {
            if self.augmentation_charset.is_empty() {
                return Err(SynthError::validation(
                    "corpus.augmentation_charset must be non-empty when augmentation > 0",
                ));
            }
            if has_delimiter(&self.augmentation_charset) {
                return Err(SynthError::validation(
                    "corpus.augmentation_charset must not contain tab or newline characters",
                ));
            }
            let [lo, hi] = self.augmentation_length;
            if lo == 0 || lo > hi {
                return Err(SynthError::validation(
                    "corpus.augmentation_length must satisfy 1 <= min <= max",
                ));
            }
        }
        check_weights("corpus.weights", &self.weights, self.paths.len())
    }
}

/// Drawn corpus descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextPick {
    /// Selected text after windowing, augmentation and case transforms.
    pub text: String,
}

/// Line-oriented text corpus.
#[derive(Clone, Debug)]
pub struct LineCorpus {
    cfg: CorpusConfig,
    sources: Vec<Vec<String>>,
    weights: Vec<f64>,
}

impl LineCorpus {
    /// Read every configured file.
    #[tracing::instrument(skip(cfg), fields(files = cfg.paths.len()))]
    pub fn load(cfg: &CorpusConfig) -> SynthResult<Self> {
        cfg.validate()?;
        let mut sources = Vec::with_capacity(cfg.paths.len());
        for path in &cfg.paths {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read corpus file '{}'", path.display()))?;
            sources.push(filter_lines(cfg, text.lines()));
        }
        Ok(Self::from_sources(cfg.clone(), sources))
    }

    /// Build a single-source corpus from in-memory lines.
    pub fn from_lines<I, S>(cfg: &CorpusConfig, lines: I) -> SynthResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = cfg.clone();
        cfg.paths.clear();
        cfg.weights.clear();
        cfg.validate()?;
        let owned: Vec<String> = lines.into_iter().map(|s| s.as_ref().to_string()).collect();
        let lines = filter_lines(&cfg, owned.iter().map(String::as_str));
        Ok(Self::from_sources(cfg, vec![lines]))
    }

    fn from_sources(cfg: CorpusConfig, sources: Vec<Vec<String>>) -> Self {
        let mut kept = Vec::with_capacity(sources.len());
        let mut weights = Vec::new();
        for (i, src) in sources.into_iter().enumerate() {
            if src.is_empty() {
                continue;
            }
            if let Some(w) = cfg.weights.get(i) {
                weights.push(*w);
            }
            kept.push(src);
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            weights.clear();
        }
        Self {
            cfg,
            sources: kept,
            weights,
        }
    }

    /// Number of candidate lines across all sources.
    pub fn len(&self) -> usize {
        self.sources.iter().map(Vec::len).sum()
    }

    /// `true` when no line survived filtering.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    fn window(&self, rng: &mut dyn RngCore, line: &str) -> String {
        let len = line.chars().count();
        if len <= self.cfg.max_length {
            return line.to_string();
        }
        let n = rng.gen_range(self.cfg.min_length..=self.cfg.max_length);
        let start = rng.gen_range(0..=len - n);
        line.chars().skip(start).take(n).collect()
    }

    fn augment(&self, rng: &mut dyn RngCore) -> String {
        let charset: Vec<char> = self.cfg.augmentation_charset.chars().collect();
        let [lo, hi] = self.cfg.augmentation_length;
        let n = rng.gen_range(lo..=hi);
        (0..n)
            .map(|_| charset[rng.gen_range(0..charset.len())])
            .collect()
    }
}

impl Sampler for LineCorpus {
    type Descriptor = TextPick;
    type Output = String;

    fn sample(&self, rng: &mut dyn RngCore) -> SynthResult<TextPick> {
        if self.sources.is_empty() {
            return Err(SynthError::sampling("corpus has no usable lines"));
        }
        let src = &self.sources[pick_index(rng, self.sources.len(), &self.weights)?];
        let line = &src[rng.gen_range(0..src.len())];

        let mut text = self.window(rng, line);
        if chance(rng, self.cfg.augmentation) {
            text = self.augment(rng);
        }
        if !self.cfg.textcase.is_empty() {
            let case = self.cfg.textcase[rng.gen_range(0..self.cfg.textcase.len())];
            text = case.apply(&text);
        }
        Ok(TextPick { text })
    }

    fn data(&self, desc: &TextPick) -> SynthResult<String> {
        Ok(desc.text.clone())
    }
}

fn has_delimiter(s: &str) -> bool {
    s.contains(['\t', '\n', '\r'])
}

fn filter_lines<'a>(cfg: &CorpusConfig, lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out = Vec::new();
    let mut skipped = 0usize;
    for line in lines {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if has_delimiter(line) || line.chars().count() < cfg.min_length {
            skipped += 1;
            continue;
        }
        out.push(line.to_string());
    }
    if skipped > 0 {
        tracing::warn!(skipped, "skipped corpus lines that are too short or contain tabs");
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/corpus.rs"]
mod tests;
