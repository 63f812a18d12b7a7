/// Convenience result type used across synthline.
pub type SynthResult<T> = Result<T, SynthError>;

/// Top-level error taxonomy used by generator and dataset APIs.
///
/// Every variant is fatal to the sample being produced; callers own any retry or skip policy.
#[derive(thiserror::Error, Debug)]
pub enum SynthError {
    /// Invalid configuration or caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A sampler had no valid draw (empty corpus, empty font catalog, ...).
    #[error("sampling error: {0}")]
    Sampling(String),

    /// Text fragments could not be arranged within the configured constraints.
    #[error("layout error: {0}")]
    Layout(String),

    /// Raster or effect invariant violated while producing pixels.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// A label would corrupt the tab-separated manifest.
    #[error("label error: {0}")]
    Label(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SynthError {
    /// Build a [`SynthError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SynthError::Sampling`] value.
    pub fn sampling(msg: impl Into<String>) -> Self {
        Self::Sampling(msg.into())
    }

    /// Build a [`SynthError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`SynthError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`SynthError::Label`] value.
    pub fn label(msg: impl Into<String>) -> Self {
        Self::Label(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
