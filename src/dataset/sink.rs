use rand::RngCore;

use crate::foundation::error::SynthResult;
use crate::generator::sample::Sample;

/// Consumer of generated samples.
///
/// Ordering contract: `push_sample` is called with strictly increasing indices between one `begin`
/// and the matching `end`.
pub trait SampleSink: Send {
    /// Called once before any sample is pushed.
    fn begin(&mut self) -> SynthResult<()>;
    /// Consume one sample. `rng` is the sample's own random stream, continued after generation.
    fn push_sample(&mut self, index: u64, sample: &Sample, rng: &mut dyn RngCore)
    -> SynthResult<()>;
    /// Called once after the last sample.
    fn end(&mut self) -> SynthResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    samples: Vec<(u64, Sample)>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured samples with their indices, in push order.
    pub fn samples(&self) -> &[(u64, Sample)] {
        &self.samples
    }

    /// `true` once `end` has been called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl SampleSink for InMemorySink {
    fn begin(&mut self) -> SynthResult<()> {
        self.samples.clear();
        self.ended = false;
        Ok(())
    }

    fn push_sample(
        &mut self,
        index: u64,
        sample: &Sample,
        _rng: &mut dyn RngCore,
    ) -> SynthResult<()> {
        self.samples.push((index, sample.clone()));
        Ok(())
    }

    fn end(&mut self) -> SynthResult<()> {
        self.ended = true;
        Ok(())
    }
}
