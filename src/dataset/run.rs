use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::dataset::sink::SampleSink;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::math::sample_seed;
use crate::generator::sample::{Sample, SampleGenerator};

/// Index range, seeding and threading for a dataset run.
#[derive(Clone, Debug)]
pub struct RunOpts {
    /// Number of samples to produce.
    pub count: u64,
    /// Index of the first sample.
    pub start_index: u64,
    /// Run seed; each index derives its own stream from it.
    pub seed: u64,
    /// Generate chunks on a rayon pool when `true`.
    pub parallel: bool,
    /// Samples per scheduling chunk.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            count: 0,
            start_index: 0,
            seed: 0,
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Aggregated run counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Samples handed to the sink.
    pub samples_written: u64,
    /// Samples without text.
    pub blank_samples: u64,
    /// Samples whose background received a texture.
    pub textured_samples: u64,
}

impl RunStats {
    fn record(&mut self, sample: &Sample) {
        self.samples_written += 1;
        if sample.is_blank() {
            self.blank_samples += 1;
        }
        if sample.trace.texture.is_open() {
            self.textured_samples += 1;
        }
    }
}

/// Random stream for the sample at `index`, independent of scheduling.
pub fn sample_rng(seed: u64, index: u64) -> StdRng {
    StdRng::seed_from_u64(sample_seed(seed, index))
}

/// Generate `opts.count` samples starting at `opts.start_index` and push them to `sink` in index
/// order.
///
/// `factory` builds at most one generator per worker thread, reused for the whole run. Output
/// for a given `(seed, index)` does not depend on `parallel`, `chunk_size` or `threads`.
#[tracing::instrument(skip(factory, sink), fields(count = opts.count, start = opts.start_index))]
pub fn generate_dataset<F>(
    factory: F,
    sink: &mut dyn SampleSink,
    opts: &RunOpts,
) -> SynthResult<RunStats>
where
    F: Fn() -> SynthResult<SampleGenerator> + Sync,
{
    let end = opts
        .start_index
        .checked_add(opts.count)
        .ok_or_else(|| SynthError::validation("start_index + count overflows u64"))?;
    let chunk_size = normalized_chunk_size(opts.chunk_size);
    // surfaces construction errors before any worker starts
    let generator = factory()?;
    let mut workers = if opts.parallel {
        Workers::pooled(build_thread_pool(opts.threads)?, generator)
    } else {
        Workers::Inline(generator)
    };

    sink.begin()?;
    let mut stats = RunStats::default();
    let mut chunk_start = opts.start_index;
    while chunk_start < end {
        let chunk_end = chunk_start.saturating_add(chunk_size).min(end);
        let produced = match &mut workers {
            Workers::Inline(generator) => {
                generate_chunk_sequential(generator, chunk_start, chunk_end, opts.seed)?
            }
            Workers::Pooled { pool, slots } => {
                generate_chunk_parallel(&factory, pool, slots, chunk_start, chunk_end, opts.seed)?
            }
        };
        for (index, sample, mut rng) in produced {
            sink.push_sample(index, &sample, &mut rng)?;
            stats.record(&sample);
        }
        tracing::info!(
            done = chunk_end - opts.start_index,
            total = opts.count,
            "dataset chunk written"
        );
        chunk_start = chunk_end;
    }
    sink.end()?;
    Ok(stats)
}

/// Generators a run draws from: the caller's own, or one lazily built per pool thread.
enum Workers {
    Inline(SampleGenerator),
    Pooled {
        pool: rayon::ThreadPool,
        slots: Vec<Mutex<Option<SampleGenerator>>>,
    },
}

impl Workers {
    fn pooled(pool: rayon::ThreadPool, first: SampleGenerator) -> Self {
        let mut slots: Vec<Mutex<Option<SampleGenerator>>> = (0..pool.current_num_threads())
            .map(|_| Mutex::new(None))
            .collect();
        if let Some(slot) = slots.first_mut() {
            *slot = Mutex::new(Some(first));
        }
        Self::Pooled { pool, slots }
    }
}

fn generate_chunk_sequential(
    generator: &mut SampleGenerator,
    start: u64,
    end: u64,
    seed: u64,
) -> SynthResult<Vec<(u64, Sample, StdRng)>> {
    let mut out = Vec::with_capacity((end - start) as usize);
    for index in start..end {
        let mut rng = sample_rng(seed, index);
        let sample = generator.generate(&mut rng)?;
        out.push((index, sample, rng));
    }
    Ok(out)
}

fn generate_chunk_parallel<F>(
    factory: &F,
    pool: &rayon::ThreadPool,
    slots: &[Mutex<Option<SampleGenerator>>],
    start: u64,
    end: u64,
    seed: u64,
) -> SynthResult<Vec<(u64, Sample, StdRng)>>
where
    F: Fn() -> SynthResult<SampleGenerator> + Sync,
{
    let indices: Vec<u64> = (start..end).collect();
    let produced = pool.install(|| {
        indices
            .par_iter()
            .map(|&index| -> SynthResult<(u64, Sample, StdRng)> {
                // each pool thread owns one slot, so the lock is never contended
                let slot = rayon::current_thread_index()
                    .and_then(|i| slots.get(i))
                    .ok_or_else(|| SynthError::evaluation("dataset worker is outside its pool"))?;
                let mut guard = slot
                    .lock()
                    .map_err(|_| SynthError::evaluation("dataset worker generator is poisoned"))?;
                if guard.is_none() {
                    *guard = Some(factory()?);
                }
                let Some(generator) = guard.as_mut() else {
                    return Err(SynthError::evaluation("dataset worker has no generator"));
                };
                let mut rng = sample_rng(seed, index);
                let sample = generator.generate(&mut rng)?;
                Ok((index, sample, rng))
            })
            .collect::<Vec<_>>()
    });
    produced.into_iter().collect()
}

/// Rayon pool with an optional explicit size; zero threads is rejected.
pub fn build_thread_pool(threads: Option<usize>) -> SynthResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SynthError::validation(
            "dataset run 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SynthError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/run.rs"]
mod tests;
