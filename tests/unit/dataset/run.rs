use std::path::PathBuf;
use std::sync::Arc;

use super::*;
use crate::dataset::sink::InMemorySink;
use crate::foundation::core::{CountRange, Rgb8};
use crate::generator::config::GeneratorConfig;
use crate::generator::parts::{GeneratorParts, SamplerSet};
use crate::render::text::BlockTextRasterizer;
use crate::sampling::color::{ColorConfig, RgbSampler};
use crate::sampling::corpus::{CorpusConfig, LineCorpus};
use crate::sampling::font::{FontCatalog, FontConfig, PreparedFont};

fn samplers() -> SamplerSet {
    let fonts = vec![PreparedFont {
        family: "block".to_string(),
        path: PathBuf::from("block.ttf"),
        bytes: Arc::new(Vec::new()),
    }];
    let font_cfg = FontConfig {
        size: [10.0, 14.0],
        ..FontConfig::default()
    };
    SamplerSet {
        corpus: Arc::new(
            LineCorpus::from_lines(&CorpusConfig::default(), ["red", "green", "blue"]).unwrap(),
        ),
        font: Arc::new(FontCatalog::from_fonts(&font_cfg, fonts).unwrap()),
        color: Arc::new(RgbSampler::new(&ColorConfig::default()).unwrap()),
        bgcolor: Arc::new(RgbSampler::fixed(Rgb8::new(255, 255, 255))),
        texture: None,
    }
}

fn factory(cfg: GeneratorConfig) -> impl Fn() -> SynthResult<SampleGenerator> + Sync {
    let shared = samplers();
    move || {
        SampleGenerator::new(
            &cfg,
            GeneratorParts::with_rasterizer(shared.clone(), Box::new(BlockTextRasterizer)),
        )
    }
}

fn run(opts: &RunOpts) -> (InMemorySink, RunStats) {
    let mut sink = InMemorySink::new();
    let stats = generate_dataset(factory(GeneratorConfig::default()), &mut sink, opts).unwrap();
    (sink, stats)
}

#[test]
fn sequential_run_pushes_indices_in_order() {
    let opts = RunOpts {
        count: 10,
        start_index: 40,
        chunk_size: 3,
        ..RunOpts::default()
    };
    let (sink, stats) = run(&opts);
    let indices: Vec<u64> = sink.samples().iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, (40..50).collect::<Vec<_>>());
    assert_eq!(stats.samples_written, 10);
    assert!(sink.ended());
}

#[test]
fn parallel_matches_sequential_output() {
    let base = RunOpts {
        count: 24,
        seed: 99,
        chunk_size: 5,
        ..RunOpts::default()
    };
    let (seq, seq_stats) = run(&base);
    let (par, par_stats) = run(&RunOpts {
        parallel: true,
        threads: Some(3),
        chunk_size: 7,
        ..base.clone()
    });
    assert_eq!(seq_stats, par_stats);
    assert_eq!(seq.samples().len(), par.samples().len());
    for ((ia, a), (ib, b)) in seq.samples().iter().zip(par.samples()) {
        assert_eq!(ia, ib);
        assert_eq!(a.label, b.label);
        assert_eq!(a.image, b.image);
        assert_eq!(a.trace, b.trace);
    }
}

#[test]
fn index_sample_does_not_depend_on_start() {
    let (whole, _) = run(&RunOpts {
        count: 8,
        seed: 5,
        ..RunOpts::default()
    });
    let (tail, _) = run(&RunOpts {
        count: 3,
        start_index: 5,
        seed: 5,
        ..RunOpts::default()
    });
    for (i, s) in tail.samples() {
        let (_, w) = &whole.samples()[*i as usize];
        assert_eq!(w.label, s.label);
        assert_eq!(w.image, s.image);
    }
}

#[test]
fn stats_count_blank_samples() {
    let cfg = GeneratorConfig {
        count: CountRange::exactly(0).unwrap(),
        ..GeneratorConfig::default()
    };
    let mut sink = InMemorySink::new();
    let opts = RunOpts {
        count: 6,
        ..RunOpts::default()
    };
    let stats = generate_dataset(factory(cfg), &mut sink, &opts).unwrap();
    assert_eq!(
        stats,
        RunStats {
            samples_written: 6,
            blank_samples: 6,
            textured_samples: 0,
        }
    );
}

#[test]
fn zero_count_still_begins_and_ends_sink() {
    let (sink, stats) = run(&RunOpts::default());
    assert!(sink.samples().is_empty());
    assert!(sink.ended());
    assert_eq!(stats, RunStats::default());
}

#[test]
fn zero_threads_is_rejected() {
    assert!(matches!(
        build_thread_pool(Some(0)).unwrap_err(),
        SynthError::Validation(_)
    ));
    assert!(build_thread_pool(Some(2)).is_ok());
}

#[test]
fn factory_failure_aborts_before_sink_begins() {
    let mut sink = InMemorySink::new();
    let failing = || -> SynthResult<SampleGenerator> { Err(SynthError::sampling("no corpus")) };
    let opts = RunOpts {
        count: 3,
        ..RunOpts::default()
    };
    let err = generate_dataset(failing, &mut sink, &opts).unwrap_err();
    assert!(matches!(err, SynthError::Sampling(_)));
    assert!(!sink.ended());
}

#[test]
fn overflowing_index_range_is_rejected() {
    let mut sink = InMemorySink::new();
    let opts = RunOpts {
        count: 2,
        start_index: u64::MAX,
        ..RunOpts::default()
    };
    let err = generate_dataset(factory(GeneratorConfig::default()), &mut sink, &opts).unwrap_err();
    assert!(matches!(err, SynthError::Validation(_)));
}

#[test]
fn parallel_run_builds_one_generator_per_thread() {
    let builds = std::sync::atomic::AtomicUsize::new(0);
    let inner = factory(GeneratorConfig::default());
    let counting = || {
        builds.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        inner()
    };
    let mut sink = InMemorySink::new();
    let opts = RunOpts {
        count: 60,
        chunk_size: 4,
        parallel: true,
        threads: Some(2),
        ..RunOpts::default()
    };
    let stats = generate_dataset(counting, &mut sink, &opts).unwrap();
    assert_eq!(stats.samples_written, 60);
    // 15 chunks share the up-front generator plus at most one more per pool thread
    assert!(builds.load(std::sync::atomic::Ordering::SeqCst) <= 2);
}
