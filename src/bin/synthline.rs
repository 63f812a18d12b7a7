use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "synthline", version, about = "Generate a synthetic text-line image dataset")]
struct Cli {
    /// Generator config JSON; every section is optional.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset root; receives `images/` and `gt.txt`.
    #[arg(long)]
    out: PathBuf,

    /// Number of samples to write.
    #[arg(long, default_value_t = 1000)]
    count: u64,

    /// Run seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Index of the first sample (continue an existing dataset).
    #[arg(long, default_value_t = 0)]
    start_index: u64,

    /// Worker threads; 1 generates on the calling thread.
    #[arg(long)]
    workers: Option<usize>,

    /// Samples per scheduling chunk.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Log per-sample details.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let cfg = match &cli.config {
        Some(path) => synthline::GeneratorConfig::from_json_path(path)?,
        None => synthline::GeneratorConfig::default(),
    };
    let samplers = synthline::SamplerSet::load(&cfg).context("load generator inputs")?;
    let factory = || {
        synthline::SampleGenerator::new(&cfg, synthline::GeneratorParts::new(samplers.clone()))
    };

    let opts = synthline::RunOpts {
        count: cli.count,
        start_index: cli.start_index,
        seed: cli.seed,
        parallel: cli.workers != Some(1),
        chunk_size: cli.chunk_size,
        threads: cli.workers,
    };

    let mut writer = synthline::DatasetWriter::init(&cli.out)?;
    let stats = synthline::generate_dataset(factory, &mut writer, &opts)?;
    writer.finalize()?;

    eprintln!(
        "wrote {} samples ({} blank, {} textured) to {}",
        stats.samples_written,
        stats.blank_samples,
        stats.textured_samples,
        cli.out.display()
    );
    Ok(())
}
