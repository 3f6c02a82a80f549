// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All work is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `inspect` — index the corpora and print split sizes
//   2. `batches` — iterate one split and print batch shapes
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BatchesArgs, Commands, InspectArgs};

use crate::application::batch_use_case::BatchUseCase;
use crate::domain::config::DataConfig;
use crate::infra::config_store;

#[derive(Parser, Debug)]
#[command(
    name = "speech-batcher",
    version = "0.1.0",
    about = "Merge multi-corpus speech indexes and assemble padded CTC batches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Inspect(args) => run_inspect(args),
            Commands::Batches(args) => run_batches(args),
        }
    }
}

/// Load the JSON config if given, else fall back to the built-in layout.
fn resolve_config(path: Option<&str>, batch_size: Option<usize>) -> Result<DataConfig> {
    let mut config = match path {
        Some(p) => config_store::load_config(p)?,
        None => {
            tracing::info!("No --config given, using built-in corpus layout");
            DataConfig::default()
        }
    };
    if let Some(bs) = batch_size {
        config.batch_size = bs;
    }
    config.validate()?;
    Ok(config)
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), args.batch_size)?;
    if let Some(path) = &args.write_config {
        config_store::save_config(&config, path)?;
        tracing::info!("Resolved config written to {path}");
    }
    let use_case = BatchUseCase::new(config);

    for summary in use_case.summarize()? {
        println!(
            "{:<5} samples={:<8} batches={:<6} (batch_size={})",
            summary.split,
            summary.samples,
            summary.batch_count,
            summary.batch_size
        );
        for (corpus, n) in &summary.corpus_sizes {
            println!("      {corpus:<12} {n}");
        }
    }
    Ok(())
}

fn run_batches(args: BatchesArgs) -> Result<()> {
    let mut config = resolve_config(args.config.as_deref(), args.batch_size)?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let split    = args.split.into();
    let use_case = BatchUseCase::new(config);
    let report   = use_case.execute(split, !args.no_shuffle, args.limit)?;

    for (i, shapes) in report.batches.iter().enumerate() {
        println!(
            "{:>5}/{} {:?} {:?} {:?} {:?} {:?}",
            i + 1,
            report.expected,
            shapes.audio,
            shapes.labels,
            shapes.input_lengths,
            shapes.label_lengths,
            shapes.targets
        );
    }
    println!(
        "\n{}: {} batches, {} samples",
        report.split,
        report.batches.len(),
        report.samples
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::Split;

    #[test]
    fn test_parse_batches_command() {
        let cli = Cli::try_parse_from([
            "speech-batcher", "batches", "--split", "dev", "--no-shuffle", "--limit", "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Batches(args) => {
                assert_eq!(Split::from(args.split), Split::Dev);
                assert!(args.no_shuffle);
                assert_eq!(args.limit, Some(3));
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_inspect_write_config() {
        let cli = Cli::try_parse_from([
            "speech-batcher", "inspect", "--batch-size", "8", "--write-config", "out.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Inspect(args) => {
                assert_eq!(args.batch_size, Some(8));
                assert_eq!(args.write_config.as_deref(), Some("out.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_batch_size_override_validated() {
        assert!(resolve_config(None, Some(0)).is_err());
        assert_eq!(resolve_config(None, Some(4)).unwrap().batch_size, 4);
    }
}
