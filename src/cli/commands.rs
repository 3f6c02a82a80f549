// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `inspect` and `batches`
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::domain::sample::Split;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index every split and print sample and batch counts
    Inspect(InspectArgs),

    /// Iterate one split's batches and print their shapes
    Batches(BatchesArgs),
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// JSON DataConfig; built-in corpus layout when omitted
    #[arg(long)]
    pub config: Option<String>,

    /// Override the configured batch size
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Save the resolved config (overrides applied) as JSON
    #[arg(long)]
    pub write_config: Option<String>,
}

#[derive(Args, Debug)]
pub struct BatchesArgs {
    /// JSON DataConfig; built-in corpus layout when omitted
    #[arg(long)]
    pub config: Option<String>,

    /// Which split to iterate
    #[arg(long, value_enum, default_value_t = SplitArg::Train)]
    pub split: SplitArg,

    /// Walk samples in index order instead of shuffling
    #[arg(long)]
    pub no_shuffle: bool,

    /// Stop after this many batches
    #[arg(long)]
    pub limit: Option<usize>,

    /// Seed for the shuffle and resubstitution draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the configured batch size
    #[arg(long)]
    pub batch_size: Option<usize>,
}

/// clap-facing mirror of Split so the domain layer never sees clap types
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitArg {
    Train,
    Dev,
    Test,
}

impl From<SplitArg> for Split {
    fn from(a: SplitArg) -> Self {
        match a {
            SplitArg::Train => Split::Train,
            SplitArg::Dev   => Split::Dev,
            SplitArg::Test  => Split::Test,
        }
    }
}
