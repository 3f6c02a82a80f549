// ============================================================
// Layer 3 — Data Errors
// ============================================================
// One typed error enum for everything below the application
// layer. Each variant maps onto one failure kind of the
// batching engine:
//
//   Parse             → malformed resource line
//   CountMismatch     → audio/label record counts disagree
//   MissingAudio      → label id without an audio record
//   UnknownToken/Id   → vocabulary lookup miss
//   KeyOutOfRange     → index key outside [0, size)
//   ResourceExhausted → resubstitution found nothing in bounds
//   Shape             → padder given an array it cannot hold
//
// The application layer wraps these in anyhow with context.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)
//            thiserror crate documentation

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::sample::Split;

pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("parse error in '{path}' line {line}: {reason}")]
    Parse {
        path:   PathBuf,
        line:   usize,
        reason: String,
    },

    #[error(
        "corpus '{corpus}' ({split}): {audio} audio records but {labels} label records"
    )]
    CountMismatch {
        corpus: String,
        split:  Split,
        audio:  usize,
        labels: usize,
    },

    #[error("corpus '{corpus}' ({split}): sample '{id}' has labels but no audio record")]
    MissingAudio {
        corpus: String,
        split:  Split,
        id:     String,
    },

    #[error("unknown vocabulary token '{0}'")]
    UnknownToken(String),

    #[error("unknown vocabulary id {0}")]
    UnknownId(u32),

    #[error("index key {key} out of range for split of size {size}")]
    KeyOutOfRange { key: usize, size: usize },

    #[error("no in-bounds sample found after {attempts} resample attempts")]
    ResourceExhausted { attempts: usize },

    #[error("shape: {0}")]
    Shape(String),

    #[error("config: {0}")]
    Config(String),

    #[error("feature extraction failed for '{path}': {reason}")]
    Feature { path: PathBuf, reason: String },

    #[error("io error on '{path}': {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    /// Wrap an io::Error with the path that caused it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
