// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums, and traits describing what the
// batching engine works with:
//
//   config.rs → DataConfig: corpora, splits, dimensions
//   sample.rs → Split and IndexEntry
//   error.rs  → DataError taxonomy
//   traits.rs → FeatureExtractor seam
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Immutable run configuration
pub mod config;

/// Typed errors for the data pipeline
pub mod error;

/// Split and index entry types
pub mod sample;

/// Feature extraction abstraction
pub mod traits;
