// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The batching engine never decodes audio itself. It asks a
// FeatureExtractor to turn an audio path into a 2-D
// [time, feature_dim] array and only cares about the shape.
//
// Implementations:
//   - SpectrogramExtractor → log-magnitude FFT frames of a WAV
//   - any Fn(&Path) -> Result<Array2<f32>> closure (tests, stubs)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use ndarray::Array2;

use crate::domain::error::Result;

// ─── FeatureExtractor ─────────────────────────────────────────────────────────
/// Maps an audio file to its `[time, feature_dim]` feature matrix.
pub trait FeatureExtractor {
    fn extract(&self, path: &Path) -> Result<Array2<f32>>;
}

impl<F> FeatureExtractor for F
where
    F: Fn(&Path) -> Result<Array2<f32>>,
{
    fn extract(&self, path: &Path) -> Result<Array2<f32>> {
        self(path)
    }
}
