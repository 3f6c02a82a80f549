// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Concerns the batching engine depends on but does not own:
//
//   config_store.rs — DataConfig persistence
//                     Loads and saves the run configuration
//                     as JSON with serde_json.
//
//   fbank.rs        — Feature extraction
//                     Reads WAV files with hound and turns
//                     them into log-magnitude spectrogram
//                     frames with realfft. Implements the
//                     FeatureExtractor trait from Layer 3.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// DataConfig JSON persistence
pub mod config_store;

/// WAV → spectrogram feature extractor
pub mod fbank;
