//! Multi-corpus speech batch assembly.
//!
//! Merges per-corpus audio and label lists into one dense index per split,
//! maps phonetic labels through a fixed vocabulary, and yields padded
//! batches for a length-aware (CTC) training loop.
//!
//! ```text
//! vocab.txt ──→ VocabularyTable ─┐
//!                                ├→ BatchSampler ──→ Batch ──→ SpeechBatcher ──→ burn tensors
//! *.wav.lst ─┐                   │        ↑
//! *.txt ─────┴→ CorpusIndex ─────┘   FeatureExtractor
//! ```
//!
//! ## Layers
//!
//! - [`cli`] — `inspect` and `batches` subcommands
//! - [`application`] — end-to-end use case over a `DataConfig`
//! - [`domain`] — config, errors, splits, the extractor seam
//! - [`data`] — vocabulary, corpus index, padder, sampler, tensor hand-off
//! - [`infra`] — config storage and the reference spectrogram extractor

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;
