// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from per-corpus record lists all the way to
// padded tensor batches.
//
// The pipeline flows in this order:
//
//   *.wav.lst / *.syllabel.txt
//       │
//       ▼
//   records           → parses each corpus' id→path / id→tokens lists
//       │
//       ▼
//   CorpusIndex       → merges corpora into one dense 0..N index per split
//       │
//       ▼
//   BatchSampler      → shuffles, extracts features, maps tokens through
//       │               the VocabularyTable, rejects oversized samples
//       ▼
//   padder            → pads audio and labels to fixed shapes
//       │
//       ▼
//   SpeechBatcher     → hands burn tensors to the training loop
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §13 (Iterators and Closures)

/// Parses corpus record lists
pub mod records;

/// token ↔ id table for phonetic labels
pub mod vocabulary;

/// Multi-corpus dense index per split
pub mod corpus_index;

/// Audio and label padding
pub mod padder;

/// Shuffled batch sampling with oversize resubstitution
pub mod sampler;

/// Converts padded batches into burn tensors
pub mod batcher;
