// ============================================================
// Layer 2 — BatchUseCase
// ============================================================
// Orchestrates the batching pipeline in order:
//
//   Step 1: Load vocabulary            (Layer 4 - data)
//   Step 2: Build per-split indexes    (Layer 4 - data)
//   Step 3: Build feature extractor    (Layer 6 - infra)
//   Step 4: Iterate batches            (Layer 4 - data)
//   Step 5: Hand batches to burn       (Layer 4 - data)
//
// The use case reports shapes rather than training; whatever
// consumes SpeechBatch downstream is outside this crate.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use burn::backend::NdArray;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::data::{
    batcher::{SpeechBatch, SpeechBatcher},
    corpus_index::CorpusIndex,
    sampler::BatchSampler,
    vocabulary::VocabularyTable,
};
use crate::domain::{config::DataConfig, sample::Split, traits::FeatureExtractor};
use crate::infra::fbank::SpectrogramExtractor;

type HandoffBackend = NdArray;

// ─── Reports ──────────────────────────────────────────────────────────────────
/// Shapes of one yielded batch, in the order the model receives them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchShapes {
    pub audio:         [usize; 4],
    pub labels:        [usize; 2],
    pub input_lengths: [usize; 2],
    pub label_lengths: [usize; 2],
    pub targets:       [usize; 2],
}

impl BatchShapes {
    fn of<B: burn::prelude::Backend>(batch: &SpeechBatch<B>) -> Self {
        Self {
            audio:         batch.audio.dims(),
            labels:        batch.labels.dims(),
            input_lengths: batch.input_lengths.dims(),
            label_lengths: batch.label_lengths.dims(),
            targets:       batch.targets.dims(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub split:    Split,
    pub expected: usize,
    pub samples:  usize,
    pub batches:  Vec<BatchShapes>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    pub split:        Split,
    pub samples:      usize,
    pub batch_size:   usize,
    pub batch_count:  usize,
    pub corpus_sizes: Vec<(String, usize)>,
}

// ─── BatchUseCase ─────────────────────────────────────────────────────────────
pub struct BatchUseCase {
    config: DataConfig,
}

impl BatchUseCase {
    pub fn new(config: DataConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    /// Index every configured split and report sizes.
    pub fn summarize(&self) -> Result<Vec<SplitSummary>> {
        let indexes = self.build_indexes()?;

        Ok(indexes
            .values()
            .map(|index| SplitSummary {
                split:        index.split(),
                samples:      index.size(),
                batch_size:   index.batch_size(),
                batch_count:  index.batch_count(),
                corpus_sizes: index.corpus_sizes().to_vec(),
            })
            .collect())
    }

    /// Run the sampler over `split` with the WAV spectrogram extractor.
    pub fn execute(&self, split: Split, shuffle: bool, limit: Option<usize>) -> Result<BatchReport> {
        let extractor = SpectrogramExtractor::new(self.config.feature_dim)?;
        tracing::info!("Spectrogram extractor: {} bins per frame", extractor.feature_dim());
        self.execute_with(&extractor, split, shuffle, limit)
    }

    /// Run the sampler over `split` with a caller-supplied extractor.
    pub fn execute_with<E: FeatureExtractor>(
        &self,
        extractor: &E,
        split:     Split,
        shuffle:   bool,
        limit:     Option<usize>,
    ) -> Result<BatchReport> {
        let cfg = &self.config;

        // ── Step 1: Vocabulary ────────────────────────────────────────────────
        let vocab = VocabularyTable::load(&cfg.vocab_path)
            .with_context(|| "Cannot load vocabulary")?;

        // ── Step 2: Indexes (only the requested split) ───────────────────────
        let index = CorpusIndex::build(split, cfg)
            .with_context(|| format!("Cannot index split '{split}'"))?;
        let expected = index.batch_count();
        let indexes: BTreeMap<Split, CorpusIndex> = [(split, index)].into_iter().collect();

        // ── Step 3/4: Sample batches ──────────────────────────────────────────
        let sampler = BatchSampler::new(cfg, &vocab, &indexes, extractor)?;
        let batcher = SpeechBatcher::<HandoffBackend>::new(Default::default());

        let mut report = BatchReport {
            split,
            expected,
            samples: 0,
            batches: Vec::new(),
        };

        let take = limit.unwrap_or(usize::MAX);
        for (i, batch) in sampler.iterate(split, shuffle)?.take(take).enumerate() {
            let batch = batch.with_context(|| format!("Batch {} of '{split}' failed", i + 1))?;

            // ── Step 5: burn hand-off ─────────────────────────────────────────
            let tensors = batcher.to_tensors(&batch);
            let shapes  = BatchShapes::of(&tensors);
            tracing::info!(
                "{split} batch {}/{}: audio={:?} labels={:?} input_len={:?} label_len={:?} targets={:?}",
                i + 1,
                expected,
                shapes.audio,
                shapes.labels,
                shapes.input_lengths,
                shapes.label_lengths,
                shapes.targets
            );

            report.samples += batch.size();
            report.batches.push(shapes);
        }

        Ok(report)
    }

    fn build_indexes(&self) -> Result<BTreeMap<Split, CorpusIndex>> {
        CorpusIndex::build_all(&self.config).with_context(|| "Cannot build corpus indexes")
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{CorpusSource, SplitResources};
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::{fs, path::Path};
    use tempfile::TempDir;

    /// Two corpora, five train utterances of 0.1–0.5 s each.
    fn fixture(root: &Path) -> DataConfig {
        let spec = WavSpec {
            channels:        1,
            sample_rate:     16_000,
            bits_per_sample: 16,
            sample_format:   SampleFormat::Int,
        };

        let layout = [("aishell", vec!["a0", "a1", "a2"]), ("thchs30", vec!["t0", "t1"])];
        let mut corpora = Vec::new();
        let mut n = 0usize;

        for (name, ids) in &layout {
            let dir = root.join(name);
            fs::create_dir_all(dir.join("wav")).unwrap();

            let mut wav_lst = String::new();
            let mut syl_txt = String::new();
            for id in ids {
                n += 1;
                let mut w = WavWriter::create(dir.join("wav").join(format!("{id}.wav")), spec).unwrap();
                for i in 0..(1600 * n) {
                    w.write_sample(((i % 50) as i16 - 25) * 100).unwrap();
                }
                w.finalize().unwrap();

                wav_lst.push_str(&format!("{id} {name}/wav/{id}.wav\n"));
                syl_txt.push_str(&format!("{id} ni3 hao3 ma5\n"));
            }
            fs::write(dir.join("train.wav.lst"), wav_lst).unwrap();
            fs::write(dir.join("train.syllabel.txt"), syl_txt).unwrap();
            corpora.push(CorpusSource::new(*name, dir));
        }

        let vocab_path = root.join("dict.txt");
        fs::write(&vocab_path, "ni3\t0\nhao3\t1\nma5\t2\n").unwrap();

        DataConfig {
            base_dir: root.to_path_buf(),
            corpora,
            splits: [(Split::Train, SplitResources::for_split(Split::Train))].into_iter().collect(),
            vocab_path,
            batch_size: 2,
            audio_max_len: 64,
            label_max_len: 8,
            feature_dim: 200,
            max_resample_attempts: Some(100),
            seed: Some(1),
        }
    }

    #[test]
    fn test_execute_end_to_end() {
        let dir = TempDir::new().unwrap();
        let use_case = BatchUseCase::new(fixture(dir.path()));

        let report = use_case.execute(Split::Train, true, None).unwrap();
        assert_eq!(report.expected, 3);
        assert_eq!(report.batches.len(), 3);
        assert_eq!(report.samples, 5);
        assert_eq!(report.batches[0].audio, [2, 64, 200, 1]);
        assert_eq!(report.batches[2].labels, [1, 8]);
        assert_eq!(report.batches[2].targets, [1, 1]);
    }

    #[test]
    fn test_limit_stops_early() {
        let dir = TempDir::new().unwrap();
        let use_case = BatchUseCase::new(fixture(dir.path()));

        let report = use_case.execute(Split::Train, false, Some(1)).unwrap();
        assert_eq!(report.batches.len(), 1);
        assert_eq!(report.samples, 2);
    }

    #[test]
    fn test_summarize() {
        let dir = TempDir::new().unwrap();
        let use_case = BatchUseCase::new(fixture(dir.path()));

        let summary = use_case.summarize().unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].samples, 5);
        assert_eq!(summary[0].batch_size, 2);
        assert_eq!(summary[0].batch_count, 3);
        assert_eq!(summary[0].corpus_sizes[1], ("thchs30".to_string(), 2));
    }

    #[test]
    fn test_missing_vocabulary_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = fixture(dir.path());
        config.vocab_path = dir.path().join("absent.txt");

        assert!(BatchUseCase::new(config).execute(Split::Train, false, None).is_err());
    }
}
