// ============================================================
// Layer 4 — Batch Sampler
// ============================================================
// Walks a split's index in (optionally shuffled) order and
// yields padded batches lazily:
//
//   permutation of 0..N
//       │
//       ▼
//   resolve key → (features, label ids)
//       │  too long? draw a replacement from positions [N/4, N/2)
//       ▼
//   accumulate batch_size samples
//       │
//       ▼
//   pad_audio / pad_labels → Batch
//
// The final batch holds whatever is left and may be short, so a
// split always yields exactly ceil(N / batch_size) batches.
//
// Any failure (unknown token, extraction error, exhausted
// resubstitution) ends the iteration: the error is yielded once
// and the iterator is fused afterwards.
//
// Reference: Rust Book §13 (Iterators)
//            rand crate documentation

use std::{collections::BTreeMap, iter::FusedIterator};

use ndarray::{Array2, Array4};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::data::{corpus_index::CorpusIndex, padder, vocabulary::VocabularyTable};
use crate::domain::config::DataConfig;
use crate::domain::error::{DataError, Result};
use crate::domain::sample::Split;
use crate::domain::traits::FeatureExtractor;

/// Resubstitution attempts after which a warning is logged
const SLOW_RESAMPLE_WARNING: usize = 100;

// ─── Batch ────────────────────────────────────────────────────────────────────
/// One padded batch. Every array's first dimension is the batch size.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// `[B, audio_max_len, feature_dim, 1]`
    pub audio: Array4<f32>,

    /// `[B, label_max_len]`
    pub labels: Array2<i32>,

    /// `[B, 1]`, frames/8 + frames%8
    pub input_lengths: Array2<i32>,

    /// `[B, 1]`, true label counts
    pub label_lengths: Array2<i32>,

    /// `[B, 1]`, all zero; the CTC loss layer needs a target column
    pub targets: Array2<f32>,
}

impl Batch {
    pub fn size(&self) -> usize {
        self.audio.dim().0
    }
}

// ─── Bounds ───────────────────────────────────────────────────────────────────
/// The subset of DataConfig the iterator needs at every step.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    batch_size:    usize,
    audio_max_len: usize,
    label_max_len: usize,
    feature_dim:   usize,
    max_attempts:  Option<usize>,
}

impl Bounds {
    fn from_config(config: &DataConfig) -> Self {
        Self {
            batch_size:    config.batch_size,
            audio_max_len: config.audio_max_len,
            label_max_len: config.label_max_len,
            feature_dim:   config.feature_dim,
            max_attempts:  config.max_resample_attempts,
        }
    }

    fn is_oversize(&self, audio: &Array2<f32>, labels: &[u32]) -> bool {
        audio.nrows() >= self.audio_max_len || labels.len() >= self.label_max_len
    }
}

// ─── BatchSampler ─────────────────────────────────────────────────────────────
/// Hands out batch iterators over any split it was given an index for.
pub struct BatchSampler<'a, E> {
    config:    &'a DataConfig,
    vocab:     &'a VocabularyTable,
    indexes:   &'a BTreeMap<Split, CorpusIndex>,
    extractor: &'a E,
}

impl<'a, E: FeatureExtractor> BatchSampler<'a, E> {
    pub fn new(
        config:    &'a DataConfig,
        vocab:     &'a VocabularyTable,
        indexes:   &'a BTreeMap<Split, CorpusIndex>,
        extractor: &'a E,
    ) -> Result<Self> {
        config.validate()?;

        // Batch counts come from the index, batch sizes from the config
        for (split, index) in indexes {
            if index.batch_size() != config.batch_size {
                return Err(DataError::Config(format!(
                    "split '{split}' was indexed with batch_size {} but the config says {}",
                    index.batch_size(),
                    config.batch_size
                )));
            }
        }

        Ok(Self { config, vocab, indexes, extractor })
    }

    /// Batches for `split`. Seeded from `config.seed` when set, else from OS entropy.
    pub fn iterate(&self, split: Split, shuffle: bool) -> Result<BatchIter<'a, E, StdRng>> {
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        self.iterate_with_rng(split, shuffle, rng)
    }

    /// Batches for `split` drawing shuffles and replacements from `rng`.
    pub fn iterate_with_rng<R: Rng>(
        &self,
        split:   Split,
        shuffle: bool,
        rng:     R,
    ) -> Result<BatchIter<'a, E, R>> {
        let index = self
            .indexes
            .get(&split)
            .ok_or_else(|| DataError::Config(format!("split '{split}' has not been indexed")))?;

        Ok(BatchIter::new(
            index,
            self.vocab,
            self.extractor,
            Bounds::from_config(self.config),
            shuffle,
            rng,
        ))
    }

    /// Number of batches `iterate(split, _)` will yield
    pub fn batch_count(&self, split: Split) -> Option<usize> {
        self.indexes.get(&split).map(CorpusIndex::batch_count)
    }
}

// ─── BatchIter ────────────────────────────────────────────────────────────────
/// Lazy, finite, non-restartable batch sequence over one split.
pub struct BatchIter<'a, E, R> {
    index:     &'a CorpusIndex,
    vocab:     &'a VocabularyTable,
    extractor: &'a E,
    bounds:    Bounds,
    rng:       R,
    order:     Vec<usize>,
    cursor:    usize,
    done:      bool,
}

impl<'a, E: FeatureExtractor, R: Rng> BatchIter<'a, E, R> {
    fn new(
        index:     &'a CorpusIndex,
        vocab:     &'a VocabularyTable,
        extractor: &'a E,
        bounds:    Bounds,
        shuffle:   bool,
        mut rng:   R,
    ) -> Self {
        let mut order: Vec<usize> = (0..index.size()).collect();
        if shuffle {
            order.shuffle(&mut rng);
        }

        Self {
            index,
            vocab,
            extractor,
            bounds,
            rng,
            order,
            cursor: 0,
            done:   false,
        }
    }

    /// Position-ordered keys this iterator walks
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Extract features and encode labels for one key.
    fn resolve(&self, key: usize) -> Result<(Array2<f32>, Vec<u32>)> {
        let entry  = self.index.get(key)?;
        let audio  = self.extractor.extract(&entry.audio_path)?;
        let labels = self.vocab.encode(&entry.label_tokens)?;
        Ok((audio, labels))
    }

    /// Resolve `key`, swapping in random replacements while the sample is too long.
    fn resolve_within_bounds(&mut self, key: usize) -> Result<(Array2<f32>, Vec<u32>)> {
        let (mut audio, mut labels) = self.resolve(key)?;

        let n     = self.order.len();
        let range = n / 4..n / 2;
        let mut attempts = 0usize;

        while self.bounds.is_oversize(&audio, &labels) {
            let capped = self.bounds.max_attempts.is_some_and(|cap| attempts >= cap);
            if capped || range.is_empty() {
                return Err(DataError::ResourceExhausted { attempts });
            }

            let position    = self.rng.gen_range(range.clone());
            let replacement = self.order[position];
            tracing::trace!(
                "key {key} oversize ({} frames, {} labels), trying key {replacement}",
                audio.nrows(),
                labels.len()
            );

            (audio, labels) = self.resolve(replacement)?;
            attempts += 1;

            if attempts == SLOW_RESAMPLE_WARNING {
                tracing::warn!(
                    "{}: still resampling for key {key} after {attempts} attempts",
                    self.index.split()
                );
            }
        }

        Ok((audio, labels))
    }

    /// Accumulate up to batch_size accepted samples and pad them.
    fn next_batch(&mut self) -> Result<Option<Batch>> {
        let mut audios = Vec::with_capacity(self.bounds.batch_size);
        let mut labels = Vec::with_capacity(self.bounds.batch_size);

        while audios.len() < self.bounds.batch_size && self.cursor < self.order.len() {
            let key = self.order[self.cursor];
            self.cursor += 1;

            let (audio, label) = self.resolve_within_bounds(key)?;
            audios.push(audio);
            labels.push(label);
        }

        if audios.is_empty() {
            return Ok(None);
        }

        let (audio, input_lengths) =
            padder::pad_audio(&audios, self.bounds.audio_max_len, self.bounds.feature_dim)?;
        let (labels, label_lengths) = padder::pad_labels(&labels, self.bounds.label_max_len)?;
        let targets = Array2::<f32>::zeros((audios.len(), 1));

        Ok(Some(Batch {
            audio,
            labels,
            input_lengths,
            label_lengths,
            targets,
        }))
    }

    fn remaining_batches(&self) -> usize {
        (self.order.len() - self.cursor).div_ceil(self.bounds.batch_size)
    }
}

impl<E: FeatureExtractor, R: Rng> Iterator for BatchIter<'_, E, R> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.next_batch() {
            Ok(Some(batch)) => {
                tracing::debug!(
                    "{}: batch of {} ({} of {} samples consumed)",
                    self.index.split(),
                    batch.size(),
                    self.cursor,
                    self.order.len()
                );
                Some(Ok(batch))
            }
            Ok(None) => {
                tracing::debug!("{}: iteration finished", self.index.split());
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, Some(self.remaining_batches()))
        }
    }
}

impl<E: FeatureExtractor, R: Rng> FusedIterator for BatchIter<'_, E, R> {}
