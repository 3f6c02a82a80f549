// ============================================================
// Layer 4 — Corpus Index
// ============================================================
// Merges every corpus' record lists for one split into a single
// dense table keyed 0..N-1:
//
//   st-cmds    labels: s1 s2 s3     → keys 0 1 2
//   thchs30    labels: A11_0 A11_1  → keys 3 4
//   ...
//
// Corpora are visited in declaration order; within a corpus the
// label list's own order decides the keys. Audio and label lists
// are paired by sample id after a count check.
//
// The index is built once and never mutated, so the sampler can
// borrow it freely.
//
// Reference: Rust Book §8 (Vectors, Hash Maps)

use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};

use crate::data::records::{self, AudioRecord, LabelRecord};
use crate::domain::config::DataConfig;
use crate::domain::error::{DataError, Result};
use crate::domain::sample::{IndexEntry, Split};

// ─── CorpusRecords ────────────────────────────────────────────────────────────
/// Raw record lists of one corpus for one split, before pairing.
#[derive(Debug, Clone, Default)]
pub struct CorpusRecords {
    pub name:   String,
    pub audio:  Vec<AudioRecord>,
    pub labels: Vec<LabelRecord>,
}

impl CorpusRecords {
    pub fn new(name: impl Into<String>, audio: Vec<AudioRecord>, labels: Vec<LabelRecord>) -> Self {
        Self { name: name.into(), audio, labels }
    }
}

// ─── CorpusIndex ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    split:        Split,
    entries:      Vec<IndexEntry>,
    batch_size:   usize,
    corpus_sizes: Vec<(String, usize)>,
}

impl CorpusIndex {
    /// Read every configured corpus' lists for `split` from disk and merge them.
    pub fn build(split: Split, config: &DataConfig) -> Result<Self> {
        config.validate()?;
        let resources = config.split_resources(split)?;

        let mut corpora = Vec::with_capacity(config.corpora.len());
        for source in &config.corpora {
            let audio_path = source.dir.join(&resources.audio_list);
            let label_path = source.dir.join(&resources.label_list);

            corpora.push(CorpusRecords::new(
                source.name.clone(),
                records::read_audio_list(&audio_path, &config.base_dir)?,
                records::read_label_list(&label_path)?,
            ));
        }

        Self::from_records(split, config.batch_size, corpora)
    }

    /// Build one index per configured split.
    pub fn build_all(config: &DataConfig) -> Result<BTreeMap<Split, Self>> {
        config
            .splits
            .keys()
            .map(|&split| Ok((split, Self::build(split, config)?)))
            .collect()
    }

    /// Merge already-parsed record lists in the given corpus order.
    pub fn from_records(split: Split, batch_size: usize, corpora: Vec<CorpusRecords>) -> Result<Self> {
        if batch_size == 0 {
            return Err(DataError::Config("batch_size must be greater than zero".into()));
        }

        let mut entries      = Vec::new();
        let mut corpus_sizes = Vec::with_capacity(corpora.len());

        for corpus in corpora {
            // A repeated id keeps its last audio path
            let id_to_audio: HashMap<String, PathBuf> = corpus.audio.into_iter().collect();

            // A repeated label id keeps its first position but takes the last tokens
            let mut order: Vec<String> = Vec::new();
            let mut id_to_labels: HashMap<String, Vec<String>> = HashMap::new();
            for (id, tokens) in corpus.labels {
                if id_to_labels.insert(id.clone(), tokens).is_none() {
                    order.push(id);
                }
            }

            if id_to_audio.len() != id_to_labels.len() {
                return Err(DataError::CountMismatch {
                    corpus: corpus.name,
                    split,
                    audio:  id_to_audio.len(),
                    labels: id_to_labels.len(),
                });
            }

            for id in &order {
                let audio_path = id_to_audio.get(id).cloned().ok_or_else(|| DataError::MissingAudio {
                    corpus: corpus.name.clone(),
                    split,
                    id:     id.clone(),
                })?;
                let tokens = id_to_labels.remove(id).unwrap_or_default();
                entries.push(IndexEntry::new(audio_path, tokens));
            }

            tracing::debug!("{split}: corpus '{}' contributed {} samples", corpus.name, order.len());
            corpus_sizes.push((corpus.name, order.len()));
        }

        let index = Self { split, entries, batch_size, corpus_sizes };
        tracing::info!(
            "{split}: indexed {} samples from {} corpora ({} batches of {})",
            index.size(),
            index.corpus_sizes.len(),
            index.batch_count(),
            batch_size
        );
        Ok(index)
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Resolve a dense key to its entry.
    pub fn get(&self, key: usize) -> Result<&IndexEntry> {
        self.entries.get(key).ok_or(DataError::KeyOutOfRange {
            key,
            size: self.size(),
        })
    }

    /// `ceil(size / batch_size)`
    pub fn batch_count(&self) -> usize {
        self.size().div_ceil(self.batch_size)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Sample count contributed by each corpus, in declaration order
    pub fn corpus_sizes(&self) -> &[(String, usize)] {
        &self.corpus_sizes
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{CorpusSource, SplitResources};
    use std::fs;
    use tempfile::TempDir;

    fn corpus(name: &str, ids: &[&str]) -> CorpusRecords {
        CorpusRecords::new(
            name,
            ids.iter()
                .map(|id| (id.to_string(), PathBuf::from(format!("/{name}/{id}.wav"))))
                .collect(),
            ids.iter()
                .map(|id| (id.to_string(), vec![format!("{id}-tok")]))
                .collect(),
        )
    }

    #[test]
    fn test_keys_are_dense_in_corpus_order() {
        let index = CorpusIndex::from_records(
            Split::Train,
            2,
            vec![corpus("a", &["x", "y", "z"]), corpus("b", &["p", "q"])],
        )
        .unwrap();

        assert_eq!(index.size(), 5);
        for key in 0..index.size() {
            assert!(index.get(key).is_ok());
        }
        assert_eq!(index.get(0).unwrap().audio_path, PathBuf::from("/a/x.wav"));
        assert_eq!(index.get(3).unwrap().audio_path, PathBuf::from("/b/p.wav"));
        assert_eq!(index.corpus_sizes(), &[("a".to_string(), 3), ("b".to_string(), 2)]);
    }

    #[test]
    fn test_label_order_wins_over_audio_order() {
        let mut c = corpus("a", &["x", "y"]);
        c.audio.reverse();
        let index = CorpusIndex::from_records(Split::Dev, 1, vec![c]).unwrap();
        assert_eq!(index.get(0).unwrap().label_tokens, vec!["x-tok".to_string()]);
        assert_eq!(index.get(0).unwrap().audio_path, PathBuf::from("/a/x.wav"));
    }

    #[test]
    fn test_batch_count_is_ceiling() {
        let ids: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();

        let index = CorpusIndex::from_records(Split::Train, 4, vec![corpus("a", &ids)]).unwrap();
        assert_eq!(index.batch_count(), 3);

        let index = CorpusIndex::from_records(Split::Train, 5, vec![corpus("a", &ids)]).unwrap();
        assert_eq!(index.batch_count(), 2);
    }

    #[test]
    fn test_count_mismatch_is_consistency_error() {
        let mut c = corpus("a", &["x", "y"]);
        c.labels.pop();
        let err = CorpusIndex::from_records(Split::Test, 4, vec![c]).unwrap_err();
        assert!(matches!(err, DataError::CountMismatch { audio: 2, labels: 1, .. }));
    }

    #[test]
    fn test_label_without_audio_is_consistency_error() {
        let mut c = corpus("a", &["x", "y"]);
        c.labels[1].0 = "stray".into();
        let err = CorpusIndex::from_records(Split::Train, 4, vec![c]).unwrap_err();
        assert!(matches!(err, DataError::MissingAudio { id, .. } if id == "stray"));
    }

    #[test]
    fn test_duplicate_label_id_keeps_first_slot_last_tokens() {
        let mut c = corpus("a", &["x", "y"]);
        c.labels.push(("x".into(), vec!["again".into()]));
        let index = CorpusIndex::from_records(Split::Train, 4, vec![c]).unwrap();
        assert_eq!(index.size(), 2);
        assert_eq!(index.get(0).unwrap().label_tokens, vec!["again".to_string()]);
    }

    #[test]
    fn test_out_of_range_key() {
        let index = CorpusIndex::from_records(Split::Train, 4, vec![corpus("a", &["x"])]).unwrap();
        assert!(matches!(index.get(1), Err(DataError::KeyOutOfRange { key: 1, size: 1 })));
    }

    #[test]
    fn test_build_from_disk() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        for (name, ids) in [("c1", vec!["a", "b"]), ("c2", vec!["c"])] {
            let cdir = base.join(name);
            fs::create_dir_all(&cdir).unwrap();
            let wav: String = ids.iter().map(|id| format!("{id} {name}/{id}.wav\n")).collect();
            let lab: String = ids.iter().map(|id| format!("{id} ni3 hao3\n")).collect();
            fs::write(cdir.join("dev.wav.lst"), wav).unwrap();
            fs::write(cdir.join("dev.syllabel.txt"), lab).unwrap();
        }

        let config = DataConfig {
            base_dir: base.to_path_buf(),
            corpora:  vec![
                CorpusSource::new("c1", base.join("c1")),
                CorpusSource::new("c2", base.join("c2")),
            ],
            splits:   [(Split::Dev, SplitResources::for_split(Split::Dev))].into_iter().collect(),
            batch_size: 2,
            ..DataConfig::default()
        };

        let all = CorpusIndex::build_all(&config).unwrap();
        assert_eq!(all.len(), 1);
        let dev = &all[&Split::Dev];
        assert_eq!(dev.size(), 3);
        assert_eq!(dev.batch_count(), 2);
        assert_eq!(dev.get(2).unwrap().audio_path, base.join("c2/c.wav"));
        assert_eq!(dev.get(0).unwrap().label_tokens, vec!["ni3".to_string(), "hao3".to_string()]);

        // Train resources are not configured
        assert!(CorpusIndex::build(Split::Train, &config).is_err());
    }
}
