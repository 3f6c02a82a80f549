// ============================================================
// Layer 3 — Data Configuration
// ============================================================
// Every knob the batching engine needs, in one immutable struct
// that is passed by reference into the vocabulary, index, and
// sampler constructors.
//
// Serialisable so a run can be described in a JSON file:
//
//   {
//     "base_dir": "/data/dataset",
//     "corpora": [{ "name": "thchs30", "dir": "/data/dataset/thchs30" }],
//     "splits":  { "train": { "audio_list": "train.wav.lst",
//                             "label_list": "train.syllabel.txt" } },
//     "vocab_path": "/data/dataset/dict/py2id_dict.txt",
//     "batch_size": 16, ...
//   }
//
// Reference: Rust Book §5 (Structs)
//            serde crate documentation

use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::{DataError, Result};
use crate::domain::sample::Split;

/// One named sub-dataset contributing records to every split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSource {
    pub name: String,

    /// Directory holding this corpus' per-split record lists
    pub dir: PathBuf,
}

impl CorpusSource {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), dir: dir.into() }
    }
}

/// File names (relative to a corpus dir) of one split's record lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResources {
    /// `sample_id audio_relative_path` lines
    pub audio_list: String,

    /// `sample_id token token ...` lines
    pub label_list: String,
}

impl SplitResources {
    /// `<split>.wav.lst` / `<split>.syllabel.txt`
    pub fn for_split(split: Split) -> Self {
        Self {
            audio_list: format!("{split}.wav.lst"),
            label_list: format!("{split}.syllabel.txt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root that audio-relative paths are joined onto
    pub base_dir: PathBuf,

    /// Corpora in declaration order; index keys follow this order
    pub corpora: Vec<CorpusSource>,

    pub splits: BTreeMap<Split, SplitResources>,

    /// `token<TAB>id` vocabulary file
    pub vocab_path: PathBuf,

    pub batch_size: usize,

    /// Time frames per padded sample. Samples with at least this
    /// many frames are rejected.
    pub audio_max_len: usize,

    /// Label slots per padded sample. Sequences with at least this
    /// many tokens are rejected.
    pub label_max_len: usize,

    pub feature_dim: usize,

    /// Cap on resubstitution draws per rejected sample.
    /// `None` keeps searching forever.
    #[serde(default)]
    pub max_resample_attempts: Option<usize>,

    /// Fixed seed for reproducible shuffles
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for DataConfig {
    fn default() -> Self {
        let base_dir = PathBuf::from("/data/dataset");
        let corpora = ["st-cmds", "thchs30", "primewords", "aishell"]
            .into_iter()
            .map(|name| CorpusSource::new(name, base_dir.join(name)))
            .collect();
        let splits = Split::ALL
            .into_iter()
            .map(|s| (s, SplitResources::for_split(s)))
            .collect();

        Self {
            vocab_path:            base_dir.join("dict").join("py2id_dict.txt"),
            base_dir,
            corpora,
            splits,
            batch_size:            16,
            audio_max_len:         2000,
            label_max_len:         50,
            feature_dim:           200,
            max_resample_attempts: Some(10_000),
            seed:                  None,
        }
    }
}

impl DataConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("batch_size",    self.batch_size),
            ("audio_max_len", self.audio_max_len),
            ("label_max_len", self.label_max_len),
            ("feature_dim",   self.feature_dim),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(DataError::Config(format!("{name} must be greater than zero")));
            }
        }
        if self.corpora.is_empty() {
            return Err(DataError::Config("at least one corpus is required".into()));
        }
        Ok(())
    }

    /// Record-list file names for `split`
    pub fn split_resources(&self, split: Split) -> Result<&SplitResources> {
        self.splits
            .get(&split)
            .ok_or_else(|| DataError::Config(format!("no resources configured for split '{split}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_layout() {
        let cfg = DataConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.corpora.len(), 4);
        assert_eq!(cfg.corpora[0].name, "st-cmds");
        assert_eq!(
            cfg.split_resources(Split::Dev).unwrap(),
            &SplitResources {
                audio_list: "dev.wav.lst".into(),
                label_list: "dev.syllabel.txt".into(),
            }
        );
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let cfg = DataConfig { batch_size: 0, ..DataConfig::default() };
        assert!(matches!(cfg.validate(), Err(DataError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_no_corpora() {
        let cfg = DataConfig { corpora: Vec::new(), ..DataConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_missing_split_is_config_error() {
        let mut cfg = DataConfig::default();
        cfg.splits.remove(&Split::Test);
        assert!(matches!(cfg.split_resources(Split::Test), Err(DataError::Config(_))));
    }

    #[test]
    fn test_optional_fields_default_when_absent() {
        let mut value = serde_json::to_value(DataConfig::default()).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("max_resample_attempts");
        obj.remove("seed");
        let cfg: DataConfig = serde_json::from_value(value).unwrap();
        assert_eq!(cfg.max_resample_attempts, None);
        assert_eq!(cfg.seed, None);
    }
}
