// ============================================================
// Layer 3 — Sample Domain Types
// ============================================================
// Plain data describing what the index stores:
//
//   Split      → train / dev / test partition
//   IndexEntry → one utterance: where its audio lives and
//                which phonetic tokens transcribe it
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

/// One partition of the merged dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Dev,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Dev, Split::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Dev   => "dev",
            Split::Test  => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "dev"   => Ok(Split::Dev),
            "test"  => Ok(Split::Test),
            other   => Err(format!("unknown split '{other}'")),
        }
    }
}

/// A resolved record in a [`CorpusIndex`](crate::data::corpus_index::CorpusIndex).
///
/// The sample id is dropped once the record is indexed; the dense
/// integer key takes its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Absolute (base_dir-joined) path of the utterance audio
    pub audio_path: PathBuf,

    /// Phonetic units in transcription order
    pub label_tokens: Vec<String>,
}

impl IndexEntry {
    pub fn new(audio_path: impl Into<PathBuf>, label_tokens: Vec<String>) -> Self {
        Self {
            audio_path: audio_path.into(),
            label_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_parse_and_display() {
        for split in Split::ALL {
            assert_eq!(split.as_str().parse::<Split>().unwrap(), split);
            assert_eq!(split.to_string(), split.as_str());
        }
        assert!("validation".parse::<Split>().is_err());
    }

    #[test]
    fn test_split_serde_lowercase() {
        let json = serde_json::to_string(&Split::Dev).unwrap();
        assert_eq!(json, "\"dev\"");
    }
}
