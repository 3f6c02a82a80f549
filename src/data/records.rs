// ============================================================
// Layer 4 — Corpus Record Lists
// ============================================================
// Each corpus ships two line-oriented lists per split:
//
//   train.wav.lst       → `A11_0 thchs30/train/A11_0.wav`
//   train.syllabel.txt  → `A11_0 lv4 shi4 yang2 chun1 ...`
//
// Both are keyed by the same sample id but live in separate
// files, so they are parsed independently here and paired up
// by the CorpusIndex.
//
// Blank lines are skipped. Any other malformed line is an
// error carrying its file and line number.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::error::{DataError, Result};

/// `(sample_id, audio_path)` in file order
pub type AudioRecord = (String, PathBuf);

/// `(sample_id, label_tokens)` in file order
pub type LabelRecord = (String, Vec<String>);

/// Parse `sample_id audio_relative_path` lines, joining each path onto `base_dir`.
pub fn parse_audio_list(text: &str, origin: &Path, base_dir: &Path) -> Result<Vec<AudioRecord>> {
    let mut records = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(id), Some(rel), None) => records.push((id.to_string(), base_dir.join(rel))),
            _ => {
                return Err(DataError::Parse {
                    path:   origin.to_path_buf(),
                    line:   line_no + 1,
                    reason: format!("expected 'sample_id audio_path', got '{line}'"),
                })
            }
        }
    }

    Ok(records)
}

/// Parse `sample_id token token ...` lines. A line with an id and no
/// tokens is a valid (empty) transcription.
pub fn parse_label_list(text: &str) -> Vec<LabelRecord> {
    text.lines()
        .filter_map(|raw| {
            let mut fields = raw.split_whitespace();
            let id = fields.next()?;
            Some((id.to_string(), fields.map(str::to_string).collect()))
        })
        .collect()
}

pub fn read_audio_list(path: &Path, base_dir: &Path) -> Result<Vec<AudioRecord>> {
    let text = fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    parse_audio_list(&text, path, base_dir)
}

pub fn read_label_list(path: &Path) -> Result<Vec<LabelRecord>> {
    let text = fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    Ok(parse_label_list(&text))
}
