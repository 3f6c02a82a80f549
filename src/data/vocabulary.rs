// ============================================================
// Layer 4 — Vocabulary Table
// ============================================================
// Loads the phonetic-unit vocabulary: one `token<TAB>id` line
// per entry, e.g.
//
//   a1	0
//   a2	1
//   ai1	5
//
// Both directions are materialised once so the sampler can turn
// label tokens into ids and debugging code can turn ids back.
// There is no unknown-token id: an unseen token is an error.
//
// Reference: Rust Book §8 (Hash Maps)

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::domain::error::{DataError, Result};

#[derive(Debug, Clone, Default)]
pub struct VocabularyTable {
    token_to_id: HashMap<String, u32>,
    id_to_token: HashMap<u32, String>,
}

impl VocabularyTable {
    /// Read and parse a vocabulary file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        let table = Self::parse(&text, path)?;

        tracing::info!(
            "Loaded vocabulary of {} tokens from '{}'",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse vocabulary text. `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let mut table = Self::default();

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let parse_err = |reason: String| DataError::Parse {
                path:   PathBuf::from(origin),
                line:   line_no + 1,
                reason,
            };

            let mut fields = line.split('\t');
            let (token, id) = match (fields.next(), fields.next(), fields.next()) {
                (Some(token), Some(id), None) => (token.trim(), id.trim()),
                _ => return Err(parse_err(format!("expected 'token<TAB>id', got '{line}'"))),
            };

            let id: u32 = id
                .parse()
                .map_err(|_| parse_err(format!("id '{id}' is not a non-negative integer")))?;
            // Label matrices are i32
            if i32::try_from(id).is_err() {
                return Err(parse_err(format!("id {id} does not fit a label matrix (max {})", i32::MAX)));
            }

            if table.token_to_id.contains_key(token) {
                return Err(parse_err(format!("duplicate token '{token}'")));
            }
            if table.id_to_token.contains_key(&id) {
                return Err(parse_err(format!("duplicate id {id}")));
            }

            table.token_to_id.insert(token.to_string(), id);
            table.id_to_token.insert(id, token.to_string());
        }

        Ok(table)
    }

    pub fn token_to_id(&self, token: &str) -> Result<u32> {
        self.token_to_id
            .get(token)
            .copied()
            .ok_or_else(|| DataError::UnknownToken(token.to_string()))
    }

    pub fn id_to_token(&self, id: u32) -> Result<&str> {
        self.id_to_token
            .get(&id)
            .map(String::as_str)
            .ok_or(DataError::UnknownId(id))
    }

    /// Map a whole label sequence to ids, failing on the first unseen token.
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<u32>> {
        tokens.iter().map(|t| self.token_to_id(t.as_ref())).collect()
    }

    pub fn len(&self) -> usize {
        self.token_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }

    /// Every token in the table (unordered)
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.token_to_id.keys().map(String::as_str)
    }
}
