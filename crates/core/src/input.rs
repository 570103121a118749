//! Character list input.
//!
//! A generation target is either a single literal character or a path to a
//! JSON file holding a list of characters. Two JSON shapes are accepted:
//!
//! - a flat list: `["中", "文"]`
//! - the legacy export shape: `{"data": {"records": [{"word": "中"}]}}`
//!
//! Lists are deduplicated before scheduling; the orchestrator never
//! deduplicates on its own.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while resolving generation input.
#[derive(Debug, Error)]
pub enum InputError {
    /// Character list file could not be read.
    #[error("Failed to read character list {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Character list file is not valid JSON.
    #[error("Failed to parse character list: {0}")]
    Parse(#[from] serde_json::Error),

    /// Character identifier cannot be used as an output file name.
    #[error("Invalid character {character:?}: {reason}")]
    InvalidCharacter { character: String, reason: String },
}

impl InputError {
    fn invalid(character: &str, reason: impl Into<String>) -> Self {
        Self::InvalidCharacter {
            character: character.to_string(),
            reason: reason.into(),
        }
    }
}

/// What the CLI was asked to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationTarget {
    /// A single literal character.
    Single(String),
    /// A JSON file listing characters.
    ListFile(PathBuf),
}

impl GenerationTarget {
    /// Interprets a CLI argument: anything ending in `.json` is a list file.
    pub fn from_arg(arg: &str) -> Self {
        if arg.ends_with(".json") {
            Self::ListFile(PathBuf::from(arg))
        } else {
            Self::Single(arg.to_string())
        }
    }

    /// Resolves the target into the list of characters to schedule.
    pub fn resolve(&self) -> Result<Vec<String>, InputError> {
        match self {
            Self::Single(character) => Ok(vec![character.clone()]),
            Self::ListFile(path) => load_character_list(path),
        }
    }
}

#[derive(Deserialize)]
struct LegacyExport {
    data: Option<LegacyData>,
}

#[derive(Deserialize)]
struct LegacyData {
    #[serde(default)]
    records: Vec<LegacyRecord>,
}

#[derive(Deserialize)]
struct LegacyRecord {
    word: Option<String>,
}

/// Reads and parses a character list file.
pub fn load_character_list(path: &Path) -> Result<Vec<String>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_character_list(&content)
}

/// Parses a character list from JSON text.
///
/// Unknown shapes parse to an empty list; the caller decides whether that is
/// an error.
pub fn parse_character_list(json: &str) -> Result<Vec<String>, InputError> {
    let value: Value = serde_json::from_str(json)?;

    let words: Vec<String> = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        other => serde_json::from_value::<LegacyExport>(other)
            .ok()
            .and_then(|export| export.data)
            .map(|data| {
                data.records
                    .into_iter()
                    .filter_map(|record| record.word)
                    .filter(|word| !word.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
    };

    Ok(dedup_preserving_order(words))
}

/// Removes duplicates, keeping the first occurrence of each character.
pub fn dedup_preserving_order(words: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .into_iter()
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

/// Checks that a character identifier is safe to use as an output file stem.
pub fn validate_character(character: &str) -> Result<(), InputError> {
    let trimmed = character.trim();
    if trimmed.is_empty() {
        return Err(InputError::invalid(character, "empty"));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(InputError::invalid(character, "reserved path name"));
    }
    if character.contains(['/', '\\', '\0']) {
        return Err(InputError::invalid(
            character,
            "contains a path separator or NUL byte",
        ));
    }
    Ok(())
}
