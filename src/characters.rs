//! The character reference dictionary. Maps every character type a map
//! may place to its display metadata. Loaded once per [`MapLoader`]
//! and read-only afterwards.
//!
//! [`MapLoader`]: crate::MapLoader

use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the dictionary lives in the original asset layout.
pub const DEFAULT_DICTIONARY_PATH: &str = "resources/data/characters_dictionary.json";

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Failed to read character dictionary {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse character dictionary {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Display metadata for one character type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterEntry {
    /// Path of the character's sprite sheet, relative to the character
    /// asset root.
    pub images: String,
    /// Any further metadata the dictionary carries for this type.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// The dictionary itself, keyed by character type. The file is a
/// single JSON object: `{ "torchguy": { "images": "..." }, ... }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CharacterDictionary {
    #[serde(flatten)]
    entries: HashMap<String, CharacterEntry>,
}

impl CharacterDictionary {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&data).map_err(|source| DictionaryError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, CharacterEntry)>) -> Self {
        CharacterDictionary {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, kind: &str) -> Option<&CharacterEntry> {
        self.entries.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
