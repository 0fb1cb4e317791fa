mod decode;
mod tiled_json;

pub use decode::{DecodeError, DecodedMap, LoadStats, decode_map};
pub use tiled_json::RawMap;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::characters::CharacterDictionary;

#[derive(Debug, Error)]
pub enum LoadMapError {
    #[error("Failed to read map file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse map file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Load a map from a Tiled JSON file. The map's identifier is the
/// file's stem.
pub fn load_map(
    characters: &CharacterDictionary,
    path: impl AsRef<Path>,
) -> Result<DecodedMap, LoadMapError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| LoadMapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    load_map_from_slice(characters, &name, &data).map_err(|e| match e {
        LoadMapError::Parse { source, .. } => LoadMapError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Load a map named `name` from in-memory Tiled JSON.
pub fn load_map_from_slice(
    characters: &CharacterDictionary,
    name: &str,
    data: &[u8],
) -> Result<DecodedMap, LoadMapError> {
    let raw: RawMap = serde_json::from_slice(data).map_err(|source| LoadMapError::Parse {
        path: PathBuf::from(name),
        source,
    })?;
    Ok(decode_map(name, &raw, characters)?)
}
