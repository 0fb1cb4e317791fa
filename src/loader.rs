//! The map loading session. A [`MapLoader`] owns the character
//! dictionary, so the dictionary file is read once and shared by every
//! load instead of hiding behind process globals.

use std::path::Path;

use log::info;

use crate::characters::{CharacterDictionary, DictionaryError};
use crate::map::GameMap;
use crate::tiled_load::{self, LoadMapError};

/// Where the maps live in the original asset layout.
pub const DEFAULT_MAPS_DIR: &str = "resources/maps";

pub struct MapLoader {
    characters: CharacterDictionary,
}

impl MapLoader {
    pub fn new(characters: CharacterDictionary) -> Self {
        MapLoader { characters }
    }

    /// Build a loader by reading the dictionary from `path`.
    pub fn from_dictionary_file(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        Ok(MapLoader::new(CharacterDictionary::load(path)?))
    }

    pub fn characters(&self) -> &CharacterDictionary {
        &self.characters
    }

    /// Load one map from a Tiled JSON file. Fails only on unreadable
    /// or malformed input; objects that fail validation are logged and
    /// skipped inside the decode.
    pub fn load_map(&self, path: impl AsRef<Path>) -> Result<GameMap, LoadMapError> {
        let path = path.as_ref();
        info!("Loading map: {path:?}");
        let decoded = tiled_load::load_map(&self.characters, path)?;
        let stats = decoded.stats;
        info!(
            "Loaded map {:?}: {} characters ({} skipped), {} lights ({} skipped)",
            decoded.map.name,
            stats.characters_added,
            stats.characters_skipped,
            stats.lights_added,
            stats.lights_skipped,
        );
        Ok(decoded.map)
    }
}
