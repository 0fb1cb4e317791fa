//! Incremental loading of a whole maps directory. One map per
//! [`BatchLoader::load_next`] call, so a caller can interleave loading
//! with per-frame work such as rendering a loading screen.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use log::info;
use thiserror::Error;

use crate::loader::MapLoader;
use crate::map::GameMap;
use crate::tiled_load::LoadMapError;

/// Map source files must use this extension.
pub const MAP_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to scan maps directory {path:?}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("All maps have already been loaded")]
    AlreadyComplete,
    #[error(transparent)]
    Load(#[from] LoadMapError),
}

/// The cursor state for loading a directory of maps. The file queue is
/// sorted by name on construction, so load order is deterministic.
pub struct BatchLoader {
    loader: MapLoader,
    dir: PathBuf,
    queue: VecDeque<String>,
    total: usize,
    maps: HashMap<String, GameMap>,
}

/// What one [`BatchLoader::load_next`] call reports back.
#[derive(Debug)]
pub struct BatchStep<'a> {
    /// The identifier of the map this call loaded.
    pub name: String,
    /// Whether every map in the directory has now been loaded.
    pub done: bool,
    /// Percentage of maps loaded so far, up to 100.
    pub progress: f32,
    /// All maps accumulated so far, keyed by identifier.
    pub maps: &'a HashMap<String, GameMap>,
}

impl BatchLoader {
    /// Enumerate `dir` and queue every `.json` map in it.
    pub fn new(loader: MapLoader, dir: impl AsRef<Path>) -> Result<Self, BatchError> {
        let dir = dir.as_ref().to_path_buf();
        let scan_err = |source| BatchError::Scan {
            path: dir.clone(),
            source,
        };

        let mut stems = Vec::new();
        for entry in fs::read_dir(&dir).map_err(scan_err)? {
            let path = entry.map_err(scan_err)?.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension() else {
                continue;
            };
            if ext != MAP_EXTENSION {
                continue;
            }
            let Some(stem) = path.file_stem() else {
                continue;
            };
            stems.push(stem.to_string_lossy().into_owned());
        }
        stems.sort();

        let total = stems.len();
        info!("Found {total} maps in {dir:?}");
        Ok(BatchLoader {
            loader,
            dir,
            queue: stems.into(),
            total,
            maps: HashMap::new(),
        })
    }

    /// Load the next not-yet-loaded map and report cumulative state.
    /// Fails with [`BatchError::AlreadyComplete`] once the queue is
    /// exhausted.
    pub fn load_next(&mut self) -> Result<BatchStep<'_>, BatchError> {
        let Some(stem) = self.queue.pop_front() else {
            return Err(BatchError::AlreadyComplete);
        };

        let mut path = self.dir.join(&stem);
        path.set_extension(MAP_EXTENSION);
        let map = self.loader.load_map(&path)?;
        self.maps.insert(stem.clone(), map);

        Ok(BatchStep {
            name: stem,
            done: self.queue.is_empty(),
            progress: self.progress(),
            maps: &self.maps,
        })
    }

    pub fn is_done(&self) -> bool {
        self.queue.is_empty()
    }

    /// Percentage of maps loaded so far. An empty directory counts as
    /// fully loaded.
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 100.0;
        }
        100.0 * (self.total - self.queue.len()) as f32 / self.total as f32
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn maps(&self) -> &HashMap<String, GameMap> {
        &self.maps
    }

    pub fn into_maps(self) -> HashMap<String, GameMap> {
        self.maps
    }
}
