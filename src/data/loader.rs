use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;
use walkdir::WalkDir;

use crate::assets::AssetRoot;

use super::cache::DefinitionCache;
use super::error::DataError;
use super::level::{DefinitionSource, Level};
use super::tileset::TilesetDefinition;

pub const LEVEL_EXTENSION: &str = "lvl";
pub const DEFINITION_EXTENSION: &str = "tsd";

/// Loads levels from the data directory and owns the tileset-definition cache
/// shared by every level it loads.
#[derive(Debug)]
pub struct LevelLoader {
    assets: AssetRoot,
    data_dir: String,
    cache: DefinitionCache,
}

impl LevelLoader {
    pub fn new(assets: AssetRoot, data_dir: impl Into<String>) -> Self {
        Self { assets, data_dir: data_dir.into(), cache: DefinitionCache::new() }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.assets.resolve(&self.data_dir)
    }

    /// On-disk location of the `#name` tileset-definition file.
    pub fn definitions_path(&self, name: &str) -> PathBuf {
        self.assets
            .resolve(&format!("{}/ts_defs/{name}.{DEFINITION_EXTENSION}", self.data_dir))
    }

    /// Load a level by its path relative to the data directory, e.g. `level01.lvl`.
    pub fn load(&mut self, relative: &str) -> Result<Level, DataError> {
        let path = self.assets.resolve(&format!("{}/{relative}", self.data_dir));
        self.load_path(&path)
    }

    pub fn load_path(&mut self, path: &Path) -> Result<Level, DataError> {
        Level::load(path, self)
    }

    /// Every `.lvl` file under the data directory, sorted by path.
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut levels: Vec<PathBuf> = WalkDir::new(self.data_dir())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == LEVEL_EXTENSION))
            .collect();
        levels.sort();
        levels
    }

    /// Load one of the discovered levels, chosen uniformly at random.
    pub fn load_random(&mut self, rng: &mut impl Rng) -> Result<Level, DataError> {
        let levels = self.discover();
        let Some(path) = levels.choose(rng) else {
            return Err(DataError::NoLevels { dir: self.data_dir() });
        };
        log::info!("picked level {} of {} candidates", path.display(), levels.len());
        self.load_path(path)
    }

    pub fn cache(&self) -> &DefinitionCache {
        &self.cache
    }
}

impl DefinitionSource for LevelLoader {
    fn definitions(&mut self, name: &str) -> Result<Arc<TilesetDefinition>, DataError> {
        let path = self.definitions_path(name);
        self.cache.get_or_load(&path)
    }
}
