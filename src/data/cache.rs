use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::DataError;
use super::tileset::TilesetDefinition;

/// Parsed tileset-definition files keyed by resolved path.
///
/// Definition files are static for the lifetime of the process, so entries
/// are never invalidated.
#[derive(Debug, Default)]
pub struct DefinitionCache {
    entries: HashMap<PathBuf, Arc<TilesetDefinition>>,
}

impl DefinitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached definition for `path`, parsing the file on first use.
    /// Failed loads are not cached.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<TilesetDefinition>, DataError> {
        if let Some(hit) = self.entries.get(path) {
            log::debug!("tileset definitions cache hit: {}", path.display());
            return Ok(Arc::clone(hit));
        }
        let parsed = Arc::new(TilesetDefinition::load(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&parsed));
        Ok(parsed)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
