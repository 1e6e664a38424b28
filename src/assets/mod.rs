use std::path::{Path, PathBuf};

/// Environment variable that overrides where game assets are read from.
pub const ASSET_ROOT_ENV: &str = "LIFELIGHT_ASSETS";

/// Maps logical, `/`-separated asset paths (e.g. `data/ts_defs/struct.tsd`)
/// to files on disk.
///
/// The root moves when the game is packaged: the executable then ships next
/// to its data rather than being run from the source tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRoot {
    root: PathBuf,
}

impl AssetRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Pick the asset root: `$LIFELIGHT_ASSETS`, else the executable's
    /// directory when `marker` exists beside it, else the working directory.
    pub fn discover(marker: &str) -> Self {
        if let Some(dir) = std::env::var_os(ASSET_ROOT_ENV) {
            return Self::new(dir);
        }

        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .filter(|dir| dir.join(marker).exists());
        if let Some(dir) = beside_exe {
            return Self::new(dir);
        }

        Self::new(".")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a logical path against the root. Empty segments are ignored.
    pub fn resolve(&self, logical: &str) -> PathBuf {
        logical
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

impl Default for AssetRoot {
    fn default() -> Self {
        Self::new(".")
    }
}
