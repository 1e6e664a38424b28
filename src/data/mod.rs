//! Level and tileset-definition files.
//!
//! Both formats are line-oriented text with `#` comments, blank lines, and
//! fields separated by exactly two spaces.

pub mod cache;
pub mod error;
pub mod level;
pub mod lines;
pub mod loader;
pub mod tile;
pub mod tileset;

pub use cache::DefinitionCache;
pub use error::{DataError, ParseError};
pub use level::{DefinitionSource, EntitySpawn, InlineOnly, Level};
pub use loader::LevelLoader;
pub use tile::{Definitions, GridPos, TileCoord};
pub use tileset::TilesetDefinition;
