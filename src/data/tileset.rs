use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::error::{DataError, ParseError};
use super::lines::{LineCursor, Trim};
use super::tile::{Definitions, TileCoord};

pub const TILESET_HEADER: &str = "LIFELIGHT TILESET";
pub const BEGIN_DEFINITIONS: &str = "BEGIN DEFINITIONS";
pub const END_DEFINITIONS: &str = "END DEFINITIONS";

/// A parsed `.tsd` file: a named symbol → tile mapping with collidability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TilesetDefinition {
    pub name: String,
    pub source: PathBuf,
    pub definitions: Definitions,
}

impl TilesetDefinition {
    /// Read and parse a tileset-definition file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse tileset-definition text; `source` is only used for diagnostics.
    pub fn parse(source: impl AsRef<Path>, text: &str) -> Result<Self, DataError> {
        let source = source.as_ref();
        let (name, definitions) =
            parse_body(text).map_err(|err| DataError::parse(source, err))?;
        log::debug!(
            "parsed tileset '{}' ({} symbols) from {}",
            name,
            definitions.len(),
            source.display()
        );
        Ok(Self { name, source: source.to_path_buf(), definitions })
    }

    pub fn get(&self, symbol: char) -> Option<TileCoord> {
        self.definitions.get(symbol)
    }

    pub fn tiles(&self) -> &HashMap<char, TileCoord> {
        self.definitions.tiles()
    }

    pub fn collidable(&self) -> &HashMap<char, bool> {
        self.definitions.collidable()
    }
}

fn parse_body(text: &str) -> Result<(String, Definitions), ParseError> {
    let mut cursor = LineCursor::new(text, Trim::Whitespace);

    cursor.expect(TILESET_HEADER, "tileset definition header is missing or corrupt")?;

    let line = cursor.next_line("TILESET <name>")?;
    let name = match line.text.split(' ').collect::<Vec<_>>().as_slice() {
        ["TILESET", name] if !name.is_empty() => name.to_string(),
        _ => {
            return Err(ParseError::format(
                line.number,
                "tileset name must be given as `TILESET <name>`",
            ));
        }
    };

    let mut definitions = Definitions::new();
    for line in cursor.block(
        BEGIN_DEFINITIONS,
        END_DEFINITIONS,
        "expected beginning of definition block",
    )? {
        definitions.parse_line(&line)?;
    }

    Ok((name, definitions))
}
