use std::collections::{HashMap, HashSet};
use std::fmt;

use super::error::ParseError;
use super::lines::Line;

// ── TileCoord ───────────────────────────────────────────────────────────────

/// Position of a tile inside a tile sheet, addressed by (column, row).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub col: i32,
    pub row: i32,
}

impl TileCoord {
    /// Sentinel: nothing is drawn in this cell.
    pub const EMPTY: Self = Self { col: -1, row: -1 };

    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn is_empty(self) -> bool {
        self.col == -1 && self.row == -1
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from((col, row): (i32, i32)) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

// ── GridPos ─────────────────────────────────────────────────────────────────

/// A cell in a level grid: `x` is the column, `y` the row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

// ── Definitions ─────────────────────────────────────────────────────────────

/// Symbol → tile mapping shared by tileset-definition files and the inline
/// definition blocks of level files.
///
/// The space symbol is always present and maps to [`TileCoord::EMPTY`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definitions {
    tiles: HashMap<char, TileCoord>,
    collidable: HashMap<char, bool>,
}

impl Default for Definitions {
    fn default() -> Self {
        let mut tiles = HashMap::new();
        tiles.insert(' ', TileCoord::EMPTY);
        let mut collidable = HashMap::new();
        collidable.insert(' ', false);
        Self { tiles, collidable }
    }
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: char, tile: TileCoord, collidable: bool) {
        self.tiles.insert(symbol, tile);
        self.collidable.insert(symbol, collidable);
    }

    pub fn get(&self, symbol: char) -> Option<TileCoord> {
        self.tiles.get(&symbol).copied()
    }

    pub fn is_collidable(&self, symbol: char) -> bool {
        self.collidable.get(&symbol).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &HashMap<char, TileCoord> {
        &self.tiles
    }

    pub fn collidable(&self) -> &HashMap<char, bool> {
        &self.collidable
    }

    /// Tile coordinates of every symbol flagged collidable.
    pub fn collidable_tiles(&self) -> HashSet<TileCoord> {
        self.tiles
            .iter()
            .filter(|(symbol, _)| self.is_collidable(**symbol))
            .map(|(_, tile)| *tile)
            .collect()
    }

    /// Parse one `<symbol>  <col>  <row>[  <collidable>]` line and add it.
    ///
    /// The trailing flag is only read when the line carries a fourth field;
    /// three-field lines are never collidable.
    pub fn parse_line(&mut self, line: &Line<'_>) -> Result<(), ParseError> {
        let fields = line.fields();
        if !(3..=4).contains(&fields.len()) {
            return Err(ParseError::format(
                line.number,
                format!(
                    "definition needs a symbol, column and row separated by two spaces, found {} field(s)",
                    fields.len()
                ),
            ));
        }

        let mut chars = fields[0].chars();
        let symbol = match (chars.next(), chars.next()) {
            (Some(symbol), None) => symbol,
            _ => {
                return Err(ParseError::format(
                    line.number,
                    format!("definition symbol {:?} must be a single character", fields[0]),
                ));
            }
        };

        let col = line.int(fields[1], "tile column")?;
        let row = line.int(fields[2], "tile row")?;
        let collidable = match fields.get(3) {
            Some(flag) => line.int(flag, "collidable flag")? != 0,
            None => false,
        };

        self.insert(symbol, TileCoord::new(col, row), collidable);
        Ok(())
    }
}
