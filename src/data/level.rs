// =============================================================================
// LEVEL.RS — `.lvl` level files
//
// Layout of a level file, in order:
//
//   LIFELIGHT LEVEL
//   TILESET <name>                 (`#name` refers to ts_defs/<name>.tsd)
//   [DECOR <name>]
//   SIZE  <width>  <height>
//   [BEGIN DEFINITIONS ... END DEFINITIONS]             inline tilesets only
//   [BEGIN DECOR DEFINITIONS ... END DECOR DEFINITIONS]
//   BEGIN LAYOUT ... END LAYOUT
//   [BEGIN DECOR LAYOUT ... END DECOR LAYOUT]
//   BEGIN ENTITIES ... END ENTITIES
//   [BEGIN POWERUPS ... END POWERUPS]
// =============================================================================

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::{DataError, ParseError};
use super::lines::{Line, LineCursor, Trim};
use super::tile::{Definitions, GridPos, TileCoord};
use super::tileset::{BEGIN_DEFINITIONS, END_DEFINITIONS, TilesetDefinition};

pub const LEVEL_HEADER: &str = "LIFELIGHT LEVEL";

const BEGIN_DECOR_DEFINITIONS: &str = "BEGIN DECOR DEFINITIONS";
const END_DECOR_DEFINITIONS: &str = "END DECOR DEFINITIONS";
const BEGIN_LAYOUT: &str = "BEGIN LAYOUT";
const END_LAYOUT: &str = "END LAYOUT";
const BEGIN_DECOR_LAYOUT: &str = "BEGIN DECOR LAYOUT";
const END_DECOR_LAYOUT: &str = "END DECOR LAYOUT";
const BEGIN_ENTITIES: &str = "BEGIN ENTITIES";
const END_ENTITIES: &str = "END ENTITIES";
const BEGIN_POWERUPS: &str = "BEGIN POWERUPS";
const END_POWERUPS: &str = "END POWERUPS";

/// Entity name of the player spawn point.
pub const PLAYER_ENTITY: &str = "PLAYER";
/// Entity name of the level exit.
pub const EXIT_ENTITY: &str = "EXIT";

// ── DefinitionSource ────────────────────────────────────────────────────────

/// Supplies tileset definitions for `#name` references in level files.
pub trait DefinitionSource {
    fn definitions(&mut self, name: &str) -> Result<Arc<TilesetDefinition>, DataError>;
}

impl<F> DefinitionSource for F
where
    F: FnMut(&str) -> Result<Arc<TilesetDefinition>, DataError>,
{
    fn definitions(&mut self, name: &str) -> Result<Arc<TilesetDefinition>, DataError> {
        self(name)
    }
}

/// A source with no external files; every `#name` reference fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineOnly;

impl DefinitionSource for InlineOnly {
    fn definitions(&mut self, name: &str) -> Result<Arc<TilesetDefinition>, DataError> {
        Err(DataError::Io {
            path: PathBuf::from(format!("ts_defs/{name}.tsd")),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no tileset definition files are available",
            ),
        })
    }
}

// ── Level ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntitySpawn {
    pub name: String,
    pub position: GridPos,
}

/// A fully parsed level. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    pub source: PathBuf,
    /// Lower-cased; keeps the leading `#` of external references.
    pub tileset_name: String,
    pub decor_tileset_name: Option<String>,
    /// (width, height) in tiles.
    pub dimensions: (u32, u32),
    pub tile_definitions: Definitions,
    /// Row-major: `tiles[y][x]`.
    pub tiles: Vec<Vec<TileCoord>>,
    pub decor_definitions: Definitions,
    /// Row-major like `tiles`; empty when the level has no decor layout.
    pub decor: Vec<Vec<TileCoord>>,
    pub entities: Vec<EntitySpawn>,
    pub collidable_tiles: HashSet<TileCoord>,
    pub powerups: Vec<GridPos>,
}

impl Level {
    pub fn load(path: impl AsRef<Path>, defs: &mut impl DefinitionSource) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text, defs)
    }

    /// Parse level text. `source` is recorded on the level and used in errors.
    pub fn parse(
        source: impl AsRef<Path>,
        text: &str,
        defs: &mut impl DefinitionSource,
    ) -> Result<Self, DataError> {
        let source = source.as_ref();
        let at = |err: ParseError| DataError::parse(source, err);
        let mut cursor = LineCursor::new(text, Trim::Terminator);

        cursor
            .expect(LEVEL_HEADER, "level file header is missing or corrupt")
            .map_err(at)?;

        let line = cursor.next_line("TILESET <name>").map_err(at)?;
        let tileset_name = keyword_value(&line, "TILESET")
            .ok_or_else(|| at(ParseError::format(line.number, "tileset data is missing or corrupt")))?;

        // DECOR is optional: only consume the line when it really is one.
        let decor_tileset_name = if cursor.peek_keyword("DECOR") {
            let line = cursor.next_line("DECOR <name>").map_err(at)?;
            let name = keyword_value(&line, "DECOR").ok_or_else(|| {
                at(ParseError::format(line.number, "decor tileset name is missing"))
            })?;
            Some(name)
        } else {
            None
        };

        let dimensions = parse_size(&mut cursor).map_err(at)?;

        let tile_definitions = match external_name(&tileset_name) {
            Some(name) => resolve_external(defs, name)?,
            None => {
                let body = cursor
                    .block(BEGIN_DEFINITIONS, END_DEFINITIONS, "definition block is missing or corrupt")
                    .map_err(at)?;
                definitions_from(&body).map_err(at)?
            }
        };

        let decor_definitions = match decor_tileset_name.as_deref().and_then(external_name) {
            Some(name) => resolve_external(defs, name)?,
            None => match cursor
                .optional_block(BEGIN_DECOR_DEFINITIONS, END_DECOR_DEFINITIONS)
                .map_err(at)?
            {
                Some(body) => definitions_from(&body).map_err(at)?,
                None => Definitions::new(),
            },
        };

        let layout_line = cursor.peek().map(|l| l.number);
        let body = cursor
            .block(BEGIN_LAYOUT, END_LAYOUT, "layout block is missing or corrupt")
            .map_err(at)?;
        let tiles = grid_from(&body, &tile_definitions, dimensions, layout_line).map_err(at)?;

        let decor_line = cursor.peek().map(|l| l.number);
        let decor = match cursor
            .optional_block(BEGIN_DECOR_LAYOUT, END_DECOR_LAYOUT)
            .map_err(at)?
        {
            Some(body) => grid_from(&body, &decor_definitions, dimensions, decor_line).map_err(at)?,
            None => Vec::new(),
        };

        let body = cursor
            .block(BEGIN_ENTITIES, END_ENTITIES, "entity block is missing or corrupt")
            .map_err(at)?;
        let entities = body
            .iter()
            .map(parse_entity)
            .collect::<Result<Vec<_>, _>>()
            .map_err(at)?;

        let powerups = match cursor.optional_block(BEGIN_POWERUPS, END_POWERUPS).map_err(at)? {
            Some(body) => body
                .iter()
                .map(|line| parse_position(line, &line.fields(), "powerup"))
                .collect::<Result<Vec<_>, _>>()
                .map_err(at)?,
            None => Vec::new(),
        };

        if let Some(line) = cursor.peek() {
            return Err(at(ParseError::format(
                line.number,
                format!("unexpected content after the last block: {:?}", line.text),
            )));
        }

        let collidable_tiles = tile_definitions.collidable_tiles();

        log::info!(
            "loaded level {} ({}x{}, {} entities, {} powerups)",
            source.display(),
            dimensions.0,
            dimensions.1,
            entities.len(),
            powerups.len()
        );

        Ok(Self {
            source: source.to_path_buf(),
            tileset_name,
            decor_tileset_name,
            dimensions,
            tile_definitions,
            tiles,
            decor_definitions,
            decor,
            entities,
            collidable_tiles,
            powerups,
        })
    }

    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    pub fn height(&self) -> u32 {
        self.dimensions.1
    }

    pub fn tile_at(&self, pos: GridPos) -> Option<TileCoord> {
        cell(&self.tiles, pos)
    }

    pub fn decor_at(&self, pos: GridPos) -> Option<TileCoord> {
        cell(&self.decor, pos)
    }

    /// Whether the tile at `pos` is solid. Cells outside the grid are not.
    pub fn is_collidable(&self, pos: GridPos) -> bool {
        self.tile_at(pos)
            .is_some_and(|tile| self.collidable_tiles.contains(&tile))
    }

    /// Grid position of the first entity called `name`.
    pub fn spawn(&self, name: &str) -> Option<GridPos> {
        self.entities
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.position)
    }

    pub fn player_spawn(&self) -> Option<GridPos> {
        self.spawn(PLAYER_ENTITY)
    }

    pub fn exit(&self) -> Option<GridPos> {
        self.spawn(EXIT_ENTITY)
    }

    /// Every entity that is neither the player nor the exit.
    pub fn npcs(&self) -> impl Iterator<Item = &EntitySpawn> {
        self.entities
            .iter()
            .filter(|e| e.name != PLAYER_ENTITY && e.name != EXIT_ENTITY)
    }
}

// ── Parsing helpers ─────────────────────────────────────────────────────────

fn cell(grid: &[Vec<TileCoord>], pos: GridPos) -> Option<TileCoord> {
    let x = usize::try_from(pos.x).ok()?;
    let y = usize::try_from(pos.y).ok()?;
    grid.get(y)?.get(x).copied()
}

fn external_name(name: &str) -> Option<&str> {
    name.strip_prefix('#')
}

/// `KEYWORD <value>` with a single-space separator; the value is lower-cased.
fn keyword_value(line: &Line<'_>, keyword: &str) -> Option<String> {
    let (key, value) = line.text.split_once(' ')?;
    let value = value.trim().to_lowercase();
    (key == keyword && !value.is_empty()).then_some(value)
}

fn parse_size(cursor: &mut LineCursor<'_>) -> Result<(u32, u32), ParseError> {
    let line = cursor.next_line("SIZE  <width>  <height>")?;
    let fields = line.fields();
    if fields[0] != "SIZE" {
        return Err(ParseError::format(line.number, "level dimensions are missing or corrupt"));
    }
    if fields.len() != 3 {
        return Err(ParseError::format(
            line.number,
            format!("SIZE needs a width and a height separated by two spaces, found {} field(s)", fields.len() - 1),
        ));
    }
    let width = line.int(fields[1], "level width")?;
    let height = line.int(fields[2], "level height")?;
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ParseError::format(line.number, "level dimensions must not be negative")),
    }
}

fn resolve_external(defs: &mut impl DefinitionSource, name: &str) -> Result<Definitions, DataError> {
    defs.definitions(name)
        .map(|tileset| tileset.definitions.clone())
        .map_err(|source| DataError::Definitions {
            name: name.to_string(),
            source: Box::new(source),
        })
}

fn definitions_from(body: &[Line<'_>]) -> Result<Definitions, ParseError> {
    let mut definitions = Definitions::new();
    for line in body {
        definitions.parse_line(line)?;
    }
    Ok(definitions)
}

/// Look up every character of every row; rows must match `dimensions`.
fn grid_from(
    body: &[Line<'_>],
    definitions: &Definitions,
    (width, height): (u32, u32),
    block_line: Option<usize>,
) -> Result<Vec<Vec<TileCoord>>, ParseError> {
    let mut grid = Vec::with_capacity(body.len());
    for line in body {
        let row = line
            .text
            .chars()
            .map(|symbol| {
                definitions
                    .get(symbol)
                    .ok_or(ParseError::Lookup { line: line.number, symbol })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if row.len() != width as usize {
            return Err(ParseError::format(
                line.number,
                format!("layout row is {} tiles wide, level width is {width}", row.len()),
            ));
        }
        grid.push(row);
    }

    if grid.len() != height as usize {
        return Err(ParseError::format(
            block_line.unwrap_or(1),
            format!("layout has {} rows, level height is {height}", grid.len()),
        ));
    }
    Ok(grid)
}

fn parse_entity(line: &Line<'_>) -> Result<EntitySpawn, ParseError> {
    let fields = line.fields();
    if fields.len() != 3 {
        return Err(ParseError::format(
            line.number,
            format!("entity needs a name, x and y separated by two spaces, found {} field(s)", fields.len()),
        ));
    }
    let position = parse_position(line, &fields[1..], "entity")?;
    Ok(EntitySpawn { name: fields[0].to_string(), position })
}

fn parse_position(line: &Line<'_>, fields: &[&str], what: &str) -> Result<GridPos, ParseError> {
    match fields {
        [x, y] => Ok(GridPos::new(
            line.int(x, &format!("{what} x"))?,
            line.int(y, &format!("{what} y"))?,
        )),
        _ => Err(ParseError::format(
            line.number,
            format!("{what} position needs x and y separated by two spaces"),
        )),
    }
}
