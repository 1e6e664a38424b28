use crate::data::{GridPos, Level, TileCoord};
use crate::geometry::{CanvasMapper, Rect};

// ── Tile passes ─────────────────────────────────────────────────────────────

/// A non-empty grid cell together with where it lands on the canvas.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PaintedTile {
    pub grid: GridPos,
    pub tile: TileCoord,
    pub rect: Rect,
}

/// Every non-empty cell of the base tile layer, row by row.
pub fn tile_pass<'a>(
    level: &'a Level,
    mapper: &'a CanvasMapper,
) -> impl Iterator<Item = PaintedTile> + 'a {
    layer_pass(&level.tiles, mapper)
}

/// Every non-empty cell of the decor layer, row by row.
pub fn decor_pass<'a>(
    level: &'a Level,
    mapper: &'a CanvasMapper,
) -> impl Iterator<Item = PaintedTile> + 'a {
    layer_pass(&level.decor, mapper)
}

fn layer_pass<'a>(
    grid: &'a [Vec<TileCoord>],
    mapper: &'a CanvasMapper,
) -> impl Iterator<Item = PaintedTile> + 'a {
    grid.iter().enumerate().flat_map(move |(y, row)| {
        row.iter().enumerate().filter_map(move |(x, tile)| {
            if tile.is_empty() {
                return None;
            }
            let grid = GridPos::new(x as i32, y as i32);
            Some(PaintedTile { grid, tile: *tile, rect: mapper.cell_rect(grid) })
        })
    })
}

// ── CollisionCache ──────────────────────────────────────────────────────────

/// Pixel rectangles of the solid tiles of one level instance.
///
/// Filled while the first frame paints the tile grid; from then on the list
/// is frozen and only read by movement tests.
#[derive(Debug, Default)]
pub struct CollisionCache {
    rects: Vec<Rect>,
    first_paint_done: bool,
}

impl CollisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the first paint has completed and the list is final.
    pub fn is_primed(&self) -> bool {
        self.first_paint_done
    }

    /// Record `cell` if it is solid. Ignored after the first paint.
    pub fn observe(&mut self, level: &Level, cell: &PaintedTile) {
        if self.first_paint_done {
            return;
        }
        if level.is_collidable(cell.grid) {
            self.rects.push(cell.rect);
        }
    }

    /// Close out a rendered frame. The first call freezes the cache.
    pub fn end_frame(&mut self) {
        if !self.first_paint_done {
            self.first_paint_done = true;
            log::debug!("collision cache primed with {} rectangles", self.rects.len());
        }
    }

    /// Run a full pass without drawing, for callers that never render.
    pub fn prime(&mut self, level: &Level, mapper: &CanvasMapper) {
        for cell in tile_pass(level, mapper) {
            self.observe(level, &cell);
        }
        self.end_frame();
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Whether `mover` overlaps any solid tile.
    pub fn blocks(&self, mover: &Rect) -> bool {
        self.rects.iter().any(|r| r.intersects(mover))
    }
}
