// =============================================================================
// GEOMETRY.RS — Pixel-space primitives and the grid → canvas mapping
//
// - Axis-aligned rectangles (collision boxes, triggers, powerup bounds)
// - Distances between canvas positions
// - Centering a level grid inside the viewport
// =============================================================================

use glam::Vec2;

use crate::data::GridPos;

// =============================================================================
// RECT
// =============================================================================

/// Axis-aligned rectangle in pixel space. `(x, y)` is the top-left corner.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { x: pos.x, y: pos.y, w: size.x, h: size.y }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// True when the two rectangles overlap. Rectangles that only share an
    /// edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Half-open containment: the left and top edges are inside, the right
    /// and bottom edges are not.
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

// =============================================================================
// DISTANCE
// =============================================================================

/// Straight-line distance between two canvas positions.
#[inline]
pub fn distance_euclidean(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

// =============================================================================
// GRID → CANVAS
// =============================================================================

/// Top-left pixel of grid cell (0, 0) when a `level_dimensions` grid of
/// `tile_size` tiles is centred in a `viewport`.
pub fn canvas_offset(tile_size: Vec2, level_dimensions: (u32, u32), viewport: Vec2) -> Vec2 {
    let (w, h) = level_dimensions;
    let level_px = tile_size * Vec2::new(w as f32, h as f32);
    viewport / 2.0 - level_px / 2.0
}

/// Pixel position of the top-left corner of `grid` with the level centred in
/// the viewport. Pure: identical inputs always give identical output.
pub fn grid_to_canvas(
    grid: GridPos,
    tile_size: Vec2,
    level_dimensions: (u32, u32),
    viewport: Vec2,
) -> Vec2 {
    canvas_offset(tile_size, level_dimensions, viewport)
        + Vec2::new(grid.x as f32, grid.y as f32) * tile_size
}

/// The grid → canvas parameters for one level in one viewport.
///
/// Entities, powerups, the exit trigger and every tile go through the same
/// mapper so they line up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasMapper {
    pub tile_size: Vec2,
    pub level_dimensions: (u32, u32),
    pub viewport: Vec2,
}

impl CanvasMapper {
    pub fn new(tile_size: Vec2, level_dimensions: (u32, u32), viewport: Vec2) -> Self {
        Self { tile_size, level_dimensions, viewport }
    }

    pub fn offset(&self) -> Vec2 {
        canvas_offset(self.tile_size, self.level_dimensions, self.viewport)
    }

    pub fn grid_to_canvas(&self, grid: GridPos) -> Vec2 {
        grid_to_canvas(grid, self.tile_size, self.level_dimensions, self.viewport)
    }

    /// The full pixel rectangle covered by `grid`.
    pub fn cell_rect(&self, grid: GridPos) -> Rect {
        Rect::from_pos_size(self.grid_to_canvas(grid), self.tile_size)
    }
}
