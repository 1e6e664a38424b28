use glam::Vec2;
use lifelight::collision::{CollisionCache, decor_pass, tile_pass};
use lifelight::data::{GridPos, InlineOnly, Level};
use lifelight::geometry::{CanvasMapper, Rect};

const ROOM: &str = "\
LIFELIGHT LEVEL
TILESET inline
SIZE  4  3
BEGIN DEFINITIONS
X  0  0  1
.  1  0
END DEFINITIONS
BEGIN DECOR DEFINITIONS
f  2  0
END DECOR DEFINITIONS
BEGIN LAYOUT
XXXX
X. X
XXXX
END LAYOUT
BEGIN DECOR LAYOUT
\x20   
 f \x20
\x20   
END DECOR LAYOUT
BEGIN ENTITIES
PLAYER  1  1
END ENTITIES
";

fn room() -> (Level, CanvasMapper) {
    let level = Level::parse("room.lvl", ROOM, &mut InlineOnly).unwrap();
    // Viewport exactly the size of the level: cell (0, 0) sits at the origin.
    let mapper = CanvasMapper::new(Vec2::splat(48.0), level.dimensions, Vec2::new(192.0, 144.0));
    (level, mapper)
}

#[test]
fn test_tile_pass_skips_empty_cells_in_row_order() {
    let (level, mapper) = room();
    let cells: Vec<GridPos> = tile_pass(&level, &mapper).map(|c| c.grid).collect();
    assert_eq!(cells.len(), 11);
    assert_eq!(cells[0], GridPos::new(0, 0));
    assert_eq!(cells[4], GridPos::new(0, 1));
    assert_eq!(cells[5], GridPos::new(1, 1));
    assert_eq!(cells[6], GridPos::new(3, 1));
    assert!(!cells.contains(&GridPos::new(2, 1)));
}

#[test]
fn test_decor_pass_yields_decor_only() {
    let (level, mapper) = room();
    let cells: Vec<_> = decor_pass(&level, &mapper).collect();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].grid, GridPos::new(1, 1));
    assert_eq!(cells[0].rect, Rect::new(48.0, 48.0, 48.0, 48.0));
}

#[test]
fn test_cache_records_only_collidable_cells() {
    let (level, mapper) = room();
    let mut cache = CollisionCache::new();
    for cell in tile_pass(&level, &mapper) {
        cache.observe(&level, &cell);
    }
    assert!(!cache.is_primed());
    cache.end_frame();
    assert!(cache.is_primed());
    // 11 drawn cells, the floor tile is not solid.
    assert_eq!(cache.rects().len(), 10);
    assert!(!cache.rects().contains(&Rect::new(48.0, 48.0, 48.0, 48.0)));
}

#[test]
fn test_cache_is_frozen_after_first_frame() {
    let (level, mapper) = room();
    let mut cache = CollisionCache::new();
    cache.prime(&level, &mapper);
    let count = cache.rects().len();

    for cell in tile_pass(&level, &mapper) {
        cache.observe(&level, &cell);
    }
    cache.end_frame();
    assert_eq!(cache.rects().len(), count);
}

#[test]
fn test_empty_cache_blocks_nothing() {
    let cache = CollisionCache::new();
    assert!(!cache.is_primed());
    assert!(!cache.blocks(&Rect::new(0.0, 0.0, 1000.0, 1000.0)));
}

#[test]
fn test_blocks_uses_strict_overlap() {
    let (level, mapper) = room();
    let mut cache = CollisionCache::new();
    cache.prime(&level, &mapper);

    // Inside the floor cell and the empty cell beside it.
    assert!(!cache.blocks(&Rect::new(48.0, 48.0, 36.0, 36.0)));
    assert!(!cache.blocks(&Rect::new(96.0, 48.0, 48.0, 48.0)));
    // One pixel into the top wall.
    assert!(cache.blocks(&Rect::new(48.0, 47.0, 36.0, 36.0)));
}
