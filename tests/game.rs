use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use lifelight::data::{InlineOnly, Level, TileCoord};
use lifelight::engine::Color;
use lifelight::game::player::RUN_FRAME_TIME;
use lifelight::game::*;
use lifelight::geometry::Rect;

// 5×3 room, walls all round, exit two cells right of the player.
const ROOM: &str = "\
LIFELIGHT LEVEL
TILESET inline
SIZE  5  3
BEGIN DEFINITIONS
X  0  0  1
.  1  0
END DEFINITIONS
BEGIN LAYOUT
XXXXX
X...X
XXXXX
END LAYOUT
BEGIN ENTITIES
PLAYER  1  1
EXIT  3  1
END ENTITIES
";

const TILE: f32 = 48.0;
const DT: f32 = 1.0 / 60.0;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn session(text: &str) -> LevelSession {
    let level = Arc::new(Level::parse("room.lvl", text, &mut InlineOnly).unwrap());
    let (w, h) = level.dimensions;
    // Viewport the size of the level, so grid (x, y) lands on (48x, 48y).
    let viewport = Vec2::new(w as f32 * TILE, h as f32 * TILE);
    LevelSession::new(level, TILE, 4.0, viewport, &mut rng())
}

fn hold(f: impl FnOnce(&mut Controls)) -> Controls {
    let mut c = Controls::default();
    f(&mut c);
    c
}

#[derive(Default)]
struct Recorder {
    tiles: Vec<(String, TileCoord, Vec2)>,
    fills: Vec<(Rect, Color)>,
}

impl Canvas for Recorder {
    fn draw_tile(&mut self, sheet: Sheet<'_>, tile: TileCoord, position: Vec2) {
        self.tiles.push((format!("{sheet:?}"), tile, position));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fills.push((rect, color));
    }
}

// ── Session setup ─────────────────────────────────────────────────────────

#[test]
fn test_entities_are_placed_through_mapper() {
    let s = session(ROOM);
    assert_eq!(s.player.position, Vec2::new(48.0, 48.0));
    assert_eq!(s.exit_trigger(), Some(Rect::new(144.0, 48.0, 48.0, 48.0)));
    assert!(s.npcs.is_empty());
    assert!(s.powerups.is_empty());
    assert_eq!(s.outcome(), None);
}

#[test]
fn test_npcs_and_powerups_spawn_from_level() {
    let text = ROOM
        .replace("EXIT  3  1\n", "EXIT  3  1\nRose  2  1\n")
        .replace("END ENTITIES\n", "END ENTITIES\nBEGIN POWERUPS\n2  1\nEND POWERUPS\n");
    let s = session(&text);
    assert_eq!(s.npcs.len(), 1);
    assert_eq!(s.npcs[0].name, "Rose");
    assert_eq!(s.npcs[0].position, Vec2::new(96.0, 48.0));
    assert!((1.0..=10.0).contains(&s.npcs[0].max_love()));
    assert_eq!(s.powerups.len(), 1);
    assert_eq!(s.powerups[0].position(), Vec2::new(96.0, 48.0));
}

// ── Movement and collision ────────────────────────────────────────────────

#[test]
fn test_walls_do_not_block_before_first_paint() {
    let mut s = session(ROOM);
    s.step(&hold(|c| c.up = true), DT, &mut rng());
    assert_eq!(s.player.position, Vec2::new(48.0, 44.0));
}

#[test]
fn test_walls_block_after_first_paint() {
    let mut s = session(ROOM);
    s.paint(&mut Recorder::default());
    assert!(s.collisions().is_primed());

    s.step(&hold(|c| c.up = true), DT, &mut rng());
    assert_eq!(s.player.position, Vec2::new(48.0, 48.0));
    s.step(&hold(|c| c.left = true), DT, &mut rng());
    assert_eq!(s.player.position, Vec2::new(48.0, 48.0));
    s.step(&hold(|c| c.right = true), DT, &mut rng());
    assert_eq!(s.player.position, Vec2::new(52.0, 48.0));
}

#[test]
fn test_blocked_move_keeps_facing() {
    let mut s = session(ROOM);
    s.prime_collisions();
    s.step(&hold(|c| c.right = true), DT, &mut rng());
    assert_eq!(s.player.facing, Facing::East);
    s.step(&hold(|c| c.up = true), DT, &mut rng());
    assert_eq!(s.player.facing, Facing::East);
}

#[test]
fn test_collision_cache_filled_once() {
    let mut s = session(ROOM);
    s.paint(&mut Recorder::default());
    let count = s.collisions().rects().len();
    assert_eq!(count, 12);
    s.paint(&mut Recorder::default());
    assert_eq!(s.collisions().rects().len(), count);
}

// ── Player ────────────────────────────────────────────────────────────────

#[test]
fn test_facing_from_delta() {
    assert_eq!(Facing::from_delta(Vec2::new(4.0, 0.0)), Some(Facing::East));
    assert_eq!(Facing::from_delta(Vec2::new(-4.0, 0.0)), Some(Facing::West));
    assert_eq!(Facing::from_delta(Vec2::new(0.0, 4.0)), Some(Facing::South));
    assert_eq!(Facing::from_delta(Vec2::new(0.0, -4.0)), Some(Facing::North));
    assert_eq!(Facing::from_delta(Vec2::new(4.0, 4.0)), None);
    assert_eq!(Facing::from_delta(Vec2::ZERO), None);
}

#[test]
fn test_player_sprite_follows_motion() {
    let walls = lifelight::collision::CollisionCache::new();
    let mut player = Player::new(Vec2::ZERO, 4.0);
    assert_eq!(player.sprite(), PlayerSprite::Idle(TileCoord::new(3, 0)));

    let left = hold(|c| c.left = true);
    for _ in 0..7 {
        assert!(player.update(&left, RUN_FRAME_TIME, &walls));
    }
    assert_eq!(player.frame(), 1);
    assert_eq!(player.sprite(), PlayerSprite::Run(TileCoord::new(13, 0)));

    assert!(!player.update(&Controls::default(), RUN_FRAME_TIME, &walls));
    assert_eq!(player.frame(), 0);
    assert_eq!(player.sprite(), PlayerSprite::Idle(TileCoord::new(2, 0)));
}

#[test]
fn test_opposite_keys_cancel() {
    let walls = lifelight::collision::CollisionCache::new();
    let mut player = Player::new(Vec2::new(10.0, 10.0), 4.0);
    let both = hold(|c| {
        c.left = true;
        c.right = true;
    });
    assert!(!player.update(&both, DT, &walls));
    assert_eq!(player.position, Vec2::new(10.0, 10.0));
}

// ── Outcomes ──────────────────────────────────────────────────────────────

#[test]
fn test_walking_into_exit_ends_level() {
    let mut s = session(ROOM);
    s.prime_collisions();
    let right = hold(|c| c.right = true);
    let mut r = rng();
    for _ in 0..23 {
        assert_eq!(s.step(&right, DT, &mut r), None);
    }
    assert_eq!(s.step(&right, DT, &mut r), Some(Outcome::Exited));
    assert_eq!(s.player.position, Vec2::new(144.0, 48.0));
}

#[test]
fn test_empty_meter_is_heartbroken_and_sticky() {
    let mut s = session(ROOM);
    s.player.love = LoveMeter::new().with_value(0.0);
    assert_eq!(s.step(&Controls::default(), DT, &mut rng()), Some(Outcome::Heartbroken));

    s.player.love = LoveMeter::new();
    assert_eq!(s.step(&Controls::default(), DT, &mut rng()), Some(Outcome::Heartbroken));
    assert_eq!(s.outcome(), Some(Outcome::Heartbroken));
}

#[test]
fn test_exit_wins_over_empty_meter() {
    let mut s = session(ROOM);
    s.player.position = Vec2::new(150.0, 60.0);
    s.player.love = LoveMeter::new().with_value(0.0);
    assert_eq!(s.step(&Controls::default(), DT, &mut rng()), Some(Outcome::Exited));
}

#[test]
fn test_accepting_npc_wins_the_level() {
    let mut s = session(ROOM);
    let near = s.player.position + Vec2::new(10.0, 0.0);
    s.npcs.push(Npc::with_traits("Rose", near, 1.0, true));
    let talk = hold(|c| c.interact = true);
    let mut r = rng();

    assert_eq!(s.step(&talk, DT, &mut r), None);
    assert_eq!(s.npcs[0].love(), 0.5);
    assert_eq!(s.step(&talk, DT, &mut r), Some(Outcome::Loved));
    assert!(s.player.love.value() < 99.1);
    assert_eq!(
        s.take_events(),
        vec![SessionEvent::NpcFulfilled { name: "Rose".into(), accepted: true }]
    );
}

#[test]
fn test_rejecting_npc_stops_taking_love() {
    let mut s = session(ROOM);
    let near = s.player.position + Vec2::new(0.0, 20.0);
    s.npcs.push(Npc::with_traits("Ivy", near, 1.0, false));
    let talk = hold(|c| c.interact = true);
    let mut r = rng();

    for _ in 0..2 {
        assert_eq!(s.step(&talk, DT, &mut r), None);
    }
    assert!(s.npcs[0].fulfilled());
    assert!(!s.npcs[0].accepts());
    let after = s.player.love.value();
    assert_eq!(s.step(&talk, DT, &mut r), None);
    assert!(after - s.player.love.value() < 0.001);
}

#[test]
fn test_interaction_needs_key_and_distance() {
    let mut s = session(ROOM);
    let far = s.player.position + Vec2::new(48.0, 0.0);
    s.npcs.push(Npc::with_traits("Far", far, 1.0, true));
    s.npcs.push(Npc::with_traits("Near", s.player.position, 1.0, true));

    s.step(&Controls::default(), DT, &mut rng());
    assert_eq!(s.npcs[1].love(), 0.0);

    s.step(&hold(|c| c.interact = true), DT, &mut rng());
    assert_eq!(s.npcs[0].love(), 0.0);
    assert_eq!(s.npcs[1].love(), 0.5);
}

#[test]
fn test_loved_wins_over_exit() {
    let mut s = session(ROOM);
    s.player.position = Vec2::new(150.0, 60.0);
    s.npcs.push(Npc::with_traits("Rose", s.player.position, 0.5, true));
    let talk = hold(|c| c.interact = true);
    assert_eq!(s.step(&talk, DT, &mut rng()), Some(Outcome::Loved));
}

#[test]
fn test_powerups_fire_once() {
    let mut s = session(ROOM);
    s.powerups.push(Powerup::new(PowerupKind::BrokenHeart, Vec2::new(40.0, 40.0)));
    let mut r = rng();

    s.step(&Controls::default(), DT, &mut r);
    assert!(s.powerups[0].is_activated());
    assert!((s.player.love.value() - 95.0).abs() < 0.01);
    assert_eq!(s.take_events(), vec![SessionEvent::PowerupCollected(PowerupKind::BrokenHeart)]);

    s.step(&Controls::default(), DT, &mut r);
    assert!(s.take_events().is_empty());
    assert!((s.player.love.value() - 95.0).abs() < 0.01);
}

#[test]
fn test_heart_is_capped_at_full() {
    let mut s = session(ROOM);
    s.powerups.push(Powerup::new(PowerupKind::Heart, s.player.position));
    s.step(&Controls::default(), DT, &mut rng());
    assert_eq!(s.player.love.value(), love::LOVE_MAX);
}

#[test]
fn test_powerup_roll_gives_both_kinds() {
    let mut r = StdRng::seed_from_u64(1);
    let kinds: Vec<_> = (0..200).map(|_| PowerupKind::roll(&mut r)).collect();
    assert!(kinds.contains(&PowerupKind::Heart));
    assert!(kinds.contains(&PowerupKind::BrokenHeart));
    assert_eq!(PowerupKind::Heart.tile(), TileCoord::new(0, 0));
    assert_eq!(PowerupKind::BrokenHeart.tile(), TileCoord::new(1, 0));
}

#[test]
fn test_state_after_outcome() {
    assert_eq!(GameState::after(Outcome::Exited), GameState::InGame);
    assert_eq!(GameState::after(Outcome::Loved), GameState::GameOver);
    assert_eq!(GameState::after(Outcome::Heartbroken), GameState::GameOver);
    assert_eq!(GameState::default(), GameState::Menu);
}

// ── Painting ──────────────────────────────────────────────────────────────

#[test]
fn test_paint_order_and_meter() {
    let mut s = session(ROOM);
    s.npcs.push(Npc::with_traits("Rose", Vec2::new(96.0, 48.0), 1.0, true));
    s.powerups.push(Powerup::new(PowerupKind::Heart, Vec2::new(96.0, 96.0)));
    s.player.love = LoveMeter::new().with_value(50.0);

    let mut canvas = Recorder::default();
    s.paint(&mut canvas);

    let sheets: Vec<&str> = canvas.tiles.iter().map(|(sheet, ..)| sheet.as_str()).collect();
    assert!(sheets[..15].iter().all(|s| *s == "Structure"));
    assert_eq!(sheets[15], "Powerups");
    assert_eq!(canvas.tiles[16], ("Character(\"rose\")".into(), TileCoord::new(3, 0), Vec2::new(96.0, 0.0)));
    assert_eq!(canvas.tiles[17], ("PlayerIdle".into(), TileCoord::new(3, 0), Vec2::new(48.0, 0.0)));
    assert_eq!(canvas.tiles[18].0, "MeterFrame");

    assert_eq!(canvas.fills.len(), 2);
    assert_eq!(canvas.fills[0].0, Rect::new(76.0, 40.0, 124.0, 8.0));
    assert_eq!(canvas.fills[1].0, Rect::new(76.0, 48.0, 124.0, 8.0));
}

#[test]
fn test_fulfilled_npc_shows_marker() {
    let mut s = session(ROOM);
    s.npcs.push(Npc::with_traits("Ivy", s.player.position, 0.5, false));
    s.step(&hold(|c| c.interact = true), DT, &mut rng());

    let mut canvas = Recorder::default();
    s.paint(&mut canvas);
    let markers: Vec<_> = canvas.tiles.iter().filter(|(sheet, ..)| sheet == "Ui").collect();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].1, session::REJECT_MARKER);
    assert_eq!(markers[0].2, Vec2::new(48.0, -4.0));
    assert_eq!(markers[1].1, TileCoord::new(7, 0));
}
