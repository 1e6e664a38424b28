use glam::Vec2;

use crate::collision::CollisionCache;
use crate::data::TileCoord;
use crate::geometry::Rect;

use super::love::LoveMeter;

/// Side of the square hit box tested against solid tiles before a move.
pub const HIT_BOX_SIZE: f32 = 36.0;
/// Frames in one run cycle.
pub const RUN_FRAMES: u32 = 6;
/// Seconds each run frame is shown.
pub const RUN_FRAME_TIME: f32 = 3.0 / 60.0;

// ── Facing ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    East,
    North,
    West,
    #[default]
    South,
}

impl Facing {
    /// Column of this facing in the idle sheet.
    pub fn index(self) -> i32 {
        match self {
            Facing::East => 0,
            Facing::North => 1,
            Facing::West => 2,
            Facing::South => 3,
        }
    }

    /// First column of this facing's cycle in the run sheet.
    pub fn run_base(self) -> i32 {
        self.index() * RUN_FRAMES as i32
    }

    /// Facing for a movement delta in screen space (y grows downwards).
    /// `None` when no component dominates, e.g. for equal diagonals.
    pub fn from_delta(delta: Vec2) -> Option<Self> {
        let (dx, dy) = (delta.x, delta.y);
        if dx > dy && dx > 0.0 {
            Some(Facing::East)
        } else if dy > dx && dy > 0.0 {
            Some(Facing::South)
        } else if dx < dy && dx < 0.0 {
            Some(Facing::West)
        } else if dy < dx && dy < 0.0 {
            Some(Facing::North)
        } else {
            None
        }
    }
}

// ── Controls ────────────────────────────────────────────────────────────────

/// Game controls held during one tick, decoupled from the keyboard.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub interact: bool,
}

impl Controls {
    /// Unit-per-axis direction of the held movement keys.
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        dir
    }
}

// ── Player ──────────────────────────────────────────────────────────────────

/// Which sheet a player sprite comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayerSprite {
    Idle(TileCoord),
    Run(TileCoord),
}

#[derive(Clone, Debug)]
pub struct Player {
    /// Canvas position in pixels; the feet sit at the top of this cell.
    pub position: Vec2,
    /// Pixels moved per tick along each held axis.
    pub speed: f32,
    pub love: LoveMeter,
    pub facing: Facing,
    pub moving: bool,
    frame: u32,
    frame_clock: f32,
}

impl Player {
    pub fn new(position: Vec2, speed: f32) -> Self {
        Self {
            position,
            speed,
            love: LoveMeter::new(),
            facing: Facing::default(),
            moving: false,
            frame: 0,
            frame_clock: 0.0,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Candidate position for the held controls, before collision.
    pub fn candidate(&self, controls: &Controls) -> Vec2 {
        self.position + controls.direction() * self.speed
    }

    /// Advance one tick. Returns whether the player actually moved.
    ///
    /// The run animation only advances while moving; standing still resets it.
    /// A move whose hit box overlaps a solid tile is dropped without changing
    /// facing or motion state.
    pub fn update(&mut self, controls: &Controls, dt: f32, collisions: &CollisionCache) -> bool {
        let target = self.candidate(controls);
        if target == self.position {
            self.moving = false;
            self.frame = 0;
            self.frame_clock = 0.0;
            return false;
        }

        let hit_box = Rect::new(target.x, target.y, HIT_BOX_SIZE, HIT_BOX_SIZE);
        if collisions.blocks(&hit_box) {
            return false;
        }

        self.moving = true;
        if let Some(facing) = Facing::from_delta(target - self.position) {
            self.facing = facing;
        }
        self.position = target;

        self.frame_clock += dt;
        while self.frame_clock >= RUN_FRAME_TIME {
            self.frame_clock -= RUN_FRAME_TIME;
            self.frame = (self.frame + 1) % RUN_FRAMES;
        }
        true
    }

    /// Sheet and tile to draw for the current state.
    pub fn sprite(&self) -> PlayerSprite {
        if self.moving {
            PlayerSprite::Run(TileCoord::new(self.facing.run_base() + self.frame as i32, 0))
        } else {
            PlayerSprite::Idle(TileCoord::new(self.facing.index(), 0))
        }
    }
}
