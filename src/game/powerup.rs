use glam::Vec2;
use rand::Rng;

use crate::data::TileCoord;
use crate::geometry::Rect;

/// Love gained or lost when a powerup fires.
pub const POWERUP_AMOUNT: f32 = 5.0;
/// Side of a powerup's pickup square in pixels.
pub const POWERUP_SIZE: f32 = 48.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PowerupKind {
    Heart,
    BrokenHeart,
}

impl PowerupKind {
    /// Roll `1..=76`; 34 and above gives a heart (43 in 76).
    pub fn roll(rng: &mut impl Rng) -> Self {
        if rng.gen_range(1..=76) >= 34 {
            PowerupKind::Heart
        } else {
            PowerupKind::BrokenHeart
        }
    }

    /// Signed change to the love meter.
    pub fn love_delta(self) -> f32 {
        match self {
            PowerupKind::Heart => POWERUP_AMOUNT,
            PowerupKind::BrokenHeart => -POWERUP_AMOUNT,
        }
    }

    /// Tile in the powerups sheet.
    pub fn tile(self) -> TileCoord {
        match self {
            PowerupKind::Heart => TileCoord::new(0, 0),
            PowerupKind::BrokenHeart => TileCoord::new(1, 0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub bounds: Rect,
    activated: bool,
}

impl Powerup {
    pub fn new(kind: PowerupKind, position: Vec2) -> Self {
        Self {
            kind,
            bounds: Rect::from_pos_size(position, Vec2::splat(POWERUP_SIZE)),
            activated: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.bounds.position()
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Fire once when `point` lies inside the bounds.
    pub fn try_activate(&mut self, point: Vec2) -> Option<PowerupKind> {
        if self.activated || !self.bounds.contains_point(point) {
            return None;
        }
        self.activated = true;
        Some(self.kind)
    }
}
