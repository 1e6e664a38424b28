use glam::Vec2;
use rand::Rng;

use crate::geometry::distance_euclidean;

/// Players closer than this many pixels can interact with an NPC.
pub const INTERACT_RADIUS: f32 = 48.0;

/// A character the player tries to win over.
///
/// Love flows from the player into the NPC until `max_love` is reached; the
/// acceptance seed, rolled at spawn, then decides how the NPC answers.
#[derive(Clone, Debug, PartialEq)]
pub struct Npc {
    pub name: String,
    pub position: Vec2,
    max_love: f32,
    love: f32,
    accepts_when_fulfilled: bool,
}

impl Npc {
    /// Spawn with a random threshold in `1..=10` and a coin-flip answer.
    pub fn new(name: impl Into<String>, position: Vec2, rng: &mut impl Rng) -> Self {
        let max_love = rng.gen_range(1..=10) as f32;
        let seed = rng.gen_bool(0.5);
        Self::with_traits(name, position, max_love, seed)
    }

    pub fn with_traits(name: impl Into<String>, position: Vec2, max_love: f32, seed: bool) -> Self {
        Self {
            name: name.into(),
            position,
            max_love,
            love: 0.0,
            accepts_when_fulfilled: seed,
        }
    }

    /// Lower-cased name, used to pick the character sheet.
    pub fn sheet_name(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn love(&self) -> f32 {
        self.love
    }

    pub fn max_love(&self) -> f32 {
        self.max_love
    }

    pub fn is_near(&self, player: Vec2) -> bool {
        distance_euclidean(self.position, player) < INTERACT_RADIUS
    }

    pub fn transfer(&mut self, amount: f32) {
        self.love = (self.love + amount).min(self.max_love);
    }

    pub fn fulfilled(&self) -> bool {
        self.love >= self.max_love
    }

    /// True once fulfilled if the NPC returns the player's love.
    pub fn accepts(&self) -> bool {
        self.fulfilled() && self.accepts_when_fulfilled
    }
}
