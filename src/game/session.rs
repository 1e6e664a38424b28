// =============================================================================
// SESSION.RS — One playthrough of one level
//
// Per tick: drain love → move the player against the collision cache →
// interact with nearby NPCs → collect powerups → check how the run ends.
// Per frame: paint base tiles (priming the collision cache on the first
// frame) → decor → powerups → NPCs → player → love meter.
// =============================================================================

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;

use crate::collision::{CollisionCache, decor_pass, tile_pass};
use crate::data::{GridPos, Level, TileCoord};
use crate::engine::Color;
use crate::geometry::{CanvasMapper, Rect};

use super::npc::Npc;
use super::player::{Controls, Facing, Player, PlayerSprite};
use super::powerup::{Powerup, PowerupKind};

/// Love moved from the player to an NPC per tick of interaction.
pub const INTERACT_TRANSFER: f32 = 0.5;

/// UI sheet marker shown above an NPC that accepted the player.
pub const ACCEPT_MARKER: TileCoord = TileCoord::new(6, 1);
/// UI sheet marker shown above an NPC that turned the player down.
pub const REJECT_MARKER: TileCoord = TileCoord::new(7, 1);

const MARKER_GAP: f32 = 4.0;
const METER_FRAME_POS: Vec2 = Vec2::new(16.0, 16.0);
const METER_ORIGIN: Vec2 = Vec2::new(76.0, 40.0);
const METER_WIDTH: f32 = 248.0;
const METER_BAR_HEIGHT: f32 = 8.0;
const METER_UPPER: Color = Color::from_rgb8(0xa3, 0xc2, 0x55);
const METER_LOWER: Color = Color::from_rgb8(0x6f, 0xa3, 0x41);

// ── Drawing seam ────────────────────────────────────────────────────────────

/// Tile sheets a session draws from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Sheet<'a> {
    Structure,
    Decor,
    Powerups,
    Ui,
    MeterFrame,
    PlayerIdle,
    PlayerRun,
    /// Idle sheet of a named NPC (lower-cased entity name).
    Character(&'a str),
}

/// Receives the draw calls of one frame.
pub trait Canvas {
    /// Draw `tile` of `sheet` with its top-left corner at `position`.
    fn draw_tile(&mut self, sheet: Sheet<'_>, tile: TileCoord, position: Vec2);
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

// ── Outcome ─────────────────────────────────────────────────────────────────

/// How a level run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// An NPC was fulfilled and returned the player's love.
    Loved,
    /// The love meter ran dry.
    Heartbroken,
    /// The player reached the exit.
    Exited,
}

/// Something noteworthy that happened during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    PowerupCollected(PowerupKind),
    /// An NPC reached its love threshold and answered.
    NpcFulfilled { name: String, accepted: bool },
}

// ── LevelSession ────────────────────────────────────────────────────────────

pub struct LevelSession {
    level: Arc<Level>,
    mapper: CanvasMapper,
    collisions: CollisionCache,
    pub player: Player,
    pub npcs: Vec<Npc>,
    pub powerups: Vec<Powerup>,
    exit_trigger: Option<Rect>,
    outcome: Option<Outcome>,
    events: Vec<SessionEvent>,
}

impl LevelSession {
    pub fn new(
        level: Arc<Level>,
        tile_size: f32,
        player_speed: f32,
        viewport: Vec2,
        rng: &mut impl Rng,
    ) -> Self {
        let mapper = CanvasMapper::new(Vec2::splat(tile_size), level.dimensions, viewport);

        let spawn = level.player_spawn().unwrap_or_else(|| {
            log::warn!("level {} has no PLAYER entity, spawning at (0, 0)", level.source.display());
            GridPos::default()
        });
        let player = Player::new(mapper.grid_to_canvas(spawn), player_speed);

        let exit_trigger = level.exit().map(|exit| mapper.cell_rect(exit));
        if exit_trigger.is_none() {
            log::warn!("level {} has no EXIT entity", level.source.display());
        }

        let npcs = level
            .npcs()
            .map(|e| Npc::new(e.name.clone(), mapper.grid_to_canvas(e.position), rng))
            .collect();

        let powerups = level
            .powerups
            .iter()
            .map(|pos| Powerup::new(PowerupKind::roll(rng), mapper.grid_to_canvas(*pos)))
            .collect();

        Self {
            level,
            mapper,
            collisions: CollisionCache::new(),
            player,
            npcs,
            powerups,
            exit_trigger,
            outcome: None,
            events: Vec::new(),
        }
    }

    pub fn level(&self) -> &Arc<Level> {
        &self.level
    }

    pub fn mapper(&self) -> &CanvasMapper {
        &self.mapper
    }

    pub fn collisions(&self) -> &CollisionCache {
        &self.collisions
    }

    pub fn exit_trigger(&self) -> Option<Rect> {
        self.exit_trigger
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Events since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fill the collision cache without painting.
    pub fn prime_collisions(&mut self) {
        self.collisions.prime(&self.level, &self.mapper);
    }

    /// Advance the simulation by one tick.
    ///
    /// Once an outcome is reached it is returned again on every later call
    /// and nothing else changes.
    pub fn step(&mut self, controls: &Controls, dt: f32, rng: &mut impl Rng) -> Option<Outcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }

        self.player.love.drain(rng);
        self.player.update(controls, dt, &self.collisions);

        let mut loved = false;
        if controls.interact {
            for npc in &mut self.npcs {
                if !npc.is_near(self.player.position) || npc.fulfilled() {
                    continue;
                }
                self.player.love.subtract(INTERACT_TRANSFER);
                npc.transfer(INTERACT_TRANSFER);
                if npc.fulfilled() {
                    log::info!("{} fulfilled, accepts: {}", npc.name, npc.accepts());
                    self.events.push(SessionEvent::NpcFulfilled {
                        name: npc.name.clone(),
                        accepted: npc.accepts(),
                    });
                }
                loved |= npc.accepts();
            }
        }

        for powerup in &mut self.powerups {
            if let Some(kind) = powerup.try_activate(self.player.position) {
                let delta = kind.love_delta();
                if delta >= 0.0 {
                    self.player.love.add(delta);
                } else {
                    self.player.love.subtract(-delta);
                }
                log::debug!("picked up {kind:?}, love now {:.2}", self.player.love.value());
                self.events.push(SessionEvent::PowerupCollected(kind));
            }
        }

        let at_exit = self
            .exit_trigger
            .is_some_and(|trigger| trigger.contains_point(self.player.position));

        self.outcome = if loved {
            Some(Outcome::Loved)
        } else if at_exit {
            Some(Outcome::Exited)
        } else if self.player.love.is_empty() {
            Some(Outcome::Heartbroken)
        } else {
            None
        };

        if let Some(outcome) = self.outcome {
            log::info!("level {} ended: {outcome:?}", self.level.source.display());
        }
        self.outcome
    }

    /// Emit the draw calls for one frame.
    pub fn paint(&mut self, canvas: &mut impl Canvas) {
        for cell in tile_pass(&self.level, &self.mapper) {
            self.collisions.observe(&self.level, &cell);
            canvas.draw_tile(Sheet::Structure, cell.tile, cell.rect.position());
        }
        for cell in decor_pass(&self.level, &self.mapper) {
            canvas.draw_tile(Sheet::Decor, cell.tile, cell.rect.position());
        }

        for powerup in self.powerups.iter().filter(|p| !p.is_activated()) {
            canvas.draw_tile(Sheet::Powerups, powerup.kind.tile(), powerup.position());
        }

        // Character sprites are two tiles tall and stand on their cell.
        let lift = Vec2::new(0.0, self.mapper.tile_size.y);
        for npc in &self.npcs {
            let at = npc.position - lift;
            let name = npc.sheet_name();
            canvas.draw_tile(Sheet::Character(&name), TileCoord::new(Facing::South.index(), 0), at);

            if !npc.fulfilled() {
                continue;
            }
            let marker = if npc.accepts() { ACCEPT_MARKER } else { REJECT_MARKER };
            let above = TileCoord::new(marker.col, marker.row - 1);
            canvas.draw_tile(Sheet::Ui, marker, at - Vec2::new(0.0, MARKER_GAP));
            canvas.draw_tile(Sheet::Ui, above, at - Vec2::new(0.0, MARKER_GAP) - lift);
        }

        let at = self.player.position - lift;
        match self.player.sprite() {
            PlayerSprite::Idle(tile) => canvas.draw_tile(Sheet::PlayerIdle, tile, at),
            PlayerSprite::Run(tile) => canvas.draw_tile(Sheet::PlayerRun, tile, at),
        }

        let progress = METER_WIDTH * self.player.love.fraction();
        canvas.draw_tile(Sheet::MeterFrame, TileCoord::new(0, 0), METER_FRAME_POS);
        canvas.fill_rect(
            Rect::new(METER_ORIGIN.x, METER_ORIGIN.y, progress, METER_BAR_HEIGHT),
            METER_UPPER,
        );
        canvas.fill_rect(
            Rect::new(METER_ORIGIN.x, METER_ORIGIN.y + METER_BAR_HEIGHT, progress, METER_BAR_HEIGHT),
            METER_LOWER,
        );

        self.collisions.end_frame();
    }
}
