//! Simulation of a level run: the player, NPCs, powerups and the love meter.
//!
//! Nothing here touches the window or the GPU; drawing goes through the
//! [`Canvas`] trait so a run can be stepped and painted headless.

pub mod love;
pub mod npc;
pub mod player;
pub mod powerup;
pub mod session;
pub mod state;

pub use love::LoveMeter;
pub use npc::Npc;
pub use player::{Controls, Facing, Player, PlayerSprite};
pub use powerup::{Powerup, PowerupKind};
pub use session::{Canvas, LevelSession, Outcome, SessionEvent, Sheet};
pub use state::GameState;
