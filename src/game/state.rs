use super::session::Outcome;

/// Top-level state of the game, one per scene kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Menu,
    InGame,
    GameOver,
    Exit,
}

impl GameState {
    /// State entered when a level run ends with `outcome`. Reaching the exit
    /// moves straight on to another level.
    pub fn after(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Loved | Outcome::Heartbroken => GameState::GameOver,
            Outcome::Exited => GameState::InGame,
        }
    }
}
