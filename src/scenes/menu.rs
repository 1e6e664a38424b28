use glam::Vec2;

use crate::data::TileCoord;
use crate::engine::Engine;
use crate::game::GameState;
use crate::input::Action;
use crate::scene::{Scene, SceneAction};

use super::{SharedContext, start_level};

const LOGO_TOP: f32 = 128.0;

/// Title screen. Confirm starts a random level, Back quits.
pub struct MenuScene {
    ctx: SharedContext,
    /// Why the game assets could not be prepared.
    failure: Option<String>,
}

impl MenuScene {
    pub fn new(ctx: SharedContext) -> Self {
        Self { ctx, failure: None }
    }
}

impl Scene for MenuScene {
    fn on_enter(&mut self, engine: &mut Engine) {
        if let Err(e) = self.ctx.borrow_mut().prepare(engine) {
            self.failure = Some(format!("cannot prepare game assets: {e}"));
        }
    }

    fn update(&mut self, engine: &mut Engine) -> SceneAction {
        if let Some(reason) = self.failure.take() {
            return SceneAction::Fail(reason);
        }
        if engine.is_action_pressed(Action::Back) {
            return SceneAction::Quit;
        }
        if engine.is_action_pressed(Action::Confirm) {
            return start_level(&self.ctx);
        }
        SceneAction::None
    }

    fn draw(&mut self, engine: &mut Engine) {
        let Some(logo) = self.ctx.borrow_mut().sheets_mut().and_then(|s| s.logo()) else { return };
        let Some(grid) = engine.sheet_grid(logo) else { return };
        let x = engine.viewport().x / 2.0 - grid.width as f32 / 2.0;
        engine.draw_tile(logo, TileCoord::new(0, 0), Vec2::new(x, LOGO_TOP));
    }

    fn state(&self) -> GameState {
        GameState::Menu
    }
}
