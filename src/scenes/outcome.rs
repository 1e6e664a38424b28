use std::rc::Rc;

use glam::Vec2;

use crate::data::TileCoord;
use crate::engine::{Color, Engine};
use crate::game::session::{ACCEPT_MARKER, REJECT_MARKER};
use crate::game::{Canvas, GameState, Outcome, Sheet};
use crate::geometry::Rect;
use crate::input::Action;
use crate::scene::{Scene, SceneAction};

use super::{EngineCanvas, MenuScene, SharedContext, start_level};

/// End of a run. Confirm retries with a new level, Back returns to the menu.
pub struct OutcomeScene {
    ctx: SharedContext,
    outcome: Outcome,
    love_left: f32,
}

impl OutcomeScene {
    pub fn new(ctx: SharedContext, outcome: Outcome, love_left: f32) -> Self {
        Self { ctx, outcome, love_left }
    }
}

impl Scene for OutcomeScene {
    fn on_enter(&mut self, _engine: &mut Engine) {
        log::info!("run over: {:?} with {:.1} love left", self.outcome, self.love_left);
    }

    fn update(&mut self, engine: &mut Engine) -> SceneAction {
        if engine.is_action_pressed(Action::Confirm) {
            return start_level(&self.ctx);
        }
        if engine.is_action_pressed(Action::Back) {
            return SceneAction::Switch(Box::new(MenuScene::new(Rc::clone(&self.ctx))));
        }
        SceneAction::None
    }

    fn draw(&mut self, engine: &mut Engine) {
        let centre = engine.viewport() / 2.0;
        let mut ctx = self.ctx.borrow_mut();
        let Some(sheets) = ctx.sheets_mut() else { return };
        let tile = sheets.tile_size() as f32;
        let mut canvas = EngineCanvas { engine, sheets };

        let marker = match self.outcome {
            Outcome::Loved => ACCEPT_MARKER,
            Outcome::Heartbroken | Outcome::Exited => REJECT_MARKER,
        };
        let at = centre - Vec2::splat(tile / 2.0);
        canvas.fill_rect(
            Rect::new(at.x - tile, at.y - tile * 2.0, tile * 3.0, tile * 4.0),
            Color::BLACK.with_alpha(0.5),
        );
        canvas.draw_tile(Sheet::Ui, marker, at);
        canvas.draw_tile(Sheet::Ui, TileCoord::new(marker.col, marker.row - 1), at - Vec2::new(0.0, tile));
    }

    fn state(&self) -> GameState {
        GameState::GameOver
    }
}
