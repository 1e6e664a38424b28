use std::rc::Rc;
use std::sync::Arc;

use crate::data::Level;
use crate::engine::Engine;
use crate::game::{GameState, LevelSession, PowerupKind, SessionEvent};
use crate::input::Action;
use crate::scene::{Scene, SceneAction};

use super::{EngineCanvas, MenuScene, OutcomeScene, SharedContext, start_level};

/// Plays one level until it ends.
pub struct LevelScene {
    ctx: SharedContext,
    level: Arc<Level>,
    session: Option<LevelSession>,
    failure: Option<String>,
}

impl LevelScene {
    pub fn new(ctx: SharedContext, level: Arc<Level>) -> Self {
        Self { ctx, level, session: None, failure: None }
    }
}

impl Scene for LevelScene {
    fn on_enter(&mut self, engine: &mut Engine) {
        let mut ctx = self.ctx.borrow_mut();
        if let Err(e) = ctx.prepare(engine) {
            self.failure = Some(format!("cannot start level: {e}"));
            return;
        }
        let tile_size = ctx.config.tile_size as f32;
        let speed = ctx.config.player_speed;
        self.session = Some(LevelSession::new(
            Arc::clone(&self.level),
            tile_size,
            speed,
            engine.viewport(),
            &mut ctx.rng,
        ));
        log::info!("entered level {}", self.level.source.display());
    }

    fn update(&mut self, engine: &mut Engine) -> SceneAction {
        if let Some(reason) = self.failure.take() {
            return SceneAction::Fail(reason);
        }
        let Some(session) = self.session.as_mut() else {
            return SceneAction::Fail(format!("level {} was never entered", self.level.source.display()));
        };
        if engine.is_action_pressed(Action::Back) {
            return SceneAction::Switch(Box::new(MenuScene::new(Rc::clone(&self.ctx))));
        }

        let controls = engine.controls();
        let outcome = {
            let mut ctx = self.ctx.borrow_mut();
            session.step(&controls, engine.dt(), &mut ctx.rng)
        };

        for event in session.take_events() {
            match event {
                SessionEvent::PowerupCollected(PowerupKind::Heart) => engine.play_sound("heart"),
                SessionEvent::PowerupCollected(PowerupKind::BrokenHeart) => engine.play_sound("broken_heart"),
                SessionEvent::NpcFulfilled { accepted: true, .. } => engine.play_sound("accept"),
                SessionEvent::NpcFulfilled { accepted: false, .. } => engine.play_sound("reject"),
            }
        }

        let Some(outcome) = outcome else {
            return SceneAction::None;
        };
        match GameState::after(outcome) {
            GameState::InGame => start_level(&self.ctx),
            _ => SceneAction::Switch(Box::new(OutcomeScene::new(
                Rc::clone(&self.ctx),
                outcome,
                session.player.love.value(),
            ))),
        }
    }

    fn draw(&mut self, engine: &mut Engine) {
        let Some(session) = self.session.as_mut() else { return };
        let mut ctx = self.ctx.borrow_mut();
        let Some(sheets) = ctx.sheets_mut() else { return };
        session.paint(&mut EngineCanvas { engine, sheets });
    }

    fn state(&self) -> GameState {
        GameState::InGame
    }
}
