use crate::engine::{Engine, EngineError, Game};
use crate::game::GameState;
use crate::input::Action;

pub enum SceneAction {
    None,
    /// Replace the current scene.
    Switch(Box<dyn Scene>),
    Quit,
    /// Stop the game because of an unrecoverable error.
    Fail(String),
}

pub trait Scene {
    fn on_enter(&mut self, _engine: &mut Engine) {}
    fn on_exit(&mut self, _engine: &mut Engine) {}
    fn update(&mut self, engine: &mut Engine) -> SceneAction;
    fn draw(&mut self, engine: &mut Engine);
    /// The game state this scene represents.
    fn state(&self) -> GameState;
}

/// What the stack did with a scene's action, before any engine hooks run.
enum Transition {
    Stay,
    /// Holds the scene that was replaced.
    Switched(Box<dyn Scene>),
    /// `Some` carries the reason the game failed.
    Stop(Option<String>),
}

/// Owns the active scene and performs the transitions it asks for.
pub struct SceneStack {
    current: Box<dyn Scene>,
    state: GameState,
    initialized: bool,
}

impl SceneStack {
    pub fn new(initial: Box<dyn Scene>) -> Self {
        let state = initial.state();
        Self { current: initial, state, initialized: false }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    fn set_state(&mut self, next: GameState) {
        if next != self.state {
            log::info!("game state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn apply(&mut self, action: SceneAction) -> Transition {
        match action {
            SceneAction::None => Transition::Stay,
            SceneAction::Switch(next) => {
                let previous = std::mem::replace(&mut self.current, next);
                self.set_state(self.current.state());
                Transition::Switched(previous)
            }
            SceneAction::Quit => {
                self.set_state(GameState::Exit);
                Transition::Stop(None)
            }
            SceneAction::Fail(reason) => {
                self.set_state(GameState::Exit);
                Transition::Stop(Some(reason))
            }
        }
    }

    fn update_inner(&mut self, engine: &mut Engine) {
        let action = self.current.update(engine);
        match self.apply(action) {
            Transition::Stay => {}
            Transition::Switched(mut previous) => {
                previous.on_exit(engine);
                self.current.on_enter(engine);
            }
            Transition::Stop(failure) => {
                self.current.on_exit(engine);
                match failure {
                    Some(reason) => engine.fail(EngineError::Game(reason)),
                    None => engine.request_quit(),
                }
            }
        }
    }
}

impl Game for SceneStack {
    fn on_enter(&mut self, engine: &mut Engine) {
        if !self.initialized {
            self.initialized = true;
            self.current.on_enter(engine);
        }
    }

    fn update(&mut self, engine: &mut Engine) {
        if self.state == GameState::Exit {
            return;
        }
        if engine.is_action_pressed(Action::ToggleMusic) {
            engine.audio.toggle_music();
        }
        self.update_inner(engine);
    }

    fn render(&mut self, engine: &mut Engine) {
        self.current.draw(engine);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(GameState);

    impl Scene for Fixed {
        fn update(&mut self, _engine: &mut Engine) -> SceneAction {
            SceneAction::None
        }
        fn draw(&mut self, _engine: &mut Engine) {}
        fn state(&self) -> GameState {
            self.0
        }
    }

    fn stack() -> SceneStack {
        SceneStack::new(Box::new(Fixed(GameState::Menu)))
    }

    #[test]
    fn test_failing_scene_stops_with_reason() {
        let mut stack = stack();
        let transition = stack.apply(SceneAction::Fail("cannot load tile sheet".into()));
        match transition {
            Transition::Stop(Some(reason)) => assert_eq!(reason, "cannot load tile sheet"),
            Transition::Stop(None) => panic!("a failed scene must not quit cleanly"),
            _ => panic!("a failed scene must stop the game"),
        }
        assert_eq!(stack.state(), GameState::Exit);
    }

    #[test]
    fn test_quit_is_clean() {
        let mut stack = stack();
        assert!(matches!(stack.apply(SceneAction::Quit), Transition::Stop(None)));
        assert_eq!(stack.state(), GameState::Exit);
    }

    #[test]
    fn test_switch_follows_new_scene_state() {
        let mut stack = stack();
        let transition = stack.apply(SceneAction::Switch(Box::new(Fixed(GameState::InGame))));
        match transition {
            Transition::Switched(previous) => assert_eq!(previous.state(), GameState::Menu),
            _ => panic!("switch must hand back the previous scene"),
        }
        assert_eq!(stack.state(), GameState::InGame);
        assert!(matches!(stack.apply(SceneAction::None), Transition::Stay));
        assert_eq!(stack.state(), GameState::InGame);
    }

    #[test]
    fn test_failure_maps_to_engine_error() {
        let err = EngineError::Game("cannot load a level: no level files".into());
        assert_eq!(err.to_string(), "game aborted: cannot load a level: no level files");
    }
}
