//! The game's scenes and the state they share.

pub mod level;
pub mod menu;
pub mod outcome;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assets::AssetRoot;
use crate::config::GameConfig;
use crate::data::{DataError, Level, LevelLoader, TileCoord};
use crate::engine::{Color, Engine, EngineError};
use crate::game::{Canvas, Sheet};
use crate::geometry::Rect;
use crate::renderer::SheetId;
use crate::scene::SceneAction;

pub use level::LevelScene;
pub use menu::MenuScene;
pub use outcome::OutcomeScene;

pub type SharedContext = Rc<RefCell<GameContext>>;

const MUSIC: &str = "music";

// ── GameContext ─────────────────────────────────────────────────────────────

/// State that outlives a single scene.
pub struct GameContext {
    pub config: GameConfig,
    pub assets: AssetRoot,
    pub loader: LevelLoader,
    pub rng: StdRng,
    sheets: Option<SheetSet>,
    audio_ready: bool,
}

impl GameContext {
    pub fn new(config: GameConfig, assets: AssetRoot) -> Self {
        let loader = LevelLoader::new(assets.clone(), config.data_dir.clone());
        Self {
            config,
            assets,
            loader,
            rng: StdRng::from_entropy(),
            sheets: None,
            audio_ready: false,
        }
    }

    pub fn into_shared(self) -> SharedContext {
        Rc::new(RefCell::new(self))
    }

    /// Pick and load a random level.
    pub fn next_level(&mut self) -> Result<Arc<Level>, DataError> {
        self.loader.load_random(&mut self.rng).map(Arc::new)
    }

    /// Load sounds, music and tile sheets the first time a scene needs them.
    pub fn prepare(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        if !self.audio_ready {
            self.audio_ready = true;
            for (name, path) in &self.config.sounds {
                engine.audio.load_sound(name, self.assets.resolve(path));
            }
            if let Some(music) = &self.config.music {
                if engine.audio.load_sound(MUSIC, self.assets.resolve(music)) {
                    engine.audio.play_music(MUSIC, 1.0);
                }
            }
        }
        if self.sheets.is_none() {
            self.sheets = Some(SheetSet::load(engine, &self.assets, self.config.tile_size)?);
        }
        Ok(())
    }

    pub fn sheets_mut(&mut self) -> Option<&mut SheetSet> {
        self.sheets.as_mut()
    }
}

/// Switch to a fresh random level, or fail when none can be loaded.
pub fn start_level(ctx: &SharedContext) -> SceneAction {
    let next = ctx.borrow_mut().next_level();
    match next {
        Ok(level) => SceneAction::Switch(Box::new(LevelScene::new(Rc::clone(ctx), level))),
        Err(e) => SceneAction::Fail(format!("cannot load a level: {e}")),
    }
}

// ── SheetSet ────────────────────────────────────────────────────────────────

const STRUCTURE_SHEET: &str = "assets/tilesets/struct01.png";
const DECOR_SHEET: &str = "assets/tilesets/decor01.png";
const POWERUP_SHEET: &str = "assets/tilesets/powerups.png";
const UI_SHEET: &str = "assets/ui/ui_master.png";
const METER_FRAME: &str = "assets/ui/lovemeter.png";
const LOGO: &str = "assets/logo.png";
const PLAYER_NAME: &str = "amelia";

fn character_sheet(name: &str, kind: &str) -> String {
    format!("assets/characters/{name}_{kind}.png")
}

/// The GPU sheets behind each [`Sheet`].
pub struct SheetSet {
    assets: AssetRoot,
    tile: u32,
    structure: SheetId,
    decor: SheetId,
    powerups: SheetId,
    ui: SheetId,
    meter_frame: SheetId,
    player_idle: SheetId,
    player_run: SheetId,
    logo: Option<SheetId>,
    /// NPC idle sheets, loaded on first use; `None` when the file is missing.
    characters: HashMap<String, Option<SheetId>>,
}

impl SheetSet {
    pub fn load(engine: &mut Engine, assets: &AssetRoot, tile: u32) -> Result<Self, EngineError> {
        let logo = engine
            .load_image(assets.resolve(LOGO))
            .inspect_err(|e| log::warn!("{e}; the menu shows no logo"))
            .ok();
        let mut sheet = |path: &str, w: u32, h: u32| engine.load_sheet(assets.resolve(path), w, h);
        Ok(Self {
            assets: assets.clone(),
            tile,
            structure: sheet(STRUCTURE_SHEET, tile, tile)?,
            decor: sheet(DECOR_SHEET, tile, tile)?,
            powerups: sheet(POWERUP_SHEET, tile, tile)?,
            ui: sheet(UI_SHEET, tile, tile)?,
            meter_frame: sheet(METER_FRAME, 0, 0)?,
            player_idle: sheet(&character_sheet(PLAYER_NAME, "idle"), tile, tile * 2)?,
            player_run: sheet(&character_sheet(PLAYER_NAME, "run"), tile, tile * 2)?,
            logo,
            characters: HashMap::new(),
        })
    }

    /// Side of one grid tile in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile
    }

    pub fn logo(&self) -> Option<SheetId> {
        self.logo
    }

    pub fn resolve(&mut self, engine: &mut Engine, sheet: Sheet<'_>) -> Option<SheetId> {
        match sheet {
            Sheet::Structure => Some(self.structure),
            Sheet::Decor => Some(self.decor),
            Sheet::Powerups => Some(self.powerups),
            Sheet::Ui => Some(self.ui),
            Sheet::MeterFrame => Some(self.meter_frame),
            Sheet::PlayerIdle => Some(self.player_idle),
            Sheet::PlayerRun => Some(self.player_run),
            Sheet::Character(name) => {
                if let Some(id) = self.characters.get(name) {
                    return *id;
                }
                let path = self.assets.resolve(&character_sheet(name, "idle"));
                let id = match engine.load_sheet(&path, self.tile, self.tile * 2) {
                    Ok(id) => Some(id),
                    Err(e) => {
                        log::warn!("{e}; {name} will not be drawn");
                        None
                    }
                };
                self.characters.insert(name.to_string(), id);
                id
            }
        }
    }
}

// ── EngineCanvas ────────────────────────────────────────────────────────────

/// Sends session draw calls to the engine's draw queue.
pub struct EngineCanvas<'a> {
    pub engine: &'a mut Engine,
    pub sheets: &'a mut SheetSet,
}

impl Canvas for EngineCanvas<'_> {
    fn draw_tile(&mut self, sheet: Sheet<'_>, tile: TileCoord, position: Vec2) {
        if let Some(id) = self.sheets.resolve(self.engine, sheet) {
            self.engine.draw_tile(id, tile, position);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.engine.fill_rect(rect, color);
    }
}
