use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::audio::{AudioContext, SoundConfig};
use crate::config::GameConfig;
use crate::data::TileCoord;
use crate::game::Controls;
use crate::geometry::Rect;
use crate::input::{self, Action, ActionMap, InputState};
use crate::renderer::atlas::SheetGrid;
use crate::renderer::pipeline::quad;
use crate::renderer::{DrawQueue, Renderer, SheetId};

/// Longest frame time fed into the fixed-step accumulator.
const MAX_FRAME_TIME: f32 = 0.25;

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    pub const TRANSPARENT: Self = Self([0.0, 0.0, 0.0, 0.0]);
    /// Background of every scene.
    pub const DARK_BLACK: Self = Self::from_rgb8(0x1e, 0x20, 0x29);

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, a])
    }
}

// ── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("cannot create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("cannot create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("cannot create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface supports no texture format")]
    NoSurfaceFormat,
    #[error("cannot load tile sheet {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("game aborted: {0}")]
    Game(String),
}

// ── Game trait ──────────────────────────────────────────────────────────────

pub trait Game {
    fn on_enter(&mut self, _engine: &mut Engine) {}
    fn update(&mut self, engine: &mut Engine);
    fn render(&mut self, engine: &mut Engine);
}

// ── Engine ──────────────────────────────────────────────────────────────────

pub struct Engine {
    /// GPU renderer: surface, sprite pipeline and registered tile sheets.
    pub renderer: Renderer,
    pub input: InputState,
    pub actions: ActionMap<Action>,
    pub audio: AudioContext,
    queue: DrawQueue,
    dt: f32,
    tick: u64,
    /// Set by `request_quit()`; the event loop exits after the current tick.
    quit_requested: bool,
    /// Set by `fail()`; returned from `run` once the event loop exits.
    failure: Option<EngineError>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn new(renderer: Renderer) -> Self {
        Self {
            renderer,
            input: InputState::new(),
            actions: Action::default_bindings(),
            audio: AudioContext::new(),
            queue: DrawQueue::new(),
            dt: 0.0,
            tick: 0,
            quit_requested: false,
            failure: None,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn dt(&self) -> f32 { self.dt }
    pub fn tick(&self) -> u64 { self.tick }

    /// Drawable size in pixels.
    pub fn viewport(&self) -> Vec2 {
        let (w, h) = self.renderer.surface_size();
        Vec2::new(w as f32, h as f32)
    }

    pub fn is_action_pressed(&self, action: Action) -> bool { self.actions.is_pressed(action, &self.input) }
    pub fn is_action_held(&self, action: Action) -> bool { self.actions.is_held(action, &self.input) }

    /// Game controls held this tick.
    pub fn controls(&self) -> Controls {
        input::controls(&self.actions, &self.input)
    }

    /// Signal that the application should exit.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Stop the application and report `err` as the outcome of the run.
    pub fn fail(&mut self, err: EngineError) {
        self.failure = Some(err);
        self.quit_requested = true;
    }

    // ── Tile sheets ────────────────────────────────────────────────────────

    /// Load a PNG as a sheet of `tile_w × tile_h` tiles. A zero tile
    /// dimension uses the whole image as a single tile.
    pub fn load_sheet(&mut self, path: impl AsRef<Path>, tile_w: u32, tile_h: u32) -> Result<SheetId, EngineError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| EngineError::Image { path: path.to_path_buf(), source })?
            .to_rgba8();
        let id = self.renderer.add_sheet(&img, tile_w, tile_h, &path.to_string_lossy());
        log::debug!("loaded sheet {} as {id:?} ({}x{})", path.display(), img.width(), img.height());
        Ok(id)
    }

    /// Load a PNG that is drawn as one image.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<SheetId, EngineError> {
        self.load_sheet(path, 0, 0)
    }

    pub fn sheet_grid(&self, sheet: SheetId) -> Option<SheetGrid> {
        self.renderer.sheet_grid(sheet)
    }

    // ── Drawing ────────────────────────────────────────────────────────────

    /// Queue `tile` of `sheet` at its native size with its top-left corner at `position`.
    pub fn draw_tile(&mut self, sheet: SheetId, tile: TileCoord, position: Vec2) {
        self.draw_tile_tinted(sheet, tile, position, Color::WHITE);
    }

    pub fn draw_tile_tinted(&mut self, sheet: SheetId, tile: TileCoord, position: Vec2, tint: Color) {
        let Some(grid) = self.renderer.sheet_grid(sheet) else { return };
        let Some((uv_min, uv_max)) = grid.uv_for(tile) else {
            log::trace!("tile {tile} is outside sheet {sheet:?}");
            return;
        };
        self.queue.push(
            sheet,
            quad(position.x, position.y, grid.tile_w as f32, grid.tile_h as f32, uv_min, uv_max, tint.0),
        );
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.queue.push(
            SheetId::SOLID,
            quad(rect.x, rect.y, rect.w, rect.h, [0.0, 0.0], [1.0, 1.0], color.0),
        );
    }

    // ── Audio ──────────────────────────────────────────────────────────────

    pub fn play_sound(&mut self, name: &str) {
        self.audio.play(name, SoundConfig::default());
    }
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    resizable: bool,
    target_ups: u32,
    clear_color: Color,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            title: "lifelight".into(),
            width: 1280,
            height: 720,
            resizable: false,
            target_ups: 60,
            clear_color: Color::DARK_BLACK,
        }
    }
}

impl EngineBuilder {
    pub fn with_title(mut self, title: &str) -> Self { self.title = title.into(); self }
    pub fn with_size(mut self, width: u32, height: u32) -> Self { self.width = width; self.height = height; self }
    pub fn with_resizable(mut self, resizable: bool) -> Self { self.resizable = resizable; self }
    pub fn with_ups(mut self, ups: u32) -> Self { self.target_ups = ups.max(1); self }
    pub fn with_clear_color(mut self, color: Color) -> Self { self.clear_color = color; self }

    /// Window and loop settings from a game config.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::default()
            .with_title(&config.window.title)
            .with_size(config.window.width, config.window.height)
            .with_resizable(config.window.resizable)
            .with_ups(config.fps)
    }

    /// Run until the window closes or the game requests quit.
    pub fn run(self, game: impl Game + 'static) -> Result<(), EngineError> {
        let event_loop = EventLoop::new()?;
        let fixed_dt = 1.0 / self.target_ups as f32;
        let mut app = App {
            config: self,
            game: Box::new(game),
            engine: None,
            error: None,
            last_instant: None,
            accumulator: 0.0,
            fixed_dt,
        };
        event_loop.run_app(&mut app)?;
        match app.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    config: EngineBuilder,
    game: Box<dyn Game>,
    engine: Option<Engine>,
    /// Start-up or game failure, reported once the event loop has stopped.
    error: Option<EngineError>,
    last_instant: Option<Instant>,
    accumulator: f32,
    fixed_dt: f32,
}

impl App {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Engine, EngineError> {
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(&self.config.title)
                    .with_inner_size(winit::dpi::PhysicalSize::new(
                        self.config.width,
                        self.config.height,
                    ))
                    .with_resizable(self.config.resizable),
            )?,
        );
        let renderer = pollster::block_on(Renderer::new(window, self.config.clear_color))?;
        Ok(Engine::new(renderer))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(mut engine) => {
                self.game.on_enter(&mut engine);
                self.engine = Some(engine);
            }
            Err(e) => {
                log::error!("engine start-up failed: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = self.engine.as_ref() {
            engine.renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(engine) = self.engine.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => engine.renderer.resize(size),

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32().min(MAX_FRAME_TIME),
                    None => self.fixed_dt,
                };
                self.last_instant = Some(now);
                self.accumulator += elapsed;

                while self.accumulator >= self.fixed_dt {
                    engine.dt = self.fixed_dt;
                    engine.tick += 1;
                    self.game.update(engine);
                    // Edge events belong to the first tick that saw them.
                    engine.input.clear_frame_state();
                    if engine.quit_requested {
                        if let Some(e) = engine.failure.take() {
                            self.error = Some(e);
                        }
                        event_loop.exit();
                        return;
                    }
                    self.accumulator -= self.fixed_dt;
                }

                engine.queue.clear();
                self.game.render(engine);

                match engine.renderer.render(engine.queue.batches()) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = engine.renderer.window.inner_size();
                        engine.renderer.resize(size);
                    }
                    Err(e) => log::warn!("render error: {e}"),
                }
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => engine.input.press(code),
                ElementState::Released => engine.input.release(code),
            },

            _ => {}
        }
    }
}
