pub mod assets;
pub mod audio;
pub mod collision;
pub mod config;
pub mod data;
pub mod engine;
pub mod game;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod scene;
pub mod scenes;

/// Directory whose presence next to the executable marks the asset root.
pub const DATA_MARKER: &str = "data";

/// Config file name, resolved against the asset root.
pub const CONFIG_FILE: &str = "lifelight.json";
