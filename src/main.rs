use std::process::ExitCode;

use lifelight::assets::AssetRoot;
use lifelight::config::GameConfig;
use lifelight::engine::EngineBuilder;
use lifelight::scene::SceneStack;
use lifelight::scenes::{GameContext, MenuScene};
use lifelight::{CONFIG_FILE, DATA_MARKER, logging};

fn main() -> ExitCode {
    let assets = AssetRoot::discover(DATA_MARKER);
    let config = match GameConfig::load_or_default(assets.resolve(CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("lifelight: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Dropping the handle flushes buffered log lines, so it lives until exit.
    let _logger = match logging::init(&config.log_level, config.log_dir.as_deref()) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("lifelight: cannot start logging: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("asset root: {}", assets.root().display());

    let ctx = GameContext::new(config.clone(), assets);
    let levels = ctx.loader.discover();
    if levels.is_empty() {
        log::error!("no .lvl files under {}", ctx.loader.data_dir().display());
        return ExitCode::FAILURE;
    }
    log::info!("{} levels available", levels.len());

    let scenes = SceneStack::new(Box::new(MenuScene::new(ctx.into_shared())));
    match EngineBuilder::from_config(&config).run(scenes) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
