use std::path::PathBuf;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use blockplacer::block::loader as block_loader;
use blockplacer::settings::loader as settings_loader;

mod app;

const DEFAULT_SCENARIO: &str = "data/scenarios/wall.ron";

fn main() -> anyhow::Result<()> {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);

    let mut app = App::new();
    app.add_plugins(LogPlugin {
        level: settings.log.tracing_level(),
        filter: settings.log.filter.clone(),
        ..default()
    });

    let registry = block_loader::load_blocks_from_dir(block_loader::BLOCKS_DIR);
    let path = std::env::args().nth(1).map_or_else(|| PathBuf::from(DEFAULT_SCENARIO), PathBuf::from);
    let scenario = app::load_scenario(&path)?;
    info!("Running {} steps from {}", scenario.steps.len(), path.display());

    app::add_watchers(&mut app);
    let player = app::configure(&mut app, settings, registry, &scenario)?;
    app::run_scenario(&mut app, player, &scenario)?;

    info!("Scenario finished");
    Ok(())
}
