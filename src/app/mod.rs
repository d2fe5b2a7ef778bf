//! Headless app assembly for the scenario runner.
pub mod scenario;

pub use scenario::{load_scenario, run_scenario, Scenario};

use anyhow::Result;
use bevy::prelude::*;

use blockplacer::block::loader as block_loader;
use blockplacer::block::BlockRegistry;
use blockplacer::placement::{PlacerPlugin, ResetCue};
use blockplacer::settings::loader as settings_loader;
use blockplacer::settings::Settings;

/// Insert the world, registry and settings, add the placer and spawn the
/// player. File watchers are left to the caller.
///
/// # Errors
/// Fails if the scenario names an unknown block.
pub fn configure(app: &mut App, settings: Settings, registry: BlockRegistry, scenario: &Scenario) -> Result<Entity> {
    let world = scenario::build_world(scenario, &registry)?;
    app.add_plugins(MinimalPlugins)
        .insert_resource(settings)
        .insert_resource(world)
        .insert_resource(registry.clone())
        .add_plugins(PlacerPlugin)
        .add_systems(Update, log_reset_cues);
    let player = scenario::spawn_player(app, &scenario.player, &registry)?;
    app.finish();
    app.cleanup();
    Ok(player)
}

/// Stand-in for the reset sound.
pub fn log_reset_cues(mut cues: EventReader<ResetCue>) {
    for cue in cues.read() {
        info!("*click* at {}", cue.position);
    }
}

/// Hot reload of blocks and settings while a scenario runs.
pub fn add_watchers(app: &mut App) {
    app.insert_resource(
        block_loader::setup_block_watcher(block_loader::BLOCKS_DIR)
            .unwrap_or_else(|_| block_loader::BlockWatcher::stub()),
    );
    app.insert_resource(
        settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
            .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub()),
    );
    app.add_systems(Update, block_loader::check_block_changes);
    app.add_systems(Update, settings_loader::check_settings_changes);
}
