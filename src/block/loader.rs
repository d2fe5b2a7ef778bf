//! Block loader and watcher for loading block definitions from RON files
//! and monitoring changes for hot reloading during runtime.
//! # Example
//! ```ignore
//! let mut app = App::new();
//! app.insert_resource(block_loader::load_blocks_from_dir("data/blocks"));
//! let watcher = block_loader::setup_block_watcher("data/blocks")
//!     .unwrap_or_else(|_| block_loader::BlockWatcher::stub());
//! app.insert_resource(watcher);
//! app.add_systems(Update, block_loader::check_block_changes);
//! ```

use super::{blocks, Block, BlockRegistry};
use crate::placement::resolver::PlacementResolver;
use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use bevy::log::{info, warn};
use bevy::prelude::{Res, ResMut, Resource};

/// Directory block definitions are read from.
pub const BLOCKS_DIR: &str = "data/blocks";

#[derive(Resource)]
pub struct BlockWatcher(pub crate::ron::RonWatcher);

/// Load all block definitions from RON files.
///
/// # Arguments
/// * `path` - The directory path where block RON files are located (e.g., "data/blocks").
///
/// # Returns
/// A `BlockRegistry` containing all loaded block definitions, indexed by both name and numeric ID.
/// Definitions claiming the `air` id are skipped.
#[must_use]
pub fn load_blocks_from_dir(path: &str) -> BlockRegistry {
    let mut registry = BlockRegistry::default();
    let loaded: Vec<Block> = load_ron_files(path);
    for block in loaded {
        if block.id == blocks::AIR {
            warn!("Block '{}' uses the reserved air id, skipping", block.name);
            continue;
        }
        if let Some(previous) = registry.blocks_by_id.get(&block.id) {
            warn!("Block '{}' reuses id {} of '{previous}', the later file wins", block.name, block.id);
        }
        registry.register(block);
    }

    if registry.get_by_id(blocks::DEFAULT).is_none() {
        registry.register(Block::default());
    }

    info!("Loaded {} block definitions from {path}", registry.len());
    registry
}

/// Set up a file watcher to monitor changes in block RON files.
///
/// # Errors
/// Returns a `notify::Error` if the underlying file watcher could not be created or configured.
pub fn setup_block_watcher(path: &str) -> Result<BlockWatcher, notify::Error> {
    setup_ron_watcher(path).map(BlockWatcher)
}

/// Reload the block registry when the watcher flags a change.
///
/// Placement capabilities may have changed under the current target, so the
/// resolver is switched off and has to be re-enabled.
#[allow(clippy::needless_pass_by_value)]
pub fn check_block_changes(
    watcher: Res<BlockWatcher>,
    mut registry: ResMut<BlockRegistry>,
    mut resolver: ResMut<PlacementResolver>,
) {
    if watcher.0.take_changed() {
        info!("Blocks changed, reloading...");
        *registry = load_blocks_from_dir(BLOCKS_DIR);
        resolver.set_enabled(false);
    }
}

impl BlockWatcher {
    /// Create a stub `BlockWatcher` that does not have an active OS watcher.
    #[must_use]
    pub fn stub() -> Self {
        BlockWatcher(crate::ron::RonWatcher::stub())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_still_has_a_default_block() {
        let registry = load_blocks_from_dir("does/not/exist");
        assert_eq!(registry.len(), 1);
        assert!(registry.get_by_id(blocks::DEFAULT).is_some());
    }

    #[test]
    fn shipped_block_data_parses() {
        let registry = load_blocks_from_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/data/blocks"));
        for name in ["stone", "dirt", "grass", "snow_layer", "vine", "tall_grass", "door", "torch", "flower"] {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
        assert!(registry.get("snow_layer").is_some_and(|b| b.replaceable));
        assert!(registry.get("door").is_some_and(|b| b.activatable));
    }
}
