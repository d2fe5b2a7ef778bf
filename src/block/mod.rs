//! This module contains the core block types and helpers.
//! It exposes block definitions (`Block`), the `BlockRegistry` which
//! stores all loaded blocks together with their placement capabilities,
//! the view ray cast, and the runtime loader/watchers used for
//! hot-reloading block data from RON files.
//!
//! Example:
//!
//! ```ignore
//! use bevy::prelude::*;
//! use blockplacer::block::loader as block_loader;
//!
//! let mut app = App::new();
//! app.insert_resource(block_loader::load_blocks_from_dir("data/blocks"));
//! let watcher = block_loader::setup_block_watcher("data/blocks")
//!     .unwrap_or_else(|_| block_loader::BlockWatcher::stub());
//! app.insert_resource(watcher);
//! app.add_systems(Update, block_loader::check_block_changes);
//! ```

pub mod interaction;
pub use interaction::*;

/// Type used throughout the crate to represent a compact block identifier.
pub type BlockId = u8;

/// Block ids with a fixed meaning regardless of the loaded registry.
pub mod blocks {
    use super::BlockId;

    /// The block id used to represent empty space (no block present).
    pub const AIR: BlockId = 0;
    /// Placed when the player's hand is empty.
    pub const DEFAULT: BlockId = 1;
}

/// Loader/watchers for block RON files.
pub mod loader;

/// Block registry and related data structures.
pub mod registry;

pub use registry::{Block, BlockRegistry, PlacementRule};
