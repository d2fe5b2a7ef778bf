//! World storage and block access helpers.
//!
//! This module provides the `World` resource, a sparse map from world
//! coordinates to `BlockState` (block id plus metadata bits). Anything not
//! stored is air. `host` layers the placement rules on top and implements
//! the resolver's collaborator traits.
//!
//! # Example:
//!
//! ```ignore
//! let mut world = World::new();
//! world.set_block(10, 64, -5, stone_id);
//! assert_eq!(world.get_block(10, 64, -5), stone_id);
//! ```

pub mod host;

pub use host::{Viewpoint, WorldHost, WorldView};

use crate::block::{blocks, BlockId};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum world build height (exclusive upper bound).
pub const MAX_HEIGHT: i32 = 256;

/// One stored block: its id and the metadata bits some blocks use
/// (vine attachment mask, door open bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockState {
    pub id: BlockId,
    #[serde(default)]
    pub meta: u8,
}

impl BlockState {
    #[must_use]
    pub const fn new(id: BlockId, meta: u8) -> Self {
        Self { id, meta }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct World {
    pub blocks: HashMap<IVec3, BlockState>,
}

impl World {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn in_bounds(y: i32) -> bool {
        (0..MAX_HEIGHT).contains(&y)
    }

    /// Get the block ID at world coordinates, `AIR` if empty or out of bounds.
    #[must_use]
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.get_state(IVec3::new(x, y, z)).map_or(blocks::AIR, |s| s.id)
    }

    #[must_use]
    pub fn get_state(&self, pos: IVec3) -> Option<BlockState> {
        self.blocks.get(&pos).copied()
    }

    /// Set a block at world coordinates. Placing `AIR` clears the cell.
    ///
    /// # Return
    /// `false` when `y` is outside the build height.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockId) -> bool {
        self.set_state(IVec3::new(x, y, z), BlockState::new(block, 0))
    }

    pub fn set_state(&mut self, pos: IVec3, state: BlockState) -> bool {
        if !Self::in_bounds(pos.y) {
            return false;
        }
        if state.id == blocks::AIR {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, state);
        }
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear_blocks() {
        let mut world = World::new();
        assert!(world.set_block(1, 2, 3, 4));
        assert_eq!(world.get_block(1, 2, 3), 4);
        assert!(world.set_block(1, 2, 3, blocks::AIR));
        assert!(world.is_empty());
    }

    #[test]
    fn build_height_is_enforced() {
        let mut world = World::new();
        assert!(!world.set_block(0, MAX_HEIGHT, 0, 1));
        assert!(!world.set_block(0, -1, 0, 1));
        assert!(world.set_block(0, MAX_HEIGHT - 1, 0, 1));
        assert_eq!(world.get_block(0, -1, 0), blocks::AIR);
    }
}
