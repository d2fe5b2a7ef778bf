//! This module defines the `Block` and `BlockRegistry` types.
//!
//! A `Block` is a per-type capability record: whether placement overwrites
//! it, how a replaceable block attaches to its neighbour, whether a right
//! click activates it, and which faces it can itself be placed against.
//! Every capability is declared in data, nothing is probed at runtime.
//!
//! Example:
//! ```ignore
//! let torch: Block = ron::from_str(r#"(name: "torch", id: 9, placement: top_face)"#)?;
//! assert!(torch.allows_face(Side::Top));
//! assert!(!torch.allows_face(Side::North));
//! ```
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::BlockId;
use crate::placement::host::AttachmentKind;
use crate::placement::side::Side;

/// Faces of a base block that a block may be placed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementRule {
    #[default]
    AnyFace,
    /// Only on top of another block (flowers, doors, snow layers).
    TopFace,
    /// Only against the four vertical faces (vines, ladders).
    SideFaces,
}

impl PlacementRule {
    #[must_use]
    pub fn allows(self, side: Side) -> bool {
        match self {
            Self::AnyFace => true,
            Self::TopFace => side == Side::Top,
            Self::SideFaces => !matches!(side, Side::Top | Side::Bottom),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    pub id: BlockId,

    /// Placement silently overwrites this block.
    #[serde(default)]
    pub replaceable: bool,
    /// How a replaceable block hangs from its backing block.
    #[serde(default)]
    pub attachment: AttachmentKind,
    /// Right click does something other than place against it.
    #[serde(default)]
    pub activatable: bool,
    #[serde(default)]
    pub placement: PlacementRule,
    /// Names of blocks this one may be placed against. Empty means any.
    #[serde(default)]
    pub supports: Vec<String>,
}

impl Block {
    #[must_use]
    pub fn allows_face(&self, side: Side) -> bool {
        self.placement.allows(side)
    }

    /// Whether this block may rest against `base` (by name).
    #[must_use]
    pub fn can_rest_on(&self, base: &str) -> bool {
        self.supports.is_empty() || self.supports.iter().any(|s| s == base)
    }

    /// `attachment` of a replaceable block, `None` for everything else.
    #[must_use]
    pub fn replaceable_attachment(&self) -> Option<AttachmentKind> {
        self.replaceable.then_some(self.attachment)
    }
}

impl Default for Block {
    fn default() -> Self {
        Self {
            name: "stone".to_string(),
            id: 1,
            replaceable: false,
            attachment: AttachmentKind::Top,
            activatable: false,
            placement: PlacementRule::AnyFace,
            supports: Vec::new(),
        }
    }
}

#[derive(Resource, Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: HashMap<String, Block>,
    pub blocks_by_id: HashMap<BlockId, String>,
}

impl BlockRegistry {
    pub fn register(&mut self, block: Block) {
        self.blocks_by_id.insert(block.id, block.name.clone());
        self.blocks.insert(block.name.clone(), block);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }

    #[must_use]
    pub fn get_by_id(&self, id: BlockId) -> Option<&Block> {
        self.blocks_by_id
            .get(&id)
            .and_then(|name| self.blocks.get(name))
    }

    /// Lookup numeric ID for a block `name`.
    #[must_use]
    pub fn id_for_name(&self, name: &str) -> Option<BlockId> {
        self.blocks.get(name).map(|b| b.id)
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
