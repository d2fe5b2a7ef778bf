//! Seams between the resolver and the game it runs inside.
//!
//! The resolver never touches voxel storage, the placement primitive or the
//! ray caster directly; it asks through these traits. The reference
//! implementation lives in `crate::world`, tests supply their own.
use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;
use super::side::Side;
use crate::block::BlockId;

/// Result of the view ray cast: the block looked at and the face hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RayHit {
    pub position: Coordinate,
    pub side: Side,
}

impl RayHit {
    #[must_use]
    pub const fn new(position: Coordinate, side: Side) -> Self {
        Self { position, side }
    }
}

/// How a replaceable block decides which face of its backing block it hangs
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// Rests on the block below (snow layers, tall grass, dead bushes).
    #[default]
    Top,
    /// Hangs from a wall, attachment encoded in metadata bits
    /// `1` north, `2` east, `4` south, `8` west.
    VineMask,
}

impl AttachmentKind {
    /// Face of the backing block this replaceable block is attached to.
    ///
    /// A vine with several attachment bits resolves East, West, South, North
    /// in that order; no bits means it hangs from the block above.
    #[must_use]
    pub fn effective_side(self, meta: u8) -> Side {
        match self {
            Self::Top => Side::Top,
            Self::VineMask => {
                if meta & 2 != 0 {
                    Side::East
                } else if meta & 8 != 0 {
                    Side::West
                } else if meta & 4 != 0 {
                    Side::South
                } else if meta & 1 != 0 {
                    Side::North
                } else {
                    Side::Bottom
                }
            }
        }
    }
}

/// Read-only view of the world used for every legality decision.
pub trait WorldQuery {
    fn block_exists_at(&self, pos: Coordinate) -> bool;

    fn is_replaceable_at(&self, pos: Coordinate) -> bool;

    /// Whether `held` (or a plain solid block if `None`) could be placed
    /// against `side` of the block at `pos`.
    fn can_place_on_side(&self, pos: Coordinate, side: Side, held: Option<BlockId>) -> bool;

    fn block_metadata_at(&self, pos: Coordinate) -> u8;

    /// Attachment rule of the replaceable block at `pos`, `None` when the
    /// block there is not replaceable.
    fn attachment_at(&self, pos: Coordinate) -> Option<AttachmentKind>;

    /// Whether right-clicking the block at `pos` may do something other
    /// than place against it (doors, buttons, chests).
    fn might_activate_at(&self, pos: Coordinate) -> bool;
}

/// The game's own "right click on (block, side)" primitive.
pub trait PlaceExecutor {
    /// Returns `true` when the game accepted the interaction. That does not
    /// imply a block was placed: activatable blocks consume the click.
    fn attempt_place(&mut self, pos: Coordinate, side: Side, held: Option<BlockId>) -> bool;
}

pub trait RayTracer {
    fn current_look_target(&self) -> Option<RayHit>;
}

/// Face of the backing block that the replaceable block at `pos` hangs from,
/// or `None` when `pos` is not replaceable.
pub fn effective_replaceable_side<W: WorldQuery + ?Sized>(world: &W, pos: Coordinate) -> Option<Side> {
    if !world.is_replaceable_at(pos) {
        return None;
    }
    let kind = world.attachment_at(pos).unwrap_or_default();
    Some(kind.effective_side(world.block_metadata_at(pos)))
}
