//! The reference game the resolver runs against.
//!
//! `WorldView` (read-only) and `WorldHost` (mutable) pair the voxel store
//! with the block registry and the player's viewpoint, and implement the
//! resolver's `WorldQuery`, `PlaceExecutor` and `RayTracer` seams.
//!
//! Placement against `(pos, side)` fills the cell across `side`, unless the
//! block at `pos` is replaceable, in which case it is overwritten in place
//! and the face it hangs from counts as the placement face. The filled cell
//! has to be air or replaceable and inside the build height, and the placed
//! block's own rule and support list have to accept the face and the block
//! behind it.
use bevy::log::{debug, trace};
use bevy::prelude::*;

use super::{BlockState, World};
use crate::block::{blocks, raycast_block, Block, BlockId, BlockRegistry};
use crate::placement::coordinate::Coordinate;
use crate::placement::host::{AttachmentKind, PlaceExecutor, RayHit, RayTracer, WorldQuery};
use crate::placement::side::Side;
use crate::player::{Player, PlayerLook, DEFAULT_REACH, EYE_HEIGHT};

/// Metadata bit toggled when an activatable block is clicked.
pub const ACTIVATED_BIT: u8 = 0b100;

/// Where the player looks from, and whether they are sneaking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub eye: Vec3,
    pub direction: Vec3,
    pub reach: f32,
    pub sneaking: bool,
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self { eye: Vec3::ZERO, direction: Vec3::NEG_Z, reach: DEFAULT_REACH, sneaking: false }
    }
}

impl Viewpoint {
    #[must_use]
    pub fn from_player(transform: &Transform, player: &Player, look: &PlayerLook) -> Self {
        Self {
            eye: transform.translation + Vec3::Y * EYE_HEIGHT,
            direction: look.direction(),
            reach: player.reach,
            sneaking: player.sneaking,
        }
    }
}

/// Placement rules over a borrowed world and registry.
#[derive(Clone, Copy)]
struct Rules<'a> {
    world: &'a World,
    registry: &'a BlockRegistry,
}

impl<'a> Rules<'a> {
    fn block(&self, pos: IVec3) -> Option<(BlockState, Option<&'a Block>)> {
        self.world
            .get_state(pos)
            .map(|state| (state, self.registry.get_by_id(state.id)))
    }

    fn name_at(&self, pos: IVec3) -> &'a str {
        match self.world.get_state(pos) {
            Some(state) => self.registry.blocks_by_id.get(&state.id).map_or("", String::as_str),
            None => "air",
        }
    }

    fn is_replaceable(&self, pos: IVec3) -> bool {
        matches!(self.block(pos), Some((_, Some(b))) if b.replaceable)
    }

    fn attachment(&self, pos: IVec3) -> Option<AttachmentKind> {
        self.block(pos).and_then(|(_, def)| def?.replaceable_attachment())
    }

    fn activatable(&self, pos: IVec3) -> bool {
        matches!(self.block(pos), Some((_, Some(b))) if b.activatable)
    }

    /// `(cell, face, anchor)` for placing against `side` of `pos`: the cell
    /// that gets filled, the face it attaches to, and the block behind it.
    fn placement_cell(&self, pos: IVec3, side: Side) -> Option<(IVec3, Side, IVec3)> {
        let (state, def) = self.block(pos)?;
        match def.and_then(Block::replaceable_attachment) {
            Some(kind) => {
                let face = kind.effective_side(state.meta);
                let (dx, dy, dz) = face.opposite().offset();
                Some((pos, face, pos + IVec3::new(dx, dy, dz)))
            }
            None => {
                let (dx, dy, dz) = side.offset();
                Some((pos + IVec3::new(dx, dy, dz), side, pos))
            }
        }
    }

    fn held_id(held: Option<BlockId>) -> BlockId {
        held.filter(|&id| id != blocks::AIR).unwrap_or(blocks::DEFAULT)
    }

    fn can_place(&self, pos: IVec3, side: Side, held: Option<BlockId>) -> bool {
        let Some((cell, face, anchor)) = self.placement_cell(pos, side) else {
            return false;
        };
        if !World::in_bounds(cell.y) {
            return false;
        }
        if cell != pos && self.world.get_state(cell).is_some() && !self.is_replaceable(cell) {
            return false;
        }
        match self.registry.get_by_id(Self::held_id(held)) {
            Some(placing) => placing.allows_face(face) && placing.can_rest_on(self.name_at(anchor)),
            None => true,
        }
    }

    fn placed_meta(&self, id: BlockId, face: Side) -> u8 {
        match self.registry.get_by_id(id).map(|b| b.attachment) {
            Some(AttachmentKind::VineMask) => vine_bit(face),
            _ => 0,
        }
    }
}

/// Vine attachment bit for hanging from `face` of the backing block.
#[must_use]
pub const fn vine_bit(face: Side) -> u8 {
    match face {
        Side::North => 1,
        Side::East => 2,
        Side::South => 4,
        Side::West => 8,
        Side::Top | Side::Bottom => 0,
    }
}

/// Read-only host: legality queries and the view ray.
#[derive(Clone, Copy)]
pub struct WorldView<'a> {
    world: &'a World,
    registry: &'a BlockRegistry,
    viewpoint: Viewpoint,
}

impl<'a> WorldView<'a> {
    #[must_use]
    pub fn new(world: &'a World, registry: &'a BlockRegistry, viewpoint: Viewpoint) -> Self {
        Self { world, registry, viewpoint }
    }

    fn rules(&self) -> Rules<'a> {
        Rules { world: self.world, registry: self.registry }
    }
}

/// Mutable host: everything `WorldView` does, plus placement.
pub struct WorldHost<'a> {
    world: &'a mut World,
    registry: &'a BlockRegistry,
    viewpoint: Viewpoint,
}

impl<'a> WorldHost<'a> {
    #[must_use]
    pub fn new(world: &'a mut World, registry: &'a BlockRegistry, viewpoint: Viewpoint) -> Self {
        Self { world, registry, viewpoint }
    }

    #[must_use]
    pub fn view(&self) -> WorldView<'_> {
        WorldView::new(&*self.world, self.registry, self.viewpoint)
    }
}

impl WorldQuery for WorldView<'_> {
    fn block_exists_at(&self, pos: Coordinate) -> bool {
        self.world.get_state(pos.to_ivec3()).is_some()
    }

    fn is_replaceable_at(&self, pos: Coordinate) -> bool {
        self.rules().is_replaceable(pos.to_ivec3())
    }

    fn can_place_on_side(&self, pos: Coordinate, side: Side, held: Option<BlockId>) -> bool {
        let ok = self.rules().can_place(pos.to_ivec3(), side, held);
        trace!("can place {held:?} on {pos}/{side}: {ok}");
        ok
    }

    fn block_metadata_at(&self, pos: Coordinate) -> u8 {
        self.world.get_state(pos.to_ivec3()).map_or(0, |s| s.meta)
    }

    fn attachment_at(&self, pos: Coordinate) -> Option<AttachmentKind> {
        self.rules().attachment(pos.to_ivec3())
    }

    fn might_activate_at(&self, pos: Coordinate) -> bool {
        self.rules().activatable(pos.to_ivec3())
    }
}

impl RayTracer for WorldView<'_> {
    fn current_look_target(&self) -> Option<RayHit> {
        let vp = &self.viewpoint;
        raycast_block(self.world, vp.eye, vp.direction, vp.reach)
    }
}

impl WorldQuery for WorldHost<'_> {
    fn block_exists_at(&self, pos: Coordinate) -> bool {
        self.view().block_exists_at(pos)
    }

    fn is_replaceable_at(&self, pos: Coordinate) -> bool {
        self.view().is_replaceable_at(pos)
    }

    fn can_place_on_side(&self, pos: Coordinate, side: Side, held: Option<BlockId>) -> bool {
        self.view().can_place_on_side(pos, side, held)
    }

    fn block_metadata_at(&self, pos: Coordinate) -> u8 {
        self.view().block_metadata_at(pos)
    }

    fn attachment_at(&self, pos: Coordinate) -> Option<AttachmentKind> {
        self.view().attachment_at(pos)
    }

    fn might_activate_at(&self, pos: Coordinate) -> bool {
        self.view().might_activate_at(pos)
    }
}

impl RayTracer for WorldHost<'_> {
    fn current_look_target(&self) -> Option<RayHit> {
        self.view().current_look_target()
    }
}

impl PlaceExecutor for WorldHost<'_> {
    fn attempt_place(&mut self, pos: Coordinate, side: Side, held: Option<BlockId>) -> bool {
        let rules = Rules { world: &*self.world, registry: self.registry };
        let target = pos.to_ivec3();
        let Some((state, _)) = rules.block(target) else {
            return false;
        };

        if rules.activatable(target) && !self.viewpoint.sneaking {
            debug!("Activated block at {pos}");
            let toggled = BlockState::new(state.id, state.meta ^ ACTIVATED_BIT);
            return self.world.set_state(target, toggled);
        }

        if !rules.can_place(target, side, held) {
            return false;
        }
        let Some((cell, face, _)) = rules.placement_cell(target, side) else {
            return false;
        };
        let id = Rules::held_id(held);
        let meta = rules.placed_meta(id, face);
        debug!("Placed block {id} at {cell} against {face}");
        self.world.set_state(cell, BlockState::new(id, meta))
    }
}
