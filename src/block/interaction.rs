//! View ray casting: which block the player is looking at, and through
//! which face the ray entered it.
//!
//! The cast walks the voxel grid cell by cell (Amanatides & Woo), so the
//! face is exact even for grazing rays; stepping a fixed distance could cut
//! a corner and report a face the ray never crossed.
//!
//! # Examples
//!
//! ```ignore
//! let mut world = World::new();
//! world.set_block(1, 1, 0, 1);
//! let hit = raycast_block(&world, Vec3::new(1.5, 1.5, -1.0), Vec3::Z, 10.0).unwrap();
//! assert_eq!(hit.position, Coordinate::new(1, 1, 0));
//! assert_eq!(hit.side, Side::North);
//! ```
use bevy::math::{IVec3, Vec3};

use crate::block::blocks;
use crate::placement::coordinate::Coordinate;
use crate::placement::host::RayHit;
use crate::placement::side::Side;
use crate::world::World;

#[inline]
fn f32_floor_to_i32(v: f32) -> i32 {
    debug_assert!(
        v.is_finite() && (-2_147_483_648.0_f32..=2_147_483_647.0_f32).contains(&v),
        "coordinate out of i32 range",
    );
    #[allow(clippy::cast_possible_truncation)]
    {
        v.floor() as i32
    }
}

/// Per-axis DDA state.
struct Axis {
    step: i32,
    t_delta: f32,
    t_max: f32,
}

impl Axis {
    #[allow(clippy::cast_precision_loss)]
    fn new(origin: f32, dir: f32, cell: i32) -> Self {
        if dir == 0.0 {
            return Self { step: 0, t_delta: f32::MAX, t_max: f32::MAX };
        }
        let step = if dir > 0.0 { 1 } else { -1 };
        let boundary = if dir > 0.0 { cell as f32 + 1.0 } else { cell as f32 };
        Self { step, t_delta: (1.0 / dir).abs(), t_max: (boundary - origin) / dir }
    }
}

/// Cast a ray through the world and return the first non-air block within
/// `max_distance` together with the face the ray entered through.
///
/// A ray that starts inside a block reports nothing: there is no entry face.
/// Neither does one with a non-finite origin or reach.
#[must_use]
pub fn raycast_block(world: &World, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
    if !max_distance.is_finite() || !origin.is_finite() {
        return None;
    }
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }

    let mut cell = IVec3::new(
        f32_floor_to_i32(origin.x),
        f32_floor_to_i32(origin.y),
        f32_floor_to_i32(origin.z),
    );
    if world.get_block(cell.x, cell.y, cell.z) != blocks::AIR {
        return None;
    }

    let mut axes = [
        Axis::new(origin.x, dir.x, cell.x),
        Axis::new(origin.y, dir.y, cell.y),
        Axis::new(origin.z, dir.z, cell.z),
    ];

    loop {
        // Advance along whichever axis reaches its next boundary first.
        let i = if axes[0].t_max < axes[1].t_max {
            if axes[0].t_max < axes[2].t_max { 0 } else { 2 }
        } else if axes[1].t_max < axes[2].t_max {
            1
        } else {
            2
        };
        let axis = &mut axes[i];
        if axis.t_max > max_distance {
            return None;
        }
        let prev = cell;
        cell[i] += axis.step;
        axis.t_max += axis.t_delta;

        if world.get_block(cell.x, cell.y, cell.z) != blocks::AIR {
            let back = prev - cell;
            let side = Side::from_offset(back.x, back.y, back.z)?;
            return Some(RayHit::new(Coordinate::from(cell), side));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with(blocks: &[(i32, i32, i32)]) -> World {
        let mut world = World::new();
        for &(x, y, z) in blocks {
            world.set_block(x, y, z, 1);
        }
        world
    }

    #[test]
    fn axis_aligned_rays_report_the_entry_face() {
        let world = world_with(&[(1, 1, 0)]);
        let hit = raycast_block(&world, Vec3::new(1.5, 1.5, -1.0), Vec3::Z, 10.0);
        assert_eq!(hit, Some(RayHit::new(Coordinate::new(1, 1, 0), Side::North)));

        let hit = raycast_block(&world, Vec3::new(1.5, 4.5, 0.5), Vec3::NEG_Y, 10.0);
        assert_eq!(hit, Some(RayHit::new(Coordinate::new(1, 1, 0), Side::Top)));

        let hit = raycast_block(&world, Vec3::new(-2.5, 1.5, 0.5), Vec3::X, 10.0);
        assert_eq!(hit, Some(RayHit::new(Coordinate::new(1, 1, 0), Side::West)));
    }

    #[test]
    fn diagonal_ray_lands_on_floor_top() {
        let world = world_with(&[(0, 0, 0), (0, 0, 1), (0, 0, 2), (0, 0, 3)]);
        // Eye at 1.62 above the floor surface, looking north and 45 degrees down.
        let dir = Vec3::new(0.0, -1.0, -1.0);
        let hit = raycast_block(&world, Vec3::new(0.5, 2.62, 3.5), dir, 5.0);
        assert_eq!(hit, Some(RayHit::new(Coordinate::new(0, 0, 1), Side::Top)));
    }

    #[test]
    fn out_of_reach_or_inside_a_block_is_no_hit() {
        let world = world_with(&[(0, 0, 10)]);
        assert_eq!(raycast_block(&world, Vec3::new(0.5, 0.5, 0.5), Vec3::Z, 5.0), None);
        assert_eq!(raycast_block(&world, Vec3::new(0.5, 0.5, 10.5), Vec3::Z, 5.0), None);
        assert_eq!(raycast_block(&world, Vec3::new(0.5, 0.5, 0.5), Vec3::ZERO, 5.0), None);
    }

    #[test]
    fn non_finite_reach_or_origin_is_no_hit() {
        // An empty world would otherwise be walked forever.
        let empty = World::new();
        for reach in [f32::NAN, f32::INFINITY] {
            assert_eq!(raycast_block(&empty, Vec3::new(0.5, 0.5, 0.5), Vec3::Z, reach), None);
        }
        let world = world_with(&[(0, 0, 2)]);
        assert_eq!(raycast_block(&world, Vec3::new(0.5, 0.5, 0.5), Vec3::Z, f32::NAN), None);
        assert_eq!(raycast_block(&world, Vec3::new(f32::NAN, 0.5, 0.5), Vec3::Z, 5.0), None);
    }
}
