//! Player components and the orientation snapshot the placer works from.
//!
//! `Player` and `PlayerLook` live on the player entity. Each frame they are
//! folded into a `PlayerState`, which is all the resolver knows about the
//! player: compass facing, pitch zone, whether sneaking, and the held block.
//!
//! # Example:
//!
//! ```
//! use bevy::prelude::*;
//! use blockplacer::player::{Player, PlayerLook};
//!
//! let mut world = World::new();
//! world.spawn((
//!     Transform::from_xyz(0.5, 65.0, 0.5),
//!     Player::default(),
//!     PlayerLook { yaw: 180.0, pitch: 10.0 },
//! ));
//! ```
use bevy::prelude::*;

use crate::block::BlockId;
use crate::placement::side::{PitchZone, PlayerFacing};

/// Player eye height above the feet, in blocks.
pub const EYE_HEIGHT: f32 = 1.62;

/// Default interaction reach, in blocks.
pub const DEFAULT_REACH: f32 = 5.0;

/// Component tracking the player state the placer cares about.
#[derive(Component, Debug, Clone)]
pub struct Player {
    /// Sneaking bypasses the legality and device checks.
    pub sneaking: bool,
    /// Block in hand, `None` for an empty hand.
    pub held: Option<BlockId>,
    /// Maximum ray cast distance.
    pub reach: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            sneaking: false,
            held: None,
            reach: DEFAULT_REACH,
        }
    }
}

/// Look orientation in degrees.
///
/// - `yaw`: 0 looks south (+z), increasing clockwise seen from above.
/// - `pitch`: positive looks down, clamped to ±90.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerLook {
    pub yaw: f32,
    pub pitch: f32,
}

impl PlayerLook {
    #[must_use]
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch: pitch.clamp(-90.0, 90.0) }
    }

    #[must_use]
    pub fn facing(&self) -> PlayerFacing {
        PlayerFacing::from_yaw(self.yaw)
    }

    #[must_use]
    pub fn pitch_zone(&self, threshold: f32) -> PitchZone {
        PitchZone::from_pitch(self.pitch, threshold)
    }

    /// Unit view vector.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(-yaw.sin() * pitch.cos(), -pitch.sin(), yaw.cos() * pitch.cos())
    }
}

/// Per-frame orientation snapshot handed to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    pub facing: PlayerFacing,
    pub pitch: PitchZone,
    pub sneaking: bool,
    pub held: Option<BlockId>,
}

impl PlayerState {
    #[must_use]
    pub fn from_components(player: &Player, look: &PlayerLook, pitch_angle: f32) -> Self {
        Self {
            facing: look.facing(),
            pitch: look.pitch_zone(pitch_angle),
            sneaking: player.sneaking,
            held: player.held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_direction_matches_compass_facing() {
        let south = PlayerLook::new(0.0, 0.0).direction();
        assert!((south - Vec3::Z).length() < 1e-5);
        let west = PlayerLook::new(90.0, 0.0).direction();
        assert!((west - Vec3::NEG_X).length() < 1e-5);
        let down = PlayerLook::new(0.0, 90.0).direction();
        assert!((down - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn state_snapshot_uses_pitch_threshold() {
        let player = Player { sneaking: true, held: Some(3), ..Default::default() };
        let state = PlayerState::from_components(&player, &PlayerLook::new(180.0, 45.0), 30.0);
        assert_eq!(state.facing, PlayerFacing::North);
        assert_eq!(state.pitch, PitchZone::Down);
        assert!(state.sneaking);
        assert_eq!(state.held, Some(3));

        let level = PlayerState::from_components(&player, &PlayerLook::new(180.0, 45.0), 60.0);
        assert_eq!(level.pitch, PitchZone::Level);
    }
}
