//! Absolute block sides, player-relative directions and the small enums used
//! to index the placement tables.
//!
//! The discriminant order of `Side` and `RelativeDirection` is load-bearing:
//! every table in `tables` is indexed by `as usize` on these enums.
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six axis-aligned faces of a block.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// y - 1
    Bottom = 0,
    /// y + 1
    Top = 1,
    /// z - 1
    North = 2,
    /// z + 1
    South = 3,
    /// x - 1
    West = 4,
    /// x + 1
    East = 5,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::Bottom,
        Side::Top,
        Side::North,
        Side::South,
        Side::West,
        Side::East,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Bottom => Self::Top,
            Self::Top => Self::Bottom,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Unit offset `(dx, dy, dz)` of the neighbouring cell across this side.
    #[must_use]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Bottom => (0, -1, 0),
            Self::Top => (0, 1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::East => (1, 0, 0),
        }
    }

    /// Side whose offset is exactly `(dx, dy, dz)`, if any.
    #[must_use]
    pub fn from_offset(dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.offset() == (dx, dy, dz))
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bottom => "Bottom",
            Self::Top => "Top",
            Self::North => "North",
            Self::South => "South",
            Self::West => "West",
            Self::East => "East",
        }
    }

    /// Which way this side lies as seen by a player facing `facing`.
    #[must_use]
    pub fn relative_to(self, facing: PlayerFacing) -> RelativeDirection {
        super::tables::side_to_relative(facing, self)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A direction from the player's point of view.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeDirection {
    Below = 0,
    Above = 1,
    Front = 2,
    Back = 3,
    Left = 4,
    Right = 5,
}

impl RelativeDirection {
    pub const ALL: [RelativeDirection; 6] = [
        RelativeDirection::Below,
        RelativeDirection::Above,
        RelativeDirection::Front,
        RelativeDirection::Back,
        RelativeDirection::Left,
        RelativeDirection::Right,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Below => "Below",
            Self::Above => "Above",
            Self::Front => "Front",
            Self::Back => "Back",
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }

    /// The absolute side this direction maps to for a player facing `facing`.
    #[must_use]
    pub fn to_side(self, facing: PlayerFacing) -> Side {
        super::tables::relative_to_side(facing, self)
    }
}

impl fmt::Display for RelativeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compass-only facing of the player (no up/down component).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerFacing {
    North = 0,
    South = 1,
    West = 2,
    East = 3,
}

impl PlayerFacing {
    pub const ALL: [PlayerFacing; 4] = [
        PlayerFacing::North,
        PlayerFacing::South,
        PlayerFacing::West,
        PlayerFacing::East,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Nearest compass facing for a yaw in degrees.
    ///
    /// Yaw 0 looks south (+z) and increases clockwise seen from above:
    /// 90 is west, 180 north, 270 east.
    #[must_use]
    pub fn from_yaw(yaw_degrees: f32) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let quadrant = ((yaw_degrees / 90.0) + 0.5).floor() as i32 & 3;
        match quadrant {
            0 => Self::South,
            1 => Self::West,
            2 => Self::North,
            _ => Self::East,
        }
    }

    /// The block side the player is facing towards.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::North => Side::North,
            Self::South => Side::South,
            Self::West => Side::West,
            Self::East => Side::East,
        }
    }
}

/// Coarse up/down zone of the player's look pitch.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PitchZone {
    Down = 0,
    Up = 1,
    Level = 2,
}

impl PitchZone {
    pub const ALL: [PitchZone; 3] = [PitchZone::Down, PitchZone::Up, PitchZone::Level];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Classify a pitch in degrees (positive looks down) against `threshold`.
    /// Anything within `-threshold..=threshold` is level.
    #[must_use]
    pub fn from_pitch(pitch_degrees: f32, threshold: f32) -> Self {
        if pitch_degrees > threshold {
            Self::Down
        } else if pitch_degrees < -threshold {
            Self::Up
        } else {
            Self::Level
        }
    }
}

/// Direction of spin within one of the three axis planes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationPlane {
    XClockwise = 0,
    XAnticlockwise = 1,
    YClockwise = 2,
    YAnticlockwise = 3,
    ZClockwise = 4,
    ZAnticlockwise = 5,
}

impl RotationPlane {
    pub const ALL: [RotationPlane; 6] = [
        RotationPlane::XClockwise,
        RotationPlane::XAnticlockwise,
        RotationPlane::YClockwise,
        RotationPlane::YAnticlockwise,
        RotationPlane::ZClockwise,
        RotationPlane::ZAnticlockwise,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The four 3D rotation keys. Discriminants index `tables::ROTATION_PLANE`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationKey {
    VerticalClockwise = 0,
    VerticalAnticlockwise = 1,
    HorizontalClockwise = 2,
    HorizontalAnticlockwise = 3,
}

impl RotationKey {
    pub const ALL: [RotationKey; 4] = [
        RotationKey::VerticalClockwise,
        RotationKey::VerticalAnticlockwise,
        RotationKey::HorizontalClockwise,
        RotationKey::HorizontalAnticlockwise,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Which way to walk the forward/backward side cycle.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleDirection {
    Forward = 0,
    Backward = 1,
}

impl CycleDirection {
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Thresholded direction of a single mouse axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBucket {
    Negative = 0,
    Neutral = 1,
    Positive = 2,
}

impl MouseBucket {
    /// Bucket a raw delta. Movement within `±wobble` counts as neutral.
    #[must_use]
    pub fn from_delta(delta: i32, wobble: i32) -> Self {
        if delta < -wobble {
            Self::Negative
        } else if delta > wobble {
            Self::Positive
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_ordinals_match_table_layout() {
        assert_eq!(Side::Bottom as u8, 0);
        assert_eq!(Side::Top as u8, 1);
        assert_eq!(Side::North as u8, 2);
        assert_eq!(Side::South as u8, 3);
        assert_eq!(Side::West as u8, 4);
        assert_eq!(Side::East as u8, 5);
    }

    #[test]
    fn opposite_offsets_cancel() {
        for side in Side::ALL {
            let (ax, ay, az) = side.offset();
            let (bx, by, bz) = side.opposite().offset();
            assert_eq!((ax + bx, ay + by, az + bz), (0, 0, 0));
            assert_eq!(Side::from_offset(ax, ay, az), Some(side));
        }
        assert_eq!(Side::from_offset(1, 1, 0), None);
    }

    #[test]
    fn yaw_maps_to_nearest_compass_point() {
        assert_eq!(PlayerFacing::from_yaw(0.0), PlayerFacing::South);
        assert_eq!(PlayerFacing::from_yaw(44.0), PlayerFacing::South);
        assert_eq!(PlayerFacing::from_yaw(46.0), PlayerFacing::West);
        assert_eq!(PlayerFacing::from_yaw(180.0), PlayerFacing::North);
        assert_eq!(PlayerFacing::from_yaw(270.0), PlayerFacing::East);
        assert_eq!(PlayerFacing::from_yaw(-90.0), PlayerFacing::East);
        assert_eq!(PlayerFacing::from_yaw(-180.0), PlayerFacing::North);
    }

    #[test]
    fn pitch_zone_uses_threshold() {
        assert_eq!(PitchZone::from_pitch(45.0, 30.0), PitchZone::Down);
        assert_eq!(PitchZone::from_pitch(-45.0, 30.0), PitchZone::Up);
        assert_eq!(PitchZone::from_pitch(30.0, 30.0), PitchZone::Level);
        assert_eq!(PitchZone::from_pitch(-12.0, 30.0), PitchZone::Level);
    }

    #[test]
    fn mouse_bucket_respects_wobble() {
        assert_eq!(MouseBucket::from_delta(10, 1), MouseBucket::Positive);
        assert_eq!(MouseBucket::from_delta(1, 1), MouseBucket::Neutral);
        assert_eq!(MouseBucket::from_delta(-2, 1), MouseBucket::Negative);
        assert_eq!(MouseBucket::from_delta(0, 0), MouseBucket::Neutral);
    }
}
