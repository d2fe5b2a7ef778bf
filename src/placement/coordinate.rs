//! Integer block position with in-place "step across a side" helpers.
//!
//! The resolver keeps one `Coordinate` for its target and mutates it rather
//! than allocating per frame. It is `Copy`, so callers that want a stable
//! snapshot simply copy it out.
use bevy::math::IVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::side::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coordinate {
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The neighbouring position across `side`.
    #[must_use]
    pub const fn adjacent_on_side(self, side: Side) -> Self {
        let (dx, dy, dz) = side.offset();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Step this coordinate across `side`.
    pub fn set_adjacent_on_side(&mut self, side: Side) -> &mut Self {
        *self = self.adjacent_on_side(side);
        self
    }

    /// Make this coordinate the neighbour of `other` across `side`.
    pub fn set_adjacent_to(&mut self, other: Coordinate, side: Side) -> &mut Self {
        *self = other.adjacent_on_side(side);
        self
    }

    #[must_use]
    pub const fn to_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }
}

impl From<IVec3> for Coordinate {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Coordinate> for IVec3 {
    fn from(c: Coordinate) -> Self {
        c.to_ivec3()
    }
}

impl From<(i32, i32, i32)> for Coordinate {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_is_pure_and_set_mutates() {
        let c = Coordinate::new(5, 10, 5);
        assert_eq!(c.adjacent_on_side(Side::Top), Coordinate::new(5, 11, 5));
        assert_eq!(c, Coordinate::new(5, 10, 5));

        let mut m = c;
        m.set_adjacent_on_side(Side::West).set_adjacent_on_side(Side::North);
        assert_eq!(m, Coordinate::new(4, 10, 4));

        m.set_adjacent_to(c, Side::Bottom);
        assert_eq!(m, Coordinate::new(5, 9, 5));
    }

    #[test]
    fn converts_to_and_from_ivec3() {
        let c = Coordinate::from(IVec3::new(-3, 4, 7));
        assert_eq!(IVec3::from(c), IVec3::new(-3, 4, 7));
        assert_eq!(c.to_string(), "(-3,4,7)");
    }
}
