//! Static lookup tables for the placement geometry.
//!
//! Pure data: no mutable state and no error conditions. Indexing is by the
//! `index()` of the enums in `side`, so the tables follow their declaration
//! order exactly.
use super::side::{
    CycleDirection, MouseBucket, PitchZone, PlayerFacing, RelativeDirection, RotationKey,
    RotationPlane, Side,
};

use RelativeDirection::{Above, Back, Below, Front, Left, Right};
use RotationPlane::{
    XAnticlockwise as XA, XClockwise as XC, YAnticlockwise as YA, YClockwise as YC,
    ZAnticlockwise as ZA, ZClockwise as ZC,
};
use Side::{Bottom, East, North, South, Top, West};

/// Number of prioritised entries in `SMART_DEFAULT`.
pub const SMART_DEFAULT_ATTEMPTS: usize = 3;

/// `SIDE_TO_RELATIVE[facing][side]`
//  Bottom  Top    North  South  West   East   <-- block side
pub const SIDE_TO_RELATIVE: [[RelativeDirection; 6]; 4] = [
    [Below, Above, Front, Back, Left, Right], // facing north
    [Below, Above, Back, Front, Right, Left], // facing south
    [Below, Above, Right, Left, Front, Back], // facing west
    [Below, Above, Left, Right, Back, Front], // facing east
];

/// `RELATIVE_TO_SIDE[facing][relative]`, the inverse of `SIDE_TO_RELATIVE`.
//  Below   Above  Front  Back   Left   Right  <-- relative direction
pub const RELATIVE_TO_SIDE: [[Side; 6]; 4] = [
    [Bottom, Top, North, South, West, East], // facing north
    [Bottom, Top, South, North, East, West], // facing south
    [Bottom, Top, West, East, South, North], // facing west
    [Bottom, Top, East, West, North, South], // facing east
];

/// `ROTATION_PLANE[pitch][key][facing]`: the plane a rotation key spins in
/// given where the player is looking.
//   north south west  east   <-- player facing
pub const ROTATION_PLANE: [[[RotationPlane; 4]; 4]; 3] = [
    [
        // looking down
        [XA, XC, ZA, ZC], // vertical clockwise (up)
        [XC, XA, ZC, ZA], // vertical anticlockwise (down)
        [ZA, ZC, XC, XA], // horizontal clockwise (left)
        [ZC, ZA, XA, XC], // horizontal anticlockwise (right)
    ],
    [
        // looking up
        [XA, XC, ZA, ZC],
        [XC, XA, ZC, ZA],
        [ZC, ZA, XA, XC],
        [ZA, ZC, XC, XA],
    ],
    [
        // level
        [XA, XC, ZA, ZC],
        [XC, XA, ZC, ZA],
        [YA, YA, YA, YA],
        [YC, YC, YC, YC],
    ],
];

/// `PLANE_ROTATE[plane][side]`: cyclic successor of `side` in `plane`, or
/// `None` when the side is on the plane's axis.
//  Bottom        Top          North        South        West         East
pub const PLANE_ROTATE: [[Option<Side>; 6]; 6] = [
    [Some(North), Some(South), Some(Top), Some(Bottom), None, None], // x clockwise: b n t s
    [Some(South), Some(North), Some(Bottom), Some(Top), None, None], // x anti: b s t n
    [None, None, Some(West), Some(East), Some(South), Some(North)],  // y clockwise: n w s e
    [None, None, Some(East), Some(West), Some(North), Some(South)],  // y anti: n e s w
    [Some(West), Some(East), None, None, Some(Top), Some(Bottom)],   // z clockwise: b w t e
    [Some(East), Some(West), None, None, Some(Bottom), Some(Top)],   // z anti: b e t w
];

/// Entry direction used when the current side is not on the rotation plane.
pub const PLANE_DEFAULT_RELATIVE: [RelativeDirection; 3] = [
    Below, // looking down
    Above, // looking up
    Front, // level
];

/// `CYCLE[direction][relative]`: one closed six-step cycle per direction.
//  Below  Above  Front  Back   Left   Right
pub const CYCLE: [[RelativeDirection; 6]; 2] = [
    [Right, Front, Below, Above, Back, Left],  // forward
    [Front, Back, Above, Left, Right, Below],  // backward
];

/// `SMART_DEFAULT[attempt][pitch][relative hit]`: up to three preferred
/// starting directions, `None` ends the list early.
///
/// The first choice reads roughly as: looking down or up at a top/bottom face
/// picks front; looking at a side picks the face towards the player's
/// vertical bias; looking at a back face picks the front and vice versa.
pub const SMART_DEFAULT: [[[Option<RelativeDirection>; 6]; 3]; SMART_DEFAULT_ATTEMPTS] = [
    [
        //  Below         Above         Front         Back          Left          Right
        [Some(Front), Some(Front), Some(Back), Some(Front), Some(Below), Some(Below)], // down
        [Some(Front), Some(Front), Some(Back), Some(Above), Some(Below), Some(Below)], // up
        [Some(Front), Some(Front), Some(Below), Some(Above), Some(Above), Some(Above)], // level
    ],
    [
        [None, Some(Below), Some(Below), Some(Below), Some(Front), Some(Front)],
        [Some(Above), None, Some(Above), Some(Front), Some(Front), Some(Front)],
        [Some(Above), Some(Below), Some(Above), Some(Below), Some(Below), Some(Below)],
    ],
    [
        [None, Some(Right), None, None, Some(Back), Some(Back)],
        [Some(Right), None, Some(Right), Some(Right), Some(Back), Some(Back)],
        [Some(Back), Some(Back), Some(Back), Some(Front), Some(Front), Some(Back)],
    ],
];

/// `MOUSE_TO_DIRECTION[x bucket][y bucket]`, y positive is up. Diagonal left
/// reads as back and diagonal right as front.
//  down         centre       up
pub const MOUSE_TO_DIRECTION: [[Option<RelativeDirection>; 3]; 3] = [
    [Some(Back), Some(Left), Some(Back)],   // left
    [Some(Below), None, Some(Above)],       // centre
    [Some(Front), Some(Right), Some(Front)], // right
];

#[must_use]
pub fn side_to_relative(facing: PlayerFacing, side: Side) -> RelativeDirection {
    SIDE_TO_RELATIVE[facing.index()][side.index()]
}

#[must_use]
pub fn relative_to_side(facing: PlayerFacing, direction: RelativeDirection) -> Side {
    RELATIVE_TO_SIDE[facing.index()][direction.index()]
}

#[must_use]
pub fn rotation_plane(pitch: PitchZone, key: RotationKey, facing: PlayerFacing) -> RotationPlane {
    ROTATION_PLANE[pitch.index()][key.index()][facing.index()]
}

#[must_use]
pub fn plane_rotate(plane: RotationPlane, side: Side) -> Option<Side> {
    PLANE_ROTATE[plane.index()][side.index()]
}

#[must_use]
pub fn plane_default(pitch: PitchZone) -> RelativeDirection {
    PLANE_DEFAULT_RELATIVE[pitch.index()]
}

#[must_use]
pub fn cycle(direction: CycleDirection, from: RelativeDirection) -> RelativeDirection {
    CYCLE[direction.index()][from.index()]
}

#[must_use]
pub fn smart_default(
    attempt: usize,
    pitch: PitchZone,
    hit: RelativeDirection,
) -> Option<RelativeDirection> {
    SMART_DEFAULT
        .get(attempt)
        .and_then(|by_pitch| by_pitch[pitch.index()][hit.index()])
}

#[must_use]
pub fn mouse_direction(x: MouseBucket, y: MouseBucket) -> Option<RelativeDirection> {
    MOUSE_TO_DIRECTION[x.index()][y.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_conversion_round_trips_for_every_facing() {
        for facing in PlayerFacing::ALL {
            for side in Side::ALL {
                assert_eq!(relative_to_side(facing, side_to_relative(facing, side)), side);
            }
            for dir in RelativeDirection::ALL {
                assert_eq!(side_to_relative(facing, relative_to_side(facing, dir)), dir);
            }
        }
    }

    #[test]
    fn front_is_the_facing_side() {
        for facing in PlayerFacing::ALL {
            assert_eq!(relative_to_side(facing, Front), facing.side());
            assert_eq!(relative_to_side(facing, Back), facing.side().opposite());
            assert_eq!(relative_to_side(facing, Above), Top);
            assert_eq!(relative_to_side(facing, Below), Bottom);
        }
    }

    #[test]
    fn cycles_close_after_six_steps() {
        for direction in [CycleDirection::Forward, CycleDirection::Backward] {
            for start in RelativeDirection::ALL {
                let mut seen = Vec::new();
                let mut dir = start;
                for _ in 0..6 {
                    seen.push(dir);
                    dir = cycle(direction, dir);
                }
                assert_eq!(dir, start);
                seen.sort_by_key(|d| d.index());
                seen.dedup();
                assert_eq!(seen.len(), 6, "cycle must visit every direction");
            }
        }
    }

    #[test]
    fn forward_then_backward_is_identity() {
        for start in RelativeDirection::ALL {
            let fwd = cycle(CycleDirection::Forward, start);
            assert_eq!(cycle(CycleDirection::Backward, fwd), start);
        }
    }

    #[test]
    fn plane_rotation_visits_four_sides() {
        for plane in RotationPlane::ALL {
            let on_plane: Vec<Side> = Side::ALL
                .into_iter()
                .filter(|s| plane_rotate(plane, *s).is_some())
                .collect();
            assert_eq!(on_plane.len(), 4);

            for start in &on_plane {
                let mut side = *start;
                for step in 1..=4 {
                    side = plane_rotate(plane, side).expect("successor stays on plane");
                    if step < 4 {
                        assert_ne!(side, *start);
                    }
                }
                assert_eq!(side, *start);
            }
        }
    }

    #[test]
    fn axis_sides_are_undefined() {
        assert_eq!(plane_rotate(RotationPlane::XClockwise, West), None);
        assert_eq!(plane_rotate(RotationPlane::YAnticlockwise, Top), None);
        assert_eq!(plane_rotate(RotationPlane::ZClockwise, South), None);
    }

    #[test]
    fn pitch_default_entry_lies_on_every_selectable_plane() {
        for pitch in PitchZone::ALL {
            for key in RotationKey::ALL {
                for facing in PlayerFacing::ALL {
                    let plane = rotation_plane(pitch, key, facing);
                    let entry = relative_to_side(facing, plane_default(pitch));
                    assert!(
                        plane_rotate(plane, entry).is_some(),
                        "{pitch:?}/{key:?}/{facing:?} enters off-plane at {entry}"
                    );
                }
            }
        }
    }

    #[test]
    fn mouse_table_has_single_dead_zone() {
        let buckets = [MouseBucket::Negative, MouseBucket::Neutral, MouseBucket::Positive];
        let mut empty = 0;
        for x in buckets {
            for y in buckets {
                if mouse_direction(x, y).is_none() {
                    empty += 1;
                }
            }
        }
        assert_eq!(empty, 1);
        assert_eq!(mouse_direction(MouseBucket::Positive, MouseBucket::Neutral), Some(Right));
        assert_eq!(mouse_direction(MouseBucket::Neutral, MouseBucket::Positive), Some(Above));
    }

    #[test]
    fn smart_default_out_of_range_attempt_is_none() {
        assert_eq!(smart_default(SMART_DEFAULT_ATTEMPTS, PitchZone::Level, Front), None);
        assert_eq!(smart_default(0, PitchZone::Level, Above), Some(Front));
    }
}
