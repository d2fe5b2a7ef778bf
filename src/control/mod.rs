//! Control modes and the dispatcher that routes placer input to the
//! resolver.
//!
//! Each `ControlMode` legalises a subset of the placer keys (plus mouse
//! motion for `Mouse`). The dispatcher holds no geometry: it only decides
//! which resolver operation an input maps to in the active mode.
pub mod input;

use bevy::log::{debug, info};
use bevy::prelude::{Event, Resource};
use serde::{Deserialize, Serialize};

use crate::placement::host::WorldQuery;
use crate::placement::resolver::{PlacementContext, PlacementResolver};
use crate::placement::side::{CycleDirection, RotationKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// One key cycles forward and switches placement on.
    SingleKey,
    ToggleForward,
    /// Forward and backward keys, both switch placement on.
    ForwardBack,
    #[default]
    ToggleForwardBack,
    /// Four rotation keys plus a toggle.
    #[serde(rename = "rotate_3d")]
    Rotate3d,
    /// Toggle key, mouse motion picks the side.
    Mouse,
}

impl ControlMode {
    pub const ALL: [ControlMode; 6] = [
        ControlMode::SingleKey,
        ControlMode::ToggleForward,
        ControlMode::ForwardBack,
        ControlMode::ToggleForwardBack,
        ControlMode::Rotate3d,
        ControlMode::Mouse,
    ];

    /// Keys this mode listens to.
    #[must_use]
    pub fn keys(self) -> &'static [PlacerKey] {
        use PlacerKey::*;
        match self {
            Self::SingleKey => &[Next],
            Self::ToggleForward => &[Next, Toggle],
            Self::ForwardBack => &[Next, Previous],
            Self::ToggleForwardBack => &[Next, Previous, Toggle],
            Self::Rotate3d => &[RotateUp, RotateDown, RotateLeft, RotateRight, Toggle3d],
            Self::Mouse => &[Toggle],
        }
    }

    #[must_use]
    pub fn accepts(self, key: PlacerKey) -> bool {
        self.keys().contains(&key)
    }

    /// Modes with no toggle key; placement has to switch itself off.
    #[must_use]
    pub fn forces_auto_off(self) -> bool {
        matches!(self, Self::SingleKey | Self::ForwardBack)
    }

    #[must_use]
    pub fn accepts_mouse(self) -> bool {
        self == Self::Mouse
    }
}

/// The placer's own key actions. Names match `controls.keybinds` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacerKey {
    RotateUp,
    RotateDown,
    RotateLeft,
    RotateRight,
    #[serde(rename = "toggle_3d")]
    Toggle3d,
    Next,
    Previous,
    Toggle,
}

impl PlacerKey {
    pub const ALL: [PlacerKey; 8] = [
        PlacerKey::RotateUp,
        PlacerKey::RotateDown,
        PlacerKey::RotateLeft,
        PlacerKey::RotateRight,
        PlacerKey::Toggle3d,
        PlacerKey::Next,
        PlacerKey::Previous,
        PlacerKey::Toggle,
    ];

    #[must_use]
    pub const fn action_name(self) -> &'static str {
        match self {
            Self::RotateUp => "rotate_up",
            Self::RotateDown => "rotate_down",
            Self::RotateLeft => "rotate_left",
            Self::RotateRight => "rotate_right",
            Self::Toggle3d => "toggle_3d",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Toggle => "toggle",
        }
    }

    #[must_use]
    pub const fn rotation(self) -> Option<RotationKey> {
        match self {
            Self::RotateUp => Some(RotationKey::VerticalClockwise),
            Self::RotateDown => Some(RotationKey::VerticalAnticlockwise),
            Self::RotateLeft => Some(RotationKey::HorizontalClockwise),
            Self::RotateRight => Some(RotationKey::HorizontalAnticlockwise),
            _ => None,
        }
    }
}

/// Raw placer input after key binding lookup.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementInput {
    /// A bound key was released.
    Key(PlacerKey),
    /// Mouse motion for one frame, y positive is up.
    Mouse { dx: i32, dy: i32 },
}

/// What a dispatched input ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not legal in the active mode, or nothing to do.
    Ignored,
    /// Placement was toggled; carries the new enabled state.
    Toggled(bool),
    Adjusted(bool),
    Rotated(bool),
    MouseShifted(bool),
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ControlDispatcher {
    mode: ControlMode,
}

impl ControlDispatcher {
    #[must_use]
    pub fn new(mode: ControlMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Rebind to `mode`. Returns whether anything changed.
    pub fn set_mode(&mut self, mode: ControlMode) -> bool {
        if mode == self.mode {
            return false;
        }
        info!("Control mode rebound from {:?} to {:?}", self.mode, mode);
        self.mode = mode;
        true
    }

    pub fn dispatch<W: WorldQuery + ?Sized>(
        &self,
        resolver: &mut PlacementResolver,
        ctx: &PlacementContext<W>,
        input: PlacementInput,
    ) -> DispatchOutcome {
        match input {
            PlacementInput::Key(key) => self.dispatch_key(resolver, ctx, key),
            PlacementInput::Mouse { dx, dy } => {
                if !self.mode.accepts_mouse() || !resolver.is_enabled() || (dx == 0 && dy == 0) {
                    return DispatchOutcome::Ignored;
                }
                DispatchOutcome::MouseShifted(resolver.mouse_shift_place(ctx, dx, dy))
            }
        }
    }

    fn dispatch_key<W: WorldQuery + ?Sized>(
        &self,
        resolver: &mut PlacementResolver,
        ctx: &PlacementContext<W>,
        key: PlacerKey,
    ) -> DispatchOutcome {
        if !self.mode.accepts(key) {
            debug!("{key:?} ignored in {:?}", self.mode);
            return DispatchOutcome::Ignored;
        }

        match self.mode {
            ControlMode::SingleKey
            | ControlMode::ToggleForward
            | ControlMode::ForwardBack
            | ControlMode::ToggleForwardBack => {
                let auto_on = self.mode.forces_auto_off();
                match key {
                    PlacerKey::Toggle => DispatchOutcome::Toggled(resolver.toggle_enabled()),
                    PlacerKey::Next => DispatchOutcome::Adjusted(
                        resolver.adjust_place(ctx, CycleDirection::Forward, auto_on),
                    ),
                    PlacerKey::Previous => DispatchOutcome::Adjusted(
                        resolver.adjust_place(ctx, CycleDirection::Backward, auto_on),
                    ),
                    _ => DispatchOutcome::Ignored,
                }
            }
            ControlMode::Rotate3d => match key {
                PlacerKey::Toggle3d => DispatchOutcome::Toggled(resolver.toggle_enabled()),
                other => match other.rotation() {
                    Some(rotation) => DispatchOutcome::Rotated(resolver.rotate_place(ctx, rotation)),
                    None => DispatchOutcome::Ignored,
                },
            },
            ControlMode::Mouse => match key {
                PlacerKey::Toggle => DispatchOutcome::Toggled(resolver.toggle_enabled()),
                _ => DispatchOutcome::Ignored,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockId;
    use crate::placement::coordinate::Coordinate;
    use crate::placement::host::{AttachmentKind, RayHit};
    use crate::placement::side::{PitchZone, PlayerFacing, Side};
    use crate::player::PlayerState;
    use crate::settings::PlacementSettings;

    /// A lone block floating in air; every face is free.
    struct Lone;

    impl WorldQuery for Lone {
        fn block_exists_at(&self, pos: Coordinate) -> bool {
            pos == Coordinate::new(0, 0, 0)
        }
        fn is_replaceable_at(&self, _: Coordinate) -> bool {
            false
        }
        fn can_place_on_side(&self, pos: Coordinate, _: Side, _: Option<BlockId>) -> bool {
            self.block_exists_at(pos)
        }
        fn block_metadata_at(&self, _: Coordinate) -> u8 {
            0
        }
        fn attachment_at(&self, _: Coordinate) -> Option<AttachmentKind> {
            None
        }
        fn might_activate_at(&self, _: Coordinate) -> bool {
            false
        }
    }

    fn setup() -> (PlayerState, PlacementSettings) {
        let player = PlayerState {
            facing: PlayerFacing::North,
            pitch: PitchZone::Level,
            sneaking: false,
            held: None,
        };
        let settings = PlacementSettings { smart_start: false, ..Default::default() };
        (player, settings)
    }

    fn targeted(ctx: &PlacementContext<Lone>) -> PlacementResolver {
        let mut r = PlacementResolver::new();
        r.set_enabled(true);
        r.establish_placement(ctx, RayHit::new(Coordinate::new(0, 0, 0), Side::Top));
        r
    }

    #[test]
    fn mode_key_sets() {
        assert_eq!(ControlMode::SingleKey.keys(), &[PlacerKey::Next]);
        assert!(ControlMode::ToggleForwardBack.accepts(PlacerKey::Previous));
        assert!(!ControlMode::ToggleForward.accepts(PlacerKey::Previous));
        assert!(!ControlMode::Mouse.accepts(PlacerKey::Next));
        assert!(ControlMode::Rotate3d.accepts(PlacerKey::Toggle3d));
        assert!(!ControlMode::Rotate3d.accepts(PlacerKey::Toggle));

        let forced: Vec<_> = ControlMode::ALL.into_iter().filter(|m| m.forces_auto_off()).collect();
        assert_eq!(forced, vec![ControlMode::SingleKey, ControlMode::ForwardBack]);
    }

    #[test]
    fn single_key_switches_placement_on() {
        let (player, settings) = setup();
        let ctx = PlacementContext::new(&Lone, &player, &settings);
        let d = ControlDispatcher::new(ControlMode::SingleKey);
        let mut r = PlacementResolver::new();

        assert_eq!(d.dispatch(&mut r, &ctx, PlacementInput::Key(PlacerKey::Toggle)), DispatchOutcome::Ignored);
        assert_eq!(d.dispatch(&mut r, &ctx, PlacementInput::Key(PlacerKey::Next)), DispatchOutcome::Adjusted(true));
        assert!(r.is_enabled());
    }

    #[test]
    fn toggle_modes_do_not_auto_enable() {
        let (player, settings) = setup();
        let ctx = PlacementContext::new(&Lone, &player, &settings);
        let d = ControlDispatcher::new(ControlMode::ToggleForwardBack);
        let mut r = PlacementResolver::new();

        assert_eq!(d.dispatch(&mut r, &ctx, PlacementInput::Key(PlacerKey::Next)), DispatchOutcome::Adjusted(false));
        assert!(!r.is_enabled());
        assert_eq!(d.dispatch(&mut r, &ctx, PlacementInput::Key(PlacerKey::Toggle)), DispatchOutcome::Toggled(true));
    }

    #[test]
    fn forward_and_backward_keys_cycle() {
        let (player, settings) = setup();
        let ctx = PlacementContext::new(&Lone, &player, &settings);
        let d = ControlDispatcher::new(ControlMode::ToggleForwardBack);
        let mut r = targeted(&ctx);

        // Above -> Front going forward, then back again.
        d.dispatch(&mut r, &ctx, PlacementInput::Key(PlacerKey::Next));
        assert_eq!(r.target().1, Side::North);
        d.dispatch(&mut r, &ctx, PlacementInput::Key(PlacerKey::Previous));
        assert_eq!(r.target().1, Side::Top);
    }

    #[test]
    fn rotate_mode_routes_arrows_to_rotation() {
        let (player, settings) = setup();
        let ctx = PlacementContext::new(&Lone, &player, &settings);
        let d = ControlDispatcher::new(ControlMode::Rotate3d);
        let mut r = targeted(&ctx);

        assert_eq!(d.dispatch(&mut r, &ctx, PlacementInput::Key(PlacerKey::Next)), DispatchOutcome::Ignored);
        assert_eq!(
            d.dispatch(&mut r, &ctx, PlacementInput::Key(PlacerKey::RotateLeft)),
            DispatchOutcome::Rotated(true)
        );
        assert_eq!(r.target().1, Side::North);
        assert_eq!(d.dispatch(&mut r, &ctx, PlacementInput::Key(PlacerKey::Toggle3d)), DispatchOutcome::Toggled(false));
    }

    #[test]
    fn mouse_motion_only_counts_in_mouse_mode_while_enabled() {
        let (player, settings) = setup();
        let ctx = PlacementContext::new(&Lone, &player, &settings);
        let motion = PlacementInput::Mouse { dx: -10, dy: 0 };

        let mut r = targeted(&ctx);
        let keys = ControlDispatcher::new(ControlMode::ToggleForwardBack);
        assert_eq!(keys.dispatch(&mut r, &ctx, motion), DispatchOutcome::Ignored);

        let mouse = ControlDispatcher::new(ControlMode::Mouse);
        assert_eq!(mouse.dispatch(&mut r, &ctx, motion), DispatchOutcome::MouseShifted(true));
        assert_eq!(r.target().1, Side::West);

        r.set_enabled(false);
        assert_eq!(mouse.dispatch(&mut r, &ctx, motion), DispatchOutcome::Ignored);
    }

    #[test]
    fn set_mode_reports_changes() {
        let mut d = ControlDispatcher::default();
        assert_eq!(d.mode(), ControlMode::ToggleForwardBack);
        assert!(!d.set_mode(ControlMode::ToggleForwardBack));
        assert!(d.set_mode(ControlMode::Mouse));
        assert_eq!(d.mode(), ControlMode::Mouse);
    }
}
