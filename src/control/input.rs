//! Raw input capture for the placer.
//!
//! Turns bevy keyboard, mouse motion and mouse button state into
//! `PlacementInput` / `PlaceRequest` events. Only keys legal in the active
//! control mode are looked at, so rebinding the mode takes effect on the
//! next frame.
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;

use super::{ControlDispatcher, PlacementInput};
use crate::placement::systems::PlaceRequest;
use crate::player::Player;
use crate::settings::Settings;

/// Send a `PlacementInput::Key` for each bound placer key released this frame.
#[allow(clippy::needless_pass_by_value)]
pub fn placer_keyboard_input(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    dispatcher: Res<ControlDispatcher>,
    mut events: EventWriter<PlacementInput>,
) {
    for key in dispatcher.mode().keys() {
        if let Some(code) = settings.controls.key_for(key.action_name())
            && keys.just_released(code)
        {
            events.send(PlacementInput::Key(*key));
        }
    }
}

/// Sum this frame's mouse motion into one `PlacementInput::Mouse`.
///
/// Screen y grows downwards; the event uses y up.
#[allow(clippy::needless_pass_by_value)]
pub fn placer_mouse_input(
    mut motion: EventReader<MouseMotion>,
    dispatcher: Res<ControlDispatcher>,
    mut events: EventWriter<PlacementInput>,
) {
    if !dispatcher.mode().accepts_mouse() {
        motion.clear();
        return;
    }

    let delta = motion.read().fold(Vec2::ZERO, |acc, ev| acc + ev.delta);
    #[allow(clippy::cast_possible_truncation)]
    let (dx, dy) = (delta.x.round() as i32, -(delta.y.round() as i32));
    if dx != 0 || dy != 0 {
        events.send(PlacementInput::Mouse { dx, dy });
    }
}

/// Right click asks the placer to place at its current target.
#[allow(clippy::needless_pass_by_value)]
pub fn place_request_input(buttons: Res<ButtonInput<MouseButton>>, mut events: EventWriter<PlaceRequest>) {
    if buttons.just_pressed(MouseButton::Right) {
        events.send(PlaceRequest);
    }
}

/// Mirror the sneak key into `Player::sneaking`.
#[allow(clippy::needless_pass_by_value)]
pub fn track_sneaking(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut players: Query<&mut Player>,
) {
    let sneaking = settings
        .controls
        .key_for("sneak")
        .is_some_and(|code| keys.pressed(code));
    for mut player in &mut players {
        if player.sneaking != sneaking {
            player.sneaking = sneaking;
        }
    }
}
