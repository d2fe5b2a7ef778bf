//! Bevy wiring for the placer.
//!
//! `PlacerPlugin` registers the resolver, the control dispatcher and the
//! events between them, and runs one ordered chain per frame:
//!
//! 1. rebind the control mode if the settings changed,
//! 2. read raw input into `PlacementInput` / `PlaceRequest`,
//! 3. dispatch placer input to the resolver,
//! 4. place on right click,
//! 5. re-establish the target and publish `PlacementHighlight`,
//! 6. emit `ResetCue`s raised along the way.
//!
//! The world it works on is the `World` / `BlockRegistry` pair from
//! `crate::world` and `crate::block`, seen from the single `Player` entity.
use bevy::input::InputPlugin;
use bevy::log::{debug, info};
use bevy::prelude::*;

use super::coordinate::Coordinate;
use super::host::{PlaceExecutor, RayTracer};
use super::resolver::{PlacementContext, PlacementResolver};
use crate::block::BlockRegistry;
use crate::control::input::{place_request_input, placer_keyboard_input, placer_mouse_input, track_sneaking};
use crate::control::{ControlDispatcher, PlacementInput};
use crate::player::{Player, PlayerLook, PlayerState};
use crate::settings::Settings;
use crate::world::{Viewpoint, World, WorldHost, WorldView};

/// Right click: place at the current target.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaceRequest;

/// Placement had nowhere left to go; play the reset sound at `position`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetCue {
    pub position: Coordinate,
}

/// What the presentation layer should draw this frame.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementHighlight {
    /// Cell the wireframe goes around, `None` to draw nothing.
    pub draw_position: Option<Coordinate>,
    /// Facing text such as `"Front (North)"`.
    pub text: Option<String>,
}

pub struct PlacerPlugin;

impl Plugin for PlacerPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<InputPlugin>() {
            app.add_plugins(InputPlugin);
        }
        let mode = app
            .world()
            .get_resource::<Settings>()
            .map(|s| s.placement.control_mode)
            .unwrap_or_default();

        app.init_resource::<Settings>()
            .init_resource::<World>()
            .init_resource::<BlockRegistry>()
            .init_resource::<PlacementResolver>()
            .init_resource::<PlacementHighlight>()
            .insert_resource(ControlDispatcher::new(mode))
            .add_event::<PlacementInput>()
            .add_event::<PlaceRequest>()
            .add_event::<ResetCue>()
            .add_systems(
                Update,
                (
                    sync_control_mode,
                    (placer_keyboard_input, placer_mouse_input, place_request_input, track_sneaking),
                    dispatch_placement_input,
                    place_on_request,
                    establish_placement_target,
                    emit_reset_cues,
                )
                    .chain(),
            );
    }
}

type PlayerQuery<'w, 's> = Query<'w, 's, (&'static Transform, &'static Player, &'static PlayerLook)>;

fn player_snapshot(players: &PlayerQuery, settings: &Settings) -> Option<(PlayerState, Viewpoint)> {
    let (transform, player, look) = players.get_single().ok()?;
    let state = PlayerState::from_components(player, look, settings.placement.pitch_angle);
    Some((state, Viewpoint::from_player(transform, player, look)))
}

/// Follow control-mode changes from a settings reload. Placement is
/// switched off so the new keys start from a clean state.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_control_mode(
    settings: Res<Settings>,
    mut dispatcher: ResMut<ControlDispatcher>,
    mut resolver: ResMut<PlacementResolver>,
) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }
    dispatcher.set_mode(settings.placement.control_mode);
    resolver.set_enabled(false);
}

#[allow(clippy::needless_pass_by_value)]
pub fn dispatch_placement_input(
    mut inputs: EventReader<PlacementInput>,
    dispatcher: Res<ControlDispatcher>,
    mut resolver: ResMut<PlacementResolver>,
    settings: Res<Settings>,
    world: Res<World>,
    registry: Res<BlockRegistry>,
    players: PlayerQuery,
) {
    let Some((state, viewpoint)) = player_snapshot(&players, &settings) else {
        inputs.clear();
        return;
    };
    let view = WorldView::new(&world, &registry, viewpoint);
    let ctx = PlacementContext::new(&view, &state, &settings.placement);
    for input in inputs.read() {
        let outcome = dispatcher.dispatch(&mut resolver, &ctx, *input);
        debug!("{input:?} -> {outcome:?}");
    }
}

/// Handle right clicks. With the placer off, the click falls through to a
/// plain placement against whatever is looked at.
#[allow(clippy::needless_pass_by_value)]
pub fn place_on_request(
    mut requests: EventReader<PlaceRequest>,
    mut resolver: ResMut<PlacementResolver>,
    settings: Res<Settings>,
    mut world: ResMut<World>,
    registry: Res<BlockRegistry>,
    players: PlayerQuery,
) {
    // One placement per frame, however many clicks arrived.
    if requests.read().count() == 0 {
        return;
    }
    let Some((state, viewpoint)) = player_snapshot(&players, &settings) else {
        return;
    };
    let mut host = WorldHost::new(&mut world, &registry, viewpoint);

    if !resolver.is_enabled() {
        if let Some(hit) = host.current_look_target() {
            host.attempt_place(hit.position, hit.side, state.held);
        }
        return;
    }
    if resolver.needs_reinit() {
        debug!("No target established yet, ignoring click");
        return;
    }
    resolver.do_right_click(&mut host, &state, &settings.placement);
}

/// Re-establish the target from the view ray and publish the highlight.
#[allow(clippy::needless_pass_by_value)]
pub fn establish_placement_target(
    mut resolver: ResMut<PlacementResolver>,
    mut highlight: ResMut<PlacementHighlight>,
    settings: Res<Settings>,
    world: Res<World>,
    registry: Res<BlockRegistry>,
    players: PlayerQuery,
) {
    let mut next = PlacementHighlight::default();

    if resolver.is_enabled()
        && let Some((state, viewpoint)) = player_snapshot(&players, &settings)
    {
        let view = WorldView::new(&world, &registry, viewpoint);
        if let Some(hit) = view.current_look_target() {
            let ctx = PlacementContext::new(&view, &state, &settings.placement);
            next.draw_position = resolver.establish_placement(&ctx, hit);
            if next.draw_position.is_some() && resolver.take_overlay_text() {
                next.text = Some(resolver.placement_text(state.facing));
            }
        }
    }

    highlight.set_if_neq(next);
}

#[allow(clippy::needless_pass_by_value)]
pub fn emit_reset_cues(mut resolver: ResMut<PlacementResolver>, mut cues: EventWriter<ResetCue>) {
    if let Some(position) = resolver.take_reset_cue() {
        info!("Placement reset at {position}");
        cues.send(ResetCue { position });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::control::{ControlMode, PlacerKey};
    use crate::placement::side::Side;
    use bevy::ecs::event::Events;

    /// A stone strip along z at y = 0, and a player standing at its south
    /// end looking north and 45 degrees down at (0, 0, 1).
    fn app(smart_start: bool) -> App {
        let mut settings = Settings::default();
        settings.placement.smart_start = smart_start;

        let mut registry = BlockRegistry::default();
        registry.register(Block::default());

        let mut world = World::new();
        for z in 0..4 {
            world.set_block(0, 0, z, 1);
        }

        let mut app = App::new();
        app.insert_resource(settings)
            .insert_resource(registry)
            .insert_resource(world)
            .add_plugins(PlacerPlugin);
        app.world_mut().spawn((
            Transform::from_xyz(0.5, 1.0, 3.5),
            Player::default(),
            PlayerLook::new(180.0, 45.0),
        ));
        app
    }

    fn highlight(app: &App) -> PlacementHighlight {
        app.world().resource::<PlacementHighlight>().clone()
    }

    #[test]
    fn nothing_is_drawn_while_disabled() {
        let mut app = app(false);
        app.update();
        assert_eq!(highlight(&app), PlacementHighlight::default());
    }

    #[test]
    fn toggle_then_place_builds_and_advances() {
        let mut app = app(false);
        app.world_mut().send_event(PlacementInput::Key(PlacerKey::Toggle));
        app.update();
        assert!(app.world().resource::<PlacementResolver>().is_enabled());
        assert_eq!(
            highlight(&app),
            PlacementHighlight {
                draw_position: Some(Coordinate::new(0, 1, 1)),
                text: Some("Above (Top)".to_string()),
            }
        );

        app.world_mut().send_event(PlaceRequest);
        app.update();
        assert_eq!(app.world().resource::<World>().get_block(0, 1, 1), 1);
        let resolver = app.world().resource::<PlacementResolver>();
        assert_eq!(resolver.target(), (Coordinate::new(0, 1, 1), Side::Top));
        assert_eq!(highlight(&app).draw_position, Some(Coordinate::new(0, 2, 1)));
    }

    #[test]
    fn click_with_placer_off_places_plainly() {
        let mut app = app(false);
        app.world_mut().send_event(PlaceRequest);
        app.update();
        assert_eq!(app.world().resource::<World>().get_block(0, 1, 1), 1);
        assert!(!app.world().resource::<PlacementResolver>().is_enabled());
    }

    #[test]
    fn settings_change_rebinds_and_disables() {
        let mut app = app(false);
        app.update();
        app.world_mut().resource_mut::<PlacementResolver>().set_enabled(true);
        app.world_mut().resource_mut::<Settings>().placement.control_mode = ControlMode::Mouse;
        app.update();

        assert_eq!(app.world().resource::<ControlDispatcher>().mode(), ControlMode::Mouse);
        assert!(!app.world().resource::<PlacementResolver>().is_enabled());
    }

    #[test]
    fn obstructed_repeat_raises_a_reset_cue() {
        let mut app = app(false);
        app.world_mut().send_event(PlacementInput::Key(PlacerKey::Toggle));
        app.update();
        // Block the cell the repeat would move into.
        app.world_mut().resource_mut::<World>().set_block(0, 2, 1, 1);
        app.world_mut().send_event(PlaceRequest);
        app.update();

        let cues: Vec<ResetCue> = app.world_mut().resource_mut::<Events<ResetCue>>().drain().collect();
        assert_eq!(cues, vec![ResetCue { position: Coordinate::new(0, 0, 1) }]);
    }
}
