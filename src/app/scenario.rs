//! Scripted placer sessions.
//!
//! A scenario is a RON file describing an initial world, the player's pose
//! and a list of steps. Each step feeds one kind of input into the app and
//! then runs a single update, so a scenario plays like a recorded session.
//! `Expect*` steps turn a scenario into a check.
//!
//! ```ron
//! (
//!     player: (position: (0.5, 1.0, 3.5), yaw: 180.0, pitch: 45.0),
//!     world: [(from: (-3, 0, -3), to: Some((3, 0, 3)), block: "stone")],
//!     steps: [Enable, Place, Key(next), Place, ExpectBlock(at: (0, 2, 0), block: "stone")],
//! )
//! ```
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use serde::Deserialize;

use blockplacer::block::BlockRegistry;
use blockplacer::control::{PlacementInput, PlacerKey};
use blockplacer::placement::{Coordinate, PlaceRequest, PlacementHighlight, PlacementResolver};
use blockplacer::player::{Player, PlayerLook, DEFAULT_REACH};
use blockplacer::settings::Settings;
use blockplacer::world::{BlockState, World};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub player: PlayerSetup,
    #[serde(default)]
    pub world: Vec<Fill>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSetup {
    /// Feet position.
    pub position: (f32, f32, f32),
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
    /// Block name in hand, `None` for an empty hand.
    #[serde(default)]
    pub held: Option<String>,
    #[serde(default = "PlayerSetup::default_reach")]
    pub reach: f32,
}

impl PlayerSetup {
    fn default_reach() -> f32 { DEFAULT_REACH }
}

impl Default for PlayerSetup {
    fn default() -> Self {
        Self { position: (0.5, 1.0, 0.5), yaw: 0.0, pitch: 0.0, held: None, reach: DEFAULT_REACH }
    }
}

/// Fill the box `from..=to` (or the single cell `from`) with `block`.
#[derive(Debug, Clone, Deserialize)]
pub struct Fill {
    pub from: (i32, i32, i32),
    #[serde(default)]
    pub to: Option<(i32, i32, i32)>,
    pub block: String,
    #[serde(default)]
    pub meta: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum Step {
    /// Switch placement on without a key.
    Enable,
    /// A placer key released.
    Key(PlacerKey),
    /// Raw mouse motion, y positive is up.
    Mouse { dx: f32, dy: f32 },
    Look { yaw: f32, pitch: f32 },
    Sneak(bool),
    Hold(Option<String>),
    /// Right click.
    Place,
    /// An update with no input.
    Frame,
    ExpectDraw(Option<(i32, i32, i32)>),
    ExpectBlock { at: (i32, i32, i32), block: String },
}

/// Load a scenario file.
///
/// # Errors
/// Fails if the file cannot be read or is not a valid scenario.
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    ron::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
}

fn block_id(registry: &BlockRegistry, name: &str) -> Result<u8> {
    registry
        .id_for_name(name)
        .ok_or_else(|| anyhow!("unknown block '{name}'"))
}

/// Build the starting world.
///
/// # Errors
/// Fails on an unknown block name.
pub fn build_world(scenario: &Scenario, registry: &BlockRegistry) -> Result<World> {
    let mut world = World::new();
    for fill in &scenario.world {
        let id = block_id(registry, &fill.block)?;
        let (x0, y0, z0) = fill.from;
        let (x1, y1, z1) = fill.to.unwrap_or(fill.from);
        for x in x0.min(x1)..=x0.max(x1) {
            for y in y0.min(y1)..=y0.max(y1) {
                for z in z0.min(z1)..=z0.max(z1) {
                    world.set_state(IVec3::new(x, y, z), BlockState::new(id, fill.meta));
                }
            }
        }
    }
    Ok(world)
}

/// Spawn the player entity.
///
/// # Errors
/// Fails if the held block is unknown.
pub fn spawn_player(app: &mut App, setup: &PlayerSetup, registry: &BlockRegistry) -> Result<Entity> {
    let held = setup.held.as_deref().map(|name| block_id(registry, name)).transpose()?;
    let (x, y, z) = setup.position;
    let entity = app
        .world_mut()
        .spawn((
            Transform::from_xyz(x, y, z),
            Player { held, reach: setup.reach, ..Default::default() },
            PlayerLook::new(setup.yaw, setup.pitch),
        ))
        .id();
    Ok(entity)
}

/// Play every step against `app`, one update per input step.
///
/// # Errors
/// Fails on the first unmet expectation or unknown block name.
pub fn run_scenario(app: &mut App, player: Entity, scenario: &Scenario) -> Result<()> {
    for (index, step) in scenario.steps.iter().enumerate() {
        apply_step(app, player, step).with_context(|| format!("step {index}: {step:?}"))?;
    }
    Ok(())
}

fn apply_step(app: &mut App, player: Entity, step: &Step) -> Result<()> {
    match step {
        Step::Enable => app.world_mut().resource_mut::<PlacementResolver>().set_enabled(true),
        Step::Key(key) => {
            app.world_mut().send_event(PlacementInput::Key(*key));
        }
        Step::Mouse { dx, dy } => {
            app.world_mut().send_event(MouseMotion { delta: Vec2::new(*dx, -*dy) });
        }
        Step::Look { yaw, pitch } => {
            let mut entity = app.world_mut().entity_mut(player);
            if let Some(mut look) = entity.get_mut::<PlayerLook>() {
                *look = PlayerLook::new(*yaw, *pitch);
            }
        }
        Step::Sneak(on) => {
            let code = app
                .world()
                .resource::<Settings>()
                .controls
                .key_for("sneak")
                .ok_or_else(|| anyhow!("no sneak key bound"))?;
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            if *on { keys.press(code) } else { keys.release(code) }
        }
        Step::Hold(name) => {
            let held = match name {
                Some(name) => Some(block_id(app.world().resource::<BlockRegistry>(), name)?),
                None => None,
            };
            if let Some(mut p) = app.world_mut().entity_mut(player).get_mut::<Player>() {
                p.held = held;
            }
        }
        Step::Place => {
            app.world_mut().send_event(PlaceRequest);
        }
        Step::Frame => {}
        Step::ExpectDraw(expected) => {
            let expected = expected.map(Coordinate::from);
            let actual = app.world().resource::<PlacementHighlight>().draw_position;
            if actual != expected {
                bail!("expected highlight at {expected:?}, found {actual:?}");
            }
            return Ok(());
        }
        Step::ExpectBlock { at, block } => {
            let id = block_id(app.world().resource::<BlockRegistry>(), block)?;
            let found = app.world().resource::<World>().get_block(at.0, at.1, at.2);
            if found != id {
                bail!("expected {block} at {at:?}, found id {found}");
            }
            return Ok(());
        }
    }

    app.update();
    report(app);
    Ok(())
}

fn report(app: &App) {
    let resolver = app.world().resource::<PlacementResolver>();
    let highlight = app.world().resource::<PlacementHighlight>();
    let (position, side) = resolver.target();
    match (highlight.draw_position, &highlight.text) {
        (Some(draw), Some(text)) => info!("target {position}/{side}, drawing at {draw}: {text}"),
        (Some(draw), None) => info!("target {position}/{side}, drawing at {draw}"),
        (None, _) if resolver.is_enabled() => info!("target {position}/{side}, nothing to draw"),
        (None, _) => info!("placer off"),
    }
}
