//! The placement state machine.
//!
//! `PlacementResolver` owns the current target (block, side, replaceable
//! flag) and every operation that moves it: per-frame establishment, the
//! forward/backward cycle, 3D rotation, mouse shifts and the post-placement
//! advance. All searches are bounded; nothing here can loop forever or
//! panic on a legality miss, failures come back as `None`/`false`.
use bevy::log::{debug, info, trace};
use bevy::prelude::Resource;

use super::coordinate::Coordinate;
use super::host::{effective_replaceable_side, PlaceExecutor, RayHit, RayTracer, WorldQuery};
use super::side::{CycleDirection, MouseBucket, PlayerFacing, RotationKey, Side};
use super::tables;
use crate::player::PlayerState;
use crate::settings::PlacementSettings;

/// Candidates tried by the forward/backward cycle: the six-step cycle plus
/// the return to the starting side.
pub const CYCLE_ATTEMPTS: u32 = 7;

/// Candidates tried by a rotation within one plane.
pub const ROTATE_ATTEMPTS: u32 = 5;

/// Everything an operation needs to judge legality, borrowed for one call.
pub struct PlacementContext<'a, W: ?Sized> {
    pub world: &'a W,
    pub player: &'a PlayerState,
    pub settings: &'a PlacementSettings,
}

impl<W: ?Sized> Clone for PlacementContext<'_, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W: ?Sized> Copy for PlacementContext<'_, W> {}

impl<'a, W: WorldQuery + ?Sized> PlacementContext<'a, W> {
    #[must_use]
    pub fn new(world: &'a W, player: &'a PlayerState, settings: &'a PlacementSettings) -> Self {
        Self { world, player, settings }
    }

    #[must_use]
    pub fn can_place(&self, pos: Coordinate, side: Side) -> bool {
        self.world.can_place_on_side(pos, side, self.player.held)
    }

    #[must_use]
    pub fn facing(&self) -> PlayerFacing {
        self.player.facing
    }
}

#[derive(Resource, Debug, Clone)]
pub struct PlacementResolver {
    enabled: bool,
    needs_reinit: bool,
    position: Coordinate,
    side: Side,
    replaceable: bool,
    last_ray_hit: Option<RayHit>,
    pending_overlay_text: bool,
    pending_reset_cue: Option<Coordinate>,
}

impl Default for PlacementResolver {
    fn default() -> Self {
        Self {
            enabled: false,
            needs_reinit: true,
            position: Coordinate::default(),
            side: Side::Top,
            replaceable: false,
            last_ray_hit: None,
            pending_overlay_text: false,
            pending_reset_cue: None,
        }
    }
}

impl PlacementResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enable: bool) {
        if enable != self.enabled {
            self.enabled = enable;
            info!("Block placer {}", if enable { "enabled" } else { "disabled" });
            self.needs_reinit = true;
        }
    }

    /// Flip the enabled flag, returning the new state.
    pub fn toggle_enabled(&mut self) -> bool {
        self.enabled = !self.enabled;
        info!("Block placer {}", if self.enabled { "enabled" } else { "disabled" });
        self.needs_reinit = true;
        self.enabled
    }

    #[must_use]
    pub fn needs_reinit(&self) -> bool {
        self.needs_reinit
    }

    /// Current `(block, side)` being placed against.
    #[must_use]
    pub fn target(&self) -> (Coordinate, Side) {
        (self.position, self.side)
    }

    #[must_use]
    pub fn is_replaceable(&self) -> bool {
        self.replaceable
    }

    #[must_use]
    pub fn last_ray_hit(&self) -> Option<RayHit> {
        self.last_ray_hit
    }

    /// Cell the next block will occupy.
    #[must_use]
    pub fn current_draw_position(&self) -> Coordinate {
        if self.replaceable {
            self.position
        } else {
            self.position.adjacent_on_side(self.side)
        }
    }

    /// HUD label: `"Replace"` or e.g. `"Front (North)"`.
    #[must_use]
    pub fn placement_text(&self, facing: PlayerFacing) -> String {
        if self.replaceable {
            "Replace".to_string()
        } else {
            format!("{} ({})", self.side.relative_to(facing), self.side)
        }
    }

    /// Whether the overlay text should be drawn this frame. Clears the flag.
    pub fn take_overlay_text(&mut self) -> bool {
        std::mem::take(&mut self.pending_overlay_text)
    }

    /// Position of a pending reset cue, if one was raised since the last call.
    pub fn take_reset_cue(&mut self) -> Option<Coordinate> {
        self.pending_reset_cue.take()
    }

    /// Work out where the wireframe goes this frame.
    ///
    /// Reacquires the target from `hit` when a reinit is pending, the view
    /// moved, or the target block vanished. Returns `None` when nothing
    /// should be drawn.
    pub fn establish_placement<W: WorldQuery + ?Sized>(
        &mut self,
        ctx: &PlacementContext<W>,
        hit: RayHit,
    ) -> Option<Coordinate> {
        if !self.enabled {
            return None;
        }

        let present = ctx.world.block_exists_at(self.position);
        let shifted = self.last_ray_hit != Some(hit);

        if self.needs_reinit || shifted || !present {
            if self.needs_reinit {
                debug!("Reinitialising placement at {}/{}", hit.position, hit.side);
            } else if shifted {
                if ctx.settings.auto_off {
                    info!("Block placer auto disabled, selection changed");
                    self.enabled = false;
                    self.needs_reinit = true;
                    return None;
                }
                debug!(
                    "Selection moved to {}/{}, reinitialising",
                    hit.position, hit.side
                );
            } else {
                debug!("Block at {} is gone, resetting", self.position);
                self.place_reset(ctx.settings);
                if !self.enabled {
                    return None;
                }
            }

            self.needs_reinit = false;
            self.last_ray_hit = Some(hit);
            self.position = hit.position;
            self.side = hit.side;
            self.replaceable = ctx.world.is_replaceable_at(self.position);
            if !self.replaceable && ctx.settings.smart_start {
                // Staying on the hit side is fine when nothing better exists.
                let _ = self.smart_default_place(ctx, hit.side);
            }
        }

        if !ctx.can_place(self.position, self.side) {
            debug!("Target {}/{} is not placeable", self.position, self.side);
            if !self.adjust_place(ctx, CycleDirection::Forward, false) && !ctx.player.sneaking {
                debug!("No placeable side around {}", self.position);
                return None;
            }
        }

        if !ctx.player.sneaking
            && ctx.settings.detect_devices
            && ctx.world.might_activate_at(self.position)
        {
            trace!("Block at {} may activate, not drawing", self.position);
            return None;
        }

        if ctx.settings.draw_facing_text {
            self.pending_overlay_text = true;
        }

        Some(self.current_draw_position())
    }

    /// Pick a likely starting side for `side_hit` from the smart-default
    /// priorities, falling back to a forward cycle from `side_hit`.
    pub fn smart_default_place<W: WorldQuery + ?Sized>(
        &mut self,
        ctx: &PlacementContext<W>,
        side_hit: Side,
    ) -> Option<Side> {
        let facing = ctx.facing();
        let relative = side_hit.relative_to(facing);

        for attempt in 0..tables::SMART_DEFAULT_ATTEMPTS {
            let Some(direction) = tables::smart_default(attempt, ctx.player.pitch, relative) else {
                break;
            };
            let side = direction.to_side(facing);
            let valid = ctx.can_place(self.position, side);
            trace!(
                "Smart default {attempt}: {} hit {relative} -> {direction} ({side}) valid={valid}",
                self.position
            );
            if valid {
                self.side = side;
                return Some(side);
            }
        }

        trace!("No smart default fits, cycling from {side_hit}");
        self.side = side_hit;
        if self.adjust_place(ctx, CycleDirection::Forward, false) {
            Some(self.side)
        } else {
            None
        }
    }

    /// Step the target side along the forward or backward cycle.
    ///
    /// While disabled this only turns placement on, and only if `auto_on`.
    pub fn adjust_place<W: WorldQuery + ?Sized>(
        &mut self,
        ctx: &PlacementContext<W>,
        direction: CycleDirection,
        auto_on: bool,
    ) -> bool {
        if !self.enabled {
            if auto_on {
                self.set_enabled(true);
                return true;
            }
            return false;
        }

        self.shift_side(ctx, "Adjust", |pos, side| {
            search_cycle(ctx, pos, side, direction)
        })
    }

    /// Spin the target side in the plane selected by `key`.
    pub fn rotate_place<W: WorldQuery + ?Sized>(
        &mut self,
        ctx: &PlacementContext<W>,
        key: RotationKey,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        self.shift_side(ctx, "Rotate", |pos, side| search_rotation(ctx, pos, side, key))
    }

    /// Jump straight to the side the mouse moved towards.
    ///
    /// Ignored unless `|dx| + |dy|` reaches the configured threshold. There
    /// is no search: the one candidate is taken if it is legal and new.
    pub fn mouse_shift_place<W: WorldQuery + ?Sized>(
        &mut self,
        ctx: &PlacementContext<W>,
        dx: i32,
        dy: i32,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        let settings = ctx.settings;
        if dx.saturating_abs().saturating_add(dy.saturating_abs()) < settings.mouse_threshold {
            return false;
        }

        let bx = MouseBucket::from_delta(dx, settings.mouse_wobble);
        let by = MouseBucket::from_delta(dy, settings.mouse_wobble);
        let Some(direction) = tables::mouse_direction(bx, by) else {
            return false;
        };
        debug!("Mouse shift ({dx},{dy}) -> {direction}");

        let candidate = direction.to_side(ctx.facing());
        self.shift_side(ctx, "Mouse shift", |pos, side| {
            if candidate == side {
                trace!("Mouse shift to {candidate} is unchanged");
                None
            } else if ctx.can_place(pos, candidate) {
                Some(candidate)
            } else {
                trace!("Mouse shift to {candidate} at {pos} is not placeable");
                None
            }
        })
    }

    /// Apply `find` to the current anchor. Replaceable targets are collapsed
    /// onto their backing block first and fail if that is impossible.
    fn shift_side<W, F>(&mut self, ctx: &PlacementContext<W>, op: &str, find: F) -> bool
    where
        W: WorldQuery + ?Sized,
        F: FnOnce(Coordinate, Side) -> Option<Side>,
    {
        if self.replaceable {
            let Some((anchor, side)) = self.collapse_replaceable_position(ctx.world) else {
                return false;
            };
            let Some(new_side) = find(anchor, side) else {
                return false;
            };
            self.position = anchor;
            self.side = new_side;
            self.replaceable = ctx.world.is_replaceable_at(anchor);
            debug!("{op} collapsed onto {anchor}, side {new_side}");
            true
        } else {
            let Some(new_side) = find(self.position, self.side) else {
                return false;
            };
            self.side = new_side;
            true
        }
    }

    /// The backing block of a replaceable target and the face it is attached
    /// to, if the target is replaceable and that block exists.
    #[must_use]
    pub fn collapse_replaceable_position<W: WorldQuery + ?Sized>(
        &self,
        world: &W,
    ) -> Option<(Coordinate, Side)> {
        if !self.replaceable {
            return None;
        }
        let side = effective_replaceable_side(world, self.position)?;
        let anchor = self.position.adjacent_on_side(side.opposite());
        if world.block_exists_at(anchor) {
            debug!("Collapsing replaceable {} onto {anchor} side {side}", self.position);
            Some((anchor, side))
        } else {
            debug!("Cannot collapse replaceable {}, nothing behind it", self.position);
            None
        }
    }

    /// Place at the current target through `host` and advance the state on
    /// success. Returns whether the game accepted the click.
    pub fn do_right_click<H>(
        &mut self,
        host: &mut H,
        player: &PlayerState,
        settings: &PlacementSettings,
    ) -> bool
    where
        H: WorldQuery + PlaceExecutor + RayTracer,
    {
        if !self.enabled {
            return false;
        }

        // Must be read before the replaceable block is overwritten.
        let effective_side = effective_replaceable_side(&*host, self.position);

        debug!("Placing against {} side {}", self.position, self.side);
        if !host.attempt_place(self.position, self.side, player.held) {
            return false;
        }

        let host: &H = host;
        if !host.block_exists_at(self.position) {
            debug!("Block at {} is gone after placing, resetting", self.position);
            self.place_reset(settings);
            return false;
        }

        if self.did_place_block(host) {
            debug!("{}Block placed", if self.replaceable { "Replaceable " } else { "" });
            let ctx = PlacementContext::new(host, player, settings);
            self.place_complete(&ctx, effective_side);
        }
        true
    }

    fn did_place_block<W: WorldQuery + ?Sized>(&self, world: &W) -> bool {
        if self.replaceable {
            !world.is_replaceable_at(self.position)
        } else {
            world.block_exists_at(self.position.adjacent_on_side(self.side))
        }
    }

    /// Post-placement policy: auto-off, auto-repeat or pick a new side.
    fn place_complete<W>(&mut self, ctx: &PlacementContext<W>, effective_side: Option<Side>)
    where
        W: WorldQuery + RayTracer + ?Sized,
    {
        let settings = ctx.settings;

        if settings.auto_off && !settings.auto_repeat {
            self.enabled = false;
            self.needs_reinit = true;
            info!("Block placer auto disabled after placing");
        } else if self.replaceable && !settings.auto_repeat {
            self.needs_reinit = true;
            self.replaceable = false;
            debug!("Replaced block without auto repeat, reinitialising");
        } else if !self.refresh_ray_hit(ctx.world) {
            debug!("Nothing in reach after placing, reinitialising");
            self.needs_reinit = true;
        } else if self.replaceable {
            self.replaceable = ctx.world.is_replaceable_at(self.position);
            if let Some(side) = effective_side {
                self.side = side;
            }
            debug!("Replaced block, repeating at {} side {}", self.position, self.side);
            if !ctx.can_place(self.position, self.side) {
                debug!("Auto repeat obstructed");
                self.place_reset(settings);
            }
        } else if settings.auto_repeat {
            let next = self.position.adjacent_on_side(self.side);
            debug!("Auto repeat from {} to {next} side {}", self.position, self.side);
            if ctx.can_place(next, self.side) {
                self.position = next;
                self.replaceable = ctx.world.is_replaceable_at(next);
            } else {
                debug!("Auto repeat obstructed");
                self.place_reset(settings);
            }
        } else if self.smart_default_place(ctx, self.side).is_none() {
            debug!("No placeable side left around {}", self.position);
            self.place_reset(settings);
        }
    }

    /// Re-cast the view ray. A hit on the freshly placed block is adopted as
    /// the new reference so the next frame does not see a mouse shift.
    fn refresh_ray_hit<T: RayTracer + ?Sized>(&mut self, tracer: &T) -> bool {
        match tracer.current_look_target() {
            Some(hit) => {
                if self.last_ray_hit != Some(hit) {
                    debug!("Placed block is in view, refocusing on {}/{}", hit.position, hit.side);
                    self.last_ray_hit = Some(hit);
                }
                true
            }
            None => false,
        }
    }

    /// No legal continuation: schedule reinit, optionally disable and cue.
    pub fn place_reset(&mut self, settings: &PlacementSettings) {
        if settings.auto_end {
            self.enabled = false;
            info!("Block placer auto ended");
        }
        if settings.reset_sound {
            self.pending_reset_cue = Some(self.position);
        }
        self.needs_reinit = true;
        debug!("Placement reset at {}", self.position);
    }
}

/// Walk the forward/backward cycle from `side` until a legal, different side
/// turns up.
fn search_cycle<W: WorldQuery + ?Sized>(
    ctx: &PlacementContext<W>,
    pos: Coordinate,
    side: Side,
    direction: CycleDirection,
) -> Option<Side> {
    let facing = ctx.facing();
    let mut candidate = tables::cycle(direction, side.relative_to(facing)).to_side(facing);
    let mut attempts = 0;

    loop {
        if ctx.can_place(pos, candidate) {
            break;
        }
        attempts += 1;
        if attempts >= CYCLE_ATTEMPTS {
            debug!("Adjust at {pos} from {side} gave up after {attempts} attempts");
            return None;
        }
        trace!("Adjust at {pos}: {candidate} blocked");
        candidate = tables::cycle(direction, candidate.relative_to(facing)).to_side(facing);
    }

    if candidate == side {
        // Only one side is legal (e.g. blocks that sit on top faces only).
        debug!("Adjust at {pos}: {side} is the only placeable side");
        None
    } else {
        debug!("Adjust at {pos}: chose {candidate}");
        Some(candidate)
    }
}

/// Rotate from `side` within the plane chosen by `key`, entering the plane at
/// the pitch default when `side` lies on its axis.
fn search_rotation<W: WorldQuery + ?Sized>(
    ctx: &PlacementContext<W>,
    pos: Coordinate,
    side: Side,
    key: RotationKey,
) -> Option<Side> {
    let facing = ctx.facing();
    let pitch = ctx.player.pitch;
    let plane = tables::rotation_plane(pitch, key, facing);

    let mut candidate = tables::plane_rotate(plane, side).unwrap_or_else(|| {
        let entry = tables::plane_default(pitch).to_side(facing);
        trace!("Rotate at {pos}: {side} is off plane {plane:?}, entering at {entry}");
        entry
    });
    let mut attempts = 0;

    loop {
        if candidate == side {
            break;
        }
        if ctx.can_place(pos, candidate) {
            debug!("Rotate at {pos}: chose {candidate}");
            return Some(candidate);
        }
        attempts += 1;
        if attempts >= ROTATE_ATTEMPTS {
            break;
        }
        trace!("Rotate at {pos}: {candidate} blocked");
        let Some(next) = tables::plane_rotate(plane, candidate) else {
            debug_assert!(false, "rotation left plane {plane:?} at {candidate}");
            break;
        };
        candidate = next;
    }

    debug!("Rotate {key:?} at {pos} from {side} failed, last tried {candidate}");
    None
}
