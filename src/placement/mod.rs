//! Directional block placement.
//!
//! The player picks a block face to build against and steers the target
//! around it with keys or mouse motion, relative to where they are facing.
//! After each placement the target can advance on its own so rows and
//! columns build without re-aiming.
//!
//! - `side`: faces, relative directions and the other small enums.
//! - `tables`: the static direction and rotation lookup tables.
//! - `coordinate`: block positions.
//! - `host`: the traits the resolver uses to see and change the world.
//! - `resolver`: the placement state machine.
//! - `systems`: bevy wiring (`PlacerPlugin`).
pub mod coordinate;
pub mod host;
pub mod resolver;
pub mod side;
pub mod systems;
pub mod tables;

pub use coordinate::Coordinate;
pub use host::{AttachmentKind, PlaceExecutor, RayHit, RayTracer, WorldQuery};
pub use resolver::{PlacementContext, PlacementResolver};
pub use side::{CycleDirection, PitchZone, PlayerFacing, RelativeDirection, RotationKey, Side};
pub use systems::{PlaceRequest, PlacementHighlight, PlacerPlugin, ResetCue};
