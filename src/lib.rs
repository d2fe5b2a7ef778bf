pub mod block;
pub mod control;
pub mod placement;
pub mod player;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod world;

pub mod settings;

pub use placement::PlacerPlugin;
