mod component;
mod graph;
mod hexagon;
mod palette;
mod params;
mod physics;
mod render;
mod state;
mod types;

pub use component::DirectoryMapCanvas;
pub use params::MatchPolicy;
pub use types::{CategoryRecord, ProductRecord};
