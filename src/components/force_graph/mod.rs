//! Force-directed card graph: layout engine, interaction layer and the
//! canvas component that drives both.

pub mod build;
mod component;
pub mod host;
mod render;
pub mod simulation;
pub mod state;
mod tick_loop;
pub mod transform;
pub mod types;

pub use build::build_graph;
pub use component::ForceGraphCanvas;
pub use types::GraphData;
