//! WebGPU rendering module
//!
//! The scene is tessellated on the CPU from a simulation snapshot and drawn
//! as one flat-colored triangle list.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{SceneOptions, build_scene};
pub use vertex::Vertex;
