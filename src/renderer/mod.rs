//! WebGPU rendering module
//!
//! Draws the scene's draw list as lit, instanced unit meshes.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::SceneRenderState;
