//! Scene module - the demo scene drawn by the viewer
//!
//! - Default Blinn-Phong shaders and their uniform layouts
//! - Renderer that owns the mesh and uniform buffers and spins the model

mod renderer;
pub mod shaders;

pub use renderer::*;
pub use shaders::{GlobalUniformBlock, LightUniformBlock, PointLight};
