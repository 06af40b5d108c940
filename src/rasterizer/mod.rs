//! CPU software rasterizer
//!
//! Features:
//! - Handle-addressed buffers and textures, never freed individually
//! - Programmable vertex and pixel shaders with 4 uniform and 4 texture slots
//! - Each unique vertex transformed once per draw call
//! - Perspective-correct attribute interpolation
//! - Z-buffer with a fused copy-and-clear swap

mod bindings;
mod context;
mod math;
mod render;
mod resources;
mod types;

pub use bindings::*;
pub use context::*;
pub use math::*;
pub use render::*;
pub use resources::*;
pub use types::*;
