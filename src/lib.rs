//! softpipe: CPU software rasterizer
//!
//! Buffers of vertices/indices, bound textures and uniform blocks go in,
//! a packed RGB color buffer comes out:
//! - `rasterizer`: resource store, shader bindings, vertex and raster stages
//! - `mesh`: `.triangle_mesh` loader and built-in geometry
//! - `scene`: default shaders and the demo scene
//! - `config`, `logging`, `present`: viewer plumbing

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod logging;
pub mod mesh;
pub mod present;
pub mod rasterizer;
pub mod scene;
