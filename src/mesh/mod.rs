//! Mesh module - triangle meshes fed to the rasterizer
//!
//! - `.triangle_mesh` binary loader with structural validation
//! - Upload of vertex/index data as context buffers
//! - Built-in cube for when no mesh file is configured

mod cube;
mod loader;

pub use cube::*;
pub use loader::*;

use std::path::Path;

use crate::rasterizer::{BufferHandle, GraphicsContext, Vertex};

/// A contiguous index range sharing one material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshGroup {
    pub first: u32,
    pub count: u32,
    pub material_idx: u32,
}

/// Decoded mesh data, not yet uploaded
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub groups: Vec<MeshGroup>,
    pub num_wanted_materials: u32,
}

/// A mesh living in context buffers
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vbuffer: BufferHandle,
    pub ibuffer: BufferHandle,
    pub num_vertices: u32,
    pub num_indices: u32,
    pub groups: Vec<MeshGroup>,
    pub num_wanted_materials: u32,
}

impl Mesh {
    /// Create the vertex and index buffers for `data`
    pub fn upload(ctx: &mut GraphicsContext, data: &MeshData) -> Self {
        let vbytes: &[u8] = bytemuck::cast_slice(&data.vertices);
        let ibytes: &[u8] = bytemuck::cast_slice(&data.indices);
        Self {
            vbuffer: ctx.create_buffer(Some(vbytes), vbytes.len()),
            ibuffer: ctx.create_buffer(Some(ibytes), ibytes.len()),
            num_vertices: data.vertices.len() as u32,
            num_indices: data.indices.len() as u32,
            groups: data.groups.clone(),
            num_wanted_materials: data.num_wanted_materials,
        }
    }

    /// Load and upload a mesh file. On any error nothing is created and
    /// `None` is returned.
    pub fn load<P: AsRef<Path>>(ctx: &mut GraphicsContext, path: P) -> Option<Self> {
        let path = path.as_ref();
        match load_mesh(path) {
            Ok(data) => {
                let mesh = Self::upload(ctx, &data);
                log::info!(
                    "Loaded mesh '{}' (v={} i={} g={} m={} format={})",
                    path.display(),
                    mesh.num_vertices,
                    mesh.num_indices,
                    mesh.groups.len(),
                    mesh.num_wanted_materials,
                    MESH_FORMAT_VERSION
                );
                Some(mesh)
            }
            Err(e) => {
                log::error!("Failed to load mesh '{}': {}", path.display(), e);
                None
            }
        }
    }

    /// Draw every index of the mesh
    pub fn draw(&self, ctx: &mut GraphicsContext) {
        ctx.draw_triangles(self.vbuffer, self.ibuffer, 0, self.num_indices as usize);
    }
}
