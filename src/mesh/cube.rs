//! Built-in test geometry

use super::MeshData;
use crate::rasterizer::{Vec2, Vec3, Vertex};

/// Create a cube centered on the origin: 24 vertices (4 per face so every
/// face gets its own normal and uvs), 12 triangles.
pub fn create_test_cube(half_extent: f32) -> MeshData {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    let positions = [
        // Front face
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        // Back face
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        // Top face
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, -1.0),
        // Bottom face
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        // Right face
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        // Left face
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
    ];

    let normals = [
        Vec3::new(0.0, 0.0, 1.0),  // Front
        Vec3::new(0.0, 0.0, -1.0), // Back
        Vec3::new(0.0, 1.0, 0.0),  // Top
        Vec3::new(0.0, -1.0, 0.0), // Bottom
        Vec3::new(1.0, 0.0, 0.0),  // Right
        Vec3::new(-1.0, 0.0, 0.0), // Left
    ];

    let uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    for (face_idx, normal) in normals.iter().enumerate() {
        let base = face_idx * 4;
        // u runs along the first edge of every face
        let tangent = (positions[base + 1] - positions[base]).normalize();

        for (i, uv) in uvs.iter().enumerate() {
            vertices.push(Vertex {
                position: positions[base + i] * half_extent,
                uv: *uv,
                normal: *normal,
                tangent,
            });
        }

        // Two triangles per face
        let vbase = base as u32;
        indices.extend_from_slice(&[vbase, vbase + 1, vbase + 2, vbase, vbase + 2, vbase + 3]);
    }

    MeshData {
        vertices,
        indices,
        groups: Vec::new(),
        num_wanted_materials: 0,
    }
}
