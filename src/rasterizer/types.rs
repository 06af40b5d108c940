//! Core types for the rasterizer

use bytemuck::{Pod, Zeroable};
use super::math::{Vec2, Vec3};

/// A vertex with position, texture coordinate, normal and tangent.
///
/// This is also the binary record layout of vertex buffers: 11 tightly
/// packed `f32`s, 44 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

impl Vertex {
    /// Size of one record in a vertex buffer
    pub const SIZE: usize = std::mem::size_of::<Vertex>();

    pub fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            uv,
            normal,
            tangent: Vec3::ZERO,
        }
    }

    pub fn from_pos(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Default::default()
        }
    }
}

/// Opaque byte storage backing vertex, index or uniform data
#[derive(Debug, Clone)]
pub struct Buffer {
    pub(crate) data: Vec<u8>,
}

impl Buffer {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Decoded texture: interleaved 8-bit channels, rows top to bottom
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

impl Texture {
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Sample texture at UV coordinates (nearest, wrapping).
    /// Returns the first three channels normalized to 0.0-1.0.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        if self.width == 0 || self.height == 0 || self.channels == 0 {
            return Vec3::ZERO;
        }
        let x = ((uv.x * self.width as f32) as i64 % self.width as i64).unsigned_abs() as usize;
        let y = ((uv.y * self.height as f32) as i64 % self.height as i64).unsigned_abs() as usize;
        let idx = (x + y * self.width) * self.channels;

        let channel = |c: usize| {
            // Grayscale textures repeat their single channel
            let c = c.min(self.channels - 1);
            self.data.get(idx + c).copied().unwrap_or(0) as f32 / 255.0
        };
        Vec3::new(channel(0), channel(1), channel(2))
    }

    /// Create a checkerboard RGB test texture
    pub fn checkerboard(width: usize, height: usize, color1: [u8; 3], color2: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                data.extend_from_slice(if checker { &color1 } else { &color2 });
            }
        }
        Self {
            width,
            height,
            channels: 3,
            data,
        }
    }
}

/// Pack a linear color into `0x00RRGGBB`; each channel is scaled by 255 and
/// clamped, negative channels become 0.
pub fn pack_color(c: Vec3) -> u32 {
    let r = (c.x * 255.0).min(255.0) as u8;
    let g = (c.y * 255.0).min(255.0) as u8;
    let b = (c.z * 255.0).min(255.0) as u8;
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_record_is_44_bytes() {
        assert_eq!(Vertex::SIZE, 44);
    }

    #[test]
    fn test_pack_color_clamps() {
        assert_eq!(pack_color(Vec3::new(1.0, 0.0, 0.0)), 0xFF0000);
        assert_eq!(pack_color(Vec3::new(2.0, 0.5, -1.0)), 0xFF7F00);
    }

    #[test]
    fn test_sample_wraps_negative_uv() {
        let tex = Texture {
            width: 2,
            height: 1,
            channels: 3,
            data: vec![255, 0, 0, 0, 0, 255],
        };
        assert_eq!(tex.sample(Vec2::new(0.0, 0.0)), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(tex.sample(Vec2::new(0.5, 0.0)), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(tex.sample(Vec2::new(1.5, 0.0)), Vec3::new(0.0, 0.0, 1.0));
        // -0.5 * 2 = -1 -> |-1 % 2| = 1
        assert_eq!(tex.sample(Vec2::new(-0.5, 0.0)), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_sample_grayscale() {
        let tex = Texture {
            width: 1,
            height: 1,
            channels: 1,
            data: vec![51],
        };
        assert_eq!(tex.sample(Vec2::ZERO), Vec3::splat(0.2));
    }

    #[test]
    fn test_checkerboard_size() {
        let tex = Texture::checkerboard(8, 8, [255; 3], [0; 3]);
        assert_eq!(tex.byte_size(), 8 * 8 * 3);
        assert_eq!(tex.sample(Vec2::ZERO), Vec3::splat(1.0));
    }
}
