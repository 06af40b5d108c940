//! Core rendering functions
//! Vertex processing and perspective-correct triangle rasterization

use super::bindings::{PixelShader, ShaderBindings, VertexShader};
use super::math::{barycentric, Mat44, Vec2, Vec3};
use super::types::{pack_color, Vertex};

/// Fill value the color buffer is reset to after every swap
pub const CLEAR_COLOR: u32 = 0x1111_1111;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u32>,   // 0x00RRGGBB, one per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    /// Color starts at 0, depth at +infinity
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            zbuffer: vec![f32::INFINITY; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
        self.zbuffer.fill(f32::INFINITY);
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.zbuffer[y * self.width + x])
        } else {
            None
        }
    }

    /// Bytes held by the color and depth buffers
    pub fn byte_size(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<u32>() + self.zbuffer.len() * std::mem::size_of::<f32>()
    }
}

/// Vertex after the vertex stage, ready for rasterization.
/// Every attribute is stored pre-multiplied by `inv_w`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectedVertex {
    pub screen_pos: Vec2,
    pub depth: f32,
    pub inv_w: f32,
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

/// Run the vertex shader once per vertex and project the result to screen
/// space. `output` is cleared and refilled, keeping its allocation.
pub fn process_vertices(
    output: &mut Vec<ProjectedVertex>,
    vertices: impl ExactSizeIterator<Item = Vertex>,
    shader: &dyn VertexShader,
    bindings: &ShaderBindings,
    viewport: &Mat44,
) {
    output.clear();
    output.reserve(vertices.len());

    for vertex in vertices {
        let mut vs_out = Vertex::default();
        let clip_pos = shader.transform_vertex(&vertex, &mut vs_out, bindings);
        let inv_w = 1.0 / clip_pos.w;

        // Perspective divide
        let ndc = clip_pos.scale(inv_w);
        // Viewport to screen space
        let screen = viewport.transform_vec4(ndc);

        output.push(ProjectedVertex {
            screen_pos: Vec2::new(screen.x, screen.y),
            depth: ndc.z,
            inv_w,
            position: vs_out.position * inv_w,
            uv: vs_out.uv * inv_w,
            normal: vs_out.normal * inv_w,
            tangent: vs_out.tangent * inv_w,
        });
    }
}

fn interpolate3(a: Vec3, b: Vec3, c: Vec3, w: Vec3) -> Vec3 {
    a * w.x + b * w.y + c * w.z
}

fn interpolate2(a: Vec2, b: Vec2, c: Vec2, w: Vec3) -> Vec2 {
    a * w.x + b * w.y + c * w.z
}

/// Inclusive pixel bounds of a triangle clamped to the framebuffer,
/// `None` when nothing is left after clamping.
fn bounding_box(points: &[Vec2; 3], width: usize, height: usize) -> Option<(i32, i32, i32, i32)> {
    let max_x = width as i32 - 1;
    let max_y = height as i32 - 1;

    let (mut x0, mut y0) = (i32::MAX, i32::MAX);
    let (mut x1, mut y1) = (i32::MIN, i32::MIN);
    for p in points {
        x0 = x0.min(p.x as i32).max(0);
        y0 = y0.min(p.y as i32).max(0);
        x1 = x1.max(p.x as i32).min(max_x);
        y1 = y1.max(p.y as i32).min(max_y);
    }

    if x1 < x0 || y1 < y0 {
        None
    } else {
        Some((x0, y0, x1, y1))
    }
}

/// Rasterize a single triangle
pub fn rasterize_triangle(
    fb: &mut Framebuffer,
    v0: &ProjectedVertex,
    v1: &ProjectedVertex,
    v2: &ProjectedVertex,
    shader: &dyn PixelShader,
    bindings: &ShaderBindings,
) {
    let points = [v0.screen_pos, v1.screen_pos, v2.screen_pos];
    let Some((x0, y0, x1, y1)) = bounding_box(&points, fb.width, fb.height) else {
        return;
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            let bc = barycentric(x, y, &points);
            if bc.x < 0.0 || bc.y < 0.0 || bc.z < 0.0 {
                continue;
            }

            // Screen-space depth uses the raw weights
            let depth = bc.x * v0.depth + bc.y * v1.depth + bc.z * v2.depth;
            if depth < 0.0 {
                continue;
            }

            let idx = y as usize * fb.width + x as usize;
            if depth >= fb.zbuffer[idx] || depth.is_nan() {
                continue;
            }
            fb.zbuffer[idx] = depth;

            // Perspective correction
            let pc = 1.0 / (bc.x * v0.inv_w + bc.y * v1.inv_w + bc.z * v2.inv_w);
            let w = bc * pc;

            let vertex = Vertex {
                position: interpolate3(v0.position, v1.position, v2.position, w),
                uv: interpolate2(v0.uv, v1.uv, v2.uv, w),
                normal: interpolate3(v0.normal, v1.normal, v2.normal, w),
                tangent: interpolate3(v0.tangent, v1.tangent, v2.tangent, w),
            };

            let color = shader.shade_pixel(&vertex, bindings);
            fb.pixels[idx] = pack_color(color);
        }
    }
}

/// Rasterize every whole triangle in `indices`. Triangles referencing a
/// vertex outside `projected` are skipped.
pub fn rasterize_indexed(
    fb: &mut Framebuffer,
    projected: &[ProjectedVertex],
    indices: impl Iterator<Item = u32>,
    shader: &dyn PixelShader,
    bindings: &ShaderBindings,
) -> usize {
    let mut indices = indices.map(|i| projected.get(i as usize));
    let mut drawn = 0;
    while let (Some(a), Some(b), Some(c)) = (indices.next(), indices.next(), indices.next()) {
        if let (Some(v0), Some(v1), Some(v2)) = (a, b, c) {
            rasterize_triangle(fb, v0, v1, v2, shader, bindings);
            drawn += 1;
        }
    }
    drawn
}
