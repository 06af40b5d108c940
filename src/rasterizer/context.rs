//! The rendering context: one owned value holding every piece of pipeline
//! state (resources, bindings, frame buffers, the projected-vertex scratch
//! array). Single-threaded by construction; pass it by `&mut`.

use super::bindings::{BindingState, PixelShader, VertexShader};
use super::math::Mat44;
use super::render::{process_vertices, rasterize_indexed, Framebuffer, ProjectedVertex, CLEAR_COLOR};
use super::resources::{BufferHandle, ResourceStore, TextureHandle};
use super::types::{Buffer, Texture, Vertex};

pub struct GraphicsContext {
    framebuffer: Framebuffer,
    viewport: Mat44,
    resources: ResourceStore,
    bindings: BindingState,
    projected: Vec<ProjectedVertex>,
}

impl GraphicsContext {
    /// Allocate color (0) and depth (+infinity) buffers for the render
    /// target and cache its viewport transform.
    pub fn init(width: usize, height: usize) -> Self {
        log::info!("graphics context initialized ({}x{})", width, height);
        Self {
            framebuffer: Framebuffer::new(width, height),
            viewport: Mat44::viewport(width, height),
            resources: ResourceStore::new(),
            bindings: BindingState::new(),
            projected: Vec::new(),
        }
    }

    /// Release every buffer, texture and both frame buffers. Returns the
    /// number of bytes released.
    pub fn shutdown(mut self) -> usize {
        let resources = self.resources.release_all();
        let scratch = self.projected.capacity() * std::mem::size_of::<ProjectedVertex>();
        let frame = self.framebuffer.byte_size();
        let total = resources + scratch + frame;
        log::info!(
            "graphics context shut down, released {} bytes ({:.2}KB)",
            total,
            total as f32 / 1000.0
        );
        total
    }

    pub fn width(&self) -> usize {
        self.framebuffer.width
    }

    pub fn height(&self) -> usize {
        self.framebuffer.height
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn resources(&self) -> &ResourceStore {
        &self.resources
    }

    /// Projected vertices of the most recent draw call
    pub fn projected_vertices(&self) -> &[ProjectedVertex] {
        &self.projected
    }

    pub fn bind_shaders(&mut self, vs: impl VertexShader + 'static, ps: impl PixelShader + 'static) {
        self.bindings.bind_shaders(Box::new(vs), Box::new(ps));
    }

    /// No-op for `slot >= 4`. The slot refers to the buffer's live storage.
    pub fn bind_uniform_block(&mut self, slot: usize, handle: BufferHandle) {
        self.bindings.bind_uniform_block(slot, handle);
    }

    /// No-op for `slot >= 4`
    pub fn bind_texture(&mut self, slot: usize, handle: TextureHandle) {
        self.bindings.bind_texture(slot, handle);
    }

    pub fn create_buffer(&mut self, data: Option<&[u8]>, size: usize) -> BufferHandle {
        self.resources.create_buffer(data, size)
    }

    pub fn create_texture(&mut self, data: &[u8], width: usize, height: usize, channels: usize) -> TextureHandle {
        self.resources.create_texture(data, width, height, channels)
    }

    /// Overwrite `data.len()` bytes at `offset`; dropped when out of range.
    pub fn update_buffer(&mut self, handle: BufferHandle, data: &[u8], offset: usize) {
        self.resources.update_buffer(handle, data, offset);
    }

    pub fn buffer(&self, handle: BufferHandle) -> Option<&Buffer> {
        self.resources.buffer(handle)
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture> {
        self.resources.texture(handle)
    }

    /// Draw `index_count` indices starting at `first_index` as a triangle
    /// list. Every vertex of `vbuf` is transformed once, whatever the indices.
    pub fn draw_triangles(&mut self, vbuf: BufferHandle, ibuf: BufferHandle, first_index: usize, index_count: usize) {
        let Some((vs, ps)) = self.bindings.shaders() else {
            log::warn!("draw_triangles called without bound shaders");
            return;
        };
        let (Some(vbuffer), Some(ibuffer)) = (self.resources.buffer(vbuf), self.resources.buffer(ibuf)) else {
            log::warn!("draw_triangles with unknown buffers {:?}/{:?}", vbuf, ibuf);
            return;
        };
        let bindings = self.bindings.resolve(&self.resources);

        let vertices = vbuffer
            .bytes()
            .chunks_exact(Vertex::SIZE)
            .map(bytemuck::pod_read_unaligned::<Vertex>);
        process_vertices(&mut self.projected, vertices, vs, &bindings, &self.viewport);

        let indices = ibuffer
            .bytes()
            .chunks_exact(std::mem::size_of::<u32>())
            .skip(first_index)
            .take(index_count)
            .map(bytemuck::pod_read_unaligned::<u32>);
        let drawn = rasterize_indexed(&mut self.framebuffer, &self.projected, indices, ps, &bindings);
        log::trace!("drew {} triangles from {} vertices", drawn, self.projected.len());
    }

    /// Copy the color buffer into `destination`, then reset color to
    /// `CLEAR_COLOR` and depth to +infinity for the next frame.
    pub fn swap_buffers(&mut self, destination: &mut [u32]) {
        let src = &self.framebuffer.pixels;
        if destination.len() != src.len() {
            log::warn!(
                "swap_buffers destination holds {} pixels, frame has {}",
                destination.len(),
                src.len()
            );
        }
        let n = destination.len().min(src.len());
        destination[..n].copy_from_slice(&src[..n]);
        self.framebuffer.clear(CLEAR_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::bindings::ShaderBindings;
    use crate::rasterizer::math::{Vec3, Vec4};

    fn passthrough(v: &Vertex, out: &mut Vertex, _: &ShaderBindings) -> Vec4 {
        *out = *v;
        Vec4::from_point(v.position)
    }

    fn red(_: &Vertex, _: &ShaderBindings) -> Vec3 {
        Vec3::new(1.0, 0.0, 0.0)
    }

    /// Reads its color from the uniform block at slot 0
    fn uniform_color(_: &Vertex, b: &ShaderBindings) -> Vec3 {
        b.uniform::<Vec3>(0).unwrap_or(Vec3::ZERO)
    }

    /// NDC positions that land on pixels (0,0), (3,0), (0,3) of a 4x4 target
    fn corner_triangle() -> Vec<Vertex> {
        vec![
            Vertex::from_pos(-1.0, 1.0, 0.0),
            Vertex::from_pos(0.5, 1.0, 0.0),
            Vertex::from_pos(-1.0, -0.5, 0.0),
            Vertex::from_pos(0.9, -0.9, 0.0),
        ]
    }

    fn upload(ctx: &mut GraphicsContext, vertices: &[Vertex], indices: &[u32]) -> (BufferHandle, BufferHandle) {
        let vbytes: &[u8] = bytemuck::cast_slice(vertices);
        let ibytes: &[u8] = bytemuck::cast_slice(indices);
        let vbuf = ctx.create_buffer(Some(vbytes), vbytes.len());
        let ibuf = ctx.create_buffer(Some(ibytes), ibytes.len());
        (vbuf, ibuf)
    }

    fn frame(ctx: &mut GraphicsContext) -> Vec<u32> {
        let mut out = vec![0; ctx.width() * ctx.height()];
        ctx.swap_buffers(&mut out);
        out
    }

    #[test]
    fn test_draw_red_triangle_end_to_end() {
        let mut ctx = GraphicsContext::init(4, 4);
        let (vbuf, ibuf) = upload(&mut ctx, &corner_triangle(), &[0, 1, 2]);
        ctx.bind_shaders(passthrough, red);

        // First swap leaves the clear value in place
        frame(&mut ctx);
        ctx.draw_triangles(vbuf, ibuf, 0, 3);
        let pixels = frame(&mut ctx);

        for y in 0..4 {
            for x in 0..4 {
                let expected = if x + y <= 3 { 0xFF0000 } else { CLEAR_COLOR };
                assert_eq!(pixels[y * 4 + x], expected, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_every_vertex_processed_once() {
        let mut ctx = GraphicsContext::init(4, 4);
        let (vbuf, ibuf) = upload(&mut ctx, &corner_triangle(), &[0, 1, 2, 0, 2, 1]);
        ctx.bind_shaders(passthrough, red);
        ctx.draw_triangles(vbuf, ibuf, 0, 6);
        assert_eq!(ctx.projected_vertices().len(), 4);

        let (small, empty) = upload(&mut ctx, &corner_triangle()[..2], &[]);
        ctx.draw_triangles(small, empty, 0, 0);
        assert_eq!(ctx.projected_vertices().len(), 2);
    }

    #[test]
    fn test_index_range_selects_triangles() {
        let mut ctx = GraphicsContext::init(4, 4);
        // First triangle covers the corner, second is degenerate-offscreen
        let (vbuf, ibuf) = upload(&mut ctx, &corner_triangle(), &[3, 3, 3, 0, 1, 2]);
        ctx.bind_shaders(passthrough, red);

        ctx.draw_triangles(vbuf, ibuf, 0, 3);
        assert!(!frame(&mut ctx).contains(&0xFF0000));

        ctx.draw_triangles(vbuf, ibuf, 3, 3);
        assert_eq!(frame(&mut ctx)[0], 0xFF0000);
    }

    #[test]
    fn test_swap_copies_then_clears() {
        let mut ctx = GraphicsContext::init(4, 4);
        let (vbuf, ibuf) = upload(&mut ctx, &corner_triangle(), &[0, 1, 2]);
        ctx.bind_shaders(passthrough, red);
        ctx.draw_triangles(vbuf, ibuf, 0, 3);

        let before = ctx.framebuffer().pixels.clone();
        let out = frame(&mut ctx);
        assert_eq!(out, before);
        assert!(ctx.framebuffer().pixels.iter().all(|&p| p == CLEAR_COLOR));
        assert!(ctx.framebuffer().zbuffer.iter().all(|&z| z == f32::INFINITY));
    }

    #[test]
    fn test_invalid_uniform_slot_changes_nothing() {
        let color = Vec3::new(0.0, 0.0, 1.0);
        let other = Vec3::new(1.0, 1.0, 1.0);

        let render = |bind_invalid: bool| {
            let mut ctx = GraphicsContext::init(4, 4);
            let (vbuf, ibuf) = upload(&mut ctx, &corner_triangle(), &[0, 1, 2]);
            let block = ctx.create_buffer(Some(bytemuck::bytes_of(&color)), 12);
            let stray = ctx.create_buffer(Some(bytemuck::bytes_of(&other)), 12);
            ctx.bind_shaders(passthrough, uniform_color);
            ctx.bind_uniform_block(0, block);
            if bind_invalid {
                ctx.bind_uniform_block(5, stray);
            }
            ctx.draw_triangles(vbuf, ibuf, 0, 3);
            frame(&mut ctx)
        };

        let with = render(true);
        assert_eq!(with, render(false));
        assert_eq!(with[0], 0x0000FF);
    }

    #[test]
    fn test_uniform_update_visible_to_next_draw() {
        let mut ctx = GraphicsContext::init(4, 4);
        let (vbuf, ibuf) = upload(&mut ctx, &corner_triangle(), &[0, 1, 2]);
        let block = ctx.create_buffer(Some(bytemuck::bytes_of(&Vec3::new(1.0, 0.0, 0.0))), 12);
        ctx.bind_shaders(passthrough, uniform_color);
        ctx.bind_uniform_block(0, block);

        ctx.draw_triangles(vbuf, ibuf, 0, 3);
        assert_eq!(frame(&mut ctx)[0], 0xFF0000);

        ctx.update_buffer(block, bytemuck::bytes_of(&Vec3::new(0.0, 1.0, 0.0)), 0);
        ctx.draw_triangles(vbuf, ibuf, 0, 3);
        assert_eq!(frame(&mut ctx)[0], 0x00FF00);
    }

    #[test]
    fn test_draw_without_shaders_is_noop() {
        let mut ctx = GraphicsContext::init(4, 4);
        let (vbuf, ibuf) = upload(&mut ctx, &corner_triangle(), &[0, 1, 2]);
        ctx.draw_triangles(vbuf, ibuf, 0, 3);
        assert!(ctx.framebuffer().pixels.iter().all(|&p| p == 0));
        assert!(ctx.projected_vertices().is_empty());
    }

    #[test]
    fn test_shutdown_reports_released_bytes() {
        let mut ctx = GraphicsContext::init(2, 2);
        ctx.create_buffer(None, 10);
        ctx.create_texture(&[0; 4], 2, 2, 1);
        // 10 + 4 resource bytes, 4 color + 4 depth words
        assert_eq!(ctx.shutdown(), 14 + 32);
    }
}
