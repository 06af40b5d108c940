//! Shader callbacks and binding slots

use bytemuck::Pod;

use super::math::{Vec3, Vec4};
use super::resources::{BufferHandle, ResourceStore, TextureHandle};
use super::types::{Texture, Vertex};

pub const MAX_NUM_UNIFORM_BLOCKS: usize = 4;
pub const MAX_NUM_TEXTURES: usize = 4;

/// Per-vertex stage: fill `out` and return the clip-space position.
pub trait VertexShader {
    fn transform_vertex(&self, input: &Vertex, out: &mut Vertex, bindings: &ShaderBindings) -> Vec4;
}

/// Per-pixel stage: return a linear RGB color (clamped downstream).
pub trait PixelShader {
    fn shade_pixel(&self, input: &Vertex, bindings: &ShaderBindings) -> Vec3;
}

impl<F> VertexShader for F
where
    F: Fn(&Vertex, &mut Vertex, &ShaderBindings) -> Vec4,
{
    fn transform_vertex(&self, input: &Vertex, out: &mut Vertex, bindings: &ShaderBindings) -> Vec4 {
        self(input, out, bindings)
    }
}

impl<F> PixelShader for F
where
    F: Fn(&Vertex, &ShaderBindings) -> Vec3,
{
    fn shade_pixel(&self, input: &Vertex, bindings: &ShaderBindings) -> Vec3 {
        self(input, bindings)
    }
}

/// What a draw call sees: the live storage behind every bound slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderBindings<'a> {
    pub uniform_blocks: [Option<&'a [u8]>; MAX_NUM_UNIFORM_BLOCKS],
    pub textures: [Option<&'a Texture>; MAX_NUM_TEXTURES],
}

impl<'a> ShaderBindings<'a> {
    /// Raw bytes of the uniform block bound at `slot`
    pub fn uniform_bytes(&self, slot: usize) -> Option<&'a [u8]> {
        self.uniform_blocks.get(slot).copied().flatten()
    }

    /// Read the uniform block at `slot` as `T`. `None` if the slot is empty
    /// or the buffer is smaller than `T`.
    pub fn uniform<T: Pod>(&self, slot: usize) -> Option<T> {
        let bytes = self.uniform_bytes(slot)?;
        let bytes = bytes.get(..std::mem::size_of::<T>())?;
        Some(bytemuck::pod_read_unaligned(bytes))
    }

    pub fn texture(&self, slot: usize) -> Option<&'a Texture> {
        self.textures.get(slot).copied().flatten()
    }
}

/// Currently bound shaders and resource slots
#[derive(Default)]
pub struct BindingState {
    vertex_shader: Option<Box<dyn VertexShader>>,
    pixel_shader: Option<Box<dyn PixelShader>>,
    uniform_blocks: [BufferHandle; MAX_NUM_UNIFORM_BLOCKS],
    textures: [TextureHandle; MAX_NUM_TEXTURES],
}

impl BindingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_shaders(&mut self, vs: Box<dyn VertexShader>, ps: Box<dyn PixelShader>) {
        self.vertex_shader = Some(vs);
        self.pixel_shader = Some(ps);
    }

    /// Out-of-range slots are ignored
    pub fn bind_uniform_block(&mut self, slot: usize, handle: BufferHandle) {
        if let Some(entry) = self.uniform_blocks.get_mut(slot) {
            *entry = handle;
        }
    }

    /// Out-of-range slots are ignored
    pub fn bind_texture(&mut self, slot: usize, handle: TextureHandle) {
        if let Some(entry) = self.textures.get_mut(slot) {
            *entry = handle;
        }
    }

    pub fn uniform_block(&self, slot: usize) -> BufferHandle {
        self.uniform_blocks.get(slot).copied().unwrap_or_default()
    }

    pub fn texture(&self, slot: usize) -> TextureHandle {
        self.textures.get(slot).copied().unwrap_or_default()
    }

    pub fn shaders(&self) -> Option<(&dyn VertexShader, &dyn PixelShader)> {
        match (&self.vertex_shader, &self.pixel_shader) {
            (Some(vs), Some(ps)) => Some((vs.as_ref(), ps.as_ref())),
            _ => None,
        }
    }

    /// Resolve every slot against the store. Handles that do not name a
    /// resource resolve to an empty slot.
    pub fn resolve<'a>(&self, store: &'a ResourceStore) -> ShaderBindings<'a> {
        let mut bindings = ShaderBindings::default();
        for (dst, handle) in bindings.uniform_blocks.iter_mut().zip(self.uniform_blocks) {
            *dst = store.buffer(handle).map(|b| b.bytes());
        }
        for (dst, handle) in bindings.textures.iter_mut().zip(self.textures) {
            *dst = store.texture(handle);
        }
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::Vec2;

    #[test]
    fn test_invalid_slot_is_noop() {
        let mut store = ResourceStore::new();
        let h = store.create_buffer(None, 16);
        let mut state = BindingState::new();
        state.bind_uniform_block(MAX_NUM_UNIFORM_BLOCKS, h);
        state.bind_uniform_block(5, h);
        state.bind_texture(4, TextureHandle::from_raw(1));
        for slot in 0..MAX_NUM_UNIFORM_BLOCKS {
            assert!(state.uniform_block(slot).is_none());
            assert!(state.texture(slot).is_none());
        }
    }

    #[test]
    fn test_bound_block_is_live() {
        let mut store = ResourceStore::new();
        let h = store.create_buffer(Some(bytemuck::bytes_of(&1.0f32)), 4);
        let mut state = BindingState::new();
        state.bind_uniform_block(0, h);
        assert_eq!(state.resolve(&store).uniform::<f32>(0), Some(1.0));

        store.update_buffer(h, bytemuck::bytes_of(&2.5f32), 0);
        assert_eq!(state.resolve(&store).uniform::<f32>(0), Some(2.5));
    }

    #[test]
    fn test_uniform_too_small_is_none() {
        let mut store = ResourceStore::new();
        let h = store.create_buffer(None, 2);
        let mut state = BindingState::new();
        state.bind_uniform_block(1, h);
        let bindings = state.resolve(&store);
        assert!(bindings.uniform_bytes(1).is_some());
        assert!(bindings.uniform::<u32>(1).is_none());
        assert!(bindings.uniform::<u32>(0).is_none());
        assert!(bindings.uniform::<u32>(9).is_none());
    }

    fn copy_vs(v: &Vertex, out: &mut Vertex, _: &ShaderBindings) -> Vec4 {
        *out = *v;
        Vec4::from_point(v.position)
    }

    fn uv_ps(v: &Vertex, _: &ShaderBindings) -> Vec3 {
        Vec3::new(v.uv.x, v.uv.y, 0.0)
    }

    #[test]
    fn test_functions_are_shaders() {
        let mut state = BindingState::new();
        assert!(state.shaders().is_none());
        state.bind_shaders(Box::new(copy_vs), Box::new(uv_ps));
        let (vs, ps) = state.shaders().unwrap();
        let input = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec2::new(0.5, 0.25), Vec3::UP);
        let mut out = Vertex::default();
        let bindings = ShaderBindings::default();
        assert_eq!(vs.transform_vertex(&input, &mut out, &bindings), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(out, input);
        assert_eq!(ps.shade_pixel(&input, &bindings), Vec3::new(0.5, 0.25, 0.0));
    }
}
