//! Scene driver: owns the uniform buffers and the mesh, animates the model

use std::f32::consts::PI;
use std::mem::offset_of;
use std::path::Path;

use super::shaders::{
    default_pixel_shader, default_vertex_shader, GlobalUniformBlock, LightUniformBlock, PointLight,
    ALBEDO_SLOT, GLOBALS_SLOT, LIGHTS_SLOT, MAX_POINT_LIGHTS,
};
use crate::config::ViewerConfig;
use crate::mesh::{create_test_cube, Mesh};
use crate::rasterizer::{quat_from_euler, BufferHandle, GraphicsContext, Mat44, Texture, TextureHandle, Vec3};

/// Half extent of the fallback cube
const CUBE_HALF_EXTENT: f32 = 0.25;

/// Error type for texture loading
#[derive(Debug)]
pub enum TextureError {
    ImageError(image::ImageError),
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::ImageError(e)
    }
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureError::ImageError(e) => write!(f, "Failed to decode image: {}", e),
        }
    }
}

impl std::error::Error for TextureError {}

/// Decode an image file into a 3-channel texture, flipped so that uv (0,0)
/// is the bottom-left corner.
pub fn load_texture_from_file<P: AsRef<Path>>(ctx: &mut GraphicsContext, path: P) -> Result<TextureHandle, TextureError> {
    let path = path.as_ref();
    let img = image::open(path)?.flipv().to_rgb8();
    let (w, h) = img.dimensions();
    let handle = ctx.create_texture(img.as_raw(), w as usize, h as usize, 3);
    log::info!("Loaded texture '{}' (w={}, h={}, c=3)", path.display(), w, h);
    Ok(handle)
}

/// Build the projection matrix for a render target of `width`x`height`
pub fn projection_for(config: &ViewerConfig, width: usize, height: usize) -> Mat44 {
    Mat44::perspective_fov(
        config.near,
        config.far,
        config.fov_degrees.to_radians(),
        width as f32 / height.max(1) as f32,
    )
}

pub struct Renderer {
    /// `None` when the configured mesh failed to load
    pub mesh: Option<Mesh>,
    pub global_buffer: BufferHandle,
    pub light_buffer: BufferHandle,
    pub albedo: TextureHandle,
    model_offset: Vec3,
    model_scale: f32,
    rotation_speed: f32,
}

impl Renderer {
    /// Bind the default shaders and create every resource the scene needs
    pub fn new(ctx: &mut GraphicsContext, config: &ViewerConfig) -> Self {
        ctx.bind_shaders(default_vertex_shader, default_pixel_shader);

        let mesh = match &config.mesh {
            Some(path) => Mesh::load(ctx, path),
            None => Some(Mesh::upload(ctx, &create_test_cube(CUBE_HALF_EXTENT))),
        };

        let albedo = config
            .texture
            .as_ref()
            .and_then(|path| match load_texture_from_file(ctx, path) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    log::warn!("{}: {}, using checkerboard", path, e);
                    None
                }
            })
            .unwrap_or_else(|| {
                let tex = Texture::checkerboard(32, 32, [230, 200, 150], [60, 45, 35]);
                ctx.create_texture(&tex.data, tex.width, tex.height, tex.channels)
            });
        ctx.bind_texture(ALBEDO_SLOT, albedo);

        let mut lights = LightUniformBlock::default();
        for (dst, light) in lights.point_lights.iter_mut().zip(&config.lights) {
            *dst = PointLight {
                pos: light.position,
                col: light.color,
            };
        }
        lights.num_point_lights = config.lights.len().min(MAX_POINT_LIGHTS) as u32;
        let light_bytes = bytemuck::bytes_of(&lights);
        let light_buffer = ctx.create_buffer(Some(light_bytes), light_bytes.len());
        ctx.bind_uniform_block(LIGHTS_SLOT, light_buffer);

        let projection = projection_for(config, ctx.width(), ctx.height());
        let view = Mat44::from_translation(-config.camera_position);
        let globals = GlobalUniformBlock {
            transform: Mat44::IDENTITY,
            view_projection: view.mul(&projection),
            camera_pos: config.camera_position,
        };
        let global_bytes = bytemuck::bytes_of(&globals);
        let global_buffer = ctx.create_buffer(Some(global_bytes), global_bytes.len());
        ctx.bind_uniform_block(GLOBALS_SLOT, global_buffer);

        Self {
            mesh,
            global_buffer,
            light_buffer,
            albedo,
            model_offset: config.model_offset,
            model_scale: config.model_scale,
            rotation_speed: config.rotation_speed,
        }
    }

    /// Model transform at time `t` seconds: a turntable around Y
    pub fn model_transform(&self, t: f32) -> Mat44 {
        Mat44::from_translation_rotation_scale(
            self.model_offset,
            quat_from_euler(Vec3::new(0.0, -t * self.rotation_speed + PI, 0.0)),
            Vec3::splat(self.model_scale),
        )
    }

    /// Update the model transform in place and draw the mesh
    pub fn draw_scene(&self, ctx: &mut GraphicsContext, t: f32) {
        let tm = self.model_transform(t);
        ctx.update_buffer(
            self.global_buffer,
            bytemuck::bytes_of(&tm),
            offset_of!(GlobalUniformBlock, transform),
        );

        if let Some(mesh) = &self.mesh {
            mesh.draw(ctx);
        }
    }
}
