//! Default shaders and the uniform block layouts they expect
//!
//! Slot 0: `GlobalUniformBlock`, slot 1: `LightUniformBlock`,
//! texture slot 0: albedo.

use bytemuck::{Pod, Zeroable};

use crate::rasterizer::{Mat44, ShaderBindings, Vec3, Vec4, Vertex};

pub const GLOBALS_SLOT: usize = 0;
pub const LIGHTS_SLOT: usize = 1;
pub const ALBEDO_SLOT: usize = 0;

pub const MAX_POINT_LIGHTS: usize = 4;

const AMBIENT: f32 = 0.2;
const SPECULAR_POWER: i32 = 16;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GlobalUniformBlock {
    /// Model to world
    pub transform: Mat44,
    pub view_projection: Mat44,
    pub camera_pos: Vec3,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointLight {
    pub pos: Vec3,
    pub col: Vec3,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LightUniformBlock {
    pub point_lights: [PointLight; MAX_POINT_LIGHTS],
    pub num_point_lights: u32,
}

/// World-space position and normal out, clip-space position returned
pub fn default_vertex_shader(input: &Vertex, out: &mut Vertex, bindings: &ShaderBindings) -> Vec4 {
    let Some(globals) = bindings.uniform::<GlobalUniformBlock>(GLOBALS_SLOT) else {
        return Vec4::ZERO;
    };

    out.position = globals.transform.transform_point(input.position);
    out.uv = input.uv;
    out.normal = globals.transform.transform_vector(input.normal);
    out.tangent = input.tangent;

    globals.view_projection.transform_vec4(Vec4::from_point(out.position))
}

/// Inverse-square falloff, clamped near the light
fn distance_attenuation(unnormalized_light_vec: Vec3) -> f32 {
    let dist2 = unnormalized_light_vec.dot(unnormalized_light_vec);
    1.0 / dist2.max(0.01 * 0.01)
}

/// Textured Blinn-Phong lit by up to 4 point lights
pub fn default_pixel_shader(input: &Vertex, bindings: &ShaderBindings) -> Vec3 {
    let (Some(globals), Some(lights), Some(albedo)) = (
        bindings.uniform::<GlobalUniformBlock>(GLOBALS_SLOT),
        bindings.uniform::<LightUniformBlock>(LIGHTS_SLOT),
        bindings.texture(ALBEDO_SLOT),
    ) else {
        return Vec3::ZERO;
    };

    // Interpolated normal is used as is, so its length scales the lighting
    let normal = input.normal;
    let view_dir = (globals.camera_pos - input.position).normalize();

    let mut diffuse_acc = Vec3::ZERO;
    let mut specular_acc = Vec3::ZERO;

    let count = (lights.num_point_lights as usize).min(MAX_POINT_LIGHTS);
    for light in &lights.point_lights[..count] {
        let light_vec = light.pos - input.position;
        let light_dir = light_vec.normalize();
        let halfway_dir = (view_dir + light_dir).normalize();

        let attenuation = distance_attenuation(light_vec);
        let n_dot_l = normal.dot(light_dir).clamp(0.0, 1.0);
        let specular = halfway_dir.dot(normal).max(0.0).powi(SPECULAR_POWER);

        let attenuated = light.col * (n_dot_l * attenuation);
        diffuse_acc = diffuse_acc + attenuated;
        specular_acc = specular_acc + attenuated * specular;
    }

    let tex_color = albedo.sample(input.uv);
    tex_color.element_mul(Vec3::splat(AMBIENT) + diffuse_acc + specular_acc)
}
