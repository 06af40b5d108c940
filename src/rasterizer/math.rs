//! Vector math for 3D rendering
//!
//! Row-vector convention throughout: a point is transformed as `v * M`, so the
//! translation lives in the last row of a `Mat44`.

use std::ops::{Add, Mul, Neg, Sub};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 2D Vector (texture coordinates, screen positions)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scale(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x * s,
            y: self.y * s,
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        self.scale(s)
    }
}

/// 3D Vector
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.length();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Component-wise product
    pub fn element_mul(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// 4D Vector (homogeneous clip-space positions, quaternions)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Vec4 = Vec4 { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn from_point(p: Vec3) -> Self {
        Self { x: p.x, y: p.y, z: p.z, w: 1.0 }
    }

    pub fn dot(self, other: Vec4) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn scale(self, s: f32) -> Vec4 {
        Vec4 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
            w: self.w * s,
        }
    }
}

/// Quaternion from euler angles in radians (x = roll, y = pitch, z = yaw)
pub fn quat_from_euler(xyz: Vec3) -> Vec4 {
    let (sr, cr) = (xyz.x * 0.5).sin_cos();
    let (sp, cp) = (xyz.y * 0.5).sin_cos();
    let (sy, cy) = (xyz.z * 0.5).sin_cos();

    Vec4 {
        x: cy * sr * cp - sy * cr * sp,
        y: cy * cr * sp + sy * sr * cp,
        z: sy * cr * cp - cy * sr * sp,
        w: cy * cr * cp + sy * sr * sp,
    }
}

/// 4x4 matrix, row-major, rows are the x/y/z basis and the translation
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Mat44 {
    pub rows: [[f32; 4]; 4],
}

impl Default for Mat44 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat44 {
    pub const IDENTITY: Mat44 = Mat44 {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_translation(t: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.rows[3] = [t.x, t.y, t.z, 1.0];
        m
    }

    /// Rotation matrix from a (not necessarily normalized) quaternion
    pub fn from_quaternion(q: Vec4) -> Self {
        let d = q.dot(q);
        let s = if d != 0.0 { 2.0 / d } else { 1.0 };

        let xs = q.x * s;
        let ys = q.y * s;
        let zs = q.z * s;
        let wx = q.w * xs;
        let wy = q.w * ys;
        let wz = q.w * zs;
        let xx = q.x * xs;
        let xy = q.x * ys;
        let xz = q.x * zs;
        let yy = q.y * ys;
        let yz = q.y * zs;
        let zz = q.z * zs;

        Mat44 {
            rows: [
                [1.0 - yy - zz, xy + wz, xz - wy, 0.0],
                [xy - wz, 1.0 - xx - zz, yz + wx, 0.0],
                [xz + wy, yz - wx, 1.0 - xx - yy, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn from_translation_rotation_scale(t: Vec3, r: Vec4, s: Vec3) -> Self {
        let mut m = Self::from_quaternion(r);
        for (row, factor) in m.rows.iter_mut().zip([s.x, s.y, s.z]) {
            row[0] *= factor;
            row[1] *= factor;
            row[2] *= factor;
        }
        m.rows[3] = [t.x, t.y, t.z, 1.0];
        m
    }

    /// Left-handed perspective projection; clip `w` is the view-space depth.
    pub fn perspective_fov(near: f32, far: f32, vertical_fov: f32, aspect: f32) -> Self {
        let range = near - far;
        let tan_half_fov = (vertical_fov / 2.0).tan();

        let mut m = Mat44 { rows: [[0.0; 4]; 4] };
        m.rows[0][0] = 1.0 / (tan_half_fov * aspect);
        m.rows[1][1] = 1.0 / tan_half_fov;
        m.rows[2][2] = (-near - far) / range;
        m.rows[2][3] = 1.0;
        m.rows[3][2] = 2.0 * far * near / range;
        m
    }

    /// Maps NDC `[-1,1]` to pixel coordinates with a top-left origin.
    pub fn viewport(width: usize, height: usize) -> Self {
        let ww = width as f32 * 0.5;
        let hh = height as f32 * 0.5;
        Mat44 {
            rows: [
                [ww, 0.0, 0.0, 0.0],
                [0.0, -hh, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [ww, hh, 0.0, 1.0],
            ],
        }
    }

    /// `self * rhs`: applies `self` first, then `rhs`.
    pub fn mul(&self, rhs: &Mat44) -> Mat44 {
        let mut out = Mat44 { rows: [[0.0; 4]; 4] };
        for i in 0..4 {
            for j in 0..4 {
                out.rows[i][j] = (0..4).map(|k| self.rows[i][k] * rhs.rows[k][j]).sum();
            }
        }
        out
    }

    pub fn transform_vec4(&self, v: Vec4) -> Vec4 {
        let m = &self.rows;
        Vec4 {
            x: m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z + m[3][0] * v.w,
            y: m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z + m[3][1] * v.w,
            z: m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z + m[3][2] * v.w,
            w: m[0][3] * v.x + m[1][3] * v.y + m[2][3] * v.z + m[3][3] * v.w,
        }
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.rows;
        Vec3 {
            x: m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
            y: m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
            z: m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
        }
    }

    /// Like `transform_point` but ignores the translation row
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.rows;
        Vec3 {
            x: m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
            y: m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
            z: m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
        }
    }
}

/// Calculate barycentric coordinates for pixel (x, y) in the 2D triangle `p`.
/// Returns (u, v, w) weighting p[0], p[1], p[2]; any negative component
/// means the pixel lies outside. Degenerate triangles yield non-finite values.
pub fn barycentric(x: i32, y: i32, p: &[Vec2; 3]) -> Vec3 {
    let a = Vec3::new(p[2].x - p[0].x, p[1].x - p[0].x, p[0].x - x as f32);
    let b = Vec3::new(p[2].y - p[0].y, p[1].y - p[0].y, p[0].y - y as f32);
    let u = a.cross(b);
    let s = 1.0 / u.z;
    Vec3::new(s * (u.z - (u.x + u.y)), s * u.y, s * u.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_barycentric_inside() {
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(5.0, 10.0)];
        let bc = barycentric(5, 3, &tri);
        assert!(bc.x >= 0.0 && bc.y >= 0.0 && bc.z >= 0.0);
        assert!((bc.x + bc.y + bc.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_barycentric_outside() {
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(5.0, 10.0)];
        let bc = barycentric(0, 9, &tri);
        assert!(bc.x < 0.0 || bc.y < 0.0 || bc.z < 0.0);
    }

    #[test]
    fn test_barycentric_vertices() {
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0), Vec2::new(0.0, 3.0)];
        assert_eq!(barycentric(0, 0, &tri), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(barycentric(3, 0, &tri), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(barycentric(0, 3, &tri), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_viewport_maps_ndc_corners() {
        let vp = Mat44::viewport(4, 4);
        let top_left = vp.transform_vec4(Vec4::new(-1.0, 1.0, 0.0, 1.0));
        let bottom_right = vp.transform_vec4(Vec4::new(1.0, -1.0, 0.0, 1.0));
        assert_eq!((top_left.x, top_left.y), (0.0, 0.0));
        assert_eq!((bottom_right.x, bottom_right.y), (4.0, 4.0));
    }

    #[test]
    fn test_translation_then_identity() {
        let t = Mat44::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let m = t.mul(&Mat44::IDENTITY);
        let p = m.transform_point(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform_vector(Vec3::UP), Vec3::UP);
    }

    #[test]
    fn test_perspective_w_is_view_depth() {
        let proj = Mat44::perspective_fov(0.1, 100.0, 1.0, 1.0);
        let clip = proj.transform_vec4(Vec4::new(0.0, 0.0, 5.0, 1.0));
        assert!((clip.w - 5.0).abs() < 1e-5);
        let near = proj.transform_vec4(Vec4::new(0.0, 0.0, 0.1, 1.0));
        assert!((near.z / near.w + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_yaw_quarter_turn() {
        let q = quat_from_euler(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        let m = Mat44::from_quaternion(q);
        let v = m.transform_vector(Vec3::new(1.0, 0.0, 0.0));
        assert!((v.length() - 1.0).abs() < 1e-5);
        assert!(v.y.abs() < 1e-5);
    }
}
