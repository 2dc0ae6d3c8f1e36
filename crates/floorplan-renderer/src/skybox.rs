//! Gradient sky sphere and the environment camera used for reflections

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::constants::environment;

/// Sky uniform buffer data sent to GPU (48 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SkyUniform {
    /// Top color (RGB), w = exponent
    pub top: [f32; 4],
    /// Bottom color (RGB), w = vertical offset
    pub bottom: [f32; 4],
    /// x = sphere radius, yzw unused
    pub params: [f32; 4],
}

/// Background sky: a large sphere shaded with a vertical gradient
#[derive(Debug, Clone, PartialEq)]
pub struct Skybox {
    pub top_color: Vec3,
    pub bottom_color: Vec3,
    /// Raises the horizon of the gradient
    pub offset: f32,
    pub exponent: f32,
    pub radius: f32,
    /// Camera rendering the sky into the reflection cube
    pub environment: EnvironmentCamera,
}

impl Default for Skybox {
    fn default() -> Self {
        Self {
            top_color: Vec3::ONE,
            bottom_color: Vec3::splat(0xe9 as f32 / 255.0),
            offset: 400.0,
            exponent: 0.6,
            radius: 4000.0,
            environment: EnvironmentCamera::default(),
        }
    }
}

impl Skybox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sky color seen along a view direction
    pub fn sky_color(&self, direction: Vec3) -> Vec3 {
        let point = direction.normalize_or_zero() * self.radius + Vec3::Y * self.offset;
        let h = point.normalize_or_zero().y;
        let t = h.max(0.0).powf(self.exponent).clamp(0.0, 1.0);
        self.bottom_color.lerp(self.top_color, t)
    }

    /// Get the uniform data for GPU
    pub fn uniform(&self) -> SkyUniform {
        SkyUniform {
            top: self.top_color.extend(self.exponent).to_array(),
            bottom: self.bottom_color.extend(self.offset).to_array(),
            params: [self.radius, 0.0, 0.0, 0.0],
        }
    }
}

/// Cube camera capturing the surroundings into an environment map.
///
/// Six 90-degree views in +X, -X, +Y, -Y, +Z, -Z order, the cube face order
/// wgpu uses for cube textures.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentCamera {
    pub position: Vec3,
    pub near: f32,
    pub far: f32,
    pub resolution: u32,
}

impl Default for EnvironmentCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            near: environment::NEAR,
            far: environment::FAR,
            resolution: environment::RESOLUTION,
        }
    }
}

impl EnvironmentCamera {
    /// View-projection matrix of each cube face
    pub fn face_view_projections(&self) -> [Mat4; 6] {
        // Cube faces are addressed left-handed; mirror x to match
        let proj = Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0))
            * Mat4::perspective_rh(90f32.to_radians(), 1.0, self.near, self.far);
        let faces: [(Vec3, Vec3); 6] = [
            (Vec3::X, Vec3::Y),
            (Vec3::NEG_X, Vec3::Y),
            (Vec3::Y, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::Z),
            (Vec3::Z, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y),
        ];
        faces.map(|(dir, up)| proj * Mat4::look_at_rh(self.position, self.position + dir, up))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gradient_endpoints() {
        let sky = Skybox::new();
        let up = sky.sky_color(Vec3::Y);
        let down = sky.sky_color(Vec3::NEG_Y);

        assert_relative_eq!(up.x, sky.top_color.x, epsilon = 1e-4);
        assert_eq!(down, sky.bottom_color);
    }

    #[test]
    fn test_horizon_is_lifted_by_offset() {
        let sky = Skybox::new();
        let horizon = sky.sky_color(Vec3::X);
        assert!(horizon.x > sky.bottom_color.x);
    }

    #[test]
    fn test_environment_faces_look_along_axes() {
        let camera = EnvironmentCamera::default();
        let faces = camera.face_view_projections();

        // A point along +X projects to the center of the first face
        let clip = faces[0] * Vec3::new(100.0, 0.0, 0.0).extend(1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
        assert!(clip.w > 0.0);
    }
}
