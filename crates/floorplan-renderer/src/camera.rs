//! Perspective camera

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4Swizzles};

use crate::constants::camera as defaults;

/// Camera uniform buffer data sent to GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    /// Eye position (w unused)
    pub position: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            inv_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }
}

/// Y-up perspective camera looking at a target point
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a camera with the default lens at its initial position
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::from(defaults::INITIAL_POSITION),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: defaults::FOV_DEGREES,
            aspect: sanitize_aspect(aspect),
            near: defaults::NEAR,
            far: defaults::FAR,
        }
    }

    /// Update the aspect ratio (ignores non-finite or non-positive values)
    pub fn update_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    pub fn set_fov_degrees(&mut self, fov: f32) {
        self.fov = fov.clamp(1.0, 179.0);
    }

    pub fn set_near(&mut self, near: f32) {
        self.near = near.max(1e-3);
    }

    pub fn set_far(&mut self, far: f32) {
        self.far = far.max(self.near + 1.0);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from the eye toward the target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Get the uniform data for GPU
    pub fn uniform(&self) -> CameraUniform {
        let view_proj = self.view_projection();
        CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            position: self.position.extend(1.0).to_array(),
        }
    }

    /// Build a world-space ray through a viewport pixel.
    ///
    /// Returns (origin, normalized direction); the origin is the eye.
    pub fn screen_to_ray(&self, screen_x: f32, screen_y: f32, width: f32, height: f32) -> (Vec3, Vec3) {
        let ndc_x = (2.0 * screen_x / width.max(1.0)) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen_y / height.max(1.0));

        let inv = self.view_projection().inverse();
        let far = inv * glam::Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let far = far.xyz() / far.w;

        (self.position, (far - self.position).normalize_or_zero())
    }

    /// Project a world point to viewport pixels; None when behind the eye
    pub fn world_to_screen(&self, point: Vec3, width: f32, height: f32) -> Option<(f32, f32)> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        Some((
            (ndc.x + 1.0) * 0.5 * width,
            (1.0 - ndc.y) * 0.5 * height,
        ))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::new(16.0 / 9.0);
        let (origin, dir) = camera.screen_to_ray(800.0, 450.0, 1600.0, 900.0);

        assert_eq!(origin, camera.position);
        let expected = camera.forward();
        assert_relative_eq!(dir.dot(expected), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_world_to_screen_round_trip() {
        let camera = Camera::new(1.0);
        let point = Vec3::new(100.0, 0.0, 200.0);
        let (sx, sy) = camera.world_to_screen(point, 500.0, 500.0).unwrap();
        let (origin, dir) = camera.screen_to_ray(sx, sy, 500.0, 500.0);

        let to_point = (point - origin).normalize();
        assert_relative_eq!(dir.dot(to_point), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_invalid_aspect_is_ignored() {
        let mut camera = Camera::new(2.0);
        camera.update_aspect(f32::NAN);
        assert_eq!(camera.aspect, 1.0);
        camera.update_aspect(0.5);
        assert_eq!(camera.aspect, 0.5);
    }
}
