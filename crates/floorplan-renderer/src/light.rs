//! Scene lighting: hemisphere ambient plus one directional key light

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Light uniform buffer data sent to GPU (64 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightUniform {
    /// Direction toward the key light (xyz), w unused
    pub direction: [f32; 4],
    /// Key light color (RGB) and intensity (A)
    pub color_intensity: [f32; 4],
    /// Hemisphere sky color (RGB) and intensity (A)
    pub sky: [f32; 4],
    /// Hemisphere ground color (RGB), w unused
    pub ground: [f32; 4],
}

impl Default for LightUniform {
    fn default() -> Self {
        LightRig::default().uniform()
    }
}

/// Hemisphere light: sky color from above, ground color from below
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereLight {
    pub sky_color: Vec3,
    pub ground_color: Vec3,
    pub intensity: f32,
}

impl Default for HemisphereLight {
    fn default() -> Self {
        Self {
            sky_color: Vec3::ONE,
            ground_color: Vec3::splat(0x88 as f32 / 255.0),
            intensity: 1.1,
        }
    }
}

/// Directional light configuration
///
/// A directional light simulates a distant light source like the sun,
/// where all rays are parallel. The rig places it above the floorplan so
/// walls get some shading.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    /// Light position; the direction is taken from position toward target
    pub position: Vec3,
    pub target: Vec3,
    /// Light color (RGB, 0.0-1.0)
    pub color: Vec3,
    /// Light intensity multiplier
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 500.0, 0.0),
            target: Vec3::ZERO,
            color: Vec3::ONE,
            intensity: 0.5,
        }
    }
}

impl DirectionalLight {
    /// Normalized direction pointing toward the light source
    pub fn direction(&self) -> Vec3 {
        let dir = self.position - self.target;
        if dir.length_squared() < 1e-6 {
            Vec3::Y
        } else {
            dir.normalize()
        }
    }
}

/// The fixed lighting rig of the viewer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightRig {
    pub hemisphere: HemisphereLight,
    pub directional: DirectionalLight,
}

impl LightRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the key light for a floorplan with the given bounds.
    ///
    /// `center` and `size` are the floorplan bounding box in scene space.
    pub fn fit_to_floorplan(&mut self, center: Vec3, size: Vec3) {
        let height = 300.0 + 2.0 * size.x.max(size.z);
        self.directional.target = center;
        self.directional.position = center + Vec3::new(-size.x * 0.5, height, size.z * 0.5);
        tracing::debug!(
            "Light rig fitted: target={:?} position={:?}",
            self.directional.target,
            self.directional.position
        );
    }

    /// Get the uniform data for GPU
    pub fn uniform(&self) -> LightUniform {
        let d = self.directional.direction();
        let c = self.directional.color;
        let h = &self.hemisphere;
        LightUniform {
            direction: [d.x, d.y, d.z, 0.0],
            color_intensity: [c.x, c.y, c.z, self.directional.intensity],
            sky: [h.sky_color.x, h.sky_color.y, h.sky_color.z, h.intensity],
            ground: [h.ground_color.x, h.ground_color.y, h.ground_color.z, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_targets_plan_center() {
        let mut rig = LightRig::new();
        let center = Vec3::new(400.0, 0.0, 150.0);
        rig.fit_to_floorplan(center, Vec3::new(800.0, 0.0, 300.0));

        assert_eq!(rig.directional.target, center);
        assert!(rig.directional.position.y > center.y);
        assert!(rig.directional.direction().y > 0.0);
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 64);
        let uniform = LightRig::new().uniform();
        assert_relative_eq!(uniform.sky[3], 1.1);
        assert_relative_eq!(uniform.direction[1], 1.0);
    }
}
