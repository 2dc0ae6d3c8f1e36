//! Orbit camera controls.
//!
//! The camera orbits a target on a sphere. Primary drag rotates, secondary
//! drag pans in screen space and the wheel dollies. Input only accumulates
//! deltas; [`OrbitControls::update`] applies them to the camera.

use std::f32::consts::PI;

use floorplan_renderer::Camera;
use glam::{Vec2, Vec3};

use crate::config::ControlsConfig;

/// Keeps the polar angle off the poles
const POLE_EPSILON: f32 = 1e-6;

/// Dolly factor per wheel step at zoom speed 1
const ZOOM_BASE: f32 = 0.95;

/// Pointer buttons the viewer distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlState {
    Idle,
    Rotate,
    Pan,
}

/// Spherical coordinates around the target (Y up)
#[derive(Debug, Clone, Copy)]
struct Spherical {
    radius: f32,
    /// Angle from +Y
    phi: f32,
    /// Angle around Y, measured from +Z
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius < f32::EPSILON {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

pub struct OrbitControls {
    /// Point the camera orbits and looks at
    pub target: Vec3,
    /// Whether pointer input is accepted
    pub enabled: bool,
    /// Whether the secondary button pans
    pub enable_pan: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,

    state: ControlState,
    last_pointer: Vec2,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl OrbitControls {
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            enable_pan: true,
            min_distance: config.min_distance,
            max_distance: config.max_distance.max(config.min_distance),
            min_polar_angle: 0.0,
            max_polar_angle: config.max_polar_angle.clamp(0.0, PI),
            rotate_speed: config.rotate_speed,
            pan_speed: config.pan_speed,
            zoom_speed: config.zoom_speed,
            state: ControlState::Idle,
            last_pointer: Vec2::ZERO,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Whether a rotate or pan gesture is in progress
    pub fn is_active(&self) -> bool {
        self.state != ControlState::Idle
    }

    pub fn pointer_down(&mut self, button: PointerButton, position: Vec2) {
        if !self.enabled {
            return;
        }
        self.state = match button {
            PointerButton::Primary => ControlState::Rotate,
            PointerButton::Secondary | PointerButton::Middle if self.enable_pan => ControlState::Pan,
            _ => ControlState::Idle,
        };
        self.last_pointer = position;
    }

    /// Accumulate a drag; `viewport_height` scales pixels to angles
    pub fn pointer_move(&mut self, position: Vec2, viewport_height: f32, camera: &Camera) {
        let delta = position - self.last_pointer;
        self.last_pointer = position;
        if !self.enabled || delta == Vec2::ZERO {
            return;
        }
        let height = viewport_height.max(1.0);

        match self.state {
            ControlState::Rotate => {
                self.theta_delta -= 2.0 * PI * delta.x / height * self.rotate_speed;
                self.phi_delta -= 2.0 * PI * delta.y / height * self.rotate_speed;
            }
            ControlState::Pan => self.pan(delta, height, camera),
            ControlState::Idle => {}
        }
    }

    pub fn pointer_up(&mut self) {
        self.state = ControlState::Idle;
    }

    /// Dolly by wheel steps; positive steps move closer
    pub fn scroll(&mut self, steps: f32) {
        if !self.enabled || steps == 0.0 {
            return;
        }
        self.scale *= ZOOM_BASE.powf(self.zoom_speed * steps);
    }

    /// Screen-space pan: the target follows the pointer in the view plane
    fn pan(&mut self, delta: Vec2, height: f32, camera: &Camera) {
        let offset = camera.position - self.target;
        let target_distance = offset.length() * (camera.fov.to_radians() * 0.5).tan();

        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        let scale = 2.0 * target_distance / height * self.pan_speed;
        self.pan_offset += -right * delta.x * scale + up * delta.y * scale;
    }

    /// Apply accumulated input and limits to the camera.
    ///
    /// Returns true when the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        spherical.theta += self.theta_delta;
        spherical.phi += self.phi_delta;
        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        let target = self.target + self.pan_offset;
        let position = target + spherical.to_offset();

        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;

        let changed = position.distance_squared(camera.position) > 1e-8
            || target.distance_squared(camera.target) > 1e-8;

        self.target = target;
        camera.position = position;
        camera.target = target;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn setup() -> (OrbitControls, Camera) {
        let mut camera = Camera::new(1.0);
        camera.position = Vec3::new(0.0, 0.0, 500.0);
        camera.target = Vec3::ZERO;
        (OrbitControls::new(&ControlsConfig::default()), camera)
    }

    #[test]
    fn test_update_without_input_is_stable() {
        let (mut controls, mut camera) = setup();
        controls.update(&mut camera);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn test_rotate_keeps_distance() {
        let (mut controls, mut camera) = setup();
        controls.pointer_down(PointerButton::Primary, Vec2::new(100.0, 100.0));
        controls.pointer_move(Vec2::new(150.0, 120.0), 600.0, &camera);
        assert!(controls.update(&mut camera));
        assert_relative_eq!(camera.position.length(), 500.0, epsilon = 1e-2);
    }

    #[test]
    fn test_distance_is_clamped() {
        let (mut controls, mut camera) = setup();
        controls.scroll(-200.0);
        controls.update(&mut camera);
        assert_relative_eq!(camera.position.length(), 2500.0, epsilon = 1e-2);

        controls.scroll(500.0);
        controls.update(&mut camera);
        assert_relative_eq!(camera.position.length(), 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_pan_moves_target_and_camera_together() {
        let (mut controls, mut camera) = setup();
        controls.pointer_down(PointerButton::Secondary, Vec2::ZERO);
        controls.pointer_move(Vec2::new(-40.0, 0.0), 600.0, &camera);
        controls.update(&mut camera);

        assert!(controls.target.x > 0.0);
        assert_relative_eq!(camera.position.x, controls.target.x, epsilon = 1e-3);
        assert_relative_eq!((camera.position - controls.target).length(), 500.0, epsilon = 1e-2);
    }

    #[test]
    fn test_pan_disabled_ignores_secondary() {
        let (mut controls, mut camera) = setup();
        controls.enable_pan = false;
        controls.pointer_down(PointerButton::Secondary, Vec2::ZERO);
        controls.pointer_move(Vec2::new(-40.0, 0.0), 600.0, &camera);
        assert!(!controls.update(&mut camera));
        assert!(!controls.is_active());
    }

    #[test]
    fn test_disabled_ignores_input() {
        let (mut controls, mut camera) = setup();
        controls.enabled = false;
        controls.pointer_down(PointerButton::Primary, Vec2::ZERO);
        controls.pointer_move(Vec2::new(80.0, 0.0), 600.0, &camera);
        controls.scroll(3.0);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn test_polar_angle_never_reaches_pole() {
        let (mut controls, mut camera) = setup();
        controls.pointer_down(PointerButton::Primary, Vec2::ZERO);
        controls.pointer_move(Vec2::new(0.0, 5000.0), 600.0, &camera);
        controls.update(&mut camera);

        let offset = camera.position - controls.target;
        assert!(offset.x.abs() + offset.z.abs() > 0.0);
        assert!(offset.y > 0.0);
    }
}
