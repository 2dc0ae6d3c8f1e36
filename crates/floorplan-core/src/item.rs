//! Placed furniture items

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mesh::ItemMesh;

/// Default item size in centimetres (width, height, depth)
pub const DEFAULT_ITEM_DIMENSIONS: Vec3 = Vec3::new(60.0, 80.0, 60.0);

/// A furniture item placed in the model.
///
/// `position` is the centre of the item's footprint at its base elevation,
/// in scene space (Y up, centimetres).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub position: Vec3,
    /// Rotation about the vertical axis, in radians
    pub rotation: f32,
    /// Bounding size (width along X, height along Y, depth along Z)
    pub dimensions: Vec3,
    /// Fixed items (built-ins, doors) are not draggable by default
    pub fixed: bool,
    /// Material color (RGBA)
    pub color: [f32; 4],
    /// Source mesh path, reloaded on demand
    pub mesh_path: Option<String>,
    /// Loaded mesh; a box of `dimensions` is used when absent
    #[serde(skip)]
    pub mesh: Option<ItemMesh>,
}

impl Item {
    /// Create a new box item with default dimensions at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position: Vec3::ZERO,
            rotation: 0.0,
            dimensions: DEFAULT_ITEM_DIMENSIONS,
            fixed: false,
            color: [0.75, 0.72, 0.68, 1.0],
            mesh_path: None,
            mesh: None,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_dimensions(mut self, dimensions: Vec3) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_mesh(mut self, mesh: ItemMesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Mark the item as fixed
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// World transform (translation then rotation about Y)
    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_y(self.rotation), self.position)
    }

    /// Half extents of the footprint (x, z)
    pub fn half_extents(&self) -> Vec3 {
        self.dimensions * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_applies_rotation_then_translation() {
        let item = Item::new("chair")
            .with_position(Vec3::new(100.0, 0.0, 50.0))
            .with_rotation(std::f32::consts::FRAC_PI_2);

        let p = item.transform().transform_point3(Vec3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 100.0, epsilon = 1e-3);
        assert_relative_eq!(p.z, 40.0, epsilon = 1e-3);
    }

    #[test]
    fn test_builder_defaults() {
        let item = Item::new("cabinet").fixed();
        assert!(item.fixed);
        assert!(item.mesh.is_none());
        assert_eq!(item.dimensions, DEFAULT_ITEM_DIMENSIONS);
    }
}
