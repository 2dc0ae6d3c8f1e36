//! Render object definition.

use glam::Mat4;
use uuid::Uuid;

use super::BoundingBox;
use crate::resources::MeshHandle;

/// A renderable object in the scene.
///
/// RenderObject contains all the data needed to render an object,
/// separated from the mesh data which lives in the MeshStore.
#[derive(Debug, Clone)]
pub struct RenderObject {
    /// Unique identifier for this object.
    pub id: Uuid,

    /// Display name (exported as the glTF node name).
    pub name: String,

    /// Handle to the mesh data stored in MeshStore.
    pub mesh: MeshHandle,

    /// World transform matrix.
    pub transform: Mat4,

    /// Base color (RGBA).
    pub color: [f32; 4],

    /// Whether this object is visible.
    pub visible: bool,

    /// Whether this object is drawn highlighted.
    pub selected: bool,

    /// Local bounding box (before transform).
    pub bounds: BoundingBox,

    /// What part of the floorplan this object shows.
    pub kind: ObjectKind,
}

impl RenderObject {
    /// Creates a new render object with default settings.
    pub fn new(id: Uuid, mesh: MeshHandle, bounds: BoundingBox) -> Self {
        Self {
            id,
            name: String::new(),
            mesh,
            transform: Mat4::IDENTITY,
            color: [0.8, 0.8, 0.8, 1.0],
            visible: true,
            selected: false,
            bounds,
            kind: ObjectKind::Item,
        }
    }

    /// Sets the transform matrix.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the color.
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Sets the visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets the object kind.
    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the world-space bounding box.
    pub fn world_bounds(&self) -> BoundingBox {
        self.bounds.transform(&self.transform)
    }
}

/// Category of a render object.
///
/// The ordering is also the draw and export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ObjectKind {
    /// Room floor.
    Floor,
    /// One face of a wall.
    Wall,
    /// Placed furniture.
    #[default]
    Item,
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Floor => "Floor",
            ObjectKind::Wall => "Wall",
            ObjectKind::Item => "Item",
        }
    }
}
