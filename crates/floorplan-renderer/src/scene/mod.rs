//! Scene management for renderable objects.
//!
//! This module separates scene data management from rendering logic: the
//! viewer mutates the scene, backends only read it.

mod bounds;
mod render_object;

pub use bounds::*;
pub use render_object::*;

use std::collections::HashMap;
use uuid::Uuid;

/// Scene containing all renderable objects.
///
/// Objects are owned by the scene; the wrappers that created them hold only
/// their IDs and must remove them on disposal.
pub struct Scene {
    objects: HashMap<Uuid, RenderObject>,
}

impl Scene {
    /// Creates a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
        }
    }

    /// Adds an object to the scene.
    pub fn add_object(&mut self, object: RenderObject) -> Uuid {
        let id = object.id;
        self.objects.insert(id, object);
        id
    }

    /// Gets an object by ID.
    pub fn get_object(&self, id: Uuid) -> Option<&RenderObject> {
        self.objects.get(&id)
    }

    /// Gets a mutable reference to an object by ID.
    pub fn get_object_mut(&mut self, id: Uuid) -> Option<&mut RenderObject> {
        self.objects.get_mut(&id)
    }

    /// Removes an object from the scene.
    pub fn remove_object(&mut self, id: Uuid) -> Option<RenderObject> {
        self.objects.remove(&id)
    }

    /// Returns true if the scene contains an object with the given ID.
    pub fn contains(&self, id: Uuid) -> bool {
        self.objects.contains_key(&id)
    }

    /// Returns the number of objects in the scene.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns an iterator over all objects.
    pub fn objects(&self) -> impl Iterator<Item = &RenderObject> {
        self.objects.values()
    }

    /// Number of objects of the given kind.
    pub fn count_kind(&self, kind: ObjectKind) -> usize {
        self.objects.values().filter(|o| o.kind == kind).count()
    }

    /// Visible objects in a stable order (kind, then name, then ID).
    pub fn visible_sorted(&self) -> Vec<&RenderObject> {
        let mut objects: Vec<&RenderObject> = self.objects.values().filter(|o| o.visible).collect();
        objects.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        objects
    }

    /// Computes the bounding box of all visible objects.
    pub fn compute_bounds(&self) -> Option<BoundingBox> {
        let mut result: Option<BoundingBox> = None;

        for obj in self.objects.values() {
            if !obj.visible {
                continue;
            }

            let transformed_bounds = obj.world_bounds();

            result = Some(match result {
                Some(current) => current.union(&transformed_bounds),
                None => transformed_bounds,
            });
        }

        result
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::MeshHandle;
    use glam::{Mat4, Vec3};

    fn unit_object(kind: ObjectKind, name: &str) -> RenderObject {
        RenderObject::new(
            Uuid::new_v4(),
            MeshHandle::from_raw(1),
            BoundingBox::new(Vec3::ZERO, Vec3::ONE),
        )
        .with_kind(kind)
        .with_name(name)
    }

    #[test]
    fn test_compute_bounds_skips_hidden() {
        let mut scene = Scene::new();
        scene.add_object(
            unit_object(ObjectKind::Item, "a")
                .with_transform(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0))),
        );
        scene.add_object(
            unit_object(ObjectKind::Item, "b")
                .with_transform(Mat4::from_translation(Vec3::new(100.0, 0.0, 0.0)))
                .with_visible(false),
        );

        let bounds = scene.compute_bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_visible_sorted_groups_by_kind() {
        let mut scene = Scene::new();
        scene.add_object(unit_object(ObjectKind::Item, "chair"));
        scene.add_object(unit_object(ObjectKind::Floor, "room"));
        scene.add_object(unit_object(ObjectKind::Wall, "wall"));

        let kinds: Vec<ObjectKind> = scene.visible_sorted().iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![ObjectKind::Floor, ObjectKind::Wall, ObjectKind::Item]);
        assert_eq!(scene.count_kind(ObjectKind::Wall), 1);
    }
}
