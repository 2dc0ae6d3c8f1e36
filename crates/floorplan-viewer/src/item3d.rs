//! 3D wrapper of one placed item

use floorplan_core::{Item, ItemMesh};
use floorplan_renderer::resources::{cuboid, flat_indexed};
use floorplan_renderer::{MeshData, MeshHandle, MeshStore, ObjectKind, RenderObject, Scene};
use glam::Vec3;
use uuid::Uuid;

/// An item shown in the scene.
///
/// Owns one mesh in the [`MeshStore`] and one object in the [`Scene`];
/// both are released by [`PhysicalItem::dispose`].
#[derive(Debug)]
pub struct PhysicalItem {
    item: Item,
    object_id: Uuid,
    mesh: MeshHandle,
    selected: bool,
}

impl PhysicalItem {
    pub fn new(item: &Item, scene: &mut Scene, meshes: &mut MeshStore) -> Self {
        let data = item_mesh_data(item);
        let bounds = data.bounds;
        let mesh = meshes.insert(data);

        let object_id = scene.add_object(
            RenderObject::new(Uuid::new_v4(), mesh, bounds)
                .with_kind(ObjectKind::Item)
                .with_name(item.name.clone())
                .with_color(item.color)
                .with_transform(item.transform()),
        );

        // The scene mesh is built; the snapshot does not need the source mesh
        let mut snapshot = item.clone();
        snapshot.mesh = None;

        Self {
            item: snapshot,
            object_id,
            mesh,
            selected: false,
        }
    }

    pub fn item_id(&self) -> Uuid {
        self.item.id
    }

    /// The item as of the last update through this wrapper
    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn object_id(&self) -> Uuid {
        self.object_id
    }

    pub fn mesh_handle(&self) -> MeshHandle {
        self.mesh
    }

    pub fn position(&self) -> Vec3 {
        self.item.position
    }

    pub fn is_fixed(&self) -> bool {
        self.item.fixed
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Toggle the highlight
    pub fn set_selected(&mut self, selected: bool, scene: &mut Scene) {
        self.selected = selected;
        if let Some(object) = scene.get_object_mut(self.object_id) {
            object.selected = selected;
        }
    }

    pub fn set_position(&mut self, position: Vec3, scene: &mut Scene) {
        self.item.position = position;
        if let Some(object) = scene.get_object_mut(self.object_id) {
            object.transform = self.item.transform();
        }
    }

    /// Remove the scene object and release the mesh
    pub fn dispose(self, scene: &mut Scene, meshes: &mut MeshStore) {
        scene.remove_object(self.object_id);
        meshes.remove(self.mesh);
    }
}

/// Local mesh of an item: its loaded mesh fitted to the item dimensions,
/// or a box of those dimensions.
///
/// The footprint is centred on the origin and the base sits at y = 0.
fn item_mesh_data(item: &Item) -> MeshData {
    let half = item.half_extents();
    let fallback = || cuboid(Vec3::new(-half.x, 0.0, -half.z), Vec3::new(half.x, item.dimensions.y, half.z));

    let Some(source) = item.mesh.as_ref().filter(|m| m.triangle_count() > 0) else {
        return fallback();
    };

    let data = flat_indexed(&fit_to_dimensions(source, item.dimensions), &source.indices);
    if data.indices.is_empty() {
        tracing::debug!("Item '{}' mesh has no usable triangles, using a box", item.name);
        return fallback();
    }
    data
}

fn fit_to_dimensions(mesh: &ItemMesh, dimensions: Vec3) -> Vec<[f32; 3]> {
    let (min, max) = mesh.bounds();
    let size = max - min;
    let scale = Vec3::select(size.cmpgt(Vec3::splat(1e-6)), dimensions / size, Vec3::ONE);
    let anchor = Vec3::new((min.x + max.x) * 0.5, min.y, (min.z + max.z) * 0.5);

    mesh.vertices
        .iter()
        .map(|v| ((Vec3::from(*v) - anchor) * scale).to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_tetra() -> ItemMesh {
        ItemMesh {
            vertices: vec![[1.0, 1.0, 1.0], [2.0, 1.0, 1.0], [1.0, 3.0, 1.0], [1.0, 1.0, 5.0]],
            indices: vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
        }
    }

    #[test]
    fn test_box_fallback_matches_dimensions() {
        let item = Item::new("crate").with_dimensions(Vec3::new(100.0, 40.0, 60.0));
        let data = item_mesh_data(&item);
        assert_eq!(data.triangle_count(), 12);
        assert_eq!(data.bounds.min, Vec3::new(-50.0, 0.0, -30.0));
        assert_eq!(data.bounds.max, Vec3::new(50.0, 40.0, 30.0));
    }

    #[test]
    fn test_loaded_mesh_is_fitted() {
        let item = Item::new("lamp")
            .with_dimensions(Vec3::new(20.0, 150.0, 20.0))
            .with_mesh(unit_tetra());
        let data = item_mesh_data(&item);
        assert_eq!(data.triangle_count(), 4);
        assert_relative_eq!(data.bounds.min.y, 0.0);
        assert_relative_eq!(data.bounds.max.y, 150.0, epsilon = 1e-3);
        assert_relative_eq!(data.bounds.size().x, 20.0, epsilon = 1e-3);
        assert_relative_eq!(data.bounds.center().z, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_wrapper_owns_one_object_and_mesh() {
        let mut scene = Scene::new();
        let mut meshes = MeshStore::new();
        let item = Item::new("sofa").with_position(Vec3::new(100.0, 0.0, 200.0));

        let mut wrapper = PhysicalItem::new(&item, &mut scene, &mut meshes);
        assert_eq!(wrapper.item_id(), item.id);
        assert_eq!(scene.len(), 1);
        assert_eq!(meshes.len(), 1);

        wrapper.set_selected(true, &mut scene);
        assert!(scene.get_object(wrapper.object_id()).unwrap().selected);

        wrapper.set_position(Vec3::new(0.0, 0.0, 50.0), &mut scene);
        let object = scene.get_object(wrapper.object_id()).unwrap();
        assert_eq!(object.transform.w_axis.truncate(), Vec3::new(0.0, 0.0, 50.0));

        wrapper.dispose(&mut scene, &mut meshes);
        assert!(scene.is_empty());
        assert!(meshes.is_empty());
    }
}
