//! 3D floor of one room

use floorplan_core::geometry::triangulate_polygon;
use floorplan_core::plan_to_scene;
use floorplan_renderer::resources::flat_triangles;
use floorplan_renderer::{MeshHandle, MeshStore, ObjectKind, RenderObject, Scene};
use glam::{Vec2, Vec3};
use uuid::Uuid;

pub const FLOOR_COLOR: [f32; 4] = [0.86, 0.82, 0.76, 1.0];

/// Upward-facing floor polygon of a room at y = 0
#[derive(Debug)]
pub struct Floor3d {
    room_id: Uuid,
    object_id: Uuid,
    mesh: MeshHandle,
}

impl Floor3d {
    /// Build the floor from the room's corner loop in plan space
    pub fn new(
        room_id: Uuid,
        name: Option<&str>,
        polygon: &[Vec2],
        scene: &mut Scene,
        meshes: &mut MeshStore,
    ) -> Self {
        let data = flat_triangles(&floor_triangles(polygon));
        if data.indices.is_empty() {
            tracing::debug!("Room {} has a degenerate polygon, floor is empty", room_id);
        }
        let bounds = data.bounds;
        let mesh = meshes.insert(data);

        let object_id = scene.add_object(
            RenderObject::new(Uuid::new_v4(), mesh, bounds)
                .with_kind(ObjectKind::Floor)
                .with_name(name.unwrap_or("Floor").to_string())
                .with_color(FLOOR_COLOR),
        );

        Self {
            room_id,
            object_id,
            mesh,
        }
    }

    pub fn room_id(&self) -> Uuid {
        self.room_id
    }

    pub fn object_id(&self) -> Uuid {
        self.object_id
    }

    pub fn mesh_handle(&self) -> MeshHandle {
        self.mesh
    }

    pub fn dispose(self, scene: &mut Scene, meshes: &mut MeshStore) {
        scene.remove_object(self.object_id);
        meshes.remove(self.mesh);
    }
}

/// Scene triangles of the polygon facing +Y.
///
/// Counter-clockwise plan triangles face down once plan y becomes scene z,
/// so every triangle is flipped.
fn floor_triangles(polygon: &[Vec2]) -> Vec<[Vec3; 3]> {
    triangulate_polygon(polygon)
        .into_iter()
        .map(|[i, j, k]| {
            [
                plan_to_scene(polygon[i as usize], 0.0),
                plan_to_scene(polygon[k as usize], 0.0),
                plan_to_scene(polygon[j as usize], 0.0),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(400.0, 0.0),
            Vec2::new(400.0, 300.0),
            Vec2::new(0.0, 300.0),
        ]
    }

    #[test]
    fn test_floor_faces_up_for_either_winding() {
        let mut reversed = square();
        reversed.reverse();

        for polygon in [square(), reversed] {
            let mut scene = Scene::new();
            let mut meshes = MeshStore::new();
            let floor = Floor3d::new(Uuid::new_v4(), Some("Hall"), &polygon, &mut scene, &mut meshes);

            let data = meshes.get(floor.mesh_handle()).unwrap();
            assert_eq!(data.triangle_count(), 2);
            assert!(data.vertices.iter().all(|v| v.normal[1] > 0.99));
            assert_eq!(data.bounds.max, Vec3::new(400.0, 0.0, 300.0));
        }
    }

    #[test]
    fn test_degenerate_room_still_owns_an_object() {
        let mut scene = Scene::new();
        let mut meshes = MeshStore::new();
        let polygon = [Vec2::ZERO, Vec2::X, Vec2::X * 2.0];
        let floor = Floor3d::new(Uuid::new_v4(), None, &polygon, &mut scene, &mut meshes);

        assert_eq!(scene.count_kind(ObjectKind::Floor), 1);
        floor.dispose(&mut scene, &mut meshes);
        assert!(scene.is_empty());
        assert!(meshes.is_empty());
    }
}
