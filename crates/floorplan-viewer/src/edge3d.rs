//! 3D face of one wall edge

use floorplan_core::{EdgeId, WallEdge};
use floorplan_renderer::resources::flat_triangles;
use floorplan_renderer::{MeshHandle, MeshStore, ObjectKind, RenderObject, Scene};
use uuid::Uuid;

pub const WALL_COLOR: [f32; 4] = [0.95, 0.95, 0.93, 1.0];

/// The visible face of one side of a wall plus its half of the wall top
#[derive(Debug)]
pub struct Edge3d {
    edge_id: EdgeId,
    object_id: Uuid,
    mesh: MeshHandle,
}

impl Edge3d {
    pub fn new(edge: &WallEdge, scene: &mut Scene, meshes: &mut MeshStore) -> Self {
        let [a, b, c, d] = edge.face_corners();
        let [e, f, g, h] = edge.top_corners();
        let data = flat_triangles(&[[a, b, c], [a, c, d], [e, f, g], [e, g, h]]);

        let bounds = data.bounds;
        let mesh = meshes.insert(data);
        let object_id = scene.add_object(
            RenderObject::new(Uuid::new_v4(), mesh, bounds)
                .with_kind(ObjectKind::Wall)
                .with_name("Wall")
                .with_color(WALL_COLOR),
        );

        Self {
            edge_id: edge.id,
            object_id,
            mesh,
        }
    }

    pub fn edge_id(&self) -> EdgeId {
        self.edge_id
    }

    pub fn wall_id(&self) -> Uuid {
        self.edge_id.wall_id
    }

    pub fn object_id(&self) -> Uuid {
        self.object_id
    }

    pub fn dispose(self, scene: &mut Scene, meshes: &mut MeshStore) {
        scene.remove_object(self.object_id);
        meshes.remove(self.mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::EdgeSide;
    use glam::Vec2;

    fn edge() -> WallEdge {
        WallEdge {
            id: EdgeId {
                wall_id: Uuid::new_v4(),
                side: EdgeSide::Front,
            },
            start: Vec2::new(0.0, 0.0),
            end: Vec2::new(300.0, 0.0),
            height: 250.0,
            thickness: 10.0,
        }
    }

    #[test]
    fn test_face_points_outward_and_top_points_up() {
        let edge = edge();
        let mut scene = Scene::new();
        let mut meshes = MeshStore::new();
        let wall = Edge3d::new(&edge, &mut scene, &mut meshes);

        let object = scene.get_object(wall.object_id()).unwrap();
        let data = meshes.get(object.mesh).unwrap();
        assert_eq!(data.triangle_count(), 4);

        let outward = edge.scene_normal();
        let face_normal = glam::Vec3::from(data.vertices[0].normal);
        assert!(face_normal.dot(outward) > 0.99);
        let top_normal = glam::Vec3::from(data.vertices[6].normal);
        assert!(top_normal.y > 0.99);
        assert_eq!(data.bounds.size().y, 250.0);
    }

    #[test]
    fn test_dispose_releases_everything() {
        let mut scene = Scene::new();
        let mut meshes = MeshStore::new();
        let wall = Edge3d::new(&edge(), &mut scene, &mut meshes);
        assert_eq!(wall.wall_id(), wall.edge_id().wall_id);

        wall.dispose(&mut scene, &mut meshes);
        assert!(scene.is_empty());
        assert!(meshes.is_empty());
    }
}
