//! Hit-test geometry for walls and floors

use glam::Vec3;
use uuid::Uuid;

use super::{EdgeId, Floorplan, plan_to_scene};
use crate::geometry::triangulate_polygon;

/// What an intersection plane stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneTarget {
    Wall(EdgeId),
    Floor(Uuid),
}

/// Triangulated surface used for pointer hit-testing
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionPlane {
    pub target: PlaneTarget,
    pub triangles: Vec<[Vec3; 3]>,
}

impl Floorplan {
    /// One vertical quad per wall edge
    pub fn wall_planes_for_intersection(&self) -> Vec<IntersectionPlane> {
        self.wall_edges()
            .into_iter()
            .map(|edge| {
                let [a, b, c, d] = edge.face_corners();
                IntersectionPlane {
                    target: PlaneTarget::Wall(edge.id),
                    triangles: vec![[a, b, c], [a, c, d]],
                }
            })
            .collect()
    }

    /// One triangulated polygon per room at floor level
    pub fn floor_planes_for_intersection(&self) -> Vec<IntersectionPlane> {
        self.rooms
            .iter()
            .map(|room| {
                let polygon = self.room_polygon(room);
                let triangles = triangulate_polygon(&polygon)
                    .into_iter()
                    .map(|[i, j, k]| {
                        [
                            plan_to_scene(polygon[i as usize], 0.0),
                            plan_to_scene(polygon[j as usize], 0.0),
                            plan_to_scene(polygon[k as usize], 0.0),
                        ]
                    })
                    .collect();
                IntersectionPlane {
                    target: PlaneTarget::Floor(room.id),
                    triangles,
                }
            })
            .collect()
    }
}
