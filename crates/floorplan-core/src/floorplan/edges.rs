//! Wall edges: the two visible faces of every wall

use glam::{Vec2, Vec3};
use uuid::Uuid;

use super::{Floorplan, plan_to_scene};

/// Which face of the wall an edge belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeSide {
    /// Left of the start→end direction
    Front,
    /// Right of the start→end direction
    Back,
}

/// Identifies a wall edge across rebuilds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId {
    pub wall_id: Uuid,
    pub side: EdgeSide,
}

/// One face of a wall, offset half a thickness from the centre line.
///
/// `start`/`end` are ordered so the outward normal is the left
/// perpendicular of `end - start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallEdge {
    pub id: EdgeId,
    pub start: Vec2,
    pub end: Vec2,
    pub height: f32,
    pub thickness: f32,
}

impl WallEdge {
    pub fn wall_id(&self) -> Uuid {
        self.id.wall_id
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    /// Outward unit normal in plan space
    pub fn normal(&self) -> Vec2 {
        (self.end - self.start).perp().normalize_or_zero()
    }

    /// Outward unit normal in scene space
    pub fn scene_normal(&self) -> Vec3 {
        let n = self.normal();
        Vec3::new(n.x, 0.0, n.y)
    }

    /// The four corners of the face quad in scene space:
    /// bottom-start, bottom-end, top-end, top-start
    pub fn face_corners(&self) -> [Vec3; 4] {
        [
            plan_to_scene(self.start, 0.0),
            plan_to_scene(self.end, 0.0),
            plan_to_scene(self.end, self.height),
            plan_to_scene(self.start, self.height),
        ]
    }

    /// The strip of the wall top between this face and the centre line,
    /// in the same corner order as [`Self::face_corners`]
    pub fn top_corners(&self) -> [Vec3; 4] {
        let inset = -self.normal() * (self.thickness * 0.5);
        [
            plan_to_scene(self.start, self.height),
            plan_to_scene(self.end, self.height),
            plan_to_scene(self.end + inset, self.height),
            plan_to_scene(self.start + inset, self.height),
        ]
    }
}

impl Floorplan {
    /// Both faces of every wall whose corners still exist, in wall order
    pub fn wall_edges(&self) -> Vec<WallEdge> {
        let mut edges = Vec::with_capacity(self.walls.len() * 2);

        for wall in &self.walls {
            let Some((start, end)) = self.wall_endpoints(wall) else {
                tracing::debug!("Skipping wall {} with missing corners", wall.id);
                continue;
            };
            let dir = (end - start).normalize_or_zero();
            if dir == Vec2::ZERO {
                continue;
            }

            let offset = dir.perp() * (wall.thickness * 0.5);

            edges.push(WallEdge {
                id: EdgeId {
                    wall_id: wall.id,
                    side: EdgeSide::Front,
                },
                start: start + offset,
                end: end + offset,
                height: wall.height,
                thickness: wall.thickness,
            });
            // Reversed so its left perpendicular also points away from the wall
            edges.push(WallEdge {
                id: EdgeId {
                    wall_id: wall.id,
                    side: EdgeSide::Back,
                },
                start: end - offset,
                end: start - offset,
                height: wall.height,
                thickness: wall.thickness,
            });
        }

        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_each_wall_has_two_outward_faces() {
        let mut plan = Floorplan::new();
        let a = plan.add_corner(0.0, 0.0);
        let b = plan.add_corner(100.0, 0.0);
        plan.add_wall(a, b).unwrap();

        let edges = plan.wall_edges();
        assert_eq!(edges.len(), 2);

        let front = edges[0];
        let back = edges[1];
        assert_eq!(front.id.side, EdgeSide::Front);
        assert_relative_eq!(front.start.y, 5.0);
        assert_relative_eq!(back.start.y, -5.0);

        // Normals point away from the centre line
        assert_relative_eq!(front.normal().y, 1.0);
        assert_relative_eq!(back.normal().y, -1.0);
    }

    #[test]
    fn test_top_strip_reaches_centre_line() {
        let mut plan = Floorplan::new();
        let a = plan.add_corner(0.0, 0.0);
        let b = plan.add_corner(0.0, 200.0);
        plan.add_wall(a, b).unwrap();

        for edge in plan.wall_edges() {
            let top = edge.top_corners();
            assert_relative_eq!(top[2].x, 0.0, epsilon = 1e-4);
            assert_relative_eq!(top[3].x, 0.0, epsilon = 1e-4);
            assert_relative_eq!(top[0].y, edge.height);
        }
    }

    #[test]
    fn test_two_room_plan_edge_count() {
        let plan = crate::floorplan::tests::two_room_plan();
        assert_eq!(plan.wall_edges().len(), 14);
    }
}
