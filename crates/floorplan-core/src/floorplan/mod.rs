//! Floorplan: corners, walls, rooms and derived 3D geometry

mod edges;
mod planes;

pub use edges::*;
pub use planes::*;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::{EventQueue, FloorplanEvent};
use crate::geometry;

/// Default wall thickness in centimetres
pub const DEFAULT_WALL_THICKNESS: f32 = 10.0;
/// Default wall height in centimetres
pub const DEFAULT_WALL_HEIGHT: f32 = 250.0;

/// A wall endpoint in plan coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
}

impl Corner {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A straight wall between two corners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: Uuid,
    pub start: Uuid,
    pub end: Uuid,
    pub thickness: f32,
    pub height: f32,
}

/// A closed loop of corners enclosing a floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: Option<String>,
    pub corners: Vec<Uuid>,
}

/// Axis-aligned bounds of the floorplan in scene space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub min: Vec3,
    pub max: Vec3,
}

impl Dimensions {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Floorplan errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FloorplanError {
    #[error("Corner not found: {0}")]
    CornerNotFound(Uuid),
    #[error("Wall not found: {0}")]
    WallNotFound(Uuid),
    #[error("Room not found: {0}")]
    RoomNotFound(Uuid),
    #[error("Wall endpoints must be distinct corners")]
    DegenerateWall,
    #[error("A room needs at least 3 corners, got {0}")]
    TooFewCorners(usize),
}

/// The 2D floorplan the viewer derives walls and floors from.
///
/// Topology changes (walls or rooms added, removed or replaced) queue a
/// [`FloorplanEvent::NewRoomsAdded`]; corner moves do not.
#[derive(Debug, Clone, Default)]
pub struct Floorplan {
    corners: Vec<Corner>,
    walls: Vec<Wall>,
    rooms: Vec<Room>,
    events: EventQueue<FloorplanEvent>,
}

impl Floorplan {
    /// Create an empty floorplan
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Corners ==========

    /// Add a corner and return its ID
    pub fn add_corner(&mut self, x: f32, y: f32) -> Uuid {
        let corner = Corner::new(x, y);
        let id = corner.id;
        self.corners.push(corner);
        id
    }

    /// Move a corner to a new plan position
    pub fn move_corner(&mut self, id: Uuid, x: f32, y: f32) -> Result<(), FloorplanError> {
        let corner = self
            .corners
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(FloorplanError::CornerNotFound(id))?;
        corner.x = x;
        corner.y = y;
        Ok(())
    }

    pub fn corner(&self, id: Uuid) -> Option<&Corner> {
        self.corners.iter().find(|c| c.id == id)
    }

    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    // ========== Walls ==========

    /// Add a wall between two existing corners with default thickness and height
    pub fn add_wall(&mut self, start: Uuid, end: Uuid) -> Result<Uuid, FloorplanError> {
        self.add_wall_with(start, end, DEFAULT_WALL_THICKNESS, DEFAULT_WALL_HEIGHT)
    }

    /// Add a wall between two existing corners
    pub fn add_wall_with(
        &mut self,
        start: Uuid,
        end: Uuid,
        thickness: f32,
        height: f32,
    ) -> Result<Uuid, FloorplanError> {
        if start == end {
            return Err(FloorplanError::DegenerateWall);
        }
        for id in [start, end] {
            if self.corner(id).is_none() {
                return Err(FloorplanError::CornerNotFound(id));
            }
        }

        let wall = Wall {
            id: Uuid::new_v4(),
            start,
            end,
            thickness,
            height,
        };
        let id = wall.id;
        self.walls.push(wall);
        self.events.push_coalesced(FloorplanEvent::NewRoomsAdded);
        Ok(id)
    }

    /// Remove a wall
    pub fn remove_wall(&mut self, id: Uuid) -> Result<Wall, FloorplanError> {
        let pos = self
            .walls
            .iter()
            .position(|w| w.id == id)
            .ok_or(FloorplanError::WallNotFound(id))?;
        let wall = self.walls.remove(pos);
        self.events.push_coalesced(FloorplanEvent::NewRoomsAdded);
        Ok(wall)
    }

    pub fn wall(&self, id: Uuid) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Plan-space endpoints of a wall's centre line
    pub fn wall_endpoints(&self, wall: &Wall) -> Option<(Vec2, Vec2)> {
        let start = self.corner(wall.start)?.position();
        let end = self.corner(wall.end)?.position();
        Some((start, end))
    }

    // ========== Rooms ==========

    /// Add a room enclosed by the given corner loop
    pub fn add_room(
        &mut self,
        name: Option<String>,
        corners: Vec<Uuid>,
    ) -> Result<Uuid, FloorplanError> {
        if corners.len() < 3 {
            return Err(FloorplanError::TooFewCorners(corners.len()));
        }
        if let Some(missing) = corners.iter().find(|id| self.corner(**id).is_none()) {
            return Err(FloorplanError::CornerNotFound(*missing));
        }

        let room = Room {
            id: Uuid::new_v4(),
            name,
            corners,
        };
        let id = room.id;
        self.rooms.push(room);
        self.events.push_coalesced(FloorplanEvent::NewRoomsAdded);
        Ok(id)
    }

    /// Remove a room
    pub fn remove_room(&mut self, id: Uuid) -> Result<Room, FloorplanError> {
        let pos = self
            .rooms
            .iter()
            .position(|r| r.id == id)
            .ok_or(FloorplanError::RoomNotFound(id))?;
        let room = self.rooms.remove(pos);
        self.events.push_coalesced(FloorplanEvent::NewRoomsAdded);
        Ok(room)
    }

    pub fn room(&self, id: Uuid) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Plan-space polygon of a room (corners that no longer exist are skipped)
    pub fn room_polygon(&self, room: &Room) -> Vec<Vec2> {
        room.corners
            .iter()
            .filter_map(|id| self.corner(*id))
            .map(Corner::position)
            .collect()
    }

    /// Floor area of a room in square centimetres
    pub fn room_area(&self, room: &Room) -> f32 {
        geometry::signed_area(&self.room_polygon(room)).abs()
    }

    // ========== Bulk operations ==========

    /// Replace the whole topology at once
    pub fn replace(&mut self, corners: Vec<Corner>, walls: Vec<Wall>, rooms: Vec<Room>) {
        self.corners = corners;
        self.walls = walls;
        self.rooms = rooms;
        self.events.push_coalesced(FloorplanEvent::NewRoomsAdded);
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.replace(Vec::new(), Vec::new(), Vec::new());
    }

    /// Bounding box of all corners in scene space (plan y maps to scene z).
    ///
    /// An empty plan reports zero-sized bounds at the origin.
    pub fn dimensions(&self) -> Dimensions {
        if self.corners.is_empty() {
            return Dimensions {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            };
        }

        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for c in &self.corners {
            min = min.min(c.position());
            max = max.max(c.position());
        }

        Dimensions {
            min: Vec3::new(min.x, 0.0, min.y),
            max: Vec3::new(max.x, 0.0, max.y),
        }
    }

    // ========== Events ==========

    /// Take all pending topology events
    pub fn drain_events(&mut self) -> Vec<FloorplanEvent> {
        self.events.drain()
    }

    /// Check if topology events are waiting to be consumed
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Map a plan point to scene space at the given elevation
pub fn plan_to_scene(p: Vec2, elevation: f32) -> Vec3 {
    Vec3::new(p.x, elevation, p.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two rooms sharing the middle wall: 6 corners, 7 walls
    pub(crate) fn two_room_plan() -> Floorplan {
        let mut plan = Floorplan::new();
        let a = plan.add_corner(0.0, 0.0);
        let b = plan.add_corner(400.0, 0.0);
        let c = plan.add_corner(800.0, 0.0);
        let d = plan.add_corner(800.0, 300.0);
        let e = plan.add_corner(400.0, 300.0);
        let f = plan.add_corner(0.0, 300.0);
        for (s, t) in [(a, b), (b, c), (c, d), (d, e), (e, f), (f, a), (b, e)] {
            plan.add_wall(s, t).unwrap();
        }
        plan.add_room(Some("Living".into()), vec![a, b, e, f]).unwrap();
        plan.add_room(Some("Kitchen".into()), vec![b, c, d, e]).unwrap();
        plan
    }

    #[test]
    fn test_topology_edits_coalesce_events() {
        let mut plan = two_room_plan();
        assert_eq!(plan.drain_events(), vec![FloorplanEvent::NewRoomsAdded]);
        assert!(!plan.has_pending_events());

        let corner = plan.corners()[0].id;
        plan.move_corner(corner, -10.0, 0.0).unwrap();
        assert!(!plan.has_pending_events());
    }

    #[test]
    fn test_dimensions_map_plan_y_to_scene_z() {
        let plan = two_room_plan();
        let dims = plan.dimensions();
        assert_eq!(dims.min, Vec3::ZERO);
        assert_eq!(dims.max, Vec3::new(800.0, 0.0, 300.0));
        assert_eq!(dims.center(), Vec3::new(400.0, 0.0, 150.0));
    }

    #[test]
    fn test_empty_dimensions() {
        let dims = Floorplan::new().dimensions();
        assert_eq!(dims.center(), Vec3::ZERO);
        assert_eq!(dims.size(), Vec3::ZERO);
    }

    #[test]
    fn test_room_validation() {
        let mut plan = Floorplan::new();
        let a = plan.add_corner(0.0, 0.0);
        let b = plan.add_corner(1.0, 0.0);
        assert_eq!(
            plan.add_room(None, vec![a, b]),
            Err(FloorplanError::TooFewCorners(2))
        );

        let ghost = Uuid::new_v4();
        assert_eq!(
            plan.add_room(None, vec![a, b, ghost]),
            Err(FloorplanError::CornerNotFound(ghost))
        );
        assert_eq!(plan.add_wall(a, a), Err(FloorplanError::DegenerateWall));
    }

    #[test]
    fn test_room_area() {
        let plan = two_room_plan();
        let living = &plan.rooms()[0];
        assert_eq!(plan.room_area(living), 400.0 * 300.0);
    }
}
