//! Drag and selection of items, clicks on walls and floors.
//!
//! Pointer events come in viewport pixels. Items are tested first; when no
//! item is under the pointer, walls and floors compete by distance. A press
//! on an item selects it at once and may start a drag on the horizontal
//! plane through the item's base. Clicks on walls, floors or empty space are
//! recognized on release, and only when the pointer stayed put.

use floorplan_core::{EdgeId, IntersectionPlane, PlaneTarget};
use floorplan_renderer::{Camera, MeshStore, ObjectKind, Scene};
use glam::{Vec2, Vec3};
use uuid::Uuid;

use crate::events::DragEvent;
use crate::item3d::PhysicalItem;
use crate::picking::{Ray, intersect_horizontal_plane, intersect_planes, pick_object};

/// Pointer travel (pixels) beyond which a press is no longer a click
pub const CLICK_TOLERANCE: f32 = 4.0;

/// Everything the controller hit-tests against
#[derive(Clone, Copy)]
pub struct HitTargets<'a> {
    pub walls: &'a [IntersectionPlane],
    pub floors: &'a [IntersectionPlane],
    pub items: &'a [PhysicalItem],
    pub scene: &'a Scene,
    pub meshes: &'a MeshStore,
}

/// Camera and viewport size the pointer coordinates refer to
#[derive(Clone, Copy)]
pub struct PointerView<'a> {
    pub camera: &'a Camera,
    pub viewport: Vec2,
}

impl PointerView<'_> {
    fn ray(&self, pointer: Vec2) -> Ray {
        Ray::from_screen(self.camera, pointer, self.viewport)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PressTarget {
    Item(Uuid),
    Wall(EdgeId),
    Room(Uuid),
    Empty,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Vec2,
    travel: f32,
    target: PressTarget,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    item_id: Uuid,
    /// Item position minus the grabbed point on the drag plane
    grab_offset: Vec3,
    elevation: f32,
    position: Vec3,
    moved: bool,
}

pub struct DragControl {
    active: bool,
    can_move_fixed_items: bool,
    selected: Option<Uuid>,
    press: Option<Press>,
    drag: Option<Drag>,
}

impl DragControl {
    pub fn new(can_move_fixed_items: bool) -> Self {
        Self {
            active: true,
            can_move_fixed_items,
            selected: None,
            press: None,
            drag: None,
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Ignore input until [`Self::activate`]; an in-progress drag is abandoned
    pub fn deactivate(&mut self) {
        self.active = false;
        self.cancel();
    }

    /// Drop the current press and drag without emitting anything
    pub fn cancel(&mut self) {
        self.press = None;
        self.drag = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_can_move_fixed_items(&mut self, allowed: bool) {
        self.can_move_fixed_items = allowed;
    }

    /// The item this controller considers selected
    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    /// Keep the controller in step with selections made elsewhere
    pub fn set_selected(&mut self, item_id: Option<Uuid>) {
        self.selected = item_id;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the current press landed on an item (camera input should wait)
    pub fn captures_pointer(&self) -> bool {
        matches!(
            self.press,
            Some(Press {
                target: PressTarget::Item(_),
                ..
            })
        )
    }

    pub fn pointer_down(&mut self, pointer: Vec2, view: PointerView<'_>, targets: HitTargets<'_>) -> Vec<DragEvent> {
        if !self.active {
            return Vec::new();
        }
        self.drag = None;

        let ray = view.ray(pointer);
        let target = hit_test(&ray, &targets);
        self.press = Some(Press {
            origin: pointer,
            travel: 0.0,
            target,
        });

        let PressTarget::Item(item_id) = target else {
            return Vec::new();
        };
        self.selected = Some(item_id);

        if let Some(item) = targets.items.iter().find(|i| i.item_id() == item_id) {
            self.begin_drag(&ray, item);
        }
        vec![DragEvent::ItemSelected { item_id }]
    }

    fn begin_drag(&mut self, ray: &Ray, item: &PhysicalItem) {
        if item.is_fixed() && !self.can_move_fixed_items {
            tracing::debug!("Item {} is fixed, not dragging", item.item_id());
            return;
        }
        let position = item.position();
        let Some(grabbed) = intersect_horizontal_plane(ray, position.y) else {
            return;
        };
        self.drag = Some(Drag {
            item_id: item.item_id(),
            grab_offset: position - grabbed,
            elevation: position.y,
            position,
            moved: false,
        });
    }

    pub fn pointer_move(&mut self, pointer: Vec2, view: PointerView<'_>) -> Vec<DragEvent> {
        if !self.active {
            return Vec::new();
        }
        if let Some(press) = &mut self.press {
            press.travel = press.travel.max(pointer.distance(press.origin));
        }

        let Some(drag) = &mut self.drag else {
            return Vec::new();
        };
        let Some(point) = intersect_horizontal_plane(&view.ray(pointer), drag.elevation) else {
            return Vec::new();
        };

        let mut position = point + drag.grab_offset;
        position.y = drag.elevation;
        if position.distance_squared(drag.position) < 1e-8 {
            return Vec::new();
        }
        drag.position = position;
        drag.moved = true;
        vec![DragEvent::ItemMove {
            item_id: drag.item_id,
            position,
        }]
    }

    pub fn pointer_up(&mut self, pointer: Vec2) -> Vec<DragEvent> {
        let press = self.press.take();
        let drag = self.drag.take();
        if !self.active {
            return Vec::new();
        }

        if let Some(drag) = drag.filter(|d| d.moved) {
            return vec![DragEvent::ItemMoveFinish {
                item_id: drag.item_id,
                position: drag.position,
            }];
        }

        let Some(press) = press else {
            return Vec::new();
        };
        if press.travel.max(pointer.distance(press.origin)) > CLICK_TOLERANCE {
            return Vec::new();
        }

        let mut events = Vec::new();
        match press.target {
            PressTarget::Item(_) => {}
            PressTarget::Wall(edge_id) => {
                self.deselect_into(&mut events);
                events.push(DragEvent::WallClicked { edge_id });
            }
            PressTarget::Room(room_id) => {
                self.deselect_into(&mut events);
                events.push(DragEvent::RoomClicked { room_id });
            }
            PressTarget::Empty => {
                self.selected = None;
                events.push(DragEvent::NoItemSelected);
            }
        }
        events
    }

    fn deselect_into(&mut self, events: &mut Vec<DragEvent>) {
        if self.selected.take().is_some() {
            events.push(DragEvent::NoItemSelected);
        }
    }
}

fn hit_test(ray: &Ray, targets: &HitTargets<'_>) -> PressTarget {
    let item_hit = pick_object(ray, targets.scene, targets.meshes, |o| o.kind == ObjectKind::Item)
        .and_then(|(object_id, _)| targets.items.iter().find(|i| i.object_id() == object_id));
    if let Some(item) = item_hit {
        return PressTarget::Item(item.item_id());
    }

    let wall = intersect_planes(ray, targets.walls);
    let floor = intersect_planes(ray, targets.floors);
    let nearest = match (wall, floor) {
        (Some(w), Some(f)) => Some(if w.1 <= f.1 { w } else { f }),
        (w, f) => w.or(f),
    };

    match nearest.map(|(plane, _)| plane.target) {
        Some(PlaneTarget::Wall(edge_id)) => PressTarget::Wall(edge_id),
        Some(PlaneTarget::Floor(room_id)) => PressTarget::Room(room_id),
        None => PressTarget::Empty,
    }
}
