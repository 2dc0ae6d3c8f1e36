//! Viewer events and their routing.
//!
//! The drag controller speaks [`DragEvent`]s. The viewer applies each one to
//! its selection state and re-dispatches it as the [`ViewerEvent`] named by
//! [`DRAG_EVENT_ROUTES`] to listeners registered for that kind.

use floorplan_core::{EdgeId, Item};
use glam::Vec3;
use uuid::Uuid;

/// Events delivered to viewer listeners
#[derive(Debug, Clone)]
pub enum ViewerEvent {
    ItemSelected { item_id: Uuid, item: Box<Item> },
    ItemMove { item_id: Uuid, position: Vec3 },
    ItemMoveFinish { item_id: Uuid, position: Vec3 },
    NoItemSelected,
    WallClicked { edge_id: EdgeId, wall_id: Uuid },
    RoomClicked { room_id: Uuid },
    /// A binary glTF of the scene
    ExportReady { glb: Vec<u8> },
}

/// Discriminant of [`ViewerEvent`], used to subscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerEventKind {
    ItemSelected,
    ItemMove,
    ItemMoveFinish,
    NoItemSelected,
    WallClicked,
    RoomClicked,
    ExportReady,
}

impl ViewerEvent {
    pub fn kind(&self) -> ViewerEventKind {
        match self {
            ViewerEvent::ItemSelected { .. } => ViewerEventKind::ItemSelected,
            ViewerEvent::ItemMove { .. } => ViewerEventKind::ItemMove,
            ViewerEvent::ItemMoveFinish { .. } => ViewerEventKind::ItemMoveFinish,
            ViewerEvent::NoItemSelected => ViewerEventKind::NoItemSelected,
            ViewerEvent::WallClicked { .. } => ViewerEventKind::WallClicked,
            ViewerEvent::RoomClicked { .. } => ViewerEventKind::RoomClicked,
            ViewerEvent::ExportReady { .. } => ViewerEventKind::ExportReady,
        }
    }
}

/// Interactions recognized by the drag controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    ItemSelected { item_id: Uuid },
    ItemMove { item_id: Uuid, position: Vec3 },
    ItemMoveFinish { item_id: Uuid, position: Vec3 },
    NoItemSelected,
    WallClicked { edge_id: EdgeId },
    RoomClicked { room_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    ItemSelected,
    ItemMove,
    ItemMoveFinish,
    NoItemSelected,
    WallClicked,
    RoomClicked,
}

impl DragEvent {
    pub fn kind(&self) -> DragEventKind {
        match self {
            DragEvent::ItemSelected { .. } => DragEventKind::ItemSelected,
            DragEvent::ItemMove { .. } => DragEventKind::ItemMove,
            DragEvent::ItemMoveFinish { .. } => DragEventKind::ItemMoveFinish,
            DragEvent::NoItemSelected => DragEventKind::NoItemSelected,
            DragEvent::WallClicked { .. } => DragEventKind::WallClicked,
            DragEvent::RoomClicked { .. } => DragEventKind::RoomClicked,
        }
    }
}

/// Which viewer event each drag event is re-dispatched as
pub const DRAG_EVENT_ROUTES: &[(DragEventKind, ViewerEventKind)] = &[
    (DragEventKind::ItemSelected, ViewerEventKind::ItemSelected),
    (DragEventKind::ItemMove, ViewerEventKind::ItemMove),
    (DragEventKind::ItemMoveFinish, ViewerEventKind::ItemMoveFinish),
    (DragEventKind::NoItemSelected, ViewerEventKind::NoItemSelected),
    (DragEventKind::WallClicked, ViewerEventKind::WallClicked),
    (DragEventKind::RoomClicked, ViewerEventKind::RoomClicked),
];

/// Look up the outbound kind of a drag event
pub fn route(kind: DragEventKind) -> Option<ViewerEventKind> {
    DRAG_EVENT_ROUTES
        .iter()
        .find(|(from, _)| *from == kind)
        .map(|(_, to)| *to)
}

/// Handle returned by [`ListenerRegistry::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Box<dyn FnMut(&ViewerEvent) + Send>;

/// Listeners per event kind, called in registration order
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<(ListenerId, ViewerEventKind, Listener)>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: ViewerEventKind, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, kind, listener));
        id
    }

    /// Remove a listener; false if it was not registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn dispatch(&mut self, event: &ViewerEvent) {
        let kind = event.kind();
        for (_, _, listener) in self.listeners.iter_mut().filter(|(_, k, _)| *k == kind) {
            listener(event);
        }
    }

    pub fn count(&self, kind: ViewerEventKind) -> usize {
        self.listeners.iter().filter(|(_, k, _)| *k == kind).count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_every_drag_event_is_routed() {
        let kinds = [
            DragEventKind::ItemSelected,
            DragEventKind::ItemMove,
            DragEventKind::ItemMoveFinish,
            DragEventKind::NoItemSelected,
            DragEventKind::WallClicked,
            DragEventKind::RoomClicked,
        ];
        for kind in kinds {
            assert!(route(kind).is_some(), "{kind:?} has no route");
        }
        assert_eq!(route(DragEventKind::ItemMove), Some(ViewerEventKind::ItemMove));
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();

        for tag in ["first", "second"] {
            let log = log.clone();
            registry.add(
                ViewerEventKind::NoItemSelected,
                Box::new(move |_| log.lock().unwrap().push(tag)),
            );
        }
        let other = log.clone();
        registry.add(
            ViewerEventKind::RoomClicked,
            Box::new(move |_| other.lock().unwrap().push("room")),
        );

        registry.dispatch(&ViewerEvent::NoItemSelected);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_remove_listener() {
        let hits = Arc::new(Mutex::new(0));
        let mut registry = ListenerRegistry::new();
        let counter = hits.clone();
        let id = registry.add(
            ViewerEventKind::NoItemSelected,
            Box::new(move |_| *counter.lock().unwrap() += 1),
        );

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        registry.dispatch(&ViewerEvent::NoItemSelected);
        assert_eq!(*hits.lock().unwrap(), 0);
        assert!(registry.is_empty());
    }
}
