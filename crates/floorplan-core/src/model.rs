//! The model: placed items plus the floorplan they stand on

use std::sync::Arc;

use glam::Vec3;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::events::{EventQueue, ModelEvent};
use crate::floorplan::Floorplan;
use crate::item::Item;

/// Model shared between the host application and the viewer
pub type SharedModel = Arc<RwLock<Model>>;

/// Owns the placed items and the floorplan, and queues lifecycle events
/// for whoever renders them.
#[derive(Debug, Clone, Default)]
pub struct Model {
    floorplan: Floorplan,
    items: Vec<Item>,
    events: EventQueue<ModelEvent>,
}

impl Model {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the model for sharing
    pub fn into_shared(self) -> SharedModel {
        Arc::new(RwLock::new(self))
    }

    pub fn floorplan(&self) -> &Floorplan {
        &self.floorplan
    }

    pub fn floorplan_mut(&mut self) -> &mut Floorplan {
        &mut self.floorplan
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Place a new item and announce it
    pub fn add_item(&mut self, item: Item) -> Uuid {
        let id = item.id;
        tracing::debug!("Adding item '{}' ({})", item.name, id);
        self.items.push(item);
        self.events.push(ModelEvent::NewItem(Some(id)));
        id
    }

    /// Replace the whole item collection
    pub fn load_items(&mut self, items: Vec<Item>) {
        tracing::info!("Loading {} items", items.len());
        self.items = items;
        self.events.push(ModelEvent::Loaded);
    }

    /// Update an item's position without announcing it.
    ///
    /// Returns false if the item does not exist.
    pub fn set_item_position(&mut self, id: Uuid, position: Vec3) -> bool {
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.position = position;
                true
            }
            None => false,
        }
    }

    /// Queue an event on behalf of an external producer
    pub fn emit(&mut self, event: ModelEvent) {
        self.events.push(event);
    }

    /// Take all pending model events
    pub fn drain_events(&mut self) -> Vec<ModelEvent> {
        self.events.drain()
    }

    /// Take all pending model and floorplan events in one call
    pub fn drain_all_events(&mut self) -> (Vec<ModelEvent>, Vec<crate::FloorplanEvent>) {
        (self.events.drain(), self.floorplan.drain_events())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_item_queues_new_item() {
        let mut model = Model::new();
        let id = model.add_item(Item::new("sofa"));
        assert_eq!(model.drain_events(), vec![ModelEvent::NewItem(Some(id))]);
        assert!(model.item(id).is_some());
    }

    #[test]
    fn test_load_items_replaces_collection() {
        let mut model = Model::new();
        model.add_item(Item::new("old"));
        model.load_items(vec![Item::new("a"), Item::new("b")]);

        assert_eq!(model.items().len(), 2);
        assert_eq!(model.drain_events().last(), Some(&ModelEvent::Loaded));
    }

    #[test]
    fn test_set_item_position_is_silent() {
        let mut model = Model::new();
        let id = model.add_item(Item::new("lamp"));
        model.drain_events();

        assert!(model.set_item_position(id, Vec3::new(1.0, 0.0, 2.0)));
        assert!(!model.set_item_position(Uuid::new_v4(), Vec3::ZERO));
        assert!(model.drain_events().is_empty());
        assert_eq!(model.item(id).unwrap().position, Vec3::new(1.0, 0.0, 2.0));
    }
}
