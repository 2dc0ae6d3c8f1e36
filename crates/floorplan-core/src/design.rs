//! Design file (JSON) loading and saving

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::floorplan::{Corner, Room, Wall};
use crate::item::Item;
use crate::mesh::load_item_mesh;
use crate::model::Model;

/// Serializable snapshot of a model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    /// Design format version
    #[serde(default)]
    pub version: u32,
    pub corners: Vec<Corner>,
    pub walls: Vec<Wall>,
    pub rooms: Vec<Room>,
    pub items: Vec<Item>,
}

impl Design {
    /// Current design format version
    pub const CURRENT_VERSION: u32 = 1;

    /// Snapshot the model
    pub fn from_model(model: &Model) -> Self {
        let plan = model.floorplan();
        Self {
            version: Self::CURRENT_VERSION,
            corners: plan.corners().to_vec(),
            walls: plan.walls().to_vec(),
            rooms: plan.rooms().to_vec(),
            items: model.items().to_vec(),
        }
    }

    /// Check that every wall and room references existing corners
    pub fn validate(&self) -> Result<(), DesignError> {
        let known = |id: &Uuid| self.corners.iter().any(|c| c.id == *id);

        for wall in &self.walls {
            for id in [wall.start, wall.end] {
                if !known(&id) {
                    return Err(DesignError::MissingCorner(id));
                }
            }
        }
        for room in &self.rooms {
            if let Some(id) = room.corners.iter().find(|id| !known(id)) {
                return Err(DesignError::MissingCorner(*id));
            }
        }
        Ok(())
    }
}

impl Model {
    /// Replace the model contents with a JSON design.
    ///
    /// Queues `Loaded` for the items and `NewRoomsAdded` for the floorplan.
    /// Item meshes referenced by path are loaded; failures fall back to the
    /// item's box shape.
    pub fn load_design(&mut self, json: &str) -> Result<(), DesignError> {
        let design: Design =
            serde_json::from_str(json).map_err(|e| DesignError::Parse(e.to_string()))?;
        design.validate()?;

        let Design {
            corners,
            walls,
            rooms,
            mut items,
            ..
        } = design;

        for item in &mut items {
            if let Some(path) = item.mesh_path.as_deref() {
                match load_item_mesh(path) {
                    Ok(mesh) => item.mesh = Some(mesh),
                    Err(e) => tracing::warn!("Item '{}' mesh not loaded: {}", item.name, e),
                }
            }
        }

        tracing::info!(
            "Loaded design: {} walls, {} rooms, {} items",
            walls.len(),
            rooms.len(),
            items.len()
        );
        self.floorplan_mut().replace(corners, walls, rooms);
        self.load_items(items);
        Ok(())
    }

    /// Serialize the model as a JSON design
    pub fn save_design(&self) -> Result<String, DesignError> {
        serde_json::to_string_pretty(&Design::from_model(self))
            .map_err(|e| DesignError::Serialize(e.to_string()))
    }

    /// Load a design file from disk
    pub fn load_design_file(&mut self, path: impl AsRef<Path>) -> Result<(), DesignError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| DesignError::Io(e.to_string()))?;
        self.load_design(&content)
    }

    /// Write the design to disk
    pub fn save_design_file(&self, path: impl AsRef<Path>) -> Result<(), DesignError> {
        let content = self.save_design()?;
        std::fs::write(path.as_ref(), content).map_err(|e| DesignError::Io(e.to_string()))?;
        tracing::info!("Saved design to {:?}", path.as_ref());
        Ok(())
    }
}

/// Design file errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DesignError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Design references missing corner {0}")]
    MissingCorner(Uuid),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{FloorplanEvent, ModelEvent};

    fn sample_model() -> Model {
        let mut model = Model::new();
        let plan = model.floorplan_mut();
        let a = plan.add_corner(0.0, 0.0);
        let b = plan.add_corner(300.0, 0.0);
        let c = plan.add_corner(300.0, 300.0);
        plan.add_wall(a, b).unwrap();
        plan.add_wall(b, c).unwrap();
        plan.add_wall(c, a).unwrap();
        plan.add_room(Some("Nook".into()), vec![a, b, c]).unwrap();
        model.add_item(Item::new("stool"));
        model
    }

    #[test]
    fn test_round_trip_through_json() {
        let json = sample_model().save_design().unwrap();

        let mut loaded = Model::new();
        loaded.load_design(&json).unwrap();

        assert_eq!(loaded.floorplan().walls().len(), 3);
        assert_eq!(loaded.floorplan().rooms().len(), 1);
        assert_eq!(loaded.items().len(), 1);

        let (model_events, plan_events) = loaded.drain_all_events();
        assert_eq!(model_events, vec![ModelEvent::Loaded]);
        assert_eq!(plan_events, vec![FloorplanEvent::NewRoomsAdded]);
    }

    #[test]
    fn test_missing_corner_is_rejected() {
        let mut design = Design::from_model(&sample_model());
        design.corners.remove(0);
        assert!(matches!(design.validate(), Err(DesignError::MissingCorner(_))));

        let json = serde_json::to_string(&design).unwrap();
        let mut model = Model::new();
        assert!(model.load_design(&json).is_err());
        assert!(model.drain_events().is_empty());
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let mut model = Model::new();
        assert!(matches!(
            model.load_design("not json"),
            Err(DesignError::Parse(_))
        ));
    }
}
