//! Floorplan Viewer Core Data Structures
//!
//! This crate contains the domain data the 3D viewer synchronizes with:
//! - Floorplan: corners, walls, rooms and the geometry derived from them
//! - Item: a placed piece of furniture with its transform
//! - Model: the item collection plus the floorplan, with lifecycle events
//! - Design: serializable design file

pub mod design;
pub mod events;
pub mod floorplan;
pub mod geometry;
pub mod item;
pub mod mesh;
pub mod model;

pub use design::*;
pub use events::*;
pub use floorplan::*;
pub use item::*;
pub use mesh::{ItemMesh, MeshError, MeshFormat, load_item_mesh};
pub use model::*;
