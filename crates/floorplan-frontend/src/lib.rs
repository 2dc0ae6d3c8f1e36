//! Floorplan Viewer Frontend
//!
//! eframe application hosting the 3D viewer in its central panel.

mod app;
mod demo;
mod menu;
mod viewport_state;

pub use app::FloorplanApp;
pub use demo::demo_model;
