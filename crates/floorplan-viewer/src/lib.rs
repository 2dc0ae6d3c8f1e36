//! Floorplan 3D Viewer
//!
//! Keeps a 3D scene in step with a floorplan model and lets the user orbit,
//! select and drag items in it.
//!
//! # Architecture
//!
//! - [`viewer::Viewer`] - Owns the backend, camera, controls and wrappers;
//!   consumes model events and routes pointer input
//! - [`drag_control::DragControl`] - Item selection and dragging, wall and
//!   room clicks
//! - [`orbit_controls::OrbitControls`] - Rotate, pan and dolly around a target
//! - [`item3d`], [`floor3d`], [`edge3d`] - One wrapper per item, room and
//!   wall edge, each owning its meshes
//! - [`events`] - Outbound events, routing table and listener registry
//! - [`config`] - Persisted options and control limits
//!
//! # Example
//!
//! ```ignore
//! use floorplan_core::Model;
//! use floorplan_renderer::HeadlessRenderer;
//! use floorplan_viewer::{MountGeometry, Viewer, ViewerEventKind, ViewerOptions};
//!
//! let model = Model::new().into_shared();
//! let mut viewer = Viewer::new(
//!     model.clone(),
//!     HeadlessRenderer::new(800, 600),
//!     ViewerOptions::default(),
//!     MountGeometry::fill(800.0, 600.0),
//! );
//! viewer.add_listener(ViewerEventKind::ItemSelected, |event| println!("{event:?}"));
//! viewer.tick();
//! ```

pub mod config;
pub mod drag_control;
pub mod edge3d;
pub mod events;
pub mod floor3d;
pub mod item3d;
pub mod mount;
pub mod options;
pub mod orbit_controls;
pub mod picking;
pub mod viewer;

pub use config::{ConfigError, ConfigManager, SharedConfig, ViewerConfig, create_shared_config};
pub use drag_control::DragControl;
pub use events::{DRAG_EVENT_ROUTES, DragEvent, ListenerId, ViewerEvent, ViewerEventKind};
pub use mount::MountGeometry;
pub use options::ViewerOptions;
pub use orbit_controls::{OrbitControls, PointerButton};
pub use viewer::{PointerEvent, Viewer};
