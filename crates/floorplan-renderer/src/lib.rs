//! Floorplan Viewer Renderer
//!
//! Scene graph and WGPU-based rendering for the 3D floorplan viewer.
//!
//! # Architecture
//!
//! - [`scene::Scene`] - Renderable objects, kept apart from GPU state
//! - [`resources::MeshStore`] - CPU mesh data addressed by handle
//! - [`backend::RenderBackend`] - What the viewer draws through
//!   ([`backend::HeadlessRenderer`] or [`renderer::WgpuRenderer`])
//! - [`traits::SubRenderer`] - Units of GPU work registered in a
//!   [`plugin::RendererRegistry`]
//! - [`context::RenderContext`] - Shared GPU context
//! - [`export`] - Binary glTF export of a scene
//!
//! # Example
//!
//! ```ignore
//! use floorplan_renderer::{Camera, Frame, HeadlessRenderer, LightRig, MeshStore, Scene, Skybox};
//!
//! let mut backend = HeadlessRenderer::new(800, 600);
//! backend.render(&Frame {
//!     scene: &scene,
//!     meshes: &meshes,
//!     camera: &camera,
//!     lights: &lights,
//!     skybox: &skybox,
//! });
//! ```

// Core abstractions
pub mod backend;
pub mod context;
pub mod plugin;
pub mod resources;
pub mod scene;
pub mod traits;

pub mod camera;
pub mod config;
pub mod constants;
pub mod export;
pub mod light;
pub mod pipeline;
pub mod renderer;
pub mod skybox;
pub mod sub_renderers;
pub mod vertex;

// Re-exports for convenience
pub use backend::{Frame, HeadlessRenderer, RenderBackend};
pub use camera::*;
pub use config::RendererConfig;
pub use context::RenderContext;
pub use export::{ExportError, export_glb};
pub use light::*;
pub use plugin::RendererRegistry;
pub use renderer::{RendererError, WgpuRenderer};
pub use resources::{MeshData, MeshHandle, MeshStore};
pub use scene::{BoundingBox, ObjectKind, RenderObject, Scene};
pub use skybox::*;
pub use traits::SubRenderer;
pub use vertex::{InstanceRaw, MeshVertex};
