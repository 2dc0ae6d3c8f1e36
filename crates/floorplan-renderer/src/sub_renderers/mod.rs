//! Built-in sub-renderers of the floorplan viewer.
//!
//! - [`SkySubRenderer`]: gradient background and the environment cube
//! - [`MeshSubRenderer`]: floors, walls and items as lit instanced meshes

pub mod mesh;
pub mod sky;

pub use mesh::MeshSubRenderer;
pub use sky::SkySubRenderer;

/// Render priorities for sub-renderers.
///
/// Lower values are rendered first (background).
pub mod priorities {
    /// Sky is rendered first (background)
    pub const SKY: i32 = 0;
    /// Meshes are the main content
    pub const MESH: i32 = 100;
}
