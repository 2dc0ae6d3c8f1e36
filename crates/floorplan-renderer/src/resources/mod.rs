//! Mesh resource management.
//!
//! This module provides handle-based storage for mesh data. GPU backends
//! mirror the store and release their buffers when a handle disappears.

mod mesh;
mod shapes;

pub use mesh::*;
pub use shapes::*;
