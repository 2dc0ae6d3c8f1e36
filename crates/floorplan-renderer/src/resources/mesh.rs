//! Mesh data and the handle-based mesh store.

use std::collections::HashMap;

use glam::Vec3;

use crate::scene::BoundingBox;
use crate::vertex::MeshVertex;

/// Handle to a mesh stored in the MeshStore.
///
/// Handles are lightweight and can be copied freely.
/// The actual mesh data is stored in the MeshStore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MeshHandle(u64);

impl MeshHandle {
    /// Returns the raw handle value.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Creates a handle from a raw value.
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }
}

/// CPU mesh data (always indexed triangles).
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// Vertex data.
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices.
    pub indices: Vec<u32>,
    /// Bounding box.
    pub bounds: BoundingBox,
}

impl MeshData {
    /// Creates a new indexed mesh data.
    pub fn indexed(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        let bounds = Self::compute_bounds(&vertices);
        Self {
            vertices,
            indices,
            bounds,
        }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                Vec3::from(self.vertices[tri[0] as usize].position),
                Vec3::from(self.vertices[tri[1] as usize].position),
                Vec3::from(self.vertices[tri[2] as usize].position),
            ]
        })
    }

    fn compute_bounds(vertices: &[MeshVertex]) -> BoundingBox {
        if vertices.is_empty() {
            return BoundingBox::empty();
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for v in vertices {
            let pos = Vec3::from(v.position);
            min = min.min(pos);
            max = max.max(pos);
        }

        BoundingBox::new(min, max)
    }
}

/// Store for mesh data addressed by handle.
///
/// Every 3D wrapper that inserts a mesh must remove it on disposal; the store
/// length is the number of live meshes.
pub struct MeshStore {
    meshes: HashMap<MeshHandle, MeshData>,
    next_handle: u64,
}

impl MeshStore {
    /// Creates a new mesh store.
    pub fn new() -> Self {
        Self {
            meshes: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Stores mesh data and returns a fresh handle.
    pub fn insert(&mut self, data: MeshData) -> MeshHandle {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.meshes.insert(handle, data);
        handle
    }

    /// Gets a mesh by handle.
    pub fn get(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(&handle)
    }

    /// Removes a mesh from the store.
    pub fn remove(&mut self, handle: MeshHandle) -> Option<MeshData> {
        self.meshes.remove(&handle)
    }

    /// Returns true if the store contains a mesh with the given handle.
    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.meshes.contains_key(&handle)
    }

    /// Returns the number of meshes in the store.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Returns an iterator over all handles and their data.
    pub fn iter(&self) -> impl Iterator<Item = (MeshHandle, &MeshData)> {
        self.meshes.iter().map(|(h, d)| (*h, d))
    }
}

impl Default for MeshStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_never_reused() {
        let mut store = MeshStore::new();
        let a = store.insert(crate::resources::quad([Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y]));
        store.remove(a);
        let b = store.insert(crate::resources::quad([Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y]));

        assert_ne!(a, b);
        assert!(!store.contains(a));
        assert_eq!(store.len(), 1);
    }
}
