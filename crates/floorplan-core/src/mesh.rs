//! Item mesh loading (STL, OBJ formats)

use std::io::BufReader;
use std::path::Path;

use glam::Vec3;

/// Indexed triangle mesh used as an item's shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemMesh {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl ItemMesh {
    /// Axis-aligned bounds as (min, max); zero for an empty mesh
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.vertices.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }

        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for v in &self.vertices {
            let p = Vec3::from(*v);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Detect mesh format from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Stl,
    Obj,
    Unknown,
}

impl MeshFormat {
    /// Detect format from file path
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("stl") => MeshFormat::Stl,
            Some("obj") => MeshFormat::Obj,
            _ => MeshFormat::Unknown,
        }
    }

    /// Get format name
    pub fn name(&self) -> &'static str {
        match self {
            MeshFormat::Stl => "STL",
            MeshFormat::Obj => "OBJ",
            MeshFormat::Unknown => "Unknown",
        }
    }
}

/// Load any supported item mesh format
pub fn load_item_mesh(path: impl AsRef<Path>) -> Result<ItemMesh, MeshError> {
    let path = path.as_ref();
    let mesh = match MeshFormat::from_path(path) {
        MeshFormat::Stl => load_stl(path)?,
        MeshFormat::Obj => load_obj(path)?,
        MeshFormat::Unknown => {
            return Err(MeshError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            ));
        }
    };

    if mesh.indices.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    tracing::info!(
        "Loaded item mesh {:?}: {} vertices, {} triangles",
        path,
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

fn load_stl(path: &Path) -> Result<ItemMesh, MeshError> {
    let file = std::fs::File::open(path).map_err(|e| MeshError::Io(e.to_string()))?;
    let mut reader = BufReader::new(file);
    let mesh = stl_io::read_stl(&mut reader).map_err(|e| MeshError::Parse(e.to_string()))?;

    let vertices = mesh.vertices.iter().map(|v| [v[0], v[1], v[2]]).collect();
    let indices = mesh
        .faces
        .iter()
        .flat_map(|face| face.vertices.iter().map(|&i| i as u32))
        .collect();

    Ok(ItemMesh { vertices, indices })
}

fn load_obj(path: &Path) -> Result<ItemMesh, MeshError> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|e| MeshError::Parse(e.to_string()))?;

    // Merge all OBJ objects into one mesh
    let mut mesh = ItemMesh::default();
    for model in models {
        let base = mesh.vertices.len() as u32;
        mesh.vertices.extend(
            model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]]),
        );
        mesh.indices
            .extend(model.mesh.indices.iter().map(|i| base + i));
    }

    Ok(mesh)
}

/// Mesh-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
