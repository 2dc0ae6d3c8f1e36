//! Binary glTF (GLB) export of a scene.
//!
//! Every visible object becomes one node carrying its world matrix. Mesh
//! geometry is written once per mesh handle; objects sharing a mesh but not
//! a color get separate glTF meshes over the same accessors.

mod gltf;

use std::collections::HashMap;

use thiserror::Error;

use crate::resources::{MeshData, MeshHandle, MeshStore};
use crate::scene::{RenderObject, Scene};

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// Errors while exporting a scene
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: the scene has no visible objects")]
    EmptyScene,

    #[error("Failed to serialize glTF document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Export exceeds the 4 GiB GLB limit ({0} bytes)")]
    TooLarge(usize),
}

/// Serialize the visible part of a scene as a GLB file
pub fn export_glb(scene: &Scene, meshes: &MeshStore) -> Result<Vec<u8>, ExportError> {
    let objects = scene.visible_sorted();
    if objects.is_empty() {
        return Err(ExportError::EmptyScene);
    }

    let mut builder = DocumentBuilder::default();
    for object in &objects {
        builder.add_object(object, meshes.get(object.mesh));
    }
    let (document, bin) = builder.finish();

    let json = serde_json::to_vec(&document)?;
    let glb = write_glb(&json, &bin)?;

    tracing::info!(
        "Exported {} objects ({} meshes) to GLB, {} bytes",
        document.nodes.len(),
        document.meshes.len(),
        glb.len()
    );
    Ok(glb)
}

/// Accessor indices of one uploaded mesh
#[derive(Clone, Copy)]
struct Geometry {
    position: usize,
    normal: usize,
    indices: usize,
}

#[derive(Default)]
struct DocumentBuilder {
    nodes: Vec<gltf::Node>,
    meshes: Vec<gltf::Mesh>,
    materials: Vec<gltf::Material>,
    accessors: Vec<gltf::Accessor>,
    buffer_views: Vec<gltf::BufferView>,
    bin: Vec<u8>,
    geometry: HashMap<MeshHandle, Geometry>,
    mesh_index: HashMap<(MeshHandle, [u32; 4]), usize>,
    material_index: HashMap<[u32; 4], usize>,
}

impl DocumentBuilder {
    fn add_object(&mut self, object: &RenderObject, data: Option<&MeshData>) {
        let mesh = data
            .filter(|d| !d.indices.is_empty())
            .map(|d| self.mesh_for(object.mesh, d, object.color));

        self.nodes.push(gltf::Node {
            name: object.name.clone(),
            matrix: object.transform.to_cols_array(),
            mesh,
        });
    }

    fn mesh_for(&mut self, handle: MeshHandle, data: &MeshData, color: [f32; 4]) -> usize {
        let key = (handle, color.map(f32::to_bits));
        if let Some(&index) = self.mesh_index.get(&key) {
            return index;
        }

        let geometry = match self.geometry.get(&handle) {
            Some(g) => *g,
            None => {
                let g = self.write_geometry(data);
                self.geometry.insert(handle, g);
                g
            }
        };
        let material = self.material_for(color);

        let index = self.meshes.len();
        self.meshes.push(gltf::Mesh {
            primitives: vec![gltf::Primitive {
                attributes: gltf::Attributes {
                    position: geometry.position,
                    normal: geometry.normal,
                },
                indices: geometry.indices,
                material,
            }],
        });
        self.mesh_index.insert(key, index);
        index
    }

    fn material_for(&mut self, color: [f32; 4]) -> usize {
        let key = color.map(f32::to_bits);
        if let Some(&index) = self.material_index.get(&key) {
            return index;
        }

        let index = self.materials.len();
        self.materials.push(gltf::Material {
            pbr: gltf::Pbr {
                base_color_factor: color,
                metallic_factor: 0.0,
                roughness_factor: 0.8,
            },
            alpha_mode: (color[3] < 1.0).then_some("BLEND"),
            double_sided: false,
        });
        self.material_index.insert(key, index);
        index
    }

    fn write_geometry(&mut self, data: &MeshData) -> Geometry {
        let positions: Vec<[f32; 3]> = data.vertices.iter().map(|v| v.position).collect();
        let normals: Vec<[f32; 3]> = data.vertices.iter().map(|v| v.normal).collect();

        let position_view = self.push_view(bytemuck::cast_slice(&positions), gltf::ARRAY_BUFFER);
        let normal_view = self.push_view(bytemuck::cast_slice(&normals), gltf::ARRAY_BUFFER);
        let index_view =
            self.push_view(bytemuck::cast_slice(&data.indices), gltf::ELEMENT_ARRAY_BUFFER);

        let position = self.push_accessor(gltf::Accessor {
            buffer_view: position_view,
            component_type: gltf::COMPONENT_FLOAT,
            count: positions.len(),
            kind: "VEC3",
            min: Some(data.bounds.min.to_array()),
            max: Some(data.bounds.max.to_array()),
        });
        let normal = self.push_accessor(gltf::Accessor {
            buffer_view: normal_view,
            component_type: gltf::COMPONENT_FLOAT,
            count: normals.len(),
            kind: "VEC3",
            min: None,
            max: None,
        });
        let indices = self.push_accessor(gltf::Accessor {
            buffer_view: index_view,
            component_type: gltf::COMPONENT_UNSIGNED_INT,
            count: data.indices.len(),
            kind: "SCALAR",
            min: None,
            max: None,
        });

        Geometry {
            position,
            normal,
            indices,
        }
    }

    fn push_view(&mut self, bytes: &[u8], target: u32) -> usize {
        // Views stay 4-byte aligned
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
        let byte_offset = self.bin.len();
        self.bin.extend_from_slice(bytes);

        self.buffer_views.push(gltf::BufferView {
            buffer: 0,
            byte_offset,
            byte_length: bytes.len(),
            target,
        });
        self.buffer_views.len() - 1
    }

    fn push_accessor(&mut self, accessor: gltf::Accessor) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn finish(self) -> (gltf::Document, Vec<u8>) {
        let buffers = if self.bin.is_empty() {
            Vec::new()
        } else {
            vec![gltf::Buffer {
                byte_length: self.bin.len(),
            }]
        };

        let document = gltf::Document {
            asset: gltf::Asset {
                version: "2.0",
                generator: concat!("floorplan-renderer ", env!("CARGO_PKG_VERSION")),
            },
            scene: 0,
            scenes: vec![gltf::SceneDef {
                nodes: (0..self.nodes.len()).collect(),
            }],
            nodes: self.nodes,
            meshes: self.meshes,
            materials: self.materials,
            accessors: self.accessors,
            buffer_views: self.buffer_views,
            buffers,
        };
        (document, self.bin)
    }
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(4) * 4
}

fn write_glb(json: &[u8], bin: &[u8]) -> Result<Vec<u8>, ExportError> {
    let json_len = padded_len(json.len());
    let bin_len = padded_len(bin.len());
    let bin_chunk = if bin.is_empty() { 0 } else { 8 + bin_len };
    let total = 12 + 8 + json_len + bin_chunk;
    let total_u32 = u32::try_from(total).map_err(|_| ExportError::TooLarge(total))?;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&total_u32.to_le_bytes());

    out.extend_from_slice(&(json_len as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(json);
    out.resize(out.len() + json_len - json.len(), b' ');

    if !bin.is_empty() {
        out.extend_from_slice(&(bin_len as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(bin);
        out.resize(out.len() + bin_len - bin.len(), 0);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::cuboid;
    use glam::{Mat4, Vec3};
    use uuid::Uuid;

    fn read_u32(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn json_chunk(glb: &[u8]) -> serde_json::Value {
        let len = read_u32(glb, 12) as usize;
        assert_eq!(read_u32(glb, 16), CHUNK_JSON);
        serde_json::from_slice(&glb[20..20 + len]).unwrap()
    }

    fn scene_with_boxes(colors: &[[f32; 4]]) -> (Scene, MeshStore) {
        let mut meshes = MeshStore::new();
        let handle = meshes.insert(cuboid(Vec3::ZERO, Vec3::splat(50.0)));
        let bounds = meshes.get(handle).unwrap().bounds;

        let mut scene = Scene::new();
        for (i, color) in colors.iter().enumerate() {
            scene.add_object(
                RenderObject::new(Uuid::new_v4(), handle, bounds)
                    .with_name(format!("box-{i}"))
                    .with_color(*color)
                    .with_transform(Mat4::from_translation(Vec3::X * 100.0 * i as f32)),
            );
        }
        (scene, meshes)
    }

    #[test]
    fn test_header_and_chunks() {
        let (scene, meshes) = scene_with_boxes(&[[1.0, 0.0, 0.0, 1.0]]);
        let glb = export_glb(&scene, &meshes).unwrap();

        assert_eq!(&glb[0..4], b"glTF");
        assert_eq!(read_u32(&glb, 4), 2);
        assert_eq!(read_u32(&glb, 8) as usize, glb.len());
        assert_eq!(glb.len() % 4, 0);

        let json_len = read_u32(&glb, 12) as usize;
        let bin_offset = 20 + json_len;
        assert_eq!(read_u32(&glb, bin_offset + 4), CHUNK_BIN);

        let doc = json_chunk(&glb);
        assert_eq!(doc["asset"]["version"], "2.0");
        assert_eq!(doc["buffers"][0]["byteLength"].as_u64().unwrap() as usize, read_u32(&glb, bin_offset) as usize);
    }

    #[test]
    fn test_one_node_per_object_and_shared_geometry() {
        let red = [1.0, 0.0, 0.0, 1.0];
        let blue = [0.0, 0.0, 1.0, 1.0];
        let (scene, meshes) = scene_with_boxes(&[red, red, blue]);
        let doc = json_chunk(&export_glb(&scene, &meshes).unwrap());

        assert_eq!(doc["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(doc["scenes"][0]["nodes"].as_array().unwrap().len(), 3);
        // One mesh per (geometry, color), one set of accessors per geometry
        assert_eq!(doc["meshes"].as_array().unwrap().len(), 2);
        assert_eq!(doc["materials"].as_array().unwrap().len(), 2);
        assert_eq!(doc["accessors"].as_array().unwrap().len(), 3);
        assert_eq!(doc["accessors"][0]["max"][0], 50.0);
    }

    #[test]
    fn test_hidden_objects_are_skipped() {
        let (mut scene, meshes) = scene_with_boxes(&[[1.0; 4], [1.0; 4]]);
        let first = scene.objects().next().unwrap().id;
        scene.get_object_mut(first).unwrap().visible = false;

        let doc = json_chunk(&export_glb(&scene, &meshes).unwrap());
        assert_eq!(doc["nodes"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_scene_is_an_error() {
        let result = export_glb(&Scene::new(), &MeshStore::new());
        assert!(matches!(result, Err(ExportError::EmptyScene)));
    }
}
