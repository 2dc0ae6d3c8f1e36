//! glTF 2.0 document types (the subset the exporter writes).

use serde::Serialize;

pub const ARRAY_BUFFER: u32 = 34962;
pub const ELEMENT_ARRAY_BUFFER: u32 = 34963;
pub const COMPONENT_FLOAT: u32 = 5126;
pub const COMPONENT_UNSIGNED_INT: u32 = 5125;

#[derive(Debug, Serialize)]
pub struct Document {
    pub asset: Asset,
    pub scene: usize,
    pub scenes: Vec<SceneDef>,
    pub nodes: Vec<Node>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub meshes: Vec<Mesh>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<Accessor>,
    #[serde(rename = "bufferViews", skip_serializing_if = "Vec::is_empty")]
    pub buffer_views: Vec<BufferView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buffers: Vec<Buffer>,
}

#[derive(Debug, Serialize)]
pub struct Asset {
    pub version: &'static str,
    pub generator: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SceneDef {
    pub nodes: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct Node {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub matrix: [f32; 16],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct Mesh {
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Serialize)]
pub struct Primitive {
    pub attributes: Attributes,
    pub indices: usize,
    pub material: usize,
}

#[derive(Debug, Serialize)]
pub struct Attributes {
    #[serde(rename = "POSITION")]
    pub position: usize,
    #[serde(rename = "NORMAL")]
    pub normal: usize,
}

#[derive(Debug, Serialize)]
pub struct Material {
    #[serde(rename = "pbrMetallicRoughness")]
    pub pbr: Pbr,
    #[serde(rename = "alphaMode", skip_serializing_if = "Option::is_none")]
    pub alpha_mode: Option<&'static str>,
    #[serde(rename = "doubleSided")]
    pub double_sided: bool,
}

#[derive(Debug, Serialize)]
pub struct Pbr {
    #[serde(rename = "baseColorFactor")]
    pub base_color_factor: [f32; 4],
    #[serde(rename = "metallicFactor")]
    pub metallic_factor: f32,
    #[serde(rename = "roughnessFactor")]
    pub roughness_factor: f32,
}

#[derive(Debug, Serialize)]
pub struct Accessor {
    #[serde(rename = "bufferView")]
    pub buffer_view: usize,
    #[serde(rename = "componentType")]
    pub component_type: u32,
    pub count: usize,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<[f32; 3]>,
}

#[derive(Debug, Serialize)]
pub struct BufferView {
    pub buffer: usize,
    #[serde(rename = "byteOffset")]
    pub byte_offset: usize,
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
    pub target: u32,
}

#[derive(Debug, Serialize)]
pub struct Buffer {
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
}
