//! GPU vertex and instance layouts

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

/// Mesh vertex: position and normal
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Per-object instance data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct InstanceRaw {
    /// Model matrix columns
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model's upper 3x3, padded to vec4 columns
    pub normal: [[f32; 4]; 3],
    /// Base color (RGBA)
    pub color: [f32; 4],
    /// Highlight tint (RGB) and mix factor (A, zero when not selected)
    pub highlight: [f32; 4],
}

impl InstanceRaw {
    pub fn new(transform: Mat4, color: [f32; 4], highlight: Option<[f32; 4]>) -> Self {
        let normal = Mat3::from_mat4(transform).inverse().transpose();
        let col = |v: Vec3| [v.x, v.y, v.z, 0.0];
        Self {
            model: transform.to_cols_array_2d(),
            normal: [col(normal.x_axis), col(normal.y_axis), col(normal.z_axis)],
            color,
            highlight: highlight.unwrap_or([0.0; 4]),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 9] = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
            7 => Float32x4,
            8 => Float32x4,
            9 => Float32x4,
            10 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_size_matches_layout() {
        // 4 + 3 + 1 + 1 vec4 columns
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 9 * 16);
    }

    #[test]
    fn test_unselected_instance_has_no_highlight() {
        let raw = InstanceRaw::new(Mat4::IDENTITY, [1.0; 4], None);
        assert_eq!(raw.highlight[3], 0.0);
        assert_eq!(raw.normal[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
