//! Mesh sub-renderer.
//!
//! Mirrors the [`MeshStore`](crate::resources::MeshStore) on the GPU and
//! draws every visible scene object as an instance of its mesh.

use std::collections::HashMap;
use std::ops::Range;

use crate::backend::Frame;
use crate::config::RendererConfig;
use crate::context::RenderContext;
use crate::pipeline::PipelineConfig;
use crate::resources::{MeshData, MeshHandle};
use crate::traits::SubRenderer;
use crate::vertex::{InstanceRaw, MeshVertex};

/// GPU copy of one mesh
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(ctx: &RenderContext, data: &MeshData) -> Self {
        Self {
            vertex_buffer: ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            index_buffer: ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: data.indices.len() as u32,
        }
    }
}

/// Consecutive instances sharing one mesh
struct Batch {
    mesh: MeshHandle,
    instances: Range<u32>,
}

pub struct MeshSubRenderer {
    enabled: bool,
    highlight_color: [f32; 4],
    reflectivity: f32,
    pipeline: Option<wgpu::RenderPipeline>,
    material_bind_group: Option<wgpu::BindGroup>,
    meshes: HashMap<MeshHandle, GpuMesh>,
    instance_buffer: Option<wgpu::Buffer>,
    instance_capacity: usize,
    batches: Vec<Batch>,
}

impl MeshSubRenderer {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            enabled: true,
            highlight_color: config.highlight_color,
            reflectivity: config.reflectivity,
            pipeline: None,
            material_bind_group: None,
            meshes: HashMap::new(),
            instance_buffer: None,
            instance_capacity: 0,
            batches: Vec::new(),
        }
    }

    fn sync_meshes(&mut self, ctx: &RenderContext, frame: &Frame<'_>) {
        let before = self.meshes.len();
        self.meshes.retain(|handle, _| frame.meshes.contains(*handle));
        let released = before - self.meshes.len();

        let mut uploaded = 0;
        for (handle, data) in frame.meshes.iter() {
            if data.indices.is_empty() || self.meshes.contains_key(&handle) {
                continue;
            }
            self.meshes.insert(handle, GpuMesh::upload(ctx, data));
            uploaded += 1;
        }

        if uploaded > 0 || released > 0 {
            tracing::debug!("GPU meshes: {} uploaded, {} released", uploaded, released);
        }
    }

    fn write_instances(&mut self, ctx: &RenderContext, instances: &[InstanceRaw]) {
        if instances.is_empty() {
            return;
        }

        if self.instance_buffer.is_none() || instances.len() > self.instance_capacity {
            let capacity = instances.len().next_power_of_two();
            self.instance_buffer = Some(ctx.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some("Mesh Instance Buffer"),
                size: (capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.instance_capacity = capacity;
        }

        if let Some(buffer) = &self.instance_buffer {
            ctx.write_buffer(buffer, 0, bytemuck::cast_slice(instances));
        }
    }
}

impl SubRenderer for MeshSubRenderer {
    fn name(&self) -> &str {
        "mesh"
    }

    fn priority(&self) -> i32 {
        super::priorities::MESH
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn on_init(&mut self, ctx: &RenderContext) {
        let material_layout =
            ctx.device()
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Material Bind Group Layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let pipeline = PipelineConfig::new(
            "Mesh",
            include_str!("../shaders/mesh.wgsl"),
            ctx.color_format(),
            Some(ctx.depth_format()),
            &[ctx.frame_bind_group_layout(), &material_layout],
        )
        .with_vertex_layouts(vec![MeshVertex::layout(), InstanceRaw::layout()])
        .build(ctx.device());

        let material_buffer = ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Buffer"),
            contents: bytemuck::cast_slice(&[[self.reflectivity, 0.0, 0.0, 0.0]]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let material_bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: material_buffer.as_entire_binding(),
            }],
        });

        self.pipeline = Some(pipeline);
        self.material_bind_group = Some(material_bind_group);
    }

    fn prepare(&mut self, ctx: &RenderContext, frame: &Frame<'_>) {
        self.sync_meshes(ctx, frame);

        let mut instances = Vec::new();
        self.batches.clear();

        for object in frame.scene.visible_sorted() {
            if !self.meshes.contains_key(&object.mesh) {
                continue;
            }
            let highlight = object.selected.then_some(self.highlight_color);
            let index = instances.len() as u32;
            instances.push(InstanceRaw::new(object.transform, object.color, highlight));

            match self.batches.last_mut() {
                Some(batch) if batch.mesh == object.mesh => batch.instances.end = index + 1,
                _ => self.batches.push(Batch {
                    mesh: object.mesh,
                    instances: index..index + 1,
                }),
            }
        }

        self.write_instances(ctx, &instances);
    }

    fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, ctx: &'a RenderContext) {
        let (Some(pipeline), Some(material), Some(instances)) = (
            &self.pipeline,
            &self.material_bind_group,
            &self.instance_buffer,
        ) else {
            return;
        };
        if self.batches.is_empty() {
            return;
        }

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, ctx.frame_bind_group(), &[]);
        pass.set_bind_group(1, material, &[]);
        pass.set_vertex_buffer(1, instances.slice(..));

        for batch in &self.batches {
            let Some(mesh) = self.meshes.get(&batch.mesh) else {
                continue;
            };
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, batch.instances.clone());
        }
    }

    fn on_destroy(&mut self) {
        self.meshes.clear();
        self.batches.clear();
        self.instance_buffer = None;
        self.instance_capacity = 0;
        self.pipeline = None;
        self.material_bind_group = None;
    }
}
