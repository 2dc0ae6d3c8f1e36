//! Sky sub-renderer.
//!
//! Draws the gradient behind everything and, whenever the sky changes,
//! renders it through the environment camera into the reflection cube.

use crate::backend::Frame;
use crate::camera::CameraUniform;
use crate::constants::environment;
use crate::context::RenderContext;
use crate::pipeline::PipelineConfig;
use crate::skybox::Skybox;
use crate::traits::SubRenderer;

/// Per-face resources of the environment cube
struct CubeFace {
    view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct SkySubRenderer {
    enabled: bool,
    /// Draw the gradient behind the scene; the cube is captured either way
    show_background: bool,
    pipeline: Option<wgpu::RenderPipeline>,
    cube_pipeline: Option<wgpu::RenderPipeline>,
    sky_buffer: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
    faces: Vec<CubeFace>,
    /// Sky last captured into the environment cube
    captured: Option<Skybox>,
}

impl SkySubRenderer {
    pub fn new(show_background: bool) -> Self {
        Self {
            enabled: true,
            show_background,
            pipeline: None,
            cube_pipeline: None,
            sky_buffer: None,
            bind_group: None,
            faces: Vec::new(),
            captured: None,
        }
    }

    fn capture_environment(&self, ctx: &RenderContext, skybox: &Skybox) {
        let Some(pipeline) = &self.cube_pipeline else {
            return;
        };

        let env = &skybox.environment;
        for (face, view_proj) in self.faces.iter().zip(env.face_view_projections()) {
            let uniform = CameraUniform {
                view_proj: view_proj.to_cols_array_2d(),
                inv_view_proj: view_proj.inverse().to_cols_array_2d(),
                position: env.position.extend(1.0).to_array(),
            };
            ctx.write_buffer(&face.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
        }

        let mut encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Environment Capture Encoder"),
            });

        for face in &self.faces {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Environment Face Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &face.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &face.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        ctx.queue().submit(std::iter::once(encoder.finish()));
        tracing::debug!("Captured sky into environment cube");
    }
}

impl Default for SkySubRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SubRenderer for SkySubRenderer {
    fn name(&self) -> &str {
        "sky"
    }

    fn priority(&self) -> i32 {
        super::priorities::SKY
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn on_init(&mut self, ctx: &RenderContext) {
        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let layout = ctx
            .device()
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Sky Bind Group Layout"),
                entries: &[uniform_entry(0), uniform_entry(1)],
            });

        let source = include_str!("../shaders/sky.wgsl");
        let pipeline = PipelineConfig::new(
            "Sky",
            source,
            ctx.color_format(),
            Some(ctx.depth_format()),
            &[&layout],
        )
        .with_cull_mode(None)
        .with_depth_read_only()
        .with_blend(None)
        .build(ctx.device());

        let cube_pipeline = PipelineConfig::new("Sky Cube", source, environment::FORMAT, None, &[&layout])
            .with_cull_mode(None)
            .with_blend(None)
            .build(ctx.device());

        let sky_buffer = ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sky Buffer"),
            contents: bytemuck::cast_slice(&[Skybox::default().uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sky Bind Group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ctx.camera_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: sky_buffer.as_entire_binding(),
                },
            ],
        });

        self.faces = (0..6)
            .map(|layer| {
                let view = ctx
                    .environment_texture()
                    .create_view(&wgpu::TextureViewDescriptor {
                        label: Some("Environment Face View"),
                        dimension: Some(wgpu::TextureViewDimension::D2),
                        base_array_layer: layer,
                        array_layer_count: Some(1),
                        ..Default::default()
                    });
                let camera_buffer = ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Environment Face Camera"),
                    contents: bytemuck::cast_slice(&[CameraUniform::default()]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Environment Face Bind Group"),
                    layout: &layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: camera_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: sky_buffer.as_entire_binding(),
                        },
                    ],
                });
                CubeFace {
                    view,
                    camera_buffer,
                    bind_group,
                }
            })
            .collect();

        self.pipeline = Some(pipeline);
        self.cube_pipeline = Some(cube_pipeline);
        self.sky_buffer = Some(sky_buffer);
        self.bind_group = Some(bind_group);
        self.captured = None;
    }

    fn prepare(&mut self, ctx: &RenderContext, frame: &Frame<'_>) {
        if self.captured.as_ref() == Some(frame.skybox) {
            return;
        }
        let Some(sky_buffer) = &self.sky_buffer else {
            return;
        };

        ctx.write_buffer(sky_buffer, 0, bytemuck::cast_slice(&[frame.skybox.uniform()]));
        self.capture_environment(ctx, frame.skybox);
        self.captured = Some(frame.skybox.clone());
    }

    fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, _ctx: &'a RenderContext) {
        if !self.show_background {
            return;
        }
        let (Some(pipeline), Some(bind_group)) = (&self.pipeline, &self.bind_group) else {
            return;
        };

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    fn on_destroy(&mut self) {
        self.faces.clear();
        self.pipeline = None;
        self.cube_pipeline = None;
        self.sky_buffer = None;
        self.bind_group = None;
    }
}
