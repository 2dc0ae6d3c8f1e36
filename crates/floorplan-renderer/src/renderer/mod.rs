//! GPU render backend.

mod gpu_resources;

use std::sync::Arc;

use thiserror::Error;

use crate::backend::{Frame, RenderBackend};
use crate::config::RendererConfig;
use crate::context::RenderContext;
use crate::plugin::RendererRegistry;
use crate::sub_renderers::{MeshSubRenderer, SkySubRenderer};
use crate::traits::SubRenderer;

pub use gpu_resources::*;

/// Errors while setting up the GPU backend
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("No compatible GPU adapter found")]
    NoAdapter,

    #[error("Failed to request GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("GPU validation failed during setup: {0}")]
    Validation(String),
}

/// Backend drawing the viewer scene into an offscreen texture with wgpu.
///
/// The host displays [`WgpuRenderer::color_view`]; whenever the target is
/// recreated (resize) [`WgpuRenderer::target_generation`] changes and the
/// host must register the new view again.
pub struct WgpuRenderer {
    ctx: RenderContext,
    registry: RendererRegistry,
    config: RendererConfig,
    color: (wgpu::Texture, wgpu::TextureView),
    depth: (wgpu::Texture, wgpu::TextureView),
    target_generation: u64,
    frames: u64,
}

impl WgpuRenderer {
    /// Create a backend on an existing device (e.g. the host UI's).
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        color_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: RendererConfig,
    ) -> Result<Self, RendererError> {
        let width = width.max(1);
        let height = height.max(1);

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let ctx = RenderContext::new(device.clone(), queue, color_format, width, height);

        let mut registry = RendererRegistry::new();
        registry.register(SkySubRenderer::new(config.show_sky));
        registry.register(MeshSubRenderer::new(&config));
        registry.init_all(&ctx);

        let color = create_color_target(&device, color_format, width, height);
        let depth = create_depth_texture(&device, width, height);

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RendererError::Validation(err.to_string()));
        }

        tracing::info!(
            "WGPU renderer ready: {}x{} {:?}, {} sub-renderers",
            width,
            height,
            color_format,
            registry.len()
        );

        Ok(Self {
            ctx,
            registry,
            config,
            color,
            depth,
            target_generation: 1,
            frames: 0,
        })
    }

    /// Create a backend on its own device without a window.
    pub fn new_headless(width: u32, height: u32, config: RendererConfig) -> Result<Self, RendererError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: None,
        }))
        .ok_or(RendererError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Floorplan Viewer Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))?;

        Self::new(
            Arc::new(device),
            Arc::new(queue),
            wgpu::TextureFormat::Rgba8UnormSrgb,
            width,
            height,
            config,
        )
    }

    /// View of the color target holding the last frame
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color.1
    }

    pub fn color_texture(&self) -> &wgpu::Texture {
        &self.color.0
    }

    /// Bumped every time the color target is recreated
    pub fn target_generation(&self) -> u64 {
        self.target_generation
    }

    pub fn device(&self) -> &wgpu::Device {
        self.ctx.device()
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Replace the renderer settings.
    ///
    /// The sub-renderers are rebuilt; GPU meshes are uploaded again on the
    /// next frame.
    pub fn set_config(&mut self, config: RendererConfig) {
        let mut sky = SkySubRenderer::new(config.show_sky);
        let mut mesh = MeshSubRenderer::new(&config);
        sky.on_init(&self.ctx);
        mesh.on_init(&self.ctx);
        self.registry.register(sky);
        self.registry.register(mesh);

        tracing::debug!("Renderer settings applied: {:?}", self.registry.names());
        self.config = config;
    }
}

impl RenderBackend for WgpuRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if (width, height) == (self.ctx.width(), self.ctx.height()) {
            return;
        }

        self.ctx.resize(width, height);
        self.color = create_color_target(self.ctx.device(), self.ctx.color_format(), width, height);
        self.depth = create_depth_texture(self.ctx.device(), width, height);
        self.target_generation += 1;
        self.registry.resize_all(&self.ctx, width, height);

        tracing::debug!("Render target resized to {}x{}", width, height);
    }

    fn size(&self) -> (u32, u32) {
        (self.ctx.width(), self.ctx.height())
    }

    fn render(&mut self, frame: &Frame<'_>) {
        self.ctx.update_camera(&frame.camera.uniform());
        self.ctx.update_lights(&frame.lights.uniform());
        self.registry.prepare_all(&self.ctx, frame);

        let mut encoder = self
            .ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewer Render Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Viewer Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.color.1,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.config.clear_color_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.1,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.registry.render_all(&mut pass, &self.ctx);
        }

        self.ctx.queue().submit(std::iter::once(encoder.finish()));
        self.frames += 1;
    }

    fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

impl Drop for WgpuRenderer {
    fn drop(&mut self) {
        self.registry.destroy_all();
    }
}
