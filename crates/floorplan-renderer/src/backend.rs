//! Render backends the viewer draws through.

use crate::camera::Camera;
use crate::light::LightRig;
use crate::resources::MeshStore;
use crate::scene::Scene;
use crate::skybox::Skybox;

/// Everything needed to draw one frame
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub meshes: &'a MeshStore,
    pub camera: &'a Camera,
    pub lights: &'a LightRig,
    pub skybox: &'a Skybox,
}

/// Output surface of the viewer.
///
/// The viewer only needs to resize the surface and submit frames; a GPU
/// implementation lives in [`crate::renderer::WgpuRenderer`].
pub trait RenderBackend {
    /// Resize the output surface in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Current output size in physical pixels.
    fn size(&self) -> (u32, u32);

    /// Draw one frame.
    fn render(&mut self, frame: &Frame<'_>);

    /// Number of frames drawn since creation.
    fn frames_rendered(&self) -> u64;
}

/// Backend that draws nothing and records what it was asked to draw
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    width: u32,
    height: u32,
    frames: u64,
    last_object_count: usize,
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Number of visible objects in the last frame
    pub fn last_object_count(&self) -> usize {
        self.last_object_count
    }
}

impl RenderBackend for HeadlessRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn render(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        self.last_object_count = frame.scene.visible_sorted().len();
    }

    fn frames_rendered(&self) -> u64 {
        self.frames
    }
}
