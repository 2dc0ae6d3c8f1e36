//! SubRenderer trait definition.

use crate::backend::Frame;
use crate::context::RenderContext;

/// A sub-renderer that handles a specific type of rendering.
///
/// Sub-renderers are composable units registered with the
/// [`crate::renderer::WgpuRenderer`]. Each one draws a single visual element
/// (sky, meshes).
///
/// # Priority
///
/// Sub-renderers are executed in order of their priority (lower values first):
/// - 0-99: Background elements (sky)
/// - 100-199: Main geometry (floors, walls, items)
pub trait SubRenderer: Send + Sync {
    /// Returns the unique name of this sub-renderer.
    fn name(&self) -> &str;

    /// Returns the render priority (lower = rendered first).
    fn priority(&self) -> i32;

    /// Returns whether this sub-renderer is currently enabled.
    fn is_enabled(&self) -> bool;

    /// Enables or disables this sub-renderer.
    fn set_enabled(&mut self, enabled: bool);

    /// Called once when the render context is ready.
    ///
    /// Use this to create pipelines and other GPU resources.
    fn on_init(&mut self, ctx: &RenderContext);

    /// Called when the viewport is resized.
    fn on_resize(&mut self, _ctx: &RenderContext, _width: u32, _height: u32) {}

    /// Upload whatever the frame needs before the render pass begins.
    fn prepare(&mut self, ctx: &RenderContext, frame: &Frame<'_>);

    /// Execute the render commands.
    ///
    /// Called during the main render pass. The sub-renderer should set its
    /// pipeline, bind groups, and issue draw calls.
    fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, ctx: &'a RenderContext);

    /// Called when the sub-renderer is being destroyed.
    fn on_destroy(&mut self) {}
}
