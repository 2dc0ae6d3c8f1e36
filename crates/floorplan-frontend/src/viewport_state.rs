//! Viewport texture registration

use floorplan_renderer::WgpuRenderer;

/// The viewer's color target as registered with egui
struct RegisteredTexture {
    egui_texture_id: egui::TextureId,
    generation: u64,
}

/// Keeps the egui texture in step with the renderer target.
///
/// The renderer recreates its color target on resize; the registration is
/// renewed whenever the target generation changes.
#[derive(Default)]
pub struct ViewportState {
    texture: Option<RegisteredTexture>,
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture id of the renderer's current color target
    pub fn ensure_texture(
        &mut self,
        renderer: &WgpuRenderer,
        render_state: &egui_wgpu::RenderState,
    ) -> egui::TextureId {
        let generation = renderer.target_generation();

        match &self.texture {
            Some(texture) if texture.generation == generation => texture.egui_texture_id,
            _ => {
                let mut egui_renderer = render_state.renderer.write();

                // Free old texture if exists
                if let Some(old) = self.texture.take() {
                    egui_renderer.free_texture(&old.egui_texture_id);
                }

                let egui_texture_id = egui_renderer.register_native_texture(
                    &render_state.device,
                    renderer.color_view(),
                    wgpu::FilterMode::Linear,
                );
                tracing::debug!("Registered viewport texture (generation {})", generation);

                self.texture = Some(RegisteredTexture {
                    egui_texture_id,
                    generation,
                });
                egui_texture_id
            }
        }
    }

    /// Drop the registration, e.g. before replacing the renderer
    pub fn release(&mut self, render_state: &egui_wgpu::RenderState) {
        if let Some(old) = self.texture.take() {
            render_state.renderer.write().free_texture(&old.egui_texture_id);
        }
    }
}
