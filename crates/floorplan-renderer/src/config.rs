//! Renderer configuration

use serde::{Deserialize, Serialize};

use crate::constants::highlight;

/// Settings of the GPU backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Clear color behind the sky (RGBA)
    pub clear_color: [f32; 4],
    /// Selection highlight tint (RGB) and mix factor (A)
    pub highlight_color: [f32; 4],
    /// Draw the gradient sky
    pub show_sky: bool,
    /// Strength of the environment reflection on meshes (0 disables)
    pub reflectivity: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [1.0, 1.0, 1.0, 1.0],
            highlight_color: highlight::COLOR,
            show_sky: true,
            reflectivity: 0.15,
        }
    }
}

impl RendererConfig {
    pub fn clear_color_wgpu(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color.map(f64::from);
        wgpu::Color { r, g, b, a }
    }
}
