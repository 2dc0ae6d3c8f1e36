//! Rendering constants

/// Camera defaults (scene units are centimetres)
pub mod camera {
    /// Vertical field of view in degrees
    pub const FOV_DEGREES: f32 = 45.0;
    pub const NEAR: f32 = 10.0;
    pub const FAR: f32 = 10000.0;
    /// Initial camera position before any floorplan is known
    pub const INITIAL_POSITION: [f32; 3] = [0.0, 600.0, 1500.0];
}

/// Selection highlight
pub mod highlight {
    /// Tint mixed into a selected object's base color (RGB) and mix factor (A)
    pub const COLOR: [f32; 4] = [0.25, 0.55, 1.0, 0.45];
}

/// Viewport defaults
pub mod viewport {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
}

/// Environment (reflection) cube
pub mod environment {
    /// Face resolution of the environment cube texture
    pub const RESOLUTION: u32 = 16;
    pub const NEAR: f32 = 1.0;
    pub const FAR: f32 = 100000.0;
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
}
