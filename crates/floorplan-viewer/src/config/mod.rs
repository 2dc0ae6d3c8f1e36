//! Viewer configuration
//!
//! Options, camera controls and renderer settings persisted between runs.

mod manager;

pub use manager::{ConfigError, ConfigManager, SharedConfig, create_shared_config};

use floorplan_renderer::RendererConfig;
use serde::{Deserialize, Serialize};

use crate::options::ViewerOptions;

/// Orbit-control limits and speeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Closest the camera may orbit to its target (cm)
    pub min_distance: f32,
    /// Farthest the camera may orbit from its target (cm)
    pub max_distance: f32,
    /// Largest polar angle from straight up, in radians
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            min_distance: 10.0,
            max_distance: 2500.0,
            max_polar_angle: std::f32::consts::PI,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ViewerConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub options: ViewerOptions,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
}

impl ViewerConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_version() {
        let config = ViewerConfig::new();
        assert_eq!(config.version, ViewerConfig::CURRENT_VERSION);
        assert_eq!(config.controls.max_distance, 2500.0);
    }

    #[test]
    fn test_ron_roundtrip_preserves_changes() {
        let mut config = ViewerConfig::new();
        config.options.click_pan = false;
        config.controls.min_distance = 50.0;
        config.renderer.show_sky = false;

        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let parsed: ViewerConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_sections_default() {
        let parsed: ViewerConfig = ron::from_str("(version: 1)").unwrap();
        assert_eq!(parsed.options, ViewerOptions::default());
        assert_eq!(parsed.controls, ControlsConfig::default());
    }
}
