//! Configuration manager for loading, saving, and sharing the viewer configuration

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use super::ViewerConfig;

/// Shared configuration manager type
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] ron::error::SpannedError),
}

/// Loads, holds and saves the viewer configuration
pub struct ConfigManager {
    config: ViewerConfig,
    config_path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Create a manager for the OS-standard location, loading from disk if available
    pub fn new() -> Self {
        Self::with_path(Self::default_path())
    }

    /// Create a manager backed by a specific file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let config = match Self::load_from_path(&config_path) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", config_path);
                config
            }
            Err(ConfigError::Io(_)) => {
                tracing::info!("No config file found, using defaults");
                ViewerConfig::new()
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file: {}", e);
                ViewerConfig::new()
            }
        };

        Self {
            config,
            config_path,
            dirty: false,
        }
    }

    fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("floorplan-viewer")
    }

    fn default_path() -> PathBuf {
        Self::config_dir().join("config.ron")
    }

    fn load_from_path(path: &Path) -> Result<ViewerConfig, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&content)?)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Mutable access (marks the configuration dirty)
    pub fn config_mut(&mut self) -> &mut ViewerConfig {
        self.dirty = true;
        &mut self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the configuration if it changed since the last save
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())?;
        std::fs::write(&self.config_path, content)?;

        tracing::info!("Saved config to {:?}", self.config_path);
        self.dirty = false;
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.config = ViewerConfig::new();
        self.dirty = true;
    }

    /// Path of the backing file (for display purposes)
    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a new shared configuration manager
pub fn create_shared_config() -> SharedConfig {
    Arc::new(RwLock::new(ConfigManager::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("floorplan-viewer-test-{}", Uuid::new_v4()))
            .join("config.ron")
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let manager = ConfigManager::with_path(temp_config_path());
        assert_eq!(manager.config(), &ViewerConfig::new());
        assert!(!manager.is_dirty());
    }

    #[test]
    fn test_save_then_reload() {
        let path = temp_config_path();
        let mut manager = ConfigManager::with_path(&path);
        manager.config_mut().options.can_move_fixed_items = true;
        assert!(manager.is_dirty());
        manager.save().unwrap();
        assert!(!manager.is_dirty());

        let reloaded = ConfigManager::with_path(&path);
        assert!(reloaded.config().options.can_move_fixed_items);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let path = temp_config_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not ron at all (").unwrap();

        let manager = ConfigManager::with_path(&path);
        assert_eq!(manager.config(), &ViewerConfig::new());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_reset_marks_dirty() {
        let mut manager = ConfigManager::with_path(temp_config_path());
        manager.reset_to_defaults();
        assert!(manager.is_dirty());
    }
}
