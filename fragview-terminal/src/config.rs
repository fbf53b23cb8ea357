//! Viewer configuration
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which object draws the demo function surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// Height field over a regular grid
    Mesh,
    /// Cell-centred values with averaged corners
    DataMesh,
}

/// Settings read from an optional TOML file; anything missing keeps its
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub target_fps: u32,
    pub surface: SurfaceKind,
    /// Samples per side of the function surface
    pub surface_steps: usize,
    pub high_res: bool,
    pub wireframe: bool,
    /// Initial rotation about x, y, z in radians
    pub initial_rotation: [f64; 3],
    /// Rotation added every frame
    pub spin: [f64; 3],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            surface: SurfaceKind::Mesh,
            surface_steps: 16,
            high_res: false,
            wireframe: true,
            initial_rotation: [0.3, 0.3, 0.0],
            spin: [0.0, 0.015, 0.0],
        }
    }
}

impl ViewerConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be positive".to_string()));
        }
        if self.surface_steps < 2 {
            return Err(ConfigError::Invalid(format!(
                "surface_steps must be at least 2, got {}",
                self.surface_steps
            )));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
            surface = "data_mesh"
            high_res = true
            "#,
        )
        .unwrap();
        assert_eq!(config.surface, SurfaceKind::DataMesh);
        assert!(config.high_res);
        assert_eq!(config.target_fps, 30);
        assert!(config.wireframe);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ViewerConfig::from_toml_str("").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            ViewerConfig::from_toml_str("target_fps = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::from_toml_str("surface = \"teapot\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_written_config_reads_back() {
        let mut config = ViewerConfig::default();
        config.spin = [0.01, 0.0, 0.02];
        let text = config.to_toml_string().unwrap();
        assert_eq!(ViewerConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ViewerConfig::load_from_file("/nonexistent/fragview.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
