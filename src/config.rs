//! Viewer configuration
//!
//! Uses RON (Rusty Object Notation) for a human-readable config file.
//! Every field is optional; missing ones take the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rasterizer::Vec3;

/// Default config file looked up next to the executable's working directory
pub const DEFAULT_CONFIG_PATH: &str = "viewer.ron";

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::SerializeError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A point light in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub position: Vec3,
    pub color: Vec3,
}

/// Everything the viewer needs to set up the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_width: u32,
    pub window_height: u32,
    /// Render target size relative to the window
    pub render_scale: f32,
    /// `.triangle_mesh` file; the built-in cube is drawn when unset
    pub mesh: Option<String>,
    /// Albedo image; a checkerboard is used when unset
    pub texture: Option<String>,
    pub camera_position: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub model_offset: Vec3,
    pub model_scale: f32,
    /// Model turntable speed in radians per second
    pub rotation_speed: f32,
    /// At most 4 are used
    pub lights: Vec<LightConfig>,
    /// `env_logger` filter, `RUST_LOG` applies when unset
    pub log_filter: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            render_scale: 1.0,
            mesh: None,
            texture: None,
            camera_position: Vec3::new(0.0, 0.0, -2.0),
            fov_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
            model_offset: Vec3::new(0.0, -0.25, -0.5),
            model_scale: 1.0,
            rotation_speed: 1.0,
            lights: vec![
                LightConfig {
                    position: Vec3::new(10.0, 0.0, -10.0),
                    color: Vec3::new(0.8, 0.6, 0.1),
                },
                LightConfig {
                    position: Vec3::new(-10.0, 0.0, -10.0),
                    color: Vec3::new(0.4, 0.4, 0.4),
                },
            ],
            log_filter: None,
        }
    }
}

impl ViewerConfig {
    /// Render target size: window size times `render_scale`, clamped to
    /// `1..=u16::MAX` per side so it fits a display texture
    pub fn render_size(&self) -> (usize, usize) {
        let max = u16::MAX as usize;
        let w = (self.window_width as f32 * self.render_scale) as usize;
        let h = (self.window_height as f32 * self.render_scale) as usize;
        (w.clamp(1, max), h.clamp(1, max))
    }
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ViewerConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load a config from a RON string
pub fn load_config_from_str(s: &str) -> Result<ViewerConfig, ConfigError> {
    Ok(ron::from_str(s)?)
}

/// Load `path` if it exists, defaults otherwise. A file that exists but
/// fails to parse is reported and replaced by the defaults.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> ViewerConfig {
    let path = path.as_ref();
    if !path.exists() {
        return ViewerConfig::default();
    }
    match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {}, using defaults", path.display(), e);
            ViewerConfig::default()
        }
    }
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &ViewerConfig, path: P) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(load_config_from_str("()").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = load_config_from_str(
            r#"(
                window_width: 320,
                render_scale: 0.5,
                mesh: Some("data/chest.triangle_mesh"),
                camera_position: (x: 1.0, y: 2.0, z: 3.0),
            )"#,
        )
        .unwrap();
        assert_eq!(config.window_width, 320);
        assert_eq!(config.window_height, 600);
        assert_eq!(config.mesh.as_deref(), Some("data/chest.triangle_mesh"));
        assert_eq!(config.camera_position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.render_size(), (160, 300));
    }

    #[test]
    fn test_render_size_is_clamped() {
        let config = ViewerConfig {
            window_width: 70_000,
            window_height: 600,
            render_scale: 2.0,
            ..Default::default()
        };
        assert_eq!(config.render_size(), (u16::MAX as usize, 1200));

        let tiny = ViewerConfig {
            render_scale: 0.0,
            ..Default::default()
        };
        assert_eq!(tiny.render_size(), (1, 1));
    }

    #[test]
    fn test_bad_config_is_error() {
        assert!(matches!(load_config_from_str("(window_width: \"wide\")"), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        assert_eq!(load_config_or_default("no/such/viewer.ron"), ViewerConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("softpipe-viewer-{}.ron", std::process::id()));
        let mut config = ViewerConfig::default();
        config.texture = Some("data/chest.jpg".to_string());
        config.lights.truncate(1);
        save_config(&config, &path).unwrap();
        let loaded = load_config(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.unwrap(), config);
    }
}
