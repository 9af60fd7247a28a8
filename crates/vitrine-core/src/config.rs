//! Viewer configuration
//!
//! Loaded from TOML on native builds and from JSON (fetched via `?config=`) in
//! the browser. Every section is optional; missing values use defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::ConfigError;
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Initial values for every panel setting
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub assets: AssetConfig,
    #[serde(default)]
    pub orbit: OrbitConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// CSS selector of the canvas to render into (browser only)
    #[serde(default = "default_canvas")]
    pub canvas: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            canvas: default_canvas(),
        }
    }
}

fn default_title() -> String {
    "Vitrine".to_string()
}

fn default_canvas() -> String {
    "#vitrine-canvas".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Font used for generated text
    #[serde(default = "default_font")]
    pub font: String,
    /// glTF file holding the teapot mesh
    #[serde(default = "default_teapot")]
    pub teapot: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            font: default_font(),
            teapot: default_teapot(),
        }
    }
}

fn default_font() -> String {
    "fonts/helvetiker_regular.ttf".to_string()
}

fn default_teapot() -> String {
    "models/teapot.glb".to_string()
}

/// Orbit camera limits and input sensitivity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitConfig {
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    /// Largest polar angle from +Y, in radians
    #[serde(default = "default_max_polar")]
    pub max_polar_angle: f32,
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
            max_polar_angle: default_max_polar(),
            sensitivity: default_sensitivity(),
            zoom_speed: default_zoom_speed(),
        }
    }
}

fn default_min_distance() -> f32 {
    1.0
}

fn default_max_distance() -> f32 {
    10.0
}

fn default_max_polar() -> f32 {
    std::f32::consts::PI
}

fn default_sensitivity() -> f32 {
    0.005
}

fn default_zoom_speed() -> f32 {
    0.1
}

impl ViewerConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: ViewerConfig = toml::from_str(content)?;
        config.settings.sanitize();
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let mut config: ViewerConfig = serde_json::from_str(content)?;
        config.settings.sanitize();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config = Self::from_file(path)?;
            info!(path = %path.display(), "Loaded configuration");
            Ok(config)
        } else {
            info!(
                path = %path.display(),
                "Configuration file not found, using defaults"
            );
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AnimationKind, MaterialKind, Rgb, ShapeKind};

    #[test]
    fn test_partial_toml() {
        let toml = r##"
[settings.geometry]
shape = "wheel"
material = "solid"

[settings.light]
color = "#ff0000"
x = 500.0

[settings.animation]
kind = "circle"

[assets]
font = "fonts/roboto.ttf"
"##;

        let config = ViewerConfig::from_toml(toml).unwrap();
        assert_eq!(config.settings.geometry.shape, ShapeKind::Wheel);
        assert_eq!(config.settings.geometry.material, MaterialKind::Solid);
        assert_eq!(config.settings.light.color, Rgb::from_u32(0xff0000));
        // Clamped into range
        assert_eq!(config.settings.light.x, 50.0);
        // Untouched fields keep defaults
        assert_eq!(config.settings.light.y, 4.0);
        assert_eq!(config.settings.animation.kind, AnimationKind::Circle);
        assert_eq!(config.assets.font, "fonts/roboto.ttf");
        assert_eq!(config.assets.teapot, "models/teapot.glb");
        assert_eq!(config.window.canvas, "#vitrine-canvas");
    }

    #[test]
    fn test_bad_color_rejected() {
        let toml = r#"
[settings.light]
color = "orange"
"#;
        assert!(matches!(
            ViewerConfig::from_toml(toml),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_json() {
        let json = r#"{ "settings": { "display": { "scale": 3.0, "show_axes": false } } }"#;
        let config = ViewerConfig::from_json(json).unwrap();
        assert_eq!(config.settings.display.scale, 3.0);
        assert!(!config.settings.display.show_axes);
        assert_eq!(config.orbit, OrbitConfig::default());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitrine.toml");

        let mut config = ViewerConfig::default();
        config.settings.bonus.text = "Vitrine".to_string();
        config.orbit.max_distance = 40.0;
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();

        let loaded = ViewerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
