//! View configuration.
//!
//! A [`ViewConfig`] is usually read from a small TOML file shipped next to
//! the gadget:
//!
//! ```toml
//! width = 200
//! height = 150
//! debug_mode = "containers"
//! animation_interval_ms = 16
//! max_surface_dimension = 4096
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::path::Path;
use std::time::Duration;

use gadget_render::SoftwareGraphics;
use serde::Deserialize;

use crate::error::ConfigError;

/// Diagnostic overlay drawn on top of elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugMode {
    /// No overlay.
    #[default]
    Off,
    /// Boxes around every element container.
    Containers,
    /// Boxes around every container and every element.
    All,
}

impl DebugMode {
    /// Whether container boxes are drawn.
    pub fn draws_containers(self) -> bool {
        matches!(self, Self::Containers | Self::All)
    }

    /// Whether per-element boxes are drawn.
    pub fn draws_elements(self) -> bool {
        self == Self::All
    }
}

/// Settings for a [`View`](crate::View).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Initial view width in pixels.
    pub width: f64,
    /// Initial view height in pixels.
    pub height: f64,
    /// Diagnostic overlay mode.
    pub debug_mode: DebugMode,
    /// Re-arm interval of animation timers, in milliseconds.
    pub animation_interval_ms: u64,
    /// Largest surface side the software graphics factory will allocate.
    pub max_surface_dimension: Option<u32>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            debug_mode: DebugMode::Off,
            animation_interval_ms: 10,
            max_surface_dimension: None,
        }
    }
}

impl ViewConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            target: "gadget::view",
            path = %path.display(),
            ?config,
            "view config loaded"
        );
        Ok(config)
    }

    /// The animation re-arm interval as a duration, at least one millisecond.
    pub fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.animation_interval_ms.max(1))
    }

    /// A software graphics factory honoring `max_surface_dimension`.
    pub fn software_graphics(&self) -> SoftwareGraphics {
        match self.max_surface_dimension {
            Some(limit) => SoftwareGraphics::with_max_dimension(limit),
            None => SoftwareGraphics::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_fields() {
        let config = ViewConfig::from_toml_str("width = 120.0").unwrap();
        assert_eq!(config.width, 120.0);
        assert_eq!(config.height, 0.0);
        assert_eq!(config.debug_mode, DebugMode::Off);
        assert_eq!(config.animation_interval(), Duration::from_millis(10));
        assert_eq!(config.max_surface_dimension, None);
    }

    #[test]
    fn test_debug_mode_names() {
        let config = ViewConfig::from_toml_str("debug_mode = \"all\"").unwrap();
        assert_eq!(config.debug_mode, DebugMode::All);
        assert!(config.debug_mode.draws_containers());
        assert!(config.debug_mode.draws_elements());
        assert!(!DebugMode::Containers.draws_elements());

        let err = ViewConfig::from_toml_str("debug_mode = \"loud\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_animation_interval_is_clamped() {
        let config = ViewConfig::from_toml_str("animation_interval_ms = 0").unwrap();
        assert_eq!(config.animation_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_max_surface_dimension() {
        let config = ViewConfig::from_toml_str("max_surface_dimension = 64").unwrap();
        assert_eq!(config.software_graphics().max_dimension(), Some(64));
    }
}
