//! Engine configuration.

use crate::error::ConfigError;
use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable constants for the board engine.
///
/// Every field has a default, so a config file only needs to list the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Minimum zoom level.
    pub min_zoom: f64,
    /// Maximum zoom level.
    pub max_zoom: f64,
    /// Zoom increment for zoom in/out commands.
    pub zoom_step: f64,
    /// Zoom change per wheel delta unit.
    pub scroll_zoom_sensitivity: f64,
    /// Grid spacing in canvas units.
    pub grid_size: f64,
    /// Rotation snap increment in degrees.
    pub angle_snap_degrees: f64,
    /// Maximum number of history snapshots.
    pub history_capacity: usize,
    /// Offset applied to pasted and duplicated elements.
    pub paste_offset: Vec2,
    /// Resize handle size in screen pixels.
    pub handle_size: f64,
    /// Distance of the rotate handle above the top edge, in screen pixels.
    pub rotate_handle_offset: f64,
    /// Connector hit distance in screen pixels.
    pub connector_hit_threshold: f64,
    /// Marquee rectangles smaller than this (in canvas units) count as clicks.
    pub marquee_min_size: f64,
    /// Padding around content for fit-to-content, in screen pixels.
    pub fit_padding: f64,
    /// Longest side of a freshly inserted image.
    pub max_image_side: f64,
    /// Initial viewport size in screen pixels.
    pub viewport: Size,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_step: 0.1,
            scroll_zoom_sensitivity: 0.001,
            grid_size: 20.0,
            angle_snap_degrees: 15.0,
            history_capacity: 50,
            paste_offset: Vec2::new(20.0, 20.0),
            handle_size: 12.0,
            rotate_handle_offset: 25.0,
            connector_hit_threshold: 10.0,
            marquee_min_size: 5.0,
            fit_padding: 50.0,
            max_image_side: 600.0,
            viewport: Size::new(800.0, 600.0),
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Load a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Fix up values that would break the engine.
    fn sanitized(mut self) -> Self {
        if self.min_zoom <= 0.0 {
            log::warn!("min_zoom must be positive, using default");
            self.min_zoom = Self::default().min_zoom;
        }
        if self.max_zoom < self.min_zoom {
            log::warn!("max_zoom below min_zoom, clamping");
            self.max_zoom = self.min_zoom;
        }
        if self.history_capacity == 0 {
            self.history_capacity = 1;
        }
        if self.grid_size <= 0.0 {
            self.grid_size = Self::default().grid_size;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!((config.min_zoom - 0.1).abs() < f64::EPSILON);
        assert!((config.max_zoom - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.history_capacity, 50);
        assert!((config.paste_offset.x - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json_str(r#"{"maxZoom": 8.0, "gridSize": 10}"#).unwrap();
        assert!((config.max_zoom - 8.0).abs() < f64::EPSILON);
        assert!((config.grid_size - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.history_capacity, 50);
    }

    #[test]
    fn test_sanitize() {
        let config =
            EngineConfig::from_json_str(r#"{"minZoom": 2.0, "maxZoom": 1.0, "historyCapacity": 0}"#)
                .unwrap();
        assert!((config.max_zoom - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.history_capacity, 1);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"historyCapacity": 12}}"#).unwrap();
        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.history_capacity, 12);
    }

    #[test]
    fn test_invalid_json() {
        let result = EngineConfig::from_json_str("not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
