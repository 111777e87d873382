//! Configuration options for conescope.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Window and interaction settings.
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Window width in pixels.
    pub window_width: u32,

    /// Window height in pixels.
    pub window_height: u32,

    /// Window title.
    pub title: String,

    /// Renderer background color.
    pub background_color: Vec3,

    /// Whether presentation waits for vertical sync.
    pub vsync: bool,

    /// Scale applied to mouse motion by the trackball style.
    pub motion_factor: f32,

    /// Scale applied to wheel steps by the trackball style.
    pub mouse_wheel_motion_factor: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            window_width: 300,
            window_height: 300,
            title: "conescope".to_string(),
            background_color: Vec3::new(0.1, 0.2, 0.4),
            vsync: true,
            motion_factor: 10.0,
            mouse_wheel_motion_factor: 1.0,
        }
    }
}

impl Options {
    /// Parses options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = Options::from_json_str(r#"{ "window_width": 640, "title": "cone" }"#).unwrap();
        assert_eq!(options.window_width, 640);
        assert_eq!(options.window_height, 300);
        assert_eq!(options.title, "cone");
        assert_eq!(options.background_color, Vec3::new(0.1, 0.2, 0.4));
    }

    #[test]
    fn test_bad_json() {
        assert!(Options::from_json_str("{ window_width: }").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Options::from_json_file("/nonexistent/conescope.json"),
            Err(crate::SceneError::Io(_))
        ));
    }
}
