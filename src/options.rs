//! Centralized viewer options with TOML preset support.
//!
//! All tweakable settings for the embedded viewer (interaction bounds,
//! camera parameters, colors, rendering-library source) are consolidated
//! here. Options serialize to/from TOML so hosts can ship view presets.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GlimpseError;

/// Options controlling the generated viewer content and its interaction
/// behavior. Uses `#[serde(default)]` so partial TOML files (e.g. only
/// overriding the scale bounds) work correctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Lower bound of the subject scale factor.
    pub min_scale: f32,
    /// Upper bound of the subject scale factor.
    pub max_scale: f32,
    /// Multiplier applied per zoom-in wheel step.
    pub zoom_in_step: f32,
    /// Multiplier applied per zoom-out wheel step.
    pub zoom_out_step: f32,
    /// Radians of subject rotation per pixel of pointer drag.
    pub rotate_sensitivity: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Camera distance from the subject along the view axis.
    pub camera_distance: f32,
    /// Surface background color as a CSS hex string.
    pub background: String,
    /// Full URL of the rendering library script.
    pub library_url: String,
    /// Origin allow-listed by the content-security policy for the
    /// rendering library. Must be a prefix of [`Self::library_url`].
    pub library_origin: String,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 3.0,
            zoom_in_step: 1.1,
            zoom_out_step: 0.9,
            rotate_sensitivity: 0.01,
            fov_degrees: 75.0,
            camera_distance: 5.0,
            background: "#1e1e1e".into(),
            library_url:
                "https://cdn.jsdelivr.net/npm/three@0.159.0/build/three.min.js"
                    .into(),
            library_origin: "https://cdn.jsdelivr.net".into(),
        }
    }
}

impl ViewerOptions {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, GlimpseError> {
        let content = std::fs::read_to_string(path).map_err(GlimpseError::Io)?;
        toml::from_str(&content)
            .map_err(|e| GlimpseError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), GlimpseError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GlimpseError::OptionsParse(e.to_string()))?;
        std::fs::write(path, content).map_err(GlimpseError::Io)
    }

    /// Clamp a proposed scale factor into the configured bounds.
    #[must_use]
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}
