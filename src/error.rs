//! Crate-level error types.

use std::fmt;

/// Errors produced by the glimpse crate.
#[derive(Debug)]
pub enum GlimpseError {
    /// Viewer initialization failure inside a surface.
    Viewer(ViewerError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Panel message serialization failure.
    Message(String),
}

impl fmt::Display for GlimpseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Viewer(e) => write!(f, "viewer error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Message(msg) => write!(f, "message error: {msg}"),
        }
    }
}

impl std::error::Error for GlimpseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Viewer(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ViewerError> for GlimpseError {
    fn from(e: ViewerError) -> Self {
        Self::Viewer(e)
    }
}

impl From<std::io::Error> for GlimpseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors raised while setting up rendering inside a surface.
///
/// None of these are fatal to the host: the viewer session catches them,
/// reports through the surface's error channel, and releases whatever was
/// built so far.
#[derive(Debug)]
pub enum ViewerError {
    /// No GPU-capable rendering context is available in this surface.
    ContextUnavailable,
    /// The rendering backend rejected a scene object during setup.
    SceneSetup(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextUnavailable => {
                write!(f, "no GPU-capable rendering context is available")
            }
            Self::SceneSetup(msg) => write!(f, "scene setup failed: {msg}"),
        }
    }
}

impl std::error::Error for ViewerError {}
