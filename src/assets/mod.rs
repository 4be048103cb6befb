//! Sprite-sheet assets
//!
//! - `spritesheet`: the JSON frame descriptor
//! - `loader`: queued loading with progress reporting

pub mod loader;
pub mod spritesheet;

pub use loader::{AssetLoader, LoadProgress, LoadedSheet, decode_image};
pub use spritesheet::{FrameEntry, FrameRect, SpriteSheet, UvRect};

#[cfg(target_arch = "wasm32")]
pub use loader::load_spritesheet;

use std::fmt;

/// Asset loading failure
#[derive(Debug)]
pub enum AssetError {
    /// Descriptor is not valid sprite-sheet JSON
    Json(serde_json::Error),
    /// A requested frame is not in the sheet
    MissingFrame(String),
    /// Frame is stored rotated in the atlas
    RotatedFrame(String),
    /// Frame rect extends past the atlas size
    FrameOutOfBounds(String),
    /// Sheet image could not be decoded
    Image(image::ImageError),
    /// Network request failed
    Fetch { url: String, reason: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Json(e) => write!(f, "invalid sprite-sheet descriptor: {}", e),
            AssetError::MissingFrame(name) => write!(f, "frame '{}' not found in sprite sheet", name),
            AssetError::RotatedFrame(name) => write!(f, "frame '{}' is rotated in the atlas", name),
            AssetError::FrameOutOfBounds(name) => {
                write!(f, "frame '{}' lies outside the atlas", name)
            }
            AssetError::Image(e) => write!(f, "could not decode sprite-sheet image: {}", e),
            AssetError::Fetch { url, reason } => write!(f, "failed to fetch {}: {}", url, reason),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Json(e) => Some(e),
            AssetError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AssetError {
    fn from(e: serde_json::Error) -> Self {
        AssetError::Json(e)
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        AssetError::Image(e)
    }
}
