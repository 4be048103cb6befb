//! Sprite-sheet descriptor
//!
//! Reads the "hash" JSON layout written by common texture packers:
//!
//! ```json
//! {
//!   "frames": {
//!     "player_0.png": { "frame": { "x": 0, "y": 0, "w": 32, "h": 32 }, "rotated": false, ... }
//!   },
//!   "meta": { "image": "spritesheet.png", "size": { "w": 96, "h": 32 } }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::AssetError;

/// Pixel rectangle inside the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

/// One named frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameEntry {
    pub frame: FrameRect,
    #[serde(default)]
    pub rotated: bool,
    #[serde(default)]
    pub trimmed: bool,
    /// Trimmed rect inside the untrimmed source
    #[serde(default)]
    pub sprite_source_size: Option<FrameRect>,
    /// Untrimmed size
    #[serde(default)]
    pub source_size: Option<Size>,
}

impl FrameEntry {
    /// Size the sprite should be drawn at
    pub fn display_size(&self) -> Size {
        self.source_size.unwrap_or(Size {
            w: self.frame.w,
            h: self.frame.h,
        })
    }

    /// Position of the packed pixels inside the untrimmed sprite
    pub fn trim_offset(&self) -> (u32, u32) {
        match self.sprite_source_size {
            Some(r) if self.trimmed => (r.x, r.y),
            _ => (0, 0),
        }
    }
}

/// Atlas metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Image file, relative to the descriptor
    pub image: String,
    pub size: Size,
}

/// Normalised texture coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

/// Parsed sprite-sheet descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub frames: BTreeMap<String, FrameEntry>,
    pub meta: Meta,
}

impl SpriteSheet {
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up a frame by name
    pub fn frame(&self, name: &str) -> Result<&FrameEntry, AssetError> {
        let entry = self
            .frames
            .get(name)
            .ok_or_else(|| AssetError::MissingFrame(name.to_string()))?;
        if entry.rotated {
            return Err(AssetError::RotatedFrame(name.to_string()));
        }
        if !self.contains(&entry.frame) {
            return Err(AssetError::FrameOutOfBounds(name.to_string()));
        }
        Ok(entry)
    }

    /// Rect lies entirely inside the atlas
    fn contains(&self, r: &FrameRect) -> bool {
        match (r.x.checked_add(r.w), r.y.checked_add(r.h)) {
            (Some(right), Some(bottom)) => right <= self.meta.size.w && bottom <= self.meta.size.h,
            _ => false,
        }
    }

    /// Frames `{prefix}0.png` .. `{prefix}{count-1}.png`, in order
    pub fn sequence(&self, prefix: &str, count: usize) -> Result<Vec<&FrameEntry>, AssetError> {
        (0..count)
            .map(|i| self.frame(&format!("{}{}.png", prefix, i)))
            .collect()
    }

    /// Texture coordinates of a frame
    pub fn uv_rect(&self, entry: &FrameEntry) -> UvRect {
        let w = self.meta.size.w.max(1) as f32;
        let h = self.meta.size.h.max(1) as f32;
        let r = entry.frame;
        UvRect {
            min: [r.x as f32 / w, r.y as f32 / h],
            max: [
                (r.x as f32 + r.w as f32) / w,
                (r.y as f32 + r.h as f32) / h,
            ],
        }
    }

    /// URL of the atlas image, resolved against the descriptor URL
    pub fn image_url(&self, descriptor_url: &str) -> String {
        match descriptor_url.rfind('/') {
            Some(i) => format!("{}{}", &descriptor_url[..=i], self.meta.image),
            None => self.meta.image.clone(),
        }
    }
}
