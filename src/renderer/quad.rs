//! Quad generation for rotated sprites

use glam::Vec2;

use super::vertex::SpriteVertex;
use crate::assets::{AssetError, SpriteSheet, UvRect};
use crate::consts::{PLAYER_FRAME_COUNT, PLAYER_FRAME_PREFIX};

/// One drawable animation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFrame {
    pub uv: UvRect,
    /// Untrimmed sprite size; the anchor is relative to this
    pub size: Vec2,
    /// Top-left of the packed pixels inside the untrimmed sprite
    pub trim_offset: Vec2,
    /// Size of the packed pixels
    pub trim_size: Vec2,
}

impl SpriteFrame {
    /// Frame with no transparent border removed
    pub fn untrimmed(uv: UvRect, size: Vec2) -> Self {
        Self {
            uv,
            size,
            trim_offset: Vec2::ZERO,
            trim_size: size,
        }
    }
}

/// The player's walk cycle, resolved from the sprite sheet
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFrames {
    pub frames: Vec<SpriteFrame>,
}

impl PlayerFrames {
    pub fn from_sheet(sheet: &SpriteSheet) -> Result<Self, AssetError> {
        let frames = sheet
            .sequence(PLAYER_FRAME_PREFIX, PLAYER_FRAME_COUNT)?
            .into_iter()
            .map(|entry| {
                let source = entry.display_size();
                let (trim_x, trim_y) = entry.trim_offset();
                SpriteFrame {
                    uv: sheet.uv_rect(entry),
                    size: Vec2::new(source.w as f32, source.h as f32),
                    trim_offset: Vec2::new(trim_x as f32, trim_y as f32),
                    trim_size: Vec2::new(entry.frame.w as f32, entry.frame.h as f32),
                }
            })
            .collect();
        Ok(Self { frames })
    }

    /// Frame `index`, wrapping around the cycle
    pub fn get(&self, index: usize) -> Option<&SpriteFrame> {
        if self.frames.is_empty() {
            None
        } else {
            self.frames.get(index % self.frames.len())
        }
    }
}

/// Two triangles covering a sprite.
///
/// `anchor` is the pivot inside the untrimmed sprite in 0..1 (0.5, 0.5 =
/// centre); `rotation` turns clockwise on screen because canvas y points down.
/// Trimmed frames cover only their packed pixels.
pub fn sprite_quad(
    position: Vec2,
    frame: &SpriteFrame,
    rotation: f32,
    anchor: Vec2,
) -> [SpriteVertex; 6] {
    let rot = Vec2::from_angle(rotation);
    let origin = frame.trim_offset - anchor * frame.size;
    let corner = |offset: Vec2, u: f32, v: f32| {
        let p = position + rot.rotate(origin + offset * frame.trim_size);
        SpriteVertex::new(p.x, p.y, u, v)
    };

    let UvRect { min, max } = frame.uv;
    let tl = corner(Vec2::new(0.0, 0.0), min[0], min[1]);
    let tr = corner(Vec2::new(1.0, 0.0), max[0], min[1]);
    let bl = corner(Vec2::new(0.0, 1.0), min[0], max[1]);
    let br = corner(Vec2::new(1.0, 1.0), max[0], max[1]);

    [tl, bl, tr, tr, bl, br]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn frame() -> SpriteFrame {
        SpriteFrame::untrimmed(
            UvRect {
                min: [0.0, 0.0],
                max: [0.25, 0.5],
            },
            Vec2::new(32.0, 32.0),
        )
    }

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn test_unrotated_quad_is_centred() {
        let quad = sprite_quad(Vec2::new(100.0, 100.0), &frame(), 0.0, Vec2::splat(0.5));
        assert!(close(quad[0].position, [84.0, 84.0]));
        assert!(close(quad[5].position, [116.0, 116.0]));
        assert_eq!(quad[0].uv, [0.0, 0.0]);
        assert_eq!(quad[5].uv, [0.25, 0.5]);
    }

    #[test]
    fn test_quarter_turn_is_clockwise() {
        let quad = sprite_quad(Vec2::new(100.0, 100.0), &frame(), FRAC_PI_2, Vec2::splat(0.5));
        // Top-left corner swings to the top-right
        assert!(close(quad[0].position, [116.0, 84.0]));
    }

    #[test]
    fn test_trimmed_quad_keeps_pivot() {
        // 20x24 of pixels packed from a 32x32 sprite, 6px from the left and 4px from the top
        let trimmed = SpriteFrame {
            trim_offset: Vec2::new(6.0, 4.0),
            trim_size: Vec2::new(20.0, 24.0),
            ..frame()
        };
        let quad = sprite_quad(Vec2::new(100.0, 100.0), &trimmed, 0.0, Vec2::splat(0.5));
        assert!(close(quad[0].position, [90.0, 88.0]));
        assert!(close(quad[5].position, [110.0, 112.0]));
    }

    #[test]
    fn test_trimmed_frames_from_sheet() {
        let sheet = SpriteSheet::from_json(
            r#"{
                "frames": {
                    "player_0.png": { "frame": { "x": 0, "y": 0, "w": 20, "h": 24 }, "trimmed": true,
                                      "spriteSourceSize": { "x": 6, "y": 4, "w": 20, "h": 24 }, "sourceSize": { "w": 32, "h": 32 } },
                    "player_1.png": { "frame": { "x": 20, "y": 0, "w": 32, "h": 32 } },
                    "player_2.png": { "frame": { "x": 52, "y": 0, "w": 32, "h": 32 } }
                },
                "meta": { "image": "sheet.png", "size": { "w": 84, "h": 32 } }
            }"#,
        )
        .unwrap();
        let frames = PlayerFrames::from_sheet(&sheet).unwrap();
        let first = frames.get(0).unwrap();
        assert_eq!(first.size, Vec2::new(32.0, 32.0));
        assert_eq!(first.trim_offset, Vec2::new(6.0, 4.0));
        assert_eq!(first.trim_size, Vec2::new(20.0, 24.0));
        assert_eq!(frames.get(1).unwrap().trim_offset, Vec2::ZERO);
    }

    #[test]
    fn test_frames_from_sheet() {
        let sheet = SpriteSheet::from_json(
            r#"{
                "frames": {
                    "player_0.png": { "frame": { "x": 0, "y": 0, "w": 16, "h": 24 } },
                    "player_1.png": { "frame": { "x": 16, "y": 0, "w": 16, "h": 24 } },
                    "player_2.png": { "frame": { "x": 32, "y": 0, "w": 16, "h": 24 } }
                },
                "meta": { "image": "sheet.png", "size": { "w": 48, "h": 24 } }
            }"#,
        )
        .unwrap();
        let frames = PlayerFrames::from_sheet(&sheet).unwrap();
        assert_eq!(frames.frames.len(), 3);
        assert_eq!(frames.get(4).unwrap().size, Vec2::new(16.0, 24.0));
        assert!((frames.get(2).unwrap().uv.min[0] - 32.0 / 48.0).abs() < 1e-6);
    }
}
