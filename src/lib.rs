//! Touch Stick - a touch-joystick sprite demo
//!
//! Core modules:
//! - `sim`: Touch tracking, player movement and the play/end mode switch
//! - `assets`: Sprite-sheet descriptor parsing and the progress-reporting loader
//! - `renderer`: WebGPU sprite pipeline
//! - `settings`: Persisted tunables

pub mod assets;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use assets::{AssetError, AssetLoader, SpriteSheet};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Distance kept between the player and the viewport edge (pixels)
    pub const BORDER_INSET: f32 = 5.0;

    /// Player velocity per pixel of stick deflection, set on every left-stick move
    pub const STICK_SPEED: f32 = 0.02;

    /// Animation frames advanced per display frame
    pub const ANIMATION_SPEED: f32 = 0.3;
    /// Number of frames in the player walk cycle
    pub const PLAYER_FRAME_COUNT: usize = 3;
    /// Frame name prefix inside the sprite sheet (`player_0.png`, ...)
    pub const PLAYER_FRAME_PREFIX: &str = "player_";

    /// Default sprite-sheet descriptor location
    pub const SPRITESHEET_URL: &str = "images/spritesheet.json";

    /// Offset added to the stick angle so the sprite's "up" faces the stick
    pub const ROTATION_OFFSET: f32 = std::f32::consts::FRAC_PI_2;
}

/// Angle of a vector in radians, measured from +x toward +y (screen down)
#[inline]
pub fn vector_angle(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Clamp a single coordinate into `[inset, extent - inset]`.
///
/// Coordinates already inside the band are returned untouched. When the
/// extent is too small to hold the band the coordinate is centred.
#[inline]
pub fn clamp_to_band(value: f32, extent: f32, inset: f32) -> f32 {
    let lo = inset;
    let hi = extent - inset;
    if hi < lo {
        return extent / 2.0;
    }
    if value > hi {
        hi
    } else if value < lo {
        lo
    } else {
        value
    }
}
