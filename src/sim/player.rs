//! The player sprite and its walk-cycle animation

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ANIMATION_SPEED, PLAYER_FRAME_COUNT};

/// Frame-stepped sprite animation.
///
/// While playing, the cursor advances `speed` frames per display frame and
/// wraps around the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteAnimation {
    pub frame_count: usize,
    pub speed: f32,
    cursor: f32,
    playing: bool,
}

impl Default for SpriteAnimation {
    fn default() -> Self {
        Self::new(PLAYER_FRAME_COUNT, ANIMATION_SPEED)
    }
}

impl SpriteAnimation {
    pub fn new(frame_count: usize, speed: f32) -> Self {
        Self {
            frame_count,
            speed,
            cursor: 0.0,
            playing: false,
        }
    }

    /// Start (or keep) playing from the current frame
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Jump to `frame` and stop
    pub fn goto_and_stop(&mut self, frame: usize) {
        self.playing = false;
        self.cursor = if self.frame_count == 0 {
            0.0
        } else {
            (frame % self.frame_count) as f32
        };
    }

    /// Step one display frame
    pub fn advance(&mut self) {
        if !self.playing || self.frame_count == 0 {
            return;
        }
        self.cursor = (self.cursor + self.speed).rem_euclid(self.frame_count as f32);
    }

    pub fn current_frame(&self) -> usize {
        if self.frame_count == 0 {
            return 0;
        }
        (self.cursor.floor() as usize).min(self.frame_count - 1)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Centre of the sprite (canvas-local pixels)
    pub position: Vec2,
    /// Per-axis factor applied to the stick deflection
    pub velocity: Vec2,
    /// Sprite rotation in radians
    pub rotation: f32,
    pub animation: SpriteAnimation,
}

impl Player {
    pub fn new(position: Vec2, animation: SpriteAnimation) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            animation,
        }
    }

    /// Halt and show the idle frame
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
        self.animation.goto_and_stop(0);
    }
}
