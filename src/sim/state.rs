//! Game state and core simulation types
//!
//! Everything the per-frame update reads or writes lives in `GameState`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::{Player, SpriteAnimation};
use super::touch::{ScreenHalf, TouchId, TouchTracker};
use crate::consts::PLAYER_FRAME_COUNT;
use crate::settings::Settings;

/// Which per-frame update runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Player steers with the left stick
    #[default]
    Play,
    /// Run ended (terminal)
    End,
}

/// Visibility of the two scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneVisibility {
    pub play: bool,
    pub end: bool,
}

impl Default for SceneVisibility {
    fn default() -> Self {
        Self {
            play: true,
            end: false,
        }
    }
}

/// Drawable area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Boundary between the left and right halves
    pub fn midpoint_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Movement tunables captured from `Settings` when the state is built
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementTuning {
    /// Velocity factor set on every left-stick move
    pub stick_speed: f32,
    /// Distance kept from the viewport edge
    pub border_inset: f32,
}

impl From<&Settings> for MovementTuning {
    fn from(settings: &Settings) -> Self {
        Self {
            stick_speed: settings.stick_speed,
            border_inset: settings.border_inset,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub touches: TouchTracker,
    pub player: Player,
    pub viewport: Viewport,
    pub tuning: MovementTuning,
    pub mode: GameMode,
    pub scenes: SceneVisibility,
    /// Frames simulated so far
    pub frame: u64,
}

impl GameState {
    /// Create a new state with the player centred in the viewport
    pub fn new(viewport: Viewport, settings: &Settings) -> Self {
        let animation = SpriteAnimation::new(PLAYER_FRAME_COUNT, settings.animation_speed);
        Self {
            touches: TouchTracker::new(),
            player: Player::new(viewport.center(), animation),
            viewport,
            tuning: MovementTuning::from(settings),
            mode: GameMode::Play,
            scenes: SceneVisibility::default(),
            frame: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.mode == GameMode::Play
    }

    /// Finger down at canvas-local `pos`
    pub fn touch_start(&mut self, id: TouchId, pos: Vec2) -> Option<ScreenHalf> {
        if !self.is_playing() {
            return None;
        }
        self.touches.touch_start(id, pos, self.viewport.midpoint_x())
    }

    /// Finger moved to canvas-local `pos`
    pub fn touch_move(&mut self, id: TouchId, pos: Vec2) -> Option<ScreenHalf> {
        if !self.is_playing() {
            return None;
        }
        let half = self.touches.touch_move(id, pos)?;
        if half == ScreenHalf::Left {
            self.player.velocity = Vec2::splat(self.tuning.stick_speed);
        }
        Some(half)
    }

    /// Finger lifted or cancelled
    pub fn touch_end(&mut self, id: TouchId) -> Option<ScreenHalf> {
        if !self.is_playing() {
            return None;
        }
        self.touches.touch_end(id)
    }

    /// Canvas resized
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Switch to the terminal end mode
    pub fn end_game(&mut self) {
        if self.mode == GameMode::End {
            return;
        }
        log::info!("Game over after {} frames", self.frame);
        self.mode = GameMode::End;
        self.touches.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Viewport::new(800.0, 600.0), &Settings::default())
    }

    #[test]
    fn test_new_state_centres_player() {
        let state = state();
        assert_eq!(state.mode, GameMode::Play);
        assert_eq!(state.player.position, Vec2::new(400.0, 300.0));
        assert_eq!(state.player.velocity, Vec2::ZERO);
        assert_eq!(state.scenes, SceneVisibility::default());
    }

    #[test]
    fn test_left_move_sets_velocity() {
        let mut state = state();
        state.touch_start(0, Vec2::new(100.0, 100.0));
        assert_eq!(state.player.velocity, Vec2::ZERO);

        state.touch_move(0, Vec2::new(110.0, 100.0));
        assert_eq!(state.player.velocity, Vec2::splat(state.tuning.stick_speed));
    }

    #[test]
    fn test_right_move_leaves_velocity() {
        let mut state = state();
        state.touch_start(4, Vec2::new(700.0, 100.0));
        state.touch_move(4, Vec2::new(650.0, 100.0));
        assert_eq!(state.player.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_end_game_ignores_input() {
        let mut state = state();
        state.touch_start(0, Vec2::new(100.0, 100.0));
        state.end_game();
        assert_eq!(state.mode, GameMode::End);
        assert!(!state.touches.left.active);

        assert_eq!(state.touch_start(1, Vec2::new(100.0, 100.0)), None);
        assert!(!state.touches.left.active);
    }
}
