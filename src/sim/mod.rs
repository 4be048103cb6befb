//! Simulation module
//!
//! All gameplay logic lives here. It has no rendering or platform
//! dependencies: the platform layer feeds touch events in and calls
//! `tick` once per display frame.

pub mod player;
pub mod state;
pub mod tick;
pub mod touch;

pub use player::{Player, SpriteAnimation};
pub use state::{GameMode, GameState, MovementTuning, SceneVisibility, Viewport};
pub use tick::tick;
pub use touch::{MOUSE_TOUCH_ID, ScreenHalf, TouchId, TouchState, TouchTracker};
