//! WebGPU rendering module
//!
//! Draws the player's current animation frame as a textured quad.

pub mod quad;
pub mod sprite_pipeline;
pub mod vertex;

pub use quad::{PlayerFrames, SpriteFrame, sprite_quad};
pub use sprite_pipeline::SpriteRenderState;
pub use vertex::SpriteVertex;
