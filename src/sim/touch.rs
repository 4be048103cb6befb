//! Touch input tracking
//!
//! The screen is split into two halves. A finger that lands on the left half
//! drives the movement stick; a finger on the right half is tracked as a swipe
//! but has no gameplay effect yet. Each half owns exactly one `TouchState`, so
//! a new touch on a half replaces whatever that half was tracking.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::vector_angle;

/// Identifier of a touch point, as reported by the browser
pub type TouchId = i32;

/// Touch id used when a mouse emulates a finger
pub const MOUSE_TOUCH_ID: TouchId = -1;

/// Which side of the screen a touch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenHalf {
    Left,
    Right,
}

impl ScreenHalf {
    /// Classify a horizontal position against the viewport midpoint.
    ///
    /// A touch exactly on the midpoint belongs to neither half.
    pub fn classify(x: f32, midpoint_x: f32) -> Option<Self> {
        if x < midpoint_x {
            Some(ScreenHalf::Left)
        } else if x > midpoint_x {
            Some(ScreenHalf::Right)
        } else {
            None
        }
    }
}

/// State of one touch gesture
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchState {
    /// Touch point that owns this gesture
    pub id: TouchId,
    /// Finger is down
    pub active: bool,
    /// A move arrived since the last frame
    pub moving: bool,
    /// Where the finger landed (canvas-local pixels)
    pub start: Vec2,
    /// Last reported finger position
    pub current: Vec2,
    /// `current - start`
    pub delta: Vec2,
    /// Direction of `delta` in radians
    pub angle: f32,
}

impl TouchState {
    /// Start a gesture at `pos`
    pub fn begin(id: TouchId, pos: Vec2) -> Self {
        Self {
            id,
            active: true,
            moving: false,
            start: pos,
            current: pos,
            delta: Vec2::ZERO,
            angle: 0.0,
        }
    }

    /// Follow the finger to `pos`
    pub fn drag_to(&mut self, pos: Vec2) {
        self.current = pos;
        self.delta = self.current - self.start;
        self.angle = vector_angle(self.delta);
        self.moving = true;
    }

    /// True while `id` owns this gesture
    pub fn is_owned_by(&self, id: TouchId) -> bool {
        self.active && self.id == id
    }

    /// Any deflection from the start position
    pub fn has_deflection(&self) -> bool {
        self.delta.x.abs() > 0.0 || self.delta.y.abs() > 0.0
    }
}

/// Both halves of the screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TouchTracker {
    /// Movement stick
    pub left: TouchState,
    /// Swipe area
    pub right: TouchState,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, half: ScreenHalf) -> &TouchState {
        match half {
            ScreenHalf::Left => &self.left,
            ScreenHalf::Right => &self.right,
        }
    }

    fn state_mut(&mut self, half: ScreenHalf) -> &mut TouchState {
        match half {
            ScreenHalf::Left => &mut self.left,
            ScreenHalf::Right => &mut self.right,
        }
    }

    /// Half currently owned by `id`, left first
    pub fn half_of(&self, id: TouchId) -> Option<ScreenHalf> {
        if self.left.is_owned_by(id) {
            Some(ScreenHalf::Left)
        } else if self.right.is_owned_by(id) {
            Some(ScreenHalf::Right)
        } else {
            None
        }
    }

    /// Finger down. Returns the half that now tracks the touch.
    pub fn touch_start(&mut self, id: TouchId, pos: Vec2, midpoint_x: f32) -> Option<ScreenHalf> {
        let half = ScreenHalf::classify(pos.x, midpoint_x)?;
        *self.state_mut(half) = TouchState::begin(id, pos);
        log::trace!("touch {} start on {:?} at ({}, {})", id, half, pos.x, pos.y);
        Some(half)
    }

    /// Finger moved. Returns the half that was updated.
    pub fn touch_move(&mut self, id: TouchId, pos: Vec2) -> Option<ScreenHalf> {
        let half = self.half_of(id)?;
        self.state_mut(half).drag_to(pos);
        if half == ScreenHalf::Right {
            log::trace!("right swipe {} at ({}, {})", id, pos.x, pos.y);
        }
        Some(half)
    }

    /// Finger lifted or cancelled. Returns the half `id` owned, if any.
    ///
    /// Any release stops the stick: the left state is always cleared. The
    /// right state is cleared only when `id` owns it.
    pub fn touch_end(&mut self, id: TouchId) -> Option<ScreenHalf> {
        let half = self.half_of(id);
        if half == Some(ScreenHalf::Right) {
            self.right = TouchState::default();
        }
        self.left = TouchState::default();
        log::trace!("touch {} released from {:?}", id, half);
        half
    }

    /// Drop the per-frame `moving` flags
    pub fn end_frame(&mut self) {
        self.left.moving = false;
        self.right.moving = false;
    }

    /// Forget every gesture
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
