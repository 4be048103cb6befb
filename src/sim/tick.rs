//! Per-frame update
//!
//! Called once per display frame. `GameMode` selects which update runs.

use super::state::{GameMode, GameState, SceneVisibility};
use crate::clamp_to_band;
use crate::consts::ROTATION_OFFSET;

/// Advance the game by one display frame
pub fn tick(state: &mut GameState) {
    match state.mode {
        GameMode::Play => play(state),
        GameMode::End => end(state),
    }
}

/// Steer the player from the left stick
fn play(state: &mut GameState) {
    state.frame += 1;

    let stick = state.touches.left;
    let player = &mut state.player;

    if stick.active {
        // Rotate only on frames where the finger actually moved
        if stick.moving {
            player.rotation = stick.angle + ROTATION_OFFSET;
        }

        if stick.has_deflection() {
            player.animation.play();
            player.position += player.velocity * stick.delta;
        }
    } else {
        player.stop();
    }

    player.animation.advance();

    let inset = state.tuning.border_inset;
    player.position.x = clamp_to_band(player.position.x, state.viewport.width, inset);
    player.position.y = clamp_to_band(player.position.y, state.viewport.height, inset);

    state.touches.end_frame();
}

/// Show the end scene
fn end(state: &mut GameState) {
    state.scenes = SceneVisibility {
        play: false,
        end: true,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::Viewport;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn state() -> GameState {
        GameState::new(Viewport::new(800.0, 600.0), &Settings::default())
    }

    #[test]
    fn test_stick_scenario() {
        let mut state = state();
        let start = state.player.position;

        state.touch_start(0, Vec2::new(100.0, 100.0));
        assert!(state.touches.left.active);

        state.touch_move(0, Vec2::new(110.0, 100.0));
        assert_eq!(state.touches.left.delta, Vec2::new(10.0, 0.0));
        assert!(state.touches.left.angle.abs() < 1e-6);

        tick(&mut state);
        assert!((state.player.rotation - FRAC_PI_2).abs() < 1e-6);
        let expected = start + Vec2::new(10.0 * state.tuning.stick_speed, 0.0);
        assert!((state.player.position - expected).length() < 1e-4);
        assert!(state.player.animation.is_playing());
        assert!(!state.touches.left.moving);
    }

    #[test]
    fn test_rotation_is_edge_triggered() {
        let mut state = state();
        state.touch_start(0, Vec2::new(100.0, 100.0));
        state.touch_move(0, Vec2::new(100.0, 50.0));
        tick(&mut state);
        let rotation = state.player.rotation;
        assert!(rotation.abs() < 1e-6); // stick pointing up

        // Tamper with the stored angle; without a move the rotation holds
        state.touches.left.angle = 1.0;
        tick(&mut state);
        assert_eq!(state.player.rotation, rotation);
    }

    #[test]
    fn test_held_stick_keeps_moving() {
        let mut state = state();
        state.touch_start(0, Vec2::new(100.0, 100.0));
        state.touch_move(0, Vec2::new(100.0, 150.0));
        let y0 = state.player.position.y;
        for _ in 0..10 {
            tick(&mut state);
        }
        let step = 50.0 * state.tuning.stick_speed;
        assert!((state.player.position.y - (y0 + 10.0 * step)).abs() < 1e-3);
    }

    #[test]
    fn test_touch_without_deflection_does_not_move() {
        let mut state = state();
        let start = state.player.position;
        state.touch_start(0, Vec2::new(100.0, 100.0));
        tick(&mut state);
        assert_eq!(state.player.position, start);
        assert!(!state.player.animation.is_playing());
    }

    #[test]
    fn test_release_stops_player() {
        let mut state = state();
        state.touch_start(0, Vec2::new(100.0, 100.0));
        state.touch_move(0, Vec2::new(160.0, 140.0));
        for _ in 0..5 {
            tick(&mut state);
        }
        state.touch_end(0);
        tick(&mut state);

        assert_eq!(state.player.velocity, Vec2::ZERO);
        assert_eq!(state.player.animation.current_frame(), 0);
        assert!(!state.player.animation.is_playing());
    }

    #[test]
    fn test_right_release_stops_player() {
        let mut state = state();
        state.touch_start(0, Vec2::new(100.0, 100.0));
        state.touch_start(1, Vec2::new(600.0, 100.0));
        state.touch_move(0, Vec2::new(150.0, 100.0));
        tick(&mut state);
        assert!(state.player.animation.is_playing());

        state.touch_end(1);
        tick(&mut state);
        let position = state.player.position;
        tick(&mut state);

        assert!(!state.touches.left.active);
        assert_eq!(state.player.velocity, Vec2::ZERO);
        assert_eq!(state.player.animation.current_frame(), 0);
        assert_eq!(state.player.position, position);
    }

    #[test]
    fn test_clamps_to_inset() {
        let mut state = state();
        state.player.position = Vec2::new(900.0, -40.0);
        tick(&mut state);
        assert_eq!(state.player.position, Vec2::new(795.0, 5.0));
    }

    #[test]
    fn test_end_mode_swaps_scenes() {
        let mut state = state();
        state.touch_start(0, Vec2::new(100.0, 100.0));
        state.touch_move(0, Vec2::new(120.0, 100.0));
        state.end_game();
        let position = state.player.position;
        let frame = state.frame;

        tick(&mut state);
        assert_eq!(state.scenes, SceneVisibility { play: false, end: true });
        assert_eq!(state.player.position, position);
        assert_eq!(state.frame, frame);
    }

    #[derive(Debug, Clone)]
    enum Event {
        Start(f32, f32),
        Move(f32, f32),
        End,
        Frame,
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![
            (-100.0f32..900.0, -100.0f32..700.0).prop_map(|(x, y)| Event::Start(x, y)),
            (-5000.0f32..5000.0, -5000.0f32..5000.0).prop_map(|(x, y)| Event::Move(x, y)),
            Just(Event::End),
            Just(Event::Frame),
        ]
    }

    proptest! {
        #[test]
        fn position_stays_in_bounds(events in proptest::collection::vec(event(), 1..64)) {
            let mut state = state();
            for event in events {
                match event {
                    Event::Start(x, y) => { state.touch_start(0, Vec2::new(x, y)); }
                    Event::Move(x, y) => { state.touch_move(0, Vec2::new(x, y)); }
                    Event::End => { state.touch_end(0); }
                    Event::Frame => {
                        tick(&mut state);
                        let p = state.player.position;
                        prop_assert!(p.x >= 5.0 && p.x <= 795.0);
                        prop_assert!(p.y >= 5.0 && p.y <= 595.0);
                    }
                }
            }
        }

        #[test]
        fn no_touch_means_idle(events in proptest::collection::vec(event(), 1..64)) {
            let mut state = state();
            for event in events {
                match event {
                    Event::Start(x, y) => { state.touch_start(0, Vec2::new(x, y)); }
                    Event::Move(x, y) => { state.touch_move(0, Vec2::new(x, y)); }
                    Event::End => { state.touch_end(0); }
                    Event::Frame => {
                        tick(&mut state);
                        if !state.touches.left.active {
                            prop_assert_eq!(state.player.velocity, Vec2::ZERO);
                            prop_assert_eq!(state.player.animation.current_frame(), 0);
                        }
                    }
                }
            }
        }
    }
}
