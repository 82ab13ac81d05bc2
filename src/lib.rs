//! Brickfall - a Breakout-style brick breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `game`: Frame driver wrapping the simulation for a host loop
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: High score storage backends
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::HighScore;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical world dimensions (independent of display scaling)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 500.0;

    /// Longest frame the simulation will integrate (slow frames are clamped)
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 16.0;
    /// Distance from the paddle's top edge to the bottom of the world
    pub const PADDLE_BOTTOM_GAP: f32 = 40.0;
    /// Keyboard paddle speed (pixels/s)
    pub const PADDLE_SPEED: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_BASE_SPEED: f32 = 320.0;
    pub const BALL_MAX_SPEED: f32 = 900.0;
    /// Extra base speed per level after the first
    pub const BALL_LEVEL_SPEED_STEP: f32 = 10.0;
    /// Max bounce angle off the paddle, measured from vertical
    pub const MAX_BOUNCE_ANGLE_DEG: f32 = 75.0;
    /// Every Nth paddle hit speeds the ball up
    pub const PADDLE_HITS_PER_SPEEDUP: u32 = 5;
    pub const PADDLE_SPEEDUP: f32 = 20.0;

    /// Sub-stepping: one extra step per this many pixels/s of speed
    pub const SPEED_PER_SUBSTEP: f32 = 450.0;
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Brick grid layout
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 8.0;
    pub const BRICK_OFFSET_TOP: f32 = 50.0;
    pub const BRICK_MARGIN: f32 = 35.0;
    pub const BRICK_MIN_WIDTH: f32 = 24.0;
    pub const BRICK_MIN_OFFSET_LEFT: f32 = 16.0;

    /// Scoring
    pub const SCORE_DESTROY: u64 = 10;
    pub const SCORE_DAMAGE: u64 = 5;

    /// Session
    pub const START_LIVES: u8 = 3;

    /// Power-ups
    pub const POWERUP_DROP_CHANCE: f64 = 0.22;
    pub const POWERUP_FALL_SPEED: f32 = 150.0;
    pub const POWERUP_SIZE: f32 = 18.0;
    pub const WIDE_PADDLE_WIDTH: f32 = 150.0;
    pub const WIDE_PADDLE_SECS: f32 = 10.0;
    pub const SPEED_BOOST: f32 = 60.0;
    pub const MULTI_BALL_SPREAD_DEG: f32 = 12.0;
    pub const MAX_BALLS: usize = 8;
}

/// Clamp `v` into `[lo, hi]`
///
/// Unlike `f32::clamp` this never panics: when `lo > hi` the result is `hi`.
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

/// Unit vector pointing up the screen, used when a direction degenerates
pub const UP: Vec2 = Vec2::new(0.0, -1.0);

/// Normalize a vector, falling back to straight up for zero/non-finite input
#[inline]
pub fn normalize_or_up(v: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(UP)
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inverted_bounds_does_not_panic() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(3.0, 4.0, 2.0), 2.0);
    }

    #[test]
    fn test_normalize_zero_falls_back_up() {
        assert_eq!(normalize_or_up(Vec2::ZERO), UP);
        assert_eq!(normalize_or_up(Vec2::new(f32::NAN, 1.0)), UP);
        let n = normalize_or_up(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }
}
