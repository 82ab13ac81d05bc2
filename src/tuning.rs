//! Data-driven game balance
//!
//! Every number the physics, grid builder and power-up code depend on lives
//! here. Defaults come from [`crate::consts`]; a JSON document may override any
//! subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Longest dt a single tick will integrate (seconds)
    pub max_frame_dt: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_bottom_gap: f32,
    pub paddle_speed: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_base_speed: f32,
    pub ball_max_speed: f32,
    pub ball_level_speed_step: f32,
    /// Degrees from vertical at the paddle edge
    pub max_bounce_angle_deg: f32,
    pub paddle_hits_per_speedup: u32,
    pub paddle_speedup: f32,
    /// Trail points kept per ball (cosmetic)
    pub trail_length: usize,

    // === Sub-stepping ===
    pub speed_per_substep: f32,
    pub max_substeps: u32,

    // === Brick grid ===
    pub brick_height: f32,
    pub brick_padding: f32,
    pub brick_offset_top: f32,
    pub brick_margin: f32,
    pub brick_min_width: f32,
    pub brick_min_offset_left: f32,

    // === Scoring / session ===
    pub score_destroy: u64,
    pub score_damage: u64,
    pub start_lives: u8,

    // === Power-ups ===
    /// Chance a destroyed brick drops a pickup
    pub powerup_drop_chance: f64,
    /// Relative weights: [WidenPaddle, SpeedBoost, MultiBall]
    pub powerup_weights: [u32; 3],
    pub powerup_fall_speed: f32,
    pub powerup_size: f32,
    pub wide_paddle_width: f32,
    pub wide_paddle_secs: f32,
    pub speed_boost: f32,
    pub multi_ball_spread_deg: f32,
    pub max_balls: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            max_frame_dt: MAX_FRAME_DT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_gap: PADDLE_BOTTOM_GAP,
            paddle_speed: PADDLE_SPEED,

            ball_radius: BALL_RADIUS,
            ball_base_speed: BALL_BASE_SPEED,
            ball_max_speed: BALL_MAX_SPEED,
            ball_level_speed_step: BALL_LEVEL_SPEED_STEP,
            max_bounce_angle_deg: MAX_BOUNCE_ANGLE_DEG,
            paddle_hits_per_speedup: PADDLE_HITS_PER_SPEEDUP,
            paddle_speedup: PADDLE_SPEEDUP,
            trail_length: 12,

            speed_per_substep: SPEED_PER_SUBSTEP,
            max_substeps: MAX_SUBSTEPS,

            brick_height: BRICK_HEIGHT,
            brick_padding: BRICK_PADDING,
            brick_offset_top: BRICK_OFFSET_TOP,
            brick_margin: BRICK_MARGIN,
            brick_min_width: BRICK_MIN_WIDTH,
            brick_min_offset_left: BRICK_MIN_OFFSET_LEFT,

            score_destroy: SCORE_DESTROY,
            score_damage: SCORE_DAMAGE,
            start_lives: START_LIVES,

            powerup_drop_chance: POWERUP_DROP_CHANCE,
            powerup_weights: [4, 3, 3],
            powerup_fall_speed: POWERUP_FALL_SPEED,
            powerup_size: POWERUP_SIZE,
            wide_paddle_width: WIDE_PADDLE_WIDTH,
            wide_paddle_secs: WIDE_PADDLE_SECS,
            speed_boost: SPEED_BOOST,
            multi_ball_spread_deg: MULTI_BALL_SPREAD_DEG,
            max_balls: MAX_BALLS,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Base speed of a freshly spawned ball on a 1-based level
    pub fn base_speed_for_level(&self, level: usize) -> f32 {
        let bumps = level.saturating_sub(1) as f32;
        (self.ball_base_speed + self.ball_level_speed_step * bumps).min(self.ball_max_speed)
    }

    /// Paddle top edge
    pub fn paddle_y(&self) -> f32 {
        self.world_height - self.paddle_bottom_gap
    }

    /// Map a ball speed into [0, 1] between base and max speed
    pub fn intensity(&self, speed: f32) -> f32 {
        let span = self.ball_max_speed - self.ball_base_speed;
        if span <= 0.0 {
            return 1.0;
        }
        ((speed - self.ball_base_speed) / span).clamp(0.0, 1.0)
    }

    /// Repair values that would break the simulation's assumptions
    fn sanitized(mut self) -> Self {
        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            log::warn!(
                "World size {}x{} must be positive, using default",
                self.world_width,
                self.world_height
            );
            self.world_width = WORLD_WIDTH;
            self.world_height = WORLD_HEIGHT;
        }
        // The brick grid divides by its cell pitch
        if self.brick_height <= 0.0 {
            log::warn!("brick_height {} must be positive, using default", self.brick_height);
            self.brick_height = BRICK_HEIGHT;
        }
        if self.brick_min_width <= 0.0 {
            log::warn!("brick_min_width {} must be positive, using default", self.brick_min_width);
            self.brick_min_width = BRICK_MIN_WIDTH;
        }
        if self.brick_padding < 0.0 {
            log::warn!("brick_padding {} is negative, using 0", self.brick_padding);
            self.brick_padding = 0.0;
        }
        if self.max_substeps == 0 {
            log::warn!("max_substeps must be at least 1, using 1");
            self.max_substeps = 1;
        }
        if self.speed_per_substep <= 0.0 {
            log::warn!("speed_per_substep must be positive, using default");
            self.speed_per_substep = SPEED_PER_SUBSTEP;
        }
        if self.paddle_hits_per_speedup == 0 {
            self.paddle_hits_per_speedup = PADDLE_HITS_PER_SPEEDUP;
        }
        if self.max_balls == 0 {
            self.max_balls = 1;
        }
        if self.start_lives == 0 {
            log::warn!("start_lives must be at least 1, using 1");
            self.start_lives = 1;
        }
        if self.ball_max_speed < self.ball_base_speed {
            log::warn!(
                "ball_max_speed {} below base speed {}, raising it",
                self.ball_max_speed,
                self.ball_base_speed
            );
            self.ball_max_speed = self.ball_base_speed;
        }
        self.powerup_drop_chance = self.powerup_drop_chance.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "ball_base_speed": 400.0, "start_lives": 5 }"#)
            .expect("valid json");
        assert_eq!(tuning.ball_base_speed, 400.0);
        assert_eq!(tuning.start_lives, 5);
        assert_eq!(tuning.world_width, WORLD_WIDTH);
        assert_eq!(tuning.max_substeps, MAX_SUBSTEPS);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_sanitize_repairs_zero_substeps() {
        let tuning = Tuning::from_json(r#"{ "max_substeps": 0, "powerup_drop_chance": 3.0 }"#)
            .expect("valid json");
        assert_eq!(tuning.max_substeps, 1);
        assert_eq!(tuning.powerup_drop_chance, 1.0);
    }

    #[test]
    fn test_sanitize_repairs_zero_brick_pitch() {
        let tuning = Tuning::from_json(r#"{ "brick_height": 0.0, "brick_padding": 0.0 }"#)
            .expect("valid json");
        assert_eq!(tuning.brick_height, BRICK_HEIGHT);
        assert_eq!(tuning.brick_padding, 0.0);

        let tuning = Tuning::from_json(
            r#"{ "brick_min_width": -4.0, "brick_padding": -2.0, "world_width": 0.0 }"#,
        )
        .expect("valid json");
        assert_eq!(tuning.brick_min_width, BRICK_MIN_WIDTH);
        assert_eq!(tuning.brick_padding, 0.0);
        assert_eq!(tuning.world_width, WORLD_WIDTH);
        assert_eq!(tuning.world_height, WORLD_HEIGHT);
    }

    #[test]
    fn test_base_speed_scales_per_level_and_caps() {
        let tuning = Tuning::default();
        assert_eq!(tuning.base_speed_for_level(1), 320.0);
        assert_eq!(tuning.base_speed_for_level(3), 340.0);
        assert_eq!(tuning.base_speed_for_level(1000), tuning.ball_max_speed);
    }

    #[test]
    fn test_intensity_range() {
        let tuning = Tuning::default();
        assert_eq!(tuning.intensity(tuning.ball_base_speed), 0.0);
        assert_eq!(tuning.intensity(tuning.ball_max_speed), 1.0);
        assert_eq!(tuning.intensity(0.0), 0.0);
        let mid = (tuning.ball_base_speed + tuning.ball_max_speed) / 2.0;
        assert!((tuning.intensity(mid) - 0.5).abs() < 1e-6);
    }
}
