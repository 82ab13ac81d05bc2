//! Game state and core simulation types
//!
//! The whole session lives in one [`GameState`] value owned by the frame
//! driver; there are no globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::events::{EventKind, GameEvent};
use super::level::{BrickGrid, LevelDef, builtin_levels};
use crate::tuning::Tuning;
use crate::{clamp, normalize_or_up};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start trigger
    Start,
    /// Active gameplay
    Playing,
    /// Game is paused (nothing moves, no timers run)
    Paused,
    /// Out of lives
    GameOver,
    /// Final level cleared
    Win,
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

/// A ball entity
///
/// `speed` is the velocity magnitude, kept separately so bounces can change
/// direction without drifting the speed. Write velocity only through
/// [`Ball::set_direction`] and [`Ball::set_speed`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    vel: Vec2,
    speed: f32,
    pub radius: f32,
    /// Paddle hits since spawn (drives the speed-up cadence)
    pub paddle_hits: u32,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<TrailPoint>,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, direction: Vec2, speed: f32, radius: f32) -> Self {
        let mut ball = Self {
            id,
            pos,
            vel: Vec2::ZERO,
            speed,
            radius,
            paddle_hits: 0,
            trail: Vec::new(),
        };
        ball.set_direction(direction);
        ball
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Point the ball along `direction` at its current speed
    pub fn set_direction(&mut self, direction: Vec2) {
        self.vel = normalize_or_up(direction) * self.speed;
    }

    /// Change speed, keeping the current heading
    pub fn set_speed(&mut self, speed: f32) {
        let dir = normalize_or_up(self.vel);
        self.speed = speed.max(0.0);
        self.vel = dir * self.speed;
    }

    /// Flip the horizontal component (speed unchanged)
    pub fn flip_x(&mut self) {
        self.vel.x = -self.vel.x;
    }

    /// Flip the vertical component (speed unchanged)
    pub fn flip_y(&mut self) {
        self.vel.y = -self.vel.y;
    }

    /// Force the horizontal component positive (right) or negative (left)
    pub fn set_x_sign(&mut self, positive: bool) {
        self.vel.x = if positive { self.vel.x.abs() } else { -self.vel.x.abs() };
    }

    /// Force the vertical component positive (down) or negative (up)
    pub fn set_y_sign(&mut self, positive: bool) {
        self.vel.y = if positive { self.vel.y.abs() } else { -self.vel.y.abs() };
    }

    /// Record current position to trail (call once per tick)
    pub fn record_trail(&mut self, max_len: usize) {
        if max_len == 0 {
            return;
        }
        self.trail.insert(0, TrailPoint { pos: self.pos, speed: self.speed });
        self.trail.truncate(max_len);
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    width: f32,
    pub height: f32,
    /// Width the paddle returns to when a widen effect ends
    default_width: f32,
}

impl Paddle {
    /// Centered paddle for the given tuning
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: (tuning.world_width - tuning.paddle_width) / 2.0,
            y: tuning.paddle_y(),
            width: tuning.paddle_width,
            height: tuning.paddle_height,
            default_width: tuning.paddle_width,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn default_width(&self) -> f32 {
        self.default_width
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Move to `x`, kept inside `[0, world_width - width]`
    pub fn set_x(&mut self, x: f32, world_width: f32) {
        self.x = clamp(x, 0.0, world_width - self.width);
    }

    /// Change width around the current center, then re-clamp
    pub fn set_width(&mut self, width: f32, world_width: f32) {
        let center = self.center_x();
        self.width = width;
        self.set_x(center - width / 2.0, world_width);
    }

    /// Go back to the default width exactly
    pub fn reset_width(&mut self, world_width: f32) {
        self.set_width(self.default_width, world_width);
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickKind {
    /// One hit
    Normal,
    /// Two hits
    Strong,
}

impl BrickKind {
    /// Decode a level pattern cell (0 or anything unknown is empty)
    pub fn from_cell(cell: u8) -> Option<Self> {
        match cell {
            1 => Some(BrickKind::Normal),
            2 => Some(BrickKind::Strong),
            _ => None,
        }
    }

    pub fn hit_points(self) -> u8 {
        match self {
            BrickKind::Normal => 1,
            BrickKind::Strong => 2,
        }
    }
}

/// A brick entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub kind: BrickKind,
    pub hp: u8,
    pub alive: bool,
    /// 0xRRGGBB
    pub color: u32,
}

impl Brick {
    pub fn new(rect: Rect, kind: BrickKind, color: u32) -> Self {
        Self {
            rect,
            kind,
            hp: kind.hit_points(),
            alive: true,
            color,
        }
    }

    /// 0.0 for an untouched brick, approaching 1.0 as it takes hits
    pub fn damage_fraction(&self) -> f32 {
        let max = self.kind.hit_points() as f32;
        1.0 - self.hp as f32 / max
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    WidenPaddle,
    SpeedBoost,
    MultiBall,
}

/// A falling pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Active timed power-up effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    /// Seconds of wide paddle left (0 = inactive)
    pub widen_secs: f32,
}

/// Complete game session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    levels: Vec<LevelDef>,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Current level (1-based)
    pub level: usize,
    pub lives: u8,
    pub score: u64,
    /// Best score seen, including previous sessions
    pub high_score: u64,
    /// High score loaded at startup (used to announce a new record once)
    record_to_beat: u64,
    pub(crate) record_announced: bool,
    pub phase: GamePhase,
    pub paddle: Paddle,
    /// Active balls, processed in order
    pub balls: Vec<Ball>,
    pub grid: BrickGrid,
    pub pickups: Vec<Pickup>,
    pub effects: ActiveEffects,
    /// Ticks spent in `Playing`
    pub time_ticks: u64,
    /// Events raised since the last drain
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Session on the built-in levels
    pub fn new(seed: u64) -> Self {
        Self::with_levels(Tuning::default(), builtin_levels(), seed, 0)
    }

    /// Session with explicit tuning, level set and a stored high score
    pub fn with_levels(tuning: Tuning, levels: Vec<LevelDef>, seed: u64, high_score: u64) -> Self {
        let levels = if levels.is_empty() {
            log::warn!("Empty level set, falling back to built-in levels");
            builtin_levels()
        } else {
            levels
        };
        let grid = BrickGrid::build(&levels[0], &tuning);
        let mut state = Self {
            paddle: Paddle::new(&tuning),
            lives: tuning.start_lives,
            tuning,
            levels,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level: 1,
            score: 0,
            high_score,
            record_to_beat: high_score,
            record_announced: false,
            phase: GamePhase::Start,
            balls: Vec::new(),
            grid,
            pickups: Vec::new(),
            effects: ActiveEffects::default(),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };

        // Ball resting on the paddle for the title screen
        state.spawn_ball_on_paddle();

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= self.levels.len()
    }

    /// Replace all balls with one fresh ball above the paddle, heading up
    pub fn spawn_ball_on_paddle(&mut self) {
        let id = self.next_entity_id();
        let radius = self.tuning.ball_radius;
        let pos = Vec2::new(self.paddle.center_x(), self.paddle.y - radius - 1.0);
        let speed = self.tuning.base_speed_for_level(self.level);
        self.balls.clear();
        self.balls.push(Ball::new(id, pos, crate::UP, speed, radius));
    }

    /// Build the grid for the current level from scratch
    pub fn build_level(&mut self) {
        let index = self.level.saturating_sub(1).min(self.levels.len() - 1);
        self.grid = BrickGrid::build(&self.levels[index], &self.tuning);
        log::info!(
            "Level {}/{}: {} bricks",
            self.level,
            self.levels.len(),
            self.grid.remaining()
        );
    }

    /// Full session reset: score 0, starting lives, level 1
    pub fn reset_session(&mut self) {
        self.score = 0;
        self.lives = self.tuning.start_lives;
        self.level = 1;
        self.record_to_beat = self.high_score;
        self.record_announced = false;
        self.pickups.clear();
        self.effects = ActiveEffects::default();
        self.time_ticks = 0;
        self.paddle.reset_width(self.tuning.world_width);
        self.paddle.y = self.tuning.paddle_y();
        self.build_level();
        self.spawn_ball_on_paddle();
    }

    /// Add points and track the high score
    pub fn award(&mut self, points: u64, intensity: f32) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            if !self.record_announced && self.score > self.record_to_beat {
                self.record_announced = true;
                self.push_event(EventKind::NewHighScore, intensity);
            }
        }
    }

    pub fn push_event(&mut self, kind: EventKind, intensity: f32) {
        self.events.push(GameEvent { kind, intensity });
    }

    /// Events raised since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Intensity for events not tied to one ball: the fastest ball's
    pub fn ambient_intensity(&self) -> f32 {
        let fastest = self.balls.iter().map(Ball::speed).fold(0.0, f32::max);
        self.tuning.intensity(fastest)
    }
}
