//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session by one frame.

use glam::Vec2;

use super::events::EventKind;
use super::level::BrickHit;
use super::physics;
use super::powerups;
use super::state::{ActiveEffects, Ball, GamePhase, GameState};

/// Input commands for a single tick
///
/// `start`, `pause`, `restart` and `quit` are one-shot triggers; the host
/// clears them after the tick that consumed them.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position the paddle center should follow
    pub target_x: Option<f32>,
    /// Keyboard left held
    pub left: bool,
    /// Keyboard right held
    pub right: bool,
    /// Leave the title screen
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// New session after game over or win
    pub restart: bool,
    /// Back to the title screen from anywhere
    pub quit: bool,
    /// Demo mode - the paddle steers itself
    pub autopilot: bool,
}

/// What happened to a ball during one tick
enum BallFate {
    InPlay,
    Lost,
    /// This ball destroyed the last brick of the level
    Cleared,
}

/// Advance the game state by `dt` seconds (clamped to the tuning's max)
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() {
        crate::clamp(dt, 0.0, state.tuning.max_frame_dt)
    } else {
        0.0
    };

    handle_triggers(state, input);

    match state.phase {
        GamePhase::Start => {
            // Title screen: the paddle moves and carries the ball
            move_paddle(state, input, dt);
            park_balls(state);
            return;
        }
        GamePhase::Playing => {}
        GamePhase::Paused | GamePhase::GameOver | GamePhase::Win => return,
    }

    state.time_ticks += 1;

    // A level with nothing to break is already complete
    while state.phase == GamePhase::Playing && state.grid.remaining() == 0 {
        complete_level(state);
    }
    if state.phase != GamePhase::Playing {
        return;
    }

    // Paddle, then pickups, then balls: a catch affects the balls this tick
    move_paddle(state, input, dt);
    powerups::update(state, dt);
    advance_balls(state, dt);
    if state.phase != GamePhase::Playing {
        return;
    }

    let trail_len = state.tuning.trail_length;
    for ball in state.balls.iter_mut() {
        ball.record_trail(trail_len);
    }
}

/// Apply one-shot triggers valid for the current phase
fn handle_triggers(state: &mut GameState, input: &TickInput) {
    if input.quit && state.phase != GamePhase::Start {
        log::info!("Quit to title (score {})", state.score);
        state.reset_session();
        state.phase = GamePhase::Start;
        return;
    }

    match state.phase {
        GamePhase::Start if input.start => {
            state.reset_session();
            state.phase = GamePhase::Playing;
            log::info!("Game started (seed {})", state.seed);
        }
        GamePhase::Playing if input.pause => {
            state.phase = GamePhase::Paused;
            let intensity = state.ambient_intensity();
            state.push_event(EventKind::Pause, intensity);
        }
        GamePhase::Paused if input.pause => {
            state.phase = GamePhase::Playing;
            let intensity = state.ambient_intensity();
            state.push_event(EventKind::Resume, intensity);
        }
        GamePhase::GameOver | GamePhase::Win if input.restart => {
            state.reset_session();
            state.phase = GamePhase::Playing;
            log::info!("Game restarted");
        }
        _ => {}
    }
}

/// Pointer, keyboard or autopilot paddle control
fn move_paddle(state: &mut GameState, input: &TickInput, dt: f32) {
    let world_w = state.tuning.world_width;

    let target = if input.autopilot {
        autopilot_target(state)
    } else {
        input.target_x
    };
    if let Some(x) = target.filter(|x| x.is_finite()) {
        let half = state.paddle.width() / 2.0;
        state.paddle.set_x(x - half, world_w);
    }

    let mut dir = 0.0;
    if input.left {
        dir -= 1.0;
    }
    if input.right {
        dir += 1.0;
    }
    if dir != 0.0 {
        let x = state.paddle.x + dir * state.tuning.paddle_speed * dt;
        state.paddle.set_x(x, world_w);
    }
}

/// Where the demo paddle wants its center
///
/// Follows the lowest descending ball, leading it to the paddle line with
/// wall reflections folded in. With every ball climbing it goes for the
/// lowest pickup instead.
fn autopilot_target(state: &GameState) -> Option<f32> {
    let paddle_y = state.paddle.y;
    let threat = state
        .balls
        .iter()
        .filter(|b| b.vel().y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    let Some(ball) = threat else {
        if let Some(pickup) = state.pickups.iter().max_by(|a, b| a.pos.y.total_cmp(&b.pos.y)) {
            return Some(pickup.pos.x);
        }
        return state.balls.first().map(|b| b.pos.x);
    };

    let time_to_paddle = ((paddle_y - ball.radius - ball.pos.y) / ball.vel().y).max(0.0);
    let landing = fold_into_walls(
        ball.pos.x + ball.vel().x * time_to_paddle,
        ball.radius,
        state.tuning.world_width - ball.radius,
    );

    // Wander across the paddle face so rallies don't loop forever
    let t = state.time_ticks as f32 * 0.01;
    let wobble = (t.sin() * 0.3 + (t * 0.7).sin() * 0.15) * state.paddle.width() / 2.0;
    Some(landing + wobble)
}

/// Reflect a coordinate back into `[lo, hi]` as many times as it overshoots
fn fold_into_walls(x: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if span <= 0.0 || !x.is_finite() {
        return lo;
    }
    let u = (x - lo).rem_euclid(2.0 * span);
    lo + if u > span { 2.0 * span - u } else { u }
}

/// Keep the resting ball on the paddle
fn park_balls(state: &mut GameState) {
    let center = state.paddle.center_x();
    let top = state.paddle.y;
    for ball in state.balls.iter_mut() {
        ball.pos = Vec2::new(center, top - ball.radius - 1.0);
    }
}

/// Step every ball, then handle a cleared level or a lost last ball
fn advance_balls(state: &mut GameState, dt: f32) {
    let mut balls = std::mem::take(&mut state.balls);
    let mut cleared = false;

    balls.retain_mut(|ball| {
        if cleared {
            return true;
        }
        match step_ball(state, ball, dt) {
            BallFate::InPlay => true,
            BallFate::Lost => false,
            BallFate::Cleared => {
                cleared = true;
                true
            }
        }
    });

    state.balls = balls;
    if cleared {
        complete_level(state);
    } else if state.balls.is_empty() {
        lose_life(state);
    }
}

/// Sub-stepped integration and collision for one ball
fn step_ball(state: &mut GameState, ball: &mut Ball, dt: f32) -> BallFate {
    let steps = physics::substep_count(ball.speed(), &state.tuning);
    let h = dt / steps as f32;

    for _ in 0..steps {
        let prev = ball.pos;
        ball.pos += ball.vel() * h;

        if physics::collide_walls(ball, &state.tuning) {
            let intensity = state.tuning.intensity(ball.speed());
            state.push_event(EventKind::WallBounce, intensity);
        }

        if physics::is_lost(ball, &state.tuning) {
            log::debug!("Ball {} lost", ball.id);
            return BallFate::Lost;
        }

        if physics::bounce_off_paddle(ball, &state.paddle, &state.tuning) {
            let intensity = state.tuning.intensity(ball.speed());
            state.push_event(EventKind::PaddleBounce, intensity);
        }

        let intensity = state.tuning.intensity(ball.speed());
        match physics::collide_bricks(ball, prev, &mut state.grid) {
            Some(BrickHit::Damaged { .. }) => {
                state.push_event(EventKind::BrickHit, intensity);
                state.award(state.tuning.score_damage, intensity);
            }
            Some(BrickHit::Destroyed { center }) => {
                state.push_event(EventKind::BrickBreak, intensity);
                state.award(state.tuning.score_destroy, intensity);
                powerups::roll_drop(state, center);
                if state.grid.remaining() == 0 {
                    return BallFate::Cleared;
                }
            }
            None => {}
        }
    }

    BallFate::InPlay
}

/// Advance to the next level, or win after the last one
fn complete_level(state: &mut GameState) {
    let intensity = state.ambient_intensity();

    if state.is_final_level() {
        state.phase = GamePhase::Win;
        state.push_event(EventKind::Win, intensity);
        log::info!("All {} levels cleared, final score {}", state.level, state.score);
        return;
    }

    state.push_event(EventKind::LevelComplete, intensity);
    state.level += 1;
    state.pickups.clear();
    state.effects = ActiveEffects::default();
    state.paddle.reset_width(state.tuning.world_width);
    state.build_level();
    state.spawn_ball_on_paddle();
}

/// Last ball gone: take a life and respawn, or end the game
fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    let intensity = state.ambient_intensity();
    state.push_event(EventKind::LifeLost, intensity);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.push_event(EventKind::GameOver, intensity);
        log::info!(
            "Game over on level {} with score {}",
            state.level,
            state.score
        );
        return;
    }

    log::info!("Life lost, {} left", state.lives);
    state.spawn_ball_on_paddle();
}
