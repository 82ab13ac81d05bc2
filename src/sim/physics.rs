//! Ball physics for one sub-step
//!
//! These functions only touch the ball and the piece of the world they test
//! against; scoring, events and power-up drops are handled by the tick.

use glam::Vec2;

use super::collision::{BounceAxis, Rect, bounce_axis, circle_rect_intersect};
use super::level::{BrickGrid, BrickHit};
use super::state::{Ball, Paddle};
use crate::clamp;
use crate::tuning::Tuning;

/// Gap left between the ball and a surface it was pushed out of
const CONTACT_SEPARATION: f32 = 0.1;

/// Number of integration steps for a ball at `speed`
///
/// Faster balls get more, smaller steps so they cannot skip over a brick or
/// wall between two evaluations; capped to bound per-frame work.
pub fn substep_count(speed: f32, tuning: &Tuning) -> u32 {
    let steps = (speed / tuning.speed_per_substep).ceil();
    if !steps.is_finite() {
        return 1;
    }
    (steps as u32).clamp(1, tuning.max_substeps.max(1))
}

/// Reflect off the left, right and top edges. Returns true on a bounce.
///
/// The bottom edge is open: leaving through it loses the ball.
pub fn collide_walls(ball: &mut Ball, tuning: &Tuning) -> bool {
    let r = ball.radius;
    let mut bounced = false;

    if ball.pos.x - r < 0.0 {
        ball.pos.x = r;
        ball.set_x_sign(true);
        bounced = true;
    } else if ball.pos.x + r > tuning.world_width {
        ball.pos.x = tuning.world_width - r;
        ball.set_x_sign(false);
        bounced = true;
    }

    if ball.pos.y - r < 0.0 {
        ball.pos.y = r;
        ball.set_y_sign(true);
        bounced = true;
    }

    bounced
}

/// A ball is lost once its top edge is strictly below the world
#[inline]
pub fn is_lost(ball: &Ball, tuning: &Tuning) -> bool {
    ball.pos.y - ball.radius > tuning.world_height
}

/// Bounce off the paddle if touching it. Returns true on a bounce.
///
/// The outgoing angle depends only on where the ball meets the paddle: the
/// center sends it straight up, the edges at `max_bounce_angle_deg` from
/// vertical. Speed is unchanged except for the every-Nth-hit speed-up.
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, tuning: &Tuning) -> bool {
    if !circle_rect_intersect(&paddle.rect(), ball.pos, ball.radius) {
        return false;
    }

    // Lift the ball clear so the next step does not hit again
    ball.pos.y = paddle.y - ball.radius - CONTACT_SEPARATION;

    let half = paddle.width() / 2.0;
    let offset = if half > 0.0 {
        clamp((ball.pos.x - paddle.center_x()) / half, -1.0, 1.0)
    } else {
        0.0
    };
    let angle = offset * tuning.max_bounce_angle_deg.to_radians();

    ball.paddle_hits += 1;
    if ball.paddle_hits % tuning.paddle_hits_per_speedup.max(1) == 0 {
        let faster = (ball.speed() + tuning.paddle_speedup).min(tuning.ball_max_speed);
        ball.set_speed(faster);
    }
    ball.set_direction(Vec2::new(angle.sin(), -angle.cos()));

    true
}

/// Resolve at most one brick impact for this sub-step
///
/// Only the 3x3 block of cells around the ball is searched, row-major; the
/// sub-step bound keeps the ball from crossing more than one cell per step.
/// `prev` is the ball position before this sub-step's integration.
pub fn collide_bricks(ball: &mut Ball, prev: Vec2, grid: &mut BrickGrid) -> Option<BrickHit> {
    let (row, col) = grid.cell_of(ball.pos);

    // Far-off positions estimate cells near the i64 limits
    for r in row.saturating_sub(1)..=row.saturating_add(1) {
        for c in col.saturating_sub(1)..=col.saturating_add(1) {
            let Some(brick) = grid.get(r, c) else {
                continue;
            };
            if !circle_rect_intersect(&brick.rect, ball.pos, ball.radius) {
                continue;
            }
            let rect = brick.rect;
            let axis = bounce_axis(&rect, prev, ball.vel(), ball.radius);
            let hit = grid.damage(r as usize, c as usize)?;
            resolve_brick_bounce(ball, &rect, axis);
            return Some(hit);
        }
    }

    None
}

/// Flip the chosen velocity component and move the ball out of the brick
pub fn resolve_brick_bounce(ball: &mut Ball, rect: &Rect, axis: BounceAxis) {
    let center = rect.center();
    let r = ball.radius + CONTACT_SEPARATION;
    if axis.flips_vertical() {
        ball.flip_y();
        ball.pos.y = if ball.pos.y < center.y {
            rect.top() - r
        } else {
            rect.bottom() + r
        };
    } else {
        ball.flip_x();
        ball.pos.x = if ball.pos.x < center.x {
            rect.left() - r
        } else {
            rect.right() + r
        };
    }
}
