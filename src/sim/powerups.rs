//! Power-up drops, pickup and effects
//!
//! A destroyed brick may drop a pickup that falls straight down. Catching it
//! with the paddle applies its effect; letting it fall out of the world just
//! removes it.

use glam::Vec2;
use rand::Rng;

use super::collision::circle_rect_intersect;
use super::events::EventKind;
use super::state::{GameState, Pickup, PickupKind};

const KINDS: [PickupKind; 3] = [
    PickupKind::WidenPaddle,
    PickupKind::SpeedBoost,
    PickupKind::MultiBall,
];

/// Maybe spawn a pickup where a brick was destroyed
pub fn roll_drop(state: &mut GameState, at: Vec2) {
    let roll: f64 = state.rng.random();
    if roll >= state.tuning.powerup_drop_chance {
        return;
    }

    let kind = choose_kind(state);
    let id = state.next_entity_id();
    let vel = Vec2::new(0.0, state.tuning.powerup_fall_speed);
    log::debug!("Pickup {id} ({kind:?}) dropped at ({:.0}, {:.0})", at.x, at.y);
    state.pickups.push(Pickup {
        id,
        kind,
        pos: at,
        vel,
    });
}

/// Weighted pick from the tuning's power-up weights
fn choose_kind(state: &mut GameState) -> PickupKind {
    let weights = state.tuning.powerup_weights;
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return PickupKind::WidenPaddle;
    }

    let mut roll = state.rng.random_range(0..total);
    for (kind, weight) in KINDS.iter().zip(weights) {
        if roll < weight {
            return *kind;
        }
        roll -= weight;
    }
    PickupKind::MultiBall
}

/// Move pickups, collect the ones touching the paddle, run effect timers
pub fn update(state: &mut GameState, dt: f32) {
    for pickup in state.pickups.iter_mut() {
        pickup.pos += pickup.vel * dt;
    }

    let paddle = state.paddle.rect();
    let half = state.tuning.powerup_size / 2.0;
    let floor = state.tuning.world_height;

    let mut collected: Vec<PickupKind> = Vec::new();
    state.pickups.retain(|pickup| {
        if circle_rect_intersect(&paddle, pickup.pos, half) {
            collected.push(pickup.kind);
            false
        } else {
            // Gone once fully below the world
            pickup.pos.y - half <= floor
        }
    });

    for kind in collected {
        apply(state, kind);
        let intensity = state.ambient_intensity();
        state.push_event(EventKind::PowerUpCollected, intensity);
    }

    tick_effects(state, dt);
}

/// Apply a collected power-up
pub fn apply(state: &mut GameState, kind: PickupKind) {
    let world_w = state.tuning.world_width;
    match kind {
        PickupKind::WidenPaddle => {
            // Refresh, never stack
            state.paddle.set_width(state.tuning.wide_paddle_width, world_w);
            state.effects.widen_secs = state.tuning.wide_paddle_secs;
        }
        PickupKind::SpeedBoost => {
            let boost = state.tuning.speed_boost;
            let max = state.tuning.ball_max_speed;
            for ball in state.balls.iter_mut() {
                ball.set_speed((ball.speed() + boost).min(max));
            }
        }
        PickupKind::MultiBall => {
            if state.balls.len() >= state.tuning.max_balls {
                return;
            }
            let Some(mut twin) = state.balls.first().cloned() else {
                return;
            };
            let spread = state.tuning.multi_ball_spread_deg.to_radians();
            twin.id = state.next_entity_id();
            twin.set_direction(crate::rotate(twin.vel(), spread));
            state.balls.push(twin);
        }
    }
    log::debug!("Power-up {kind:?} applied");
}

/// Count down timed effects; the paddle snaps back when the widen timer ends
fn tick_effects(state: &mut GameState, dt: f32) {
    if state.effects.widen_secs <= 0.0 {
        return;
    }
    state.effects.widen_secs -= dt;
    if state.effects.widen_secs <= 0.0 {
        state.effects.widen_secs = 0.0;
        state.paddle.reset_width(state.tuning.world_width);
        log::debug!("Wide paddle expired");
    }
}
