//! Read-only render view of a game state
//!
//! Renderers (and the JSON dump in the binary) consume a [`Snapshot`] instead
//! of reaching into [`GameState`]. Building one only borrows the state, so it
//! can never interleave with a tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::{GamePhase, GameState, PickupKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
    /// Recent positions, newest first
    pub trail: Vec<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickView {
    pub rect: Rect,
    /// 0xRRGGBB
    pub color: u32,
    /// 0.0 untouched, grows with each hit taken
    pub damage: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupView {
    pub pos: Vec2,
    pub kind: PickupKind,
    pub size: f32,
}

/// Heads-up display values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u8,
    pub level: usize,
    pub level_count: usize,
    pub high_score: u64,
    pub phase: GamePhase,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub world: Vec2,
    pub paddle: Rect,
    pub balls: Vec<BallView>,
    pub bricks: Vec<BrickView>,
    pub pickups: Vec<PickupView>,
    pub hud: Hud,
}

impl GameState {
    /// Capture the drawable state
    pub fn snapshot(&self) -> Snapshot {
        let balls = self
            .balls
            .iter()
            .map(|ball| BallView {
                pos: ball.pos,
                radius: ball.radius,
                trail: ball.trail.iter().map(|p| p.pos).collect(),
            })
            .collect();

        let bricks = self
            .grid
            .bricks()
            .map(|(_, _, brick)| BrickView {
                rect: brick.rect,
                color: brick.color,
                damage: brick.damage_fraction(),
            })
            .collect();

        let size = self.tuning.powerup_size;
        let pickups = self
            .pickups
            .iter()
            .map(|p| PickupView {
                pos: p.pos,
                kind: p.kind,
                size,
            })
            .collect();

        Snapshot {
            world: Vec2::new(self.tuning.world_width, self.tuning.world_height),
            paddle: self.paddle.rect(),
            balls,
            bricks,
            pickups,
            hud: Hud {
                score: self.score,
                lives: self.lives,
                level: self.level,
                level_count: self.level_count(),
                high_score: self.high_score,
                phase: self.phase,
            },
        }
    }
}
