//! Discrete game events for audio and UI collaborators
//!
//! The simulation pushes events onto a queue in [`super::GameState`]; the host
//! drains it after each tick and maps kinds to sounds or effects. Nothing in
//! the simulation knows how an event is presented.

use serde::{Deserialize, Serialize};

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Ball bounced off the left, right or top edge
    WallBounce,
    /// Ball bounced off the paddle
    PaddleBounce,
    /// Ball damaged a brick that survived
    BrickHit,
    /// Ball destroyed a brick
    BrickBreak,
    /// All bricks in the level are gone
    LevelComplete,
    Pause,
    Resume,
    /// Last ball left the world
    LifeLost,
    GameOver,
    /// Final level cleared
    Win,
    PowerUpCollected,
    /// Score passed the stored high score (once per session)
    NewHighScore,
}

/// An event with a loudness hint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    /// 0.0 at base ball speed, 1.0 at max ball speed
    pub intensity: f32,
}
