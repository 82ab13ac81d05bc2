//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep, clamped per tick
//! - Seeded RNG only
//! - Stable iteration order (balls, then bricks row-major)
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod level;
pub mod physics;
pub mod powerups;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{BounceAxis, Rect, bounce_axis, circle_rect_intersect};
pub use events::{EventKind, GameEvent};
pub use level::{BrickGrid, BrickHit, LevelDef, builtin_levels, levels_from_json};
pub use snapshot::Snapshot;
pub use state::{
    ActiveEffects, Ball, Brick, BrickKind, GamePhase, GameState, Paddle, Pickup, PickupKind,
    TrailPoint,
};
pub use tick::{TickInput, tick};
