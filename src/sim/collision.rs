//! Collision detection for circles against axis-aligned rectangles
//!
//! Every contact in the game (ball vs paddle, ball vs brick, pickup vs paddle)
//! goes through [`circle_rect_intersect`]. Brick bounces additionally need to
//! know which side the ball came from, which [`bounce_axis`] works out from the
//! ball's position before the sub-step that produced the overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Closest point of the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            crate::clamp(p.x, self.left(), self.right()),
            crate::clamp(p.y, self.top(), self.bottom()),
        )
    }
}

/// True when the circle touches or overlaps the rectangle
#[inline]
pub fn circle_rect_intersect(rect: &Rect, center: Vec2, radius: f32) -> bool {
    center.distance_squared(rect.closest_point(center)) <= radius * radius
}

/// Which velocity component a brick impact should flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceAxis {
    /// Flip vx (side hit)
    Horizontal,
    /// Flip vy (top/bottom hit)
    Vertical,
    /// No side test matched (corner or already overlapping); treated as vertical
    Ambiguous,
}

impl BounceAxis {
    /// Whether this resolution flips the vertical component
    pub fn flips_vertical(self) -> bool {
        !matches!(self, BounceAxis::Horizontal)
    }
}

/// Classify an impact from the ball's pre-step position and its velocity
///
/// The ball "was above" when its whole circle sat on or above the brick's top
/// edge before the step, and likewise for the other three sides. A side only
/// counts if the ball is also moving toward it. When both a vertical and a
/// horizontal side match, the vertical bounce wins.
pub fn bounce_axis(rect: &Rect, prev: Vec2, vel: Vec2, radius: f32) -> BounceAxis {
    let was_above = prev.y + radius <= rect.top();
    let was_below = prev.y - radius >= rect.bottom();
    let was_left = prev.x + radius <= rect.left();
    let was_right = prev.x - radius >= rect.right();

    let vertical = (was_above && vel.y > 0.0) || (was_below && vel.y < 0.0);
    let horizontal = (was_left && vel.x > 0.0) || (was_right && vel.x < 0.0);

    if vertical {
        BounceAxis::Vertical
    } else if horizontal {
        BounceAxis::Horizontal
    } else {
        BounceAxis::Ambiguous
    }
}
