//! Collision detection and response for axis-aligned geometry
//!
//! Balls are circles, everything else (paddle, bricks, power-ups) is an
//! axis-aligned rectangle. Response is a reflection about the axis of
//! minimum penetration, not a rigid-body solve.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
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
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Strict overlap test between two rectangles (touching edges do not overlap)
#[inline]
pub fn intersect_aabb(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Check whether a circle overlaps a rectangle (touching counts)
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let nearest = Vec2::new(
        center.x.clamp(rect.x, rect.right()),
        center.y.clamp(rect.y, rect.bottom()),
    );
    (center - nearest).length_squared() <= radius * radius
}

/// Collision normal for a ball against a rectangle
///
/// Returns `None` when the circle does not overlap the rectangle. Otherwise
/// returns the axis-aligned unit normal of the side with the smallest
/// penetration, pointing out of the rectangle toward the ball. Ties resolve
/// in the order left, right, top, bottom.
pub fn resolve_ball_rect_normal(center: Vec2, radius: f32, rect: &Rect) -> Option<Vec2> {
    if !circle_intersects_rect(center, radius, rect) {
        return None;
    }

    let left_pen = center.x + radius - rect.x;
    let right_pen = rect.right() - (center.x - radius);
    let top_pen = center.y + radius - rect.y;
    let bottom_pen = rect.bottom() - (center.y - radius);

    let min_pen = left_pen.min(right_pen).min(top_pen).min(bottom_pen);
    let normal = if min_pen == left_pen {
        Vec2::NEG_X
    } else if min_pen == right_pen {
        Vec2::X
    } else if min_pen == top_pen {
        Vec2::NEG_Y
    } else {
        Vec2::Y
    };
    Some(normal)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n. The normal is normalized first;
/// a zero normal leaves the velocity unchanged.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    let n = normal.normalize_or_zero();
    velocity - 2.0 * velocity.dot(n) * n
}
