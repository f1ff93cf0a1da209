//! Collision geometry for circles and axis-aligned rectangles
//!
//! Entities are circles, but against obstacles they are approximated by their
//! bounding square. Everything here is a total function of its input.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacles::Obstacle;
use crate::consts::COLLISION_EPSILON;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding square of a circle
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            radius * 2.0,
            radius * 2.0,
        )
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// The point, taken as a 1x1 cell anchored at its top-left, overlaps this
    /// rect. Accepts x in (left - 1, right) and likewise for y.
    pub fn contains(&self, point: Vec2) -> bool {
        rects_overlap(&Rect::new(point.x, point.y, 1.0, 1.0), self)
    }
}

/// True iff the rectangles share positive area. Touching edges do not count.
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Would a circle of `radius` centered at `next` overlap any fence?
pub fn entity_blocked_by_fence(radius: f32, next: Vec2, obstacles: &[Obstacle]) -> bool {
    let bounds = Rect::around(next, radius);
    obstacles.iter().any(|obstacle| match obstacle {
        Obstacle::Fence(rect) => rects_overlap(&bounds, rect),
        Obstacle::Bush(_) => false,
    })
}

/// Is the point inside any bush?
pub fn point_in_bush(point: Vec2, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().any(|obstacle| match obstacle {
        Obstacle::Bush(rect) => rect.contains(point),
        Obstacle::Fence(_) => false,
    })
}

/// Circle hit test with a one-unit tolerance
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) - a_radius - b_radius < COLLISION_EPSILON
}

/// Move a circle by `delta`, sliding along fences one axis at a time
///
/// X is resolved first, then Y using the (possibly rejected) X, then X is
/// checked once more so diagonal approaches to a corner slide instead of
/// sticking. Returns the resolved position.
pub fn resolve_fenced_move(pos: Vec2, delta: Vec2, radius: f32, obstacles: &[Obstacle]) -> Vec2 {
    let mut target = pos + delta;

    if entity_blocked_by_fence(radius, Vec2::new(target.x, pos.y), obstacles) {
        target.x = pos.x;
    }

    if entity_blocked_by_fence(radius, target, obstacles) {
        target.y = pos.y;
    }

    if target.x != pos.x && entity_blocked_by_fence(radius, target, obstacles) {
        target.x = pos.x;
    }

    target
}
