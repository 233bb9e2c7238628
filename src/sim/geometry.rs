//! Axis-aligned boxes for collision detection
//!
//! Screen space: x grows right, y grows down. Boxes are treated as open
//! intervals, so boxes that merely share an edge do not collide.

use glam::Vec2;

/// Axis-aligned bounding box (top-left origin + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Open-interval overlap on both axes
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Shrink to the given fractions of width/height, keeping the center
    pub fn inset(&self, width_fraction: f32, height_fraction: f32) -> Aabb {
        let size = self.size * Vec2::new(width_fraction, height_fraction);
        let pos = self.pos + (self.size - size) * 0.5;
        Aabb { pos, size }
    }
}
