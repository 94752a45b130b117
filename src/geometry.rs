//! Floating-point rectangles anchored on sprite bounds.

use glam::Vec2;

/// Axis-aligned rectangle with a floating-point top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Self {
            x: center.x - w / 2.0,
            y: center.y - h / 2.0,
            w,
            h,
        }
    }

    pub fn from_midbottom(midbottom: Vec2, w: f32, h: f32) -> Self {
        Self {
            x: midbottom.x - w / 2.0,
            y: midbottom.y - h,
            w,
            h,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn midtop(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y)
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Strict overlap; rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Shift so the rectangle lies inside `0..width` x `0..height`.
    pub fn clamp_within(&mut self, width: f32, height: f32) {
        self.x = self.x.min(width - self.w).max(0.0);
        self.y = self.y.min(height - self.h).max(0.0);
    }

    /// True if the rectangle lies fully inside `0..width` x `0..height`.
    pub fn inside(&self, width: f32, height: f32) -> bool {
        self.left() >= 0.0 && self.top() >= 0.0 && self.right() <= width && self.bottom() <= height
    }

    /// Integer top-left corner used when blitting and comparing masks.
    pub fn pixel_origin(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}
