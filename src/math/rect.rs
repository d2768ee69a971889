//! Rectangular XZ regions (page bounds, layer map bounds)
//!
//! `left`/`right` span X and `top`/`bottom` span Z, with `top < bottom`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Covers the whole XZ plane.
    pub const UNBOUNDED: Self = Self {
        left: f32::NEG_INFINITY,
        top: f32::NEG_INFINITY,
        right: f32::INFINITY,
        bottom: f32::INFINITY,
    };

    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// True when every edge is a finite number.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.top.is_finite()
            && self.right.is_finite() && self.bottom.is_finite()
    }

    /// Inclusive containment test.
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.left && x <= self.right && z >= self.top && z <= self.bottom
    }

    /// Overlap test; rectangles sharing only an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right && self.right > other.left
            && self.top < other.bottom && self.bottom > other.top
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}
