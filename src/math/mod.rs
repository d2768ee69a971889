//! Bounding volumes and page rectangles

pub mod aabb;
pub mod rect;

pub use aabb::Aabb;
pub use rect::Rect;
