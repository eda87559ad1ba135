//! Planar geometry shared by the zone registry, tracker and interaction resolver.

mod rect;

pub use rect::{Rect, overlap_ratio};

/// A point in frame coordinates.
pub type Point = nalgebra::Point2<f32>;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point, b: &Point) -> f32 {
    nalgebra::distance(a, b)
}

/// Inclusive point-in-rectangle test on all four edges.
#[inline]
pub fn point_in_rect(point: &Point, rect: &Rect) -> bool {
    rect.contains_point(point)
}
