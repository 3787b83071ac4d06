//! Collision shapes and overlap tests.
//!
//! Fixtures carry a [`Shape`] in body-local space; the contact detector moves
//! it into world space every step and runs the overlap test matching the two
//! shape variants.

pub mod polyline;
pub mod rect;

use glam::Vec2;

pub use polyline::Polyline;
pub use rect::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Polyline(Polyline),
}

impl Shape {
    pub fn translated(&self, by: Vec2) -> Shape {
        match self {
            Shape::Rect(r) => Shape::Rect(r.translated(by)),
            Shape::Polyline(p) => Shape::Polyline(p.translated(by)),
        }
    }

    /// Axis-aligned bounds, used by the broad phase.
    pub fn aabb(&self) -> Rect {
        match self {
            Shape::Rect(r) => *r,
            Shape::Polyline(p) => p.bounding_rect(),
        }
    }

    pub fn overlaps(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Rect(a), Shape::Rect(b)) => a.overlaps(b),
            (Shape::Rect(r), Shape::Polyline(p)) | (Shape::Polyline(p), Shape::Rect(r)) => {
                p.overlaps_rect(r)
            }
            (Shape::Polyline(a), Shape::Polyline(b)) => a.overlaps_polyline(b),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            Shape::Rect(r) => r.contains(point),
            Shape::Polyline(p) => p
                .segments()
                .any(|(a, b)| polyline::segment_intersection(a, b, point, point).is_some()),
        }
    }

    pub fn as_rect(&self) -> Option<&Rect> {
        match self {
            Shape::Rect(r) => Some(r),
            Shape::Polyline(_) => None,
        }
    }

    pub fn as_polyline(&self) -> Option<&Polyline> {
        match self {
            Shape::Polyline(p) => Some(p),
            Shape::Rect(_) => None,
        }
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Shape::Rect(rect)
    }
}

impl From<Polyline> for Shape {
    fn from(line: Polyline) -> Self {
        Shape::Polyline(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_shapes_overlap_symmetrically() {
        let rect: Shape = Rect::new(0.0, 0.0, 2.0, 2.0).into();
        let line: Shape = Polyline::line(Vec2::new(-1.0, 1.0), Vec2::new(3.0, 1.0)).into();
        assert!(rect.overlaps(&line));
        assert!(line.overlaps(&rect));
    }

    #[test]
    fn polyline_aabb_encloses_points() {
        let line: Shape = Polyline::line(Vec2::new(3.0, -1.0), Vec2::new(-1.0, 2.0)).into();
        assert_eq!(line.aabb(), Rect::new(-1.0, -1.0, 4.0, 3.0));
    }
}
