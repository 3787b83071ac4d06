use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its bottom-left corner, y pointing up.
///
/// Width and height are not validated here; owners that need non-negative
/// sizes (see [`Body`](crate::components::body::Body)) check on write.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
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

    /// Rectangle of the given size centred on `center`.
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn min(&self) -> Vec2 {
        self.position()
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top_center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height)
    }

    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y)
    }

    /// Point on the boundary facing `heading`: corners for diagonal headings,
    /// edge midpoints for axis-aligned ones, the centre for zero.
    pub fn leading_point(&self, heading: Vec2) -> Vec2 {
        let pick = |v: f32, min: f32, max: f32| {
            if v > 0.0 {
                max
            } else if v < 0.0 {
                min
            } else {
                (min + max) / 2.0
            }
        };
        let (min, max) = (self.min(), self.max());
        Vec2::new(pick(heading.x, min.x, max.x), pick(heading.y, min.y, max.y))
    }

    pub fn translated(&self, by: Vec2) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }

    pub fn translate(&mut self, by: Vec2) {
        self.x += by.x;
        self.y += by.y;
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (min_a, max_a) = (self.min(), self.max());
        let (min_b, max_b) = (other.min(), other.max());
        min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
    }

    /// Inclusive point containment.
    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// The four edges in counter-clockwise order starting at the bottom edge.
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let bl = self.min();
        let tr = self.max();
        let br = Vec2::new(tr.x, bl.y);
        let tl = Vec2::new(bl.x, tr.y);
        [(bl, br), (br, tr), (tr, tl), (tl, bl)]
    }

    /// Smallest rectangle enclosing every point; `None` for an empty slice.
    pub fn enclosing(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }
}
