use glam::Vec2;
use smallvec::SmallVec;

use super::rect::Rect;

const EPSILON: f32 = 1e-6;

/// Open chain of line segments. Lasers use a two-point polyline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub points: SmallVec<[Vec2; 4]>,
}

impl Polyline {
    pub fn new(points: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn line(start: Vec2, end: Vec2) -> Self {
        Self::new([start, end])
    }

    pub fn translated(&self, by: Vec2) -> Self {
        Self::new(self.points.iter().map(|p| *p + by))
    }

    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::enclosing(&self.points).unwrap_or_default()
    }

    /// True if some segment passes through the rectangle's interior.
    ///
    /// Strict like [`Rect::overlaps`]: a segment that only runs along an
    /// edge or touches a corner does not overlap. Degenerate rectangles
    /// have no interior and never overlap.
    pub fn overlaps_rect(&self, rect: &Rect) -> bool {
        self.segments().any(|(a, b)| {
            clip_to_rect(a, b, rect).is_some_and(|(p, q)| strictly_inside(rect, (p + q) / 2.0))
        })
    }

    pub fn overlaps_polyline(&self, other: &Polyline) -> bool {
        self.segments().any(|(a, b)| {
            other
                .segments()
                .any(|(c, d)| segment_intersection(a, b, c, d).is_some())
        })
    }

    /// Points where this polyline crosses the rectangle's edges, pushed onto `out`.
    pub fn intersect_rect(&self, rect: &Rect, out: &mut Vec<Vec2>) {
        for (a, b) in self.segments() {
            for (c, d) in rect.edges() {
                if let Some(p) = segment_intersection(a, b, c, d) {
                    if !out.iter().any(|q| q.distance_squared(p) < EPSILON) {
                        out.push(p);
                    }
                }
            }
        }
    }
}

/// Part of segment `ab` inside the closed rectangle (Liang-Barsky).
fn clip_to_rect(a: Vec2, b: Vec2, rect: &Rect) -> Option<(Vec2, Vec2)> {
    let (min, max) = (rect.min(), rect.max());
    let d = b - a;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    for (p, q) in [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a + d * t0, a + d * t1))
}

// The clipped part is convex, so its midpoint is interior whenever any of
// its points is.
fn strictly_inside(rect: &Rect, point: Vec2) -> bool {
    let (min, max) = (rect.min(), rect.max());
    point.x > min.x && point.x < max.x && point.y > min.y && point.y < max.y
}

/// Intersection point of segments `ab` and `cd`. Collinear overlaps report
/// the first endpoint of `cd` lying on `ab`.
pub fn segment_intersection(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<Vec2> {
    let r = b - a;
    let s = d - c;
    let denom = r.perp_dot(s);
    let qp = c - a;

    if denom.abs() < EPSILON {
        if qp.perp_dot(r).abs() >= EPSILON {
            return None;
        }
        let len_sq = r.length_squared();
        if len_sq < EPSILON {
            return (a.distance_squared(c) < EPSILON).then_some(a);
        }
        let unit = -EPSILON..=1.0 + EPSILON;
        let on_cd = |p: Vec2| {
            let s_len_sq = s.length_squared();
            if s_len_sq < EPSILON {
                p.distance_squared(c) < EPSILON
            } else {
                unit.contains(&((p - c).dot(s) / s_len_sq))
            }
        };
        return [c, d, a, b]
            .into_iter()
            .find(|p| unit.contains(&((*p - a).dot(r) / len_sq)) && on_cd(*p));
    }

    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a + r * t)
    } else {
        None
    }
}
