//! Planar geometry primitives. Pure functions, no state.

use crate::Point;

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        distance(self, other)
    }

    /// Linear interpolation from `a` (t = 0) to `b` (t = 1).
    pub fn lerp(a: Point, b: Point, t: f64) -> Point {
        Point {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        }
    }
}

pub fn distance(p: Point, q: Point) -> f64 {
    (q.x - p.x).hypot(q.y - p.y)
}

/// Distance from `point` to the closest point on the segment `start..end`.
///
/// A zero-length segment degenerates to the distance to `start`.
pub fn point_segment_distance(point: Point, start: Point, end: Point) -> f64 {
    let cx = end.x - start.x;
    let cy = end.y - start.y;
    let len_sq = cx * cx + cy * cy;
    if len_sq == 0.0 {
        return distance(point, start);
    }
    let t = ((point.x - start.x) * cx + (point.y - start.y) * cy) / len_sq;
    let closest = if t < 0.0 {
        start
    } else if t > 1.0 {
        end
    } else {
        Point::lerp(start, end, t)
    };
    distance(point, closest)
}

/// True iff segments `a1..a2` and `b1..b2` cross.
///
/// Segments sharing an endpoint never intersect, and neither do parallel
/// segments (including collinear overlaps).
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    if a1 == b1 || a1 == b2 || a2 == b1 || a2 == b2 {
        return false;
    }
    let denominator = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denominator == 0.0 {
        return false;
    }
    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denominator;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denominator;
    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// True iff `candidate` keeps at least `min_distance` from every existing point.
pub fn is_well_spaced(
    candidate: Point,
    existing: impl IntoIterator<Item = Point>,
    min_distance: f64,
) -> bool {
    existing
        .into_iter()
        .all(|p| distance(candidate, p) >= min_distance)
}
