//! Corner ordering and quad sanity checks.

use super::Point;

/// Order four corners as `[top_left, top_right, bottom_right, bottom_left]`.
///
/// Points are sorted by their angle around the centroid (stable, so equal
/// angles keep click order), then rotated so the point with the smallest
/// `x + y` comes first (the earliest one on ties). Degenerate input still
/// yields a defined ordering.
pub fn normalize_corners(corners: &[Point; 4]) -> [Point; 4] {
    let cx = corners.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = corners.iter().map(|p| p.y).sum::<f64>() / 4.0;

    let mut ordered = *corners;
    ordered.sort_by(|a, b| {
        let angle_a = (a.y - cy).atan2(a.x - cx);
        let angle_b = (b.y - cy).atan2(b.x - cx);
        angle_a.total_cmp(&angle_b)
    });

    let mut lead = 0;
    for (i, p) in ordered.iter().enumerate() {
        if p.x + p.y < ordered[lead].x + ordered[lead].y {
            lead = i;
        }
    }
    ordered.rotate_left(lead);
    ordered
}

/// Signed area of a quad via the shoelace formula.
///
/// Positive for clockwise order in image coordinates (y down).
pub fn quad_area(quad: &[Point; 4]) -> f64 {
    let mut twice = 0.0;
    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        twice += a.x * b.y - b.x * a.y;
    }
    twice / 2.0
}

/// Whether opposite edges of the quad cross each other.
pub fn is_self_intersecting(quad: &[Point; 4]) -> bool {
    segments_cross(quad[0], quad[1], quad[2], quad[3])
        || segments_cross(quad[1], quad[2], quad[3], quad[0])
}

#[inline]
fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Proper crossing of segments `p1p2` and `p3p4` (touching does not count).
fn segments_cross(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let d1 = cross(p3, p4, p1);
    let d2 = cross(p3, p4, p2);
    let d3 = cross(p1, p2, p3);
    let d4 = cross(p1, p2, p4);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}
