//! Pixel-space geometry used by hit-testing and overlay projection.

use crate::core::{DataPoint, PixelPoint};

const DEGENERATE_LEN_SQ: f64 = 1e-12;

/// Shortest distance from `point` to the segment `a..b`.
#[must_use]
pub fn distance_to_segment(point: PixelPoint, a: PixelPoint, b: PixelPoint) -> f64 {
    distance_to_parametric(point, a, b, 0.0, 1.0)
}

/// Shortest distance from `point` to the ray starting at `origin` through `through`.
#[must_use]
pub fn distance_to_ray(point: PixelPoint, origin: PixelPoint, through: PixelPoint) -> f64 {
    distance_to_parametric(point, origin, through, 0.0, f64::INFINITY)
}

/// Shortest distance from `point` to the infinite line through `a` and `b`.
#[must_use]
pub fn distance_to_line(point: PixelPoint, a: PixelPoint, b: PixelPoint) -> f64 {
    distance_to_parametric(point, a, b, f64::NEG_INFINITY, f64::INFINITY)
}

fn distance_to_parametric(
    point: PixelPoint,
    a: PixelPoint,
    b: PixelPoint,
    t_min: f64,
    t_max: f64,
) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < DEGENERATE_LEN_SQ {
        return point.distance_to(a);
    }

    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq).clamp(t_min, t_max);
    point.distance_to(PixelPoint::new(a.x + t * dx, a.y + t * dy))
}

/// Even-odd ray casting test. Polygons with fewer than three vertices contain nothing.
#[must_use]
pub fn point_in_polygon(point: PixelPoint, vertices: &[PixelPoint]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];
        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Distance from `point` to the closed outline through `vertices`.
#[must_use]
pub fn distance_to_outline(point: PixelPoint, vertices: &[PixelPoint]) -> f64 {
    match vertices {
        [] => f64::INFINITY,
        [only] => point.distance_to(*only),
        _ => vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .map(|(a, b)| distance_to_segment(point, *a, *b))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Clips the line through `a` and `b` to an axis-aligned rectangle.
///
/// `extend_start` / `extend_end` lift the segment bound on each side, which
/// yields a ray (one side) or an infinite line (both sides). Returns `None`
/// when nothing of the line is inside `bounds` (`left, top, right, bottom`).
#[must_use]
pub fn clip_line(
    a: PixelPoint,
    b: PixelPoint,
    bounds: (f64, f64, f64, f64),
    extend_start: bool,
    extend_end: bool,
) -> Option<(PixelPoint, PixelPoint)> {
    let (left, top, right, bottom) = bounds;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = if extend_start { f64::NEG_INFINITY } else { 0.0 };
    let mut t1 = if extend_end { f64::INFINITY } else { 1.0 };

    // Liang-Barsky: each pair is (p, q) for one clip edge.
    for (p, q) in [
        (-dx, a.x - left),
        (dx, right - a.x),
        (-dy, a.y - top),
        (dy, bottom - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    if !t0.is_finite() || !t1.is_finite() {
        // Degenerate direction with an unbounded side: collapse to the anchor.
        return Some((a, a));
    }

    Some((
        PixelPoint::new(a.x + t0 * dx, a.y + t0 * dy),
        PixelPoint::new(a.x + t1 * dx, a.y + t1 * dy),
    ))
}

/// Price of the line through `a` and `b` at bar `x`; `None` for vertical lines.
#[must_use]
pub fn line_price_at(a: DataPoint, b: DataPoint, x: f64) -> Option<f64> {
    let dx = b.x - a.x;
    if dx.abs() < f64::EPSILON {
        return None;
    }
    Some(a.y + (b.y - a.y) * (x - a.x) / dx)
}

#[cfg(test)]
mod tests {
    use super::{clip_line, distance_to_ray, distance_to_segment, point_in_polygon};
    use crate::core::PixelPoint;

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = PixelPoint::new(0.0, 0.0);
        let b = PixelPoint::new(10.0, 0.0);
        assert!((distance_to_segment(PixelPoint::new(5.0, 3.0), a, b) - 3.0).abs() <= 1e-9);
        assert!((distance_to_segment(PixelPoint::new(13.0, 4.0), a, b) - 5.0).abs() <= 1e-9);
    }

    #[test]
    fn ray_distance_extends_past_second_point() {
        let a = PixelPoint::new(0.0, 0.0);
        let b = PixelPoint::new(10.0, 0.0);
        assert!(distance_to_ray(PixelPoint::new(100.0, 2.0), a, b) <= 2.0 + 1e-9);
        assert!(distance_to_ray(PixelPoint::new(-10.0, 0.0), a, b) >= 10.0 - 1e-9);
    }

    #[test]
    fn polygon_contains_interior_point_only() {
        let tri = [
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(10.0, 0.0),
            PixelPoint::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(PixelPoint::new(2.0, 2.0), &tri));
        assert!(!point_in_polygon(PixelPoint::new(8.0, 8.0), &tri));
    }

    #[test]
    fn infinite_line_is_clipped_to_bounds() {
        let (start, end) = clip_line(
            PixelPoint::new(10.0, 50.0),
            PixelPoint::new(20.0, 50.0),
            (0.0, 0.0, 100.0, 100.0),
            true,
            true,
        )
        .expect("line crosses bounds");
        assert!((start.x - 0.0).abs() <= 1e-9);
        assert!((end.x - 100.0).abs() <= 1e-9);
    }

    #[test]
    fn segment_outside_bounds_is_dropped() {
        let clipped = clip_line(
            PixelPoint::new(200.0, 200.0),
            PixelPoint::new(300.0, 300.0),
            (0.0, 0.0, 100.0, 100.0),
            false,
            false,
        );
        assert!(clipped.is_none());
    }
}
