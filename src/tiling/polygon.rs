//! Small 2-D polygon kernel used by the tiling generators.
//!
//! Polygons are counter-clockwise vertex lists. Clipping is
//! Sutherland-Hodgman against half-planes, which keeps convex input convex.

use crate::types::Region;

pub type Point2 = [f64; 2];

/// Signed area via the shoelace formula (positive for CCW).
pub fn signed_area(polygon: &[Point2]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..polygon.len() {
        let [x1, y1] = polygon[i];
        let [x2, y2] = polygon[(i + 1) % polygon.len()];
        acc += x1 * y2 - x2 * y1;
    }
    acc / 2.0
}

pub fn area(polygon: &[Point2]) -> f64 {
    signed_area(polygon).abs()
}

/// Area-weighted centroid; falls back to the vertex mean for degenerate
/// polygons.
pub fn centroid(polygon: &[Point2]) -> Point2 {
    let a = signed_area(polygon);
    if polygon.is_empty() {
        return [0.0, 0.0];
    }
    if a.abs() < 1e-14 {
        let n = polygon.len() as f64;
        let sx: f64 = polygon.iter().map(|p| p[0]).sum();
        let sy: f64 = polygon.iter().map(|p| p[1]).sum();
        return [sx / n, sy / n];
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..polygon.len() {
        let [x1, y1] = polygon[i];
        let [x2, y2] = polygon[(i + 1) % polygon.len()];
        let cross = x1 * y2 - x2 * y1;
        cx += (x1 + x2) * cross;
        cy += (y1 + y2) * cross;
    }
    [cx / (6.0 * a), cy / (6.0 * a)]
}

/// Clip against the half-plane `a·x + b·y <= c`.
pub fn clip_halfplane(polygon: &[Point2], a: f64, b: f64, c: f64) -> Vec<Point2> {
    const EPS: f64 = 1e-12;
    if polygon.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(polygon.len() + 1);
    for i in 0..polygon.len() {
        let p = polygon[i];
        let q = polygon[(i + 1) % polygon.len()];
        let dp = a * p[0] + b * p[1] - c;
        let dq = a * q[0] + b * q[1] - c;
        let p_in = dp <= EPS;
        let q_in = dq <= EPS;
        if p_in {
            out.push(p);
        }
        if p_in != q_in {
            let t = dp / (dp - dq);
            out.push([p[0] + t * (q[0] - p[0]), p[1] + t * (q[1] - p[1])]);
        }
    }
    if out.len() < 3 {
        Vec::new()
    } else {
        out
    }
}

/// Clip to the region rectangle `[0, W] × [0, H]`.
pub fn clip_to_region(polygon: &[Point2], region: &Region) -> Vec<Point2> {
    let mut poly = clip_halfplane(polygon, -1.0, 0.0, 0.0); // x >= 0
    poly = clip_halfplane(&poly, 1.0, 0.0, region.width); // x <= W
    poly = clip_halfplane(&poly, 0.0, -1.0, 0.0); // y >= 0
    clip_halfplane(&poly, 0.0, 1.0, region.height) // y <= H
}

/// Regular polygon approximation of a circle, counter-clockwise.
pub fn circle_polygon(center: Point2, radius: f64, segments: usize) -> Vec<Point2> {
    (0..segments)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / segments as f64;
            [
                center[0] + radius * angle.cos(),
                center[1] + radius * angle.sin(),
            ]
        })
        .collect()
}

/// Count vertices the two polygons share within tolerance. Two shared
/// vertices mean a shared edge for convex cells.
pub fn shared_vertex_count(a: &[Point2], b: &[Point2], tolerance: f64) -> usize {
    a.iter()
        .filter(|p| {
            b.iter().any(|q| {
                (p[0] - q[0]).abs() <= tolerance && (p[1] - q[1]).abs() <= tolerance
            })
        })
        .count()
}
