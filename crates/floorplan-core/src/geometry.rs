//! 2D polygon helpers used to derive floor geometry

use glam::Vec2;

/// Signed area of a polygon (positive for counter-clockwise winding)
pub fn signed_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Area-weighted centroid of a simple polygon.
///
/// Falls back to the vertex average for degenerate (zero area) input.
pub fn polygon_centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    let area = signed_area(points);
    if area.abs() < 1e-6 {
        return points.iter().copied().sum::<Vec2>() / points.len() as f32;
    }

    let mut c = Vec2::ZERO;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let cross = a.x * b.y - b.x * a.y;
        c += (*a + b) * cross;
    }
    c / (6.0 * area)
}

/// Triangulate a simple polygon by ear clipping.
///
/// Returns index triples into `points`, wound counter-clockwise regardless of
/// the input winding. Polygons with fewer than three points produce nothing.
pub fn triangulate_polygon(points: &[Vec2]) -> Vec<[u32; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    if signed_area(points) < 0.0 {
        remaining.reverse();
    }

    let mut triangles = Vec::with_capacity(n - 2);
    // Every pass either clips an ear or gives up, so this bounds the loop
    let mut guard = n * n;

    while remaining.len() > 3 && guard > 0 {
        guard -= 1;
        let len = remaining.len();
        let mut clipped = false;

        for i in 0..len {
            let prev = remaining[(i + len - 1) % len];
            let cur = remaining[i];
            let next = remaining[(i + 1) % len];

            if !is_ear(points, &remaining, prev, cur, next) {
                continue;
            }

            triangles.push([prev as u32, cur as u32, next as u32]);
            remaining.remove(i);
            clipped = true;
            break;
        }

        if !clipped {
            // Self-intersecting or collinear input, fan the rest
            tracing::debug!("Ear clipping stalled, fanning {} vertices", remaining.len());
            break;
        }
    }

    if remaining.len() >= 3 {
        for i in 1..remaining.len() - 1 {
            triangles.push([
                remaining[0] as u32,
                remaining[i] as u32,
                remaining[i + 1] as u32,
            ]);
        }
    }

    triangles
}

fn is_ear(points: &[Vec2], remaining: &[usize], prev: usize, cur: usize, next: usize) -> bool {
    let a = points[prev];
    let b = points[cur];
    let c = points[next];

    // Reflex or degenerate corner
    if (b - a).perp_dot(c - b) <= 1e-9 {
        return false;
    }

    remaining
        .iter()
        .filter(|&&idx| idx != prev && idx != cur && idx != next)
        .all(|&idx| !point_in_triangle(points[idx], a, b, c))
}

/// Check whether `p` lies inside or on the triangle `abc`
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
