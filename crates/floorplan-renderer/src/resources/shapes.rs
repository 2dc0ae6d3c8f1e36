//! Mesh builders for the simple shapes the viewer needs.

use glam::Vec3;

use super::MeshData;
use crate::vertex::MeshVertex;

/// Flat-shaded mesh from a triangle soup.
///
/// Each triangle gets its own three vertices carrying the face normal.
/// Degenerate triangles are dropped.
pub fn flat_triangles(triangles: &[[Vec3; 3]]) -> MeshData {
    let mut vertices = Vec::with_capacity(triangles.len() * 3);
    let mut indices = Vec::with_capacity(triangles.len() * 3);

    for [a, b, c] in triangles {
        let normal = (*b - *a).cross(*c - *a);
        if normal.length_squared() < 1e-12 {
            continue;
        }
        let normal = normal.normalize();

        let base = vertices.len() as u32;
        for p in [a, b, c] {
            vertices.push(MeshVertex::new(*p, normal));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    MeshData::indexed(vertices, indices)
}

/// Flat-shaded mesh from indexed positions
pub fn flat_indexed(positions: &[[f32; 3]], indices: &[u32]) -> MeshData {
    let triangles: Vec<[Vec3; 3]> = indices
        .chunks_exact(3)
        .filter(|tri| tri.iter().all(|&i| (i as usize) < positions.len()))
        .map(|tri| {
            [
                Vec3::from(positions[tri[0] as usize]),
                Vec3::from(positions[tri[1] as usize]),
                Vec3::from(positions[tri[2] as usize]),
            ]
        })
        .collect();
    flat_triangles(&triangles)
}

/// Single quad, corners in counter-clockwise order as seen from the front
pub fn quad(corners: [Vec3; 4]) -> MeshData {
    let [a, b, c, d] = corners;
    flat_triangles(&[[a, b, c], [a, c, d]])
}

/// Axis-aligned box with outward-facing faces
pub fn cuboid(min: Vec3, max: Vec3) -> MeshData {
    let p = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
    let (a, b) = (min, max);

    let faces = [
        // +X
        [p(b.x, a.y, b.z), p(b.x, a.y, a.z), p(b.x, b.y, a.z), p(b.x, b.y, b.z)],
        // -X
        [p(a.x, a.y, a.z), p(a.x, a.y, b.z), p(a.x, b.y, b.z), p(a.x, b.y, a.z)],
        // +Y
        [p(a.x, b.y, b.z), p(b.x, b.y, b.z), p(b.x, b.y, a.z), p(a.x, b.y, a.z)],
        // -Y
        [p(a.x, a.y, a.z), p(b.x, a.y, a.z), p(b.x, a.y, b.z), p(a.x, a.y, b.z)],
        // +Z
        [p(a.x, a.y, b.z), p(b.x, a.y, b.z), p(b.x, b.y, b.z), p(a.x, b.y, b.z)],
        // -Z
        [p(b.x, a.y, a.z), p(a.x, a.y, a.z), p(a.x, b.y, a.z), p(b.x, b.y, a.z)],
    ];

    let triangles: Vec<[Vec3; 3]> = faces
        .iter()
        .flat_map(|[q0, q1, q2, q3]| [[*q0, *q1, *q2], [*q0, *q2, *q3]])
        .collect();
    flat_triangles(&triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cuboid_normals_point_outward() {
        let mesh = cuboid(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(mesh.triangle_count(), 12);

        for tri in mesh.indices.chunks_exact(3) {
            let v = mesh.vertices[tri[0] as usize];
            let centroid = tri
                .iter()
                .map(|&i| Vec3::from(mesh.vertices[i as usize].position))
                .sum::<Vec3>()
                / 3.0;
            assert!(centroid.dot(Vec3::from(v.normal)) > 0.0);
        }
    }

    #[test]
    fn test_quad_bounds() {
        let mesh = quad([
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 3.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
        ]);
        assert_eq!(mesh.triangle_count(), 2);
        assert_relative_eq!(mesh.bounds.size().y, 3.0);
        assert_relative_eq!(mesh.vertices[0].normal[2], 1.0);
    }

    #[test]
    fn test_degenerate_triangles_dropped() {
        let mesh = flat_triangles(&[[Vec3::ZERO, Vec3::X, Vec3::X * 2.0]]);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.bounds.is_empty());
    }

    #[test]
    fn test_flat_indexed_ignores_out_of_range() {
        let mesh = flat_indexed(&[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], &[0, 1, 2, 0, 1, 9]);
        assert_eq!(mesh.triangle_count(), 1);
    }
}
