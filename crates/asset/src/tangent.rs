//! Per-vertex tangent frames for normal mapping, computed from a welded mesh.

use glam::{Vec2, Vec3, Vec4};

use crate::mesh::Mesh;

/// UV-space triangles with a smaller signed area are skipped.
const MIN_UV_AREA: f32 = 1e-12;

/// One `[x, y, z, w]` tangent per vertex. `xyz` is unit length and orthogonal
/// to the vertex normal, `w` is the bitangent sign (`bitangent = w * n × t`).
pub fn compute_tangents(mesh: &Mesh) -> Vec<[f32; 4]> {
    let count = mesh.vertices.len();
    let mut tan = vec![Vec3::ZERO; count];
    let mut bitan = vec![Vec3::ZERO; count];

    for tri in mesh.indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (v0, v1, v2) = (&mesh.vertices[i0], &mesh.vertices[i1], &mesh.vertices[i2]);

        let p0 = Vec3::from_array(v0.position);
        let e1 = Vec3::from_array(v1.position) - p0;
        let e2 = Vec3::from_array(v2.position) - p0;

        let uv0 = Vec2::new(v0.texcoord[0], v0.texcoord[1]);
        let d1 = Vec2::new(v1.texcoord[0], v1.texcoord[1]) - uv0;
        let d2 = Vec2::new(v2.texcoord[0], v2.texcoord[1]) - uv0;

        let det = d1.perp_dot(d2);
        if det.abs() < MIN_UV_AREA {
            continue;
        }
        let r = det.recip();
        let t = (e1 * d2.y - e2 * d1.y) * r;
        let b = (e2 * d1.x - e1 * d2.x) * r;

        for i in [i0, i1, i2] {
            tan[i] += t;
            bitan[i] += b;
        }
    }

    mesh.vertices
        .iter()
        .zip(tan.iter().zip(&bitan))
        .map(|(vertex, (&t, &b))| {
            let n = Vec3::from_array(vertex.normal).normalize_or_zero();
            // Gram-Schmidt against the normal.
            let ortho = (t - n * n.dot(t)).normalize_or_zero();
            if ortho == Vec3::ZERO {
                return fallback(n).to_array();
            }
            let w = if n.cross(ortho).dot(b) < 0.0 { -1.0 } else { 1.0 };
            ortho.extend(w).to_array()
        })
        .collect()
}

/// Any unit vector perpendicular to `n`, right-handed.
fn fallback(n: Vec3) -> Vec4 {
    let t = if n == Vec3::ZERO {
        Vec3::X
    } else {
        n.any_orthonormal_vector()
    };
    t.extend(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Vertex;

    fn quad(flip_u: bool) -> Mesh {
        let n = [0.0, 0.0, 1.0];
        let u = |x: f32| if flip_u { 1.0 - x } else { x };
        Mesh::new(
            vec![
                Vertex::new([0.0, 0.0, 0.0], [u(0.0), 0.0, 0.0], n),
                Vertex::new([1.0, 0.0, 0.0], [u(1.0), 0.0, 0.0], n),
                Vertex::new([1.0, 1.0, 0.0], [u(1.0), 1.0, 0.0], n),
                Vertex::new([0.0, 1.0, 0.0], [u(0.0), 1.0, 0.0], n),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    fn approx(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(&b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn tangent_follows_u_axis() {
        let tangents = compute_tangents(&quad(false));
        assert_eq!(tangents.len(), 4);
        for t in tangents {
            assert!(approx(t, [1.0, 0.0, 0.0, 1.0]), "{t:?}");
        }
    }

    #[test]
    fn mirrored_uvs_flip_handedness() {
        let tangents = compute_tangents(&quad(true));
        for t in tangents {
            assert!(approx(t, [-1.0, 0.0, 0.0, -1.0]), "{t:?}");
        }
    }

    #[test]
    fn degenerate_uvs_fall_back_to_perpendicular() {
        let mut mesh = quad(false);
        for v in &mut mesh.vertices {
            v.texcoord = [0.5, 0.5, 0.0];
        }
        for t in compute_tangents(&mesh) {
            let t3 = Vec3::new(t[0], t[1], t[2]);
            assert!((t3.length() - 1.0).abs() < 1e-5);
            assert!(t3.dot(Vec3::Z).abs() < 1e-5);
            assert_eq!(t[3], 1.0);
        }
    }
}
