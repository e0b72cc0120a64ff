use glam::Vec3;

use super::mesh::Face;

/// Normal of the triangle `(a, b, c)`: `(b - a) x (c - a)`, normalized.
///
/// A collinear or repeated-vertex triangle yields a zero cross product,
/// which is returned as is.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let n = (b - a).cross(c - a);
    let len = n.length();
    if len != 0.0 { n / len } else { n }
}

/// One normal per face, in face order.
pub fn calculate_normals(vertices: &[Vec3], faces: &[Face]) -> Vec<Vec3> {
    let normals: Vec<Vec3> = faces
        .iter()
        .map(|&[a, b, c]| {
            face_normal(
                vertices[a as usize],
                vertices[b as usize],
                vertices[c as usize],
            )
        })
        .collect();

    let degenerate = normals.iter().filter(|n| **n == Vec3::ZERO).count();
    if degenerate > 0 {
        tracing::debug!(degenerate, faces = faces.len(), "zero-length face normals");
    }

    normals
}
