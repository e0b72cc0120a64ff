//! Regular dodecahedron with Euler rotation, painter's-order face sorting
//! and orthographic / isometric projection.
//!
//! Vertices are treated as row vectors: rotating applies `v' = v · R`.

use glam::{Mat3, Vec2, Vec3};

pub type Pentagon = [u32; 5];

/// Golden ratio.
pub const PHI: f32 = 1.618_034;

pub const FACES: [Pentagon; 12] = [
    [0, 1, 2, 3, 4],
    [3, 4, 9, 19, 7],
    [3, 2, 14, 16, 7],
    [0, 4, 9, 15, 13],
    [15, 13, 5, 11, 10],
    [11, 10, 18, 8, 12],
    [18, 8, 16, 7, 19],
    [18, 19, 9, 15, 10],
    [14, 16, 8, 12, 6],
    [12, 6, 17, 5, 11],
    [6, 17, 1, 2, 14],
    [17, 1, 0, 13, 5],
];

pub fn vertices() -> Vec<Vec3> {
    let p = PHI;
    let q = 1.0 / PHI;
    vec![
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(p, 0.0, -q),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(0.0, -q, -p),
        Vec3::new(0.0, q, -p),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(0.0, q, p),
        Vec3::new(0.0, -q, p),
        Vec3::new(q, p, 0.0),
        Vec3::new(q, -p, 0.0),
        Vec3::new(-q, p, 0.0),
        Vec3::new(-q, -p, 0.0),
        Vec3::new(p, 0.0, q),
        Vec3::new(-p, 0.0, q),
        Vec3::new(-p, 0.0, -q),
    ]
}

/// `Rz(gamma) · Ry(beta) · Rx(alpha)`, angles in radians.
pub fn rotation_matrix(alpha: f32, beta: f32, gamma: f32) -> Mat3 {
    Mat3::from_rotation_z(gamma) * Mat3::from_rotation_y(beta) * Mat3::from_rotation_x(alpha)
}

/// Row-vector product `v · R` for every vertex.
pub fn rotate_vertices(vertices: &[Vec3], rotation: Mat3) -> Vec<Vec3> {
    let rt = rotation.transpose();
    vertices.iter().map(|v| rt * *v).collect()
}

pub fn scale_vertices(vertices: &[Vec3], scale: f32) -> Vec<Vec3> {
    vertices.iter().map(|v| *v * scale).collect()
}

/// Mean z of the face's vertices.
pub fn face_depth(vertices: &[Vec3], face: &Pentagon) -> f32 {
    face.iter().map(|&i| vertices[i as usize].z).sum::<f32>() / face.len() as f32
}

/// Face indices ordered by [`face_depth`], deepest first.
pub fn sort_faces_by_depth(vertices: &[Vec3], faces: &[Pentagon]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..faces.len()).collect();
    order.sort_by(|&a, &b| {
        face_depth(vertices, &faces[b]).total_cmp(&face_depth(vertices, &faces[a]))
    });
    order
}

pub fn orthographic_projection(vertices: &[Vec3]) -> Vec<Vec2> {
    vertices.iter().map(|v| v.truncate()).collect()
}

pub fn isometric_projection(vertices: &[Vec3]) -> Vec<Vec2> {
    let alpha = (1.0 / 2.0_f32.sqrt()).atan();
    let gamma = 45.0_f32.to_radians();
    orthographic_projection(&rotate_vertices(vertices, rotation_matrix(alpha, 0.0, gamma)))
}

/// Closed outline of a face as `(start, end)` index pairs.
pub fn face_outline(face: &Pentagon) -> impl Iterator<Item = (u32, u32)> + '_ {
    (0..face.len()).map(move |k| (face[k], face[(k + 1) % face.len()]))
}

/// Triangle fan over a convex pentagon.
pub fn fan_triangles(face: &Pentagon) -> [[u32; 3]; 3] {
    [
        [face[0], face[1], face[2]],
        [face[0], face[2], face[3]],
        [face[0], face[3], face[4]],
    ]
}
