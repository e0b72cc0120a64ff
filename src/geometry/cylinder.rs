//! Tessellated barrel (open cylinder) meshes.
//!
//! Two layouts are provided:
//! - [`build_cylinder`]: two rings of `n` vertices joined by `2n`
//!   triangles, the seam closed with modular indexing.
//! - [`build_stacked_cylinder`]: `n + 1` rings of `n + 1` vertices each,
//!   the seam point duplicated, `2n²` triangles.

use std::f32::consts::TAU;

use glam::Vec3;

use super::mesh::{Face, Mesh};
use super::normals::calculate_normals;
use crate::error::GeometryError;

pub const MIN_SEGMENTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderParams {
    pub height: f32,
    pub radius: f32,
    pub segments: u32,
}

impl CylinderParams {
    pub fn new(height: f32, radius: f32, segments: u32) -> Self {
        Self {
            height,
            radius,
            segments,
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.segments < MIN_SEGMENTS {
            return Err(GeometryError::TooFewSegments(self.segments));
        }
        // NaN fails both comparisons, so test for "not positive"
        if !(self.height > 0.0) {
            return Err(GeometryError::NonPositiveDimension {
                name: "height",
                value: self.height,
            });
        }
        if !(self.radius > 0.0) {
            return Err(GeometryError::NonPositiveDimension {
                name: "radius",
                value: self.radius,
            });
        }
        Ok(())
    }
}

/// `count` points on a circle of radius `r` in the plane `z = height`,
/// starting on +X and advancing by `2π / segments`.
pub fn circle(r: f32, segments: u32, count: u32, height: f32) -> impl Iterator<Item = Vec3> {
    (0..count).map(move |i| {
        let theta = TAU * i as f32 / segments as f32;
        Vec3::new(r * theta.cos(), r * theta.sin(), height)
    })
}

/// Bottom ring (`0..n`) at z = 0 followed by top ring (`n..2n`) at z = h.
pub fn generate_cylinder_vertices(height: f32, radius: f32, segments: u32) -> Vec<Vec3> {
    let mut vertices = Vec::with_capacity(segments as usize * 2);
    vertices.extend(circle(radius, segments, segments, 0.0));
    vertices.extend(circle(radius, segments, segments, height));
    vertices
}

pub fn generate_cylinder_faces(segments: u32) -> Vec<Face> {
    let n = segments;
    let mut faces = Vec::with_capacity(n as usize * 2);
    for i in 0..n {
        let bottom = i;
        let top = i + n;
        let next_bottom = (i + 1) % n;
        let next_top = next_bottom + n;

        faces.push([bottom, next_bottom, next_top]);
        faces.push([bottom, next_top, top]);
    }
    faces
}

pub fn build_cylinder(params: CylinderParams) -> Result<Mesh, GeometryError> {
    params.validate()?;

    let vertices = generate_cylinder_vertices(params.height, params.radius, params.segments);
    let faces = generate_cylinder_faces(params.segments);
    let normals = calculate_normals(&vertices, &faces);

    tracing::debug!(
        segments = params.segments,
        vertices = vertices.len(),
        faces = faces.len(),
        "built cylinder"
    );

    Ok(Mesh {
        vertices,
        faces,
        normals,
    })
}

/// `n + 1` rings from z = 0 to z = h, each holding `n + 1` points so the
/// seam vertex appears twice.
pub fn generate_stacked_vertices(height: f32, radius: f32, segments: u32) -> Vec<Vec3> {
    let ring = segments as usize + 1;
    let mut vertices = Vec::with_capacity(ring * ring);
    for i in 0..=segments {
        let z = height * i as f32 / segments as f32;
        vertices.extend(circle(radius, segments, segments + 1, z));
    }
    vertices
}

pub fn generate_stacked_faces(segments: u32) -> Vec<Face> {
    let stride = segments + 1;
    let mut faces = Vec::with_capacity((segments * segments) as usize * 2);
    for i in 0..segments {
        for j in 0..segments {
            let current = i * stride + j;
            let next = current + stride;
            faces.push([current, current + 1, next]);
            faces.push([current + 1, next + 1, next]);
        }
    }
    faces
}

pub fn build_stacked_cylinder(params: CylinderParams) -> Result<Mesh, GeometryError> {
    params.validate()?;

    let vertices = generate_stacked_vertices(params.height, params.radius, params.segments);
    let faces = generate_stacked_faces(params.segments);
    let normals = calculate_normals(&vertices, &faces);

    tracing::debug!(
        segments = params.segments,
        vertices = vertices.len(),
        faces = faces.len(),
        "built stacked cylinder"
    );

    Ok(Mesh {
        vertices,
        faces,
        normals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_h2_r1_n10() {
        let mesh = build_cylinder(CylinderParams::new(2.0, 1.0, 10)).unwrap();
        assert_eq!(mesh.vertex_count(), 20);
        assert_eq!(mesh.face_count(), 20);
        assert_eq!(mesh.normals.len(), 20);
        mesh.validate().unwrap();

        let mesh = build_cylinder(CylinderParams::new(2.0, 1.0, 12)).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.face_count(), 24);
        assert_eq!(mesh.normals.len(), 24);
    }

    #[test]
    fn test_rings_sit_at_zero_and_height() {
        let vertices = generate_cylinder_vertices(2.0, 1.0, 6);
        assert!(vertices[..6].iter().all(|v| v.z == 0.0));
        assert!(vertices[6..].iter().all(|v| v.z == 2.0));
        assert!((vertices[0] - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        for v in &vertices {
            assert!((v.truncate().length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_last_segment_wraps_to_first() {
        let faces = generate_cylinder_faces(4);
        assert_eq!(faces[6], [3, 0, 4]);
        assert_eq!(faces[7], [3, 4, 7]);
    }

    #[test]
    fn test_normals_point_outward() {
        let mesh = build_cylinder(CylinderParams::new(2.0, 1.0, 8)).unwrap();
        for (face, normal) in mesh.normals.iter().enumerate() {
            let [a, b, c] = mesh.triangle(face);
            let centroid = (a + b + c) / 3.0;
            let radial = Vec3::new(centroid.x, centroid.y, 0.0);
            assert!(normal.dot(radial) > 0.0, "face {face} faces inward");
            assert!(normal.z.abs() < 1e-5);
            assert!((normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_rejects_degenerate_params() {
        assert_eq!(
            build_cylinder(CylinderParams::new(2.0, 1.0, 2)),
            Err(GeometryError::TooFewSegments(2))
        );
        assert!(matches!(
            build_cylinder(CylinderParams::new(0.0, 1.0, 8)),
            Err(GeometryError::NonPositiveDimension { name: "height", .. })
        ));
        assert!(matches!(
            build_cylinder(CylinderParams::new(1.0, -1.0, 8)),
            Err(GeometryError::NonPositiveDimension { name: "radius", .. })
        ));
        assert!(build_cylinder(CylinderParams::new(f32::NAN, 1.0, 8)).is_err());
    }

    #[test]
    fn test_stacked_counts() {
        let mesh = build_stacked_cylinder(CylinderParams::new(15.0, 3.0, 20)).unwrap();
        assert_eq!(mesh.vertex_count(), 21 * 21);
        assert_eq!(mesh.face_count(), 2 * 20 * 20);
        mesh.validate().unwrap();
    }

    #[test]
    fn test_stacked_seam_is_duplicated() {
        let vertices = generate_stacked_vertices(1.0, 1.0, 8);
        assert!((vertices[0] - vertices[8]).length() < 1e-5);
        assert_eq!(vertices[9].z, 1.0 / 8.0);
    }

    #[test]
    fn test_stacked_normals_are_unit() {
        let mesh = build_stacked_cylinder(CylinderParams::new(15.0, 3.0, 4)).unwrap();
        for n in &mesh.normals {
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }
}
