use glam::Vec3;

use crate::error::GeometryError;

pub type Face = [u32; 3];

/// Triangle mesh with one normal per face.
///
/// Always rebuilt as a whole; nothing patches a mesh in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub normals: Vec<Vec3>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Checks that every face index is in range and that there is exactly
    /// one normal per face.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.normals.len() != self.faces.len() {
            return Err(GeometryError::NormalCountMismatch {
                faces: self.faces.len(),
                normals: self.normals.len(),
            });
        }

        let vertex_count = self.vertices.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(GeometryError::FaceIndexOutOfBounds {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(())
    }

    pub fn triangle(&self, face: usize) -> [Vec3; 3] {
        let [a, b, c] = self.faces[face];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| (min.min(*v), max.max(*v)),
        )
    }
}

/// Position and normal of one emitted triangle corner.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LitVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Expands a mesh into a flat-shaded triangle list: for each face the face
/// normal is emitted once and attached to each of its three corners.
pub fn flat_shaded_vertices(mesh: &Mesh) -> Vec<LitVertex> {
    let mut out = Vec::with_capacity(mesh.faces.len() * 3);
    for (face, normal) in mesh.faces.iter().zip(&mesh.normals) {
        let normal = normal.to_array();
        for &index in face {
            out.push(LitVertex {
                position: mesh.vertices[index as usize].to_array(),
                normal,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> Mesh {
        Mesh {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            faces: vec![[0, 1, 2]],
            normals: vec![Vec3::Z],
        }
    }

    #[test]
    fn test_validate_ok() {
        assert_eq!(single_triangle().validate(), Ok(()));
    }

    #[test]
    fn test_validate_out_of_bounds() {
        let mut mesh = single_triangle();
        mesh.faces.push([0, 2, 3]);
        mesh.normals.push(Vec3::Z);
        assert_eq!(
            mesh.validate(),
            Err(GeometryError::FaceIndexOutOfBounds {
                face: 1,
                index: 3,
                vertex_count: 3,
            })
        );
    }

    #[test]
    fn test_validate_normal_mismatch() {
        let mut mesh = single_triangle();
        mesh.normals.clear();
        assert_eq!(
            mesh.validate(),
            Err(GeometryError::NormalCountMismatch {
                faces: 1,
                normals: 0,
            })
        );
    }

    #[test]
    fn test_flat_shaded_vertices() {
        let verts = flat_shaded_vertices(&single_triangle());
        assert_eq!(verts.len(), 3);
        assert!(verts.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        assert_eq!(verts[1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_bounding_box() {
        let (min, max) = single_triangle().bounding_box();
        assert_eq!(min, Vec3::ZERO);
        assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));
    }
}
