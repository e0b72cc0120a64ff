//! CPU-side vertex streams for the 3D labs.

use glam::{Mat4, Vec3};

use crate::geometry::Mesh;
use crate::geometry::dodecahedron::{Pentagon, face_outline, fan_triangles, sort_faces_by_depth};
use crate::interaction::BarrelState;
use crate::renderer::camera::Camera;
use crate::renderer::vertex::ColorVertex;

pub const WIRE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const FACE_CYAN: [f32; 4] = [0.0, 1.0, 1.0, 0.25];
pub const EDGE_RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
pub const FAINT_EDGE: [f32; 4] = [0.0, 0.0, 0.0, 0.3];
pub const BOX_GREY: [f32; 4] = [0.75, 0.75, 0.75, 1.0];

/// Turns the cylinder's z axis into the view's y-up axis.
pub fn barrel_base() -> Mat4 {
    Mat4::from_rotation_x(-90.0_f32.to_radians())
}

/// Model matrix for the interactive barrels: base orientation, then spin
/// about the vertical axis, then lift.
pub fn barrel_model(state: &BarrelState) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, state.lift, 0.0))
        * Mat4::from_rotation_y(state.rotation.to_radians())
        * barrel_base()
}

/// Orbit target and distance that frame `mesh`: the box centre, seen from
/// 2.2 times its largest extent. `None` for an empty mesh.
pub fn orbit_framing(mesh: &Mesh) -> Option<(Vec3, f32)> {
    if mesh.is_empty() {
        return None;
    }
    let (min, max) = mesh.bounding_box();
    Some(((min + max) / 2.0, (max - min).max_element() * 2.2))
}

/// Pentagon outlines as a line list.
pub fn wireframe_lines(vertices: &[Vec3], faces: &[Pentagon], color: [f32; 4]) -> Vec<ColorVertex> {
    let mut out = Vec::with_capacity(faces.len() * 10);
    for face in faces {
        for (a, b) in face_outline(face) {
            out.push(ColorVertex::new(vertices[a as usize].to_array(), color));
            out.push(ColorVertex::new(vertices[b as usize].to_array(), color));
        }
    }
    out
}

/// Face order for drawing translucent pentagons back to front as seen by
/// `camera`.
pub fn painter_order(vertices: &[Vec3], faces: &[Pentagon], camera: &Camera) -> Vec<usize> {
    let depth_space: Vec<Vec3> = vertices
        .iter()
        .map(|v| Vec3::new(v.x, v.y, camera.view_depth(*v)))
        .collect();
    sort_faces_by_depth(&depth_space, faces)
}

/// Translucent fill triangles in `order`. Edges come from [`ordered_edges`].
pub fn translucent_faces(vertices: &[Vec3], faces: &[Pentagon], order: &[usize]) -> Vec<ColorVertex> {
    let mut out = Vec::with_capacity(order.len() * 9);
    for &index in order {
        for tri in fan_triangles(&faces[index]) {
            for i in tri {
                out.push(ColorVertex::new(vertices[i as usize].to_array(), FACE_CYAN));
            }
        }
    }
    out
}

pub fn ordered_edges(vertices: &[Vec3], faces: &[Pentagon], order: &[usize]) -> Vec<ColorVertex> {
    let ordered: Vec<Pentagon> = order.iter().map(|&i| faces[i]).collect();
    wireframe_lines(vertices, &ordered, EDGE_RED)
}

/// One grey triangle per face, shade taken from `shades`.
pub fn shaded_triangles(mesh: &Mesh, shades: &[f32]) -> Vec<ColorVertex> {
    let mut out = Vec::with_capacity(mesh.face_count() * 3);
    for (face, &shade) in mesh.faces.iter().zip(shades) {
        let color = [shade, shade, shade, 1.0];
        for &i in face {
            out.push(ColorVertex::new(mesh.vertices[i as usize].to_array(), color));
        }
    }
    out
}

pub fn mesh_edges(mesh: &Mesh, color: [f32; 4]) -> Vec<ColorVertex> {
    let mut out = Vec::with_capacity(mesh.face_count() * 6);
    for face in &mesh.faces {
        for k in 0..3 {
            let a = mesh.vertices[face[k] as usize];
            let b = mesh.vertices[face[(k + 1) % 3] as usize];
            out.push(ColorVertex::new(a.to_array(), color));
            out.push(ColorVertex::new(b.to_array(), color));
        }
    }
    out
}

/// Twelve edges of the axis-aligned box `min..max`.
pub fn box_lines(min: Vec3, max: Vec3, color: [f32; 4]) -> Vec<ColorVertex> {
    let corner = |i: usize| {
        Vec3::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        )
    };
    let mut out = Vec::with_capacity(24);
    for i in 0..8 {
        for bit in [1, 2, 4] {
            if i & bit == 0 {
                out.push(ColorVertex::new(corner(i).to_array(), color));
                out.push(ColorVertex::new(corner(i | bit).to_array(), color));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::dodecahedron::{FACES, vertices};
    use crate::geometry::{CylinderParams, build_cylinder, build_stacked_cylinder};
    use crate::renderer::camera::CameraMode;

    #[test]
    fn test_barrel_base_turns_z_up() {
        let up = barrel_base().transform_vector3(Vec3::Z);
        assert!((up - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_barrel_model_lifts() {
        let state = BarrelState {
            lift: 0.5,
            ..Default::default()
        };
        let p = barrel_model(&state).transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_painter_order_draws_far_faces_first() {
        let mut camera = Camera::default();
        camera.set_mode(CameraMode::Orbital);
        let verts = vertices();
        let order = painter_order(&verts, &FACES, &camera);
        assert_eq!(order.len(), FACES.len());

        let centroid_depth = |i: usize| {
            let c = FACES[i].iter().map(|&v| verts[v as usize]).sum::<Vec3>() / 5.0;
            camera.view_depth(c)
        };
        assert!(centroid_depth(order[0]) >= centroid_depth(order[11]));
    }

    #[test]
    fn test_translucent_faces_follow_order() {
        let verts = vertices();
        let order: Vec<usize> = (0..FACES.len()).rev().collect();
        let tris = translucent_faces(&verts, &FACES, &order);
        assert_eq!(tris.len(), FACES.len() * 9);
        assert_eq!(tris[0].position, verts[FACES[11][0] as usize].to_array());
        assert!(tris.iter().all(|v| v.color == FACE_CYAN));
    }

    #[test]
    fn test_shaded_triangles_and_edges() {
        let mesh = build_cylinder(CylinderParams::new(2.0, 1.0, 6)).unwrap();
        let shades = vec![0.5; mesh.face_count()];
        let tris = shaded_triangles(&mesh, &shades);
        assert_eq!(tris.len(), mesh.face_count() * 3);
        assert_eq!(tris[0].color, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(mesh_edges(&mesh, FAINT_EDGE).len(), mesh.face_count() * 6);
    }

    #[test]
    fn test_box_lines() {
        let lines = box_lines(Vec3::splat(-1.0), Vec3::splat(1.0), BOX_GREY);
        assert_eq!(lines.len(), 24);
    }

    #[test]
    fn test_orbit_framing_centres_barrel() {
        let mesh = build_stacked_cylinder(CylinderParams::new(15.0, 3.0, 8)).unwrap();
        let (target, distance) = orbit_framing(&mesh).unwrap();
        assert!(target.distance(Vec3::new(0.0, 0.0, 7.5)) < 1e-4);
        assert!((distance - 33.0).abs() < 1e-3);
        assert_eq!(orbit_framing(&Mesh::default()), None);
    }
}
