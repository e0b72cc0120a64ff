use geomlab::geometry::dodecahedron::{self, FACES};
use geomlab::geometry::shading::shade_faces;
use geomlab::geometry::{CylinderParams, PolarCurve, build_cylinder, build_stacked_cylinder};
use geomlab::interaction::{BarrelController, BarrelState, REFLECTANCE_RANGE, SEGMENT_RANGE};
use proptest::prelude::*;
use winit::keyboard::KeyCode;

fn params() -> impl Strategy<Value = CylinderParams> {
    (0.1f32..50.0, 0.1f32..20.0, 3u32..64)
        .prop_map(|(height, radius, segments)| CylinderParams::new(height, radius, segments))
}

fn keys() -> impl Strategy<Value = Vec<(KeyCode, bool)>> {
    prop::collection::vec(
        (
            prop::sample::select(vec![
                KeyCode::ArrowUp,
                KeyCode::ArrowDown,
                KeyCode::ArrowLeft,
                KeyCode::ArrowRight,
                KeyCode::KeyW,
                KeyCode::KeyS,
                KeyCode::KeyQ,
            ]),
            any::<bool>(),
        ),
        0..200,
    )
}

proptest! {
    #[test]
    fn cylinder_counts_match_segments(p in params()) {
        let mesh = build_cylinder(p).unwrap();
        let n = p.segments as usize;
        prop_assert_eq!(mesh.vertex_count(), 2 * n);
        prop_assert_eq!(mesh.face_count(), 2 * n);
        prop_assert_eq!(mesh.normals.len(), mesh.face_count());
    }

    #[test]
    fn cylinder_indices_in_bounds(p in params()) {
        let mesh = build_cylinder(p).unwrap();
        prop_assert!(mesh.validate().is_ok());
        for face in &mesh.faces {
            for &i in face {
                prop_assert!((i as usize) < mesh.vertex_count());
            }
        }
    }

    #[test]
    fn cylinder_normals_are_unit_and_outward(p in params()) {
        let mesh = build_cylinder(p).unwrap();
        for (face, normal) in mesh.faces.iter().zip(&mesh.normals) {
            prop_assert!((normal.length() - 1.0).abs() < 1e-3);
            let centroid = face.iter().map(|&i| mesh.vertices[i as usize]).sum::<glam::Vec3>() / 3.0;
            let radial = glam::Vec3::new(centroid.x, centroid.y, 0.0);
            prop_assert!(normal.dot(radial) > 0.0);
        }
    }

    #[test]
    fn stacked_cylinder_counts(p in params()) {
        let mesh = build_stacked_cylinder(p).unwrap();
        let n = p.segments as usize;
        prop_assert_eq!(mesh.vertex_count(), (n + 1) * (n + 1));
        prop_assert_eq!(mesh.face_count(), 2 * n * n);
        prop_assert!(mesh.validate().is_ok());
    }

    #[test]
    fn hillshade_stays_in_unit_range(p in params(), azimuth in 0.0f32..=360.0) {
        let mesh = build_stacked_cylinder(p).unwrap();
        for shade in shade_faces(&mesh, azimuth) {
            prop_assert!((0.0..=1.0).contains(&shade));
        }
    }

    #[test]
    fn controller_stays_in_range(sequence in keys()) {
        let mut controller = BarrelController::new(BarrelState::default(), 800.0);
        for (key, pressed) in sequence {
            let change = controller.key(key, pressed);
            let state = &controller.state;
            prop_assert!((SEGMENT_RANGE.0..=SEGMENT_RANGE.1).contains(&state.segments));
            prop_assert!(state.reflectance >= REFLECTANCE_RANGE.0 - 1e-6);
            prop_assert!(state.reflectance <= REFLECTANCE_RANGE.1 + 1e-6);
            // reflectance never touches the mesh
            if matches!(key, KeyCode::ArrowLeft | KeyCode::ArrowRight) {
                prop_assert!(!change.regenerate);
            }
            if change.regenerate {
                let mesh = state.build_mesh().unwrap();
                prop_assert_eq!(mesh.face_count(), 2 * state.segments as usize);
            }
        }
    }

    #[test]
    fn drag_rotation_is_proportional(dx in -400.0f32..400.0) {
        let mut controller = BarrelController::new(BarrelState::default(), 800.0);
        controller.press(glam::Vec2::new(400.0, 300.0));
        controller.cursor_moved(glam::Vec2::new(400.0 + dx, 300.0));
        let expected = 360.0 * dx / 800.0;
        prop_assert!((controller.state.rotation - expected).abs() < 1e-3);
    }

    #[test]
    fn rose_stays_inside_radial_limit(a in -5.0f32..=5.0) {
        let curve = PolarCurve::rose(a);
        let limit = curve.radial_limit();
        prop_assert!((limit - (a.abs() + 0.5)).abs() < 2e-3);
        for p in curve.cartesian() {
            prop_assert!(p.length() < limit);
        }
    }

    #[test]
    fn rotation_keeps_depth_order_complete(alpha in -3.2f32..3.2, beta in -3.2f32..3.2, gamma in -3.2f32..3.2) {
        let rotated = dodecahedron::rotate_vertices(
            &dodecahedron::vertices(),
            dodecahedron::rotation_matrix(alpha, beta, gamma),
        );
        let mut order = dodecahedron::sort_faces_by_depth(&rotated, &FACES);
        let depths: Vec<f32> = order.iter().map(|&i| dodecahedron::face_depth(&rotated, &FACES[i])).collect();
        prop_assert!(depths.windows(2).all(|w| w[0] >= w[1]));
        order.sort_unstable();
        prop_assert_eq!(order, (0..FACES.len()).collect::<Vec<_>>());
    }
}

#[test]
fn segment_up_regenerates_scenario() {
    let mut controller = BarrelController::new(BarrelState::default(), 800.0);
    let mesh = controller.state.build_mesh().unwrap();
    assert_eq!(controller.state.segments, 10);
    assert_eq!(mesh.vertex_count(), 20);
    assert_eq!(mesh.face_count(), 20);
    assert_eq!(mesh.normals.len(), 20);

    let change = controller.key(KeyCode::ArrowUp, true);
    assert!(change.regenerate);
    let mesh = controller.state.build_mesh().unwrap();
    assert_eq!(controller.state.segments, 12);
    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.face_count(), 24);
    assert_eq!(mesh.normals.len(), 24);
}
