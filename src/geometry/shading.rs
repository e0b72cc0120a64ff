//! Directional hill-shading for the shaded-barrel lab.

use glam::Vec3;

use super::mesh::Mesh;

/// Unit vector towards a light at compass `azimuth` (degrees clockwise from
/// north) and `altitude` (degrees above the horizon).
pub fn light_direction(azimuth_deg: f32, altitude_deg: f32) -> Vec3 {
    let az = (90.0 - azimuth_deg).to_radians();
    let alt = altitude_deg.to_radians();
    Vec3::new(az.cos() * alt.cos(), az.sin() * alt.cos(), alt.sin())
}

/// Altitude tied to the azimuth slider: overhead at 180°, on the horizon at
/// 0° and 360°.
pub fn altitude_for_azimuth(azimuth_deg: f32) -> f32 {
    90.0 - (azimuth_deg - 180.0).abs()
}

/// Grey level in `[0, 1]` for a unit face normal.
pub fn hillshade(normal: Vec3, light: Vec3) -> f32 {
    normal.dot(light).clamp(0.0, 1.0)
}

/// One grey level per face of `mesh`.
pub fn shade_faces(mesh: &Mesh, azimuth_deg: f32) -> Vec<f32> {
    let light = light_direction(azimuth_deg, altitude_for_azimuth(azimuth_deg));
    mesh.normals.iter().map(|n| hillshade(*n, light)).collect()
}
