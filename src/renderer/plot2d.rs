//! 2D line plots (polar rose, dodecahedron projections) expressed as NDC
//! line lists with equal axis scaling.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::Vec2;

use crate::geometry::dodecahedron::{Pentagon, face_outline};
use crate::geometry::polar::{PolarCurve, grid_radii};
use crate::renderer::vertex::ColorVertex;

pub const CURVE_BLUE: [f32; 4] = [0.12, 0.47, 0.71, 1.0];
pub const GRID_GREY: [f32; 4] = [0.0, 0.0, 0.0, 0.35];
pub const INK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const FRAME_GREY: [f32; 4] = [0.6, 0.6, 0.6, 1.0];

const FILL: f32 = 0.85;
const CIRCLE_SEGMENTS: usize = 128;
const ARROW_LENGTH: f32 = 0.5;

/// Maps data coordinates into NDC so that `half_extent` around `center`
/// fills [`FILL`] of the shorter viewport side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotFrame {
    center: Vec2,
    scale: Vec2,
}

impl PlotFrame {
    pub fn new(center: Vec2, half_extent: f32, aspect: f32) -> Self {
        let s = FILL / half_extent.max(f32::EPSILON);
        let scale = if aspect >= 1.0 {
            Vec2::new(s / aspect, s)
        } else {
            Vec2::new(s, s * aspect)
        };
        Self { center, scale }
    }

    /// Frame around the bounding box of `points`, with a 10% margin.
    pub fn fit(points: &[Vec2], aspect: f32) -> Self {
        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        if points.is_empty() {
            return Self::new(Vec2::ZERO, 1.0, aspect);
        }
        let half = ((max - min).max_element() / 2.0 * 1.1).max(1e-3);
        Self::new((min + max) / 2.0, half, aspect)
    }

    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        (p - self.center) * self.scale
    }

    fn segment(&self, out: &mut Vec<ColorVertex>, a: Vec2, b: Vec2, color: [f32; 4]) {
        let a = self.to_ndc(a);
        let b = self.to_ndc(b);
        out.push(ColorVertex::ndc(a.x, a.y, color));
        out.push(ColorVertex::ndc(b.x, b.y, color));
    }

    fn polyline(&self, out: &mut Vec<ColorVertex>, points: &[Vec2], color: [f32; 4]) {
        for pair in points.windows(2) {
            self.segment(out, pair[0], pair[1], color);
        }
    }

    fn circle(&self, out: &mut Vec<ColorVertex>, radius: f32, color: [f32; 4]) {
        let points: Vec<Vec2> = (0..=CIRCLE_SEGMENTS)
            .map(|i| Vec2::from_angle(TAU * i as f32 / CIRCLE_SEGMENTS as f32) * radius)
            .collect();
        self.polyline(out, &points, color);
    }
}

/// Grid, outer boundary, axis arrows and the rose itself.
pub fn polar_plot_lines(curve: &PolarCurve, aspect: f32) -> Vec<ColorVertex> {
    let rmax = curve.radial_limit();
    let frame = PlotFrame::new(Vec2::ZERO, rmax, aspect);
    let mut out = Vec::new();

    for r in grid_radii(rmax) {
        frame.circle(&mut out, r, GRID_GREY);
    }
    for k in 0..8 {
        let dir = Vec2::from_angle(k as f32 * FRAC_PI_4);
        frame.segment(&mut out, Vec2::ZERO, dir * rmax, GRID_GREY);
    }

    // heavier boundary: three tightly spaced rings
    for f in [0.996, 1.0, 1.004] {
        frame.circle(&mut out, rmax * f, INK);
    }

    for angle in [0.0, FRAC_PI_2] {
        arrow(&frame, &mut out, angle, rmax);
    }

    frame.polyline(&mut out, &curve.cartesian(), CURVE_BLUE);
    out
}

/// Radial arrow ending on the boundary at `angle`.
fn arrow(frame: &PlotFrame, out: &mut Vec<ColorVertex>, angle: f32, rmax: f32) {
    let dir = Vec2::from_angle(angle);
    let tip = dir * rmax;
    let tail = dir * (rmax - ARROW_LENGTH).max(0.0);
    frame.segment(out, tail, tip, INK);

    let head = ARROW_LENGTH * 0.3;
    let back = -dir * head;
    let side = dir.perp() * head * 0.5;
    frame.segment(out, tip, tip + back + side, INK);
    frame.segment(out, tip, tip + back - side, INK);
}

/// Wireframe of projected pentagons plus a bounding frame.
pub fn projection_lines(points: &[Vec2], faces: &[Pentagon], aspect: f32) -> Vec<ColorVertex> {
    let frame = PlotFrame::fit(points, aspect);
    let mut out = Vec::new();

    let (min, max) = points.iter().fold(
        (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
        |(min, max), p| (min.min(*p), max.max(*p)),
    );
    if !points.is_empty() {
        let pad = (max - min) * 0.08;
        let (lo, hi) = (min - pad, max + pad);
        let corners = [lo, Vec2::new(hi.x, lo.y), hi, Vec2::new(lo.x, hi.y), lo];
        frame.polyline(&mut out, &corners, FRAME_GREY);
    }

    for face in faces {
        for (a, b) in face_outline(face) {
            frame.segment(&mut out, points[a as usize], points[b as usize], INK);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::dodecahedron::{FACES, isometric_projection, vertices};

    #[test]
    fn test_frame_keeps_equal_scaling() {
        let wide = PlotFrame::new(Vec2::ZERO, 1.0, 2.0);
        let p = wide.to_ndc(Vec2::new(1.0, 1.0));
        assert!((p.y - FILL).abs() < 1e-6);
        assert!((p.x - FILL / 2.0).abs() < 1e-6);

        let tall = PlotFrame::new(Vec2::ZERO, 1.0, 0.5);
        let p = tall.to_ndc(Vec2::new(1.0, 1.0));
        assert!((p.x - FILL).abs() < 1e-6);
        assert!((p.y - FILL / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_centers_points() {
        let points = [Vec2::new(2.0, 2.0), Vec2::new(4.0, 6.0)];
        let frame = PlotFrame::fit(&points, 1.0);
        assert!(frame.to_ndc(Vec2::new(3.0, 4.0)).length() < 1e-6);
    }

    #[test]
    fn test_polar_lines_stay_on_screen() {
        let lines = polar_plot_lines(&PolarCurve::rose(-4.0), 1.6);
        assert_eq!(lines.len() % 2, 0);
        for v in &lines {
            assert!(v.position[0].abs() <= 1.0 && v.position[1].abs() <= 1.0);
        }
        let curve_segments = lines.iter().filter(|v| v.color == CURVE_BLUE).count() / 2;
        assert_eq!(curve_segments, crate::geometry::polar::SAMPLES - 1);
    }

    #[test]
    fn test_projection_lines_cover_every_edge() {
        let projected = isometric_projection(&vertices());
        let lines = projection_lines(&projected, &FACES, 1.0);
        let edges = lines.iter().filter(|v| v.color == INK).count() / 2;
        assert_eq!(edges, FACES.len() * 5);
        for v in &lines {
            assert!(v.position[0].abs() <= 1.0 && v.position[1].abs() <= 1.0);
        }
    }
}
