use std::f32::consts::TAU;

use glam::Vec2;

pub const SAMPLES: usize = 1000;
pub const PETAL_FACTOR: f32 = 6.0;
pub const A_RANGE: (f32, f32) = (-5.0, 5.0);
pub const RADIAL_MARGIN: f32 = 0.5;

/// Sampled rose `rho = a * sin(6 * phi)` over `[0, 2π]`.
#[derive(Debug, Clone)]
pub struct PolarCurve {
    pub a: f32,
    pub phi: Vec<f32>,
    pub rho: Vec<f32>,
}

impl PolarCurve {
    pub fn rose(a: f32) -> Self {
        let a = a.clamp(A_RANGE.0, A_RANGE.1);
        let phi = linspace(0.0, TAU, SAMPLES);
        let rho = phi.iter().map(|p| a * (PETAL_FACTOR * p).sin()).collect();
        Self { a, phi, rho }
    }

    /// Outer radial limit: `max|rho| + 0.5`.
    pub fn radial_limit(&self) -> f32 {
        self.rho.iter().fold(0.0_f32, |m, r| m.max(r.abs())) + RADIAL_MARGIN
    }

    /// Curve points in Cartesian coordinates. Negative radii land on the
    /// opposite side of the origin.
    pub fn cartesian(&self) -> Vec<Vec2> {
        self.phi
            .iter()
            .zip(&self.rho)
            .map(|(p, r)| Vec2::new(r * p.cos(), r * p.sin()))
            .collect()
    }
}

pub fn linspace(start: f32, end: f32, count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f32;
            (0..count).map(|i| start + step * i as f32).collect()
        }
    }
}

/// Radii for concentric grid circles: evenly spaced "nice" steps up to `rmax`.
pub fn grid_radii(rmax: f32) -> Vec<f32> {
    if !(rmax > 0.0) {
        return Vec::new();
    }
    let raw = rmax / 4.0;
    let magnitude = 10.0_f32.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(raw);

    let mut radii = Vec::new();
    let mut r = step;
    while r < rmax - 1e-4 {
        radii.push(r);
        r += step;
    }
    radii
}
