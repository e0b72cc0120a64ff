//! Input handling for the barrel viewers.
//!
//! All interactive parameters live in [`BarrelState`]; the controller mutates
//! it in place and reports through [`Change`] whether the mesh has to be
//! rebuilt or only the lighting uniforms refreshed.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};
use winit::keyboard::KeyCode;

use crate::config::BarrelConfig;
use crate::error::GeometryError;
use crate::geometry::{CylinderParams, Mesh, build_cylinder};

pub const SEGMENT_RANGE: (u32, u32) = (4, 35);
pub const SEGMENT_STEP: u32 = 2;
pub const REFLECTANCE_RANGE: (f32, f32) = (0.1, 0.5);
pub const REFLECTANCE_STEP: f32 = 0.1;
pub const LIFT_STEP: f32 = 0.1;
pub const COLOR_PHASE_STEP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Change {
    pub regenerate: bool,
    pub material: bool,
}

impl Change {
    pub const NONE: Self = Self {
        regenerate: false,
        material: false,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarrelState {
    pub height: f32,
    pub radius: f32,
    pub segments: u32,
    /// Degrees about the barrel axis.
    pub rotation: f32,
    pub reflectance: f32,
    pub lift: f32,
    pub color_phase: f32,
    pub dragging: bool,
    pub last_cursor: Vec2,
}

impl BarrelState {
    pub fn from_config(config: &BarrelConfig) -> Self {
        Self {
            height: config.height,
            radius: config.radius,
            segments: config.initial_segments.clamp(SEGMENT_RANGE.0, SEGMENT_RANGE.1),
            rotation: 0.0,
            reflectance: config
                .initial_reflectance
                .clamp(REFLECTANCE_RANGE.0, REFLECTANCE_RANGE.1),
            lift: 0.0,
            color_phase: 0.0,
            dragging: false,
            last_cursor: Vec2::ZERO,
        }
    }

    pub fn params(&self) -> CylinderParams {
        CylinderParams::new(self.height, self.radius, self.segments)
    }

    pub fn build_mesh(&self) -> Result<Mesh, GeometryError> {
        build_cylinder(self.params())
    }
}

impl Default for BarrelState {
    fn default() -> Self {
        Self::from_config(&BarrelConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarrelController {
    pub state: BarrelState,
    pub viewport_width: f32,
    lift_up: bool,
    lift_down: bool,
}

impl BarrelController {
    pub fn new(state: BarrelState, viewport_width: f32) -> Self {
        Self {
            state,
            viewport_width: viewport_width.max(1.0),
            lift_up: false,
            lift_down: false,
        }
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width.max(1.0);
    }

    pub fn press(&mut self, cursor: Vec2) {
        self.state.dragging = true;
        self.state.last_cursor = cursor;
    }

    pub fn release(&mut self) {
        self.state.dragging = false;
    }

    /// Rotates by `-360°` per viewport width of horizontal travel, measured
    /// as `last_x - x`.
    pub fn cursor_moved(&mut self, cursor: Vec2) {
        if !self.state.dragging {
            return;
        }
        let dx = self.state.last_cursor.x - cursor.x;
        self.state.last_cursor = cursor;
        self.state.rotation = (self.state.rotation - 360.0 * dx / self.viewport_width) % 360.0;
    }

    pub fn key(&mut self, key: KeyCode, pressed: bool) -> Change {
        match key {
            KeyCode::KeyW => {
                self.lift_up = pressed;
                Change::NONE
            }
            KeyCode::KeyS => {
                self.lift_down = pressed;
                Change::NONE
            }
            _ if !pressed => Change::NONE,
            KeyCode::ArrowUp => self.step_segments(true),
            KeyCode::ArrowDown => self.step_segments(false),
            KeyCode::ArrowRight => self.step_reflectance(true),
            KeyCode::ArrowLeft => self.step_reflectance(false),
            _ => Change::NONE,
        }
    }

    /// Like [`key`](Self::key), but auto-repeated presses are dropped so a
    /// held arrow steps once.
    pub fn key_event(&mut self, key: KeyCode, pressed: bool, repeat: bool) -> Change {
        if pressed && repeat {
            return Change::NONE;
        }
        self.key(key, pressed)
    }

    pub fn step_segments(&mut self, up: bool) -> Change {
        let current = self.state.segments;
        let next = if up {
            current.saturating_add(SEGMENT_STEP)
        } else {
            current.saturating_sub(SEGMENT_STEP)
        }
        .clamp(SEGMENT_RANGE.0, SEGMENT_RANGE.1);

        if next == current {
            return Change::NONE;
        }
        self.state.segments = next;
        tracing::debug!(segments = next, "tessellation changed");
        Change {
            regenerate: true,
            material: false,
        }
    }

    pub fn step_reflectance(&mut self, up: bool) -> Change {
        let current = self.state.reflectance;
        let delta = if up { REFLECTANCE_STEP } else { -REFLECTANCE_STEP };
        // snap to tenths so repeated steps do not drift
        let next = ((current + delta) * 10.0).round() / 10.0;
        let next = next.clamp(REFLECTANCE_RANGE.0, REFLECTANCE_RANGE.1);

        if (next - current).abs() < f32::EPSILON {
            return Change::NONE;
        }
        self.state.reflectance = next;
        tracing::debug!(reflectance = next, "reflectance changed");
        Change {
            regenerate: false,
            material: true,
        }
    }

    /// Per-frame update: applies held lift keys and advances the colour
    /// phase when colour cycling is on.
    pub fn tick(&mut self, color_cycle: bool) {
        let direction = self.lift_up as i8 - self.lift_down as i8;
        self.state.lift += f32::from(direction) * LIFT_STEP;
        if color_cycle {
            self.state.color_phase += COLOR_PHASE_STEP;
        }
    }
}

/// Light and material parameters derived from the reflectance level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub light_position: Vec3,
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub material_diffuse: [f32; 4],
    pub material_specular: [f32; 4],
    pub shininess: f32,
}

pub const LIGHT_POSITION: Vec3 = Vec3::new(0.5, 5.0, -10.0);
pub const SHININESS: f32 = 50.0;

impl Lighting {
    pub fn from_reflectance(level: f32) -> Self {
        let l = level;
        Self {
            light_position: LIGHT_POSITION,
            ambient: [l, l, l, 1.0],
            diffuse: [1.0, 0.3, 0.6, l],
            specular: [l, l, l, l],
            material_diffuse: [1.0, 1.0, 1.0, l],
            material_specular: [1.0, 1.0, 1.0, l],
            shininess: SHININESS,
        }
    }

    /// Same light, with the material tinted by [`cycle_color`].
    pub fn with_color_phase(mut self, t: f32) -> Self {
        let [r, g, b] = cycle_color(t);
        let a = self.material_diffuse[3];
        self.material_diffuse = [r, g, b, a];
        self.material_specular = [r, g, b, a];
        self
    }

    pub fn for_state(state: &BarrelState, color_cycle: bool) -> Self {
        let lighting = Self::from_reflectance(state.reflectance);
        if color_cycle {
            lighting.with_color_phase(state.color_phase)
        } else {
            lighting
        }
    }
}

/// RGB channels following phase-shifted sine waves in `[0, 1]`.
pub fn cycle_color(t: f32) -> [f32; 3] {
    [
        (t.sin() + 1.0) / 2.0,
        ((t + FRAC_PI_2).sin() + 1.0) / 2.0,
        ((t + PI).sin() + 1.0) / 2.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> BarrelController {
        BarrelController::new(BarrelState::default(), 1280.0)
    }

    #[test]
    fn test_initial_state() {
        let c = controller();
        assert_eq!(c.state.segments, 10);
        assert!((c.state.reflectance - 0.1).abs() < 1e-6);
        assert_eq!(c.state.rotation, 0.0);
        assert!(!c.state.dragging);
    }

    #[test]
    fn test_up_regenerates_with_two_more_segments() {
        let mut c = controller();
        let change = c.key(KeyCode::ArrowUp, true);
        assert!(change.regenerate);
        assert!(!change.material);
        assert_eq!(c.state.segments, 12);

        let mesh = c.state.build_mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.face_count(), 24);
        assert_eq!(mesh.normals.len(), 24);
    }

    #[test]
    fn test_segments_clamp_at_bounds() {
        let mut c = controller();
        for _ in 0..20 {
            c.key(KeyCode::ArrowUp, true);
        }
        assert_eq!(c.state.segments, 35);
        assert_eq!(c.key(KeyCode::ArrowUp, true), Change::NONE);

        for _ in 0..20 {
            c.key(KeyCode::ArrowDown, true);
        }
        assert_eq!(c.state.segments, 4);
        assert_eq!(c.key(KeyCode::ArrowDown, true), Change::NONE);
    }

    #[test]
    fn test_key_release_does_nothing() {
        let mut c = controller();
        assert_eq!(c.key(KeyCode::ArrowUp, false), Change::NONE);
        assert_eq!(c.state.segments, 10);
    }

    #[test]
    fn test_reflectance_steps_and_clamps() {
        let mut c = controller();
        assert_eq!(c.key(KeyCode::ArrowLeft, true), Change::NONE);

        let change = c.key(KeyCode::ArrowRight, true);
        assert!(change.material);
        assert!(!change.regenerate);
        assert!((c.state.reflectance - 0.2).abs() < 1e-6);

        for _ in 0..10 {
            c.key(KeyCode::ArrowRight, true);
        }
        assert!((c.state.reflectance - 0.5).abs() < 1e-6);
        assert_eq!(c.state.segments, 10);
    }

    #[test]
    fn test_drag_rotates_only_while_pressed() {
        let mut c = controller();
        c.cursor_moved(Vec2::new(100.0, 0.0));
        assert_eq!(c.state.rotation, 0.0);

        c.press(Vec2::new(640.0, 300.0));
        c.cursor_moved(Vec2::new(960.0, 310.0));
        // dragged a quarter of the width to the right
        assert!((c.state.rotation - 90.0).abs() < 1e-4);
        assert_eq!(c.state.last_cursor, Vec2::new(960.0, 310.0));

        c.release();
        c.cursor_moved(Vec2::new(0.0, 0.0));
        assert!((c.state.rotation - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_lift_follows_held_keys() {
        let mut c = controller();
        c.key(KeyCode::KeyW, true);
        c.tick(false);
        c.tick(false);
        assert!((c.state.lift - 0.2).abs() < 1e-6);
        c.key(KeyCode::KeyW, false);
        c.tick(false);
        assert!((c.state.lift - 0.2).abs() < 1e-6);
        c.key(KeyCode::KeyS, true);
        c.tick(false);
        assert!((c.state.lift - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_lift_keys_are_tracked_separately() {
        let mut c = controller();
        c.key(KeyCode::KeyW, true);
        c.key(KeyCode::KeyS, true);
        c.tick(false);
        assert_eq!(c.state.lift, 0.0);

        c.key(KeyCode::KeyW, false);
        c.tick(false);
        assert!((c.state.lift + 0.1).abs() < 1e-6);

        c.key(KeyCode::KeyS, false);
        c.tick(false);
        assert!((c.state.lift + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_repeated_presses_step_once() {
        let mut c = controller();
        let segments = c.state.segments;
        assert!(c.key_event(KeyCode::ArrowUp, true, false).regenerate);
        assert_eq!(c.key_event(KeyCode::ArrowUp, true, true), Change::NONE);
        assert_eq!(c.key_event(KeyCode::ArrowRight, true, true), Change::NONE);
        assert_eq!(c.state.segments, segments + SEGMENT_STEP);

        // a repeat never cancels a held lift key
        c.key_event(KeyCode::KeyW, true, false);
        c.key_event(KeyCode::KeyW, true, true);
        c.tick(false);
        assert!((c.state.lift - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_color_phase_advances_only_when_cycling() {
        let mut c = controller();
        c.tick(false);
        assert_eq!(c.state.color_phase, 0.0);
        c.tick(true);
        assert!((c.state.color_phase - 0.01).abs() < 1e-7);
    }

    #[test]
    fn test_lighting_from_reflectance() {
        let l = Lighting::from_reflectance(0.3);
        assert_eq!(l.ambient, [0.3, 0.3, 0.3, 1.0]);
        assert_eq!(l.diffuse, [1.0, 0.3, 0.6, 0.3]);
        assert_eq!(l.specular, [0.3; 4]);
        assert_eq!(l.material_diffuse, [1.0, 1.0, 1.0, 0.3]);
        assert_eq!(l.shininess, 50.0);
    }

    #[test]
    fn test_cycle_color() {
        let [r, g, b] = cycle_color(0.0);
        assert!((r - 0.5).abs() < 1e-6);
        assert!((g - 1.0).abs() < 1e-6);
        assert!((b - 0.5).abs() < 1e-6);

        let lit = Lighting::from_reflectance(0.2).with_color_phase(0.0);
        assert!((lit.material_diffuse[1] - 1.0).abs() < 1e-6);
        assert_eq!(lit.material_diffuse[3], 0.2);
    }
}
