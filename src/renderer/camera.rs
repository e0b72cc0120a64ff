use glam::{Mat4, Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
    /// Fixed bench view: perspective followed by a constant pull-back, as
    /// used by the barrel viewers.
    Bench,
    /// Orbits `target` by yaw/pitch at `orbital_distance`.
    Orbital,
}

/// Offset applied after projection in the bench view.
pub const BENCH_OFFSET: Vec3 = Vec3::new(0.0, -1.65, -5.0);

pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,

    pub target: Vec3,
    pub orbital_distance: f32,

    pub mode: CameraMode,

    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub mouse_sensitivity: f32,
    pub zoom_speed: f32,
    pub distance_range: (f32, f32),
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            yaw: -60.0_f32.to_radians(),
            pitch: 30.0_f32.to_radians(),

            target: Vec3::ZERO,
            orbital_distance: 8.0,

            mode: CameraMode::Bench,

            fov: 45.0_f32.to_radians(),
            aspect: 1280.0 / 780.0,
            near: 0.1,
            far: 50.0,

            mouse_sensitivity: 0.005,
            zoom_speed: 0.5,
            distance_range: (3.0, 40.0),
        };
        camera.update_orbital_position();
        camera
    }
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        match self.mode {
            CameraMode::Bench => Mat4::from_translation(BENCH_OFFSET),
            CameraMode::Orbital => Mat4::look_at_rh(self.position, self.target, Vec3::Z),
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let far = match self.mode {
            CameraMode::Bench => self.far,
            CameraMode::Orbital => self.far.max(self.orbital_distance * 3.0),
        };
        Mat4::perspective_rh(self.fov, self.aspect, self.near, far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Distance along the viewing direction, larger is farther.
    pub fn view_depth(&self, point: Vec3) -> f32 {
        -self.view_matrix().transform_point3(point).z
    }

    pub fn process_mouse_movement(&mut self, delta: Vec2) {
        if self.mode != CameraMode::Orbital {
            return;
        }

        self.yaw -= delta.x * self.mouse_sensitivity;
        self.pitch += delta.y * self.mouse_sensitivity;

        let max_pitch = 89.0_f32.to_radians();
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);

        self.update_orbital_position();
    }

    pub fn process_scroll(&mut self, delta: f32) {
        if self.mode != CameraMode::Orbital {
            return;
        }
        let (min, max) = self.distance_range;
        self.orbital_distance = (self.orbital_distance - delta * self.zoom_speed).clamp(min, max);
        self.update_orbital_position();
    }

    /// Aims the orbit at `target` from the default angles, widening the zoom
    /// range when `distance` falls outside it.
    pub fn reset_orbit(&mut self, target: Vec3, distance: f32) {
        let defaults = Self::default();
        self.yaw = defaults.yaw;
        self.pitch = defaults.pitch;
        self.target = target;
        self.orbital_distance = distance;
        self.distance_range = (
            defaults.distance_range.0.min(distance),
            defaults.distance_range.1.max(distance * 2.0),
        );
        self.update_orbital_position();
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        if mode == CameraMode::Orbital {
            self.update_orbital_position();
        }
    }

    /// Z-up orbit, matching the axes of the dodecahedron data.
    fn update_orbital_position(&mut self) {
        self.position = self.target
            + Vec3::new(
                self.orbital_distance * self.yaw.cos() * self.pitch.cos(),
                self.orbital_distance * self.yaw.sin() * self.pitch.cos(),
                self.orbital_distance * self.pitch.sin(),
            );
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.aspect = width / height.max(1.0);
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
        }
    }
}
