use crate::config::ViewerConfig;
use crate::renderer::CameraMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabMode {
    PolarRose,
    Dodecahedron,
    ShadedBarrel,
    LitBarrel,
    ColorCycleBarrel,
}

impl LabMode {
    pub const ALL: [LabMode; 5] = [
        LabMode::PolarRose,
        LabMode::Dodecahedron,
        LabMode::ShadedBarrel,
        LabMode::LitBarrel,
        LabMode::ColorCycleBarrel,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LabMode::PolarRose => "Polar rose",
            LabMode::Dodecahedron => "Dodecahedron",
            LabMode::ShadedBarrel => "Shaded barrel",
            LabMode::LitBarrel => "Lit barrel",
            LabMode::ColorCycleBarrel => "Colour cycle",
        }
    }

    /// The interactive barrels share one controller and the bench camera.
    pub fn is_interactive_barrel(self) -> bool {
        matches!(self, LabMode::LitBarrel | LabMode::ColorCycleBarrel)
    }

    pub fn color_cycle(self) -> bool {
        self == LabMode::ColorCycleBarrel
    }

    pub fn camera_mode(self) -> CameraMode {
        if self.is_interactive_barrel() {
            CameraMode::Bench
        } else {
            CameraMode::Orbital
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DodecaView {
    Wireframe,
    DepthSorted,
    Orthographic,
    Isometric,
}

impl DodecaView {
    pub const ALL: [DodecaView; 4] = [
        DodecaView::Wireframe,
        DodecaView::DepthSorted,
        DodecaView::Orthographic,
        DodecaView::Isometric,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DodecaView::Wireframe => "3D wireframe",
            DodecaView::DepthSorted => "Depth sorted",
            DodecaView::Orthographic => "Orthographic",
            DodecaView::Isometric => "Isometric",
        }
    }

    pub fn is_3d(self) -> bool {
        matches!(self, DodecaView::Wireframe | DodecaView::DepthSorted)
    }

    /// Tilt about x, y and z in degrees. Only the wireframe starts turned.
    pub fn tilt_degrees(self) -> f32 {
        match self {
            DodecaView::Wireframe => 30.0,
            _ => 0.0,
        }
    }

    pub fn initial_scale(self) -> f32 {
        match self {
            DodecaView::Wireframe => 1.5,
            _ => 1.0,
        }
    }
}

pub const DODECA_SCALE_STEP: f32 = 1.1;
pub const DODECA_SCALE_RANGE: (f32, f32) = (0.2, 4.0);
pub const POLAR_INITIAL_A: f32 = 1.0;

pub struct UiState {
    pub lab: LabMode,

    pub polar_a: f32,

    pub dodeca_view: DodecaView,
    pub dodeca_scale: f32,

    pub shaded_segments: u32,
    pub shaded_azimuth: f32,

    pub vsync_enabled: bool,
    pub show_stats: bool,
    pub show_help: bool,
    pub fps: f32,
}

impl UiState {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            shaded_segments: config.shaded_barrel.segments,
            shaded_azimuth: config.shaded_barrel.light_azimuth,
            vsync_enabled: config.window.vsync,
            ..Self::default()
        }
    }

    /// Switches the dodecahedron view, restarting it at its own scale.
    pub fn select_dodeca_view(&mut self, view: DodecaView) {
        self.dodeca_view = view;
        self.dodeca_scale = view.initial_scale();
    }

    /// `+` grows the 3D dodecahedron by one step, `-` shrinks it.
    pub fn step_dodeca_scale(&mut self, grow: bool) {
        let scaled = if grow {
            self.dodeca_scale * DODECA_SCALE_STEP
        } else {
            self.dodeca_scale / DODECA_SCALE_STEP
        };
        self.dodeca_scale = scaled.clamp(DODECA_SCALE_RANGE.0, DODECA_SCALE_RANGE.1);
    }
}

impl Default for UiState {
    fn default() -> Self {
        let config = ViewerConfig::default();
        Self {
            lab: LabMode::LitBarrel,

            polar_a: POLAR_INITIAL_A,

            dodeca_view: DodecaView::Wireframe,
            dodeca_scale: DodecaView::Wireframe.initial_scale(),

            shaded_segments: config.shaded_barrel.segments,
            shaded_azimuth: config.shaded_barrel.light_azimuth,

            vsync_enabled: config.window.vsync,
            show_stats: true,
            show_help: true,
            fps: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_mode_per_lab() {
        assert_eq!(LabMode::LitBarrel.camera_mode(), CameraMode::Bench);
        assert_eq!(LabMode::ColorCycleBarrel.camera_mode(), CameraMode::Bench);
        assert_eq!(LabMode::Dodecahedron.camera_mode(), CameraMode::Orbital);
        assert!(LabMode::ColorCycleBarrel.color_cycle());
        assert!(!LabMode::LitBarrel.color_cycle());
    }

    #[test]
    fn test_dodeca_scale_steps() {
        let mut state = UiState::default();
        state.step_dodeca_scale(true);
        assert!((state.dodeca_scale - 1.65).abs() < 1e-5);
        state.step_dodeca_scale(false);
        assert!((state.dodeca_scale - 1.5).abs() < 1e-5);

        for _ in 0..100 {
            state.step_dodeca_scale(true);
        }
        assert_eq!(state.dodeca_scale, DODECA_SCALE_RANGE.1);
    }

    #[test]
    fn test_view_switch_resets_scale() {
        let mut state = UiState::default();
        assert_eq!(state.dodeca_scale, 1.5);
        state.step_dodeca_scale(true);

        state.select_dodeca_view(DodecaView::DepthSorted);
        assert_eq!(state.dodeca_scale, 1.0);
        assert_eq!(DodecaView::DepthSorted.tilt_degrees(), 0.0);

        state.select_dodeca_view(DodecaView::Wireframe);
        assert_eq!(state.dodeca_scale, 1.5);
        assert_eq!(DodecaView::Wireframe.tilt_degrees(), 30.0);
    }

    #[test]
    fn test_from_config() {
        let mut config = ViewerConfig::default();
        config.shaded_barrel.segments = 12;
        config.window.vsync = true;
        let state = UiState::from_config(&config);
        assert_eq!(state.shaded_segments, 12);
        assert!(state.vsync_enabled);
        assert_eq!(state.lab, LabMode::LitBarrel);
    }
}
