use std::time::Duration;

use egui::{Color32, Context, RichText, ScrollArea, Ui};

use crate::config::SHADED_SEGMENT_RANGE;
use crate::geometry::polar::A_RANGE;
use crate::interaction::BarrelState;
use crate::ui::state::{DodecaView, LabMode, UiState};
use crate::ui::theme::*;

/// What the panel asked for this frame; applied by the app after the egui
/// pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UiActions {
    pub lab_changed: bool,
    pub rebuild_polar: bool,
    pub rebuild_dodeca: bool,
    pub rebuild_shaded: bool,
    pub reset_camera: bool,
    /// `Some(true)` steps the barrel segment count up.
    pub step_segments: Option<bool>,
    /// `Some(true)` steps the reflectance up.
    pub step_reflectance: Option<bool>,
}

pub fn draw_side_panel(
    ctx: &Context,
    state: &mut UiState,
    barrel: &BarrelState,
    frame_interval: Duration,
) -> UiActions {
    let mut actions = UiActions::default();

    egui::SidePanel::right("control_panel")
        .min_width(260.0)
        .max_width(380.0)
        .default_width(300.0)
        .frame(egui::Frame::default().fill(BG_PANEL).inner_margin(14.0))
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("Geometry Labs").strong());
                ui.add_space(4.0);
                ui.label(RichText::new("Curves, polyhedra and barrels").color(TEXT_MUTED).size(11.0));
                ui.add_space(14.0);

                section_header(ui, "LAB");
                for lab in LabMode::ALL {
                    if ui.selectable_label(state.lab == lab, lab.label()).clicked() && state.lab != lab {
                        state.lab = lab;
                        actions.lab_changed = true;
                    }
                }
                ui.add_space(12.0);
                ui.separator();
                ui.add_space(10.0);

                match state.lab {
                    LabMode::PolarRose => polar_controls(ui, state, &mut actions),
                    LabMode::Dodecahedron => dodeca_controls(ui, state, &mut actions),
                    LabMode::ShadedBarrel => shaded_controls(ui, state, &mut actions),
                    LabMode::LitBarrel | LabMode::ColorCycleBarrel => {
                        barrel_controls(ui, barrel, &mut actions)
                    }
                }

                ui.add_space(12.0);
                ui.separator();
                ui.add_space(10.0);

                perf_controls(ui, state, frame_interval);
            });
        });

    actions
}

fn section_header(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_MUTED).size(11.0).strong());
    ui.add_space(4.0);
}

fn polar_controls(ui: &mut Ui, state: &mut UiState, actions: &mut UiActions) {
    section_header(ui, "ROSE  ρ = a·sin(6φ)");
    ui.horizontal(|ui| {
        ui.label("a:");
        let slider = egui::Slider::new(&mut state.polar_a, A_RANGE.0..=A_RANGE.1).step_by(0.01);
        if ui.add(slider).changed() {
            actions.rebuild_polar = true;
        }
    });
}

fn dodeca_controls(ui: &mut Ui, state: &mut UiState, actions: &mut UiActions) {
    section_header(ui, "VIEW");
    for view in DodecaView::ALL {
        if ui.selectable_label(state.dodeca_view == view, view.label()).clicked()
            && state.dodeca_view != view
        {
            state.select_dodeca_view(view);
            actions.rebuild_dodeca = true;
        }
    }
    ui.add_space(8.0);

    if state.dodeca_view.is_3d() {
        ui.horizontal(|ui| {
            ui.label("Scale:");
            ui.label(RichText::new(format!("{:.3}", state.dodeca_scale)).color(TEXT_BRIGHT));
            if ui.small_button("−").clicked() {
                state.step_dodeca_scale(false);
                actions.rebuild_dodeca = true;
            }
            if ui.small_button("+").clicked() {
                state.step_dodeca_scale(true);
                actions.rebuild_dodeca = true;
            }
        });
        if ui.button("Reset camera").clicked() {
            actions.reset_camera = true;
        }
    }
}

fn shaded_controls(ui: &mut Ui, state: &mut UiState, actions: &mut UiActions) {
    section_header(ui, "MESH");
    ui.horizontal(|ui| {
        ui.label("Segments:");
        let range = SHADED_SEGMENT_RANGE.0..=SHADED_SEGMENT_RANGE.1;
        if ui.add(egui::Slider::new(&mut state.shaded_segments, range)).changed() {
            actions.rebuild_shaded = true;
        }
    });
    ui.add_space(8.0);

    section_header(ui, "LIGHT");
    ui.horizontal(|ui| {
        ui.label("Azimuth:");
        let slider = egui::Slider::new(&mut state.shaded_azimuth, 0.0..=360.0).suffix("°");
        if ui.add(slider).changed() {
            actions.rebuild_shaded = true;
        }
    });
    if ui.button("Reset camera").clicked() {
        actions.reset_camera = true;
    }
}

fn barrel_controls(ui: &mut Ui, barrel: &BarrelState, actions: &mut UiActions) {
    section_header(ui, "BARREL");
    egui::Frame::default()
        .fill(BG_READOUT)
        .stroke(egui::Stroke::new(1.0, BORDER_SUBTLE))
        .rounding(6.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
            egui::Grid::new("barrel_readout").num_columns(3).spacing([12.0, 4.0]).show(ui, |ui| {
                ui.label(RichText::new("Segments").color(TEXT_MUTED));
                ui.label(RichText::new(barrel.segments.to_string()).color(ACCENT_CYAN));
                ui.horizontal(|ui| {
                    if ui.small_button("−").clicked() {
                        actions.step_segments = Some(false);
                    }
                    if ui.small_button("+").clicked() {
                        actions.step_segments = Some(true);
                    }
                });
                ui.end_row();

                ui.label(RichText::new("Reflectance").color(TEXT_MUTED));
                ui.label(RichText::new(format!("{:.1}", barrel.reflectance)).color(ACCENT_AMBER));
                ui.horizontal(|ui| {
                    if ui.small_button("−").clicked() {
                        actions.step_reflectance = Some(false);
                    }
                    if ui.small_button("+").clicked() {
                        actions.step_reflectance = Some(true);
                    }
                });
                ui.end_row();

                ui.label(RichText::new("Rotation").color(TEXT_MUTED));
                ui.label(RichText::new(format!("{:.1}°", barrel.rotation)).color(TEXT_PRIMARY));
                ui.label("");
                ui.end_row();

                ui.label(RichText::new("Lift").color(TEXT_MUTED));
                ui.label(RichText::new(format!("{:.1}", barrel.lift)).color(TEXT_PRIMARY));
                ui.label("");
                ui.end_row();
            });
        });
}

fn perf_controls(ui: &mut Ui, state: &mut UiState, frame_interval: Duration) {
    section_header(ui, "PERFORMANCE");
    ui.horizontal(|ui| {
        ui.checkbox(&mut state.vsync_enabled, "VSync");
        ui.checkbox(&mut state.show_stats, "Stats");
        ui.checkbox(&mut state.show_help, "Help");
    });

    if state.show_stats {
        let fps_color = if state.fps >= 20.0 {
            ACCENT_GREEN
        } else if state.fps >= 10.0 {
            ACCENT_AMBER
        } else {
            ACCENT_RED
        };
        egui::Grid::new("stats").num_columns(2).spacing([20.0, 4.0]).show(ui, |ui| {
            ui.label(RichText::new("FPS").color(TEXT_MUTED));
            ui.label(RichText::new(format!("{:.0}", state.fps)).color(fps_color));
            ui.end_row();

            ui.label(RichText::new("Interval").color(TEXT_MUTED));
            ui.label(RichText::new(format!("{} ms", frame_interval.as_millis())).color(TEXT_PRIMARY));
            ui.end_row();
        });
    }
}

/// Key bindings of the active lab.
pub fn help_lines(lab: LabMode, view: DodecaView) -> &'static [&'static str] {
    match lab {
        LabMode::PolarRose => &["Slider - a"],
        LabMode::Dodecahedron if view.is_3d() => {
            &["RMB+Drag - Orbit | Scroll - Zoom", "+ / - - Scale x1.1 / ÷1.1"]
        }
        LabMode::Dodecahedron => &["Panel - Switch projection"],
        LabMode::ShadedBarrel => &["RMB+Drag - Orbit | Scroll - Zoom", "Sliders - Segments, light azimuth"],
        LabMode::LitBarrel | LabMode::ColorCycleBarrel => &[
            "LMB+Drag - Rotate",
            "Up / Down - Segments ±2 | Left / Right - Reflectance ±0.1",
            "W / S (hold) - Lift",
        ],
    }
}

pub fn draw_help_overlay(ctx: &Context, lab: LabMode, view: DodecaView) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(Color32::from_black_alpha(180))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
                    for line in help_lines(lab, view) {
                        ui.label(RichText::new(*line).color(TEXT_BRIGHT));
                    }
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lines_per_lab() {
        for lab in LabMode::ALL {
            assert!(!help_lines(lab, DodecaView::Wireframe).is_empty());
        }
        let barrel = help_lines(LabMode::LitBarrel, DodecaView::Wireframe);
        assert!(barrel.iter().any(|l| l.contains("Reflectance")));
        let iso = help_lines(LabMode::Dodecahedron, DodecaView::Isometric);
        assert!(!iso.iter().any(|l| l.contains("Orbit")));
    }

    #[test]
    fn test_default_actions_are_empty() {
        let actions = UiActions::default();
        assert!(!actions.lab_changed);
        assert_eq!(actions.step_segments, None);
    }
}
