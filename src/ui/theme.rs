use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

pub const BG_PANEL: Color32 = Color32::from_rgb(18, 19, 23);
pub const BG_WIDGET: Color32 = Color32::from_rgb(30, 32, 38);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(42, 45, 54);
pub const BG_READOUT: Color32 = Color32::from_rgb(12, 12, 15);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(190, 190, 196);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(115, 116, 124);
pub const TEXT_BRIGHT: Color32 = Color32::from_rgb(232, 232, 236);

pub const ACCENT_CYAN: Color32 = Color32::from_rgb(64, 190, 200);
pub const ACCENT_AMBER: Color32 = Color32::from_rgb(214, 160, 60);
pub const ACCENT_GREEN: Color32 = Color32::from_rgb(80, 180, 90);
pub const ACCENT_RED: Color32 = Color32::from_rgb(190, 70, 70);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(48, 50, 60);

/// Dark panel styling on top of egui's dark visuals.
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.extreme_bg_color = BG_READOUT;
    visuals.faint_bg_color = BG_PANEL;
    visuals.selection.bg_fill = ACCENT_CYAN.gamma_multiply(0.35);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_CYAN);
    visuals.slider_trailing_fill = true;
    visuals.warn_fg_color = ACCENT_AMBER;
    visuals.error_fg_color = ACCENT_RED;

    let widgets = &mut visuals.widgets;
    for w in [&mut widgets.inactive, &mut widgets.noninteractive] {
        w.bg_fill = BG_WIDGET;
        w.weak_bg_fill = BG_WIDGET;
        w.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
        w.rounding = Rounding::same(4.0);
    }
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_MUTED);
    widgets.hovered.bg_fill = BG_WIDGET_HOVER;
    widgets.hovered.weak_bg_fill = BG_WIDGET_HOVER;
    widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT_CYAN);
    widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_BRIGHT);
    widgets.active.bg_stroke = Stroke::new(2.0, ACCENT_CYAN);
    widgets.active.fg_stroke = Stroke::new(1.0, TEXT_BRIGHT);

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.slider_width = 180.0;

    style.text_styles = [
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace)),
    ]
    .into();

    ctx.set_style(style);
}
