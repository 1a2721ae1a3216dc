//! Overlay theme and styling
//!
//! The overlay draws with its own [`Style`] set on the portal's layers only,
//! so none of this leaks into the host application's context style.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

/// Overlay color palette
pub struct ThemeColors;

impl ThemeColors {
    // Background colors
    pub const BG_DIALOG: Color32 = Color32::from_rgb(24, 24, 28);
    pub const BG_HEADER: Color32 = Color32::from_rgb(32, 32, 38);
    pub const BG_CODE: Color32 = Color32::from_rgb(14, 14, 18);
    pub const BG_BADGE: Color32 = Color32::from_rgb(40, 40, 48);
    pub const BACKDROP: Color32 = Color32::from_rgb(8, 8, 12);

    // Severity colors
    pub const ERROR: Color32 = Color32::from_rgb(255, 85, 85);
    pub const ERROR_MUTED: Color32 = Color32::from_rgb(180, 60, 60);
    pub const WARNING: Color32 = Color32::from_rgb(255, 193, 7);
    pub const INFO: Color32 = Color32::from_rgb(88, 166, 255);

    // Text colors
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 175);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(100, 100, 115);

    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 72);
}

/// Build the style used inside the overlay portal
pub fn overlay_style() -> Style {
    let mut style = Style::default();
    let mut visuals = Visuals::dark();

    visuals.window_fill = ThemeColors::BG_DIALOG;
    visuals.panel_fill = ThemeColors::BG_DIALOG;
    visuals.extreme_bg_color = ThemeColors::BG_CODE;
    visuals.faint_bg_color = ThemeColors::BG_HEADER;
    visuals.override_text_color = Some(ThemeColors::TEXT_PRIMARY);

    visuals.widgets.inactive.bg_fill = ThemeColors::BG_BADGE;
    visuals.widgets.inactive.weak_bg_fill = ThemeColors::BG_BADGE;
    visuals.widgets.inactive.rounding = Rounding::same(4.0);
    visuals.widgets.hovered.bg_fill = ThemeColors::BG_HEADER;
    visuals.widgets.hovered.rounding = Rounding::same(4.0);
    visuals.widgets.active.bg_fill = ThemeColors::ERROR_MUTED;
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.hyperlink_color = ThemeColors::INFO;
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, ThemeColors::BORDER);

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);

    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(20.0, FontFamily::Proportional)),
    ]
    .into();

    style
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Backdrop color for fullscreen views at the configured opacity
pub fn backdrop(opacity: f32) -> Color32 {
    color_with_alpha(ThemeColors::BACKDROP, (opacity.clamp(0.0, 1.0) * 255.0) as u8)
}

/// Frame used for dialogs in fullscreen views
pub fn dialog_frame() -> egui::Frame {
    egui::Frame::none()
        .fill(ThemeColors::BG_DIALOG)
        .stroke(Stroke::new(1.0, ThemeColors::BORDER))
        .rounding(Rounding::same(8.0))
        .inner_margin(20.0)
}

/// Frame used for code and compiler output
pub fn code_frame() -> egui::Frame {
    egui::Frame::none()
        .fill(ThemeColors::BG_CODE)
        .rounding(Rounding::same(4.0))
        .inner_margin(12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backdrop_clamps_opacity() {
        assert_eq!(backdrop(2.0).a(), 255);
        assert_eq!(backdrop(-1.0).a(), 0);
    }

    #[test]
    fn test_overlay_style_differs_from_default() {
        let style = overlay_style();
        assert_eq!(style.visuals.window_fill, ThemeColors::BG_DIALOG);
        assert_ne!(style.visuals.window_fill, Style::default().visuals.window_fill);
    }
}
