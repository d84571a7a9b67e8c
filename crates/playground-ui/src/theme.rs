//! Playground palette and egui style

use egui::{Color32, CornerRadius, Stroke, Vec2};

pub const BG_PRIMARY: Color32 = Color32::from_rgb(17, 24, 39);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(31, 41, 55);
pub const BG_SURFACE: Color32 = Color32::from_rgb(55, 65, 81);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(243, 244, 246);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(156, 163, 175);
pub const ACCENT: Color32 = Color32::from_rgb(37, 99, 235);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);
pub const CODE_BG: Color32 = Color32::from_rgb(11, 15, 25);
pub const USER_BUBBLE: Color32 = ACCENT;
pub const ASSISTANT_BUBBLE: Color32 = BG_SURFACE;
/// Shown while a file is dragged over the window
pub const DROP_HIGHLIGHT: Color32 = Color32::from_rgba_premultiplied(37, 99, 235, 60);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(6);
pub const BUBBLE_ROUNDING: CornerRadius = CornerRadius::same(10);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);

/// Install the playground's dark style on an egui context
pub fn apply_theme(ctx: &egui::Context) {
    ctx.style_mut(|style| {
        let visuals = &mut style.visuals;
        visuals.dark_mode = true;
        visuals.panel_fill = BG_PRIMARY;
        visuals.window_fill = BG_SECONDARY;
        visuals.extreme_bg_color = CODE_BG;
        visuals.hyperlink_color = ACCENT;

        for (widgets, fill, text) in [
            (&mut visuals.widgets.inactive, BG_SURFACE, TEXT_SECONDARY),
            (&mut visuals.widgets.hovered, BG_SURFACE, TEXT_PRIMARY),
            (&mut visuals.widgets.active, ACCENT, TEXT_PRIMARY),
        ] {
            widgets.bg_fill = fill;
            widgets.weak_bg_fill = fill;
            widgets.fg_stroke = Stroke::new(1.0, text);
            widgets.corner_radius = PANEL_ROUNDING;
        }

        visuals.selection.bg_fill = ACCENT.linear_multiply(0.4);
        visuals.selection.stroke = Stroke::new(1.0, ACCENT);

        style.spacing.item_spacing = Vec2::new(8.0, 6.0);
        style.spacing.button_padding = Vec2::new(10.0, 4.0);
    });
}
