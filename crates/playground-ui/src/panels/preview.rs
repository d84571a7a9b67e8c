//! Preview pane. The component itself runs in a sandboxed iframe laid over
//! the canvas; this panel reserves its rectangle and shows the state around it.

use egui::{self, RichText, Sense};
use playground_core::sandbox::PreviewState;

use crate::theme::*;

/// Render the preview pane. Returns the rectangle the sandbox frame should
/// cover, or None when there is nothing to show.
pub fn preview_panel(ui: &mut egui::Ui, preview: &PreviewState) -> Option<egui::Rect> {
    ui.horizontal(|ui| {
        let (text, color) = status_label(preview);
        ui.label(RichText::new(text).color(color).small());
    });

    if *preview == PreviewState::Empty {
        egui::Frame::default()
            .fill(BG_SECONDARY)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(PANEL_PADDING)
            .show(ui, |ui| {
                ui.set_min_size(ui.available_size());
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("Your component will appear here.")
                            .color(TEXT_SECONDARY),
                    );
                });
            });
        return None;
    }

    let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    ui.painter().rect_filled(rect, PANEL_ROUNDING, egui::Color32::WHITE);
    Some(rect)
}

fn status_label(preview: &PreviewState) -> (String, egui::Color32) {
    match preview {
        PreviewState::Empty => ("No component".to_string(), TEXT_SECONDARY),
        PreviewState::Loading { .. } => ("Rendering...".to_string(), WARNING),
        PreviewState::Rendered { .. } => ("Rendered".to_string(), SUCCESS),
        PreviewState::BuildError { .. } => ("Build error".to_string(), ERROR),
        PreviewState::RuntimeError { message, .. } => {
            (format!("Runtime error: {}", first_line(message)), ERROR)
        }
    }
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}
