//! Code view: Component.jsx / styles.css tabs over the editable draft,
//! copy-to-clipboard and the Code/Preview toggle.

use egui::{self, Align, Layout, RichText, ScrollArea};

use crate::state::{CodeTab, UiState, ViewMode};
use crate::theme::*;

/// Header row shared by the code and preview panes.
pub fn view_toggle(ui: &mut egui::Ui, state: &mut UiState) {
    ui.horizontal(|ui| {
        ui.selectable_value(&mut state.view_mode, ViewMode::Code, "Code");
        ui.selectable_value(&mut state.view_mode, ViewMode::Preview, "Preview");
    });
}

/// Render the code pane. Returns true when the draft was edited.
pub fn code_panel(ui: &mut egui::Ui, state: &mut UiState) -> bool {
    let mut edited = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                for tab in [CodeTab::Component, CodeTab::Styles] {
                    ui.selectable_value(&mut state.code_tab, tab, tab.file_name());
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Copy").clicked() {
                        ui.ctx().copy_text(active_text(state).to_string());
                        log::debug!("Copied {}", state.code_tab.file_name());
                    }
                });
            });
            ui.separator();

            let height = ui.available_height();
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .max_height(height)
                .show(ui, |ui| {
                    let buffer = match state.code_tab {
                        CodeTab::Component => &mut state.draft.markup,
                        CodeTab::Styles => &mut state.draft.style,
                    };
                    let editor = egui::TextEdit::multiline(buffer)
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .desired_rows(24)
                        .hint_text(
                            RichText::new("No component yet. Ask for one in the chat.")
                                .color(TEXT_SECONDARY),
                        );
                    if ui.add(editor).changed() {
                        edited = true;
                    }
                });
        });

    if edited {
        state.mark_edited();
    }
    edited
}

fn active_text(state: &UiState) -> &str {
    match state.code_tab {
        CodeTab::Component => &state.draft.markup,
        CodeTab::Styles => &state.draft.style,
    }
}
