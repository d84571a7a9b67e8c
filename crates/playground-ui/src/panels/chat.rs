//! Chat panel: transcript bubbles, prompt input and image drop target.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use playground_types::message::ChatTurn;

use crate::state::UiState;
use crate::theme::*;

/// Render the chat panel. Returns true when the user sends the prompt.
pub fn chat_panel(ui: &mut egui::Ui, state: &mut UiState) -> bool {
    let mut submitted = false;
    let dragging = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());

    let frame = egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Chat").color(TEXT_PRIMARY).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status_color = if state.is_busy() { WARNING } else { SUCCESS };
                        ui.label(RichText::new(&state.status_text).color(status_color).small());
                    });
                });

                ui.separator();

                let available_height = ui.available_height() - 110.0;
                ScrollArea::vertical()
                    .max_height(available_height.max(60.0))
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        if state.transcript.is_empty() {
                            ui.label(
                                RichText::new("Describe a component, or drop a screenshot here.")
                                    .color(TEXT_SECONDARY)
                                    .italics(),
                            );
                        }
                        for turn in &state.transcript {
                            render_turn(ui, turn);
                            ui.add_space(4.0);
                        }
                        if state.is_busy() {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label(RichText::new("Generating...").color(TEXT_SECONDARY).small());
                            });
                        }
                    });

                ui.add_space(6.0);
                attachment_row(ui, state);

                ui.horizontal(|ui| {
                    let busy = state.is_busy();
                    let input = egui::TextEdit::multiline(&mut state.input_text)
                        .hint_text("e.g. a pricing card with three tiers")
                        .desired_rows(2)
                        .desired_width(ui.available_width() - 70.0);
                    let response = ui.add_enabled(!busy, input);

                    let send_enabled = state.can_send();
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                            .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    // Enter sends, Shift+Enter is a newline
                    let enter_pressed = response.has_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter) && !i.modifiers.shift);
                    if enter_pressed {
                        let trimmed = state.input_text.trim_end_matches('\n').len();
                        state.input_text.truncate(trimmed);
                    }
                    if (enter_pressed || send_btn.clicked()) && state.can_send() {
                        submitted = true;
                        response.request_focus();
                    }
                });
            });
        });

    if dragging {
        ui.painter()
            .rect_filled(frame.response.rect, PANEL_ROUNDING, DROP_HIGHLIGHT);
    }

    submitted
}

fn attachment_row(ui: &mut egui::Ui, state: &mut UiState) {
    let mut remove = false;
    if let Some(image) = &state.pending_image {
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Image: {}", image.file_name)).color(ACCENT).small());
            if ui.small_button("x").on_hover_text("Remove image").clicked() {
                remove = true;
            }
        });
    }
    if remove {
        state.pending_image = None;
    }
    if let Some(err) = &state.drop_error {
        ui.label(RichText::new(err).color(ERROR).small());
    }
}

fn render_turn(ui: &mut egui::Ui, turn: &ChatTurn) {
    let (layout, fill) = if turn.is_user() {
        (Layout::right_to_left(Align::Min), USER_BUBBLE)
    } else {
        (Layout::left_to_right(Align::Min), ASSISTANT_BUBBLE)
    };
    let max_width = ui.available_width() * 0.85;

    ui.with_layout(layout, |ui| {
        egui::Frame::default()
            .fill(fill)
            .corner_radius(BUBBLE_ROUNDING)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.label(RichText::new(&turn.content).color(TEXT_PRIMARY));
            });
    });
}
