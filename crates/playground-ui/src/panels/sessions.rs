//! Dashboard: saved sessions, newest first, and a button to start a new one.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};

use crate::state::UiState;
use crate::theme::*;

pub enum DashboardAction {
    None,
    Refresh,
    Create,
    Open(String),
}

pub fn dashboard_panel(ui: &mut egui::Ui, state: &UiState) -> DashboardAction {
    let mut action = DashboardAction::None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Your sessions").color(TEXT_PRIMARY).strong());
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let create = ui.add(
                        egui::Button::new(RichText::new("New session").color(TEXT_PRIMARY))
                            .fill(ACCENT)
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(110.0, 28.0)),
                    );
                    if create.clicked() {
                        action = DashboardAction::Create;
                    }
                    if ui.button("Refresh").clicked() {
                        action = DashboardAction::Refresh;
                    }
                });
            });
            ui.separator();

            if let Some(err) = &state.dashboard_error {
                ui.label(RichText::new(err).color(ERROR));
                ui.add_space(4.0);
            }

            if state.sessions_loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Loading sessions...").color(TEXT_SECONDARY));
                });
                return;
            }

            if state.sessions.is_empty() {
                ui.label(
                    RichText::new("No sessions yet. Create one to start generating components.")
                        .color(TEXT_SECONDARY)
                        .italics(),
                );
                return;
            }

            ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                for summary in &state.sessions {
                    let clicked = egui::Frame::default()
                        .fill(BG_SECONDARY)
                        .corner_radius(PANEL_ROUNDING)
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            ui.set_min_width(ui.available_width());
                            ui.label(RichText::new(&summary.name).color(TEXT_PRIMARY).strong());
                            ui.label(
                                RichText::new(format!("Updated {}", summary.updated_at))
                                    .color(TEXT_SECONDARY)
                                    .small(),
                            );
                        })
                        .response
                        .interact(egui::Sense::click())
                        .on_hover_cursor(egui::CursorIcon::PointingHand)
                        .clicked();
                    if clicked {
                        action = DashboardAction::Open(summary.id.clone());
                    }
                    ui.add_space(4.0);
                }
            });
        });

    action
}
