//! Settings panel: generator backend, session storage and autosave delay.
//! Includes an explicit Save button with visual feedback.

use egui::{self, RichText, Vec2};
use playground_types::config::{GeneratorBackend, PlaygroundConfig, StorageBackendType};
use crate::theme::*;

/// What the caller should do after rendering the settings panel
pub enum SettingsAction {
    /// Nothing changed
    None,
    /// A field was changed
    Changed,
    /// The user clicked the explicit Save button
    SaveClicked,
}

/// Save feedback passed in from the app layer
#[derive(Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Render the settings panel. Returns an action for the caller to handle.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut PlaygroundConfig,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── Generator ────────────────────────────────────
            ui.label(RichText::new("Generator").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Backend").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("generator_backend")
                .selected_text(config.generator.backend.label())
                .show_ui(ui, |ui| {
                    for backend in GeneratorBackend::all() {
                        changed |= ui
                            .selectable_value(&mut config.generator.backend, *backend, backend.label())
                            .changed();
                    }
                });
            ui.add_space(4.0);

            match config.generator.backend {
                GeneratorBackend::Proxy => {
                    ui.label(RichText::new("Endpoint").color(TEXT_SECONDARY).small());
                    changed |= ui.text_edit_singleline(&mut config.generator.endpoint).changed();
                }
                GeneratorBackend::Gemini => {
                    ui.label(RichText::new("Model").color(TEXT_SECONDARY).small());
                    changed |= ui.text_edit_singleline(&mut config.generator.model).changed();
                    ui.add_space(4.0);

                    ui.label(RichText::new("API Key").color(TEXT_SECONDARY).small());
                    let key_edit = egui::TextEdit::singleline(&mut config.generator.api_key)
                        .password(true)
                        .hint_text("AIza...");
                    changed |= ui.add(key_edit).changed();
                    ui.add_space(4.0);

                    ui.label(RichText::new("API Base URL (optional)").color(TEXT_SECONDARY).small());
                    let mut base_url = config.generator.api_base.clone().unwrap_or_default();
                    let hint = config.generator.backend.default_base_url().to_string();
                    if ui
                        .add(egui::TextEdit::singleline(&mut base_url).hint_text(hint))
                        .changed()
                    {
                        config.generator.api_base = if base_url.is_empty() { None } else { Some(base_url) };
                        changed = true;
                    }
                    ui.add_space(4.0);

                    ui.label(RichText::new("Temperature").color(TEXT_SECONDARY).small());
                    changed |= ui
                        .add(egui::Slider::new(&mut config.generator.temperature, 0.0..=2.0))
                        .changed();
                }
            }

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Storage ──────────────────────────────────────
            ui.label(RichText::new("Sessions").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Backend").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("storage_backend")
                .selected_text(storage_label(&config.storage.backend))
                .show_ui(ui, |ui| {
                    for backend in [StorageBackendType::Http, StorageBackendType::Memory] {
                        let label = storage_label(&backend);
                        changed |= ui
                            .selectable_value(&mut config.storage.backend, backend, label)
                            .changed();
                    }
                });
            ui.label(
                RichText::new(storage_description(&config.storage.backend))
                    .color(TEXT_SECONDARY)
                    .small()
                    .italics(),
            );

            if config.storage.backend == StorageBackendType::Http {
                ui.add_space(4.0);
                ui.label(RichText::new("Session API").color(TEXT_SECONDARY).small());
                changed |= ui.text_edit_singleline(&mut config.storage.api_base).changed();
            }

            ui.add_space(4.0);
            ui.label(RichText::new("Autosave delay (ms)").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.autosave.delay_ms, 250..=5000))
                .changed();

            // ── Save Button ──────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(RichText::new("Save Settings").color(TEXT_PRIMARY).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}

pub fn storage_label(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Http => "Session API",
        StorageBackendType::Memory => "Memory",
    }
}

pub fn storage_description(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Http => "Sessions are stored by the server and survive reloads.",
        StorageBackendType::Memory => "Fast but volatile. All sessions are lost on page reload.",
    }
}
