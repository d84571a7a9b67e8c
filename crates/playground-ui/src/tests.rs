#[cfg(test)]
mod tests {
    use crate::panels::{preview, settings};
    use crate::state::*;
    use playground_core::sandbox::PreviewState;
    use playground_types::config::{PlaygroundConfig, StorageBackendType};
    use playground_types::event::PlaygroundEvent;
    use playground_types::session::SessionSummary;

    fn summary(id: &str, updated_at: &str) -> SessionSummary {
        SessionSummary {
            id: id.to_string(),
            name: format!("Session {}", id),
            updated_at: updated_at.to_string(),
        }
    }

    /// Run one headless frame with a central panel.
    fn run_frame(mut add_contents: impl FnMut(&mut egui::Ui)) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| add_contents(ui));
        });
    }

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::new();
        assert_eq!(state.screen, Screen::Dashboard);
        assert!(state.transcript.is_empty());
        assert!(state.draft.is_empty());
        assert!(state.input_text.is_empty());
        assert!(state.pending_image.is_none());
        assert_eq!(state.view_mode, ViewMode::Preview);
        assert_eq!(state.code_tab, CodeTab::Component);
        assert!(!state.show_settings);
        assert_eq!(state.status_text, STATUS_READY);
        assert!(!state.is_busy());
    }

    #[test]
    fn test_ui_state_session_opened() {
        let mut state = UiState::new();
        state.process_events(vec![PlaygroundEvent::SessionOpened {
            session_id: "s1".to_string(),
        }]);
        assert_eq!(state.screen, Screen::Editor);
        assert!(state.take_transcript_stale());
        assert!(state.take_source_stale());
        // Flags are consumed once
        assert!(!state.take_transcript_stale());
        assert!(!state.take_source_stale());
    }

    #[test]
    fn test_ui_state_dispatch_lifecycle() {
        let mut state = UiState::new();
        state.view_mode = ViewMode::Code;

        state.process_events(vec![
            PlaygroundEvent::DispatchStarted,
            PlaygroundEvent::TurnAppended { index: 0 },
        ]);
        assert!(state.is_busy());
        assert_eq!(state.status_text, STATUS_GENERATING);
        assert!(state.take_transcript_stale());

        state.process_events(vec![
            PlaygroundEvent::SourceReplaced,
            PlaygroundEvent::TurnAppended { index: 1 },
            PlaygroundEvent::DispatchFinished { success: true },
        ]);
        assert!(!state.is_busy());
        assert_eq!(state.status_text, STATUS_READY);
        assert_eq!(state.view_mode, ViewMode::Preview);
        assert!(state.take_source_stale());
    }

    #[test]
    fn test_ui_state_failed_dispatch_keeps_view() {
        let mut state = UiState::new();
        state.view_mode = ViewMode::Code;
        state.process_events(vec![
            PlaygroundEvent::DispatchStarted,
            PlaygroundEvent::DispatchFinished { success: false },
        ]);
        assert_eq!(state.view_mode, ViewMode::Code);
        assert!(!state.take_source_stale());
    }

    #[test]
    fn test_ui_state_saved_status() {
        let mut state = UiState::new();
        state.process_events(vec![PlaygroundEvent::Saved]);
        assert_eq!(state.status_text, STATUS_SAVED);

        state.mark_edited();
        assert_eq!(state.status_text, STATUS_READY);
    }

    #[test]
    fn test_ui_state_saved_does_not_hide_generating() {
        let mut state = UiState::new();
        state.process_events(vec![PlaygroundEvent::DispatchStarted, PlaygroundEvent::Saved]);
        assert_eq!(state.status_text, STATUS_GENERATING);
    }

    #[test]
    fn test_ui_state_can_send() {
        let mut state = UiState::new();
        assert!(!state.can_send());

        state.input_text = "   ".to_string();
        assert!(!state.can_send());

        state.input_text = "a red button".to_string();
        assert!(state.can_send());

        state.process_events(vec![PlaygroundEvent::DispatchStarted]);
        assert!(!state.can_send());
    }

    #[test]
    fn test_ui_state_image_only_can_send() {
        let mut state = UiState::new();
        assert!(state.attach_dropped_file("shot.png", "image/png", b"png-bytes"));
        assert!(state.can_send());
    }

    #[test]
    fn test_ui_state_take_input() {
        let mut state = UiState::new();
        state.input_text = "  make it blue \n".to_string();
        state.attach_dropped_file("a.webp", "", b"webp");

        let (text, image) = state.take_input();
        assert_eq!(text, "make it blue");
        let image = image.unwrap();
        assert_eq!(image.file_name, "a.webp");
        assert!(image.data_url.starts_with("data:image/webp;base64,"));
        assert!(state.input_text.is_empty());
        assert!(state.pending_image.is_none());
    }

    #[test]
    fn test_ui_state_attach_uses_browser_mime() {
        let mut state = UiState::new();
        assert!(state.attach_dropped_file("clipboard", "image/jpeg", &[0xff, 0xd8]));
        assert_eq!(
            state.pending_image.as_ref().unwrap().data_url,
            "data:image/jpeg;base64,/9g="
        );
    }

    #[test]
    fn test_ui_state_attach_rejects_non_image() {
        let mut state = UiState::new();
        assert!(!state.attach_dropped_file("notes.txt", "text/plain", b"hi"));
        assert!(state.pending_image.is_none());
        assert!(state.drop_error.as_ref().unwrap().contains("notes.txt"));

        assert!(!state.attach_dropped_file("empty.png", "image/png", b""));
        assert!(state.drop_error.as_ref().unwrap().contains("empty"));

        // A good drop clears the previous complaint
        assert!(state.attach_dropped_file("ok.gif", "", b"gif"));
        assert!(state.drop_error.is_none());
    }

    #[test]
    fn test_ui_state_leave_session() {
        let mut state = UiState::new();
        state.process_events(vec![
            PlaygroundEvent::SessionOpened {
                session_id: "s".to_string(),
            },
            PlaygroundEvent::DispatchStarted,
        ]);
        state.session_name = "Buttons".to_string();
        state.input_text = "draft".to_string();
        state.view_mode = ViewMode::Code;

        state.leave_session();
        assert_eq!(state.screen, Screen::Dashboard);
        assert!(state.session_name.is_empty());
        assert!(state.input_text.is_empty());
        assert_eq!(state.view_mode, ViewMode::Preview);
        assert!(!state.is_busy());
        assert!(!state.take_source_stale());
    }

    #[test]
    fn test_ui_state_sessions_sorted_newest_first() {
        let mut state = UiState::new();
        state.sessions_loading = true;
        state.set_sessions(vec![
            summary("old", "2024-01-01T00:00:00Z"),
            summary("new", "2024-03-01T00:00:00Z"),
            summary("mid", "2024-02-01T00:00:00Z"),
        ]);
        let ids: Vec<&str> = state.sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert!(!state.sessions_loading);
    }

    #[test]
    fn test_code_tab_file_names() {
        assert_eq!(CodeTab::Component.file_name(), "Component.jsx");
        assert_eq!(CodeTab::Styles.file_name(), "styles.css");
    }

    #[test]
    fn test_ui_state_default() {
        let state = UiState::default();
        assert_eq!(state.status_text, STATUS_READY);
        assert!(state.sessions.is_empty());
    }

    // ─── Panel Tests ─────────────────────────────────────────

    #[test]
    fn test_preview_panel_empty_has_no_frame() {
        let mut rect = None;
        run_frame(|ui| rect = preview::preview_panel(ui, &PreviewState::Empty));
        assert!(rect.is_none());
    }

    #[test]
    fn test_preview_panel_reserves_rect() {
        let mut rect = None;
        run_frame(|ui| {
            rect = preview::preview_panel(ui, &PreviewState::Loading { generation: 1 });
        });
        assert!(rect.is_some());

        let mut rect = None;
        run_frame(|ui| {
            rect = preview::preview_panel(
                ui,
                &PreviewState::BuildError {
                    message: "Unexpected token (1:5)".to_string(),
                },
            );
        });
        assert!(rect.is_some());
    }

    #[test]
    fn test_settings_panel_idle_frame() {
        let mut config = PlaygroundConfig::default();
        let mut action = None;
        run_frame(|ui| action = Some(settings::settings_panel(ui, &mut config, None)));
        assert!(matches!(action, Some(settings::SettingsAction::None)));
        assert_eq!(config, PlaygroundConfig::default());
    }

    #[test]
    fn test_storage_labels() {
        assert_eq!(settings::storage_label(&StorageBackendType::Http), "Session API");
        assert!(settings::storage_description(&StorageBackendType::Memory).contains("lost"));
    }
}
