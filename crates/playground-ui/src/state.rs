//! UI-level state that drives rendering.
//! A projection of the open session, refreshed each frame by draining the
//! EventBus. Panels read and edit this; the app applies the results.

use playground_core::image::{media_type_for_file, ImagePayload};
use playground_types::event::PlaygroundEvent;
use playground_types::message::ChatTurn;
use playground_types::session::{SessionSummary, SourcePair};

pub const STATUS_READY: &str = "Ready";
pub const STATUS_GENERATING: &str = "Generating...";
pub const STATUS_SAVED: &str = "Saved";

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Editor,
}

/// Right-hand pane of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Code,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeTab {
    Component,
    Styles,
}

impl CodeTab {
    pub fn file_name(&self) -> &'static str {
        match self {
            CodeTab::Component => "Component.jsx",
            CodeTab::Styles => "styles.css",
        }
    }
}

/// An image dropped onto the chat panel, waiting for the next send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub file_name: String,
    pub data_url: String,
}

/// State visible to UI panels
pub struct UiState {
    pub screen: Screen,
    /// Sessions shown on the dashboard
    pub sessions: Vec<SessionSummary>,
    pub sessions_loading: bool,
    /// Last dashboard or open failure
    pub dashboard_error: Option<String>,

    pub session_name: String,
    /// Local copy of the transcript
    pub transcript: Vec<ChatTurn>,
    /// Editable copy of the component source
    pub draft: SourcePair,

    pub input_text: String,
    pub pending_image: Option<PendingImage>,
    /// Rejection reason for the last dropped file
    pub drop_error: Option<String>,

    pub view_mode: ViewMode,
    pub code_tab: CodeTab,
    pub show_settings: bool,

    pub status_text: String,
    generating: bool,
    transcript_stale: bool,
    source_stale: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Dashboard,
            sessions: Vec::new(),
            sessions_loading: false,
            dashboard_error: None,
            session_name: String::new(),
            transcript: Vec::new(),
            draft: SourcePair::default(),
            input_text: String::new(),
            pending_image: None,
            drop_error: None,
            view_mode: ViewMode::Preview,
            code_tab: CodeTab::Component,
            show_settings: false,
            status_text: STATUS_READY.to_string(),
            generating: false,
            transcript_stale: false,
            source_stale: false,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<PlaygroundEvent>) {
        for event in events {
            match event {
                PlaygroundEvent::SessionOpened { .. } => {
                    self.screen = Screen::Editor;
                    self.transcript_stale = true;
                    self.source_stale = true;
                    self.generating = false;
                    self.status_text = STATUS_READY.to_string();
                }
                PlaygroundEvent::TurnAppended { .. } => {
                    self.transcript_stale = true;
                }
                PlaygroundEvent::SourceReplaced => {
                    self.source_stale = true;
                }
                PlaygroundEvent::DispatchStarted => {
                    self.generating = true;
                    self.status_text = STATUS_GENERATING.to_string();
                }
                PlaygroundEvent::DispatchFinished { success } => {
                    self.generating = false;
                    self.status_text = STATUS_READY.to_string();
                    if success {
                        self.view_mode = ViewMode::Preview;
                    }
                }
                PlaygroundEvent::Saved => {
                    if !self.generating {
                        self.status_text = STATUS_SAVED.to_string();
                    }
                }
                PlaygroundEvent::PreviewChanged => {}
                PlaygroundEvent::SessionClosed => {
                    self.generating = false;
                    self.status_text = STATUS_READY.to_string();
                }
            }
        }
    }

    /// Whether a prompt is in flight
    pub fn is_busy(&self) -> bool {
        self.generating
    }

    /// Returns true once after the transcript changed.
    pub fn take_transcript_stale(&mut self) -> bool {
        std::mem::take(&mut self.transcript_stale)
    }

    /// Returns true once after the component source changed.
    pub fn take_source_stale(&mut self) -> bool {
        std::mem::take(&mut self.source_stale)
    }

    /// Enough input to send: text, an image, or both.
    pub fn can_send(&self) -> bool {
        !self.generating
            && (!self.input_text.trim().is_empty() || self.pending_image.is_some())
    }

    /// Take the composed prompt, clearing the input.
    pub fn take_input(&mut self) -> (String, Option<PendingImage>) {
        let text = std::mem::take(&mut self.input_text);
        (text.trim().to_string(), self.pending_image.take())
    }

    /// Attach a dropped file as the pending image.
    /// The browser's MIME type wins; the extension is the fallback.
    pub fn attach_dropped_file(&mut self, name: &str, mime: &str, bytes: &[u8]) -> bool {
        let media_type = if mime.starts_with("image/") {
            Some(mime)
        } else {
            media_type_for_file(name)
        };
        let Some(media_type) = media_type else {
            self.drop_error = Some(format!("'{}' is not an image", name));
            return false;
        };
        if bytes.is_empty() {
            self.drop_error = Some(format!("'{}' is empty", name));
            return false;
        }
        let payload = ImagePayload::from_bytes(media_type, bytes);
        self.pending_image = Some(PendingImage {
            file_name: name.to_string(),
            data_url: payload.to_data_url(),
        });
        self.drop_error = None;
        true
    }

    /// Typing after a save returns the status line to idle.
    pub fn mark_edited(&mut self) {
        if !self.generating {
            self.status_text = STATUS_READY.to_string();
        }
    }

    /// Back to the dashboard with a clean editor.
    pub fn leave_session(&mut self) {
        self.screen = Screen::Dashboard;
        self.session_name.clear();
        self.transcript.clear();
        self.draft = SourcePair::default();
        self.input_text.clear();
        self.pending_image = None;
        self.drop_error = None;
        self.view_mode = ViewMode::Preview;
        self.code_tab = CodeTab::Component;
        self.generating = false;
        self.transcript_stale = false;
        self.source_stale = false;
        self.status_text = STATUS_READY.to_string();
    }

    /// Replace the dashboard list, most recently updated first.
    pub fn set_sessions(&mut self, mut sessions: Vec<SessionSummary>) {
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        self.sessions = sessions;
        self.sessions_loading = false;
    }
}
