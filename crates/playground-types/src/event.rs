use serde::{Deserialize, Serialize};

/// Events emitted by the playground core.
/// The UI drains these each frame to update its status line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaygroundEvent {
    /// A session was loaded into the state store
    SessionOpened { session_id: String },

    /// A chat turn was appended
    TurnAppended { index: usize },

    /// The markup/style pair was replaced
    SourceReplaced,

    /// A prompt was sent to the generator
    DispatchStarted,

    /// The in-flight prompt finished
    DispatchFinished { success: bool },

    /// The preview sandbox changed state
    PreviewChanged,

    /// An autosave write completed
    Saved,

    /// The session view was torn down
    SessionClosed,
}

/// Messages posted by a preview document to its parent window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxMessage {
    pub source: String,
    pub generation: u64,
    #[serde(flatten)]
    pub report: SandboxReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SandboxReport {
    /// The component mounted without throwing
    Rendered,
    /// Import, export lookup or render threw
    RuntimeError { message: String },
}

impl SandboxMessage {
    /// Value of `source` on every message a preview document posts
    pub const SOURCE: &'static str = "playground-preview";

    pub fn is_preview_message(&self) -> bool {
        self.source == Self::SOURCE
    }
}
