use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaygroundError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("Session state is already initialized")]
    AlreadyInitialized,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session is closed")]
    SessionClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for PlaygroundError {
    fn from(e: serde_json::Error) -> Self {
        PlaygroundError::Serialization(e.to_string())
    }
}
