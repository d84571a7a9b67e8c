//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `playground-core` (pure Rust).
//! Implementations live in `playground-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::time::Duration;
use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use playground_types::{
    Result,
    session::{SessionRecord, SessionSnapshot, SessionSummary, SourcePair},
};
use crate::image::ImagePayload;

// ─── Generator Port ──────────────────────────────────────────

/// A validated request for the AI collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Raw prompt text as typed; may be empty when an image is attached
    pub prompt: String,
    pub image: Option<ImagePayload>,
}

#[async_trait(?Send)]
pub trait GeneratorPort {
    /// Produce a component for the prompt, or a human-readable failure
    async fn generate(&self, req: &GenerationRequest) -> Result<SourcePair>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Session Storage Port ────────────────────────────────────

#[async_trait(?Send)]
pub trait SessionStorePort {
    /// Fetch a session; `Ok(None)` when it does not exist
    async fn load_session(&self, id: &str) -> Result<Option<SessionRecord>>;

    /// Overwrite the mutable fields of a session
    async fn save_session(&self, id: &str, snapshot: &SessionSnapshot) -> Result<()>;

    /// Create a new, empty session
    async fn create_session(&self) -> Result<SessionRecord>;

    /// List sessions for the dashboard
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Timer Port ──────────────────────────────────────────────

/// Handle to a pending callback. Cancelled explicitly or when dropped.
pub struct ScheduledTask {
    canceller: Option<Box<dyn FnOnce()>>,
}

impl ScheduledTask {
    pub fn new(canceller: impl FnOnce() + 'static) -> Self {
        Self {
            canceller: Some(Box::new(canceller)),
        }
    }

    /// A task that has nothing left to cancel
    pub fn detached() -> Self {
        Self { canceller: None }
    }

    pub fn cancel(mut self) {
        self.run_canceller();
    }

    fn run_canceller(&mut self) {
        if let Some(cancel) = self.canceller.take() {
            cancel();
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.run_canceller();
    }
}

impl std::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("armed", &self.canceller.is_some())
            .finish()
    }
}

pub trait TimerPort {
    /// Run `callback` once after `delay` unless the returned task is cancelled first
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> ScheduledTask;
}

// ─── Task Spawner Port ───────────────────────────────────────

pub trait TaskSpawner {
    /// Run a future to completion on the current thread's executor
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

// ─── Sandbox Host Port ───────────────────────────────────────

/// The isolated browsing context that executes preview documents.
/// Implementations must deny same-origin privileges to the document.
pub trait SandboxHost {
    /// Replace whatever is mounted with `document`
    fn mount(&self, generation: u64, document: &str);

    /// Remove any mounted document
    fn clear(&self);
}
