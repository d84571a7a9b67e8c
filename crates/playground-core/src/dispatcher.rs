//! Prompt dispatcher: sends one prompt at a time to the generator and
//! folds the result back into the session state store.
//!
//! Lifecycle per prompt: Idle → Sending → Succeeded | Failed.
//! The user turn is appended before the request goes out; the assistant
//! turn and the new source are applied, in that order, when it returns.

use std::cell::RefCell;
use std::rc::Rc;
use futures::future::LocalBoxFuture;

use playground_types::{
    Result,
    event::PlaygroundEvent,
    message::ChatTurn,
    session::SourcePair,
};
use crate::event_bus::EventBus;
use crate::image::ImagePayload;
use crate::ports::{GenerationRequest, GeneratorPort};
use crate::store::SessionStateStore;

/// Assistant reply appended when a component was generated
pub const ACKNOWLEDGEMENT: &str = "Here is the component you requested.";

/// Prefix of the assistant reply appended when generation failed
pub const ERROR_PREFIX: &str = "Sorry, an error occurred: ";

/// User turn text for a prompt that is only an image
pub const IMAGE_ONLY_PROMPT: &str = "Analyze this image and create a component.";

/// A prompt as entered in the chat panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptInput {
    pub text: String,
    /// Image as a `data:` URL
    pub image: Option<String>,
}

impl PromptInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, data_url: impl Into<String>) -> Self {
        self.image = Some(data_url.into());
        self
    }

    fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && !self.has_image()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Sending,
    Succeeded,
    Failed(String),
}

/// Result of one `submit` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing happened: a prompt was already in flight, or the input was blank
    Rejected,
    Succeeded,
    Failed(String),
    /// The session closed before the generator answered
    Dropped,
}

/// Shared dispatcher: clone-cheap via Rc.
#[derive(Clone)]
pub struct PromptDispatcher {
    store: SessionStateStore,
    generator: Rc<dyn GeneratorPort>,
    event_bus: EventBus,
    state: Rc<RefCell<DispatchState>>,
}

impl PromptDispatcher {
    pub fn new(store: SessionStateStore, generator: Rc<dyn GeneratorPort>, event_bus: EventBus) -> Self {
        Self {
            store,
            generator,
            event_bus,
            state: Rc::new(RefCell::new(DispatchState::Idle)),
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state.borrow().clone()
    }

    pub fn is_sending(&self) -> bool {
        *self.state.borrow() == DispatchState::Sending
    }

    /// Whether `input` would be accepted right now
    pub fn can_submit(&self, input: &PromptInput) -> bool {
        !self.is_sending() && !input.is_blank() && self.store.is_open()
    }

    /// Send a prompt and apply the result.
    pub async fn submit(&self, input: PromptInput) -> DispatchOutcome {
        match self.start(input) {
            Some(pending) => pending.await,
            None => DispatchOutcome::Rejected,
        }
    }

    /// Synchronous half of `submit`: accept the prompt, mark the dispatcher
    /// as sending and append the user turn. The returned future performs
    /// the request and must be driven via `TaskSpawner`.
    ///
    /// Returns `None` when the prompt is rejected; nothing is changed then.
    pub fn start(&self, input: PromptInput) -> Option<LocalBoxFuture<'static, DispatchOutcome>> {
        if self.is_sending() {
            log::warn!("Prompt rejected: another prompt is still being generated");
            return None;
        }
        if input.is_blank() || !self.store.is_open() {
            return None;
        }

        *self.state.borrow_mut() = DispatchState::Sending;
        self.event_bus.emit(PlaygroundEvent::DispatchStarted);

        let content = if input.text.trim().is_empty() {
            IMAGE_ONLY_PROMPT.to_string()
        } else {
            input.text.clone()
        };
        self.store.append_chat_turn(ChatTurn::user(content));

        let this = self.clone();
        Some(Box::pin(async move { this.finish(input).await }))
    }

    async fn finish(&self, input: PromptInput) -> DispatchOutcome {
        log::debug!(
            "Dispatching prompt to {} (image: {})",
            self.generator.backend_name(),
            input.has_image()
        );
        let result = self.request(&input).await;

        if !self.store.is_open() {
            log::debug!("Session closed while generating; dropping the result");
            *self.state.borrow_mut() = DispatchState::Idle;
            return DispatchOutcome::Dropped;
        }

        match result {
            Ok(source) => {
                self.store.append_chat_turn(ChatTurn::assistant(ACKNOWLEDGEMENT));
                self.store.set_component_source(source.markup, source.style);
                *self.state.borrow_mut() = DispatchState::Succeeded;
                self.event_bus.emit(PlaygroundEvent::DispatchFinished { success: true });
                DispatchOutcome::Succeeded
            }
            Err(e) => {
                let reason = e.to_string();
                log::error!("Component generation failed: {}", reason);
                self.store
                    .append_chat_turn(ChatTurn::assistant(format!("{}{}", ERROR_PREFIX, reason)));
                *self.state.borrow_mut() = DispatchState::Failed(reason.clone());
                self.event_bus.emit(PlaygroundEvent::DispatchFinished { success: false });
                DispatchOutcome::Failed(reason)
            }
        }
    }

    async fn request(&self, input: &PromptInput) -> Result<SourcePair> {
        let image = match input.image.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(data_url) => Some(ImagePayload::parse(data_url)?),
            None => None,
        };
        let req = GenerationRequest {
            prompt: input.text.trim().to_string(),
            image,
        };
        self.generator.generate(&req).await
    }
}
