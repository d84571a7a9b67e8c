//! Session state store: the single mutable holder for one open session.
//!
//! Mutations go through `append_chat_turn` and `set_component_source`;
//! the preview sandbox and the autosaver observe them via `subscribe`.

use std::cell::RefCell;
use std::rc::Rc;

use playground_types::{
    PlaygroundError, Result,
    event::PlaygroundEvent,
    message::ChatTurn,
    session::{SessionRecord, SessionSnapshot, SourcePair},
};
use crate::event_bus::EventBus;

/// What a mutation changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// State was replaced by a loaded session
    Initialized,
    TranscriptAppended { len: usize },
    SourceReplaced,
}

type Listener = Rc<dyn Fn(&SessionStateStore, &StoreChange)>;

struct SessionMeta {
    id: String,
    name: String,
}

#[derive(Default)]
struct StoreInner {
    session: Option<SessionMeta>,
    transcript: Vec<ChatTurn>,
    source: SourcePair,
    closed: bool,
}

/// Shared state store: clone-cheap via Rc.
#[derive(Clone)]
pub struct SessionStateStore {
    inner: Rc<RefCell<StoreInner>>,
    listeners: Rc<RefCell<Vec<Listener>>>,
    event_bus: EventBus,
}

impl SessionStateStore {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner::default())),
            listeners: Rc::new(RefCell::new(Vec::new())),
            event_bus,
        }
    }

    /// Load a persisted session. Allowed once per store.
    pub fn initialize(&self, record: SessionRecord) -> Result<()> {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.closed {
                return Err(PlaygroundError::SessionClosed);
            }
            if inner.session.is_some() {
                return Err(PlaygroundError::AlreadyInitialized);
            }
            inner.session = Some(SessionMeta {
                id: record.id.clone(),
                name: record.name,
            });
            inner.transcript = record.transcript;
            inner.source = record.source;
        }
        log::info!("Session {} loaded", record.id);
        self.event_bus.emit(PlaygroundEvent::SessionOpened {
            session_id: record.id,
        });
        self.notify(StoreChange::Initialized);
        Ok(())
    }

    pub fn append_chat_turn(&self, turn: ChatTurn) {
        let len = {
            let mut inner = self.inner.borrow_mut();
            if inner.closed {
                log::warn!("Ignoring chat turn for a closed session");
                return;
            }
            inner.transcript.push(turn);
            inner.transcript.len()
        };
        self.event_bus.emit(PlaygroundEvent::TurnAppended { index: len - 1 });
        self.notify(StoreChange::TranscriptAppended { len });
    }

    /// Replace markup and style together.
    pub fn set_component_source(&self, markup: impl Into<String>, style: impl Into<String>) {
        let source = SourcePair::new(markup, style);
        {
            let mut inner = self.inner.borrow_mut();
            if inner.closed {
                log::warn!("Ignoring source update for a closed session");
                return;
            }
            inner.source = source;
        }
        self.event_bus.emit(PlaygroundEvent::SourceReplaced);
        self.notify(StoreChange::SourceReplaced);
    }

    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.inner.borrow().transcript.clone()
    }

    pub fn transcript_len(&self) -> usize {
        self.inner.borrow().transcript.len()
    }

    pub fn source(&self) -> SourcePair {
        self.inner.borrow().source.clone()
    }

    pub fn session_id(&self) -> Option<String> {
        self.inner.borrow().session.as_ref().map(|s| s.id.clone())
    }

    pub fn session_name(&self) -> Option<String> {
        self.inner.borrow().session.as_ref().map(|s| s.name.clone())
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.borrow().session.is_some()
    }

    pub fn is_open(&self) -> bool {
        !self.inner.borrow().closed
    }

    /// Everything a session write carries, or `None` before initialization.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let inner = self.inner.borrow();
        inner.session.as_ref().map(|meta| SessionSnapshot {
            name: meta.name.clone(),
            transcript: inner.transcript.clone(),
            source: inner.source.clone(),
        })
    }

    /// Register an observer called after every mutation.
    /// The store is passed back in so observers need not own a handle.
    pub fn subscribe(&self, listener: impl Fn(&SessionStateStore, &StoreChange) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Tear the store down. Later mutations are ignored.
    pub fn close(&self) {
        let was_open = {
            let mut inner = self.inner.borrow_mut();
            !std::mem::replace(&mut inner.closed, true)
        };
        self.listeners.borrow_mut().clear();
        if was_open {
            self.event_bus.emit(PlaygroundEvent::SessionClosed);
        }
    }

    fn notify(&self, change: StoreChange) {
        // Listeners may read the store or subscribe, so call them on a copy.
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(self, &change);
        }
    }
}
