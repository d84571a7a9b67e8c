//! One open playground session: the state store with its dispatcher,
//! preview sandbox and autosaver wired together.

use std::rc::Rc;

use playground_types::{
    PlaygroundError, Result,
    config::PlaygroundConfig,
    event::SandboxMessage,
    message::ChatTurn,
    session::{SessionRecord, SourcePair},
};
use crate::autosave::AutoSaver;
use crate::dispatcher::{DispatchState, PromptDispatcher, PromptInput};
use crate::event_bus::EventBus;
use crate::ports::{GeneratorPort, SessionStorePort, TaskSpawner, TimerPort};
use crate::sandbox::{PreviewSandbox, PreviewState, SharedHost};
use crate::store::{SessionStateStore, StoreChange};

/// Platform adapters a session runs on
#[derive(Clone)]
pub struct PlaygroundServices {
    pub generator: Rc<dyn GeneratorPort>,
    pub storage: Rc<dyn SessionStorePort>,
    pub timer: Rc<dyn TimerPort>,
    pub spawner: Rc<dyn TaskSpawner>,
    /// One per page: every session mounts into the same frame
    pub sandbox_host: SharedHost,
}

#[derive(Clone)]
pub struct PlaygroundSession {
    store: SessionStateStore,
    dispatcher: PromptDispatcher,
    sandbox: PreviewSandbox,
    autosaver: AutoSaver,
    storage: Rc<dyn SessionStorePort>,
    spawner: Rc<dyn TaskSpawner>,
}

impl PlaygroundSession {
    pub fn new(services: &PlaygroundServices, config: &PlaygroundConfig, event_bus: EventBus) -> Self {
        let store = SessionStateStore::new(event_bus.clone());
        let sandbox = PreviewSandbox::new(
            services.sandbox_host.clone(),
            config.preview.clone(),
            event_bus.clone(),
        );

        let preview = sandbox.clone();
        store.subscribe(move |store, change| match change {
            StoreChange::Initialized | StoreChange::SourceReplaced => {
                preview.render(&store.source());
            }
            StoreChange::TranscriptAppended { .. } => {}
        });

        let autosaver = AutoSaver::attach(
            store.clone(),
            services.storage.clone(),
            services.timer.clone(),
            services.spawner.clone(),
            &config.autosave,
            event_bus.clone(),
        );
        let dispatcher = PromptDispatcher::new(store.clone(), services.generator.clone(), event_bus);

        Self {
            store,
            dispatcher,
            sandbox,
            autosaver,
            storage: services.storage.clone(),
            spawner: services.spawner.clone(),
        }
    }

    /// Initialize from an already loaded record.
    pub fn open(&self, record: SessionRecord) -> Result<()> {
        self.store.initialize(record)
    }

    /// Fetch a session from storage and initialize from it.
    pub async fn load(&self, id: &str) -> Result<()> {
        let record = self
            .storage
            .load_session(id)
            .await?
            .ok_or_else(|| PlaygroundError::SessionNotFound(id.to_string()))?;
        self.open(record)
    }

    /// Queue a prompt. Returns false if it was rejected.
    pub fn submit(&self, input: PromptInput) -> bool {
        match self.dispatcher.start(input) {
            Some(pending) => {
                self.spawner.spawn(Box::pin(async move {
                    pending.await;
                }));
                true
            }
            None => false,
        }
    }

    /// A direct edit from the code view.
    pub fn edit_source(&self, markup: impl Into<String>, style: impl Into<String>) {
        self.store.set_component_source(markup, style);
    }

    pub fn handle_sandbox_message(&self, message: &SandboxMessage) -> bool {
        self.sandbox.handle_message(message)
    }

    /// Tear the session down. A reply still in flight is discarded.
    pub fn close(&self) {
        self.autosaver.shutdown();
        self.store.close();
        self.sandbox.reset();
        log::info!("Session closed");
    }

    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.store.transcript()
    }

    pub fn source(&self) -> SourcePair {
        self.store.source()
    }

    pub fn session_id(&self) -> Option<String> {
        self.store.session_id()
    }

    pub fn session_name(&self) -> Option<String> {
        self.store.session_name()
    }

    pub fn is_sending(&self) -> bool {
        self.dispatcher.is_sending()
    }

    pub fn dispatch_state(&self) -> DispatchState {
        self.dispatcher.state()
    }

    pub fn preview_state(&self) -> PreviewState {
        self.sandbox.state()
    }

    pub fn store(&self) -> &SessionStateStore {
        &self.store
    }

    pub fn autosaver(&self) -> &AutoSaver {
        &self.autosaver
    }
}
