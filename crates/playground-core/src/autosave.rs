//! Auto-persistence: debounced background writes of the open session.
//!
//! Every transcript or source mutation (re)starts a quiescence timer. When
//! it fires, the then-current snapshot is written through the storage
//! port. At most one write is in flight; a timer that fires during a write
//! queues exactly one follow-up.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use playground_types::{config::AutosaveConfig, event::PlaygroundEvent};
use crate::event_bus::EventBus;
use crate::ports::{ScheduledTask, SessionStorePort, TaskSpawner, TimerPort};
use crate::store::{SessionStateStore, StoreChange};

struct AutoSaverInner {
    store: SessionStateStore,
    storage: Rc<dyn SessionStorePort>,
    timer: Rc<dyn TimerPort>,
    spawner: Rc<dyn TaskSpawner>,
    event_bus: EventBus,
    delay: Duration,
    pending: RefCell<Option<ScheduledTask>>,
    writing: Cell<bool>,
    follow_up: Cell<bool>,
    shut_down: Cell<bool>,
    writes: Cell<u64>,
}

/// Shared autosaver: clone-cheap via Rc.
#[derive(Clone)]
pub struct AutoSaver {
    inner: Rc<AutoSaverInner>,
}

impl AutoSaver {
    /// Create an autosaver and subscribe it to `store`.
    pub fn attach(
        store: SessionStateStore,
        storage: Rc<dyn SessionStorePort>,
        timer: Rc<dyn TimerPort>,
        spawner: Rc<dyn TaskSpawner>,
        config: &AutosaveConfig,
        event_bus: EventBus,
    ) -> Self {
        let saver = Self {
            inner: Rc::new(AutoSaverInner {
                store: store.clone(),
                storage,
                timer,
                spawner,
                event_bus,
                delay: Duration::from_millis(u64::from(config.delay_ms)),
                pending: RefCell::new(None),
                writing: Cell::new(false),
                follow_up: Cell::new(false),
                shut_down: Cell::new(false),
                writes: Cell::new(0),
            }),
        };

        let weak = Rc::downgrade(&saver.inner);
        store.subscribe(move |_, change| {
            if let Some(saver) = Self::upgrade(&weak) {
                saver.on_change(change);
            }
        });
        saver
    }

    fn upgrade(weak: &Weak<AutoSaverInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// A write is scheduled but its timer has not fired yet
    pub fn is_pending(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    pub fn is_writing(&self) -> bool {
        self.inner.writing.get()
    }

    /// Number of writes that completed successfully
    pub fn completed_writes(&self) -> u64 {
        self.inner.writes.get()
    }

    /// Cancel the pending timer and suppress any follow-up write.
    pub fn shutdown(&self) {
        self.inner.shut_down.set(true);
        self.inner.follow_up.set(false);
        let pending = self.inner.pending.borrow_mut().take();
        if let Some(task) = pending {
            log::debug!("Autosave cancelled by shutdown");
            task.cancel();
        }
    }

    fn on_change(&self, change: &StoreChange) {
        match change {
            // Loading a session is not a change worth writing back.
            StoreChange::Initialized => {}
            StoreChange::TranscriptAppended { .. } | StoreChange::SourceReplaced => {
                self.schedule()
            }
        }
    }

    fn schedule(&self) {
        if self.inner.shut_down.get() || !self.inner.store.is_initialized() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let task = self.inner.timer.schedule(
            self.inner.delay,
            Box::new(move || {
                if let Some(saver) = Self::upgrade(&weak) {
                    saver.fire();
                }
            }),
        );
        // Replacing the previous task cancels it.
        let previous = self.inner.pending.borrow_mut().replace(task);
        drop(previous);
    }

    fn fire(&self) {
        let fired = self.inner.pending.borrow_mut().take();
        drop(fired);
        if self.inner.shut_down.get() {
            return;
        }
        if self.inner.writing.get() {
            log::debug!("Autosave due while a write is in flight; queueing a follow-up");
            self.inner.follow_up.set(true);
            return;
        }
        self.write_now();
    }

    fn write_now(&self) {
        let (Some(id), Some(snapshot)) = (self.inner.store.session_id(), self.inner.store.snapshot())
        else {
            return;
        };
        self.inner.writing.set(true);

        let saver = self.clone();
        self.inner.spawner.spawn(Box::pin(async move {
            match saver.inner.storage.save_session(&id, &snapshot).await {
                Ok(()) => {
                    log::debug!("Session {} saved", id);
                    saver.inner.writes.set(saver.inner.writes.get() + 1);
                    saver.inner.event_bus.emit(PlaygroundEvent::Saved);
                }
                Err(e) => {
                    log::error!("Failed to save session {}: {}", id, e);
                }
            }
            saver.inner.writing.set(false);
            if saver.inner.follow_up.replace(false) && !saver.inner.shut_down.get() {
                saver.write_now();
            }
        }));
    }
}
