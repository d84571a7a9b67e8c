//! In-memory session store.
//! Not persistent across page reloads; used offline and in tests.

use std::cell::RefCell;
use std::collections::HashMap;
use async_trait::async_trait;
use playground_core::ports::SessionStorePort;
use playground_types::{
    PlaygroundError, Result,
    session::{SessionRecord, SessionSnapshot, SessionSummary},
};

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RefCell<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.borrow().is_empty()
    }
}

#[async_trait(?Send)]
impl SessionStorePort for MemorySessionStore {
    async fn load_session(&self, id: &str) -> Result<Option<SessionRecord>> {
        Ok(self.sessions.borrow().get(id).cloned())
    }

    async fn save_session(&self, id: &str, snapshot: &SessionSnapshot) -> Result<()> {
        let mut sessions = self.sessions.borrow_mut();
        let record = sessions
            .get_mut(id)
            .ok_or_else(|| PlaygroundError::SessionNotFound(id.to_string()))?;
        record.apply_snapshot(snapshot);
        Ok(())
    }

    async fn create_session(&self) -> Result<SessionRecord> {
        let record = SessionRecord::new(uuid::Uuid::new_v4().to_string());
        self.sessions
            .borrow_mut()
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let mut summaries: Vec<SessionSummary> =
            self.sessions.borrow().values().map(|r| r.summary()).collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
