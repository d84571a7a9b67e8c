//! Session storage adapters behind `SessionStorePort`.

pub mod memory;
pub mod http;

use std::rc::Rc;
use playground_core::ports::SessionStorePort;
use playground_types::config::{StorageBackendType, StorageConfig};

pub use memory::MemorySessionStore;
pub use http::HttpSessionStore;

/// Open the storage backend named in the config.
/// Returns a trait object so callers are backend-agnostic.
pub fn create_session_store(config: &StorageConfig) -> Rc<dyn SessionStorePort> {
    let store: Rc<dyn SessionStorePort> = match config.backend {
        StorageBackendType::Http => Rc::new(HttpSessionStore::new(&config.api_base)),
        StorageBackendType::Memory => Rc::new(MemorySessionStore::new()),
    };
    log::info!("Storage backend: {}", store.backend_name());
    store
}
