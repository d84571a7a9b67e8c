pub mod generator;
pub mod storage;
pub mod timer;
pub mod sandbox_host;
pub mod config_store;

use std::rc::Rc;
use playground_core::PlaygroundServices;
use playground_core::sandbox::SharedHost;
use playground_types::{Result, config::PlaygroundConfig};

/// Build every browser adapter a playground session needs.
pub fn browser_services(
    config: &PlaygroundConfig,
    sandbox_host: SharedHost,
) -> Result<PlaygroundServices> {
    Ok(PlaygroundServices {
        generator: generator::create_generator(&config.generator)?,
        storage: storage::create_session_store(&config.storage),
        timer: Rc::new(timer::BrowserTimer),
        spawner: Rc::new(timer::BrowserSpawner),
        sandbox_host,
    })
}
