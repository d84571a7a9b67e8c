//! Playground configuration persisted in browser `localStorage`.

use playground_types::{PlaygroundError, Result, config::PlaygroundConfig};
use web_sys::Storage;

pub const CONFIG_KEY: &str = "playground:config";

fn local_storage() -> Result<Storage> {
    gloo_utils::window()
        .local_storage()
        .map_err(|e| PlaygroundError::JsInterop(format!("{:?}", e)))?
        .ok_or_else(|| PlaygroundError::Config("localStorage is unavailable".to_string()))
}

/// Saved config, or the defaults when nothing usable is stored.
pub fn load_config() -> PlaygroundConfig {
    let stored = local_storage().and_then(|storage| {
        storage
            .get_item(CONFIG_KEY)
            .map_err(|e| PlaygroundError::JsInterop(format!("{:?}", e)))
    });
    match stored {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring unreadable saved config: {}", e);
                PlaygroundConfig::default()
            }
        },
        Ok(None) => PlaygroundConfig::default(),
        Err(e) => {
            log::warn!("Could not read saved config: {}", e);
            PlaygroundConfig::default()
        }
    }
}

pub fn save_config(config: &PlaygroundConfig) -> Result<()> {
    let json = serde_json::to_string(config)?;
    local_storage()?
        .set_item(CONFIG_KEY, &json)
        .map_err(|e| PlaygroundError::JsInterop(format!("{:?}", e)))
}
