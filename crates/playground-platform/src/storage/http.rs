//! Session API client.
//!
//! `GET/POST {base}` lists and creates sessions,
//! `GET/PUT {base}/{id}` loads and saves one. Uses browser `fetch()`
//! via gloo-net, so requests carry the page's cookies.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use playground_core::ports::SessionStorePort;
use playground_types::{
    PlaygroundError, Result,
    session::{SessionRecord, SessionSnapshot, SessionSummary},
};

pub struct HttpSessionStore {
    base: String,
}

impl HttpSessionStore {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn session_url(&self, id: &str) -> String {
        let id: String = js_sys::encode_uri_component(id).into();
        format!("{}/{}", self.base, id)
    }
}

#[async_trait(?Send)]
impl SessionStorePort for HttpSessionStore {
    async fn load_session(&self, id: &str) -> Result<Option<SessionRecord>> {
        let response = Request::get(&self.session_url(id))
            .send()
            .await
            .map_err(|e| PlaygroundError::Network(e.to_string()))?;
        if response.status() == 404 {
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }

    async fn save_session(&self, id: &str, snapshot: &SessionSnapshot) -> Result<()> {
        let response = Request::put(&self.session_url(id))
            .header("Content-Type", "application/json")
            .json(snapshot)
            .map_err(|e| PlaygroundError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(|e| PlaygroundError::Network(e.to_string()))?;
        match response.status() {
            404 => Err(PlaygroundError::SessionNotFound(id.to_string())),
            _ if response.ok() => Ok(()),
            status => Err(PlaygroundError::Storage(format!(
                "Failed to save session. Status: {}",
                status
            ))),
        }
    }

    async fn create_session(&self) -> Result<SessionRecord> {
        let response = Request::post(&self.base)
            .send()
            .await
            .map_err(|e| PlaygroundError::Network(e.to_string()))?;
        read_json(response).await
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let response = Request::get(&self.base)
            .send()
            .await
            .map_err(|e| PlaygroundError::Network(e.to_string()))?;
        let mut summaries: Vec<SessionSummary> = read_json(response).await?;
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    fn backend_name(&self) -> &str {
        "http"
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    if !response.ok() {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(PlaygroundError::Storage(format!("HTTP {}: {}", status, text)));
    }
    response
        .json()
        .await
        .map_err(|e| PlaygroundError::Serialization(e.to_string()))
}
