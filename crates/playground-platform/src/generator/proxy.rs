//! Server-side generation proxy.
//!
//! The proxy holds the model credentials; the browser only posts the
//! prompt and optional image and gets back `{"jsx", "css"}`.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::json;

use playground_core::generation::parse_component_json;
use playground_core::ports::{GenerationRequest, GeneratorPort};
use playground_types::{PlaygroundError, Result, session::SourcePair};

pub struct ProxyGenerator {
    endpoint: String,
}

impl ProxyGenerator {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl GeneratorPort for ProxyGenerator {
    async fn generate(&self, req: &GenerationRequest) -> Result<SourcePair> {
        let body = request_body(req);

        let response = Request::post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .map_err(|e| PlaygroundError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| PlaygroundError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PlaygroundError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(PlaygroundError::Generation(error_reason(status, &text)));
        }
        parse_component_json(&text)
    }

    fn backend_name(&self) -> &str {
        "proxy"
    }
}

pub fn request_body(req: &GenerationRequest) -> serde_json::Value {
    json!({
        "prompt": req.prompt,
        "image": req.image.as_ref().map(|image| image.to_data_url()),
    })
}

/// Human-readable reason for a failed proxy call: the `message` field of
/// a JSON error body, else the raw body, else the status code.
pub fn error_reason(status: u16, body: &str) -> String {
    let fallback = format!("Request failed with status: {}", status);
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
            .unwrap_or(fallback),
        Err(_) if body.trim().is_empty() => fallback,
        Err(_) => body.trim().to_string(),
    }
}
