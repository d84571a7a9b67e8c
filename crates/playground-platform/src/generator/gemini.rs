//! Direct Gemini adapter.
//!
//! Calls the `generateContent` REST endpoint from the browser with a
//! user-supplied API key. Uses browser `fetch()` via gloo-net.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::{json, Value};

use playground_core::generation::{parse_component_json, prompt_parts};
use playground_core::ports::{GenerationRequest, GeneratorPort};
use playground_types::{
    PlaygroundError, Result,
    config::GeneratorConfig,
    session::SourcePair,
};

pub struct GeminiGenerator {
    config: GeneratorConfig,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(PlaygroundError::Config(
                "A Gemini API key is required for the direct backend".to_string(),
            ));
        }
        let base_url = config.base_url().trim_end_matches('/').to_string();
        Ok(Self { config, base_url })
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.config.model)
    }
}

#[async_trait(?Send)]
impl GeneratorPort for GeminiGenerator {
    async fn generate(&self, req: &GenerationRequest) -> Result<SourcePair> {
        let body = request_body(req, self.config.temperature);

        let response = Request::post(&self.url())
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .map_err(|e| PlaygroundError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| PlaygroundError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(PlaygroundError::Generation(api_error(status, &text)));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| PlaygroundError::Generation(e.to_string()))?;
        parse_component_json(&reply_text(&data)?)
    }

    fn backend_name(&self) -> &str {
        "gemini"
    }
}

/// `generateContent` body: the text parts, then the image if any.
pub fn request_body(req: &GenerationRequest, temperature: f32) -> Value {
    let mut parts: Vec<Value> = prompt_parts(req)
        .into_iter()
        .map(|text| json!({ "text": text }))
        .collect();
    if let Some(image) = &req.image {
        parts.push(json!({
            "inlineData": {
                "mimeType": image.media_type,
                "data": image.data,
            }
        }));
    }

    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": { "temperature": temperature },
    })
}

// ─── API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
}

#[derive(Deserialize)]
struct ApiCandidate {
    content: Option<ApiContent>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Deserialize)]
struct ApiPart {
    #[serde(default)]
    text: Option<String>,
}

/// Concatenated text of the first candidate.
pub fn reply_text(data: &Value) -> Result<String> {
    let response: ApiResponse = serde_json::from_value(data.clone())
        .map_err(|e| PlaygroundError::Generation(e.to_string()))?;
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| PlaygroundError::Generation("No candidates in response".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default();
    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(PlaygroundError::Generation(format!(
            "The AI returned no text (finish reason: {})",
            reason
        )));
    }
    Ok(text)
}

fn api_error(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string));
    match message {
        Some(message) => format!("HTTP {}: {}", status, message),
        None => format!("HTTP {}: {}", status, body),
    }
}
