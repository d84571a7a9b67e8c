//! WASM-target tests for playground-platform (Node.js runtime).
//!
//! Tests MemorySessionStore, the generator request/response helpers and
//! the timer adapter under wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! The iframe host and localStorage config need a browser DOM and are
//! exercised through the app instead.

use wasm_bindgen_test::*;

use playground_core::image::ImagePayload;
use playground_core::ports::*;
use playground_platform::generator::{create_generator, gemini, proxy};
use playground_platform::storage::MemorySessionStore;
use playground_platform::timer::BrowserTimer;
use playground_types::config::{GeneratorBackend, GeneratorConfig};
use playground_types::message::ChatTurn;
use playground_types::session::{SessionSnapshot, SourcePair};
use playground_types::PlaygroundError;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

// ─── MemorySessionStore Tests ────────────────────────────

#[wasm_bindgen_test]
fn memory_store_backend_name() {
    let store = MemorySessionStore::new();
    assert_eq!(store.backend_name(), "memory");
    assert!(store.is_empty());
}

#[wasm_bindgen_test]
async fn memory_store_load_missing() {
    let store = MemorySessionStore::new();
    assert!(store.load_session("nope").await.unwrap().is_none());
}

#[wasm_bindgen_test]
async fn memory_store_create_and_load() {
    let store = MemorySessionStore::new();
    let created = store.create_session().await.unwrap();
    assert_eq!(created.name, "Untitled Session");
    assert!(created.transcript.is_empty());

    let loaded = store.load_session(&created.id).await.unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(store.len(), 1);
}

#[wasm_bindgen_test]
async fn memory_store_save_overwrites() {
    let store = MemorySessionStore::new();
    let created = store.create_session().await.unwrap();
    let snapshot = SessionSnapshot {
        name: "Buttons".to_string(),
        transcript: vec![ChatTurn::user("a red button")],
        source: SourcePair::new("export default function B(){}", ".b{}"),
    };
    store.save_session(&created.id, &snapshot).await.unwrap();

    let loaded = store.load_session(&created.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "Buttons");
    assert_eq!(loaded.transcript.len(), 1);
    assert_eq!(loaded.source.style, ".b{}");
}

#[wasm_bindgen_test]
async fn memory_store_save_unknown_session() {
    let store = MemorySessionStore::new();
    let snapshot = SessionSnapshot {
        name: "x".to_string(),
        transcript: Vec::new(),
        source: SourcePair::default(),
    };
    let err = store.save_session("missing", &snapshot).await.unwrap_err();
    assert_eq!(err, PlaygroundError::SessionNotFound("missing".to_string()));
}

#[wasm_bindgen_test]
async fn memory_store_lists_all_sessions() {
    let store = MemorySessionStore::new();
    let a = store.create_session().await.unwrap();
    let b = store.create_session().await.unwrap();
    let ids: Vec<String> = store.list_sessions().await.unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&a.id) && ids.contains(&b.id));
}

// ─── Generator Tests ─────────────────────────────────────

#[wasm_bindgen_test]
fn proxy_request_body() {
    let image = ImagePayload::from_bytes("image/png", b"png");
    let req = GenerationRequest {
        prompt: "match this".to_string(),
        image: Some(image.clone()),
    };
    let body = proxy::request_body(&req);
    assert_eq!(body["prompt"], "match this");
    assert_eq!(body["image"], image.to_data_url());

    let text_only = proxy::request_body(&GenerationRequest {
        prompt: "hi".to_string(),
        image: None,
    });
    assert!(text_only["image"].is_null());
}

#[wasm_bindgen_test]
fn proxy_error_reason() {
    assert_eq!(proxy::error_reason(400, r#"{"message":"Prompt or image is required"}"#), "Prompt or image is required");
    assert_eq!(proxy::error_reason(500, r#"{"message":""}"#), "Request failed with status: 500");
    assert_eq!(proxy::error_reason(502, "Bad Gateway"), "Bad Gateway");
    assert_eq!(proxy::error_reason(504, ""), "Request failed with status: 504");
}

#[wasm_bindgen_test]
fn gemini_request_body_with_image() {
    let image = ImagePayload::from_bytes("image/webp", b"webp");
    let req = GenerationRequest {
        prompt: "make it dark".to_string(),
        image: Some(image.clone()),
    };
    let body = gemini::request_body(&req, 0.4);
    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[1]["text"], "Additional user instructions: \"make it dark\"");
    assert_eq!(parts[2]["inlineData"]["mimeType"], "image/webp");
    assert_eq!(parts[2]["inlineData"]["data"], image.data);
}

#[wasm_bindgen_test]
fn gemini_reply_text() {
    let data = json!({
        "candidates": [{
            "content": { "parts": [{ "text": "```json\n{\"jsx\":" }, { "text": "\"x\"}\n```" }] },
            "finishReason": "STOP"
        }]
    });
    assert_eq!(gemini::reply_text(&data).unwrap(), "```json\n{\"jsx\":\"x\"}\n```");

    let blocked = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
    let err = gemini::reply_text(&blocked).unwrap_err();
    assert!(err.to_string().contains("SAFETY"));

    assert!(gemini::reply_text(&json!({})).is_err());
}

#[wasm_bindgen_test]
fn gemini_requires_api_key() {
    let config = GeneratorConfig {
        backend: GeneratorBackend::Gemini,
        ..GeneratorConfig::default()
    };
    assert!(matches!(create_generator(&config), Err(PlaygroundError::Config(_))));

    let proxy = create_generator(&GeneratorConfig::default()).unwrap();
    assert_eq!(proxy.backend_name(), "proxy");
}

// ─── Timer Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
async fn browser_timer_fires_and_cancels() {
    let fired = Rc::new(Cell::new(0));

    let counter = fired.clone();
    let task = BrowserTimer.schedule(
        Duration::from_millis(5),
        Box::new(move || counter.set(counter.get() + 1)),
    );

    let counter = fired.clone();
    let cancelled = BrowserTimer.schedule(
        Duration::from_millis(5),
        Box::new(move || counter.set(counter.get() + 100)),
    );
    cancelled.cancel();

    gloo_timers::future::TimeoutFuture::new(30).await;
    assert_eq!(fired.get(), 1);
    drop(task);
}
