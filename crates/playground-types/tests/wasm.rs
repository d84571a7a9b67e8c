//! WASM-target tests for playground-types.
//!
//! Mirrors a subset of the native unit tests under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use playground_types::message::*;
use playground_types::event::*;
use playground_types::config::*;
use playground_types::session::*;

#[wasm_bindgen_test]
fn chat_turn_roles() {
    assert_eq!(ChatTurn::user("a").role, Role::User);
    assert_eq!(ChatTurn::assistant("b").role, Role::Assistant);
}

#[wasm_bindgen_test]
fn session_record_new_has_timestamps() {
    // chrono::Utc::now() goes through js-sys Date on wasm
    let record = SessionRecord::new("w1".to_string());
    assert!(!record.created_at.is_empty());
    assert!(record.source.is_empty());
}

#[wasm_bindgen_test]
fn session_record_from_api_json() {
    let json = r#"{"id":"a","name":"n","chatHistory":[],"jsxCode":"x","cssCode":null}"#;
    let record: SessionRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.source.markup, "x");
    assert_eq!(record.source.style, "");
}

#[wasm_bindgen_test]
fn sandbox_message_parse() {
    let json = r#"{"source":"playground-preview","generation":2,"kind":"runtime_error","message":"x is not defined"}"#;
    let msg: SandboxMessage = serde_json::from_str(json).unwrap();
    assert!(msg.is_preview_message());
    assert!(matches!(msg.report, SandboxReport::RuntimeError { .. }));
}

#[wasm_bindgen_test]
fn default_config_roundtrip() {
    let config = PlaygroundConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: PlaygroundConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
