#[cfg(test)]
mod tests {
    use crate::message::*;
    use crate::event::*;
    use crate::config::*;
    use crate::session::*;
    use crate::error::*;

    // ─── ChatTurn Tests ──────────────────────────────────────

    #[test]
    fn test_chat_turn_user() {
        let turn = ChatTurn::user("a red button");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "a red button");
        assert!(turn.is_user());
    }

    #[test]
    fn test_chat_turn_assistant() {
        let turn = ChatTurn::assistant("Here is the component you requested.");
        assert_eq!(turn.role, Role::Assistant);
        assert!(!turn.is_user());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), r#""assistant""#);
    }

    #[test]
    fn test_role_rejects_unknown() {
        let result = serde_json::from_str::<Role>(r#""system""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_chat_turn_wire_format() {
        let json = serde_json::to_string(&ChatTurn::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }

    // ─── SourcePair Tests ────────────────────────────────────

    #[test]
    fn test_source_pair_is_empty() {
        assert!(SourcePair::default().is_empty());
        assert!(SourcePair::new("   \n", ".a{}").is_empty());
        assert!(!SourcePair::new("export default function C(){}", "").is_empty());
    }

    #[test]
    fn test_source_pair_wire_names() {
        let json = serde_json::to_value(SourcePair::new("jsx", "css")).unwrap();
        assert_eq!(json["jsxCode"], "jsx");
        assert_eq!(json["cssCode"], "css");
    }

    // ─── Session Tests ───────────────────────────────────────

    #[test]
    fn test_session_record_new() {
        let session = SessionRecord::new("s1".to_string());
        assert_eq!(session.id, "s1");
        assert!(session.transcript.is_empty());
        assert!(session.source.is_empty());
        assert!(!session.created_at.is_empty());
        assert_eq!(session.created_at, session.updated_at);
    }

    #[test]
    fn test_session_record_from_api_json() {
        let json = r#"{
            "id": "abc",
            "name": "Buttons",
            "userId": "u1",
            "chatHistory": [{"role": "user", "content": "a red button"}],
            "jsxCode": "export default function C(){ return <b/> }",
            "cssCode": null,
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-02T00:00:00Z"
        }"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.transcript.len(), 1);
        assert_eq!(record.transcript[0].role, Role::User);
        assert!(record.source.markup.starts_with("export default"));
        assert_eq!(record.source.style, "");
        assert_eq!(record.updated_at, "2026-01-02T00:00:00Z");
    }

    #[test]
    fn test_session_record_null_history() {
        let json = r#"{"id": "x", "name": "n", "chatHistory": null, "jsxCode": null}"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert!(record.transcript.is_empty());
        assert!(record.source.is_empty());
        assert!(record.created_at.is_empty());
    }

    #[test]
    fn test_session_snapshot_wire_format() {
        let snapshot = SessionSnapshot {
            name: "Buttons".to_string(),
            transcript: vec![ChatTurn::user("hi")],
            source: SourcePair::new("jsx", "css"),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["name"], "Buttons");
        assert_eq!(json["chatHistory"][0]["content"], "hi");
        assert_eq!(json["jsxCode"], "jsx");
        assert_eq!(json["cssCode"], "css");
    }

    #[test]
    fn test_session_apply_snapshot() {
        let mut record = SessionRecord::new("s1".to_string());
        record.updated_at = "2000-01-01T00:00:00Z".to_string();
        let snapshot = SessionSnapshot {
            name: "Renamed".to_string(),
            transcript: vec![ChatTurn::user("a"), ChatTurn::assistant("b")],
            source: SourcePair::new("m", "s"),
        };
        record.apply_snapshot(&snapshot);
        assert_eq!(record.name, "Renamed");
        assert_eq!(record.transcript.len(), 2);
        assert_eq!(record.source.markup, "m");
        assert_ne!(record.updated_at, "2000-01-01T00:00:00Z");
    }

    #[test]
    fn test_session_summary() {
        let record = SessionRecord::new("s9".to_string());
        let summary = record.summary();
        assert_eq!(summary.id, "s9");
        assert_eq!(summary.name, record.name);
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("updatedAt").is_some());
    }

    // ─── Event Tests ─────────────────────────────────────────

    #[test]
    fn test_sandbox_message_rendered() {
        let json = r#"{"source":"playground-preview","generation":3,"kind":"rendered"}"#;
        let msg: SandboxMessage = serde_json::from_str(json).unwrap();
        assert!(msg.is_preview_message());
        assert_eq!(msg.generation, 3);
        assert_eq!(msg.report, SandboxReport::Rendered);
    }

    #[test]
    fn test_sandbox_message_runtime_error() {
        let json = r#"{"source":"playground-preview","generation":7,"kind":"runtime_error","message":"boom"}"#;
        let msg: SandboxMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg.report,
            SandboxReport::RuntimeError { message: "boom".to_string() }
        );
    }

    #[test]
    fn test_sandbox_message_foreign_source() {
        let json = r#"{"source":"devtools","generation":1,"kind":"rendered"}"#;
        let msg: SandboxMessage = serde_json::from_str(json).unwrap();
        assert!(!msg.is_preview_message());
    }

    #[test]
    fn test_playground_event_serialization() {
        let event = PlaygroundEvent::DispatchFinished { success: false };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("DispatchFinished"));
        assert!(json.contains("false"));
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_default_config() {
        let config = PlaygroundConfig::default();
        assert_eq!(config.generator.backend, GeneratorBackend::Proxy);
        assert_eq!(config.generator.endpoint, "/api/ai/generate");
        assert_eq!(config.generator.model, "gemini-1.5-flash-latest");
        assert!(config.generator.api_key.is_empty());
        assert_eq!(config.storage.backend, StorageBackendType::Http);
        assert_eq!(config.storage.api_base, "/api/sessions");
        assert_eq!(config.autosave.delay_ms, 1000);
        assert!(config.preview.react_url.contains("react@18"));
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config: PlaygroundConfig =
            serde_json::from_str(r#"{"autosave": {"delay_ms": 250}}"#).unwrap();
        assert_eq!(config.autosave.delay_ms, 250);
        assert_eq!(config.generator, GeneratorConfig::default());
    }

    #[test]
    fn test_generator_base_url() {
        let mut config = GeneratorConfig::default();
        config.backend = GeneratorBackend::Gemini;
        assert_eq!(config.base_url(), "https://generativelanguage.googleapis.com");
        config.api_base = Some("http://localhost:9000".to_string());
        assert_eq!(config.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_generator_backend_labels() {
        assert_eq!(GeneratorBackend::all().len(), 2);
        assert_eq!(GeneratorBackend::Proxy.label(), "Server proxy");
        assert_eq!(GeneratorBackend::Gemini.label(), "Gemini (direct)");
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_error_display() {
        let err = PlaygroundError::Generation("quota exceeded".to_string());
        assert_eq!(err.to_string(), "Generation error: quota exceeded");

        let err = PlaygroundError::AlreadyInitialized;
        assert_eq!(err.to_string(), "Session state is already initialized");

        let err = PlaygroundError::SessionNotFound("s1".to_string());
        assert_eq!(err.to_string(), "Session not found: s1");

        let err = PlaygroundError::Other("plain".to_string());
        assert_eq!(err.to_string(), "plain");
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{{invalid}}").unwrap_err();
        let err: PlaygroundError = serde_err.into();
        assert!(matches!(err, PlaygroundError::Serialization(_)));
    }
}
