//! WASM-target tests for playground-core.
//!
//! Runs the transform, sandbox documents, state store and dispatcher
//! under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use playground_core::dispatcher::*;
use playground_core::event_bus::EventBus;
use playground_core::generation::parse_component_json;
use playground_core::ports::*;
use playground_core::sandbox::{PreviewSandbox, PreviewState, SharedHost};
use playground_core::store::SessionStateStore;
use playground_core::transform::transform;
use playground_types::config::PreviewConfig;
use playground_types::message::ChatTurn;
use playground_types::session::{SessionRecord, SourcePair};
use playground_types::{PlaygroundError, Result};

use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;

// ─── Transform Tests ─────────────────────────────────────

#[wasm_bindgen_test]
fn transform_rewrites_jsx() {
    let module = transform("export default function C() { return <b>hi</b>; }", "").unwrap();
    assert!(module.code.contains("React.createElement(\"b\", null, \"hi\")"));
}

#[wasm_bindgen_test]
fn transform_reports_position() {
    let err = transform("x = 1;\ny = <p>", "").unwrap_err();
    assert_eq!(err.line, 2);
}

// ─── Sandbox Tests ───────────────────────────────────────

#[derive(Default)]
struct CountingHost {
    mounts: RefCell<usize>,
}

impl SandboxHost for CountingHost {
    fn mount(&self, _generation: u64, _document: &str) {
        *self.mounts.borrow_mut() += 1;
    }

    fn clear(&self) {}
}

#[wasm_bindgen_test]
fn sandbox_renders_once_per_pair() {
    let host = Rc::new(CountingHost::default());
    let sandbox = PreviewSandbox::new(
        SharedHost::new(host.clone()),
        PreviewConfig::default(),
        EventBus::new(),
    );
    let pair = SourcePair::new("export default function C() { return null; }", "");
    sandbox.render(&pair);
    sandbox.render(&pair);
    assert_eq!(*host.mounts.borrow(), 1);
    assert_eq!(sandbox.state(), PreviewState::Loading { generation: 1 });
}

#[wasm_bindgen_test]
fn sandbox_generations_continue_across_sessions() {
    let shared = SharedHost::new(Rc::new(CountingHost::default()));
    let first = PreviewSandbox::new(shared.clone(), PreviewConfig::default(), EventBus::new());
    let second = PreviewSandbox::new(shared, PreviewConfig::default(), EventBus::new());
    first.render(&SourcePair::new("export default function A() { return null; }", ""));
    second.render(&SourcePair::new("export default function B() { return null; }", ""));
    assert_eq!(second.generation(), 2);
}

// ─── Store Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn store_rejects_second_initialize() {
    let store = SessionStateStore::new(EventBus::new());
    store.initialize(SessionRecord::new("a".to_string())).unwrap();
    assert_eq!(
        store.initialize(SessionRecord::new("b".to_string())),
        Err(PlaygroundError::AlreadyInitialized)
    );
}

// ─── Dispatcher Tests ────────────────────────────────────

struct FixedGenerator(String);

#[async_trait(?Send)]
impl GeneratorPort for FixedGenerator {
    async fn generate(&self, _req: &GenerationRequest) -> Result<SourcePair> {
        parse_component_json(&self.0)
    }

    fn backend_name(&self) -> &str {
        "fixed"
    }
}

#[wasm_bindgen_test]
async fn dispatcher_applies_reply() {
    let bus = EventBus::new();
    let store = SessionStateStore::new(bus.clone());
    store.initialize(SessionRecord::new("s".to_string())).unwrap();
    let generator = Rc::new(FixedGenerator(
        r#"{"jsx":"export default function A(){ return <i/>; }","css":"i{}"}"#.to_string(),
    ));
    let dispatcher = PromptDispatcher::new(store.clone(), generator, bus);

    let outcome = dispatcher.submit(PromptInput::text("italic")).await;
    assert_eq!(outcome, DispatchOutcome::Succeeded);
    assert_eq!(store.transcript()[1], ChatTurn::assistant(ACKNOWLEDGEMENT));
    assert_eq!(store.source().style, "i{}");
}
