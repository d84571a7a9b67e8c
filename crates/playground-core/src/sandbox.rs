//! Preview sandbox: turns the current markup/style pair into a document
//! for the isolated host and tracks what that document reported back.
//!
//! Build faults never reach an execution context: a failed transform is
//! mounted as a static, script-free error page. Only a successfully
//! transformed module is embedded in a loader document, and every mount
//! carries a generation number so late reports from a replaced document
//! are dropped.
//!
//! Every session's sandbox drives the same host. Generations come from the
//! shared [`SharedHost`], so they never repeat across sandboxes, and only the
//! sandbox whose document is on screen may clear it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use playground_types::{
    config::PreviewConfig,
    event::{PlaygroundEvent, SandboxMessage, SandboxReport},
    session::SourcePair,
};
use crate::event_bus::EventBus;
use crate::ports::SandboxHost;
use crate::transform::{self, SyntaxError, TransformedModule};

/// What the preview currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewState {
    /// No component yet
    #[default]
    Empty,
    /// The markup failed to transform; nothing was loaded
    BuildError { message: String },
    /// A document is mounted and has not reported yet
    Loading { generation: u64 },
    Rendered { generation: u64 },
    /// The module loaded but threw or had no default export
    RuntimeError { generation: u64, message: String },
}

impl PreviewState {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            PreviewState::BuildError { message } | PreviewState::RuntimeError { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }
}

/// The one sandbox host, shared by every sandbox that may mount into it.
#[derive(Clone)]
pub struct SharedHost {
    host: Rc<dyn SandboxHost>,
    issued: Rc<Cell<u64>>,
    /// Generation of the document on screen; 0 when nothing is mounted
    holder: Rc<Cell<u64>>,
}

impl SharedHost {
    pub fn new(host: Rc<dyn SandboxHost>) -> Self {
        Self {
            host,
            issued: Rc::new(Cell::new(0)),
            holder: Rc::new(Cell::new(0)),
        }
    }

    /// Take the host over under a fresh generation.
    fn claim(&self) -> u64 {
        let generation = self.issued.get() + 1;
        self.issued.set(generation);
        self.holder.set(generation);
        generation
    }

    fn mount(&self, generation: u64, document: &str) {
        self.host.mount(generation, document);
    }

    /// Blank the host for whoever asks.
    fn vacate(&self) {
        self.holder.set(0);
        self.host.clear();
    }

    /// Blank the host only if `generation` is the document on screen.
    fn release(&self, generation: u64) -> bool {
        if generation == 0 || self.holder.get() != generation {
            return false;
        }
        self.vacate();
        true
    }

    pub fn current_generation(&self) -> u64 {
        self.holder.get()
    }
}

struct SandboxInner {
    mounted: Option<SourcePair>,
    generation: u64,
    state: PreviewState,
}

/// Shared preview sandbox: clone-cheap via Rc.
#[derive(Clone)]
pub struct PreviewSandbox {
    inner: Rc<RefCell<SandboxInner>>,
    host: SharedHost,
    config: Rc<PreviewConfig>,
    event_bus: EventBus,
}

impl PreviewSandbox {
    pub fn new(host: SharedHost, config: PreviewConfig, event_bus: EventBus) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SandboxInner {
                mounted: None,
                generation: 0,
                state: PreviewState::Empty,
            })),
            host,
            config: Rc::new(config),
            event_bus,
        }
    }

    pub fn state(&self) -> PreviewState {
        self.inner.borrow().state.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    /// Show `source`, fully replacing whatever was mounted.
    /// Supplying the pair that is already mounted changes nothing.
    pub fn render(&self, source: &SourcePair) -> PreviewState {
        let mut inner = self.inner.borrow_mut();
        if inner.mounted.as_ref() == Some(source) {
            return inner.state.clone();
        }
        inner.mounted = Some(source.clone());

        if source.is_empty() {
            self.host.vacate();
            inner.state = PreviewState::Empty;
        } else {
            let generation = self.host.claim();
            inner.generation = generation;
            match transform::transform(&source.markup, &source.style) {
                Ok(module) => {
                    self.host
                        .mount(generation, &preview_document(&module, generation, &self.config));
                    inner.state = PreviewState::Loading { generation };
                }
                Err(err) => {
                    log::debug!("Preview build failed: {}", err);
                    self.host.mount(generation, &build_error_document(&err));
                    inner.state = PreviewState::BuildError {
                        message: err.to_string(),
                    };
                }
            }
        }

        let state = inner.state.clone();
        drop(inner);
        self.event_bus.emit(PlaygroundEvent::PreviewChanged);
        state
    }

    /// Apply a report posted by a preview document.
    /// Returns false when the message was not for the current mount.
    pub fn handle_message(&self, message: &SandboxMessage) -> bool {
        if !message.is_preview_message() {
            return false;
        }
        let mut inner = self.inner.borrow_mut();
        let generation = inner.generation;
        let live = matches!(
            inner.state,
            PreviewState::Loading { generation: g } | PreviewState::Rendered { generation: g }
                if g == message.generation
        );
        if !live {
            log::debug!(
                "Ignoring sandbox report for generation {} (current {})",
                message.generation,
                generation
            );
            return false;
        }

        inner.state = match &message.report {
            SandboxReport::Rendered => PreviewState::Rendered { generation },
            SandboxReport::RuntimeError { message } => PreviewState::RuntimeError {
                generation,
                message: message.clone(),
            },
        };
        drop(inner);
        self.event_bus.emit(PlaygroundEvent::PreviewChanged);
        true
    }

    /// Forget the mounted pair, e.g. when the session view closes. The host
    /// is cleared only if this sandbox's document is still the one shown.
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.mounted = None;
        inner.state = PreviewState::Empty;
        let generation = inner.generation;
        drop(inner);
        if !self.host.release(generation) {
            log::debug!("Preview host taken over since generation {}; not clearing", generation);
        }
    }
}

// ─── Documents ───────────────────────────────────────────────

const PANEL_CSS: &str = ".playground-error{font-family:ui-monospace,SFMono-Regular,Menlo,monospace;\
font-size:13px;color:#991b1b;background:#fef2f2;border:1px solid #fecaca;border-radius:6px;\
margin:12px;padding:12px}.playground-error pre{white-space:pre-wrap;margin:8px 0 0}";

/// Static page for a transform failure. Contains no script at all.
pub fn build_error_document(err: &SyntaxError) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>{css}</style>\n</head>\n\
<body>\n<div class=\"playground-error\"><strong>Build error</strong><pre>{message}</pre></div>\n</body>\n</html>\n",
        css = PANEL_CSS,
        message = escape_html(&err.to_string()),
    )
}

/// Loader page: pulls in React, imports the module from a `data:` URL,
/// renders its default export under an error boundary and reports back.
pub fn preview_document(module: &TransformedModule, generation: u64, config: &PreviewConfig) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<script src="{tailwind}"></script>
<style>{css}</style>
<style>{style}</style>
</head>
<body>
<div id="root"></div>
<script crossorigin src="{react}"></script>
<script crossorigin src="{react_dom}"></script>
<script>
(function () {{
  var GENERATION = {generation};
  var SOURCE = {source};
  var loading = true;
  var reported = false;
  function report(kind, message) {{
    if (reported && kind === "rendered") return;
    reported = true;
    var msg = {{ source: "{message_source}", generation: GENERATION, kind: kind }};
    if (message !== undefined) msg.message = String(message);
    parent.postMessage(JSON.stringify(msg), "*");
  }}
  function describe(err) {{
    return err && err.message ? err.message : String(err);
  }}
  function panel(message) {{
    var root = document.getElementById("root");
    root.textContent = "";
    var box = document.createElement("div");
    box.className = "playground-error";
    var title = document.createElement("strong");
    title.textContent = "Runtime error";
    var pre = document.createElement("pre");
    pre.textContent = message;
    box.appendChild(title);
    box.appendChild(pre);
    root.appendChild(box);
  }}
  function fail(err) {{
    if (reported) return;
    var message = describe(err);
    panel(message);
    report("runtime_error", message);
  }}
  window.addEventListener("error", function (e) {{ if (loading) fail(e.error || e.message); }});
  window.addEventListener("unhandledrejection", function (e) {{ if (loading) fail(e.reason); }});
  if (!window.React || !window.ReactDOM) {{
    fail(new Error("React failed to load in the preview"));
    return;
  }}
  function Boundary(props) {{
    React.Component.call(this, props);
    this.state = {{ error: null }};
  }}
  Boundary.prototype = Object.create(React.Component.prototype);
  Boundary.prototype.constructor = Boundary;
  Boundary.getDerivedStateFromError = function (error) {{ return {{ error: error }}; }};
  Boundary.prototype.componentDidCatch = function (error) {{
    reported = false;
    report("runtime_error", describe(error));
  }};
  Boundary.prototype.componentDidMount = function () {{
    if (!this.state.error) report("rendered");
  }};
  Boundary.prototype.render = function () {{
    if (!this.state.error) return this.props.children;
    return React.createElement("div", {{ className: "playground-error" }},
      React.createElement("strong", null, "Runtime error"),
      React.createElement("pre", null, describe(this.state.error)));
  }};
  import("data:text/javascript;charset=utf-8," + encodeURIComponent(SOURCE))
    .then(function (mod) {{
      if (typeof mod.default !== "function") {{
        throw new Error("The component must be the module's default export.");
      }}
      loading = false;
      ReactDOM.createRoot(document.getElementById("root"))
        .render(React.createElement(Boundary, null, React.createElement(mod.default)));
    }})
    .catch(fail);
}})();
</script>
</body>
</html>
"#,
        tailwind = escape_html(&config.tailwind_url),
        react = escape_html(&config.react_url),
        react_dom = escape_html(&config.react_dom_url),
        css = PANEL_CSS,
        style = module.style,
        generation = generation,
        source = script_string_literal(&module.code),
        message_source = SandboxMessage::SOURCE,
    )
}

/// A JS string literal that cannot close the surrounding `<script>`.
fn script_string_literal(text: &str) -> String {
    serde_json::Value::String(text.to_string())
        .to_string()
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
