//! Sandbox host: a script-only `<iframe>` overlaid on the egui canvas.
//!
//! The frame gets `sandbox="allow-scripts"` and nothing else, so preview
//! documents run in an opaque origin: no access to the app's DOM, storage
//! or cookies. Documents are loaded through `srcdoc` and talk back only
//! via `postMessage`, which is queued here until the UI drains it.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlIFrameElement, MessageEvent};

use playground_core::ports::SandboxHost;
use playground_types::{PlaygroundError, Result, event::SandboxMessage};

pub struct IframeHost {
    iframe: HtmlIFrameElement,
    inbox: Rc<RefCell<Vec<SandboxMessage>>>,
    on_message: Closure<dyn FnMut(MessageEvent)>,
}

impl IframeHost {
    /// Create the frame (hidden) and start listening for its reports.
    pub fn new() -> Result<Self> {
        let document = gloo_utils::document();
        let iframe: HtmlIFrameElement = document
            .create_element("iframe")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| PlaygroundError::JsInterop("created element is not an iframe".to_string()))?;
        iframe.set_attribute("sandbox", "allow-scripts").map_err(js_err)?;
        iframe.set_attribute("title", "Component preview").map_err(js_err)?;

        let style = iframe.style();
        for (name, value) in [
            ("position", "fixed"),
            ("border", "0"),
            ("background", "#ffffff"),
            ("z-index", "10"),
            ("display", "none"),
        ] {
            style.set_property(name, value).map_err(js_err)?;
        }
        gloo_utils::body().append_child(&iframe).map_err(js_err)?;

        let inbox: Rc<RefCell<Vec<SandboxMessage>>> = Rc::new(RefCell::new(Vec::new()));
        let inbox_clone = inbox.clone();
        let frame = iframe.clone();
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            // Only the preview frame may report; anything else on the page is ignored.
            let from_frame = match (event.source(), frame.content_window()) {
                (Some(source), Some(window)) => js_sys::Object::is(&source, &window),
                _ => false,
            };
            if !from_frame {
                return;
            }
            let Some(text) = event.data().as_string() else {
                return;
            };
            match serde_json::from_str::<SandboxMessage>(&text) {
                Ok(message) if message.is_preview_message() => {
                    inbox_clone.borrow_mut().push(message);
                }
                Ok(_) => {}
                Err(e) => log::debug!("Ignoring malformed preview message: {}", e),
            }
        }) as Box<dyn FnMut(MessageEvent)>);

        gloo_utils::window()
            .add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())
            .map_err(js_err)?;

        log::info!("Preview sandbox ready");
        Ok(Self {
            iframe,
            inbox,
            on_message,
        })
    }

    /// Reports received since the last call, oldest first.
    pub fn drain_messages(&self) -> Vec<SandboxMessage> {
        self.inbox.borrow_mut().drain(..).collect()
    }

    /// Place the frame over a region of the page, in CSS pixels.
    pub fn set_bounds(&self, left: f32, top: f32, width: f32, height: f32) {
        let style = self.iframe.style();
        let _ = style.set_property("left", &format!("{}px", left));
        let _ = style.set_property("top", &format!("{}px", top));
        let _ = style.set_property("width", &format!("{}px", width.max(0.0)));
        let _ = style.set_property("height", &format!("{}px", height.max(0.0)));
    }

    pub fn set_visible(&self, visible: bool) {
        let display = if visible { "block" } else { "none" };
        let _ = self.iframe.style().set_property("display", display);
    }
}

impl SandboxHost for IframeHost {
    fn mount(&self, generation: u64, document: &str) {
        log::debug!("Mounting preview generation {}", generation);
        // Stale reports from the replaced document must not linger.
        self.inbox.borrow_mut().clear();
        self.iframe.set_srcdoc(document);
    }

    fn clear(&self) {
        self.inbox.borrow_mut().clear();
        self.iframe.set_srcdoc("");
    }
}

impl Drop for IframeHost {
    fn drop(&mut self) {
        let _ = gloo_utils::window().remove_event_listener_with_callback(
            "message",
            self.on_message.as_ref().unchecked_ref(),
        );
        self.iframe.remove();
    }
}

fn js_err(e: JsValue) -> PlaygroundError {
    PlaygroundError::JsInterop(format!("{:?}", e))
}
