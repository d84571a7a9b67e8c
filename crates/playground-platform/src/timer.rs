//! Browser event-loop adapters: `setTimeout` timers and local task spawning.

use std::time::Duration;
use futures::future::LocalBoxFuture;
use gloo_timers::callback::Timeout;
use playground_core::ports::{ScheduledTask, TaskSpawner, TimerPort};

/// `TimerPort` over `setTimeout`
pub struct BrowserTimer;

impl TimerPort for BrowserTimer {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> ScheduledTask {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, callback);
        ScheduledTask::new(move || {
            let _ = timeout.cancel();
        })
    }
}

/// `TaskSpawner` over `wasm_bindgen_futures::spawn_local`
pub struct BrowserSpawner;

impl TaskSpawner for BrowserSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
