//! Sticky-edge timer backed by the Tokio runtime.
//!
//! The hook thread is not a Tokio thread, so the timer holds a runtime
//! [`Handle`] and spawns its sleep task onto the runtime's worker pool.  When
//! the delay elapses the task posts the [`WrapRequest`] to a
//! [`WrapRequestSink`]; it never touches the engine.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::trace;
use wrap_core::{StickyTimer, WrapRequest};

/// Thread-safe handoff of fired timers to the hook thread.
pub trait WrapRequestSink: Send + Sync {
    fn post(&self, request: WrapRequest);
}

impl WrapRequestSink for Sender<WrapRequest> {
    fn post(&self, request: WrapRequest) {
        // A closed channel means the hook thread has exited.
        let _ = self.send(request);
    }
}

pub struct TokioStickyTimer {
    handle: Handle,
    sink: Arc<dyn WrapRequestSink>,
    task: Option<JoinHandle<()>>,
}

impl TokioStickyTimer {
    pub fn new(handle: Handle, sink: Arc<dyn WrapRequestSink>) -> Self {
        Self {
            handle,
            sink,
            task: None,
        }
    }
}

impl StickyTimer for TokioStickyTimer {
    fn schedule(&mut self, delay: Duration, request: WrapRequest) {
        self.cancel();
        let sink = Arc::clone(&self.sink);
        self.task = Some(self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            trace!(token = request.token, "sticky-edge timer fired");
            sink.post(request);
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TokioStickyTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
