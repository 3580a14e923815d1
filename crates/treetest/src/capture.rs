//! Capture window over an append-only log text store
//!
//! Code under test writes log lines into a [`CaptureBuffer`], either directly
//! through [`CaptureBuffer::log`] or through `tracing` with a [`CaptureLayer`]
//! installed. Tests remember an offset into the text and match patterns
//! against everything appended after it.

use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Read side of a capture store, as seen by assertions
pub trait CaptureSource {
    /// Current length of the captured text, in bytes
    fn current_length(&self) -> usize;

    /// Captured text from `offset` to the end; empty when `offset` is past
    /// the end or not on a character boundary
    fn slice_from(&self, offset: usize) -> String;
}

/// Shared, append-only log text. Clones share the same text.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    content: Arc<Mutex<String>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.content.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append raw text
    pub fn append(&self, text: &str) {
        self.lock().push_str(text);
    }

    /// Append a timestamped INFO line, the way a host logger records it
    pub fn log(&self, line: &str) {
        self.append_record("INFO", line);
    }

    fn append_record(&self, level: &str, message: &str) {
        let stamp = chrono::Local::now().format("%a %b %d %H:%M:%S %Y");
        let mut content = self.lock();
        // Writing into a String cannot fail
        let _ = write!(content, "\n{} {}: {}", stamp, level, message);
    }

    /// Whole captured text
    pub fn contents(&self) -> String {
        self.lock().clone()
    }

    /// Drop all captured text
    pub fn reset(&self) {
        self.lock().clear();
    }
}

impl CaptureSource for CaptureBuffer {
    fn current_length(&self) -> usize {
        self.lock().len()
    }

    fn slice_from(&self, offset: usize) -> String {
        self.lock()
            .get(offset..)
            .map(str::to_string)
            .unwrap_or_default()
    }
}

/// `tracing` layer appending every event to a [`CaptureBuffer`].
///
/// Events emitted by this crate are skipped.
#[derive(Debug, Clone)]
pub struct CaptureLayer {
    buffer: CaptureBuffer,
}

impl CaptureLayer {
    pub fn new(buffer: CaptureBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.buffer
            .append_record(metadata.level().as_str(), &visitor.finish());
    }
}

/// This crate's target or one of its modules, not a crate sharing the prefix
fn is_own_target(target: &str) -> bool {
    match target.strip_prefix(env!("CARGO_CRATE_NAME")) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{} {}", self.message, self.fields.join(" "))
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}
