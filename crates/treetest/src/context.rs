//! Collaborators shared by every node of a test tree

use crate::capture::{CaptureBuffer, CaptureSource};
use crate::notification::{NotificationHub, Reporter};
use std::rc::Rc;

/// Reporter, capture store and environment flag handed down the tree.
///
/// Cloning shares the collaborators; nodes never own them.
#[derive(Clone)]
pub struct Context {
    pub(crate) reporter: Rc<dyn Reporter>,
    pub(crate) capture: Rc<dyn CaptureSource>,
    pub(crate) hosted: bool,
    pub(crate) message_prefix: String,
}

impl Context {
    pub fn new(reporter: Rc<dyn Reporter>, capture: Rc<dyn CaptureSource>, hosted: bool) -> Self {
        Self {
            reporter,
            capture,
            hosted,
            message_prefix: String::new(),
        }
    }

    /// Context with a silent hub and an empty capture buffer
    pub fn detached() -> Self {
        Self::new(
            Rc::new(NotificationHub::empty()),
            Rc::new(CaptureBuffer::new()),
            false,
        )
    }

    pub fn with_reporter(mut self, reporter: Rc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_capture(mut self, capture: Rc<dyn CaptureSource>) -> Self {
        self.capture = capture;
        self
    }

    /// Declare whether the run happens inside the hosted environment
    pub fn with_hosted(mut self, hosted: bool) -> Self {
        self.hosted = hosted;
        self
    }

    /// Default prefix for messages logged by tests
    pub fn with_message_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.message_prefix = prefix.into();
        self
    }

    pub fn reporter(&self) -> &Rc<dyn Reporter> {
        &self.reporter
    }

    pub fn capture(&self) -> &Rc<dyn CaptureSource> {
        &self.capture
    }

    pub fn is_hosted(&self) -> bool {
        self.hosted
    }

    pub fn message_prefix(&self) -> &str {
        &self.message_prefix
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("hosted", &self.hosted)
            .field("message_prefix", &self.message_prefix)
            .finish_non_exhaustive()
    }
}
