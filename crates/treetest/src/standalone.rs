//! Flat assertion runner without sections or tests

use crate::assertion::{Assert, RunningContext};
use crate::capture::{CaptureBuffer, CaptureSource};
use crate::reporter::LogSink;
use std::rc::Rc;

pub const PASSED_MARK: &str = "✔ PASSED: ";
pub const FAILED_MARK: &str = "❌ FAILED: ";
const BANNER: &str = "*********************";

/// Runs assertions directly and logs one line per result.
///
/// Only assertion counts are kept: there is no test-level verdict.
pub struct Standalone {
    running_context: RunningContext,
    hosted: bool,
    message_prefix: String,
    sink: LogSink,
    capture: Rc<dyn CaptureSource>,
    capture_offset: usize,
    passed_assertions: usize,
    failed_assertions: usize,
}

impl Default for Standalone {
    fn default() -> Self {
        Self::new()
    }
}

impl Standalone {
    /// Runner logging to stdout, outside the hosted environment
    pub fn new() -> Self {
        Self {
            running_context: RunningContext::default(),
            hosted: false,
            message_prefix: String::new(),
            sink: Box::new(|msg| println!("{}", msg)),
            capture: Rc::new(CaptureBuffer::new()),
            capture_offset: 0,
            passed_assertions: 0,
            failed_assertions: 0,
        }
    }

    pub fn with_hosted(mut self, hosted: bool) -> Self {
        self.hosted = hosted;
        self
    }

    pub fn with_sink(mut self, sink: impl Fn(&str) + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_capture(mut self, capture: Rc<dyn CaptureSource>) -> Self {
        self.capture = capture;
        self
    }

    pub fn running_context(&self) -> RunningContext {
        self.running_context
    }

    pub fn set_running_context(&mut self, running_context: RunningContext) {
        self.running_context = running_context;
    }

    pub fn message_prefix(&self) -> &str {
        &self.message_prefix
    }

    pub fn set_message_prefix(&mut self, prefix: impl Into<String>) {
        self.message_prefix = prefix.into();
    }

    pub fn passed_assertion_count(&self) -> usize {
        self.passed_assertions
    }

    pub fn failed_assertion_count(&self) -> usize {
        self.failed_assertions
    }

    pub fn log(&self, msg: &str) {
        (self.sink)(msg);
    }

    /// Log a three-line banner around `text`
    pub fn print_header(&self, text: &str) {
        if !self.is_running_context_ok() {
            return;
        }
        self.log(BANNER);
        self.log(&format!("* {}", text));
        self.log(BANNER);
    }
}

impl Assert for Standalone {
    fn is_running_context_ok(&self) -> bool {
        self.running_context.allows(self.hosted)
    }

    fn record_result(&mut self, status: bool, message: String) {
        let mark = if status {
            self.passed_assertions += 1;
            PASSED_MARK
        } else {
            self.failed_assertions += 1;
            FAILED_MARK
        };
        self.log(&format!("{}{}{}", mark, self.message_prefix, message));
    }

    fn capture_source(&self) -> Rc<dyn CaptureSource> {
        Rc::clone(&self.capture)
    }

    fn capture_offset(&self) -> usize {
        self.capture_offset
    }

    fn set_capture_offset(&mut self, offset: usize) {
        self.capture_offset = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn capturing() -> (Standalone, Rc<RefCell<Vec<String>>>) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&lines);
        let runner = Standalone::new().with_sink(move |msg| sink.borrow_mut().push(msg.to_string()));
        (runner, lines)
    }

    #[test]
    fn test_result_lines_carry_prefix() {
        let (mut runner, lines) = capturing();
        runner.set_message_prefix("[mod] ");
        runner.assert(true, "Number 16 is even");
        runner.assert_false(true, "Number 16 is odd");
        assert_eq!(
            *lines.borrow(),
            vec![
                "✔ PASSED: [mod] Number 16 is even".to_string(),
                "❌ FAILED: [mod] Number 16 is odd".to_string(),
            ]
        );
        assert_eq!(runner.passed_assertion_count(), 1);
        assert_eq!(runner.failed_assertion_count(), 1);
    }

    #[test]
    fn test_header_banner() {
        let (runner, lines) = capturing();
        runner.print_header("Suite");
        assert_eq!(
            *lines.borrow(),
            vec![BANNER.to_string(), "* Suite".to_string(), BANNER.to_string()]
        );
    }

    #[test]
    fn test_inside_only_outside_host_is_silent() {
        let (mut runner, lines) = capturing();
        runner.set_running_context(RunningContext::InsideOnly);
        runner.print_header("hidden");
        runner.assert(false, "hidden");
        assert!(lines.borrow().is_empty());
        assert_eq!(runner.failed_assertion_count(), 0);
    }
}
