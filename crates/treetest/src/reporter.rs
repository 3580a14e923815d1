//! Default reporter - tree-formatted progress output

use crate::container::Container;
use crate::info::TestInfo;
use crate::node::Executable;
use crate::notification::Reporter;
use crate::unit_test::Test;
use colored::*;
use std::cell::RefCell;

pub const EMOJI_OK: &str = "✔️ ";
pub const EMOJI_KO: &str = "❌";
pub const ELEMENT_PREFIX: &str = "├─";
pub const LAST_ELEMENT_PREFIX: &str = "└─";
pub const SUBLEVEL_PREFIX: &str = "│ ";
pub const SECTION_ICON: &str = "📂 ";

/// Panic message when a section ends out of order
pub const SECTION_MISMATCH: &str = "Given section is not correct";

/// Where rendered lines go
pub type LogSink = Box<dyn Fn(&str)>;

struct OpenSection {
    name: String,
    level: usize,
}

#[derive(Default)]
struct RenderState {
    sections: Vec<OpenSection>,
    prefixes: Vec<&'static str>,
    assertions: Vec<(bool, String)>,
}

impl RenderState {
    fn prefix(&self) -> String {
        self.prefixes.concat()
    }

    /// Swap the element glyph for the last-element glyph when the node
    /// about to be printed closes its section
    fn adapt_for_last_element(&mut self, is_last: bool) {
        if !self.sections.is_empty() && is_last {
            self.prefixes.pop();
            self.prefixes.push(LAST_ELEMENT_PREFIX);
        }
    }
}

/// Reporter printing a tree of sections and tests
pub struct DefaultReporter {
    /// Print passed assertions too
    show_passed: bool,
    /// Colorize PASSED/FAILED
    color: bool,
    sink: LogSink,
    state: RefCell<RenderState>,
}

impl Default for DefaultReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultReporter {
    /// Create a reporter writing to stdout
    pub fn new() -> Self {
        Self {
            show_passed: false,
            color: false,
            sink: Box::new(|msg| println!("{}", msg)),
            state: RefCell::new(RenderState::default()),
        }
    }

    /// Also print passed assertions under each test
    pub fn with_show_passed(mut self, show_passed: bool) -> Self {
        self.show_passed = show_passed;
        self
    }

    /// Enable colored PASSED/FAILED lines
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Send rendered lines to `sink` instead of stdout
    pub fn with_sink(mut self, sink: impl Fn(&str) + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    fn passed(&self, text: String) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text
        }
    }

    fn failed(&self, text: String) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text
        }
    }

    fn print_assertions(&self, state: &RenderState) {
        let prefix = state.prefix();
        for (status, message) in &state.assertions {
            if !*status {
                self.log(&format!(
                    "{}{}",
                    prefix,
                    self.failed(format!("{} FAILED: {}", EMOJI_KO, message))
                ));
            } else if self.show_passed {
                self.log(&format!(
                    "{}{}",
                    prefix,
                    self.passed(format!("{} PASSED: {}", EMOJI_OK, message))
                ));
            }
        }
    }
}

/// # Panics
///
/// `on_section_end` panics with [`SECTION_MISMATCH`] when the section is not
/// the innermost open one. The render state is reset first, so the reporter
/// stays usable if the panic is caught.
impl Reporter for DefaultReporter {
    fn log(&self, msg: &str) {
        (self.sink)(msg);
    }

    fn on_suite_start(&self) {
        self.log("Test Start");
    }

    fn on_suite_end(&self, info: &TestInfo) {
        let line = format!(
            "End TestSuite - {} tests, {} failures",
            info.total_tests(),
            info.failed_test_count()
        );
        if info.is_successful() {
            self.log(&self.passed(format!("{} {}", EMOJI_OK, line)));
        } else {
            self.log(&self.failed(format!("{} {}", EMOJI_KO, line)));
        }
    }

    fn on_section_start(&self, section: &Container) {
        let mut state = self.state.borrow_mut();
        state.adapt_for_last_element(section.info().is_last_sibling());
        self.log(&format!(
            "{}{}{}",
            state.prefix(),
            SECTION_ICON,
            section.info().name()
        ));
        state.sections.push(OpenSection {
            name: section.info().name().to_string(),
            level: section.level(),
        });

        if section.level() == 0 {
            state.prefixes.push(ELEMENT_PREFIX);
        } else {
            state.prefixes.insert(0, SUBLEVEL_PREFIX);
        }
    }

    fn on_section_end(&self, section: &Container) {
        let mut state = self.state.borrow_mut();
        let closed = state.sections.pop();
        let matches = closed
            .as_ref()
            .map(|open| open.name == section.info().name() && open.level == section.level())
            .unwrap_or(false);
        if !matches {
            tracing::error!(
                section = section.info().name(),
                "section end does not match the innermost open section"
            );
            state.sections.clear();
            state.prefixes.clear();
            drop(state);
            panic!("{}", SECTION_MISMATCH);
        }

        if section.level() == 0 {
            state.prefixes.clear();
            drop(state);
            self.log("");
        } else {
            if !state.prefixes.is_empty() {
                state.prefixes.remove(0);
            }
            state.prefixes.pop();
            state.prefixes.push(ELEMENT_PREFIX);
        }
    }

    fn on_test_start(&self, _test: &Test) {
        self.state.borrow_mut().assertions.clear();
    }

    fn on_assertion_result(&self, _test: &Test, status: bool, message: &str) {
        self.state
            .borrow_mut()
            .assertions
            .push((status, message.to_string()));
    }

    fn on_test_end(&self, test: &Test) {
        let mut state = self.state.borrow_mut();
        state.adapt_for_last_element(test.info().is_last_sibling());

        let line = if test.info().failed_test_count() == 0 {
            self.passed(format!("{} PASSED: {}", EMOJI_OK, test.info().name()))
        } else {
            self.failed(format!("{} FAILED: {}", EMOJI_KO, test.info().name()))
        };
        self.log(&format!("{}{}", state.prefix(), line));

        state.prefixes.insert(0, SUBLEVEL_PREFIX);
        self.print_assertions(&state);
        state.prefixes.remove(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn capturing() -> (DefaultReporter, Rc<RefCell<Vec<String>>>) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&lines);
        let reporter = DefaultReporter::new().with_sink(move |msg| sink.borrow_mut().push(msg.to_string()));
        (reporter, lines)
    }

    fn test_named(name: &str) -> Test {
        Test::new(name, |_, _| Ok(()), Context::detached(), Vec::new())
    }

    #[test]
    fn test_suite_start_line() {
        let (reporter, lines) = capturing();
        reporter.on_suite_start();
        assert_eq!(*lines.borrow(), vec!["Test Start".to_string()]);
    }

    #[test]
    fn test_suite_end_line_with_failures() {
        let (reporter, lines) = capturing();
        reporter.on_suite_end(&TestInfo::with_counts("suite", (5, 2), (0, 0)));
        assert_eq!(
            *lines.borrow(),
            vec!["❌ End TestSuite - 7 tests, 2 failures".to_string()]
        );
    }

    #[test]
    fn test_section_start_line() {
        let (reporter, lines) = capturing();
        let section = Container::new("My Section", |_| Ok(()), Context::detached());
        reporter.on_section_start(&section);
        assert_eq!(*lines.borrow(), vec!["📂 My Section".to_string()]);
    }

    #[test]
    fn test_test_start_is_silent() {
        let (reporter, lines) = capturing();
        reporter.on_test_start(&test_named("quiet"));
        assert!(lines.borrow().is_empty());
    }

    #[test]
    fn test_passed_test_line() {
        let (reporter, lines) = capturing();
        let mut test = test_named("My OK Test");
        test.info_mut().record_verdict();
        reporter.on_test_end(&test);
        assert_eq!(*lines.borrow(), vec!["✔️  PASSED: My OK Test".to_string()]);
    }

    #[test]
    fn test_failed_assertion_listed_under_test() {
        let (reporter, lines) = capturing();
        let test = test_named("My OK Test");
        reporter.on_assertion_result(&test, false, "My Assert KO");
        assert!(lines.borrow().is_empty());

        reporter.on_test_end(&test);
        assert_eq!(
            *lines.borrow(),
            vec![
                "✔️  PASSED: My OK Test".to_string(),
                "│ ❌ FAILED: My Assert KO".to_string(),
            ]
        );
    }

    #[test]
    fn test_passed_assertions_hidden_by_default() {
        let (reporter, lines) = capturing();
        let test = test_named("t");
        reporter.on_assertion_result(&test, true, "fine");
        reporter.on_test_end(&test);
        assert_eq!(lines.borrow().len(), 1);
    }

    #[test]
    fn test_passed_assertions_shown_when_enabled() {
        let lines = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = Rc::clone(&lines);
        let reporter = DefaultReporter::new()
            .with_show_passed(true)
            .with_sink(move |msg| sink.borrow_mut().push(msg.to_string()));
        let test = test_named("t");
        reporter.on_assertion_result(&test, true, "fine");
        reporter.on_test_end(&test);
        assert_eq!(lines.borrow()[1], "│ ✔️  PASSED: fine");
    }

    #[test]
    #[should_panic(expected = "Given section is not correct")]
    fn test_mismatched_section_end_panics() {
        let (reporter, _lines) = capturing();
        let opened = Container::new("opened", |_| Ok(()), Context::detached());
        let other = Container::new("other", |_| Ok(()), Context::detached());
        reporter.on_section_start(&opened);
        reporter.on_section_end(&other);
    }

    #[test]
    fn test_mismatched_section_end_resets_state() {
        let (reporter, lines) = capturing();
        let opened = Container::new("opened", |_| Ok(()), Context::detached());
        let other = Container::new("other", |_| Ok(()), Context::detached());
        reporter.on_section_start(&opened);
        let raised = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            reporter.on_section_end(&other);
        }));
        assert!(raised.is_err());

        reporter.on_test_end(&test_named("after"));
        assert_eq!(lines.borrow().last().unwrap(), "✔️  PASSED: after");
    }
}
