//! Recording reporter used by the unit tests

use crate::container::Container;
use crate::info::TestInfo;
use crate::node::Executable;
use crate::notification::Reporter;
use crate::unit_test::Test;
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Log(String),
    SuiteStart,
    SuiteEnd { tests: usize, failed: usize },
    SectionStart(String),
    SectionEnd(String),
    TestStart(String),
    Assertion { test: String, status: bool, message: String },
    TestEnd { name: String, passed: bool },
}

#[derive(Default)]
pub struct RecordingReporter {
    events: RefCell<Vec<Event>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn log(&self, msg: &str) {
        self.push(Event::Log(msg.to_string()));
    }

    fn on_suite_start(&self) {
        self.push(Event::SuiteStart);
    }

    fn on_suite_end(&self, info: &TestInfo) {
        self.push(Event::SuiteEnd {
            tests: info.total_tests(),
            failed: info.failed_test_count(),
        });
    }

    fn on_section_start(&self, section: &Container) {
        self.push(Event::SectionStart(section.info().name().to_string()));
    }

    fn on_section_end(&self, section: &Container) {
        self.push(Event::SectionEnd(section.info().name().to_string()));
    }

    fn on_test_start(&self, test: &Test) {
        self.push(Event::TestStart(test.info().name().to_string()));
    }

    fn on_assertion_result(&self, test: &Test, status: bool, message: &str) {
        self.push(Event::Assertion {
            test: test.info().name().to_string(),
            status,
            message: message.to_string(),
        });
    }

    fn on_test_end(&self, test: &Test) {
        self.push(Event::TestEnd {
            name: test.info().name().to_string(),
            passed: test.info().failed_test_count() == 0,
        });
    }
}
