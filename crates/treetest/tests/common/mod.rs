#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use treetest::{Container, Executable, Manager, NotificationHub, Reporter, Test, TestInfo};

/// Flattened lifecycle event, as seen by a reporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen {
    Log(String),
    SuiteStart,
    SuiteEnd(usize, usize),
    SectionStart(String, usize),
    SectionEnd(String),
    TestStart(String),
    Assertion(String, bool, String),
    TestEnd(String, bool),
}

#[derive(Default)]
pub struct Recorder {
    seen: RefCell<Vec<Seen>>,
}

impl Recorder {
    pub fn seen(&self) -> Vec<Seen> {
        self.seen.borrow().clone()
    }

    pub fn assertion_messages(&self) -> Vec<(bool, String)> {
        self.seen()
            .into_iter()
            .filter_map(|s| match s {
                Seen::Assertion(_, status, message) => Some((status, message)),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for Recorder {
    fn log(&self, msg: &str) {
        self.seen.borrow_mut().push(Seen::Log(msg.to_string()));
    }

    fn on_suite_start(&self) {
        self.seen.borrow_mut().push(Seen::SuiteStart);
    }

    fn on_suite_end(&self, info: &TestInfo) {
        self.seen
            .borrow_mut()
            .push(Seen::SuiteEnd(info.total_tests(), info.failed_test_count()));
    }

    fn on_section_start(&self, section: &Container) {
        self.seen.borrow_mut().push(Seen::SectionStart(
            section.info().name().to_string(),
            section.level(),
        ));
    }

    fn on_section_end(&self, section: &Container) {
        self.seen
            .borrow_mut()
            .push(Seen::SectionEnd(section.info().name().to_string()));
    }

    fn on_test_start(&self, test: &Test) {
        self.seen
            .borrow_mut()
            .push(Seen::TestStart(test.info().name().to_string()));
    }

    fn on_assertion_result(&self, test: &Test, status: bool, message: &str) {
        self.seen.borrow_mut().push(Seen::Assertion(
            test.info().name().to_string(),
            status,
            message.to_string(),
        ));
    }

    fn on_test_end(&self, test: &Test) {
        self.seen.borrow_mut().push(Seen::TestEnd(
            test.info().name().to_string(),
            test.info().failed_test_count() == 0,
        ));
    }
}

/// Manager reporting only to a recorder, with exit codes collected instead
/// of terminating the process
pub fn recorded_manager() -> (Manager, Rc<Recorder>, Rc<RefCell<Vec<i32>>>) {
    let recorder = Rc::new(Recorder::default());
    let exits = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&exits);
    let manager = Manager::with_hub(Rc::new(NotificationHub::with_observer(recorder.clone())))
        .with_exit_callback(move |code| sink.borrow_mut().push(code));
    (manager, recorder, exits)
}
