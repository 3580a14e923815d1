//! Observer contract for lifecycle events and the fan-out hub

use crate::container::Container;
use crate::error::{UnitTestError, UnitTestResult};
use crate::info::TestInfo;
use crate::reporter::DefaultReporter;
use crate::unit_test::Test;
use std::cell::RefCell;
use std::rc::Rc;

/// Consumer of lifecycle and result notifications.
///
/// Every method is called synchronously, in tree order, while the run is in
/// progress. Implementations use interior mutability for their state.
pub trait Reporter {
    /// Free-form message
    fn log(&self, msg: &str);

    /// The manager starts executing its sections
    fn on_suite_start(&self);

    /// The manager finished; `info` holds the global counters
    fn on_suite_end(&self, info: &TestInfo);

    /// A section starts, before its definition handler runs
    fn on_section_start(&self, section: &Container);

    /// A section finished executing all its children
    fn on_section_end(&self, section: &Container);

    /// A test starts, before its handler runs
    fn on_test_start(&self, test: &Test);

    /// An assertion inside `test` produced a result
    fn on_assertion_result(&self, test: &Test, status: bool, message: &str);

    /// A test finished and its verdict is settled
    fn on_test_end(&self, test: &Test);
}

/// Broadcasts every notification to an ordered set of reporters.
///
/// A hub is itself a [`Reporter`], so hubs can be nested. A fresh hub
/// already holds a [`DefaultReporter`].
pub struct NotificationHub {
    observers: RefCell<Vec<Rc<dyn Reporter>>>,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationHub {
    /// Hub with a stdout [`DefaultReporter`] registered
    pub fn new() -> Self {
        Self::with_observer(Rc::new(DefaultReporter::new()))
    }

    /// Hub whose first observer is `observer`
    pub fn with_observer(observer: Rc<dyn Reporter>) -> Self {
        Self {
            observers: RefCell::new(vec![observer]),
        }
    }

    /// Hub without any observer
    pub fn empty() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Register `observer`; registering the same instance twice is an error
    pub fn add_observer(&self, observer: Rc<dyn Reporter>) -> UnitTestResult<()> {
        let mut observers = self.observers.borrow_mut();
        if observers.iter().any(|o| same_observer(o, &observer)) {
            tracing::warn!("rejected duplicate observer registration");
            return Err(UnitTestError::DuplicateObserver);
        }
        observers.push(observer);
        Ok(())
    }

    /// Unregister `observer`; nothing happens when it is not registered
    pub fn remove_observer(&self, observer: &Rc<dyn Reporter>) {
        self.observers
            .borrow_mut()
            .retain(|o| !same_observer(o, observer));
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn contains(&self, observer: &Rc<dyn Reporter>) -> bool {
        self.observers
            .borrow()
            .iter()
            .any(|o| same_observer(o, observer))
    }

    // Observers may register or remove observers while being notified
    fn each(&self, f: impl Fn(&dyn Reporter)) {
        let snapshot: Vec<Rc<dyn Reporter>> = self.observers.borrow().clone();
        for observer in &snapshot {
            f(observer.as_ref());
        }
    }
}

/// Identity comparison on the data pointer only
fn same_observer(a: &Rc<dyn Reporter>, b: &Rc<dyn Reporter>) -> bool {
    std::ptr::eq(
        Rc::as_ptr(a) as *const (),
        Rc::as_ptr(b) as *const (),
    )
}

impl Reporter for NotificationHub {
    fn log(&self, msg: &str) {
        self.each(|o| o.log(msg));
    }

    fn on_suite_start(&self) {
        self.each(|o| o.on_suite_start());
    }

    fn on_suite_end(&self, info: &TestInfo) {
        self.each(|o| o.on_suite_end(info));
    }

    fn on_section_start(&self, section: &Container) {
        self.each(|o| o.on_section_start(section));
    }

    fn on_section_end(&self, section: &Container) {
        self.each(|o| o.on_section_end(section));
    }

    fn on_test_start(&self, test: &Test) {
        self.each(|o| o.on_test_start(test));
    }

    fn on_assertion_result(&self, test: &Test, status: bool, message: &str) {
        self.each(|o| o.on_assertion_result(test, status, message));
    }

    fn on_test_end(&self, test: &Test) {
        self.each(|o| o.on_test_end(test));
    }
}
