//! Shared counter model for tests, sections and the manager

/// Name and pass/fail counters of a node in the test tree.
///
/// Counters only grow during a run. Composite nodes fold their children's
/// counters in after each child executes, so the sums only hold once
/// `execute()` has returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestInfo {
    name: String,
    pub(crate) passed_tests: usize,
    pub(crate) failed_tests: usize,
    pub(crate) passed_assertions: usize,
    pub(crate) failed_assertions: usize,
    pub(crate) last_sibling: bool,
}

impl TestInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build an info with preset counters (passed tests, failed tests,
    /// passed assertions, failed assertions)
    pub fn with_counts(
        name: impl Into<String>,
        tests: (usize, usize),
        assertions: (usize, usize),
    ) -> Self {
        Self {
            name: name.into(),
            passed_tests: tests.0,
            failed_tests: tests.1,
            passed_assertions: assertions.0,
            failed_assertions: assertions.1,
            last_sibling: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn passed_test_count(&self) -> usize {
        self.passed_tests
    }

    pub fn failed_test_count(&self) -> usize {
        self.failed_tests
    }

    pub fn passed_assertion_count(&self) -> usize {
        self.passed_assertions
    }

    pub fn failed_assertion_count(&self) -> usize {
        self.failed_assertions
    }

    pub fn total_tests(&self) -> usize {
        self.passed_tests + self.failed_tests
    }

    pub fn total_assertions(&self) -> usize {
        self.passed_assertions + self.failed_assertions
    }

    /// True when no test failed
    pub fn is_successful(&self) -> bool {
        self.failed_tests == 0
    }

    /// Whether this node was the last child of its parent when it ran
    pub fn is_last_sibling(&self) -> bool {
        self.last_sibling
    }

    pub fn set_last_sibling(&mut self, last: bool) {
        self.last_sibling = last;
    }

    /// Add a child's counters to this node
    pub fn absorb(&mut self, child: &TestInfo) {
        self.passed_tests += child.passed_tests;
        self.failed_tests += child.failed_tests;
        self.passed_assertions += child.passed_assertions;
        self.failed_assertions += child.failed_assertions;
    }

    pub(crate) fn record_assertion(&mut self, status: bool) {
        if status {
            self.passed_assertions += 1;
        } else {
            self.failed_assertions += 1;
        }
    }

    /// Settle the test verdict from the assertion counters
    pub(crate) fn record_verdict(&mut self) {
        if self.failed_assertions > 0 {
            self.failed_tests += 1;
        } else {
            self.passed_tests += 1;
        }
    }
}
