//! Root of the test tree and process exit code

use crate::capture::{CaptureBuffer, CaptureSource};
use crate::container::Container;
use crate::context::Context;
use crate::error::UnitTestResult;
use crate::info::TestInfo;
use crate::node::{
    default_section_factory, default_test_factory, Executable, SectionFactory, SectionParts,
    TestFactory,
};
use crate::notification::{NotificationHub, Reporter};
use crate::reporter::DefaultReporter;
use std::rc::Rc;
use treetest_config::Config;

/// Called with the exit code when the run failed
pub type ExitCallback = Box<dyn FnMut(i32)>;

/// Owns the top-level sections and runs them as one suite.
///
/// ```no_run
/// use treetest::prelude::*;
///
/// let mut manager = Manager::new();
/// manager.test_section("Numbers", |section| {
///     section.test("addition", |t, _| {
///         t.assert(1 + 1 == 2, "1 + 1 == 2");
///         Ok(())
///     });
///     Ok(())
/// });
/// let code = manager.execute().unwrap_or(1);
/// # let _ = code;
/// ```
pub struct Manager {
    info: TestInfo,
    sections: Vec<Box<dyn Executable>>,
    hub: Rc<NotificationHub>,
    context: Context,
    section_factory: SectionFactory,
    test_factory: TestFactory,
    exit_callback: ExitCallback,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    /// Manager reporting to stdout, outside the hosted environment, exiting
    /// the process with code 1 on failure
    pub fn new() -> Self {
        Self::with_hub(Rc::new(NotificationHub::new()))
    }

    /// Manager broadcasting to `hub`
    pub fn with_hub(hub: Rc<NotificationHub>) -> Self {
        let reporter: Rc<dyn Reporter> = hub.clone();
        Self {
            info: TestInfo::new("TestSuite"),
            sections: Vec::new(),
            hub,
            context: Context::new(reporter, Rc::new(CaptureBuffer::new()), false),
            section_factory: default_section_factory(),
            test_factory: default_test_factory(),
            exit_callback: Box::new(|code| std::process::exit(code)),
        }
    }

    /// Manager set up from a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        let reporter = DefaultReporter::new()
            .with_show_passed(config.show_passed_assertions())
            .with_color(config.color());
        let hub = Rc::new(NotificationHub::with_observer(Rc::new(reporter)));

        let mut manager = Self::with_hub(hub)
            .with_hosted(config.hosted())
            .with_message_prefix(config.message_prefix());
        if !config.exit_on_failure() {
            manager = manager.with_exit_callback(|_| {});
        }
        manager
    }

    /// Replace the process exit performed when the run fails
    pub fn with_exit_callback(mut self, callback: impl FnMut(i32) + 'static) -> Self {
        self.exit_callback = Box::new(callback);
        self
    }

    pub fn with_section_factory(mut self, factory: SectionFactory) -> Self {
        self.section_factory = factory;
        self
    }

    pub fn with_test_factory(mut self, factory: TestFactory) -> Self {
        self.test_factory = factory;
        self
    }

    /// Capture store read by the log assertions
    pub fn with_capture(mut self, capture: Rc<dyn CaptureSource>) -> Self {
        self.context = self.context.with_capture(capture);
        self
    }

    pub fn with_hosted(mut self, hosted: bool) -> Self {
        self.context = self.context.with_hosted(hosted);
        self
    }

    pub fn with_message_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.context = self.context.with_message_prefix(prefix);
        self
    }

    pub fn hub(&self) -> &Rc<NotificationHub> {
        &self.hub
    }

    pub fn info(&self) -> &TestInfo {
        &self.info
    }

    pub fn sections(&self) -> &[Box<dyn Executable>] {
        &self.sections
    }

    /// Append a top-level section
    pub fn test_section(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&mut Container) -> anyhow::Result<()> + 'static,
    ) -> &mut dyn Executable {
        let section = (self.section_factory)(SectionParts {
            name: name.into(),
            handler: Rc::new(handler),
            context: self.context.clone(),
            test_factory: Rc::clone(&self.test_factory),
        });
        self.sections.push(section);
        let index = self.sections.len() - 1;
        self.sections[index].as_mut()
    }

    /// Run every section and return the exit code: 1 when any test failed,
    /// 0 otherwise. On failure the exit callback is invoked first.
    ///
    /// A handler error aborts the run and is returned as is.
    pub fn execute(&mut self) -> UnitTestResult<i32> {
        tracing::debug!(sections = self.sections.len(), "suite started");
        self.hub.on_suite_start();

        let count = self.sections.len();
        for (i, section) in self.sections.iter_mut().enumerate() {
            section.info_mut().set_last_sibling(i + 1 == count);
            section.execute()?;
            self.info.absorb(section.info());
        }

        self.hub.on_suite_end(&self.info);
        tracing::debug!(
            tests = self.info.total_tests(),
            failed = self.info.failed_test_count(),
            "suite finished"
        );

        if self.info.is_successful() {
            Ok(0)
        } else {
            (self.exit_callback)(1);
            Ok(1)
        }
    }
}
