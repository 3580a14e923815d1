//! Sections: named, ordered groups of tests and nested sections

use crate::context::Context;
use crate::error::{UnitTestError, UnitTestResult};
use crate::info::TestInfo;
use crate::node::{
    default_test_factory, Executable, SectionHandler, TestFactory, TestHandler, TestParts,
};
use crate::parameterized::ParameterizedTest;
use crate::unit_test::Test;
use serde_json::Value;
use std::any::Any;
use std::rc::Rc;

/// What `Container::parameterized_test` appended
pub enum Generated<'a> {
    /// The generated tests, in generation order
    Tests(&'a mut [Box<dyn Executable>]),
    /// The nested section wrapping them, when a display name was given
    Section(&'a mut dyn Executable),
}

impl Generated<'_> {
    pub fn len(&self) -> usize {
        match self {
            Generated::Tests(tests) => tests.len(),
            Generated::Section(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A section of the test tree.
///
/// Its handler defines the content and runs on every `execute()`, so the
/// children are only known once the section runs.
pub struct Container {
    info: TestInfo,
    handler: SectionHandler,
    children: Vec<Box<dyn Executable>>,
    level: usize,
    context: Context,
    test_factory: TestFactory,
}

impl Container {
    pub fn new(
        name: impl Into<String>,
        handler: impl Fn(&mut Container) -> anyhow::Result<()> + 'static,
        context: Context,
    ) -> Self {
        Self::from_handler(name, Rc::new(handler), context)
    }

    pub fn from_handler(name: impl Into<String>, handler: SectionHandler, context: Context) -> Self {
        Self {
            info: TestInfo::new(name),
            handler,
            children: Vec::new(),
            level: 0,
            context,
            test_factory: default_test_factory(),
        }
    }

    /// Build the tests of this section (and of its nested sections) with
    /// `factory`
    pub fn with_test_factory(mut self, factory: TestFactory) -> Self {
        self.test_factory = factory;
        self
    }

    /// Depth from the root; top-level sections are at level 0
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn children(&self) -> &[Box<dyn Executable>] {
        &self.children
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Append a test without extra arguments
    pub fn test(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&mut Test, &[Value]) -> anyhow::Result<()> + 'static,
    ) -> &mut dyn Executable {
        self.push_test(name.into(), Rc::new(handler), Vec::new())
    }

    /// Append a nested section one level deeper
    pub fn nested(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&mut Container) -> anyhow::Result<()> + 'static,
    ) -> &mut dyn Executable {
        self.push_nested(name.into(), Rc::new(handler))
    }

    /// Append one test per argument set of `config`, all sharing `handler`
    pub fn parameterized_test(
        &mut self,
        config: ParameterizedTest,
        handler: impl Fn(&mut Test, &[Value]) -> anyhow::Result<()> + 'static,
    ) -> Generated<'_> {
        self.parameterized_with(config, Rc::new(handler))
    }

    fn parameterized_with(&mut self, config: ParameterizedTest, handler: TestHandler) -> Generated<'_> {
        if !config.display_name.is_empty() {
            let name = config.display_name.clone();
            let inner = ParameterizedTest {
                display_name: String::new(),
                ..config
            };
            let section = self.push_nested(
                name,
                Rc::new(move |section: &mut Container| -> anyhow::Result<()> {
                    section.parameterized_with(inner.clone(), Rc::clone(&handler));
                    Ok(())
                }),
            );
            return Generated::Section(section);
        }

        let start = self.children.len();
        for generated in config.expand() {
            self.push_test(generated.name, Rc::clone(&handler), generated.args);
        }
        Generated::Tests(&mut self.children[start..])
    }

    fn push_test(&mut self, name: String, handler: TestHandler, args: Vec<Value>) -> &mut dyn Executable {
        let test = (self.test_factory)(TestParts {
            name,
            handler,
            context: self.context.clone(),
            args,
        });
        self.push(test)
    }

    fn push_nested(&mut self, name: String, handler: SectionHandler) -> &mut dyn Executable {
        let mut section = Container::from_handler(name, handler, self.context.clone())
            .with_test_factory(Rc::clone(&self.test_factory));
        section.level = self.level + 1;
        self.push(Box::new(section))
    }

    fn push(&mut self, child: Box<dyn Executable>) -> &mut dyn Executable {
        self.children.push(child);
        let index = self.children.len() - 1;
        self.children[index].as_mut()
    }
}

impl Executable for Container {
    fn info(&self) -> &TestInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut TestInfo {
        &mut self.info
    }

    fn execute(&mut self) -> UnitTestResult<()> {
        let reporter = Rc::clone(self.context.reporter());
        reporter.on_section_start(self);
        tracing::debug!(section = self.info.name(), level = self.level, "section started");

        let handler = Rc::clone(&self.handler);
        handler(self).map_err(|e| UnitTestError::handler(self.info.name(), e))?;

        let count = self.children.len();
        for (i, child) in self.children.iter_mut().enumerate() {
            child.info_mut().set_last_sibling(i + 1 == count);
            child.execute().map_err(|e| e.within(self.info.name()))?;
            self.info.absorb(child.info());
        }

        tracing::debug!(
            section = self.info.name(),
            tests = self.info.total_tests(),
            failed = self.info.failed_test_count(),
            "section finished"
        );
        reporter.on_section_end(self);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("info", &self.info)
            .field("level", &self.level)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}
