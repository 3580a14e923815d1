//! Executable tree nodes and the factories that build them

use crate::container::Container;
use crate::context::Context;
use crate::error::UnitTestResult;
use crate::info::TestInfo;
use crate::unit_test::Test;
use serde_json::Value;
use std::any::Any;
use std::rc::Rc;

/// Test body: receives the running test and its extra arguments
pub type TestHandler = Rc<dyn Fn(&mut Test, &[Value]) -> anyhow::Result<()>>;

/// Section body: defines the section's content
pub type SectionHandler = Rc<dyn Fn(&mut Container) -> anyhow::Result<()>>;

/// A node a container or manager can run and fold into its counters
pub trait Executable: Any {
    fn info(&self) -> &TestInfo;

    fn info_mut(&mut self) -> &mut TestInfo;

    /// Run the node; counters are final once this returns `Ok`
    fn execute(&mut self) -> UnitTestResult<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Executable {
    pub fn downcast_ref<T: Executable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Executable>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: Executable>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Everything needed to build a test
#[derive(Clone)]
pub struct TestParts {
    pub name: String,
    pub handler: TestHandler,
    pub context: Context,
    pub args: Vec<Value>,
}

/// Everything needed to build a top-level section
#[derive(Clone)]
pub struct SectionParts {
    pub name: String,
    pub handler: SectionHandler,
    pub context: Context,
    pub test_factory: TestFactory,
}

/// Builds the tests created by `Container::test` and `parameterized_test`
pub type TestFactory = Rc<dyn Fn(TestParts) -> Box<dyn Executable>>;

/// Builds the sections created by `Manager::test_section`
pub type SectionFactory = Rc<dyn Fn(SectionParts) -> Box<dyn Executable>>;

pub fn default_test_factory() -> TestFactory {
    Rc::new(|parts: TestParts| -> Box<dyn Executable> { Box::new(Test::from_parts(parts)) })
}

pub fn default_section_factory() -> SectionFactory {
    Rc::new(|parts: SectionParts| -> Box<dyn Executable> {
        Box::new(
            Container::from_handler(parts.name, parts.handler, parts.context)
                .with_test_factory(parts.test_factory),
        )
    })
}
