//! Treetest - hierarchical unit testing
//!
//! Tests are grouped in sections, sections can be nested, and the whole tree
//! is owned by a [`Manager`]:
//! - Sections define their content lazily from a handler
//! - Tests run a handler and record every assertion outcome
//! - Parameterized tests expand one handler over a list of argument sets
//! - Lifecycle events fan out to any number of [`Reporter`]s
//!
//! # Example
//!
//! ```no_run
//! use treetest::prelude::*;
//! use serde_json::json;
//!
//! let mut manager = Manager::new();
//! manager.test_section("Strings", |section| {
//!     section.parameterized_test(
//!         ParameterizedTest::new()
//!             .name_template("${0} is not empty")
//!             .values([json!("a"), json!("bc")]),
//!         |t, args| {
//!             t.assert(args[0].as_str().map_or(false, |s| !s.is_empty()), "not empty");
//!             Ok(())
//!         },
//!     );
//!     Ok(())
//! });
//! std::process::exit(manager.execute().unwrap_or(1));
//! ```

pub mod assertion;
pub mod capture;
pub mod condition;
pub mod container;
pub mod context;
pub mod error;
pub mod info;
pub mod manager;
pub mod node;
pub mod notification;
pub mod parameterized;
pub mod reporter;
pub mod standalone;
pub mod value;

#[cfg(test)]
mod testing;

pub use assertion::{Assert, RunningContext};
pub use capture::{CaptureBuffer, CaptureLayer, CaptureSource};
pub use condition::{Condition, Pattern};
pub use container::{Container, Generated};
pub use context::Context;
pub use error::{UnitTestError, UnitTestResult};
pub use info::TestInfo;
pub use manager::Manager;
pub use node::{Executable, SectionFactory, SectionParts, TestFactory, TestParts};
pub use notification::{NotificationHub, Reporter};
pub use parameterized::{GeneratedTest, NamedArgs, ParameterizedTest};
pub use reporter::DefaultReporter;
pub use standalone::Standalone;
pub use unit_test::Test;

/// Everything a test file usually needs
pub mod prelude {
    pub use crate::assertion::{Assert, RunningContext};
    pub use crate::condition::{Condition, Pattern};
    pub use crate::container::Container;
    pub use crate::manager::Manager;
    pub use crate::node::Executable;
    pub use crate::parameterized::{NamedArgs, ParameterizedTest};
    pub use crate::unit_test::Test;
}
