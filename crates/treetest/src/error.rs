//! Error types for the test engine

use thiserror::Error;

/// Errors raised by the engine itself.
///
/// Failed assertions are never errors: they are recorded as results.
#[derive(Error, Debug)]
pub enum UnitTestError {
    /// The same reporter instance was registered twice on a hub
    #[error("This observer is already registered")]
    DuplicateObserver,

    /// A test or section handler returned an error; the run is aborted
    #[error("handler of '{path}' failed: {source}")]
    Handler {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl UnitTestError {
    pub(crate) fn handler(path: impl Into<String>, error: anyhow::Error) -> Self {
        UnitTestError::Handler {
            path: path.into(),
            source: error.into(),
        }
    }

    /// Prefix the failing path with the enclosing section name
    pub(crate) fn within(self, section: &str) -> Self {
        match self {
            UnitTestError::Handler { path, source } => UnitTestError::Handler {
                path: format!("{} > {}", section, path),
                source,
            },
            other => other,
        }
    }
}

/// Result type for engine operations
pub type UnitTestResult<T> = Result<T, UnitTestError>;
