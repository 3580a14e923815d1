//! Conditions, patterns and failure capture for the assertion engine

use regex::Regex;
use std::any::Any;
use std::cell::Cell;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

/// Something an assertion evaluates to a boolean.
///
/// A deferred condition runs inside the assertion: an `Err` it returns or a
/// panic it raises turns the assertion into a failure instead of aborting
/// the test.
pub enum Condition<'a> {
    Ready(bool),
    Deferred(Box<dyn FnOnce() -> Result<bool, String> + 'a>),
}

impl<'a> Condition<'a> {
    /// Condition computed lazily by an infallible closure
    pub fn lazy(f: impl FnOnce() -> bool + 'a) -> Self {
        Condition::Deferred(Box::new(move || Ok(f())))
    }

    /// Condition computed lazily by a closure that may fail
    pub fn fallible<E: Display>(f: impl FnOnce() -> Result<bool, E> + 'a) -> Self {
        Condition::Deferred(Box::new(move || f().map_err(|e| e.to_string())))
    }

    /// Resolve the condition; the error carries the failure text
    pub fn resolve(self) -> Result<bool, String> {
        match self {
            Condition::Ready(value) => Ok(value),
            Condition::Deferred(f) => catch_failure(f),
        }
    }
}

impl From<bool> for Condition<'_> {
    fn from(value: bool) -> Self {
        Condition::Ready(value)
    }
}

impl std::fmt::Debug for Condition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Condition::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// A regular expression given as source text or already compiled
#[derive(Debug, Clone)]
pub enum Pattern {
    Source(String),
    Compiled(Regex),
}

impl Pattern {
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        match self {
            Pattern::Source(source) => Regex::new(source),
            Pattern::Compiled(regex) => Ok(regex.clone()),
        }
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Pattern::Source(source.to_string())
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Pattern::Source(source)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern::Compiled(regex)
    }
}

impl From<&Regex> for Pattern {
    fn from(regex: &Regex) -> Self {
        Pattern::Compiled(regex.clone())
    }
}

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Wrap the panic hook once so panics caught by assertions print nothing.
/// Other threads, and this one outside `catch_failure`, keep the previous hook.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !QUIET_PANICS.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Run `f`, turning both a returned `Err` and a panic into failure text
pub(crate) fn catch_failure<T>(f: impl FnOnce() -> Result<T, String>) -> Result<T, String> {
    install_quiet_hook();
    let was_quiet = QUIET_PANICS.with(|quiet| quiet.replace(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    QUIET_PANICS.with(|quiet| quiet.set(was_quiet));

    match outcome {
        Ok(result) => result,
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
