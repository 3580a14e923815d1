//! Assertion engine shared by tests and the standalone runner
//!
//! Implementors only provide the running-context gate, a way to record a
//! result and access to the capture window; every assertion is a provided
//! method built on top of those.

use crate::capture::CaptureSource;
use crate::condition::{catch_failure, Condition, Pattern};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::rc::Rc;

/// Where assertions are allowed to run, relative to the hosted environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunningContext {
    /// Only when running inside the hosted environment
    InsideOnly,
    /// Only when running outside the hosted environment
    OutsideOnly,
    /// Everywhere
    #[default]
    Both,
}

impl RunningContext {
    pub fn allows(self, hosted: bool) -> bool {
        match self {
            RunningContext::Both => true,
            RunningContext::InsideOnly => hosted,
            RunningContext::OutsideOnly => !hosted,
        }
    }
}

/// Assertion methods.
///
/// When [`Assert::is_running_context_ok`] is false every method is a
/// complete no-op: nothing is recorded, nothing is evaluated.
pub trait Assert {
    fn is_running_context_ok(&self) -> bool;

    /// Record one assertion outcome
    fn record_result(&mut self, status: bool, message: String);

    fn capture_source(&self) -> Rc<dyn CaptureSource>;

    fn capture_offset(&self) -> usize;

    fn set_capture_offset(&mut self, offset: usize);

    /// Pass when `condition` is true. A deferred condition that fails is
    /// recorded as a failure with the error appended as ` (<error>)`.
    fn assert<'c>(&mut self, condition: impl Into<Condition<'c>>, message: impl Into<String>) {
        self.assert_expecting(condition, message, true);
    }

    /// Pass when `condition` resolves to `expected`
    fn assert_expecting<'c>(
        &mut self,
        condition: impl Into<Condition<'c>>,
        message: impl Into<String>,
        expected: bool,
    ) {
        if !self.is_running_context_ok() {
            return;
        }
        let message = message.into();
        match condition.into().resolve() {
            Ok(value) => self.record_result(value == expected, message),
            Err(error) => self.record_result(false, format!("{} ({})", message, error)),
        }
    }

    fn assert_false<'c>(&mut self, condition: impl Into<Condition<'c>>, message: impl Into<String>) {
        self.assert_expecting(condition, message, false);
    }

    /// Pass when `callback` fails (returns `Err` or panics) with a text
    /// matching `pattern`
    fn assert_throws<T, E: Display>(
        &mut self,
        callback: impl FnOnce() -> Result<T, E>,
        pattern: impl Into<Pattern>,
        message: impl Into<String>,
    ) {
        if !self.is_running_context_ok() {
            return;
        }
        let message = message.into();
        let caught = match catch_failure(|| callback().map_err(|e| e.to_string())) {
            Ok(_) => false,
            Err(text) => match pattern.into().compile() {
                Ok(regex) => regex.is_match(&text),
                Err(error) => {
                    self.record_result(false, format!("{} ({})", message, error));
                    return;
                }
            },
        };
        self.assert(caught, message);
    }

    /// Pass when both operands serialize to arrays of equal length with
    /// equal elements
    fn assert_array_equals<A, B>(&mut self, a: &A, b: &B, message: impl Into<String>)
    where
        A: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        self.assert_array_equals_by(a, b, message, same_value);
    }

    /// Like [`Assert::assert_array_equals`] with a custom element equality
    fn assert_array_equals_by<A, B>(
        &mut self,
        a: &A,
        b: &B,
        message: impl Into<String>,
        equality: impl Fn(&Value, &Value) -> bool,
    ) where
        A: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        if !self.is_running_context_ok() {
            return;
        }
        let equal = match (as_array(a), as_array(b)) {
            (Some(a), Some(b)) => rows_equal(&a, &b, &equality),
            _ => false,
        };
        self.assert(equal, message);
    }

    /// Pass when `value` is an array whose every element is an array
    fn assert_is_2d_array<A: Serialize + ?Sized>(&mut self, value: &A, message: impl Into<String>) {
        if !self.is_running_context_ok() {
            return;
        }
        self.assert(as_2d_array(value).is_some(), message);
    }

    /// Like [`Assert::assert_is_2d_array`] on the value produced by
    /// `producer`; a failing producer fails the assertion
    fn assert_is_2d_array_with<T: Serialize, E: Display>(
        &mut self,
        producer: impl FnOnce() -> Result<T, E>,
        message: impl Into<String>,
    ) {
        if !self.is_running_context_ok() {
            return;
        }
        let message = message.into();
        match catch_failure(|| producer().map_err(|e| e.to_string())) {
            Ok(value) => self.assert(as_2d_array(&value).is_some(), message),
            Err(error) => self.record_result(false, format!("{} ({})", message, error)),
        }
    }

    /// Pass when both operands are 2-D arrays with the same shape and equal
    /// elements
    fn assert_2d_array_equals<A, B>(&mut self, a: &A, b: &B, message: impl Into<String>)
    where
        A: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        self.assert_2d_array_equals_by(a, b, message, same_value);
    }

    fn assert_2d_array_equals_by<A, B>(
        &mut self,
        a: &A,
        b: &B,
        message: impl Into<String>,
        equality: impl Fn(&Value, &Value) -> bool,
    ) where
        A: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        if !self.is_running_context_ok() {
            return;
        }
        let equal = match (as_2d_array(a), as_2d_array(b)) {
            (Some(a), Some(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(&b)
                        .all(|(row_a, row_b)| rows_equal(row_a, row_b, &equality))
            }
            _ => false,
        };
        self.assert(equal, message);
    }

    /// Remember the current end of the capture window
    fn start_capture_log(&mut self) {
        if !self.is_running_context_ok() {
            return;
        }
        let length = self.capture_source().current_length();
        self.set_capture_offset(length);
    }

    /// Pass when the captured text contains exactly one match of `pattern`
    fn assert_log_match(&mut self, pattern: impl Into<Pattern>, message: impl Into<String>) {
        self.assert_log_match_count(pattern, message, 1);
    }

    /// Pass when the captured text contains exactly `count` matches
    fn assert_log_match_count(
        &mut self,
        pattern: impl Into<Pattern>,
        message: impl Into<String>,
        count: usize,
    ) {
        let offset = self.capture_offset();
        self.assert_log_match_from(pattern, message, count, offset);
    }

    /// Count non-overlapping matches of `pattern` in the text captured
    /// from `offset`
    fn assert_log_match_from(
        &mut self,
        pattern: impl Into<Pattern>,
        message: impl Into<String>,
        count: usize,
        offset: usize,
    ) {
        if !self.is_running_context_ok() {
            return;
        }
        let message = message.into();
        let captured = self.capture_source().slice_from(offset);
        match pattern.into().compile() {
            Ok(regex) => self.assert(regex.find_iter(&captured).count() == count, message),
            Err(error) => self.record_result(false, format!("{} ({})", message, error)),
        }
    }

    /// Pass when none of `patterns` matches the captured text
    fn assert_log_not_match<P: Into<Pattern>>(
        &mut self,
        patterns: impl IntoIterator<Item = P>,
        message: impl Into<String>,
    ) {
        let offset = self.capture_offset();
        self.assert_log_not_match_from(patterns, message, offset);
    }

    fn assert_log_not_match_from<P: Into<Pattern>>(
        &mut self,
        patterns: impl IntoIterator<Item = P>,
        message: impl Into<String>,
        offset: usize,
    ) {
        if !self.is_running_context_ok() {
            return;
        }
        let message = message.into();
        let captured = self.capture_source().slice_from(offset);
        let mut clean = true;
        for pattern in patterns {
            match pattern.into().compile() {
                Ok(regex) => clean &= !regex.is_match(&captured),
                Err(error) => {
                    self.record_result(false, format!("{} ({})", message, error));
                    return;
                }
            }
        }
        self.assert(clean, message);
    }
}

fn as_array<A: Serialize + ?Sized>(value: &A) -> Option<Vec<Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

fn as_2d_array<A: Serialize + ?Sized>(value: &A) -> Option<Vec<Vec<Value>>> {
    as_array(value)?
        .into_iter()
        .map(|row| match row {
            Value::Array(items) => Some(items),
            _ => None,
        })
        .collect()
}

/// Default element equality: numbers compare by value, so `12` equals `12.0`
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, value)| y.get(key).map_or(false, |other| same_value(value, other)))
        }
        _ => a == b,
    }
}

fn rows_equal(a: &[Value], b: &[Value], equality: &impl Fn(&Value, &Value) -> bool) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equality(x, y))
}
