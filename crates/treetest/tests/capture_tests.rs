use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::layer::SubscriberExt;
use treetest::prelude::*;
use treetest::{CaptureBuffer, CaptureLayer, CaptureSource, Context, Standalone};

fn code_under_test(value: i32) -> i32 {
    if value < 0 {
        tracing::warn!(value, "negative input clamped");
        return 0;
    }
    tracing::info!("computing square");
    value * value
}

#[test]
fn test_tracing_events_reach_the_capture_window() {
    let buffer = CaptureBuffer::new();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(buffer.clone()));

    let context = Context::detached().with_capture(Rc::new(buffer.clone()));
    let mut test = Test::new(
        "clamp",
        |t, _| {
            t.start_capture_log();
            t.assert(code_under_test(-3) == 0, "clamped");
            t.assert_log_match(r"WARN: negative input clamped value=-3", "warning logged");
            t.assert_log_not_match(["computing"], "no computation");
            Ok(())
        },
        context,
        Vec::new(),
    );

    tracing::subscriber::with_default(subscriber, || test.execute()).unwrap();
    assert_eq!(test.info().failed_assertion_count(), 0);
    assert_eq!(test.info().passed_assertion_count(), 3);
}

#[test]
fn test_engine_diagnostics_are_not_captured() {
    let buffer = CaptureBuffer::new();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(buffer.clone()));

    let mut section = Container::new(
        "quiet",
        |s| {
            s.test("t", |t, _| {
                t.assert(true, "ok");
                Ok(())
            });
            Ok(())
        },
        Context::detached(),
    );
    tracing::subscriber::with_default(subscriber, || section.execute()).unwrap();

    assert_eq!(buffer.current_length(), 0);
}

#[test]
fn test_reset_empties_the_store() {
    let buffer = CaptureBuffer::new();
    buffer.append("abc");
    assert_eq!(buffer.slice_from(1), "bc");
    buffer.reset();
    assert_eq!(buffer.current_length(), 0);
    assert_eq!(buffer.slice_from(1), "");
}

#[test]
fn test_standalone_capture_and_counts() {
    let buffer = CaptureBuffer::new();
    let lines = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&lines);
    let mut runner = Standalone::new()
        .with_capture(Rc::new(buffer.clone()))
        .with_sink(move |msg| sink.borrow_mut().push(msg.to_string()));

    runner.start_capture_log();
    buffer.log("dummyLogFunction called");
    runner.assert_log_match("dummyLogFunction", "Log of dummyLogFunction are the waited one");
    runner.assert_log_not_match(["error"], "no error");
    runner.assert(Condition::fallible(|| Err::<bool, _>("bad")), "fallible");

    // only assertion counts exist in the flat runner
    assert_eq!(runner.passed_assertion_count(), 2);
    assert_eq!(runner.failed_assertion_count(), 1);
    assert_eq!(
        lines.borrow().last().map(String::as_str),
        Some("❌ FAILED: fallible (bad)")
    );
}
