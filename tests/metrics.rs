//! Tests for `depthframe` metrics helpers.
//!
//! These tests verify that counters update as expected using
//! `metrics_util::debugging::DebuggingRecorder`.
#![cfg(feature = "metrics")]

use depthframe::{frame::FrameOutcome, metrics};
use metrics_util::{
    CompositeKey,
    debugging::{DebugValue, DebuggingRecorder, Snapshotter},
};
use rstest::rstest;

fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

type Entry = (CompositeKey, Option<::metrics::Unit>, Option<::metrics::SharedString>, DebugValue);

fn counter_value(entries: &[Entry], name: &str, label: Option<(&str, &str)>) -> u64 {
    entries
        .iter()
        .filter(|(k, _, _, _)| {
            k.key().name() == name
                && label.is_none_or(|(key, value)| {
                    k.key()
                        .labels()
                        .any(|l| l.key() == key && l.value() == value)
                })
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(c) => *c,
            other => panic!("unexpected metric value {other:?}"),
        })
        .sum()
}

#[rstest]
#[case(FrameOutcome::Complete, "complete")]
#[case(FrameOutcome::TimedOut, "timed_out")]
#[case(FrameOutcome::Superseded, "superseded")]
fn delivered_frames_are_labelled_by_outcome(#[case] outcome: FrameOutcome, #[case] label: &str) {
    let (snapshotter, recorder) = debugging_recorder_setup();
    ::metrics::with_local_recorder(&recorder, || metrics::inc_frames(outcome));
    let entries = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_value(&entries, metrics::FRAMES_DELIVERED, Some(("outcome", label))),
        1
    );
}

#[test]
fn discarded_datagrams_are_labelled_by_reason() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    ::metrics::with_local_recorder(&recorder, || {
        metrics::inc_discarded("bad_magic");
        metrics::inc_discarded("bad_magic");
        metrics::inc_discarded("orphaned");
    });
    let entries = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_value(&entries, metrics::DATAGRAMS_DISCARDED, Some(("reason", "bad_magic"))),
        2
    );
    assert_eq!(
        counter_value(&entries, metrics::DATAGRAMS_DISCARDED, Some(("reason", "orphaned"))),
        1
    );
}

#[test]
fn socket_counters_increment() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    ::metrics::with_local_recorder(&recorder, || {
        metrics::inc_datagrams();
        metrics::inc_datagrams();
        metrics::inc_dropped();
        metrics::inc_receive_errors();
    });
    let entries = snapshotter.snapshot().into_vec();

    assert_eq!(counter_value(&entries, metrics::DATAGRAMS_RECEIVED, None), 2);
    assert_eq!(counter_value(&entries, metrics::FRAMES_DROPPED, None), 1);
    assert_eq!(counter_value(&entries, metrics::RECEIVE_ERRORS, None), 1);
}
