//! Metric helpers for `depthframe`.
//!
//! This module defines metric names and small helpers wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. With the `metrics` feature
//! disabled every helper compiles to a no-op.

#[cfg(feature = "metrics")]
use metrics::counter;

use crate::frame::FrameOutcome;

/// Name of the counter tracking datagrams read from the socket.
pub const DATAGRAMS_RECEIVED: &str = "depthframe_datagrams_received_total";
/// Name of the counter tracking datagrams discarded, labelled by `reason`.
pub const DATAGRAMS_DISCARDED: &str = "depthframe_datagrams_discarded_total";
/// Name of the counter tracking frames handed to the consumer, labelled by
/// `outcome`.
pub const FRAMES_DELIVERED: &str = "depthframe_frames_delivered_total";
/// Name of the counter tracking frames dropped because the consumer lagged.
pub const FRAMES_DROPPED: &str = "depthframe_frames_dropped_total";
/// Name of the counter tracking socket receive failures.
pub const RECEIVE_ERRORS: &str = "depthframe_receive_errors_total";

/// Record a datagram read from the socket.
pub fn inc_datagrams() {
    #[cfg(feature = "metrics")]
    counter!(DATAGRAMS_RECEIVED).increment(1);
}

/// Record a discarded datagram.
pub fn inc_discarded(reason: &'static str) {
    #[cfg(feature = "metrics")]
    counter!(DATAGRAMS_DISCARDED, "reason" => reason).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = reason;
}

/// Record a frame handed to the consumer.
pub fn inc_frames(outcome: FrameOutcome) {
    #[cfg(feature = "metrics")]
    counter!(FRAMES_DELIVERED, "outcome" => outcome.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = outcome;
}

/// Record a frame dropped because the consumer channel was full.
pub fn inc_dropped() {
    #[cfg(feature = "metrics")]
    counter!(FRAMES_DROPPED).increment(1);
}

/// Record a socket receive failure.
pub fn inc_receive_errors() {
    #[cfg(feature = "metrics")]
    counter!(RECEIVE_ERRORS).increment(1);
}
