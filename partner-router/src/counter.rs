//! The seen-message counter.
//!
//! Counts every message that reaches the router, forwarded or not, and is
//! zeroed on each window tick. The value is mirrored to a `metrics` gauge;
//! without an installed recorder that is a no-op.

use metrics::{describe_gauge, gauge};

/// Gauge mirroring [`MessageCounter`].
pub const MESSAGE_COUNT_GAUGE: &str = "partner_router_message_count";

/// Registers the gauge description with the installed recorder.
pub(crate) fn describe_metrics() {
    describe_gauge!(
        MESSAGE_COUNT_GAUGE,
        "Messages seen by the partner router since the last window tick"
    );
}

/// Per-worker count of messages seen in the current window.
#[derive(Clone, Copy, Debug, Default)]
pub struct MessageCounter {
    count: u64,
}

impl MessageCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self) {
        self.count += 1;
        self.publish();
    }

    /// Zeroes the counter for the next window.
    pub fn reset(&mut self) {
        self.count = 0;
        self.publish();
    }

    pub fn get(&self) -> u64 {
        self.count
    }

    #[allow(clippy::cast_precision_loss)]
    fn publish(&self) {
        gauge!(MESSAGE_COUNT_GAUGE).set(self.count as f64);
    }
}
