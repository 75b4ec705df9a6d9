use crate::constants::{EVENT_QUEUE_DEPTH, POLL_TIMEOUT, WINDOW_SIZE};
use std::time::Duration;

/// Runtime knobs for the monitor. History capacity is a const generic on
/// [`crate::History`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// History lines visible at once
    pub window_size: usize,
    /// Pending events held before producers start dropping
    pub queue_depth: usize,
    /// Dequeue timeout before an idle redraw
    pub poll_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window_size: WINDOW_SIZE,
            queue_depth: EVENT_QUEUE_DEPTH,
            poll_timeout: POLL_TIMEOUT,
        }
    }
}
