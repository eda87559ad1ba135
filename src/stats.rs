//! Aggregate counters and the bounded recent-violation history.

use std::collections::VecDeque;

use serde::Serialize;

use crate::violation::ViolationEvent;

/// Counters for one stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamStatistics {
    pub frames_processed: u64,
    pub violations: u64,
    pub suppressed_by_cooldown: u64,
    pub hands_created: u64,
    pub hands_evicted: u64,
    /// Malformed, invalid or low-confidence detections skipped
    pub dropped_detections: u64,
    pub active_tracked_hands: usize,
    pub last_timestamp: Option<f64>,
}

/// Counters across every stream of a monitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total_violations: u64,
    pub active_tracked_hands: usize,
    pub frames_processed: u64,
    pub streams: usize,
}

/// Newest-first history of emitted violations with fixed capacity.
#[derive(Debug, Clone)]
pub struct ViolationHistory {
    capacity: usize,
    events: VecDeque<ViolationEvent>,
}

impl ViolationHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: ViolationEvent) {
        if self.capacity == 0 {
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_back();
        }
        self.events.push_front(event);
    }

    pub fn retain_streams_except(&mut self, stream_id: &str) {
        self.events.retain(|e| e.stream_id != stream_id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViolationEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
