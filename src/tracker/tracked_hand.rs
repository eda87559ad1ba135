//! A single hand re-identified across frames.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detection::Detection;
use crate::geometry::{Point, Rect, distance};
use crate::tracker::hand_state::HandState;

/// Opaque per-stream handle, valid while the hand stays re-identifiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandId(pub u64);

impl fmt::Display for HandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hand-{}", self.0)
    }
}

/// A recorded centre and the frame timestamp it was observed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub point: Point,
    pub timestamp: f64,
}

/// Tracked hand and its pick-cycle state.
#[derive(Debug, Clone)]
pub struct TrackedHand {
    pub id: HandId,
    /// Bounded history of centres, oldest first
    pub recent_positions: VecDeque<PositionSample>,
    /// Latest matched bounding box
    pub bbox: Rect,
    /// Latest detection confidence
    pub confidence: f32,
    pub first_seen: f64,
    pub last_seen: f64,
    /// Number of detections matched to this hand
    pub hits: u32,
    pub state: HandState,
    /// Container zone of the current dwell
    pub zone_id: Option<String>,
    pub zone_entry_time: Option<f64>,
    pub zone_exit_time: Option<f64>,
    pub tool_seen_in_zone: bool,
    pub reached_destination: bool,
    /// Set after a long non-picking dwell; cleared once the hand leaves the zone.
    pub awaiting_zone_exit: bool,
    capacity: usize,
}

impl TrackedHand {
    pub fn new(id: HandId, detection: &Detection, now: f64, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut recent_positions = VecDeque::with_capacity(capacity);
        recent_positions.push_back(PositionSample {
            point: detection.center(),
            timestamp: now,
        });
        Self {
            id,
            recent_positions,
            bbox: detection.bbox,
            confidence: detection.confidence,
            first_seen: now,
            last_seen: now,
            hits: 1,
            state: HandState::Outside,
            zone_id: None,
            zone_entry_time: None,
            zone_exit_time: None,
            tool_seen_in_zone: false,
            reached_destination: false,
            awaiting_zone_exit: false,
            capacity,
        }
    }

    /// Record a matched detection.
    pub fn update(&mut self, detection: &Detection, now: f64) {
        if self.recent_positions.len() == self.capacity {
            self.recent_positions.pop_front();
        }
        self.recent_positions.push_back(PositionSample {
            point: detection.center(),
            timestamp: now,
        });
        self.bbox = detection.bbox;
        self.confidence = detection.confidence;
        self.last_seen = now;
        self.hits += 1;
    }

    /// Most recent centre.
    pub fn position(&self) -> Point {
        self.recent_positions
            .back()
            .map(|s| s.point)
            .unwrap_or_else(|| self.bbox.center())
    }

    /// Seconds since the hand was last matched.
    pub fn time_since_seen(&self, now: f64) -> f64 {
        now - self.last_seen
    }

    /// Time spent in the zone so far, measured from entry.
    pub fn dwell_time(&self, now: f64) -> Option<f64> {
        self.zone_entry_time.map(|entry| now - entry)
    }

    /// Average speed over the recorded history, in units per second.
    pub fn speed(&self) -> Option<f32> {
        let first = self.recent_positions.front()?;
        let last = self.recent_positions.back()?;
        let elapsed = last.timestamp - first.timestamp;
        if elapsed <= 0.0 {
            return None;
        }
        let path: f32 = self
            .recent_positions
            .iter()
            .zip(self.recent_positions.iter().skip(1))
            .map(|(a, b)| distance(&a.point, &b.point))
            .sum();
        Some(path / elapsed as f32)
    }

    /// Start a fresh dwell in `zone_id`.
    pub fn begin_dwell(&mut self, zone_id: &str, now: f64) {
        self.state = HandState::Entering;
        self.zone_id = Some(zone_id.to_string());
        self.zone_entry_time = Some(now);
        self.zone_exit_time = None;
        self.tool_seen_in_zone = false;
        self.reached_destination = false;
    }

    /// Drop all pick-cycle state; identity and position history are kept.
    pub fn reset_cycle(&mut self) {
        self.state = HandState::Outside;
        self.zone_id = None;
        self.zone_entry_time = None;
        self.zone_exit_time = None;
        self.tool_seen_in_zone = false;
        self.reached_destination = false;
    }
}
