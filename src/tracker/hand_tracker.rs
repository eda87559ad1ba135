//! Frame-to-frame hand re-identification without detector-provided ids.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::MonitorConfig;
use crate::detection::Detection;
use crate::geometry::Point;
use crate::tracker::matching::{self, AssignmentResult};
use crate::tracker::tracked_hand::{HandId, TrackedHand};

/// Owns every hand of one stream, keyed by handle.
///
/// Handles are allocated from a per-tracker counter, so two trackers never
/// share identity state.
#[derive(Debug, Clone)]
pub struct HandTracker {
    hands: BTreeMap<HandId, TrackedHand>,
    next_id: u64,
    association_radius: f32,
    stale_timeout: f64,
    position_history: usize,
}

impl HandTracker {
    pub fn new(association_radius: f32, stale_timeout: f64, position_history: usize) -> Self {
        Self {
            hands: BTreeMap::new(),
            next_id: 0,
            association_radius,
            stale_timeout,
            position_history,
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(
            config.association_radius,
            config.stale_timeout,
            config.position_history,
        )
    }

    fn next_hand_id(&mut self) -> HandId {
        self.next_id += 1;
        HandId(self.next_id)
    }

    /// Match this frame's hand detections to known hands, creating hands for
    /// the rest. Returns the handle serving each detection, in input order.
    ///
    /// Only hands seen within the stale timeout are candidates, and each
    /// hand serves at most one detection per frame.
    pub fn update(&mut self, detections: &[&Detection], now: f64) -> Vec<HandId> {
        let candidates: Vec<HandId> = self
            .hands
            .values()
            .filter(|h| h.time_since_seen(now) <= self.stale_timeout)
            .map(|h| h.id)
            .collect();

        let track_positions: Vec<Point> = candidates
            .iter()
            .filter_map(|id| self.hands.get(id).map(|h| h.position()))
            .collect();
        let det_positions: Vec<Point> = detections.iter().map(|d| d.center()).collect();

        let dists = matching::distance_matrix(&track_positions, &det_positions);
        let AssignmentResult {
            matches,
            unmatched_detections,
            ..
        } = matching::nearest_neighbor_assignment(&dists, self.association_radius);

        let mut assigned: Vec<Option<HandId>> = vec![None; detections.len()];

        for (itrack, idet) in matches {
            let id = candidates[itrack];
            if let Some(hand) = self.hands.get_mut(&id) {
                hand.update(detections[idet], now);
                assigned[idet] = Some(id);
            }
        }

        for idet in unmatched_detections {
            let id = self.next_hand_id();
            let hand = TrackedHand::new(id, detections[idet], now, self.position_history);
            debug!("New hand {} at ({:.1}, {:.1})", id, hand.position().x, hand.position().y);
            self.hands.insert(id, hand);
            assigned[idet] = Some(id);
        }

        assigned.into_iter().flatten().collect()
    }

    /// Remove hands not matched for longer than the stale timeout.
    pub fn evict_stale(&mut self, now: f64) -> Vec<TrackedHand> {
        let stale: Vec<HandId> = self
            .hands
            .values()
            .filter(|h| h.time_since_seen(now) > self.stale_timeout)
            .map(|h| h.id)
            .collect();

        stale
            .into_iter()
            .filter_map(|id| self.hands.remove(&id))
            .inspect(|hand| {
                debug!(
                    "Evicted stale hand {} in state {:?} (unseen for {:.2}s)",
                    hand.id,
                    hand.state,
                    hand.time_since_seen(now)
                )
            })
            .collect()
    }

    pub fn get(&self, id: HandId) -> Option<&TrackedHand> {
        self.hands.get(&id)
    }

    pub fn get_mut(&mut self, id: HandId) -> Option<&mut TrackedHand> {
        self.hands.get_mut(&id)
    }

    pub fn remove(&mut self, id: HandId) -> Option<TrackedHand> {
        self.hands.remove(&id)
    }

    pub fn hands(&self) -> impl Iterator<Item = &TrackedHand> {
        self.hands.values()
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    /// Forget every hand. Handles are never reused.
    pub fn clear(&mut self) {
        self.hands.clear();
    }
}
