//! Drives each tracked hand through enter → dwell → exit → destination and
//! decides at the destination whether the pick was made without a tool.

use tracing::{debug, warn};

use crate::config::MonitorConfig;
use crate::detection::{Detection, ObjectClass};
use crate::interaction::{HandPredicates, InteractionResolver};
use crate::tracker::{HandState, HandTracker, TrackedHand};
use crate::violation::cooldown::CooldownTable;
use crate::violation::event::{Severity, VIOLATION_TYPE, ViolationEvent};
use crate::zones::ZoneRegistry;

/// Per-frame inputs besides the detections themselves.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub stream_id: &'a str,
    pub frame_id: u64,
    /// Seconds, monotonic within a stream
    pub timestamp: f64,
    /// Height of the frame the detections are expressed in
    pub frame_height: f32,
}

/// What happened while processing one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameOutcome {
    pub events: Vec<ViolationEvent>,
    pub hands_created: usize,
    pub hands_evicted: usize,
    pub suppressed_by_cooldown: usize,
    /// Invalid or low-confidence detections skipped
    pub detections_ignored: usize,
}

/// Judgement of a completed pick cycle.
#[derive(Debug, Clone, PartialEq)]
struct Resolution {
    tool_seen: bool,
    zone_id: String,
    dwell_duration: f64,
}

/// Pick-cycle state for one stream: the hands, their cooldowns, and the
/// thresholds that move them between states.
#[derive(Debug, Clone)]
pub struct ViolationStateMachine {
    tracker: HandTracker,
    cooldown: CooldownTable,
    resolver: InteractionResolver,
    picking_time_threshold: f64,
    max_dwell_time: f64,
    min_confidence: f32,
}

impl ViolationStateMachine {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            tracker: HandTracker::from_config(config),
            cooldown: CooldownTable::new(config.violation_cooldown),
            resolver: InteractionResolver::from_config(config),
            picking_time_threshold: config.picking_time_threshold,
            max_dwell_time: config.max_dwell_time,
            min_confidence: config.min_confidence,
        }
    }

    pub fn tracker(&self) -> &HandTracker {
        &self.tracker
    }

    pub fn cooldown(&self) -> &CooldownTable {
        &self.cooldown
    }

    pub fn active_hands(&self) -> usize {
        self.tracker.len()
    }

    /// Forget every hand and cooldown.
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.cooldown.clear();
    }

    /// Process one frame to completion: evict stale hands, re-identify hands,
    /// resolve interactions and advance every matched hand.
    pub fn process(
        &mut self,
        ctx: &FrameContext<'_>,
        detections: &[Detection],
        zones: &ZoneRegistry,
    ) -> FrameOutcome {
        let now = ctx.timestamp;
        let mut outcome = FrameOutcome::default();

        for hand in self.tracker.evict_stale(now) {
            self.cooldown.remove(hand.id);
            outcome.hands_evicted += 1;
        }
        self.cooldown.prune(now);

        let mut hands = Vec::new();
        let mut tools = Vec::new();
        let mut destinations = Vec::new();
        for det in detections {
            if !det.is_valid() || det.confidence < self.min_confidence {
                outcome.detections_ignored += 1;
                continue;
            }
            match det.class {
                ObjectClass::Hand => hands.push(det),
                ObjectClass::Tool => tools.push(det),
                ObjectClass::Destination => destinations.push(det),
                ObjectClass::Person | ObjectClass::Other => {}
            }
        }

        let known = self.tracker.len();
        let ids = self.tracker.update(&hands, now);
        outcome.hands_created = self.tracker.len() - known;

        for id in ids {
            let Some(hand) = self.tracker.get_mut(id) else {
                continue;
            };
            let predicates =
                self.resolver
                    .resolve(&hand.bbox, &tools, &destinations, ctx.frame_height);

            let Some(resolution) = advance(
                hand,
                zones,
                predicates,
                now,
                self.picking_time_threshold,
                self.max_dwell_time,
            ) else {
                continue;
            };

            if resolution.tool_seen {
                debug!(
                    "Hand {} delivered from {} with a tool after {:.2}s",
                    hand.id, resolution.zone_id, resolution.dwell_duration
                );
            } else if self.cooldown.in_cooldown(hand.id, now) {
                debug!("Hand {} violation suppressed by cooldown", hand.id);
                outcome.suppressed_by_cooldown += 1;
            } else {
                let event = violation_event(ctx, hand, &resolution);
                warn!(
                    "VIOLATION in stream {} frame {}: hand {} took from {} without a tool (dwell {:.2}s)",
                    ctx.stream_id, ctx.frame_id, hand.id, resolution.zone_id, resolution.dwell_duration
                );
                self.cooldown.record(hand.id, now);
                outcome.events.push(event);
            }

            hand.reset_cycle();
        }

        outcome
    }
}

fn violation_event(ctx: &FrameContext<'_>, hand: &TrackedHand, resolution: &Resolution) -> ViolationEvent {
    ViolationEvent {
        id: format!("{}-{}-{}", ctx.stream_id, ctx.frame_id, hand.id),
        kind: VIOLATION_TYPE.to_string(),
        severity: Severity::High,
        confidence: hand.confidence,
        bbox: hand.bbox,
        timestamp: ctx.timestamp,
        frame_id: ctx.frame_id,
        stream_id: ctx.stream_id.to_string(),
        dwell_duration: resolution.dwell_duration,
        hand_id: hand.id,
        zone_id: resolution.zone_id.clone(),
        message: format!(
            "Ingredient taken from {} without a scooper.",
            resolution.zone_id
        ),
    }
}

/// Apply one frame's observation to a hand. Returns a resolution when the
/// hand reaches a destination after a completed dwell.
fn advance(
    hand: &mut TrackedHand,
    zones: &ZoneRegistry,
    predicates: HandPredicates,
    now: f64,
    picking_time_threshold: f64,
    max_dwell_time: f64,
) -> Option<Resolution> {
    let position = hand.position();
    let in_current_zone = hand
        .zone_id
        .as_deref()
        .and_then(|id| zones.get(id))
        .is_some_and(|z| z.active && z.kind.is_container() && z.contains_point(&position));
    let entered = zones.first_container_containing(&position).map(|z| z.id.as_str());

    match hand.state {
        HandState::Outside | HandState::Resolved => {
            match entered {
                Some(zone_id) if !hand.awaiting_zone_exit => {
                    enter(hand, zone_id, predicates, now);
                }
                Some(_) => {}
                None => hand.awaiting_zone_exit = false,
            }
            None
        }
        HandState::Entering | HandState::Dwelling if in_current_zone => {
            hand.tool_seen_in_zone |= predicates.tool_associated;
            let dwell = hand.dwell_time(now).unwrap_or(0.0);
            if dwell >= max_dwell_time {
                debug!(
                    "Hand {} stayed {:.2}s without leaving, treating as non-picking",
                    hand.id, dwell
                );
                hand.reset_cycle();
                hand.awaiting_zone_exit = true;
            } else if hand.state == HandState::Entering && dwell >= picking_time_threshold {
                debug!("Hand {} picking after {:.2}s", hand.id, dwell);
                hand.state = HandState::Dwelling;
            }
            None
        }
        HandState::Entering => {
            debug!("Hand {} passed through without picking", hand.id);
            hand.reset_cycle();
            if let Some(zone_id) = entered {
                enter(hand, zone_id, predicates, now);
            }
            None
        }
        HandState::Dwelling => {
            debug!("Hand {} left {:?}", hand.id, hand.zone_id);
            hand.state = HandState::ExitedPendingDestination;
            hand.zone_exit_time = Some(now);
            pending_destination(hand, entered, predicates, now)
        }
        HandState::ExitedPendingDestination => {
            pending_destination(hand, entered, predicates, now)
        }
    }
}

fn enter(hand: &mut TrackedHand, zone_id: &str, predicates: HandPredicates, now: f64) {
    debug!("Hand {} entered {}", hand.id, zone_id);
    hand.begin_dwell(zone_id, now);
    hand.tool_seen_in_zone = predicates.tool_associated;
}

fn pending_destination(
    hand: &mut TrackedHand,
    entered: Option<&str>,
    predicates: HandPredicates,
    now: f64,
) -> Option<Resolution> {
    if let Some(zone_id) = entered {
        // Re-entry before any delivery starts a fresh dwell.
        enter(hand, zone_id, predicates, now);
        return None;
    }
    if !predicates.near_destination {
        return None;
    }

    hand.reached_destination = true;
    hand.state = HandState::Resolved;
    let dwell_duration = match (hand.zone_entry_time, hand.zone_exit_time) {
        (Some(entry), Some(exit)) => exit - entry,
        _ => 0.0,
    };
    Some(Resolution {
        tool_seen: hand.tool_seen_in_zone,
        zone_id: hand.zone_id.clone().unwrap_or_default(),
        dwell_duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::zones::{Zone, ZoneKind};

    fn zones() -> ZoneRegistry {
        ZoneRegistry::from_zones([Zone::new(
            "roi_1",
            "Protein",
            Rect::from_tlbr(100.0, 100.0, 200.0, 200.0),
            ZoneKind::ProteinContainer,
        )])
    }

    fn config() -> MonitorConfig {
        MonitorConfig {
            association_radius: 300.0,
            picking_time_threshold: 0.2,
            ..MonitorConfig::default()
        }
    }

    fn hand(x: f32, y: f32) -> Detection {
        Detection::from_rect(ObjectClass::Hand, Rect::from_xywh(x, y, 40.0, 40.0), 0.9)
    }

    fn pizza(x: f32, y: f32) -> Detection {
        Detection::from_rect(ObjectClass::Destination, Rect::from_xywh(x, y, 100.0, 100.0), 0.9)
    }

    fn step(
        machine: &mut ViolationStateMachine,
        zones: &ZoneRegistry,
        frame_id: u64,
        t: f64,
        dets: &[Detection],
    ) -> FrameOutcome {
        let ctx = FrameContext {
            stream_id: "cam",
            frame_id,
            timestamp: t,
            frame_height: 480.0,
        };
        machine.process(&ctx, dets, zones)
    }

    fn state_of_only_hand(machine: &ViolationStateMachine) -> HandState {
        machine.tracker().hands().next().map(|h| h.state).unwrap_or_default()
    }

    #[test]
    fn test_states_progress_through_cycle() {
        let zones = zones();
        let mut m = ViolationStateMachine::new(&config());

        step(&mut m, &zones, 0, 0.0, &[hand(300.0, 300.0)]);
        assert_eq!(state_of_only_hand(&m), HandState::Outside);

        step(&mut m, &zones, 1, 0.1, &[hand(150.0, 150.0)]);
        assert_eq!(state_of_only_hand(&m), HandState::Entering);

        step(&mut m, &zones, 2, 0.4, &[hand(150.0, 150.0)]);
        assert_eq!(state_of_only_hand(&m), HandState::Dwelling);

        step(&mut m, &zones, 3, 0.5, &[hand(250.0, 250.0)]);
        assert_eq!(state_of_only_hand(&m), HandState::ExitedPendingDestination);

        let out = step(&mut m, &zones, 4, 0.6, &[hand(250.0, 400.0), pizza(260.0, 410.0)]);
        assert_eq!(out.events.len(), 1);
        assert_eq!(state_of_only_hand(&m), HandState::Outside);

        let event = &out.events[0];
        assert_eq!(event.kind, VIOLATION_TYPE);
        assert_eq!(event.zone_id, "roi_1");
        assert_eq!(event.frame_id, 4);
        assert!((event.dwell_duration - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_pass_through_is_not_a_pick() {
        let zones = zones();
        let mut m = ViolationStateMachine::new(&config());
        step(&mut m, &zones, 0, 0.0, &[hand(150.0, 150.0)]);
        step(&mut m, &zones, 1, 0.1, &[hand(150.0, 250.0)]);
        assert_eq!(state_of_only_hand(&m), HandState::Outside);
        let out = step(&mut m, &zones, 2, 0.2, &[hand(150.0, 400.0), pizza(150.0, 400.0)]);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_long_dwell_is_abandoned_until_hand_leaves() {
        let zones = zones();
        let mut m = ViolationStateMachine::new(&config());
        for i in 0..=30 {
            step(&mut m, &zones, i, i as f64 * 0.1, &[hand(150.0, 150.0)]);
        }
        // 3.0s in the zone exceeds the 2.5s max dwell.
        assert_eq!(state_of_only_hand(&m), HandState::Outside);
        assert!(m.tracker().hands().next().unwrap().awaiting_zone_exit);

        let out = step(&mut m, &zones, 31, 3.1, &[hand(150.0, 400.0), pizza(150.0, 400.0)]);
        assert!(out.events.is_empty());
        assert!(!m.tracker().hands().next().unwrap().awaiting_zone_exit);
    }

    #[test]
    fn test_reentry_restarts_dwell() {
        let zones = zones();
        let mut m = ViolationStateMachine::new(&config());
        step(&mut m, &zones, 0, 0.0, &[hand(150.0, 150.0)]);
        step(&mut m, &zones, 1, 0.3, &[hand(150.0, 150.0)]);
        step(&mut m, &zones, 2, 0.4, &[hand(150.0, 250.0)]);
        assert_eq!(state_of_only_hand(&m), HandState::ExitedPendingDestination);

        step(&mut m, &zones, 3, 0.5, &[hand(150.0, 150.0)]);
        let h = m.tracker().hands().next().unwrap();
        assert_eq!(h.state, HandState::Entering);
        assert_eq!(h.zone_entry_time, Some(0.5));
        assert_eq!(h.zone_exit_time, None);
    }

    #[test]
    fn test_tool_during_dwell_suppresses_violation() {
        let zones = zones();
        let mut m = ViolationStateMachine::new(&config());
        let tool = Detection::from_rect(ObjectClass::Tool, Rect::from_xywh(155.0, 155.0, 20.0, 20.0), 0.8);
        step(&mut m, &zones, 0, 0.0, &[hand(150.0, 150.0)]);
        step(&mut m, &zones, 1, 0.1, &[hand(150.0, 150.0), tool]);
        step(&mut m, &zones, 2, 0.3, &[hand(150.0, 150.0)]);
        let out = step(&mut m, &zones, 3, 0.4, &[hand(150.0, 400.0), pizza(160.0, 410.0)]);
        assert!(out.events.is_empty());
        assert_eq!(state_of_only_hand(&m), HandState::Outside);
    }

    #[test]
    fn test_ignores_invalid_and_low_confidence() {
        let zones = zones();
        let mut m = ViolationStateMachine::new(&MonitorConfig {
            min_confidence: 0.5,
            ..config()
        });
        let weak = Detection::from_rect(ObjectClass::Hand, Rect::from_xywh(150.0, 150.0, 40.0, 40.0), 0.2);
        let broken = Detection::new(ObjectClass::Hand, 10.0, 10.0, 5.0, 5.0, 0.9);
        let out = step(&mut m, &zones, 0, 0.0, &[weak, broken, hand(300.0, 300.0)]);
        assert_eq!(out.detections_ignored, 2);
        assert_eq!(out.hands_created, 1);
    }

    #[test]
    fn test_stale_hand_evicted_with_cooldown() {
        let zones = zones();
        let mut m = ViolationStateMachine::new(&config());
        step(&mut m, &zones, 0, 0.0, &[hand(150.0, 150.0)]);
        step(&mut m, &zones, 1, 0.3, &[hand(150.0, 150.0)]);
        step(&mut m, &zones, 2, 0.4, &[hand(150.0, 400.0), pizza(150.0, 400.0)]);
        assert_eq!(m.cooldown().len(), 1);

        let out = step(&mut m, &zones, 3, 2.5, &[]);
        assert_eq!(out.hands_evicted, 1);
        assert_eq!(m.active_hands(), 0);
        assert!(m.cooldown().is_empty());
    }
}
