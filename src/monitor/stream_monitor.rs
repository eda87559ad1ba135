use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::detection::{Detection, RawDetection};
use crate::stats::StreamStatistics;
use crate::tracker::TrackedHand;
use crate::violation::{FrameContext, ViolationEvent, ViolationStateMachine};
use crate::zones::{Zone, ZoneRegistry};

/// All violation state of a single stream.
///
/// Owns its hands, cooldowns and (possibly rescaled) zones; nothing is shared
/// with other streams, so a monitor can be moved to its own worker thread.
#[derive(Debug, Clone)]
pub struct StreamMonitor {
    stream_id: String,
    config: MonitorConfig,
    /// Zones in reference coordinates
    base_zones: ZoneRegistry,
    /// Zones in the coordinates of incoming detections
    zones: ZoneRegistry,
    frame_size: Option<(u32, u32)>,
    machine: ViolationStateMachine,
    stats: StreamStatistics,
}

impl StreamMonitor {
    pub fn new(stream_id: &str, config: MonitorConfig, zones: ZoneRegistry) -> Self {
        let base_zones = zones.with_min_zone_size(config.min_zone_size);
        Self {
            stream_id: stream_id.to_string(),
            machine: ViolationStateMachine::new(&config),
            zones: base_zones.clone(),
            base_zones,
            frame_size: None,
            config,
            stats: StreamStatistics::default(),
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Zones as applied to incoming detections.
    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    pub fn frame_size(&self) -> Option<(u32, u32)> {
        self.frame_size
    }

    /// Replace the zone set. Zones are given in reference coordinates and
    /// rescaled to the observed frame size if one is known.
    pub fn configure_zones(&mut self, zones: impl IntoIterator<Item = Zone>) {
        self.base_zones =
            ZoneRegistry::from_zones(zones).with_min_zone_size(self.config.min_zone_size);
        self.zones = self.derive_zones();
        info!(
            "Stream {} configured with {} zones",
            self.stream_id,
            self.zones.len()
        );
    }

    /// Rescale zones from the reference size to `observed_width`x`observed_height`.
    ///
    /// Always scales from the reference coordinates, so repeated calls never compound.
    pub fn rescale_zones(&mut self, observed_width: u32, observed_height: u32) {
        self.frame_size = Some((observed_width, observed_height));
        self.zones = self.derive_zones();
        self.zones.validate(observed_width, observed_height);
    }

    /// Record the stream's frame size, rescaling zones the first time only.
    /// Returns true when a rescale happened.
    pub fn observe_frame_size(&mut self, width: u32, height: u32) -> bool {
        if self.frame_size.is_some() {
            return false;
        }
        self.rescale_zones(width, height);
        true
    }

    /// Advisory zone placement warnings against the current frame size.
    pub fn validate_zones(&self) -> Vec<String> {
        let (w, h) = self
            .frame_size
            .unwrap_or((self.config.reference_width, self.config.reference_height));
        self.zones.validate(w, h)
    }

    fn derive_zones(&self) -> ZoneRegistry {
        let mut zones = self.base_zones.clone();
        if let Some((w, h)) = self.frame_size {
            zones.rescale(
                w,
                h,
                self.config.reference_width,
                self.config.reference_height,
            );
        }
        zones
    }

    /// Process one frame to completion and return the violations it produced.
    ///
    /// Timestamps are expected to be non-decreasing; an earlier timestamp is
    /// treated as the last one seen, and a non-finite one drops the frame.
    pub fn process_frame(
        &mut self,
        frame_id: u64,
        timestamp: f64,
        detections: &[Detection],
    ) -> Vec<ViolationEvent> {
        if !timestamp.is_finite() {
            warn!(
                "Stream {} frame {} has a non-finite timestamp, skipping",
                self.stream_id, frame_id
            );
            return Vec::new();
        }
        let timestamp = match self.stats.last_timestamp {
            Some(last) if timestamp < last => {
                debug!(
                    "Stream {} frame {} timestamp went backwards ({:.3} < {:.3})",
                    self.stream_id, frame_id, timestamp, last
                );
                last
            }
            _ => timestamp,
        };

        let frame_height = self
            .frame_size
            .map(|(_, h)| h)
            .unwrap_or(self.config.reference_height) as f32;
        let ctx = FrameContext {
            stream_id: &self.stream_id,
            frame_id,
            timestamp,
            frame_height,
        };
        let outcome = self.machine.process(&ctx, detections, &self.zones);

        self.stats.frames_processed += 1;
        self.stats.violations += outcome.events.len() as u64;
        self.stats.suppressed_by_cooldown += outcome.suppressed_by_cooldown as u64;
        self.stats.hands_created += outcome.hands_created as u64;
        self.stats.hands_evicted += outcome.hands_evicted as u64;
        self.stats.dropped_detections += outcome.detections_ignored as u64;
        self.stats.last_timestamp = Some(timestamp);

        outcome.events
    }

    /// Like [`process_frame`](Self::process_frame) for untrusted detector
    /// output: malformed entries are skipped, the rest are processed.
    pub fn process_raw_frame(
        &mut self,
        frame_id: u64,
        timestamp: f64,
        raw: impl IntoIterator<Item = RawDetection>,
    ) -> Vec<ViolationEvent> {
        let mut dropped = 0u64;
        let detections: Vec<Detection> = raw
            .into_iter()
            .filter_map(|r| match r.into_detection(&self.config.class_names) {
                Ok(det) => Some(det),
                Err(e) => {
                    debug!("Stream {} frame {}: {}", self.stream_id, frame_id, e);
                    dropped += 1;
                    None
                }
            })
            .collect();
        self.stats.dropped_detections += dropped;
        self.process_frame(frame_id, timestamp, &detections)
    }

    /// Clear every tracked hand and cooldown. Counters and zones are kept.
    pub fn reset(&mut self) {
        self.machine.reset();
        self.stats.last_timestamp = None;
        info!("Stream {} reset", self.stream_id);
    }

    pub fn statistics(&self) -> StreamStatistics {
        StreamStatistics {
            active_tracked_hands: self.machine.active_hands(),
            ..self.stats.clone()
        }
    }

    pub fn tracked_hands(&self) -> impl Iterator<Item = &TrackedHand> {
        self.machine.tracker().hands()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ObjectClass;
    use crate::geometry::{Point, Rect};
    use crate::zones::ZoneKind;

    fn monitor() -> StreamMonitor {
        let zones = ZoneRegistry::from_zones([Zone::new(
            "roi_1",
            "Protein",
            Rect::from_tlbr(100.0, 100.0, 200.0, 200.0),
            ZoneKind::ProteinContainer,
        )]);
        StreamMonitor::new("cam-1", MonitorConfig::default(), zones)
    }

    #[test]
    fn test_rescale_once() {
        let mut m = monitor();
        assert!(m.observe_frame_size(1280, 960));
        assert!(!m.observe_frame_size(640, 480));
        assert_eq!(m.frame_size(), Some((1280, 960)));
        assert_eq!(
            m.zones().get("roi_1").unwrap().rect.to_tlbr(),
            [200.0, 200.0, 400.0, 400.0]
        );
    }

    #[test]
    fn test_explicit_rescale_does_not_compound() {
        let mut m = monitor();
        m.rescale_zones(1280, 960);
        m.rescale_zones(1280, 960);
        assert_eq!(
            m.zones().get("roi_1").unwrap().rect.to_tlbr(),
            [200.0, 200.0, 400.0, 400.0]
        );
    }

    #[test]
    fn test_configure_zones_keeps_scale() {
        let mut m = monitor();
        m.observe_frame_size(1280, 960);
        m.configure_zones([Zone::new(
            "roi_2",
            "Cheese",
            Rect::from_tlbr(10.0, 10.0, 110.0, 110.0),
            ZoneKind::IngredientContainer,
        )]);
        assert!(m.zones().get("roi_1").is_none());
        assert_eq!(
            m.zones().get("roi_2").unwrap().rect.to_tlbr(),
            [20.0, 20.0, 220.0, 220.0]
        );
        assert_eq!(m.zones().zones_containing(&Point::new(200.0, 200.0)).len(), 1);
    }

    #[test]
    fn test_raw_frame_skips_malformed() {
        let mut m = monitor();
        let raw = vec![
            RawDetection::new("hand", 0.9, [280.0, 280.0, 320.0, 320.0]),
            RawDetection {
                bbox: None,
                ..RawDetection::new("hand", 0.9, [0.0, 0.0, 1.0, 1.0])
            },
            RawDetection::new("scooper", 0.8, [50.0, 50.0, 40.0, 60.0]),
        ];
        let events = m.process_raw_frame(1, 0.0, raw);
        assert!(events.is_empty());

        let stats = m.statistics();
        assert_eq!(stats.frames_processed, 1);
        assert_eq!(stats.dropped_detections, 2);
        assert_eq!(stats.active_tracked_hands, 1);
        assert_eq!(m.tracked_hands().next().unwrap().bbox.center(), Point::new(300.0, 300.0));
    }

    #[test]
    fn test_non_finite_timestamp_skips_frame() {
        let mut m = monitor();
        let hand = Detection::from_rect(ObjectClass::Hand, Rect::from_xywh(150.0, 150.0, 40.0, 40.0), 0.9);
        assert!(m.process_frame(1, f64::NAN, &[hand]).is_empty());
        assert_eq!(m.statistics().frames_processed, 0);
        assert_eq!(m.statistics().active_tracked_hands, 0);
    }

    #[test]
    fn test_backwards_timestamp_is_clamped() {
        let mut m = monitor();
        let hand = Detection::from_rect(ObjectClass::Hand, Rect::from_xywh(300.0, 300.0, 40.0, 40.0), 0.9);
        m.process_frame(1, 5.0, std::slice::from_ref(&hand));
        m.process_frame(2, 1.0, std::slice::from_ref(&hand));
        assert_eq!(m.statistics().last_timestamp, Some(5.0));
        assert_eq!(m.tracked_hands().next().unwrap().last_seen, 5.0);
    }

    #[test]
    fn test_reset_clears_hands_keeps_counters() {
        let mut m = monitor();
        let hand = Detection::from_rect(ObjectClass::Hand, Rect::from_xywh(300.0, 300.0, 40.0, 40.0), 0.9);
        m.process_frame(1, 0.0, &[hand]);
        m.reset();
        let stats = m.statistics();
        assert_eq!(stats.active_tracked_hands, 0);
        assert_eq!(stats.frames_processed, 1);
    }

    #[test]
    fn test_validate_zones_uses_frame_size() {
        let mut m = monitor();
        assert!(m.validate_zones().is_empty());
        m.configure_zones([Zone::new(
            "edge",
            "Edge",
            Rect::from_tlbr(600.0, 100.0, 700.0, 200.0),
            ZoneKind::ProteinContainer,
        )]);
        assert_eq!(m.validate_zones().len(), 1);

        // Scaled together with the frame, so still out of bounds.
        m.observe_frame_size(1280, 960);
        assert_eq!(m.validate_zones().len(), 1);
    }
}
