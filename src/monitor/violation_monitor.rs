use std::collections::HashMap;

use tracing::info;

use crate::config::MonitorConfig;
use crate::detection::{Detection, RawDetection};
use crate::error::{Error, Result};
use crate::monitor::StreamMonitor;
use crate::stats::{Statistics, StreamStatistics, ViolationHistory};
use crate::violation::ViolationEvent;
use crate::zones::{Zone, ZoneConfigFile, ZoneRegistry};

/// Violation monitoring for any number of concurrent streams.
///
/// Each stream gets its own [`StreamMonitor`] on first use, so hand state and
/// cooldowns never leak between streams. Zones are shared configuration and
/// copied into every stream.
#[derive(Debug)]
pub struct ViolationMonitor {
    config: MonitorConfig,
    zones: ZoneRegistry,
    frame_size: Option<(u32, u32)>,
    streams: HashMap<String, StreamMonitor>,
    history: ViolationHistory,
    /// Counters of removed streams
    retired: StreamStatistics,
}

impl ViolationMonitor {
    pub fn new(config: MonitorConfig, zones: ZoneRegistry) -> Self {
        Self {
            history: ViolationHistory::new(config.history_capacity),
            config,
            zones,
            frame_size: None,
            streams: HashMap::new(),
            retired: StreamStatistics::default(),
        }
    }

    /// Build a monitor from a zone file. The file's frame size, if given,
    /// overrides the configured reference size.
    pub fn from_zone_config(mut config: MonitorConfig, file: &ZoneConfigFile) -> Result<Self> {
        if let Some((w, h)) = file.reference_size() {
            config.reference_width = w;
            config.reference_height = h;
        }
        config.validate()?;
        Ok(Self::new(config, ZoneRegistry::from_zones(file.zones())))
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Zones in reference coordinates.
    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    fn stream_mut(&mut self, stream_id: &str) -> &mut StreamMonitor {
        let Self {
            config,
            zones,
            frame_size,
            streams,
            ..
        } = self;
        streams.entry(stream_id.to_string()).or_insert_with(|| {
            let mut stream = StreamMonitor::new(stream_id, config.clone(), zones.clone());
            if let Some((w, h)) = *frame_size {
                stream.rescale_zones(w, h);
            }
            info!("Monitoring new stream {}", stream_id);
            stream
        })
    }

    pub fn stream(&self, stream_id: &str) -> Option<&StreamMonitor> {
        self.streams.get(stream_id)
    }

    pub fn stream_ids(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    /// Process one frame of `stream_id` and return its violations.
    pub fn process_frame(
        &mut self,
        stream_id: &str,
        frame_id: u64,
        timestamp: f64,
        detections: &[Detection],
    ) -> Vec<ViolationEvent> {
        let events = self
            .stream_mut(stream_id)
            .process_frame(frame_id, timestamp, detections);
        self.record(&events);
        events
    }

    pub fn process_raw_frame(
        &mut self,
        stream_id: &str,
        frame_id: u64,
        timestamp: f64,
        raw: impl IntoIterator<Item = RawDetection>,
    ) -> Vec<ViolationEvent> {
        let events = self
            .stream_mut(stream_id)
            .process_raw_frame(frame_id, timestamp, raw);
        self.record(&events);
        events
    }

    fn record(&mut self, events: &[ViolationEvent]) {
        for event in events {
            self.history.push(event.clone());
        }
    }

    /// Replace the zone set of every stream, current and future.
    pub fn configure_zones(&mut self, zones: Vec<Zone>) {
        self.zones = ZoneRegistry::from_zones(zones);
        for stream in self.streams.values_mut() {
            stream.configure_zones(self.zones.zones().to_vec());
        }
    }

    /// Rescale every stream's zones to the given frame size.
    pub fn rescale_zones(&mut self, observed_width: u32, observed_height: u32) {
        self.frame_size = Some((observed_width, observed_height));
        for stream in self.streams.values_mut() {
            stream.rescale_zones(observed_width, observed_height);
        }
    }

    /// Record the frame size of one stream; its zones are rescaled the first
    /// time only. Returns true when a rescale happened.
    pub fn observe_frame_size(&mut self, stream_id: &str, width: u32, height: u32) -> bool {
        self.stream_mut(stream_id).observe_frame_size(width, height)
    }

    pub fn get_statistics(&self) -> Statistics {
        let mut stats = Statistics {
            total_violations: self.retired.violations,
            frames_processed: self.retired.frames_processed,
            streams: self.streams.len(),
            ..Statistics::default()
        };
        for stream in self.streams.values() {
            let s = stream.statistics();
            stats.total_violations += s.violations;
            stats.frames_processed += s.frames_processed;
            stats.active_tracked_hands += s.active_tracked_hands;
        }
        stats
    }

    pub fn stream_statistics(&self, stream_id: &str) -> Option<StreamStatistics> {
        self.streams.get(stream_id).map(StreamMonitor::statistics)
    }

    /// Forget every hand and cooldown of one stream, and drop its entries from
    /// the recent-violation history. Counters are kept.
    pub fn reset_stream(&mut self, stream_id: &str) -> Result<()> {
        let stream = self
            .streams
            .get_mut(stream_id)
            .ok_or_else(|| Error::UnknownStream(stream_id.to_string()))?;
        stream.reset();
        self.history.retain_streams_except(stream_id);
        Ok(())
    }

    /// Stop monitoring a stream. Its counters stay in the global totals.
    pub fn remove_stream(&mut self, stream_id: &str) -> Option<StreamMonitor> {
        let stream = self.streams.remove(stream_id)?;
        let s = stream.statistics();
        self.retired.violations += s.violations;
        self.retired.frames_processed += s.frames_processed;
        info!("Stopped monitoring stream {}", stream_id);
        Some(stream)
    }

    /// Recent violations across all streams, newest first.
    pub fn recent_violations(&self) -> impl Iterator<Item = &ViolationEvent> {
        self.history.iter()
    }
}
