//! Detection and violation monitoring for one stream in a single call.

use crate::config::MonitorConfig;
use crate::monitor::StreamMonitor;
use crate::violation::ViolationEvent;
use crate::zones::ZoneRegistry;

use super::DetectionSource;

/// Bundles a [`DetectionSource`] with a [`StreamMonitor`].
///
/// Zones are rescaled to the dimensions of the first frame; frame ids are
/// assigned sequentially starting at 1.
pub struct MonitorPipeline<D: DetectionSource> {
    detector: D,
    monitor: StreamMonitor,
    next_frame_id: u64,
}

impl<D: DetectionSource> MonitorPipeline<D> {
    pub fn new(detector: D, stream_id: &str, config: MonitorConfig, zones: ZoneRegistry) -> Self {
        Self {
            detector,
            monitor: StreamMonitor::new(stream_id, config, zones),
            next_frame_id: 1,
        }
    }

    /// Pipeline with default configuration and the default zone.
    pub fn with_default_config(detector: D, stream_id: &str) -> Self {
        Self::new(
            detector,
            stream_id,
            MonitorConfig::default(),
            ZoneRegistry::with_defaults(),
        )
    }

    /// Detect objects in one frame and return the violations it produced.
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
        timestamp: f64,
    ) -> Result<Vec<ViolationEvent>, D::Error> {
        let detections = self.detector.detect(input, width, height)?;
        self.monitor.observe_frame_size(width, height);

        let frame_id = self.next_frame_id;
        self.next_frame_id += 1;
        Ok(self.monitor.process_frame(frame_id, timestamp, &detections))
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    pub fn monitor(&self) -> &StreamMonitor {
        &self.monitor
    }

    pub fn monitor_mut(&mut self) -> &mut StreamMonitor {
        &mut self.monitor
    }
}
