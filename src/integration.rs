//! Connecting an object detector to violation monitoring.
//!
//! The detection model itself lives outside this crate; anything that can turn
//! a frame into detections implements [`DetectionSource`].

mod detector;
mod pipeline;

pub use detector::{DetectionSource, IntoDetections};
pub use pipeline::MonitorPipeline;
