//! Trait for object detection backends.

use tracing::debug;

use crate::config::ClassNames;
use crate::detection::{Detection, RawDetection};

/// Trait for object detection backends.
///
/// # Example
///
/// ```ignore
/// use scoopwatch::{Detection, DetectionSource};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Detection>, Self::Error> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    type Error;

    /// Run inference on one frame. `input` is raw image bytes in whatever
    /// format the implementation expects.
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error>;
}

/// Conversion of model-specific output into classified detections.
pub trait IntoDetections {
    fn into_detections(self, names: &ClassNames) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self, _names: &ClassNames) -> Vec<Detection> {
        self
    }
}

/// Malformed entries are dropped.
impl IntoDetections for Vec<RawDetection> {
    fn into_detections(self, names: &ClassNames) -> Vec<Detection> {
        self.into_iter()
            .filter_map(|raw| {
                raw.into_detection(names)
                    .inspect_err(|e| debug!("Dropping detection: {}", e))
                    .ok()
            })
            .collect()
    }
}
