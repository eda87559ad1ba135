//! Untrusted detector output.

use serde::{Deserialize, Serialize};

use super::{Detection, ObjectClass};
use crate::config::ClassNames;
use crate::error::{Error, Result};
use crate::geometry::Rect;

/// Detection as delivered by a detection source, before validation.
///
/// Every field is optional because upstream payloads are not trusted;
/// [`RawDetection::into_detection`] rejects anything unusable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
    /// Bounding box in TLBR format (x1, y1, x2, y2)
    #[serde(default)]
    pub bbox: Option<[f32; 4]>,
}

impl RawDetection {
    pub fn new(class_name: &str, confidence: f32, bbox: [f32; 4]) -> Self {
        Self {
            class_name: Some(class_name.to_string()),
            confidence: Some(confidence),
            bbox: Some(bbox),
        }
    }

    /// Validate and classify. Missing confidence defaults to 0.0; present
    /// confidence is clamped into `[0, 1]`.
    pub fn into_detection(self, names: &ClassNames) -> Result<Detection> {
        let class_name = self
            .class_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Error::MalformedDetection("missing class name".to_string()))?;
        let [x1, y1, x2, y2] = self
            .bbox
            .ok_or_else(|| Error::MalformedDetection(format!("{class_name}: missing bbox")))?;

        let bbox = Rect::from_tlbr(x1, y1, x2, y2);
        if !bbox.is_valid() {
            return Err(Error::MalformedDetection(format!(
                "{class_name}: invalid bbox {:?}",
                [x1, y1, x2, y2]
            )));
        }

        let confidence = match self.confidence {
            Some(c) if !c.is_finite() => {
                return Err(Error::MalformedDetection(format!(
                    "{class_name}: non-finite confidence"
                )));
            }
            Some(c) => c.clamp(0.0, 1.0),
            None => 0.0,
        };

        Ok(Detection::from_rect(
            ObjectClass::from_name(&class_name, names),
            bbox,
            confidence,
        ))
    }
}
