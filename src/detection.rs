//! Per-frame detections handed over by the (external) detection model.

mod builder;
mod raw;

pub use builder::DetectionBuilder;
pub use raw::RawDetection;

use serde::{Deserialize, Serialize};

use crate::config::ClassNames;
use crate::geometry::{Point, Rect};

/// Object category relevant to violation inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    Hand,
    /// Scooper or another utensil that makes a pick compliant.
    Tool,
    /// Where picked ingredients end up, e.g. a pizza.
    Destination,
    Person,
    #[default]
    Other,
}

impl ObjectClass {
    /// Resolve a detector class name by case-insensitive substring match.
    ///
    /// Categories are tried in the order hand, tool, destination, person.
    pub fn from_name(name: &str, names: &ClassNames) -> Self {
        let name = name.to_lowercase();
        let matches = |fragments: &[String]| {
            fragments
                .iter()
                .any(|fragment| !fragment.is_empty() && name.contains(&fragment.to_lowercase()))
        };

        if matches(&names.hand) {
            ObjectClass::Hand
        } else if matches(&names.tool) {
            ObjectClass::Tool
        } else if matches(&names.destination) {
            ObjectClass::Destination
        } else if matches(&names.person) {
            ObjectClass::Person
        } else {
            ObjectClass::Other
        }
    }
}

/// A single detection in frame coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class: ObjectClass,
    /// Detection confidence in `[0, 1]`
    pub confidence: f32,
    pub bbox: Rect,
}

impl Detection {
    pub fn new(class: ObjectClass, x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> Self {
        Self {
            class,
            confidence,
            bbox: Rect::from_tlbr(x1, y1, x2, y2),
        }
    }

    pub fn from_rect(class: ObjectClass, bbox: Rect, confidence: f32) -> Self {
        Self {
            class,
            confidence,
            bbox,
        }
    }

    /// Midpoint of the bounding box.
    #[inline]
    pub fn center(&self) -> Point {
        self.bbox.center()
    }

    /// A usable detection has a finite, non-degenerate box and a finite confidence.
    pub fn is_valid(&self) -> bool {
        self.bbox.is_valid() && self.confidence.is_finite()
    }
}
