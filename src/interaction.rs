//! Instantaneous hand/tool and hand/destination predicates for one frame.

use crate::config::MonitorConfig;
use crate::detection::Detection;
use crate::geometry::{Point, Rect, distance};

/// Predicates for one hand in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandPredicates {
    pub tool_associated: bool,
    pub near_destination: bool,
}

#[derive(Debug, Clone)]
pub struct InteractionResolver {
    tool_bbox_margin: f32,
    tool_proximity: f32,
    destination_proximity: f32,
    destination_fallback_fraction: Option<f32>,
}

impl InteractionResolver {
    pub fn new(
        tool_bbox_margin: f32,
        tool_proximity: f32,
        destination_proximity: f32,
        destination_fallback_fraction: Option<f32>,
    ) -> Self {
        Self {
            tool_bbox_margin,
            tool_proximity,
            destination_proximity,
            destination_fallback_fraction,
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(
            config.tool_bbox_margin,
            config.tool_proximity,
            config.destination_proximity,
            config.destination_fallback_fraction,
        )
    }

    /// A tool is associated when its centre lies inside the hand box grown by
    /// the margin, or within `tool_proximity` of the hand centre. Box overlap
    /// catches real contact, distance catches imprecise tool boxes.
    pub fn tool_associated(&self, hand_bbox: &Rect, tools: &[&Detection]) -> bool {
        let expanded = hand_bbox.expand(self.tool_bbox_margin);
        let hand_center = hand_bbox.center();
        tools.iter().any(|tool| {
            let center = tool.center();
            expanded.contains_point(&center)
                || distance(&hand_center, &center) < self.tool_proximity
        })
    }

    /// Whether the hand is close to a destination object.
    ///
    /// Destinations are often missed by the detector, so when none is visible
    /// a hand below the configured fraction of the frame height counts as
    /// near one. This trades precision for recall and can be disabled.
    pub fn near_destination(
        &self,
        hand_center: &Point,
        destinations: &[&Detection],
        frame_height: f32,
    ) -> bool {
        if destinations.is_empty() {
            return match self.destination_fallback_fraction {
                Some(fraction) => hand_center.y > frame_height * fraction,
                None => false,
            };
        }
        destinations
            .iter()
            .any(|dest| distance(hand_center, &dest.center()) < self.destination_proximity)
    }

    pub fn resolve(
        &self,
        hand_bbox: &Rect,
        tools: &[&Detection],
        destinations: &[&Detection],
        frame_height: f32,
    ) -> HandPredicates {
        HandPredicates {
            tool_associated: self.tool_associated(hand_bbox, tools),
            near_destination: self.near_destination(&hand_bbox.center(), destinations, frame_height),
        }
    }
}
