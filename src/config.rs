//! Tuning constants for re-identification, dwell detection and alerting.
//!
//! All thresholds were tuned empirically against specific clips, so every one
//! of them is configuration rather than a constant.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a [`StreamMonitor`](crate::StreamMonitor).
///
/// Distances are in frame units (pixels of the observed frame), times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Max centre distance for matching a detection to an existing hand.
    pub association_radius: f32,
    /// Number of past centres kept per hand.
    pub position_history: usize,
    /// Dwell required before a hand counts as picking.
    pub picking_time_threshold: f64,
    /// Dwell after which a hand that never left is treated as a non-picking action.
    pub max_dwell_time: f64,
    /// Minimum time between two emitted violations for the same hand.
    pub violation_cooldown: f64,
    /// A hand not matched for longer than this is evicted.
    pub stale_timeout: f64,
    /// Margin added around the hand box when testing tool containment.
    pub tool_bbox_margin: f32,
    /// Max distance between hand and tool centres for association.
    pub tool_proximity: f32,
    /// Max distance between hand and destination centres.
    pub destination_proximity: f32,
    /// With no destination visible, a hand below this fraction of the frame
    /// height counts as near one. `None` disables the fallback.
    pub destination_fallback_fraction: Option<f32>,
    /// Detections below this confidence are ignored.
    pub min_confidence: f32,
    /// Minimum zone side length before `validate` warns.
    pub min_zone_size: f32,
    /// Frame width the zone coordinates were authored against.
    pub reference_width: u32,
    /// Frame height the zone coordinates were authored against.
    pub reference_height: u32,
    /// Capacity of the recent-violation history.
    pub history_capacity: usize,
    pub class_names: ClassNames,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            association_radius: 150.0,
            position_history: 30,
            picking_time_threshold: 0.5,
            max_dwell_time: 2.5,
            violation_cooldown: 3.0,
            stale_timeout: 2.0,
            tool_bbox_margin: 20.0,
            tool_proximity: 120.0,
            destination_proximity: 120.0,
            destination_fallback_fraction: Some(0.625),
            min_confidence: 0.0,
            min_zone_size: 50.0,
            reference_width: 640,
            reference_height: 480,
            history_capacity: 100,
            class_names: ClassNames::default(),
        }
    }
}

impl MonitorConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("association_radius", self.association_radius as f64),
            ("picking_time_threshold", self.picking_time_threshold),
            ("max_dwell_time", self.max_dwell_time),
            ("stale_timeout", self.stale_timeout),
            ("tool_proximity", self.tool_proximity as f64),
            ("destination_proximity", self.destination_proximity as f64),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must be positive")));
            }
        }
        if !(self.violation_cooldown.is_finite() && self.violation_cooldown >= 0.0) {
            return Err(Error::InvalidConfig(
                "violation_cooldown must not be negative".to_string(),
            ));
        }
        if self.max_dwell_time <= self.picking_time_threshold {
            return Err(Error::InvalidConfig(
                "max_dwell_time must exceed picking_time_threshold".to_string(),
            ));
        }
        if let Some(fraction) = self.destination_fallback_fraction {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(Error::InvalidConfig(
                    "destination_fallback_fraction must be within [0, 1]".to_string(),
                ));
            }
        }
        if self.position_history == 0 {
            return Err(Error::InvalidConfig(
                "position_history must be at least 1".to_string(),
            ));
        }
        if self.reference_width == 0 || self.reference_height == 0 {
            return Err(Error::InvalidConfig(
                "reference dimensions must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Detector class-name fragments for each object category.
///
/// Matching is a case-insensitive substring test, so `"Hand"`, `"left_hand"`
/// and `"HAND"` all resolve to a hand with the default `["hand"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    pub hand: Vec<String>,
    pub tool: Vec<String>,
    pub destination: Vec<String>,
    pub person: Vec<String>,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            hand: vec!["hand".to_string()],
            tool: vec!["scooper".to_string()],
            destination: vec!["pizza".to_string()],
            person: vec!["person".to_string()],
        }
    }
}
