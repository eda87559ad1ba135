use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::tracker::HandId;

/// Event type emitted for a pick without a tool.
pub const VIOLATION_TYPE: &str = "ingredient_taken_without_tool";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// An emitted violation. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationEvent {
    /// Unique per stream: `{stream_id}-{frame_id}-{hand}`
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    /// Hand detection confidence at resolution
    pub confidence: f32,
    /// Hand box at resolution
    pub bbox: Rect,
    pub timestamp: f64,
    pub frame_id: u64,
    pub stream_id: String,
    /// Seconds between zone entry and zone exit
    pub dwell_duration: f64,
    pub hand_id: HandId,
    pub zone_id: String,
    pub message: String,
}
