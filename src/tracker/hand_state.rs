use serde::{Deserialize, Serialize};

/// Lifecycle of a tracked hand with respect to a container zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandState {
    /// Not in any container zone
    #[default]
    Outside,
    /// Inside a zone, dwell not yet long enough to count as a pick
    Entering,
    /// Dwelt long enough to be picking
    Dwelling,
    /// Left the zone after picking, watching for a destination
    ExitedPendingDestination,
    /// Reached a destination; the pick cycle has been judged
    Resolved,
}
