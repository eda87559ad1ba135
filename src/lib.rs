//! Violation inference for food-preparation video streams.
//!
//! Frames arrive as lists of unlabeled detections (hands, scoopers, pizzas,
//! persons). Hands are re-identified frame to frame by position, driven
//! through an enter → dwell → exit → destination lifecycle against the
//! configured container zones, and a [`ViolationEvent`] is raised when an
//! ingredient is taken without a scooper.

pub mod config;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod integration;
pub mod interaction;
pub mod monitor;
pub mod stats;
pub mod tracker;
pub mod violation;
pub mod zones;

pub use config::{ClassNames, MonitorConfig};
pub use detection::{Detection, DetectionBuilder, ObjectClass, RawDetection};
pub use error::{Error, Result};
pub use geometry::{Point, Rect};
pub use integration::{DetectionSource, IntoDetections, MonitorPipeline};
pub use interaction::InteractionResolver;
pub use monitor::{StreamMonitor, ViolationMonitor};
pub use stats::{Statistics, StreamStatistics};
pub use tracker::{HandId, HandState, HandTracker, TrackedHand};
pub use violation::{Severity, ViolationEvent, ViolationStateMachine};
pub use zones::{Zone, ZoneConfigFile, ZoneKind, ZoneRegistry};
