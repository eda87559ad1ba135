//! Frame-synchronous entry points: one [`StreamMonitor`] per video stream,
//! and a [`ViolationMonitor`] that keeps them isolated side by side.

mod stream_monitor;
mod violation_monitor;

pub use stream_monitor::StreamMonitor;
pub use violation_monitor::ViolationMonitor;
