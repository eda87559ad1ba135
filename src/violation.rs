//! Pick-cycle state machine and the events it emits.

mod cooldown;
mod event;
mod state_machine;

pub use cooldown::CooldownTable;
pub use event::{Severity, VIOLATION_TYPE, ViolationEvent};
pub use state_machine::{FrameContext, FrameOutcome, ViolationStateMachine};
