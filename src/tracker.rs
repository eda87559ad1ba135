mod hand_state;
mod hand_tracker;
mod matching;
mod tracked_hand;

pub use hand_state::HandState;
pub use hand_tracker::HandTracker;
pub use matching::{AssignmentResult, distance_matrix, nearest_neighbor_assignment};
pub use tracked_hand::{HandId, PositionSample, TrackedHand};
