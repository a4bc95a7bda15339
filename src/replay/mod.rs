//! Game records and replay.
//!
//! A `GameRecord` captures a game as its configuration plus the accepted
//! actions, encodes it compactly with bincode, and rebuilds the final
//! position by re-applying every action on a fresh engine.

pub mod record;

pub use record::{GameRecord, ReplayError};
