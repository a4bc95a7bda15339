//! Mill detection and tracking.
//!
//! - `MillDetector`: stateless queries (aligned runs, mills through a position)
//! - `ActiveMills`: the standing mills, updated incrementally by the engine

pub mod detector;
pub mod tracker;

pub use detector::{AlignedRun, Mill, MillDetector, MillSet};
pub use tracker::{ActiveMills, MillChanges};
