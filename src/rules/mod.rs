//! Game rules: validation, the turn engine, events and setup.
//!
//! - `MoveValidator`: pure predicates (may this happen, and if not, why)
//! - `TurnEngine`: the phase machine driving a game
//! - `GameEvent` / `EventSink`: everything observable, as an outbox
//! - `GameBuilder`: games from a configuration or a prepared position

pub mod validator;
pub mod events;
pub mod engine;
pub mod builder;

pub use validator::{MoveValidator, MIN_PIECES_IN_PLAY};
pub use events::{EventSink, FnSink, GameEvent};
pub use engine::TurnEngine;
pub use builder::{GameBuilder, SetupError};
