//! Core types: players, configuration, errors, actions, state, RNG.
//!
//! Everything here is independent of board geometry. The board and rule
//! modules build on these types.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;
pub mod action;
pub mod state;

pub use player::{Player, PlayerMap};
pub use rng::GameRng;
pub use config::{FlyingRule, MorrisConfig, MIN_PIECES, POSITIONS_PER_RING};
pub use error::{BoardError, ConfigError, IllegalAction};
pub use action::{Action, ActionRecord};
pub use state::{GamePhase, GameState, Outcome, WinReason};
