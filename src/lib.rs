//! # rust-morris
//!
//! A rules engine for Nine Men's Morris and its ring-count variants.
//!
//! ## Design Principles
//!
//! 1. **Rules only**: The engine owns topology, phases, mills and win
//!    conditions. Rendering, input and audio live elsewhere and learn what
//!    happened from the event outbox.
//!
//! 2. **Two-phase actions**: A request mutates the board and waits; the
//!    completion signal resolves mills and advances the phase machine. This
//!    lets a presentation layer animate between the two.
//!
//! 3. **Configurable board**: Any number of rings, any legal piece count,
//!    and a choice of flying rule.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Board and state use `im` collections
//!   and a shared topology, so whole engines clone in O(1) for playouts.
//!
//! - **Typed Rejections**: Every request returns `Result<(), IllegalAction>`
//!   with the exact reason, and the rejection is also emitted as an event.
//!
//! ## Modules
//!
//! - `core`: Players, configuration, errors, actions, state, RNG
//! - `board`: Topology and occupancy
//! - `mills`: Mill detection and active-mill tracking
//! - `rules`: Validator, turn engine, events, setup builder
//! - `playout`: Policy-driven random playouts
//! - `replay`: Game records with binary encoding

pub mod core;
pub mod board;
pub mod mills;
pub mod rules;
pub mod playout;
pub mod replay;

// Re-export commonly used types
pub use crate::core::{
    Player, PlayerMap,
    GameRng,
    FlyingRule, MorrisConfig,
    BoardError, ConfigError, IllegalAction,
    Action, ActionRecord,
    GamePhase, GameState, Outcome, WinReason,
};

pub use crate::board::{Axis, Board, BoardPosition, BoardState, Coord, Piece, PieceId, PieceStatus, PositionId};

pub use crate::mills::{ActiveMills, Mill, MillChanges, MillDetector};

pub use crate::rules::{
    EventSink, FnSink, GameBuilder, GameEvent,
    MoveValidator, SetupError, TurnEngine,
};

pub use crate::playout::{
    run_playout, run_playouts, MillSeekingPolicy, PlayoutPolicy, PlayoutResult, PlayoutStats,
    UniformPolicy,
};

pub use crate::replay::{GameRecord, ReplayError};
