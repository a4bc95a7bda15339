//! Player actions and their history records.
//!
//! Every request a player can make maps to one `Action` variant:
//! - `Place`: put the next piece from hand on an empty position
//! - `Select`: pick an own piece to move (instantaneous, no confirmation)
//! - `Move`: move (or fly) a piece to an empty position
//! - `Remove`: take an opponent piece after forming a mill
//!
//! Accepted actions are stored in `GameState::action_history` as
//! `ActionRecord`s, which is also what `GameRecord` replays.

use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::board::PositionId;

/// A complete game action.
///
/// ## Example
///
/// ```
/// use rust_morris::board::PositionId;
/// use rust_morris::core::Action;
///
/// let place = Action::Place { position: PositionId::new(0) };
/// let slide = Action::Move { from: PositionId::new(1), to: PositionId::new(9) };
///
/// assert!(place.needs_confirmation());
/// assert_eq!(slide.target(), PositionId::new(9));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Place a piece from hand.
    Place {
        /// Target position.
        position: PositionId,
    },
    /// Select an own piece for a following move.
    Select {
        /// Position of the piece.
        position: PositionId,
    },
    /// Move a piece along a line, or fly it while flying.
    Move {
        /// Source position.
        from: PositionId,
        /// Target position.
        to: PositionId,
    },
    /// Remove an opponent piece.
    Remove {
        /// Position of the removed piece.
        position: PositionId,
    },
}

impl Action {
    /// Whether the engine waits for a completion signal after this action.
    #[must_use]
    pub const fn needs_confirmation(&self) -> bool {
        !matches!(self, Action::Select { .. })
    }

    /// The position this action ends on.
    #[must_use]
    pub const fn target(&self) -> PositionId {
        match *self {
            Action::Place { position } | Action::Select { position } | Action::Remove { position } => {
                position
            }
            Action::Move { to, .. } => to,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Place { position } => write!(f, "place {position}"),
            Action::Select { position } => write!(f, "select {position}"),
            Action::Move { from, to } => write!(f, "move {from} -> {to}"),
            Action::Remove { position } => write!(f, "remove {position}"),
        }
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for replay and debugging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: Player,

    /// The action taken.
    pub action: Action,

    /// Turn number when action was taken.
    pub turn: u32,

    /// Global sequence number (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: Player, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}
