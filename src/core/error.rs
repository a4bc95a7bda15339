//! Error types.
//!
//! - `ConfigError`: invalid board or piece configuration (construction aborts)
//! - `BoardError`: low-level occupancy misuse on `BoardState`
//! - `IllegalAction`: a rejected player request, with the precise reason
//!
//! Rejected requests are ordinary return values, never panics. The engine also
//! reports each one as a `GameEvent::IllegalAction` so presentation code can
//! surface it without inspecting the `Result`.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::state::GamePhase;
use crate::board::{PieceId, PositionId};

/// Invalid game configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error, Serialize, Deserialize)]
pub enum ConfigError {
    /// The board needs at least one ring.
    #[display("board needs at least 1 ring, got {rings}")]
    TooFewRings {
        /// Requested ring count.
        rings: u8,
    },

    /// Fewer pieces than a mill needs.
    #[display("each player needs at least {min} pieces, got {pieces}")]
    TooFewPieces {
        /// Requested pieces per player.
        pieces: u8,
        /// Smallest legal value.
        min: u8,
    },

    /// More pieces than half the board can hold.
    #[display("{rings} ring(s) hold at most {max} pieces per player, got {pieces}")]
    TooManyPieces {
        /// Requested pieces per player.
        pieces: u8,
        /// Ring count of the board.
        rings: u8,
        /// Largest legal value for this ring count.
        max: u16,
    },
}

/// Occupancy misuse on `BoardState`.
///
/// The engine validates every action before touching the board, so these only
/// surface when `BoardState` is driven directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error, Serialize, Deserialize)]
pub enum BoardError {
    /// No such position on this board.
    #[display("position {position} does not exist")]
    UnknownPosition {
        /// The offending position.
        position: PositionId,
    },

    /// No such piece in this game.
    #[display("piece {piece} does not exist")]
    UnknownPiece {
        /// The offending piece.
        piece: PieceId,
    },

    /// The position already holds a piece.
    #[display("position {position} is already occupied")]
    Occupied {
        /// The offending position.
        position: PositionId,
    },

    /// The position holds no piece.
    #[display("position {position} is not occupied")]
    NotOccupied {
        /// The offending position.
        position: PositionId,
    },

    /// The piece is on the board or captured.
    #[display("piece {piece} is not in hand")]
    PieceNotInHand {
        /// The offending piece.
        piece: PieceId,
    },
}

/// Why a player request was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error, Serialize, Deserialize)]
pub enum IllegalAction {
    /// The game has ended; nothing more is accepted.
    #[display("the game is over")]
    GameOver,

    /// A previous action is still waiting for its completion signal.
    #[display("an action is still awaiting confirmation")]
    ActionPending,

    /// A completion signal arrived with no action pending.
    #[display("no action is awaiting confirmation")]
    NothingPending,

    /// The action does not belong to the current phase.
    #[display("action not allowed during the {phase} phase")]
    WrongPhase {
        /// The phase the game is in.
        phase: GamePhase,
    },

    /// No such position on this board.
    #[display("position {position} does not exist")]
    UnknownPosition {
        /// The offending position.
        position: PositionId,
    },

    /// Target position already holds a piece.
    #[display("position {position} is already occupied")]
    Occupied {
        /// The offending position.
        position: PositionId,
    },

    /// Source position holds no piece.
    #[display("position {position} is not occupied")]
    NotOccupied {
        /// The offending position.
        position: PositionId,
    },

    /// The piece belongs to the other player.
    #[display("the piece at {position} does not belong to {player}")]
    NotYourPiece {
        /// The offending position.
        position: PositionId,
        /// The player who tried to use it.
        player: Player,
    },

    /// A player tried to remove one of their own pieces.
    #[display("{player} cannot remove their own piece at {position}")]
    OwnPiece {
        /// The offending position.
        position: PositionId,
        /// The player who tried to remove it.
        player: Player,
    },

    /// The selected piece has nowhere to go.
    #[display("the piece at {position} has no legal move")]
    PieceCannotMove {
        /// The offending position.
        position: PositionId,
    },

    /// Move target is not adjacent and the player is not flying.
    #[display("{to} is not adjacent to {from}")]
    NotAdjacent {
        /// Source position.
        from: PositionId,
        /// Target position.
        to: PositionId,
    },

    /// The piece sits in a mill while unprotected opponent pieces remain.
    #[display("the piece at {position} is protected by a mill")]
    ProtectedByMill {
        /// The offending position.
        position: PositionId,
    },

    /// Placement requested with an empty hand.
    #[display("{player} has no pieces left to place")]
    NoPiecesInHand {
        /// The player whose hand is empty.
        player: Player,
    },

    /// Piece bookkeeping disagreed with occupancy. Indicates a bug.
    #[display("board bookkeeping rejected the action: {reason}")]
    Inconsistent {
        /// The underlying board error.
        reason: BoardError,
    },
}

impl From<BoardError> for IllegalAction {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::UnknownPosition { position } => IllegalAction::UnknownPosition { position },
            BoardError::Occupied { position } => IllegalAction::Occupied { position },
            BoardError::NotOccupied { position } => IllegalAction::NotOccupied { position },
            other @ (BoardError::UnknownPiece { .. } | BoardError::PieceNotInHand { .. }) => {
                IllegalAction::Inconsistent { reason: other }
            }
        }
    }
}
