//! Outbound game events.
//!
//! The engine never calls presentation code. Everything observable is pushed
//! to an outbox of `GameEvent`s which collaborators read with
//! `TurnEngine::events`, take with `drain_events`, or forward to an
//! `EventSink` with `flush_events`.

use serde::{Deserialize, Serialize};

use crate::board::{PieceId, PositionId};
use crate::core::error::IllegalAction;
use crate::core::player::Player;
use crate::core::state::{GamePhase, WinReason};
use crate::mills::Mill;

/// Something that happened in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A piece left a player's hand for the board.
    PiecePlaced {
        /// The placing player.
        player: Player,
        /// The piece placed.
        piece: PieceId,
        /// Where it went.
        position: PositionId,
    },
    /// A piece was picked up for a move.
    PieceSelected {
        /// The selecting player.
        player: Player,
        /// Where the piece stands.
        position: PositionId,
    },
    /// A piece moved (or flew).
    PieceMoved {
        /// The moving player.
        player: Player,
        /// The piece moved.
        piece: PieceId,
        /// Source position.
        from: PositionId,
        /// Target position.
        to: PositionId,
    },
    /// A piece was taken off the board after a mill.
    PieceRemoved {
        /// The player who removed it.
        by: Player,
        /// The player who lost it.
        owner: Player,
        /// The piece removed.
        piece: PieceId,
        /// Where it stood.
        position: PositionId,
    },
    /// A mill was completed.
    MillFormed(Mill),
    /// A standing mill lost a piece.
    MillBroken(Mill),
    /// The phase changed.
    PhaseChanged(GamePhase),
    /// The turn passed to a player.
    TurnChanged(Player),
    /// A request was rejected.
    IllegalAction(IllegalAction),
    /// The game ended.
    GameEnded {
        /// The winner.
        winner: Player,
        /// Why they won.
        reason: WinReason,
    },
}

/// Consumer of game events.
pub trait EventSink {
    /// Handle one event.
    fn emit(&mut self, event: &GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// Adapts a closure into an `EventSink`.
///
/// ```
/// use rust_morris::rules::{EventSink, FnSink, GameEvent};
/// use rust_morris::core::Player;
///
/// let mut turns = 0;
/// let mut sink = FnSink(|event: &GameEvent| {
///     if matches!(event, GameEvent::TurnChanged(_)) {
///         turns += 1;
///     }
/// });
/// sink.emit(&GameEvent::TurnChanged(Player::Two));
/// drop(sink);
/// assert_eq!(turns, 1);
/// ```
pub struct FnSink<F>(pub F);

impl<F> EventSink for FnSink<F>
where
    F: FnMut(&GameEvent),
{
    fn emit(&mut self, event: &GameEvent) {
        (self.0)(event);
    }
}
