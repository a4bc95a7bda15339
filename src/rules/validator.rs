//! Move validation.
//!
//! `MoveValidator` answers "may this happen?" for every request, without
//! changing anything. Each rule comes in two forms:
//! - `check_*`: `Result<(), IllegalAction>` carrying the precise reason
//! - `can_*`: the same rule as a boolean
//!
//! It also provides the highlight queries a UI needs (where can I place,
//! which pieces can move, where can this piece go, what can I remove).

use crate::board::{BoardState, PositionId};
use crate::core::config::FlyingRule;
use crate::core::error::IllegalAction;
use crate::core::player::Player;
use crate::core::state::{GamePhase, GameState};
use crate::mills::MillDetector;

/// Minimum pieces a player needs to stay in the game.
pub const MIN_PIECES_IN_PLAY: usize = 3;

/// Pure rule predicates over a game snapshot.
#[derive(Clone, Copy, Debug)]
pub struct MoveValidator<'a> {
    state: &'a GameState,
    board: &'a BoardState,
    flying: FlyingRule,
}

impl<'a> MoveValidator<'a> {
    /// Create a validator for a snapshot.
    #[must_use]
    pub fn new(state: &'a GameState, board: &'a BoardState, flying: FlyingRule) -> Self {
        Self {
            state,
            board,
            flying,
        }
    }

    fn detector(&self) -> MillDetector<'a> {
        MillDetector::new(self.board)
    }

    fn require_phase(&self, phase: GamePhase) -> Result<(), IllegalAction> {
        if self.state.phase == phase {
            Ok(())
        } else {
            Err(IllegalAction::WrongPhase {
                phase: self.state.phase,
            })
        }
    }

    fn require_position(&self, position: PositionId) -> Result<(), IllegalAction> {
        if self.board.topology().contains(position) {
            Ok(())
        } else {
            Err(IllegalAction::UnknownPosition { position })
        }
    }

    fn require_empty(&self, position: PositionId) -> Result<(), IllegalAction> {
        self.require_position(position)?;
        if self.board.is_occupied(position) {
            return Err(IllegalAction::Occupied { position });
        }
        Ok(())
    }

    fn owner_of(&self, position: PositionId) -> Result<Player, IllegalAction> {
        self.require_position(position)?;
        self.board
            .owner_at(position)
            .ok_or(IllegalAction::NotOccupied { position })
    }

    // === Placement ===

    /// Can the current player place on `position`?
    pub fn check_place(&self, position: PositionId) -> Result<(), IllegalAction> {
        self.require_phase(GamePhase::Placing)?;
        self.require_empty(position)?;

        let player = self.state.current_player;
        if self.state.pieces_left_to_place(player) == 0 || self.board.next_in_hand(player).is_none() {
            return Err(IllegalAction::NoPiecesInHand { player });
        }
        Ok(())
    }

    /// Boolean form of [`check_place`](Self::check_place).
    #[must_use]
    pub fn can_place(&self, position: PositionId) -> bool {
        self.check_place(position).is_ok()
    }

    // === Movement ===

    /// Can `player` pick up the piece at `position`?
    pub fn check_select(&self, position: PositionId, player: Player) -> Result<(), IllegalAction> {
        self.require_phase(GamePhase::Moving)?;

        let owner = self.owner_of(position)?;
        if owner != player {
            return Err(IllegalAction::NotYourPiece { position, player });
        }
        if !self.piece_can_move(position, player) {
            return Err(IllegalAction::PieceCannotMove { position });
        }
        Ok(())
    }

    /// Boolean form of [`check_select`](Self::check_select).
    #[must_use]
    pub fn can_select_for_move(&self, position: PositionId, player: Player) -> bool {
        self.check_select(position, player).is_ok()
    }

    /// Can `player` move the piece at `from` to `to`?
    pub fn check_move(
        &self,
        from: PositionId,
        to: PositionId,
        player: Player,
    ) -> Result<(), IllegalAction> {
        self.check_select(from, player)?;
        self.require_empty(to)?;

        if !self.is_flying_phase(player) && !self.board.is_adjacent(from, to) {
            return Err(IllegalAction::NotAdjacent { from, to });
        }
        Ok(())
    }

    /// Boolean form of [`check_move`](Self::check_move).
    #[must_use]
    pub fn can_move_to(&self, from: PositionId, to: PositionId, player: Player) -> bool {
        self.check_move(from, to, player).is_ok()
    }

    // === Removal ===

    /// Can `player` remove the opponent piece at `position`?
    ///
    /// Pieces in a mill are protected unless every opponent piece on the
    /// board is in a mill.
    pub fn check_remove(&self, position: PositionId, player: Player) -> Result<(), IllegalAction> {
        self.require_phase(GamePhase::MillRemoval)?;

        let owner = self.owner_of(position)?;
        if owner == player {
            return Err(IllegalAction::OwnPiece { position, player });
        }

        let detector = self.detector();
        if detector.is_position_in_any_mill(position) && !detector.all_pieces_in_mills(owner) {
            return Err(IllegalAction::ProtectedByMill { position });
        }
        Ok(())
    }

    /// Boolean form of [`check_remove`](Self::check_remove).
    #[must_use]
    pub fn can_remove(&self, position: PositionId, player: Player) -> bool {
        self.check_remove(position, player).is_ok()
    }

    // === Mobility & Win Conditions ===

    /// Does `player` fly (move to any empty position)?
    #[must_use]
    pub fn is_flying_phase(&self, player: Player) -> bool {
        self.flying.allows(self.board.remaining(player))
    }

    /// Could the piece at `position` move anywhere, ignoring the phase?
    fn piece_can_move(&self, position: PositionId, player: Player) -> bool {
        if self.is_flying_phase(player) {
            self.board.empty_positions().next().is_some()
        } else {
            self.board.has_empty_neighbor(position)
        }
    }

    /// Does `player` have at least one legal move on the board?
    ///
    /// Independent of the phase, so it can be asked while a removal is
    /// still being resolved.
    #[must_use]
    pub fn has_any_valid_move(&self, player: Player) -> bool {
        self.board
            .occupied_by(player)
            .any(|p| self.piece_can_move(p, player))
    }

    /// Is `player` stuck?
    #[must_use]
    pub fn is_game_over_by_no_valid_moves(&self, player: Player) -> bool {
        !self.has_any_valid_move(player)
    }

    /// Is `player` down to fewer than three pieces?
    #[must_use]
    pub fn is_loss_by_piece_count(&self, player: Player) -> bool {
        self.board.remaining(player) < MIN_PIECES_IN_PLAY
    }

    // === Highlight Queries ===

    /// Positions the current player may place on.
    #[must_use]
    pub fn placeable_positions(&self) -> Vec<PositionId> {
        self.board
            .empty_positions()
            .filter(|&p| self.can_place(p))
            .collect()
    }

    /// Pieces of `player` that may be selected for a move.
    #[must_use]
    pub fn selectable_pieces(&self, player: Player) -> Vec<PositionId> {
        self.board
            .occupied_by(player)
            .filter(|&p| self.can_select_for_move(p, player))
            .collect()
    }

    /// Where the piece at `from` may go.
    #[must_use]
    pub fn legal_destinations(&self, from: PositionId) -> Vec<PositionId> {
        let Some(player) = self.board.owner_at(from) else {
            return Vec::new();
        };
        if self.check_select(from, player).is_err() {
            return Vec::new();
        }
        if self.is_flying_phase(player) {
            return self.board.empty_positions().collect();
        }
        self.board
            .topology()
            .neighbors(from)
            .iter()
            .copied()
            .filter(|&to| !self.board.is_occupied(to))
            .collect()
    }

    /// Opponent pieces `player` may remove.
    #[must_use]
    pub fn removable_pieces(&self, player: Player) -> Vec<PositionId> {
        self.board
            .occupied_by(player.opponent())
            .filter(|&p| self.can_remove(p, player))
            .collect()
    }
}
