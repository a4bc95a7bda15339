//! Board occupancy and piece bookkeeping.
//!
//! `BoardState` tracks which piece stands where and the status of every
//! piece. It knows nothing about turns or rules; the engine validates an
//! action before mutating the board.
//!
//! Occupancy is a single `Option<PieceId>` per position, so "occupied" and
//! "has an occupant" can never disagree. Both collections are `im` vectors and
//! the topology is shared through an `Arc`, making clones O(1).

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use super::topology::{Board, PositionId};
use crate::core::error::BoardError;
use crate::core::player::Player;

/// Stable piece identifier. Player one owns the lower half of the id range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u16);

impl PieceId {
    /// Create a new piece ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Index into piece storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a piece is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceStatus {
    /// Off the board, waiting to be placed.
    InHand,
    /// Standing on a position.
    OnBoard(PositionId),
    /// Removed by a mill. Never returns.
    Captured,
}

/// A game piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Stable identifier.
    pub id: PieceId,
    /// Owning player.
    pub owner: Player,
    /// Current location.
    pub status: PieceStatus,
}

impl Piece {
    /// Position of the piece, if on the board.
    #[must_use]
    pub fn position(&self) -> Option<PositionId> {
        match self.status {
            PieceStatus::OnBoard(position) => Some(position),
            _ => None,
        }
    }

    /// Still in play (in hand or on the board)?
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status != PieceStatus::Captured
    }
}

/// Occupancy of every position plus the status of every piece.
///
/// ## Usage
///
/// ```
/// use std::sync::Arc;
/// use rust_morris::board::{Board, BoardState, PositionId};
/// use rust_morris::core::Player;
///
/// let mut board = BoardState::new(Arc::new(Board::build(3).unwrap()), 9);
/// let piece = board.next_in_hand(Player::One).unwrap();
///
/// board.occupy(PositionId::new(0), piece).unwrap();
/// assert_eq!(board.owner_at(PositionId::new(0)), Some(Player::One));
/// assert_eq!(board.in_hand(Player::One), 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    topology: Arc<Board>,
    occupancy: Vector<Option<PieceId>>,
    pieces: Vector<Piece>,
    pieces_per_player: u8,
}

impl BoardState {
    /// Create an empty board with every piece in hand.
    #[must_use]
    pub fn new(topology: Arc<Board>, pieces_per_player: u8) -> Self {
        let occupancy = std::iter::repeat(None)
            .take(topology.position_count())
            .collect();

        let per_player = u16::from(pieces_per_player);
        let pieces = Player::ALL
            .iter()
            .flat_map(|&owner| {
                let base = owner.index() as u16 * per_player;
                (base..base + per_player).map(move |id| Piece {
                    id: PieceId(id),
                    owner,
                    status: PieceStatus::InHand,
                })
            })
            .collect();

        Self {
            topology,
            occupancy,
            pieces,
            pieces_per_player,
        }
    }

    /// The board topology.
    #[must_use]
    pub fn topology(&self) -> &Board {
        &self.topology
    }

    /// Pieces each player started with.
    #[must_use]
    pub fn pieces_per_player(&self) -> u8 {
        self.pieces_per_player
    }

    // === Mutation ===

    /// Put an in-hand piece on an empty position.
    pub fn occupy(&mut self, position: PositionId, piece: PieceId) -> Result<(), BoardError> {
        if self.slot(position)?.is_some() {
            return Err(BoardError::Occupied { position });
        }
        let entry = self
            .pieces
            .get(piece.index())
            .ok_or(BoardError::UnknownPiece { piece })?;
        if entry.status != PieceStatus::InHand {
            return Err(BoardError::PieceNotInHand { piece });
        }

        self.occupancy.set(position.index(), Some(piece));
        self.set_status(piece, PieceStatus::OnBoard(position));
        Ok(())
    }

    /// Take the piece off a position. It returns to its owner's hand.
    pub fn clear(&mut self, position: PositionId) -> Result<PieceId, BoardError> {
        let piece = self
            .slot(position)?
            .ok_or(BoardError::NotOccupied { position })?;

        self.occupancy.set(position.index(), None);
        self.set_status(piece, PieceStatus::InHand);
        Ok(piece)
    }

    /// Move the piece at `from` to the empty position `to`.
    pub fn relocate(&mut self, from: PositionId, to: PositionId) -> Result<PieceId, BoardError> {
        let piece = self
            .slot(from)?
            .ok_or(BoardError::NotOccupied { position: from })?;
        if self.slot(to)?.is_some() {
            return Err(BoardError::Occupied { position: to });
        }

        self.occupancy.set(from.index(), None);
        self.occupancy.set(to.index(), Some(piece));
        self.set_status(piece, PieceStatus::OnBoard(to));
        Ok(piece)
    }

    /// Remove the piece at `position` from the game.
    pub fn capture(&mut self, position: PositionId) -> Result<PieceId, BoardError> {
        let piece = self.clear(position)?;
        self.set_status(piece, PieceStatus::Captured);
        Ok(piece)
    }

    /// Take every in-hand piece of `player` out of the game.
    ///
    /// Used when a game starts directly in the Moving phase. Returns how many
    /// pieces were discarded.
    pub fn discard_hand(&mut self, player: Player) -> usize {
        let in_hand: Vec<PieceId> = self
            .pieces
            .iter()
            .filter(|p| p.owner == player && p.status == PieceStatus::InHand)
            .map(|p| p.id)
            .collect();

        for &piece in &in_hand {
            self.set_status(piece, PieceStatus::Captured);
        }
        in_hand.len()
    }

    fn slot(&self, position: PositionId) -> Result<Option<PieceId>, BoardError> {
        self.occupancy
            .get(position.index())
            .copied()
            .ok_or(BoardError::UnknownPosition { position })
    }

    fn set_status(&mut self, piece: PieceId, status: PieceStatus) {
        if let Some(entry) = self.pieces.get_mut(piece.index()) {
            entry.status = status;
        }
    }

    // === Queries ===

    /// Does the position hold a piece? False for unknown positions.
    #[must_use]
    pub fn is_occupied(&self, position: PositionId) -> bool {
        self.occupant(position).is_some()
    }

    /// The piece at a position.
    #[must_use]
    pub fn occupant(&self, position: PositionId) -> Option<PieceId> {
        self.occupancy.get(position.index()).copied().flatten()
    }

    /// Owner of the piece at a position.
    #[must_use]
    pub fn owner_at(&self, position: PositionId) -> Option<Player> {
        self.occupant(position)
            .and_then(|piece| self.piece(piece))
            .map(|p| p.owner)
    }

    /// Look up a piece.
    #[must_use]
    pub fn piece(&self, piece: PieceId) -> Option<&Piece> {
        self.pieces.get(piece.index())
    }

    /// All pieces, in id order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter()
    }

    /// Pieces owned by `player`.
    pub fn pieces_of(&self, player: Player) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |p| p.owner == player)
    }

    /// The next piece `player` would place (lowest id in hand).
    #[must_use]
    pub fn next_in_hand(&self, player: Player) -> Option<PieceId> {
        self.pieces_of(player)
            .find(|p| p.status == PieceStatus::InHand)
            .map(|p| p.id)
    }

    /// Pieces of `player` not yet captured.
    #[must_use]
    pub fn remaining(&self, player: Player) -> usize {
        self.pieces_of(player).filter(|p| p.is_alive()).count()
    }

    /// Pieces of `player` standing on the board.
    #[must_use]
    pub fn on_board(&self, player: Player) -> usize {
        self.pieces_of(player)
            .filter(|p| p.position().is_some())
            .count()
    }

    /// Pieces of `player` still in hand.
    #[must_use]
    pub fn in_hand(&self, player: Player) -> usize {
        self.pieces_of(player)
            .filter(|p| p.status == PieceStatus::InHand)
            .count()
    }

    /// Every position id, in order.
    pub fn positions(&self) -> impl Iterator<Item = PositionId> {
        (0..self.occupancy.len() as u16).map(PositionId)
    }

    /// Positions without a piece.
    pub fn empty_positions(&self) -> impl Iterator<Item = PositionId> + '_ {
        self.positions().filter(move |&p| !self.is_occupied(p))
    }

    /// Positions holding a piece of `player`.
    pub fn occupied_by(&self, player: Player) -> impl Iterator<Item = PositionId> + '_ {
        self.positions()
            .filter(move |&p| self.owner_at(p) == Some(player))
    }

    /// Topology adjacency.
    #[must_use]
    pub fn is_adjacent(&self, a: PositionId, b: PositionId) -> bool {
        self.topology.is_adjacent(a, b)
    }

    /// Is any neighbour of `position` empty?
    #[must_use]
    pub fn has_empty_neighbor(&self, position: PositionId) -> bool {
        self.topology
            .neighbors(position)
            .iter()
            .any(|&n| !self.is_occupied(n))
    }
}
