//! Game setup builder.
//!
//! Builds a `TurnEngine` from a configuration and, optionally, a starting
//! position. Useful for tests, puzzles and resuming analysis:
//!
//! ```
//! use rust_morris::board::PositionId;
//! use rust_morris::core::{GamePhase, Player};
//! use rust_morris::rules::GameBuilder;
//!
//! let engine = GameBuilder::new()
//!     .piece(0, Player::One)
//!     .piece(1, Player::One)
//!     .piece(2, Player::One)
//!     .piece(8, Player::Two)
//!     .piece(9, Player::Two)
//!     .piece(10, Player::Two)
//!     .moving_phase()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(engine.phase(), GamePhase::Moving);
//! assert_eq!(engine.mills().len(), 2);
//! ```

use std::sync::Arc;

use derive_more::{Display, Error};
use tracing::debug;

use super::engine::TurnEngine;
use crate::board::{Board, BoardState, PositionId};
use crate::core::config::{FlyingRule, MorrisConfig};
use crate::core::error::{BoardError, ConfigError};
use crate::core::player::Player;
use crate::core::state::{GamePhase, GameState};

/// Why a setup could not be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum SetupError {
    /// The configuration is invalid.
    #[display("invalid configuration: {_0}")]
    Config(#[error(source)] ConfigError),

    /// A piece could not be placed.
    #[display("invalid starting position: {_0}")]
    Board(#[error(source)] BoardError),

    /// More pieces were placed than the player owns.
    #[display("{player} has no pieces left for the starting position")]
    NoPiecesLeft {
        /// The player out of pieces.
        player: Player,
    },
}

impl From<ConfigError> for SetupError {
    fn from(err: ConfigError) -> Self {
        SetupError::Config(err)
    }
}

impl From<BoardError> for SetupError {
    fn from(err: BoardError) -> Self {
        SetupError::Board(err)
    }
}

/// Builder for games, optionally from a prepared position.
#[derive(Clone, Debug, Default)]
pub struct GameBuilder {
    config: MorrisConfig,
    pieces: Vec<(PositionId, Player)>,
    to_move: Option<Player>,
    moving: bool,
}

impl GameBuilder {
    /// Start from the nine men's morris defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a given configuration.
    #[must_use]
    pub fn from_config(config: MorrisConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the ring count.
    #[must_use]
    pub fn rings(mut self, rings: u8) -> Self {
        self.config.rings = rings;
        self
    }

    /// Set the pieces per player.
    #[must_use]
    pub fn pieces_per_player(mut self, pieces: u8) -> Self {
        self.config.pieces_per_player = pieces;
        self
    }

    /// Set the flying rule.
    #[must_use]
    pub fn flying_rule(mut self, flying: FlyingRule) -> Self {
        self.config.flying = flying;
        self
    }

    /// Set who acts first in a fresh game.
    #[must_use]
    pub fn first_player(mut self, player: Player) -> Self {
        self.config.first_player = player;
        self
    }

    /// Put a piece of `player` on position `id` before play starts.
    #[must_use]
    pub fn piece(mut self, id: u16, player: Player) -> Self {
        self.pieces.push((PositionId::new(id), player));
        self
    }

    /// Who acts in the prepared position (defaults to the first player).
    #[must_use]
    pub fn to_move(mut self, player: Player) -> Self {
        self.to_move = Some(player);
        self
    }

    /// Start in the Moving phase. Pieces not on the board are discarded.
    #[must_use]
    pub fn moving_phase(mut self) -> Self {
        self.moving = true;
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<TurnEngine, SetupError> {
        self.config.validate()?;
        let topology = Arc::new(Board::build(self.config.rings)?);
        let mut board = BoardState::new(topology, self.config.pieces_per_player);
        let mut state = GameState::new(&self.config);

        for &(position, player) in &self.pieces {
            let piece = board
                .next_in_hand(player)
                .ok_or(SetupError::NoPiecesLeft { player })?;
            board.occupy(position, piece)?;
            state.pieces_placed[player] += 1;
        }

        if self.moving {
            for player in Player::ALL {
                board.discard_hand(player);
            }
            state.mark_all_placed();
            state.phase = GamePhase::Moving;
        }
        if let Some(player) = self.to_move {
            state.current_player = player;
        }

        debug!(
            pieces = self.pieces.len(),
            phase = %state.phase,
            to_move = %state.current_player,
            "built game from position"
        );
        Ok(TurnEngine::from_position(self.config, board, state))
    }
}
