//! Game configuration.
//!
//! A game is configured once at startup:
//! - `rings`: number of concentric rings (8 positions each)
//! - `pieces_per_player`: pieces each side places during the Placing phase
//! - `flying`: when a reduced side may jump to any empty position
//! - `first_player`: who places first
//!
//! The classic game is `MorrisConfig::nine_mens_morris()`, which is also the
//! default. Invalid configurations are rejected by `validate()` before an
//! engine is built.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::player::Player;

/// Positions per ring.
pub const POSITIONS_PER_RING: u16 = 8;

/// Smallest useful piece count. A side below this can never form a mill.
pub const MIN_PIECES: u8 = 3;

/// When a player with few pieces left may fly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlyingRule {
    /// Flying with exactly three remaining pieces (the standard rule).
    #[default]
    ExactlyThree,
    /// Flying with three or fewer remaining pieces.
    AtMostThree,
}

impl FlyingRule {
    /// Does a side with `remaining` pieces fly under this rule?
    #[must_use]
    pub const fn allows(self, remaining: usize) -> bool {
        match self {
            FlyingRule::ExactlyThree => remaining == 3,
            FlyingRule::AtMostThree => remaining <= 3,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MorrisConfig {
    /// Number of concentric rings (at least 1).
    pub rings: u8,

    /// Pieces each player places (3 up to `4 * rings`).
    pub pieces_per_player: u8,

    /// Flying threshold rule.
    pub flying: FlyingRule,

    /// The player who places first.
    pub first_player: Player,
}

impl MorrisConfig {
    /// Create a configuration with the default flying rule and first player.
    #[must_use]
    pub fn new(rings: u8, pieces_per_player: u8) -> Self {
        Self {
            rings,
            pieces_per_player,
            flying: FlyingRule::default(),
            first_player: Player::One,
        }
    }

    /// Three rings, nine pieces each.
    #[must_use]
    pub fn nine_mens_morris() -> Self {
        Self::new(3, 9)
    }

    /// Two rings, six pieces each.
    #[must_use]
    pub fn six_mens_morris() -> Self {
        Self::new(2, 6)
    }

    /// Set the flying rule.
    #[must_use]
    pub fn with_flying_rule(mut self, flying: FlyingRule) -> Self {
        self.flying = flying;
        self
    }

    /// Set the first player.
    #[must_use]
    pub fn with_first_player(mut self, player: Player) -> Self {
        self.first_player = player;
        self
    }

    /// Largest legal `pieces_per_player` for a ring count.
    ///
    /// Half the board, so both sides can always place everything.
    #[must_use]
    pub const fn max_pieces_for_rings(rings: u8) -> u16 {
        rings as u16 * POSITIONS_PER_RING / 2
    }

    /// Total number of positions on the board.
    #[must_use]
    pub const fn position_count(&self) -> u16 {
        self.rings as u16 * POSITIONS_PER_RING
    }

    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rings < 1 {
            return Err(ConfigError::TooFewRings { rings: self.rings });
        }
        if self.pieces_per_player < MIN_PIECES {
            return Err(ConfigError::TooFewPieces {
                pieces: self.pieces_per_player,
                min: MIN_PIECES,
            });
        }
        let max = Self::max_pieces_for_rings(self.rings);
        if u16::from(self.pieces_per_player) > max {
            return Err(ConfigError::TooManyPieces {
                pieces: self.pieces_per_player,
                rings: self.rings,
                max,
            });
        }
        Ok(())
    }
}

impl Default for MorrisConfig {
    fn default() -> Self {
        Self::nine_mens_morris()
    }
}
