//! Player identification and per-player data storage.
//!
//! ## Player
//!
//! Morris is strictly a two-player game, so the player is a plain enum rather
//! than an index. Ownership of pieces and mills is always expressed through it.
//!
//! ## PlayerMap
//!
//! Fixed-size per-player storage backed by `[T; 2]` for O(1) access.
//! Supports iteration and indexing by `Player`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two sides of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    /// The side that moves first by default.
    One,
    /// The second side.
    Two,
}

impl Player {
    /// Both players, in turn order.
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// Get the other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Get the 0-based storage index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.index() + 1)
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use rust_morris::core::{Player, PlayerMap};
///
/// let mut placed: PlayerMap<u8> = PlayerMap::with_value(0);
/// placed[Player::Two] += 1;
///
/// assert_eq!(placed[Player::One], 0);
/// assert_eq!(placed[Player::Two], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(Player) -> T) -> Self {
        Self {
            data: [factory(Player::One), factory(Player::Two)],
        }
    }

    /// Create a new PlayerMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: Player) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: Player) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (Player, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Player, &T)> {
        Player::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Player, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Player, &mut T)> {
        Player::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<Player> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: Player) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<Player> for PlayerMap<T> {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        self.get_mut(player)
    }
}
