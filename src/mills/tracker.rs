//! Active mill tracking.
//!
//! The engine keeps the set of mills standing on the board and updates it
//! after every board mutation. Each update first drops mills that are no
//! longer intact, then adds mills newly completed through the position a piece
//! arrived on. A mill that is broken and rebuilt therefore counts as formed
//! again, which is what grants a removal when a piece shuttles in and out.

use im::OrdSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::detector::{Mill, MillDetector};
use crate::board::{BoardState, PositionId};
use crate::core::player::Player;

/// Mills that changed in one update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MillChanges {
    /// Mills no longer intact.
    pub broken: SmallVec<[Mill; 2]>,
    /// Mills completed by this update.
    pub formed: SmallVec<[Mill; 2]>,
}

impl MillChanges {
    /// Nothing changed?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.broken.is_empty() && self.formed.is_empty()
    }

    /// Did any new mill form?
    #[must_use]
    pub fn formed_any(&self) -> bool {
        !self.formed.is_empty()
    }
}

/// The set of mills currently standing.
///
/// Backed by a persistent ordered set, so clones are O(1) and iteration order
/// is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveMills {
    mills: OrdSet<Mill>,
}

impl ActiveMills {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute every mill from scratch.
    #[must_use]
    pub fn rebuild(board: &BoardState) -> Self {
        Self {
            mills: MillDetector::new(board).all_mills().into_iter().collect(),
        }
    }

    /// Bring the set up to date after a mutation.
    ///
    /// `arrived` is the position a piece was just placed or moved onto, if
    /// any. Broken mills are collected before formed ones.
    pub fn update(&mut self, board: &BoardState, arrived: Option<PositionId>) -> MillChanges {
        let mut changes = MillChanges::default();

        for mill in self.mills.iter() {
            if !mill.is_intact(board) {
                changes.broken.push(*mill);
            }
        }
        for mill in &changes.broken {
            self.mills.remove(mill);
        }

        if let Some(position) = arrived {
            if let Some(owner) = board.owner_at(position) {
                for mill in MillDetector::new(board).find_mills_through(position, owner) {
                    if self.mills.insert(mill).is_none() {
                        changes.formed.push(mill);
                    }
                }
            }
        }

        changes
    }

    /// Is this exact mill standing?
    #[must_use]
    pub fn contains(&self, mill: &Mill) -> bool {
        self.mills.contains(mill)
    }

    /// Iterate in order.
    pub fn iter(&self) -> impl Iterator<Item = &Mill> + '_ {
        self.mills.iter()
    }

    /// Mills held by `player`.
    pub fn mills_of(&self, player: Player) -> impl Iterator<Item = &Mill> + '_ {
        self.mills.iter().filter(move |m| m.owner == player)
    }

    /// Number of standing mills.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mills.len()
    }

    /// No mills standing?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mills.is_empty()
    }
}
