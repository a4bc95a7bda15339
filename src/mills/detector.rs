//! Mill detection.
//!
//! A mill is three consecutive aligned positions owned by the same player.
//! "Aligned" follows the adjacency graph: starting at a position, keep taking
//! the adjacent position on the same row (or column) in each direction. The
//! resulting run is usually 3 long; with four or more rings the lines that
//! cross the rings are longer and every window of three is checked.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{Axis, BoardState, Direction, PositionId};
use crate::core::player::Player;

/// Three aligned positions held by one player.
///
/// `positions` are ordered along the axis (ascending x or ascending y), so
/// the same mill always compares equal regardless of how it was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Mill {
    /// Player holding the mill.
    pub owner: Player,
    /// Line direction.
    pub axis: Axis,
    /// The three positions, in axis order.
    pub positions: [PositionId; 3],
}

impl Mill {
    /// Does the mill pass through `position`?
    #[must_use]
    pub fn contains(&self, position: PositionId) -> bool {
        self.positions.contains(&position)
    }

    /// Are all three positions still held by the owner?
    #[must_use]
    pub fn is_intact(&self, board: &BoardState) -> bool {
        self.positions
            .iter()
            .all(|&p| board.owner_at(p) == Some(self.owner))
    }
}

impl std::fmt::Display for Mill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.positions;
        write!(f, "{} mill {a}-{b}-{c}", self.owner)
    }
}

/// Aligned positions through one position, in axis order.
pub type AlignedRun = SmallVec<[PositionId; 8]>;

/// Mills found through one position. Two at most on standard boards.
pub type MillSet = SmallVec<[Mill; 2]>;

/// Read-only mill queries over a board.
#[derive(Clone, Copy, Debug)]
pub struct MillDetector<'a> {
    board: &'a BoardState,
}

impl<'a> MillDetector<'a> {
    /// Create a detector for a board.
    #[must_use]
    pub fn new(board: &'a BoardState) -> Self {
        Self { board }
    }

    /// The maximal aligned run through `position`, sorted along `axis`.
    ///
    /// Unknown positions yield an empty run.
    #[must_use]
    pub fn aligned_run(&self, position: PositionId, axis: Axis) -> AlignedRun {
        let topology = self.board.topology();
        let mut run = AlignedRun::new();
        if !topology.contains(position) {
            return run;
        }

        let limit = topology.position_count();
        let mut cursor = position;
        while let Some(next) = topology.aligned_neighbor(cursor, axis, Direction::Decreasing) {
            if run.len() >= limit {
                break;
            }
            run.push(next);
            cursor = next;
        }
        run.reverse();
        run.push(position);

        cursor = position;
        while let Some(next) = topology.aligned_neighbor(cursor, axis, Direction::Increasing) {
            if run.len() >= limit {
                break;
            }
            run.push(next);
            cursor = next;
        }
        run
    }

    /// Every mill of `owner` passing through `position`.
    ///
    /// Does not require `position` itself to be occupied by `owner`; a window
    /// only counts when all three of its positions are.
    #[must_use]
    pub fn find_mills_through(&self, position: PositionId, owner: Player) -> MillSet {
        let mut mills = MillSet::new();
        for axis in Axis::ALL {
            let run = self.aligned_run(position, axis);
            for window in run.windows(3) {
                if !window.contains(&position) {
                    continue;
                }
                if window.iter().all(|&p| self.board.owner_at(p) == Some(owner)) {
                    mills.push(Mill {
                        owner,
                        axis,
                        positions: [window[0], window[1], window[2]],
                    });
                }
            }
        }
        mills
    }

    /// Is the piece at `position` part of a mill of its owner?
    #[must_use]
    pub fn is_position_in_any_mill(&self, position: PositionId) -> bool {
        self.board
            .owner_at(position)
            .is_some_and(|owner| !self.find_mills_through(position, owner).is_empty())
    }

    /// Is every on-board piece of `player` in a mill?
    ///
    /// Vacuously true when the player has nothing on the board.
    #[must_use]
    pub fn all_pieces_in_mills(&self, player: Player) -> bool {
        self.board
            .occupied_by(player)
            .all(|p| self.is_position_in_any_mill(p))
    }

    /// Every mill currently on the board, both players.
    #[must_use]
    pub fn all_mills(&self) -> Vec<Mill> {
        let mut mills: Vec<Mill> = self
            .board
            .positions()
            .filter_map(|p| self.board.owner_at(p).map(|owner| (p, owner)))
            .flat_map(|(p, owner)| self.find_mills_through(p, owner))
            .collect();
        mills.sort_unstable();
        mills.dedup();
        mills
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::board::{Board, PieceId};

    fn pos(id: u16) -> PositionId {
        PositionId::new(id)
    }

    fn board_with(rings: u8, pieces: &[(u16, Player)]) -> BoardState {
        let mut board = BoardState::new(Arc::new(Board::build(rings).unwrap()), 4 * rings);
        for &(p, owner) in pieces {
            let piece = board.next_in_hand(owner).unwrap();
            board.occupy(pos(p), piece).unwrap();
        }
        board
    }

    #[test]
    fn test_aligned_runs() {
        let board = board_with(3, &[]);
        let detector = MillDetector::new(&board);

        assert_eq!(detector.aligned_run(pos(3), Axis::Horizontal).as_slice(), &[pos(3), pos(11), pos(19)]);
        assert_eq!(detector.aligned_run(pos(1), Axis::Vertical).as_slice(), &[pos(1), pos(9), pos(17)]);
        assert_eq!(detector.aligned_run(pos(0), Axis::Horizontal).as_slice(), &[pos(0), pos(1), pos(2)]);
        assert_eq!(detector.aligned_run(pos(0), Axis::Vertical).as_slice(), &[pos(6), pos(7), pos(0)]);
        assert!(detector.aligned_run(pos(40), Axis::Vertical).is_empty());
    }

    #[test]
    fn test_long_run_on_four_rings() {
        let board = board_with(4, &[]);
        let detector = MillDetector::new(&board);

        assert_eq!(
            detector.aligned_run(pos(11), Axis::Horizontal).as_slice(),
            &[pos(3), pos(11), pos(19), pos(27)]
        );
    }

    #[test]
    fn test_vertical_mill_positions_in_axis_order() {
        let board = board_with(3, &[(2, Player::Two), (3, Player::Two), (4, Player::Two)]);
        let detector = MillDetector::new(&board);

        let mills = detector.find_mills_through(pos(3), Player::Two);
        assert_eq!(mills.len(), 1);
        assert_eq!(mills[0].axis, Axis::Vertical);
        assert_eq!(mills[0].positions, [pos(4), pos(3), pos(2)]);
        assert!(detector.find_mills_through(pos(3), Player::One).is_empty());
    }

    #[test]
    fn test_window_must_contain_position() {
        // Four rings: 3-11-19 is a mill, 27 is not part of it
        let board = board_with(
            4,
            &[(3, Player::One), (11, Player::One), (19, Player::One), (27, Player::Two)],
        );
        let detector = MillDetector::new(&board);

        assert_eq!(detector.find_mills_through(pos(3), Player::One).len(), 1);
        assert!(detector.is_position_in_any_mill(pos(19)));
        assert!(!detector.is_position_in_any_mill(pos(27)));
    }

    #[test]
    fn test_no_mill_across_corners() {
        // 2, 10, 18 are corners on the same diagonal, never a line
        let board = board_with(3, &[(2, Player::One), (10, Player::One), (18, Player::One)]);
        let detector = MillDetector::new(&board);

        assert!(!detector.is_position_in_any_mill(pos(10)));
        assert!(detector.all_mills().is_empty());
    }

    #[test]
    fn test_all_pieces_in_mills() {
        let mut board = board_with(3, &[(16, Player::Two), (17, Player::Two), (18, Player::Two)]);
        assert!(MillDetector::new(&board).all_pieces_in_mills(Player::Two));
        assert!(MillDetector::new(&board).all_pieces_in_mills(Player::One));

        board.occupy(pos(11), PieceId(7)).unwrap();
        assert!(MillDetector::new(&board).all_pieces_in_mills(Player::Two));

        let piece = board.next_in_hand(Player::Two).unwrap();
        board.occupy(pos(5), piece).unwrap();
        assert!(!MillDetector::new(&board).all_pieces_in_mills(Player::Two));
    }

    #[test]
    fn test_mill_display() {
        let mill = Mill {
            owner: Player::One,
            axis: Axis::Horizontal,
            positions: [pos(0), pos(1), pos(2)],
        };
        assert_eq!(mill.to_string(), "Player 1 mill #0-#1-#2");
    }
}
