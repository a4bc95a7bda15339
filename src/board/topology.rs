//! Board topology: positions, coordinates and adjacency.
//!
//! A board is a set of concentric square rings. Each ring has 8 positions,
//! numbered clockwise from the top-left corner:
//!
//! ```text
//!   0 --- 1 --- 2
//!   |           |
//!   7           3
//!   |           |
//!   6 --- 5 --- 4
//! ```
//!
//! Position ids are `ring * 8 + slot`, ring 0 innermost. Coordinates live on
//! an integer lattice where ring `r` has half-size `RING_SPACING * (r + 1)`,
//! so aligned positions on different rings share an x or y value.
//!
//! Adjacency is built once and never changes:
//! - neighbours along the ring, `(slot ± 1) mod 8`
//! - odd slots (edge midpoints) connect to the same slot of the next ring inward
//!
//! Corners never connect across rings.

use derive_more::From;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::config::POSITIONS_PER_RING;
use crate::core::error::ConfigError;

/// Lattice distance between neighbouring rings.
pub const RING_SPACING: i32 = 1;

/// Unit offsets of the 8 slots, clockwise from top-left.
const SLOT_OFFSETS: [(i32, i32); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
];

/// Stable position identifier (`ring * 8 + slot`).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, From, Serialize, Deserialize,
)]
pub struct PositionId(pub u16);

impl PositionId {
    /// Create a new position ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Index into per-position storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PositionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lattice coordinate. `y` grows upward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Horizontal component.
    pub x: i32,
    /// Vertical component.
    pub y: i32,
}

impl Coord {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Line direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    /// Along a row (shared `y`).
    Horizontal,
    /// Along a column (shared `x`).
    Vertical,
}

impl Axis {
    /// Both axes.
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// The coordinate component that varies along this axis.
    #[must_use]
    pub const fn along(self, coord: Coord) -> i32 {
        match self {
            Axis::Horizontal => coord.x,
            Axis::Vertical => coord.y,
        }
    }

    /// The coordinate component that is constant along this axis.
    #[must_use]
    pub const fn across(self, coord: Coord) -> i32 {
        match self {
            Axis::Horizontal => coord.y,
            Axis::Vertical => coord.x,
        }
    }
}

/// Which way to step along an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward smaller coordinates.
    Decreasing,
    /// Toward larger coordinates.
    Increasing,
}

/// One position of the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardPosition {
    /// Stable identifier.
    pub id: PositionId,
    /// Ring index, 0 innermost.
    pub ring: u8,
    /// Slot within the ring, 0..8 clockwise from top-left.
    pub slot: u8,
    /// Lattice coordinate.
    pub coord: Coord,
    /// Adjacent positions.
    pub adjacent: SmallVec<[PositionId; 4]>,
}

impl BoardPosition {
    /// Corner slots are even.
    #[must_use]
    pub fn is_corner(&self) -> bool {
        self.slot % 2 == 0
    }

    /// Edge midpoints are odd slots.
    #[must_use]
    pub fn is_midpoint(&self) -> bool {
        self.slot % 2 == 1
    }
}

/// Immutable board topology.
///
/// ## Usage
///
/// ```
/// use rust_morris::board::{Board, PositionId};
///
/// let board = Board::build(3).unwrap();
/// assert_eq!(board.position_count(), 24);
///
/// // Midpoint of the middle ring connects inward and outward
/// assert_eq!(board.neighbors(PositionId::new(9)).len(), 4);
/// assert!(board.is_adjacent(PositionId::new(1), PositionId::new(9)));
///
/// // Corners never cross rings
/// assert!(!board.is_adjacent(PositionId::new(0), PositionId::new(8)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rings: u8,
    positions: Vec<BoardPosition>,
    by_coord: FxHashMap<Coord, PositionId>,
}

impl Board {
    /// Generate the positions of `rings` concentric rings and link them.
    pub fn build(rings: u8) -> Result<Self, ConfigError> {
        if rings < 1 {
            return Err(ConfigError::TooFewRings { rings });
        }

        let count = usize::from(rings) * POSITIONS_PER_RING as usize;
        let mut positions = Vec::with_capacity(count);
        let mut by_coord = FxHashMap::default();

        for ring in 0..rings {
            let half = RING_SPACING * (i32::from(ring) + 1);
            for (slot, &(dx, dy)) in SLOT_OFFSETS.iter().enumerate() {
                let id = PositionId(u16::from(ring) * POSITIONS_PER_RING + slot as u16);
                let coord = Coord::new(dx * half, dy * half);
                by_coord.insert(coord, id);
                positions.push(BoardPosition {
                    id,
                    ring,
                    slot: slot as u8,
                    coord,
                    adjacent: SmallVec::new(),
                });
            }
        }

        let mut board = Self {
            rings,
            positions,
            by_coord,
        };
        board.compute_adjacency();

        debug!(rings, positions = board.positions.len(), "built board topology");
        Ok(board)
    }

    /// Link ring neighbours, then midpoints across rings.
    fn compute_adjacency(&mut self) {
        let per_ring = POSITIONS_PER_RING;
        for ring in 0..u16::from(self.rings) {
            for slot in 0..per_ring {
                let id = ring * per_ring + slot;
                let prev = ring * per_ring + (slot + per_ring - 1) % per_ring;
                let next = ring * per_ring + (slot + 1) % per_ring;

                let adjacent = &mut self.positions[id as usize].adjacent;
                adjacent.push(PositionId(prev));
                adjacent.push(PositionId(next));

                if ring > 0 && slot % 2 == 1 {
                    let inner = (ring - 1) * per_ring + slot;
                    self.positions[id as usize].adjacent.push(PositionId(inner));
                    self.positions[inner as usize].adjacent.push(PositionId(id));
                }
            }
        }
    }

    // === Queries ===

    /// Number of rings.
    #[must_use]
    pub fn ring_count(&self) -> u8 {
        self.rings
    }

    /// Number of positions.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Look up a position.
    #[must_use]
    pub fn position(&self, id: PositionId) -> Option<&BoardPosition> {
        self.positions.get(id.index())
    }

    /// Does this board have the position?
    #[must_use]
    pub fn contains(&self, id: PositionId) -> bool {
        id.index() < self.positions.len()
    }

    /// All positions, in id order.
    #[must_use]
    pub fn positions(&self) -> &[BoardPosition] {
        &self.positions
    }

    /// The 8 positions of one ring.
    #[must_use]
    pub fn ring(&self, ring: u8) -> Option<&[BoardPosition]> {
        if ring >= self.rings {
            return None;
        }
        let start = usize::from(ring) * POSITIONS_PER_RING as usize;
        Some(&self.positions[start..start + POSITIONS_PER_RING as usize])
    }

    /// Adjacent positions (empty for unknown ids).
    #[must_use]
    pub fn neighbors(&self, id: PositionId) -> &[PositionId] {
        self.position(id).map_or(&[], |p| p.adjacent.as_slice())
    }

    /// Are two positions connected by a line segment?
    #[must_use]
    pub fn is_adjacent(&self, a: PositionId, b: PositionId) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Position at a lattice coordinate.
    #[must_use]
    pub fn position_at(&self, coord: Coord) -> Option<PositionId> {
        self.by_coord.get(&coord).copied()
    }

    /// The adjacent position on the same row or column, on the given side.
    #[must_use]
    pub fn aligned_neighbor(
        &self,
        id: PositionId,
        axis: Axis,
        direction: Direction,
    ) -> Option<PositionId> {
        let origin = self.position(id)?.coord;
        self.neighbors(id).iter().copied().find(|&n| {
            let Some(other) = self.position(n) else {
                return false;
            };
            if axis.across(other.coord) != axis.across(origin) {
                return false;
            }
            match direction {
                Direction::Decreasing => axis.along(other.coord) < axis.along(origin),
                Direction::Increasing => axis.along(other.coord) > axis.along(origin),
            }
        })
    }
}
