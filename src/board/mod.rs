//! The board: immutable topology plus mutable occupancy.
//!
//! - `Board`: positions, coordinates, adjacency (built once, shared)
//! - `BoardState`: which piece stands where, and every piece's status

pub mod topology;
pub mod state;

pub use topology::{Axis, Board, BoardPosition, Coord, Direction, PositionId, RING_SPACING};
pub use state::{BoardState, Piece, PieceId, PieceStatus};
