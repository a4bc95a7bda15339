//! Game progression state.
//!
//! `GameState` holds everything about a game except the board itself:
//! - Phase and the phase a mill removal interrupted
//! - Whose turn it is, and how many pieces each side has placed
//! - The current selection and the action awaiting confirmation
//! - The outcome once the game ends
//! - Action history (persistent vector, O(1) clone)
//!
//! ## Invariants
//!
//! - `phase == MillRemoval` exactly when `phase_before_removal` is set
//! - `pieces_placed[p] <= pieces_per_player` for both players
//! - `outcome` is set exactly when `phase == GameEnd`

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionRecord};
use super::config::MorrisConfig;
use super::player::{Player, PlayerMap};
use crate::board::PositionId;

/// Phase of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Players alternate placing pieces from hand.
    Placing,
    /// Players alternate moving pieces along lines.
    Moving,
    /// The player who formed a mill must remove an opponent piece.
    MillRemoval,
    /// Terminal.
    GameEnd,
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GamePhase::Placing => "Placing",
            GamePhase::Moving => "Moving",
            GamePhase::MillRemoval => "MillRemoval",
            GamePhase::GameEnd => "GameEnd",
        };
        f.write_str(name)
    }
}

/// Why the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinReason {
    /// The loser was reduced below three pieces.
    LessThan3PiecesLeft,
    /// The loser had no legal move on their turn.
    NoValidMovesLeft,
}

impl std::fmt::Display for WinReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinReason::LessThan3PiecesLeft => f.write_str("opponent has fewer than 3 pieces"),
            WinReason::NoValidMovesLeft => f.write_str("opponent has no valid moves"),
        }
    }
}

/// Final result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    /// The winning player.
    pub winner: Player,
    /// Why they won.
    pub reason: WinReason,
}

/// Game progression state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    // === Phase ===
    /// Current phase.
    pub phase: GamePhase,

    /// Phase interrupted by a mill removal.
    pub phase_before_removal: Option<GamePhase>,

    // === Turn ===
    /// Player whose turn it is.
    pub current_player: Player,

    /// Pieces placed so far, per player.
    pub pieces_placed: PlayerMap<u8>,

    /// Piece selected for a following move.
    pub selected: Option<PositionId>,

    /// Action applied to the board but not yet resolved.
    pub pending: Option<Action>,

    /// Set once the game has ended.
    pub outcome: Option<Outcome>,

    /// Turn number (starts at 1, increments on every turn switch).
    pub turn_number: u32,

    /// Global action counter.
    pub action_sequence: u32,

    // === History ===
    /// Every accepted action, in order.
    pub action_history: Vector<ActionRecord>,

    max_pieces_per_player: u8,
}

impl GameState {
    /// Create the initial state: Placing phase, first player to act.
    #[must_use]
    pub fn new(config: &MorrisConfig) -> Self {
        Self {
            phase: GamePhase::Placing,
            phase_before_removal: None,
            current_player: config.first_player,
            pieces_placed: PlayerMap::with_value(0),
            selected: None,
            pending: None,
            outcome: None,
            turn_number: 1,
            action_sequence: 0,
            action_history: Vector::new(),
            max_pieces_per_player: config.pieces_per_player,
        }
    }

    /// Pieces each player places in total.
    #[must_use]
    pub fn max_pieces_per_player(&self) -> u8 {
        self.max_pieces_per_player
    }

    /// True unless an action awaits confirmation or the game has ended.
    #[must_use]
    pub fn can_interact(&self) -> bool {
        self.pending.is_none() && !self.is_over()
    }

    /// Has the game ended?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameEnd
    }

    /// The winner, once the game has ended.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        self.outcome.map(|o| o.winner)
    }

    // === Placement Bookkeeping ===

    /// Pieces `player` still has to place.
    #[must_use]
    pub fn pieces_left_to_place(&self, player: Player) -> u8 {
        self.max_pieces_per_player
            .saturating_sub(self.pieces_placed[player])
    }

    /// Have both players placed every piece?
    #[must_use]
    pub fn all_pieces_placed(&self) -> bool {
        Player::ALL
            .iter()
            .all(|&p| self.pieces_placed[p] >= self.max_pieces_per_player)
    }

    /// Mark every piece as placed (used when a game starts mid-way).
    pub fn mark_all_placed(&mut self) {
        self.pieces_placed = PlayerMap::with_value(self.max_pieces_per_player);
    }

    // === Transitions ===

    /// Hand the turn to the opponent, clearing any selection.
    pub fn switch_turn(&mut self) {
        self.current_player = self.current_player.opponent();
        self.selected = None;
        self.turn_number += 1;
    }

    /// Interrupt the current phase for a mill removal.
    pub fn enter_mill_removal(&mut self) {
        self.phase_before_removal = Some(self.phase);
        self.phase = GamePhase::MillRemoval;
    }

    /// The phase a finished removal returns to.
    ///
    /// A removal that interrupted Placing continues with Moving once every
    /// piece has been placed.
    #[must_use]
    pub fn restored_phase(&self) -> GamePhase {
        match self.phase_before_removal {
            Some(GamePhase::Placing) | None if self.all_pieces_placed() => GamePhase::Moving,
            Some(phase) => phase,
            None => GamePhase::Placing,
        }
    }

    /// Leave MillRemoval, returning the restored phase.
    pub fn leave_mill_removal(&mut self) -> GamePhase {
        let restored = self.restored_phase();
        self.phase_before_removal = None;
        self.phase = restored;
        restored
    }

    /// Enter the terminal phase.
    pub fn finish(&mut self, outcome: Outcome) {
        self.phase = GamePhase::GameEnd;
        self.phase_before_removal = None;
        self.selected = None;
        self.outcome = Some(outcome);
    }

    // === Action History ===

    /// Record an action in history.
    pub fn record_action(&mut self, record: ActionRecord) {
        self.action_history.push_back(record);
    }

    /// Get the next action sequence number and increment.
    pub fn next_sequence(&mut self) -> u32 {
        let seq = self.action_sequence;
        self.action_sequence += 1;
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(&MorrisConfig::nine_mens_morris())
    }

    #[test]
    fn test_initial_state() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Placing);
        assert_eq!(state.current_player, Player::One);
        assert_eq!(state.turn_number, 1);
        assert!(state.can_interact());
        assert!(!state.is_over());
        assert_eq!(state.pieces_left_to_place(Player::One), 9);
        assert!(!state.all_pieces_placed());
    }

    #[test]
    fn test_first_player_from_config() {
        let config = MorrisConfig::default().with_first_player(Player::Two);
        assert_eq!(GameState::new(&config).current_player, Player::Two);
    }

    #[test]
    fn test_switch_turn() {
        let mut state = state();
        state.selected = Some(PositionId::new(3));
        state.switch_turn();

        assert_eq!(state.current_player, Player::Two);
        assert_eq!(state.selected, None);
        assert_eq!(state.turn_number, 2);
    }

    #[test]
    fn test_mill_removal_round_trip() {
        let mut state = state();
        state.enter_mill_removal();
        assert_eq!(state.phase, GamePhase::MillRemoval);
        assert_eq!(state.phase_before_removal, Some(GamePhase::Placing));

        assert_eq!(state.leave_mill_removal(), GamePhase::Placing);
        assert_eq!(state.phase, GamePhase::Placing);
        assert_eq!(state.phase_before_removal, None);
    }

    #[test]
    fn test_removal_after_last_placement_restores_moving() {
        let mut state = state();
        state.mark_all_placed();
        state.enter_mill_removal();

        assert_eq!(state.restored_phase(), GamePhase::Moving);
        assert_eq!(state.leave_mill_removal(), GamePhase::Moving);
    }

    #[test]
    fn test_pending_blocks_interaction() {
        let mut state = state();
        state.pending = Some(Action::Place {
            position: PositionId::new(0),
        });
        assert!(!state.can_interact());
    }

    #[test]
    fn test_finish() {
        let mut state = state();
        state.enter_mill_removal();
        state.finish(Outcome {
            winner: Player::Two,
            reason: WinReason::NoValidMovesLeft,
        });

        assert!(state.is_over());
        assert!(!state.can_interact());
        assert_eq!(state.winner(), Some(Player::Two));
        assert_eq!(state.phase_before_removal, None);
    }

    #[test]
    fn test_sequence() {
        let mut state = state();
        assert_eq!(state.next_sequence(), 0);
        assert_eq!(state.next_sequence(), 1);
        assert_eq!(state.action_sequence, 2);
    }
}
