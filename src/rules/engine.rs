//! Turn engine: the game phase machine.
//!
//! ## Two-phase actions
//!
//! Every board-changing request runs in two steps so a presentation layer
//! can animate in between:
//!
//! 1. `begin_action` (or one of the `request_*` methods): preflight, validate,
//!    mutate the board, mark the action pending, emit the immediate event.
//! 2. `commit_action` (`confirm_action_complete`): update mills, advance the
//!    phase machine, check win conditions.
//!
//! While an action is pending every other request is rejected with
//! `IllegalAction::ActionPending`. Selection is instantaneous and never
//! pending. Headless callers use `apply`, which does both steps.
//!
//! ## Phases
//!
//! ```text
//! Placing ──(all placed)──> Moving
//!    │  ^                    │  ^
//!  mill│  │removal         mill│  │removal
//!    v  │                    v  │
//!   MillRemoval ─────────────┘
//!        │
//!        └──(win)──> GameEnd
//! ```

use std::sync::Arc;

use im::Vector;
use tracing::{debug, info, instrument};

use super::events::{EventSink, GameEvent};
use super::validator::MoveValidator;
use crate::board::{Board, BoardState, PositionId};
use crate::core::action::{Action, ActionRecord};
use crate::core::config::MorrisConfig;
use crate::core::error::{ConfigError, IllegalAction};
use crate::core::player::Player;
use crate::core::state::{GamePhase, GameState, Outcome, WinReason};
use crate::mills::{ActiveMills, MillDetector};

/// A running game.
///
/// Cloning is cheap: the topology is shared and all other collections are
/// persistent, apart from the event outbox.
///
/// ## Example
///
/// ```
/// use rust_morris::board::PositionId;
/// use rust_morris::core::{GamePhase, MorrisConfig, Player};
/// use rust_morris::rules::TurnEngine;
///
/// let mut engine = TurnEngine::new(MorrisConfig::nine_mens_morris()).unwrap();
///
/// engine.request_place(PositionId::new(0)).unwrap();
/// assert!(!engine.state().can_interact());
///
/// engine.confirm_action_complete().unwrap();
/// assert_eq!(engine.current_player(), Player::Two);
/// assert_eq!(engine.phase(), GamePhase::Placing);
/// ```
#[derive(Clone, Debug)]
pub struct TurnEngine {
    config: MorrisConfig,
    board: BoardState,
    state: GameState,
    mills: ActiveMills,
    events: Vec<GameEvent>,
}

impl TurnEngine {
    /// Start a new game in the Placing phase.
    pub fn new(config: MorrisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let topology = Arc::new(Board::build(config.rings)?);
        let board = BoardState::new(topology, config.pieces_per_player);
        let state = GameState::new(&config);

        info!(
            rings = config.rings,
            pieces = config.pieces_per_player,
            first = %config.first_player,
            "new game"
        );
        Ok(Self::from_position(config, board, state))
    }

    /// Resume from an arbitrary position. Active mills are rebuilt.
    pub(crate) fn from_position(config: MorrisConfig, board: BoardState, state: GameState) -> Self {
        let mills = ActiveMills::rebuild(&board);
        Self {
            config,
            board,
            state,
            mills,
            events: Vec::new(),
        }
    }

    // === Accessors ===

    /// Game configuration.
    #[must_use]
    pub fn config(&self) -> &MorrisConfig {
        &self.config
    }

    /// Board occupancy.
    #[must_use]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Progression state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mills currently standing.
    #[must_use]
    pub fn mills(&self) -> &ActiveMills {
        &self.mills
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Player to act.
    #[must_use]
    pub fn current_player(&self) -> Player {
        self.state.current_player
    }

    /// Has the game ended?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Winner and reason, once the game has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    /// Accepted actions, in order.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.state.action_history
    }

    /// Rule queries over the current position.
    #[must_use]
    pub fn validator(&self) -> MoveValidator<'_> {
        MoveValidator::new(&self.state, &self.board, self.config.flying)
    }

    /// Mill queries over the current position.
    #[must_use]
    pub fn detector(&self) -> MillDetector<'_> {
        MillDetector::new(&self.board)
    }

    // === Event Outbox ===

    /// Events not yet drained.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every queued event.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Forward every queued event to a sink, emptying the outbox.
    pub fn flush_events(&mut self, sink: &mut impl EventSink) {
        for event in self.events.drain(..) {
            sink.emit(&event);
        }
    }

    // === Requests ===

    /// Place the current player's next piece.
    #[instrument(skip(self))]
    pub fn request_place(&mut self, position: PositionId) -> Result<(), IllegalAction> {
        self.begin_action(Action::Place { position })
    }

    /// Select a piece for a following move.
    #[instrument(skip(self))]
    pub fn request_select(&mut self, position: PositionId) -> Result<(), IllegalAction> {
        self.begin_action(Action::Select { position })
    }

    /// Move (or fly) a piece.
    #[instrument(skip(self))]
    pub fn request_move(&mut self, from: PositionId, to: PositionId) -> Result<(), IllegalAction> {
        self.begin_action(Action::Move { from, to })
    }

    /// Remove an opponent piece after forming a mill.
    #[instrument(skip(self))]
    pub fn request_remove(&mut self, position: PositionId) -> Result<(), IllegalAction> {
        self.begin_action(Action::Remove { position })
    }

    /// Signal that the pending action finished animating.
    #[instrument(skip(self))]
    pub fn confirm_action_complete(&mut self) -> Result<(), IllegalAction> {
        self.commit_action()
    }

    /// Validate and apply an action to the board, leaving it pending.
    ///
    /// Rejections are returned and also queued as `GameEvent::IllegalAction`.
    pub fn begin_action(&mut self, action: Action) -> Result<(), IllegalAction> {
        self.try_begin(action).map_err(|reason| self.reject(reason))
    }

    /// Resolve the pending action.
    pub fn commit_action(&mut self) -> Result<(), IllegalAction> {
        if self.state.is_over() {
            return Err(self.reject(IllegalAction::GameOver));
        }
        let Some(action) = self.state.pending.take() else {
            return Err(self.reject(IllegalAction::NothingPending));
        };

        match action {
            Action::Place { position } => self.resolve_placement(position),
            Action::Move { to, .. } => self.resolve_move(to),
            Action::Remove { .. } => self.resolve_removal(),
            Action::Select { .. } => {}
        }
        Ok(())
    }

    /// Begin and, when needed, commit an action in one call.
    pub fn apply(&mut self, action: Action) -> Result<(), IllegalAction> {
        self.begin_action(action)?;
        if action.needs_confirmation() {
            self.commit_action()?;
        }
        Ok(())
    }

    /// Every action the current player may take right now.
    ///
    /// Selections are not listed; every listed move is directly applicable.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        if !self.state.can_interact() {
            return Vec::new();
        }

        let validator = self.validator();
        let player = self.state.current_player;
        match self.state.phase {
            GamePhase::Placing => validator
                .placeable_positions()
                .into_iter()
                .map(|position| Action::Place { position })
                .collect(),
            GamePhase::Moving => validator
                .selectable_pieces(player)
                .into_iter()
                .flat_map(|from| {
                    validator
                        .legal_destinations(from)
                        .into_iter()
                        .map(move |to| Action::Move { from, to })
                })
                .collect(),
            GamePhase::MillRemoval => validator
                .removable_pieces(player)
                .into_iter()
                .map(|position| Action::Remove { position })
                .collect(),
            GamePhase::GameEnd => Vec::new(),
        }
    }

    // === Begin ===

    fn preflight(&self) -> Result<(), IllegalAction> {
        if self.state.is_over() {
            return Err(IllegalAction::GameOver);
        }
        if self.state.pending.is_some() {
            return Err(IllegalAction::ActionPending);
        }
        Ok(())
    }

    fn try_begin(&mut self, action: Action) -> Result<(), IllegalAction> {
        self.preflight()?;
        let player = self.state.current_player;

        match action {
            Action::Place { position } => {
                self.validator().check_place(position)?;
                let piece = self
                    .board
                    .next_in_hand(player)
                    .ok_or(IllegalAction::NoPiecesInHand { player })?;
                self.board.occupy(position, piece)?;
                self.state.pieces_placed[player] += 1;
                self.events.push(GameEvent::PiecePlaced {
                    player,
                    piece,
                    position,
                });
            }
            Action::Select { position } => {
                self.validator().check_select(position, player)?;
                self.state.selected = Some(position);
                self.events.push(GameEvent::PieceSelected { player, position });
            }
            Action::Move { from, to } => {
                self.validator().check_move(from, to, player)?;
                let piece = self.board.relocate(from, to)?;
                self.state.selected = None;
                self.events.push(GameEvent::PieceMoved {
                    player,
                    piece,
                    from,
                    to,
                });
            }
            Action::Remove { position } => {
                self.validator().check_remove(position, player)?;
                let piece = self.board.capture(position)?;
                self.events.push(GameEvent::PieceRemoved {
                    by: player,
                    owner: player.opponent(),
                    piece,
                    position,
                });
            }
        }

        let sequence = self.state.next_sequence();
        self.state.record_action(ActionRecord::new(
            player,
            action,
            self.state.turn_number,
            sequence,
        ));
        if action.needs_confirmation() {
            self.state.pending = Some(action);
        }
        Ok(())
    }

    fn reject(&mut self, reason: IllegalAction) -> IllegalAction {
        debug!(%reason, player = %self.state.current_player, "action rejected");
        self.events.push(GameEvent::IllegalAction(reason));
        reason
    }

    // === Commit ===

    fn resolve_placement(&mut self, position: PositionId) {
        if self.update_mills(Some(position)) && self.can_serve_removal() {
            self.enter_removal();
        } else if self.state.all_pieces_placed() {
            self.set_phase(GamePhase::Moving);
            self.pass_turn();
            self.check_mobility();
        } else {
            self.pass_turn();
        }
    }

    fn resolve_move(&mut self, to: PositionId) {
        if self.update_mills(Some(to)) && self.can_serve_removal() {
            self.enter_removal();
        } else {
            self.pass_turn();
            self.check_mobility();
        }
    }

    fn resolve_removal(&mut self) {
        self.update_mills(None);

        let remover = self.state.current_player;
        let victim = remover.opponent();
        for loser in [victim, remover] {
            if self.validator().is_loss_by_piece_count(loser) {
                self.finish(loser.opponent(), WinReason::LessThan3PiecesLeft);
                return;
            }
        }

        let restored = self.state.restored_phase();
        if restored == GamePhase::Moving && self.validator().is_game_over_by_no_valid_moves(victim) {
            self.finish(remover, WinReason::NoValidMovesLeft);
            return;
        }

        self.state.leave_mill_removal();
        self.events.push(GameEvent::PhaseChanged(restored));
        info!(phase = %restored, "phase restored after removal");
        self.pass_turn();
    }

    /// Returns whether a mill formed.
    fn update_mills(&mut self, arrived: Option<PositionId>) -> bool {
        let changes = self.mills.update(&self.board, arrived);
        for mill in changes.broken.iter().copied() {
            debug!(%mill, "mill broken");
            self.events.push(GameEvent::MillBroken(mill));
        }
        for mill in changes.formed.iter().copied() {
            debug!(%mill, "mill formed");
            self.events.push(GameEvent::MillFormed(mill));
        }
        changes.formed_any()
    }

    /// A mill only earns a removal if the opponent has something on the board.
    fn can_serve_removal(&self) -> bool {
        let opponent = self.state.current_player.opponent();
        if self.board.on_board(opponent) == 0 {
            debug!(%opponent, "mill formed with no piece to remove");
            return false;
        }
        true
    }

    fn enter_removal(&mut self) {
        self.state.enter_mill_removal();
        self.events.push(GameEvent::PhaseChanged(GamePhase::MillRemoval));
        info!(player = %self.state.current_player, "mill removal");
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.state.phase = phase;
        self.events.push(GameEvent::PhaseChanged(phase));
        info!(%phase, "phase changed");
    }

    fn pass_turn(&mut self) {
        self.state.switch_turn();
        let player = self.state.current_player;
        self.events.push(GameEvent::TurnChanged(player));
        debug!(%player, turn = self.state.turn_number, "turn changed");
    }

    /// In the Moving phase, a player without a legal move loses.
    fn check_mobility(&mut self) {
        if self.state.phase != GamePhase::Moving {
            return;
        }
        let player = self.state.current_player;
        if self.validator().is_game_over_by_no_valid_moves(player) {
            self.finish(player.opponent(), WinReason::NoValidMovesLeft);
        }
    }

    fn finish(&mut self, winner: Player, reason: WinReason) {
        let outcome = Outcome { winner, reason };
        self.state.finish(outcome);
        self.events.push(GameEvent::PhaseChanged(GamePhase::GameEnd));
        self.events.push(GameEvent::GameEnded { winner, reason });
        info!(%winner, %reason, "game over");
    }
}
