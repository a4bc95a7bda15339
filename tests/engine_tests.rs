//! Turn engine integration tests.
//!
//! Full game flows through the phase machine: placement, mills, removal,
//! movement, and both win conditions.

use rust_morris::board::PositionId;
use rust_morris::core::{Action, GamePhase, IllegalAction, MorrisConfig, Outcome, Player, WinReason};
use rust_morris::mills::{ActiveMills, Mill};
use rust_morris::rules::{GameBuilder, GameEvent, TurnEngine};
use rust_morris::Axis;

fn pos(id: u16) -> PositionId {
    PositionId::new(id)
}

fn place(engine: &mut TurnEngine, id: u16) {
    engine.apply(Action::Place { position: pos(id) }).unwrap();
}

fn slide(engine: &mut TurnEngine, from: u16, to: u16) {
    engine
        .apply(Action::Move { from: pos(from), to: pos(to) })
        .unwrap();
}

fn remove(engine: &mut TurnEngine, id: u16) {
    engine.apply(Action::Remove { position: pos(id) }).unwrap();
}

fn mill(owner: Player, axis: Axis, ids: [u16; 3]) -> Mill {
    Mill {
        owner,
        axis,
        positions: ids.map(pos),
    }
}

// =============================================================================
// Placing
// =============================================================================

/// Test a mill during placement, the removal, and the return to Placing.
#[test]
fn test_mill_in_placing_phase() {
    let mut engine = TurnEngine::new(MorrisConfig::nine_mens_morris()).unwrap();

    for id in [0, 8, 1, 9] {
        place(&mut engine, id);
    }
    engine.drain_events();

    engine.request_place(pos(2)).unwrap();
    assert_eq!(
        engine.drain_events(),
        vec![GameEvent::PiecePlaced {
            player: Player::One,
            piece: rust_morris::PieceId::new(2),
            position: pos(2),
        }]
    );

    engine.confirm_action_complete().unwrap();
    assert_eq!(engine.phase(), GamePhase::MillRemoval);
    assert_eq!(engine.current_player(), Player::One);
    assert_eq!(engine.state().phase_before_removal, Some(GamePhase::Placing));
    assert_eq!(
        engine.drain_events(),
        vec![
            GameEvent::MillFormed(mill(Player::One, Axis::Horizontal, [0, 1, 2])),
            GameEvent::PhaseChanged(GamePhase::MillRemoval),
        ]
    );

    // Only opponent pieces can go
    assert_eq!(
        engine.request_remove(pos(1)),
        Err(IllegalAction::OwnPiece { position: pos(1), player: Player::One })
    );
    engine.drain_events();

    remove(&mut engine, 8);
    assert_eq!(engine.phase(), GamePhase::Placing);
    assert_eq!(engine.current_player(), Player::Two);
    assert_eq!(engine.state().phase_before_removal, None);
    assert!(!engine.board().is_occupied(pos(8)));
    assert_eq!(engine.board().remaining(Player::Two), 8);

    let events = engine.drain_events();
    assert_eq!(
        &events[1..],
        &[
            GameEvent::PhaseChanged(GamePhase::Placing),
            GameEvent::TurnChanged(Player::Two),
        ]
    );
}

/// Test that placing every piece without a mill leads to Moving.
#[test]
fn test_placing_to_moving() {
    let mut engine = TurnEngine::new(MorrisConfig::nine_mens_morris()).unwrap();
    let order: Vec<u16> = (0..=16).chain(std::iter::once(18)).collect();

    for (i, &id) in order.iter().enumerate() {
        assert_eq!(engine.phase(), GamePhase::Placing, "before placement {}", i);
        place(&mut engine, id);
    }

    assert_eq!(engine.phase(), GamePhase::Moving);
    assert_eq!(engine.current_player(), Player::One);
    assert!(!engine.is_over());
    assert!(engine.mills().is_empty());
    assert_eq!(engine.state().pieces_placed[Player::One], 9);
    assert_eq!(engine.state().pieces_placed[Player::Two], 9);
    assert!(engine.events().contains(&GameEvent::PhaseChanged(GamePhase::Moving)));

    assert_eq!(
        engine.request_place(pos(20)),
        Err(IllegalAction::WrongPhase { phase: GamePhase::Moving })
    );
}

/// Test that a mill on the very last placement restores to Moving.
#[test]
fn test_mill_on_final_placement() {
    let mut engine = TurnEngine::new(MorrisConfig::new(2, 4)).unwrap();

    for id in [0, 3, 5, 4, 8, 11, 14] {
        place(&mut engine, id);
    }
    place(&mut engine, 2);
    assert_eq!(engine.phase(), GamePhase::MillRemoval);
    assert_eq!(engine.current_player(), Player::Two);
    assert!(engine.mills().contains(&mill(Player::Two, Axis::Vertical, [4, 3, 2])));

    remove(&mut engine, 14);
    assert_eq!(engine.phase(), GamePhase::Moving);
    assert_eq!(engine.current_player(), Player::One);
    assert!(engine.validator().is_flying_phase(Player::One));
    assert!(!engine.is_over());
}

/// Test that a mill leaving the opponent below three pieces ends the game.
#[test]
fn test_less_than_three_pieces() {
    let mut engine = TurnEngine::new(MorrisConfig::new(1, 3)).unwrap();

    for id in [0, 3, 1, 4, 2] {
        place(&mut engine, id);
    }
    assert_eq!(engine.phase(), GamePhase::MillRemoval);
    engine.drain_events();

    remove(&mut engine, 3);
    assert!(engine.is_over());
    assert_eq!(
        engine.outcome(),
        Some(Outcome {
            winner: Player::One,
            reason: WinReason::LessThan3PiecesLeft,
        })
    );
    assert!(engine.drain_events().ends_with(&[
        GameEvent::PhaseChanged(GamePhase::GameEnd),
        GameEvent::GameEnded {
            winner: Player::One,
            reason: WinReason::LessThan3PiecesLeft,
        },
    ]));
}

// =============================================================================
// Moving
// =============================================================================

/// Test that sealing the opponent in wins by no valid moves.
#[test]
fn test_win_by_no_valid_moves() {
    let mut engine = GameBuilder::new()
        .piece(0, Player::Two)
        .piece(2, Player::Two)
        .piece(4, Player::Two)
        .piece(6, Player::Two)
        .piece(1, Player::One)
        .piece(3, Player::One)
        .piece(5, Player::One)
        .piece(15, Player::One)
        .moving_phase()
        .to_move(Player::One)
        .build()
        .unwrap();
    assert!(engine.validator().has_any_valid_move(Player::Two));

    engine.request_move(pos(15), pos(7)).unwrap();
    engine.drain_events();
    engine.confirm_action_complete().unwrap();

    assert_eq!(
        engine.drain_events(),
        vec![
            GameEvent::TurnChanged(Player::Two),
            GameEvent::PhaseChanged(GamePhase::GameEnd),
            GameEvent::GameEnded {
                winner: Player::One,
                reason: WinReason::NoValidMovesLeft,
            },
        ]
    );
    assert_eq!(engine.request_move(pos(0), pos(8)), Err(IllegalAction::GameOver));
    assert_eq!(engine.confirm_action_complete(), Err(IllegalAction::GameOver));
}

/// Test breaking a mill and re-forming it to earn a removal.
#[test]
fn test_mill_break_and_reform() {
    let mut engine = GameBuilder::new()
        .piece(0, Player::One)
        .piece(1, Player::One)
        .piece(2, Player::One)
        .piece(20, Player::One)
        .piece(12, Player::Two)
        .piece(14, Player::Two)
        .piece(22, Player::Two)
        .piece(10, Player::Two)
        .moving_phase()
        .build()
        .unwrap();
    let top = mill(Player::One, Axis::Horizontal, [0, 1, 2]);
    assert!(engine.mills().contains(&top));

    slide(&mut engine, 1, 9);
    assert_eq!(
        engine.drain_events()[1..],
        [GameEvent::MillBroken(top), GameEvent::TurnChanged(Player::Two)]
    );

    slide(&mut engine, 22, 21);
    engine.drain_events();

    slide(&mut engine, 9, 1);
    assert_eq!(
        engine.drain_events()[1..],
        [
            GameEvent::MillFormed(top),
            GameEvent::PhaseChanged(GamePhase::MillRemoval),
        ]
    );
    assert_eq!(engine.state().phase_before_removal, Some(GamePhase::Moving));

    let mut removable = engine.validator().removable_pieces(Player::One);
    removable.sort_unstable();
    assert_eq!(removable, vec![pos(10), pos(12), pos(14), pos(21)]);
}

/// Test a single move that breaks one mill and completes another.
#[test]
fn test_move_breaks_and_forms_mill() {
    let mut engine = GameBuilder::new()
        .piece(0, Player::One)
        .piece(1, Player::One)
        .piece(2, Player::One)
        .piece(11, Player::One)
        .piece(19, Player::One)
        .piece(16, Player::Two)
        .piece(18, Player::Two)
        .piece(21, Player::Two)
        .piece(6, Player::Two)
        .moving_phase()
        .build()
        .unwrap();

    slide(&mut engine, 2, 3);
    assert_eq!(
        engine.drain_events()[1..],
        [
            GameEvent::MillBroken(mill(Player::One, Axis::Horizontal, [0, 1, 2])),
            GameEvent::MillFormed(mill(Player::One, Axis::Horizontal, [3, 11, 19])),
            GameEvent::PhaseChanged(GamePhase::MillRemoval),
        ]
    );
    assert_eq!(engine.mills(), &ActiveMills::rebuild(engine.board()));
    assert_eq!(engine.mills().len(), 1);

    // A plain removal returns to Moving with the turn passed
    remove(&mut engine, 6);
    assert_eq!(engine.phase(), GamePhase::Moving);
    assert_eq!(engine.current_player(), Player::Two);
    assert_eq!(engine.state().phase_before_removal, None);
    assert!(!engine.is_over());
    assert_eq!(
        engine.drain_events()[1..],
        [
            GameEvent::PhaseChanged(GamePhase::Moving),
            GameEvent::TurnChanged(Player::Two),
        ]
    );
}

/// Test that a removal leaving the victim without a move wins the game.
#[test]
fn test_removal_leaves_victim_stuck() {
    let mut engine = GameBuilder::new()
        .piece(1, Player::One)
        .piece(3, Player::One)
        .piece(5, Player::One)
        .piece(7, Player::One)
        .piece(16, Player::One)
        .piece(17, Player::One)
        .piece(19, Player::One)
        .piece(0, Player::Two)
        .piece(2, Player::Two)
        .piece(4, Player::Two)
        .piece(6, Player::Two)
        .piece(20, Player::Two)
        .moving_phase()
        .build()
        .unwrap();

    slide(&mut engine, 19, 18);
    assert_eq!(engine.phase(), GamePhase::MillRemoval);
    engine.drain_events();

    // Only 20 could still move
    remove(&mut engine, 20);
    assert_eq!(
        engine.outcome(),
        Some(Outcome {
            winner: Player::One,
            reason: WinReason::NoValidMovesLeft,
        })
    );
    assert_eq!(engine.state().phase_before_removal, None);
    assert!(engine.drain_events().ends_with(&[
        GameEvent::PhaseChanged(GamePhase::GameEnd),
        GameEvent::GameEnded {
            winner: Player::One,
            reason: WinReason::NoValidMovesLeft,
        },
    ]));
}

/// Test select then move, and that selection needs no confirmation.
#[test]
fn test_select_then_move() {
    let mut engine = GameBuilder::new()
        .piece(0, Player::One)
        .piece(4, Player::One)
        .piece(9, Player::One)
        .piece(13, Player::One)
        .piece(18, Player::Two)
        .piece(20, Player::Two)
        .piece(22, Player::Two)
        .piece(7, Player::Two)
        .moving_phase()
        .build()
        .unwrap();

    engine.request_select(pos(9)).unwrap();
    assert!(engine.state().can_interact());
    assert_eq!(engine.state().selected, Some(pos(9)));

    assert_eq!(
        engine.request_move(pos(9), pos(11)),
        Err(IllegalAction::NotAdjacent { from: pos(9), to: pos(11) })
    );
    engine.request_move(pos(9), pos(8)).unwrap();
    assert_eq!(engine.state().selected, None);
    engine.confirm_action_complete().unwrap();
    assert_eq!(engine.current_player(), Player::Two);
}

/// Test that a flying player can jump anywhere.
#[test]
fn test_flying_move() {
    let mut engine = GameBuilder::new()
        .piece(0, Player::One)
        .piece(8, Player::One)
        .piece(20, Player::One)
        .piece(3, Player::Two)
        .piece(11, Player::Two)
        .piece(12, Player::Two)
        .piece(13, Player::Two)
        .moving_phase()
        .build()
        .unwrap();

    slide(&mut engine, 0, 22);
    assert!(engine.board().is_occupied(pos(22)));

    // Player two has four pieces and must slide
    assert_eq!(
        engine.request_move(pos(3), pos(17)),
        Err(IllegalAction::NotAdjacent { from: pos(3), to: pos(17) })
    );
}

// =============================================================================
// Preflight
// =============================================================================

/// Test that every request is rejected while an action is pending.
#[test]
fn test_pending_rejects_everything() {
    let mut engine = TurnEngine::new(MorrisConfig::nine_mens_morris()).unwrap();
    engine.request_place(pos(0)).unwrap();

    assert_eq!(engine.request_place(pos(1)), Err(IllegalAction::ActionPending));
    assert_eq!(engine.request_select(pos(0)), Err(IllegalAction::ActionPending));
    assert_eq!(engine.request_remove(pos(0)), Err(IllegalAction::ActionPending));

    engine.confirm_action_complete().unwrap();
    assert_eq!(engine.confirm_action_complete(), Err(IllegalAction::NothingPending));
}

/// Test that the configured first player starts.
#[test]
fn test_first_player() {
    let config = MorrisConfig::nine_mens_morris().with_first_player(Player::Two);
    let mut engine = TurnEngine::new(config).unwrap();

    place(&mut engine, 5);
    assert_eq!(engine.board().owner_at(pos(5)), Some(Player::Two));
    assert_eq!(engine.current_player(), Player::One);
}

/// Test that a mill with nothing to remove does not stall the game.
#[test]
fn test_mill_without_removable_piece() {
    let mut engine = GameBuilder::new()
        .piece(0, Player::One)
        .piece(1, Player::One)
        .build()
        .unwrap();

    place(&mut engine, 2);
    assert_eq!(engine.mills().len(), 1);
    assert_eq!(engine.phase(), GamePhase::Placing);
    assert_eq!(engine.current_player(), Player::Two);
}
