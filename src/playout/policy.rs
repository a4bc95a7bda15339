//! Playout policies.
//!
//! A policy picks one of the legal actions of the player to act:
//! - `UniformPolicy`: uniformly at random
//! - `MillSeekingPolicy`: closes a mill when it can, otherwise uniform

use crate::core::{Action, GameRng, GamePhase};
use crate::rules::TurnEngine;

/// Chooses actions during a playout.
pub trait PlayoutPolicy {
    /// Pick an action for the player to act.
    ///
    /// Returns `None` if no legal actions exist.
    fn choose_action(&self, engine: &TurnEngine, rng: &mut GameRng) -> Option<Action>;
}

/// Uniform random policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformPolicy;

impl PlayoutPolicy for UniformPolicy {
    fn choose_action(&self, engine: &TurnEngine, rng: &mut GameRng) -> Option<Action> {
        let actions = engine.legal_actions();
        rng.choose(&actions).copied()
    }
}

/// Greedy policy that prefers mill-forming placements and moves.
///
/// Each candidate is tried on a clone of the engine, which is cheap because
/// all engine state is persistent.
#[derive(Clone, Copy, Debug, Default)]
pub struct MillSeekingPolicy;

impl MillSeekingPolicy {
    /// Would this action put the game into MillRemoval?
    #[must_use]
    pub fn forms_mill(engine: &TurnEngine, action: Action) -> bool {
        if matches!(action, Action::Remove { .. } | Action::Select { .. }) {
            return false;
        }
        let mut probe = engine.clone();
        probe.apply(action).is_ok() && probe.phase() == GamePhase::MillRemoval
    }
}

impl PlayoutPolicy for MillSeekingPolicy {
    fn choose_action(&self, engine: &TurnEngine, rng: &mut GameRng) -> Option<Action> {
        let actions = engine.legal_actions();
        let closing: Vec<Action> = actions
            .iter()
            .copied()
            .filter(|&a| Self::forms_mill(engine, a))
            .collect();

        if closing.is_empty() {
            rng.choose(&actions).copied()
        } else {
            rng.choose(&closing).copied()
        }
    }
}
