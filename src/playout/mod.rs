//! Policy-driven playouts.
//!
//! A playout repeatedly asks a `PlayoutPolicy` for one of the legal actions
//! and applies it, until the game ends or a ply budget runs out. Used for
//! benchmarks and for property tests that drive the engine through many
//! random positions.

pub mod policy;

pub use policy::{MillSeekingPolicy, PlayoutPolicy, UniformPolicy};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::core::{ConfigError, GameRng, MorrisConfig, Outcome, PlayerMap};
use crate::rules::TurnEngine;

/// Result of a playout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutResult {
    /// Set if the game ended within the budget.
    pub outcome: Option<Outcome>,
    /// Actions applied.
    pub plies: u32,
}

impl PlayoutResult {
    /// Did the game finish?
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Play `engine` forward with `policy` for at most `max_plies` actions.
///
/// The outbox is drained after every ply.
pub fn run_playout(
    engine: &mut TurnEngine,
    policy: &impl PlayoutPolicy,
    rng: &mut GameRng,
    max_plies: u32,
) -> PlayoutResult {
    let mut plies = 0;

    while plies < max_plies && !engine.is_over() {
        let Some(action) = policy.choose_action(engine, rng) else {
            debug!(phase = %engine.phase(), "no legal action, stopping playout");
            break;
        };

        trace!(ply = plies, player = %engine.current_player(), %action, "playout ply");
        if let Err(reason) = engine.apply(action) {
            debug!(%reason, %action, "policy chose an illegal action");
            break;
        }
        engine.drain_events();
        plies += 1;
    }

    PlayoutResult {
        outcome: engine.outcome(),
        plies,
    }
}

/// Aggregate results of a batch of playouts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutStats {
    /// Games played.
    pub games: u32,
    /// Games won, per player.
    pub wins: PlayerMap<u32>,
    /// Games that hit the ply budget.
    pub unfinished: u32,
    /// Actions applied over all games.
    pub total_plies: u64,
}

impl PlayoutStats {
    /// Mean actions per game.
    #[must_use]
    pub fn mean_plies(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_plies as f64 / f64::from(self.games)
    }
}

/// Play `games` fresh games of `config`, each on its own fork of `rng`.
pub fn run_playouts(
    config: MorrisConfig,
    policy: &impl PlayoutPolicy,
    rng: &mut GameRng,
    games: u32,
    max_plies: u32,
) -> Result<PlayoutStats, ConfigError> {
    let mut stats = PlayoutStats {
        games,
        wins: PlayerMap::with_value(0),
        unfinished: 0,
        total_plies: 0,
    };

    for _ in 0..games {
        let mut engine = TurnEngine::new(config)?;
        let mut game_rng = rng.fork();
        let result = run_playout(&mut engine, policy, &mut game_rng, max_plies);

        stats.total_plies += u64::from(result.plies);
        match result.outcome {
            Some(outcome) => stats.wins[outcome.winner] += 1,
            None => stats.unfinished += 1,
        }
    }

    info!(
        games,
        unfinished = stats.unfinished,
        mean_plies = stats.mean_plies(),
        "playout batch finished"
    );
    Ok(stats)
}
