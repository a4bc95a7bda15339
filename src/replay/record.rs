//! Game records: configuration plus the accepted actions.
//!
//! Binary layout: 4 magic bytes, 1 version byte, then the bincode-encoded
//! record.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::action::ActionRecord;
use crate::core::config::MorrisConfig;
use crate::core::error::{ConfigError, IllegalAction};
use crate::core::player::Player;
use crate::rules::TurnEngine;

/// Magic bytes for record identification.
const MAGIC: &[u8; 4] = b"MRRS";

/// Current format version.
const VERSION: u8 = 1;

/// Why a record could not be decoded or replayed.
#[derive(Debug, Display, Error)]
pub enum ReplayError {
    /// The bytes are not a game record.
    #[display("not a game record (bad magic or version {version})")]
    BadHeader {
        /// Version byte found, 0 if the input was too short.
        version: u8,
    },

    /// bincode failed.
    #[display("record encoding failed: {_0}")]
    Codec(#[error(source)] bincode::Error),

    /// The recorded configuration is invalid.
    #[display("recorded configuration is invalid: {_0}")]
    Config(#[error(source)] ConfigError),

    /// A recorded action was made by the wrong player.
    #[display("action {index} was recorded for {found} but {expected} was to act")]
    WrongPlayer {
        /// Position in the action list.
        index: usize,
        /// Player to act at that point.
        expected: Player,
        /// Player in the record.
        found: Player,
    },

    /// A recorded action was rejected.
    #[display("action {index} is illegal: {reason}")]
    Illegal {
        /// Position in the action list.
        index: usize,
        /// Why the engine rejected it.
        reason: IllegalAction,
    },
}

impl From<bincode::Error> for ReplayError {
    fn from(err: bincode::Error) -> Self {
        ReplayError::Codec(err)
    }
}

impl From<ConfigError> for ReplayError {
    fn from(err: ConfigError) -> Self {
        ReplayError::Config(err)
    }
}

/// A complete, replayable game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Configuration the game was played with.
    pub config: MorrisConfig,
    /// Accepted actions, in order.
    pub actions: Vec<ActionRecord>,
}

impl GameRecord {
    /// Record a game from the start.
    ///
    /// Only meaningful for engines created with `TurnEngine::new`; a game
    /// built from a prepared position cannot be replayed from its history.
    #[must_use]
    pub fn from_engine(engine: &TurnEngine) -> Self {
        Self {
            config: *engine.config(),
            actions: engine.history().iter().copied().collect(),
        }
    }

    /// Encode as bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        let encoded = bincode::serialize(self)?;
        let mut bytes = Vec::with_capacity(MAGIC.len() + 1 + encoded.len());
        bytes.extend_from_slice(MAGIC);
        bytes.push(VERSION);
        bytes.extend_from_slice(&encoded);
        Ok(bytes)
    }

    /// Decode from bytes produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplayError> {
        let header = MAGIC.len() + 1;
        if bytes.len() < header || &bytes[..MAGIC.len()] != MAGIC {
            return Err(ReplayError::BadHeader { version: 0 });
        }
        let version = bytes[MAGIC.len()];
        if version != VERSION {
            return Err(ReplayError::BadHeader { version });
        }
        Ok(bincode::deserialize(&bytes[header..])?)
    }

    /// Play every action on a fresh engine.
    ///
    /// Stops at the first action that is out of turn or illegal.
    pub fn replay(&self) -> Result<TurnEngine, ReplayError> {
        let mut engine = TurnEngine::new(self.config)?;

        for (index, record) in self.actions.iter().enumerate() {
            let expected = engine.current_player();
            if record.player != expected {
                return Err(ReplayError::WrongPlayer {
                    index,
                    expected,
                    found: record.player,
                });
            }
            engine
                .apply(record.action)
                .map_err(|reason| ReplayError::Illegal { index, reason })?;
            engine.drain_events();
        }

        debug!(actions = self.actions.len(), "replayed game record");
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PositionId;
    use crate::core::action::Action;

    fn place(id: u16) -> Action {
        Action::Place {
            position: PositionId::new(id),
        }
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut engine = TurnEngine::new(MorrisConfig::six_mens_morris()).unwrap();
        for p in [0, 8, 1] {
            engine.apply(place(p)).unwrap();
        }
        let record = GameRecord::from_engine(&engine);

        let bytes = record.to_bytes().unwrap();
        assert_eq!(&bytes[..4], b"MRRS");
        assert_eq!(GameRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(
            GameRecord::from_bytes(b"xx"),
            Err(ReplayError::BadHeader { version: 0 })
        ));
        assert!(matches!(
            GameRecord::from_bytes(b"MRRS\x09rest"),
            Err(ReplayError::BadHeader { version: 9 })
        ));
    }

    #[test]
    fn test_truncated_body() {
        assert!(matches!(
            GameRecord::from_bytes(b"MRRS\x01\x03"),
            Err(ReplayError::Codec(_))
        ));
    }

    #[test]
    fn test_replay_rejects_illegal_action() {
        let record = GameRecord {
            config: MorrisConfig::nine_mens_morris(),
            actions: vec![
                ActionRecord::new(Player::One, place(0), 1, 0),
                ActionRecord::new(Player::Two, place(0), 2, 1),
            ],
        };

        match record.replay() {
            Err(ReplayError::Illegal { index, reason }) => {
                assert_eq!(index, 1);
                assert_eq!(reason, IllegalAction::Occupied { position: PositionId::new(0) });
            }
            other => panic!("expected illegal action, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_replay_rejects_wrong_player() {
        let record = GameRecord {
            config: MorrisConfig::nine_mens_morris(),
            actions: vec![ActionRecord::new(Player::Two, place(0), 1, 0)],
        };
        assert!(matches!(
            record.replay(),
            Err(ReplayError::WrongPlayer { index: 0, expected: Player::One, found: Player::Two })
        ));
    }

    #[test]
    fn test_replay_rejects_bad_config() {
        let record = GameRecord {
            config: MorrisConfig::new(3, 20),
            actions: Vec::new(),
        };
        assert!(matches!(record.replay(), Err(ReplayError::Config(_))));
    }
}
