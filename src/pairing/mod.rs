//! Pairing core.
//!
//! - **bye**: random bye selection among players without a bye
//! - **engine**: adjacent-rank pairing with rematch avoidance
//! - **round**: assembles a full round and drives it against a store

pub mod bye;
pub mod engine;
pub mod round;

pub use bye::choose_bye;
pub use engine::pair;
pub use round::{next_round, pair_round, preview_round, RoundError};

use thiserror::Error;

use crate::models::PlayerId;

/// Errors raised while building a round.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairingError {
    #[error("Invalid pool: no players to pair")]
    EmptyPool,

    #[error("Invalid pool: all {0} players have already received a bye")]
    ByePoolExhausted(usize),

    #[error("Cannot pair an odd pool of {0} players")]
    OddPool(usize),

    #[error("Duplicate player id {0} in standings")]
    DuplicatePlayer(PlayerId),
}

impl PairingError {
    /// Whether the pool itself cannot produce a round.
    pub fn is_invalid_pool(&self) -> bool {
        matches!(
            self,
            PairingError::EmptyPool | PairingError::ByePoolExhausted(_)
        )
    }
}
