//! # Swiss Pairing
//!
//! Pairs the next round of a Swiss-system tournament from current standings
//! and match history.
//!
//! ## Architecture
//!
//! - **models**: Players, standings, match history, pairings and round output
//! - **pairing**: Bye selection, the pairing engine and round orchestration
//! - **storage**: The store contract and its JSONL implementation
//! - **config**: Configuration loading and validation

pub mod config;
pub mod models;
pub mod pairing;
pub mod storage;

pub use models::*;
pub use pairing::{next_round, pair, pair_round, preview_round, PairingError, RoundError};
