//! Tournament persistence.
//!
//! The pairing core reads standings and history through [`TournamentStore`]
//! and writes back only the bye. [`JsonlStore`] keeps everything as JSON Lines
//! under the data directory:
//! - `tournaments/<id>/tournament.jsonl`: the tournament record
//! - `tournaments/<id>/players.jsonl`: roster and running records
//! - `tournaments/<id>/matches.jsonl`: append-only match results

mod jsonl;
mod store;

pub use jsonl::*;
pub use store::*;

use std::collections::HashSet;
use std::path::PathBuf;

use rand::Rng;
use thiserror::Error;

use crate::models::{
    MatchHistory, PlayerId, StandingsEntry, TieBreak, Tournament, TournamentId,
};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown tournament: {0}")]
    UnknownTournament(TournamentId),

    #[error("Unknown player {player} in tournament {tournament}")]
    UnknownPlayer {
        tournament: TournamentId,
        player: PlayerId,
    },

    #[error("Player {0} has already received a bye")]
    ByeAlreadyReceived(PlayerId),

    #[error("Invalid match: {0}")]
    InvalidMatch(String),

    #[error("Invalid player name: {0:?}")]
    InvalidName(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tournaments_dir(&self) -> PathBuf {
        self.data_dir.join("tournaments")
    }

    pub fn tournament_dir(&self, id: &TournamentId) -> PathBuf {
        self.tournaments_dir().join(id.as_str())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Read/write contract between the pairing core and persistence.
pub trait TournamentStore {
    fn tournament(&self, id: &TournamentId) -> Result<Tournament, StorageError>;

    fn save_tournament(&mut self, tournament: &Tournament) -> Result<(), StorageError>;

    /// Standings ordered by wins descending, ties by registration.
    fn standings(&self, id: &TournamentId) -> Result<Vec<StandingsEntry>, StorageError>;

    /// Standings ordered by wins descending, ties resolved by `tie_break`.
    fn player_standings<R: Rng + ?Sized>(
        &self,
        id: &TournamentId,
        tie_break: TieBreak,
        rng: &mut R,
    ) -> Result<Vec<StandingsEntry>, StorageError> {
        let mut entries = self.standings(id)?;
        tie_break.apply(&mut entries, rng);
        Ok(entries)
    }

    fn match_history(&self, id: &TournamentId) -> Result<MatchHistory, StorageError>;

    /// Players who already received a bye.
    fn bye_history(&self, id: &TournamentId) -> Result<HashSet<PlayerId>, StorageError>;

    /// Credit a bye: one win, one match played, bye flag set.
    fn apply_bye(&mut self, id: &TournamentId, player: PlayerId) -> Result<(), StorageError>;
}
