//! Player and standings models.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A registered tournament player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    /// Serial identifier, assigned at registration
    pub id: PlayerId,

    /// Display name (need not be unique)
    pub name: String,

    /// Matches won, byes included
    pub wins: u32,

    /// Matches played, byes included
    pub matches_played: u32,

    /// Whether this player already received a bye in the tournament
    #[serde(default)]
    pub has_received_bye: bool,

    /// When the player registered
    pub registered_at: DateTime<Utc>,
}

impl Player {
    /// Create a freshly registered player with an empty record.
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            wins: 0,
            matches_played: 0,
            has_received_bye: false,
            registered_at: Utc::now(),
        }
    }

    /// Read-only standings projection of this player.
    pub fn standing(&self) -> StandingsEntry {
        StandingsEntry {
            id: self.id,
            name: self.name.clone(),
            wins: self.wins,
            matches_played: self.matches_played,
        }
    }

    /// Credit a reported win.
    pub fn record_win(&mut self) {
        self.wins += 1;
        self.matches_played += 1;
    }

    /// Credit a reported loss.
    pub fn record_loss(&mut self) {
        self.matches_played += 1;
    }

    /// Credit a bye. Returns false, leaving the record untouched, if the
    /// player already had one.
    pub fn commit_bye(&mut self) -> bool {
        if self.has_received_bye {
            return false;
        }
        self.record_win();
        self.has_received_bye = true;
        true
    }

    /// Clear wins, matches and the bye flag.
    pub fn reset_record(&mut self) {
        self.wins = 0;
        self.matches_played = 0;
        self.has_received_bye = false;
    }
}

/// One row of the standings table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StandingsEntry {
    pub id: PlayerId,
    pub name: String,
    pub wins: u32,
    pub matches_played: u32,
}

impl StandingsEntry {
    pub fn new(id: u32, name: &str, wins: u32, matches_played: u32) -> Self {
        Self {
            id: PlayerId(id),
            name: name.to_string(),
            wins,
            matches_played,
        }
    }
}

/// Secondary ordering for players on equal wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Earlier registration (lower ID) ranks first
    #[default]
    Registration,
    /// Shuffled once per round with the round's RNG
    Random,
}

impl TieBreak {
    /// Order `entries` by wins descending, ties resolved by this rule.
    pub fn apply<R: Rng + ?Sized>(self, entries: &mut [StandingsEntry], rng: &mut R) {
        match self {
            TieBreak::Registration => sort_by_registration(entries),
            TieBreak::Random => {
                // Stable sort keeps the shuffled order inside each win group.
                entries.shuffle(rng);
                entries.sort_by(|a, b| b.wins.cmp(&a.wins));
            }
        }
    }
}

/// Order by wins descending, then ascending ID.
pub fn sort_by_registration(entries: &mut [StandingsEntry]) {
    entries.sort_by(|a, b| b.wins.cmp(&a.wins).then(a.id.cmp(&b.id)));
}
