//! Match results and the derived rematch history.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PlayerId, TournamentId};

/// A reported match result. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRecord {
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub tournament_id: TournamentId,

    /// Round the match was played in (0 if reported before any pairing)
    #[serde(default)]
    pub round: u32,

    pub recorded_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(
        tournament_id: TournamentId,
        round: u32,
        winner_id: PlayerId,
        loser_id: PlayerId,
    ) -> Self {
        Self {
            winner_id,
            loser_id,
            tournament_id,
            round,
            recorded_at: Utc::now(),
        }
    }
}

/// Set of unordered player pairs that have already met.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchHistory {
    played: HashSet<(PlayerId, PlayerId)>,
}

fn unordered(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `a` and `b` have played, in either order.
    pub fn insert(&mut self, a: PlayerId, b: PlayerId) {
        self.played.insert(unordered(a, b));
    }

    pub fn has_played(&self, a: PlayerId, b: PlayerId) -> bool {
        self.played.contains(&unordered(a, b))
    }

    pub fn len(&self) -> usize {
        self.played.len()
    }

    pub fn is_empty(&self) -> bool {
        self.played.is_empty()
    }
}

impl<'a> FromIterator<&'a MatchRecord> for MatchHistory {
    fn from_iter<I: IntoIterator<Item = &'a MatchRecord>>(iter: I) -> Self {
        let mut history = Self::new();
        for record in iter {
            history.insert(record.winner_id, record.loser_id);
        }
        history
    }
}

impl FromIterator<(PlayerId, PlayerId)> for MatchHistory {
    fn from_iter<I: IntoIterator<Item = (PlayerId, PlayerId)>>(iter: I) -> Self {
        let mut history = Self::new();
        for (a, b) in iter {
            history.insert(a, b);
        }
        history
    }
}
