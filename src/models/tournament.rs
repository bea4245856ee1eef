//! Tournament record and round lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TournamentId;

/// Lifecycle phase of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentPhase {
    #[default]
    Registration,
    RoundInProgress,
    Complete,
}

impl std::fmt::Display for TournamentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentPhase::Registration => write!(f, "registration"),
            TournamentPhase::RoundInProgress => write!(f, "round in progress"),
            TournamentPhase::Complete => write!(f, "complete"),
        }
    }
}

/// A Swiss-system tournament.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tournament {
    /// Unique identifier (derived from name + creation time)
    pub id: TournamentId,

    pub name: String,

    #[serde(default)]
    pub phase: TournamentPhase,

    /// Number of rounds paired so far
    #[serde(default)]
    pub current_round: u32,

    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in the registration phase.
    pub fn new(name: String) -> Self {
        let created_at = Utc::now();
        let id = TournamentId::generate(&[&name, &created_at.to_rfc3339()]);

        Self {
            id,
            name,
            phase: TournamentPhase::Registration,
            current_round: 0,
            created_at,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == TournamentPhase::Complete
    }

    /// Move into the next round. Returns the new round number, or `None`
    /// if the tournament is already complete.
    pub fn begin_round(&mut self) -> Option<u32> {
        if self.is_complete() {
            return None;
        }
        self.phase = TournamentPhase::RoundInProgress;
        self.current_round += 1;
        Some(self.current_round)
    }

    pub fn complete(&mut self) {
        self.phase = TournamentPhase::Complete;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tournament_is_registering() {
        let t = Tournament::new("Spring Open".to_string());
        assert_eq!(t.phase, TournamentPhase::Registration);
        assert_eq!(t.current_round, 0);
        assert_eq!(t.id.as_str().len(), 16);
    }

    #[test]
    fn test_begin_round_advances() {
        let mut t = Tournament::new("Spring Open".to_string());
        assert_eq!(t.begin_round(), Some(1));
        assert_eq!(t.begin_round(), Some(2));
        assert_eq!(t.phase, TournamentPhase::RoundInProgress);
    }

    #[test]
    fn test_complete_blocks_new_rounds() {
        let mut t = Tournament::new("Spring Open".to_string());
        t.begin_round();
        t.complete();
        assert!(t.is_complete());
        assert_eq!(t.begin_round(), None);
        assert_eq!(t.current_round, 1);
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_string(&TournamentPhase::RoundInProgress).unwrap();
        assert_eq!(json, "\"round_in_progress\"");
    }
}
