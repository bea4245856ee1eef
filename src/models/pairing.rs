//! Round output: pairings and the optional bye.

use serde::{Deserialize, Serialize};

use super::{PlayerId, StandingsEntry};

/// A head-to-head pairing. Seat order carries no meaning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pairing {
    pub player1_id: PlayerId,
    pub player1_name: String,
    pub player2_id: PlayerId,
    pub player2_name: String,

    /// Set when no unplayed opponent was left and a rematch was accepted
    #[serde(default)]
    pub rematch: bool,
}

impl Pairing {
    pub fn new(first: &StandingsEntry, second: &StandingsEntry) -> Self {
        Self {
            player1_id: first.id,
            player1_name: first.name.clone(),
            player2_id: second.id,
            player2_name: second.name.clone(),
            rematch: false,
        }
    }
}

/// A bye: an automatic win with no opponent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ByeRecord {
    pub player_id: PlayerId,
    pub name: String,
}

impl ByeRecord {
    pub fn new(entry: &StandingsEntry) -> Self {
        Self {
            player_id: entry.id,
            name: entry.name.clone(),
        }
    }

    /// The `(id, name, "bye")` tuple form handed to renderers.
    pub fn as_tuple(&self) -> (PlayerId, &str, &'static str) {
        (self.player_id, &self.name, "bye")
    }
}

/// Everything produced for one round.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundResult {
    pub bye: Option<ByeRecord>,
    pub pairings: Vec<Pairing>,
}

impl RoundResult {
    pub fn new(bye: Option<ByeRecord>, pairings: Vec<Pairing>) -> Self {
        Self { bye, pairings }
    }

    /// Every player ID in the round, bye recipient first.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.bye.iter().map(|b| b.player_id).chain(
            self.pairings
                .iter()
                .flat_map(|p| [p.player1_id, p.player2_id]),
        )
    }

    /// Number of pairings that had to accept a rematch.
    pub fn forced_rematches(&self) -> usize {
        self.pairings.iter().filter(|p| p.rematch).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_from_entries() {
        let a = StandingsEntry::new(1, "Alice", 2, 2);
        let b = StandingsEntry::new(2, "Bob", 2, 2);
        let pairing = Pairing::new(&a, &b);

        assert_eq!(pairing.player1_id, PlayerId(1));
        assert_eq!(pairing.player2_id, PlayerId(2));
        assert_eq!(pairing.player1_name, "Alice");
        assert!(!pairing.rematch);
    }

    #[test]
    fn test_bye_tuple() {
        let bye = ByeRecord::new(&StandingsEntry::new(3, "Carol", 2, 3));
        assert_eq!(bye.as_tuple(), (PlayerId(3), "Carol", "bye"));
    }

    #[test]
    fn test_round_result_ids_bye_first() {
        let a = StandingsEntry::new(1, "A", 0, 0);
        let b = StandingsEntry::new(2, "B", 0, 0);
        let c = StandingsEntry::new(3, "C", 0, 0);
        let round = RoundResult::new(Some(ByeRecord::new(&c)), vec![Pairing::new(&a, &b)]);

        let ids: Vec<u32> = round.player_ids().map(|id| id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(round.forced_rematches(), 0);
    }

    #[test]
    fn test_pairing_rematch_flag_defaults_false() {
        let json = r#"{"player1_id":1,"player1_name":"A","player2_id":2,"player2_name":"B"}"#;
        let pairing: Pairing = serde_json::from_str(json).unwrap();
        assert!(!pairing.rematch);
    }
}
