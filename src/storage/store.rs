//! JSONL-backed tournament store.

use std::collections::HashSet;

use tracing::info;

use super::{
    list_tournaments, EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError,
    TournamentStore,
};
use crate::models::{
    sort_by_registration, MatchHistory, MatchRecord, Player, PlayerId, StandingsEntry, Tournament,
    TournamentId,
};

/// Tournament store over the filesystem data directory.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    config: StorageConfig,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Create and persist a new tournament.
    pub fn create_tournament(&mut self, name: &str) -> Result<Tournament, StorageError> {
        let tournament = Tournament::new(name.trim().to_string());
        self.save_tournament(&tournament)?;
        info!("Created tournament {} ({})", tournament.name, tournament.id);
        Ok(tournament)
    }

    pub fn list_tournaments(&self) -> Result<Vec<TournamentId>, StorageError> {
        list_tournaments(&self.config)
    }

    /// Full roster in registration order.
    pub fn players(&self, id: &TournamentId) -> Result<Vec<Player>, StorageError> {
        self.ensure_exists(id)?;
        let mut players: Vec<Player> =
            JsonlReader::for_entity(&self.config, EntityType::Player, id).read_all()?;
        players.sort_by_key(|p| p.id);
        Ok(players)
    }

    pub fn matches(&self, id: &TournamentId) -> Result<Vec<MatchRecord>, StorageError> {
        self.ensure_exists(id)?;
        JsonlReader::for_entity(&self.config, EntityType::Match, id).read_all()
    }

    pub fn count_players(&self, id: &TournamentId) -> Result<usize, StorageError> {
        Ok(self.players(id)?.len())
    }

    /// Register a player and assign the next serial ID.
    pub fn register_player(
        &mut self,
        id: &TournamentId,
        name: &str,
    ) -> Result<Player, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        let mut players = self.players(id)?;
        let next_id = players.iter().map(|p| p.id.0).max().unwrap_or(0) + 1;
        let player = Player::new(PlayerId(next_id), name.to_string());
        players.push(player.clone());
        self.write_players(id, &players)?;

        info!("Registered player {} ({}) in {}", player.name, player.id, id);
        Ok(player)
    }

    /// Record a match result and update both players' records.
    pub fn report_match(
        &mut self,
        id: &TournamentId,
        winner: PlayerId,
        loser: PlayerId,
    ) -> Result<MatchRecord, StorageError> {
        if winner == loser {
            return Err(StorageError::InvalidMatch(format!(
                "player {} cannot play themselves",
                winner
            )));
        }

        let tournament = self.tournament(id)?;
        let mut players = self.players(id)?;

        for player_id in [winner, loser] {
            if !players.iter().any(|p| p.id == player_id) {
                return Err(StorageError::UnknownPlayer {
                    tournament: id.clone(),
                    player: player_id,
                });
            }
        }

        for player in players.iter_mut() {
            if player.id == winner {
                player.record_win();
            } else if player.id == loser {
                player.record_loss();
            }
        }

        let record = MatchRecord::new(id.clone(), tournament.current_round, winner, loser);
        JsonlWriter::for_entity(&self.config, EntityType::Match, id).append(&record)?;
        self.write_players(id, &players)?;

        info!("Reported match in {}: {} beat {}", id, winner, loser);
        Ok(record)
    }

    /// Remove every match and reset all player records.
    pub fn delete_matches(&mut self, id: &TournamentId) -> Result<(), StorageError> {
        let mut players = self.players(id)?;
        for player in players.iter_mut() {
            player.reset_record();
        }

        JsonlWriter::<MatchRecord>::for_entity(&self.config, EntityType::Match, id).clear()?;
        self.write_players(id, &players)?;

        info!("Deleted matches and reset standings for {}", id);
        Ok(())
    }

    /// Remove the whole roster and its matches.
    ///
    /// IDs restart at 1 after this, so the old match history has to go too.
    pub fn delete_players(&mut self, id: &TournamentId) -> Result<(), StorageError> {
        self.ensure_exists(id)?;
        JsonlWriter::<MatchRecord>::for_entity(&self.config, EntityType::Match, id).clear()?;
        JsonlWriter::<Player>::for_entity(&self.config, EntityType::Player, id).clear()?;
        info!("Deleted all players and matches for {}", id);
        Ok(())
    }

    fn write_players(&self, id: &TournamentId, players: &[Player]) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, EntityType::Player, id).write_all(players)?;
        Ok(())
    }

    fn ensure_exists(&self, id: &TournamentId) -> Result<(), StorageError> {
        let reader: JsonlReader<Tournament> =
            JsonlReader::for_entity(&self.config, EntityType::Tournament, id);
        if reader.exists() {
            Ok(())
        } else {
            Err(StorageError::UnknownTournament(id.clone()))
        }
    }
}

impl TournamentStore for JsonlStore {
    fn tournament(&self, id: &TournamentId) -> Result<Tournament, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Tournament, id)
            .read_all()?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::UnknownTournament(id.clone()))
    }

    fn save_tournament(&mut self, tournament: &Tournament) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, EntityType::Tournament, &tournament.id)
            .write_all(std::slice::from_ref(tournament))?;
        Ok(())
    }

    fn standings(&self, id: &TournamentId) -> Result<Vec<StandingsEntry>, StorageError> {
        let mut entries: Vec<StandingsEntry> =
            self.players(id)?.iter().map(Player::standing).collect();
        sort_by_registration(&mut entries);
        Ok(entries)
    }

    fn match_history(&self, id: &TournamentId) -> Result<MatchHistory, StorageError> {
        Ok(self.matches(id)?.iter().collect())
    }

    fn bye_history(&self, id: &TournamentId) -> Result<HashSet<PlayerId>, StorageError> {
        Ok(self
            .players(id)?
            .into_iter()
            .filter(|p| p.has_received_bye)
            .map(|p| p.id)
            .collect())
    }

    fn apply_bye(&mut self, id: &TournamentId, player: PlayerId) -> Result<(), StorageError> {
        let mut players = self.players(id)?;
        let target = players
            .iter_mut()
            .find(|p| p.id == player)
            .ok_or_else(|| StorageError::UnknownPlayer {
                tournament: id.clone(),
                player,
            })?;

        if !target.commit_bye() {
            return Err(StorageError::ByeAlreadyReceived(player));
        }

        self.write_players(id, &players)?;
        info!("Applied bye to player {} in {}", player, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TieBreak;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn setup(names: &[&str]) -> (TempDir, JsonlStore, TournamentId) {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonlStore::new(StorageConfig::new(temp_dir.path().to_path_buf()));
        let tournament = store.create_tournament("Test Open").unwrap();
        for name in names {
            store.register_player(&tournament.id, name).unwrap();
        }
        (temp_dir, store, tournament.id)
    }

    #[test]
    fn test_create_and_list_tournament() {
        let (_dir, store, id) = setup(&[]);
        assert_eq!(store.list_tournaments().unwrap(), vec![id.clone()]);
        assert_eq!(store.tournament(&id).unwrap().name, "Test Open");
    }

    #[test]
    fn test_unknown_tournament() {
        let (_dir, store, _id) = setup(&[]);
        let missing = TournamentId::from("missing");
        assert!(matches!(
            store.standings(&missing),
            Err(StorageError::UnknownTournament(_))
        ));
        assert!(matches!(
            store.tournament(&missing),
            Err(StorageError::UnknownTournament(_))
        ));
    }

    #[test]
    fn test_register_assigns_serial_ids() {
        let (_dir, mut store, id) = setup(&["Alice", "Bob"]);
        let carol = store.register_player(&id, "  Carol ").unwrap();

        assert_eq!(carol.id, PlayerId(3));
        assert_eq!(carol.name, "Carol");
        assert_eq!(store.count_players(&id).unwrap(), 3);
    }

    #[test]
    fn test_register_rejects_blank_name() {
        let (_dir, mut store, id) = setup(&[]);
        assert!(matches!(
            store.register_player(&id, "   "),
            Err(StorageError::InvalidName(_))
        ));
    }

    #[test]
    fn test_report_match_updates_standings() {
        let (_dir, mut store, id) = setup(&["Alice", "Bob", "Carol", "Dave"]);
        store.report_match(&id, PlayerId(4), PlayerId(1)).unwrap();
        store.report_match(&id, PlayerId(2), PlayerId(3)).unwrap();

        let standings = store.standings(&id).unwrap();
        assert_eq!(
            standings,
            vec![
                StandingsEntry::new(2, "Bob", 1, 1),
                StandingsEntry::new(4, "Dave", 1, 1),
                StandingsEntry::new(1, "Alice", 0, 1),
                StandingsEntry::new(3, "Carol", 0, 1),
            ]
        );

        let history = store.match_history(&id).unwrap();
        assert!(history.has_played(PlayerId(1), PlayerId(4)));
        assert!(history.has_played(PlayerId(3), PlayerId(2)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_report_match_rejects_bad_players() {
        let (_dir, mut store, id) = setup(&["Alice", "Bob"]);
        assert!(matches!(
            store.report_match(&id, PlayerId(1), PlayerId(1)),
            Err(StorageError::InvalidMatch(_))
        ));
        assert!(matches!(
            store.report_match(&id, PlayerId(1), PlayerId(9)),
            Err(StorageError::UnknownPlayer { .. })
        ));
        assert!(store.matches(&id).unwrap().is_empty());
    }

    #[test]
    fn test_apply_bye_once() {
        let (_dir, mut store, id) = setup(&["Alice", "Bob", "Carol"]);
        store.apply_bye(&id, PlayerId(2)).unwrap();

        let players = store.players(&id).unwrap();
        let bob = &players[1];
        assert_eq!((bob.wins, bob.matches_played), (1, 1));
        assert!(bob.has_received_bye);
        let expected: HashSet<PlayerId> = [PlayerId(2)].into_iter().collect();
        assert_eq!(store.bye_history(&id).unwrap(), expected);
        // Byes never create match records.
        assert!(store.match_history(&id).unwrap().is_empty());

        assert!(matches!(
            store.apply_bye(&id, PlayerId(2)),
            Err(StorageError::ByeAlreadyReceived(PlayerId(2)))
        ));
        assert_eq!(store.players(&id).unwrap()[1].wins, 1);
    }

    #[test]
    fn test_delete_matches_resets_records() {
        let (_dir, mut store, id) = setup(&["Alice", "Bob", "Carol"]);
        store.report_match(&id, PlayerId(1), PlayerId(2)).unwrap();
        store.apply_bye(&id, PlayerId(3)).unwrap();

        store.delete_matches(&id).unwrap();

        assert!(store.matches(&id).unwrap().is_empty());
        assert!(store.bye_history(&id).unwrap().is_empty());
        assert!(store
            .standings(&id)
            .unwrap()
            .iter()
            .all(|e| e.wins == 0 && e.matches_played == 0));
    }

    #[test]
    fn test_delete_players() {
        let (_dir, mut store, id) = setup(&["Alice", "Bob"]);
        store.delete_players(&id).unwrap();
        assert_eq!(store.count_players(&id).unwrap(), 0);

        let next = store.register_player(&id, "Eve").unwrap();
        assert_eq!(next.id, PlayerId(1));
    }

    #[test]
    fn test_new_roster_starts_with_clean_history() {
        let (_dir, mut store, id) = setup(&["A", "B", "C", "D"]);
        store.report_match(&id, PlayerId(1), PlayerId(2)).unwrap();

        store.delete_players(&id).unwrap();
        for name in ["E", "F", "G", "H"] {
            store.register_player(&id, name).unwrap();
        }

        let history = store.match_history(&id).unwrap();
        assert!(history.is_empty());
        assert!(!history.has_played(PlayerId(1), PlayerId(2)));
        assert!(store.matches(&id).unwrap().is_empty());
    }

    #[test]
    fn test_player_standings_registration_order() {
        let (_dir, mut store, id) = setup(&["Alice", "Bob", "Carol", "Dave"]);
        store.report_match(&id, PlayerId(3), PlayerId(4)).unwrap();

        let ids: Vec<u32> = store
            .player_standings(&id, TieBreak::Registration, &mut StdRng::seed_from_u64(0))
            .unwrap()
            .iter()
            .map(|e| e.id.0)
            .collect();
        assert_eq!(ids, vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_player_standings_random_tie_break() {
        let names: Vec<String> = (1..=10).map(|i| format!("P{}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let (_dir, mut store, id) = setup(&names);
        store.report_match(&id, PlayerId(10), PlayerId(9)).unwrap();

        let a = store
            .player_standings(&id, TieBreak::Random, &mut StdRng::seed_from_u64(4))
            .unwrap();
        let b = store
            .player_standings(&id, TieBreak::Random, &mut StdRng::seed_from_u64(4))
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(a[0].id, PlayerId(10));
        assert!(a.windows(2).all(|w| w[0].wins >= w[1].wins));
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn test_match_tagged_with_current_round() {
        let (_dir, mut store, id) = setup(&["Alice", "Bob"]);
        let mut tournament = store.tournament(&id).unwrap();
        tournament.begin_round();
        store.save_tournament(&tournament).unwrap();

        let record = store.report_match(&id, PlayerId(1), PlayerId(2)).unwrap();
        assert_eq!(record.round, 1);
    }
}
