//! Round assembly and orchestration against a store.

use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use super::{choose_bye, pair, PairingError};
use crate::config::PairingConfig;
use crate::models::{
    MatchHistory, PlayerId, RoundResult, StandingsEntry, Tournament, TournamentId,
};
use crate::storage::{StorageError, TournamentStore};

/// Errors from pairing a round through a store.
#[derive(Debug, Error)]
pub enum RoundError {
    #[error(transparent)]
    Pairing(#[from] PairingError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Tournament {0} is complete")]
    TournamentComplete(TournamentId),
}

/// Build a full round from a ranked pool.
///
/// An odd pool first loses one randomly chosen bye-eligible player; the rest
/// are paired by rank. Nothing is committed here.
pub fn pair_round<R: Rng + ?Sized>(
    standings: &[StandingsEntry],
    history: &MatchHistory,
    byes: &HashSet<PlayerId>,
    rng: &mut R,
) -> Result<RoundResult, PairingError> {
    if standings.is_empty() {
        return Err(PairingError::EmptyPool);
    }

    let bye = if standings.len() % 2 == 1 {
        Some(choose_bye(standings, byes, rng)?)
    } else {
        None
    };

    let pool: Vec<StandingsEntry> = match &bye {
        Some(bye) => standings
            .iter()
            .filter(|entry| entry.id != bye.player_id)
            .cloned()
            .collect(),
        None => standings.to_vec(),
    };

    let pairings = pair(&pool, history)?;
    Ok(RoundResult::new(bye, pairings))
}

/// Pair the next round of a stored tournament without committing anything.
pub fn preview_round<S, R>(
    store: &S,
    tournament_id: &TournamentId,
    config: &PairingConfig,
    rng: &mut R,
) -> Result<RoundResult, RoundError>
where
    S: TournamentStore,
    R: Rng + ?Sized,
{
    let tournament = open_tournament(store, tournament_id)?;
    build_round(store, &tournament, config, rng)
}

/// Pair the next round of a stored tournament and commit it.
///
/// Standings, history and byes are read once up front and the round is fully
/// computed before anything is written. The round transition is saved first;
/// if crediting the bye then fails, the previous tournament record is restored.
pub fn next_round<S, R>(
    store: &mut S,
    tournament_id: &TournamentId,
    config: &PairingConfig,
    rng: &mut R,
) -> Result<RoundResult, RoundError>
where
    S: TournamentStore,
    R: Rng + ?Sized,
{
    let mut tournament = open_tournament(store, tournament_id)?;
    let round = build_round(store, &tournament, config, rng)?;

    let previous = tournament.clone();
    let number = tournament
        .begin_round()
        .ok_or_else(|| RoundError::TournamentComplete(tournament_id.clone()))?;
    store.save_tournament(&tournament)?;

    if let Some(bye) = &round.bye {
        if let Err(e) = store.apply_bye(tournament_id, bye.player_id) {
            warn!(
                "Bye for player {} failed, rolling back round {} of {}",
                bye.player_id, number, tournament_id
            );
            store.save_tournament(&previous)?;
            return Err(e.into());
        }
    }

    info!(
        "Paired round {} of {}: {} pairings, bye: {}, forced rematches: {}",
        number,
        tournament_id,
        round.pairings.len(),
        round
            .bye
            .as_ref()
            .map(|b| b.player_id.to_string())
            .unwrap_or_else(|| "none".to_string()),
        round.forced_rematches()
    );

    Ok(round)
}

fn open_tournament<S: TournamentStore>(
    store: &S,
    tournament_id: &TournamentId,
) -> Result<Tournament, RoundError> {
    let tournament = store.tournament(tournament_id)?;
    if tournament.is_complete() {
        return Err(RoundError::TournamentComplete(tournament_id.clone()));
    }
    Ok(tournament)
}

fn build_round<S, R>(
    store: &S,
    tournament: &Tournament,
    config: &PairingConfig,
    rng: &mut R,
) -> Result<RoundResult, RoundError>
where
    S: TournamentStore,
    R: Rng + ?Sized,
{
    let standings = store.player_standings(&tournament.id, config.tie_break, rng)?;
    let history = store.match_history(&tournament.id)?;
    let byes = store.bye_history(&tournament.id)?;

    Ok(pair_round(&standings, &history, &byes, rng)?)
}
