//! Bye selection.
//!
//! Selection is pure given the RNG; crediting the bye is a separate step
//! (`Player::commit_bye` / `TournamentStore::apply_bye`).

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::PairingError;
use crate::models::{ByeRecord, PlayerId, StandingsEntry};

/// Pick a bye recipient uniformly at random among players not in `byes`.
pub fn choose_bye<R: Rng + ?Sized>(
    standings: &[StandingsEntry],
    byes: &HashSet<PlayerId>,
    rng: &mut R,
) -> Result<ByeRecord, PairingError> {
    if standings.is_empty() {
        return Err(PairingError::EmptyPool);
    }

    let eligible: Vec<&StandingsEntry> = standings
        .iter()
        .filter(|entry| !byes.contains(&entry.id))
        .collect();

    let chosen = eligible
        .choose(rng)
        .ok_or(PairingError::ByePoolExhausted(standings.len()))?;

    debug!(
        "Bye to player {} ({} of {} eligible)",
        chosen.id,
        eligible.len(),
        standings.len()
    );

    Ok(ByeRecord::new(chosen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn standings() -> Vec<StandingsEntry> {
        vec![
            StandingsEntry::new(1, "A", 3, 3),
            StandingsEntry::new(2, "B", 2, 3),
            StandingsEntry::new(3, "C", 2, 3),
        ]
    }

    #[test]
    fn test_bye_goes_to_eligible_player() {
        let byes: HashSet<PlayerId> = [PlayerId(1), PlayerId(2)].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..20 {
            let bye = choose_bye(&standings(), &byes, &mut rng).unwrap();
            assert_eq!(bye.player_id, PlayerId(3));
            assert_eq!(bye.name, "C");
        }
    }

    #[test]
    fn test_bye_never_repeats() {
        let byes: HashSet<PlayerId> = [PlayerId(2)].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let bye = choose_bye(&standings(), &byes, &mut rng).unwrap();
            assert_ne!(bye.player_id, PlayerId(2));
        }
    }

    #[test]
    fn test_bye_not_biased_to_lowest_rank() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();

        for _ in 0..200 {
            let bye = choose_bye(&standings(), &HashSet::new(), &mut rng).unwrap();
            seen.insert(bye.player_id);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_bye_pool_exhausted() {
        let byes: HashSet<PlayerId> = [1, 2, 3].into_iter().map(PlayerId).collect();
        let mut rng = StdRng::seed_from_u64(0);

        let err = choose_bye(&standings(), &byes, &mut rng).unwrap_err();
        assert_eq!(err, PairingError::ByePoolExhausted(3));
        assert!(err.is_invalid_pool());
    }

    #[test]
    fn test_bye_empty_pool() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = choose_bye(&[], &HashSet::new(), &mut rng).unwrap_err();
        assert_eq!(err, PairingError::EmptyPool);
    }

    #[test]
    fn test_bye_is_reproducible_with_seed() {
        let a = choose_bye(&standings(), &HashSet::new(), &mut StdRng::seed_from_u64(9)).unwrap();
        let b = choose_bye(&standings(), &HashSet::new(), &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }
}
