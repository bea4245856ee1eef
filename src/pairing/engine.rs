//! Adjacent-rank pairing with rematch avoidance.
//!
//! Standings stay in a fixed slice; a parallel `paired` vector marks who is
//! already seated. For each highest-ranked unpaired player the engine takes
//! the next unpaired player below them, unless the two have met, in which case
//! it scans further down for the first unpaired player they have not met.
//! Skipped players keep their relative order for the following pairings.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::PairingError;
use crate::models::{MatchHistory, Pairing, StandingsEntry};

/// Pair an even-sized ranked pool.
pub fn pair(
    standings: &[StandingsEntry],
    history: &MatchHistory,
) -> Result<Vec<Pairing>, PairingError> {
    validate_pool(standings)?;

    let mut paired = vec![false; standings.len()];
    let mut pairings = Vec::with_capacity(standings.len() / 2);

    for p in 0..standings.len() {
        if paired[p] {
            continue;
        }
        paired[p] = true;

        let first = &standings[p];
        let mut unpaired = (p + 1..standings.len()).filter(|&i| !paired[i]);

        // Pool is even and p was unpaired, so someone is left below p.
        let Some(adjacent) = unpaired.next() else {
            return Err(PairingError::OddPool(standings.len()));
        };

        let (x, rematch) = if !history.has_played(first.id, standings[adjacent].id) {
            (adjacent, false)
        } else {
            match unpaired.find(|&i| !history.has_played(first.id, standings[i].id)) {
                Some(x) => {
                    debug!(
                        "Player {} already met {}, paired down to {}",
                        first.id, standings[adjacent].id, standings[x].id
                    );
                    (x, false)
                }
                None => {
                    warn!(
                        "No unplayed opponent left for player {}, accepting rematch with {}",
                        first.id, standings[adjacent].id
                    );
                    (adjacent, true)
                }
            }
        };

        paired[x] = true;
        let mut pairing = Pairing::new(first, &standings[x]);
        pairing.rematch = rematch;
        pairings.push(pairing);
    }

    Ok(pairings)
}

fn validate_pool(standings: &[StandingsEntry]) -> Result<(), PairingError> {
    if standings.len() % 2 != 0 {
        return Err(PairingError::OddPool(standings.len()));
    }

    let mut seen = HashSet::with_capacity(standings.len());
    for entry in standings {
        if !seen.insert(entry.id) {
            return Err(PairingError::DuplicatePlayer(entry.id));
        }
    }

    Ok(())
}
