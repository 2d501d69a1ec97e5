//! Seeding: order the teams so that consecutive pairs become round-1 matches.

use crate::models::{BracketTeam, SeedingStrategy, TeamId, TournamentError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Order `teams` for pairwise filling of round 1 (`[0, 1]`, `[2, 3]`, ...).
pub fn seed_teams<R: Rng + ?Sized>(
    strategy: &SeedingStrategy,
    teams: &[BracketTeam],
    rng: &mut R,
) -> Result<Vec<BracketTeam>, TournamentError> {
    match strategy {
        SeedingStrategy::Random => {
            let mut seeded = teams.to_vec();
            seeded.shuffle(rng);
            Ok(seeded)
        }
        SeedingStrategy::Ranked => Ok(ranked(teams)),
        SeedingStrategy::Manual(order) => manual(teams, order),
    }
}

/// Strongest first; pairs seed k with seed n+1-k. With an odd count the top seed
/// takes the trailing bye.
fn ranked(teams: &[BracketTeam]) -> Vec<BracketTeam> {
    let mut by_rating = teams.to_vec();
    // Stable: unrated teams keep registration order at the bottom.
    by_rating.sort_by_key(|t| std::cmp::Reverse(t.rating.map_or(0, |r| u64::from(r) + 1)));

    let bye = if by_rating.len() % 2 == 1 {
        Some(by_rating.remove(0))
    } else {
        None
    };

    let mut seeded = Vec::with_capacity(teams.len());
    let (mut lo, mut hi) = (0, by_rating.len());
    while lo < hi {
        hi -= 1;
        seeded.push(by_rating[lo].clone());
        seeded.push(by_rating[hi].clone());
        lo += 1;
    }
    seeded.extend(bye);
    seeded
}

fn manual(
    teams: &[BracketTeam],
    order: &[TeamId],
) -> Result<Vec<BracketTeam>, TournamentError> {
    let unique: HashSet<_> = order.iter().copied().collect();
    if order.len() != teams.len() || unique.len() != order.len() {
        return Err(TournamentError::InvalidSeeding);
    }
    order
        .iter()
        .map(|id| {
            teams
                .iter()
                .find(|t| t.id == *id)
                .cloned()
                .ok_or(TournamentError::InvalidSeeding)
        })
        .collect()
}
