//! Bracket generation: rounds, links between rounds, and round-1 seating.

use crate::logic::rounds::{matches_in_round, next_match_position, round_count, series_type_for_round};
use crate::logic::seeding::seed_teams;
use crate::models::{Bracket, BracketTeam, Match, Tournament, TournamentError};
use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

/// Build a fresh bracket for `tournament` from `teams`, seeded with the tournament's strategy.
pub fn generate_bracket(
    tournament: &Tournament,
    teams: &[BracketTeam],
) -> Result<Bracket, TournamentError> {
    generate_bracket_with_rng(tournament, teams, &mut rand::thread_rng())
}

/// As [`generate_bracket`], drawing random seeding from `rng`.
///
/// 1. `R = ceil(log2(n))` rounds; round `r` holds `ceil(n / 2^r)` empty scheduled matches.
/// 2. Every match before the final links to round `r + 1`, position `ceil(position / 2)`.
/// 3. Seeded teams fill round 1 pairwise; an odd count leaves the trailing slot B empty (a bye).
pub fn generate_bracket_with_rng<R: Rng + ?Sized>(
    tournament: &Tournament,
    teams: &[BracketTeam],
    rng: &mut R,
) -> Result<Bracket, TournamentError> {
    let team_count = teams.len();
    if team_count < 2 {
        return Err(TournamentError::InsufficientTeams { found: team_count });
    }
    let seeded = seed_teams(&tournament.rules.seeding, teams, rng)?;

    let now = Utc::now();
    let rounds = round_count(team_count);

    // Built last round first so each match can take its successor's id directly.
    let mut by_round: Vec<Vec<Match>> = Vec::with_capacity(rounds as usize);
    for round in (1..=rounds).rev() {
        let series_type = series_type_for_round(&tournament.rules.match_rules, round, rounds);
        let next_round = by_round.last();
        let round_matches: Vec<Match> = (1..=matches_in_round(team_count, round) as u32)
            .map(|position| {
                let mut m = Match::new(tournament.id, round, position, series_type, now);
                m.next_match_id = next_round.map(|next| {
                    next[next_match_position(position) as usize - 1].id
                });
                m
            })
            .collect();
        by_round.push(round_matches);
    }
    by_round.reverse();

    let mut pairs = seeded.chunks(2);
    for m in by_round[0].iter_mut() {
        if let Some(pair) = pairs.next() {
            m.slot_a = pair.first().cloned();
            m.slot_b = pair.get(1).cloned();
        }
    }

    let matches: Vec<Match> = by_round.into_iter().flatten().collect();
    log::info!(
        "Generated bracket for tournament {}: {} teams, {} rounds, {} matches",
        tournament.id,
        team_count,
        rounds,
        matches.len()
    );

    Ok(Bracket {
        id: Uuid::new_v4(),
        tournament_id: tournament.id,
        rounds: (1..=rounds).collect(),
        matches,
        created_at: now,
        updated_at: now,
    })
}
