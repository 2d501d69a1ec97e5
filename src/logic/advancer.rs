//! Match results: recording winners, moving them into the next round, and the
//! per-game series flow underneath.
//!
//! Every operation validates first and mutates after, so a failed call leaves
//! the bracket untouched. Callers must serialize mutations of one bracket.

use crate::logic::rounds::feeds_slot_a;
use crate::models::{
    Bracket, BracketTeam, Game, Match, MatchId, MatchStatus, TeamId, TournamentError,
};
use chrono::Utc;

/// A validated result, ready to be written.
struct ResultPlan {
    index: usize,
    winner: Option<TeamId>,
    status: MatchStatus,
    /// Index of the next match and what the fed slot holds afterwards.
    seat: Option<(usize, Option<BracketTeam>)>,
}

fn find_index(bracket: &Bracket, match_id: MatchId) -> Result<usize, TournamentError> {
    bracket
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))
}

/// Check a result against the match state machine without touching the bracket.
fn plan_result(
    bracket: &Bracket,
    match_id: MatchId,
    winner: Option<TeamId>,
    status: Option<MatchStatus>,
    require_both_seated: bool,
) -> Result<ResultPlan, TournamentError> {
    let index = find_index(bracket, match_id)?;
    let m = &bracket.matches[index];
    let target = status.unwrap_or(if winner.is_some() {
        MatchStatus::Completed
    } else {
        MatchStatus::Scheduled
    });

    match m.status {
        MatchStatus::Cancelled => return Err(TournamentError::MatchClosed(match_id)),
        // Only re-applying the same result is allowed on a completed match.
        MatchStatus::Completed if target != MatchStatus::Completed || winner != m.winner_team_id => {
            return Err(TournamentError::MatchClosed(match_id));
        }
        _ => {}
    }
    if !m.status.can_transition_to(target) {
        return Err(TournamentError::InvalidTransition {
            from: m.status,
            to: target,
        });
    }
    let winner_allowed = matches!(target, MatchStatus::Completed | MatchStatus::Ongoing);
    if (target == MatchStatus::Completed && winner.is_none()) || (winner.is_some() && !winner_allowed)
    {
        return Err(TournamentError::WinnerStatusMismatch { status: target });
    }
    if target == MatchStatus::Ongoing && !m.is_seated() {
        return Err(TournamentError::TeamsNotSeated(match_id));
    }

    let winner_team = match winner {
        Some(team_id) => {
            if require_both_seated && !m.is_seated() {
                return Err(TournamentError::TeamsNotSeated(match_id));
            }
            let team = m.team(team_id).ok_or(TournamentError::InvalidWinner {
                match_id,
                team_id,
            })?;
            Some(team.clone())
        }
        None => None,
    };

    let seat = match m.next_match_id {
        Some(next_id) => {
            let next_index = find_index(bracket, next_id)?;
            let next = &bracket.matches[next_index];
            let current = if feeds_slot_a(m.position) {
                &next.slot_a
            } else {
                &next.slot_b
            };
            let wanted = match winner_team {
                Some(team) => Some(team),
                // A withdrawn winner leaves the slot it was moved into.
                None => current
                    .as_ref()
                    .filter(|t| Some(t.id) != m.winner_team_id)
                    .cloned(),
            };
            if *current != wanted && next.status != MatchStatus::Scheduled {
                return Err(TournamentError::NextMatchStarted(next_id));
            }
            Some((next_index, wanted))
        }
        None => None,
    };

    Ok(ResultPlan {
        index,
        winner,
        status: target,
        seat,
    })
}

/// Write a validated result and seat the winner in the next match.
fn apply_result(bracket: &mut Bracket, plan: ResultPlan) -> &Match {
    let now = Utc::now();
    let mut changed = false;

    let m = &mut bracket.matches[plan.index];
    if m.winner_team_id != plan.winner || m.status != plan.status {
        m.winner_team_id = plan.winner;
        match plan.status {
            MatchStatus::Ongoing => {
                m.started_at.get_or_insert(now);
            }
            MatchStatus::Completed | MatchStatus::Cancelled => m.completed_at = Some(now),
            MatchStatus::Scheduled => m.completed_at = None,
        }
        m.status = plan.status;
        m.updated_at = now;
        changed = true;
        log::debug!("Match {} is now {}", m.id, m.status);
    }
    let position = m.position;

    if let Some((next_index, wanted)) = plan.seat {
        let next = &mut bracket.matches[next_index];
        let slot = if feeds_slot_a(position) {
            &mut next.slot_a
        } else {
            &mut next.slot_b
        };
        if *slot != wanted {
            match &wanted {
                Some(team) => log::info!("Winner {} advanced to match {}", team.name, next.id),
                None => log::info!("Winner withdrawn from match {}", next.id),
            }
            *slot = wanted;
            next.updated_at = now;
            changed = true;
        }
    }

    if changed {
        bracket.updated_at = now;
    }
    &bracket.matches[plan.index]
}

/// Record a match result and move the winner into the linked next-round match.
///
/// `status` defaults to `completed` when a winner is given and `scheduled` otherwise.
/// A winner may also be given with `ongoing`; it is moved forward all the same.
/// A winner goes to slot A of the next match from odd positions and slot B from even
/// ones. Re-recording the same winner is a no-op. The next match's slot only changes
/// while that match is still `scheduled`.
pub fn record_result(
    bracket: &mut Bracket,
    match_id: MatchId,
    winner: Option<TeamId>,
    status: Option<MatchStatus>,
) -> Result<&Match, TournamentError> {
    let plan = plan_result(bracket, match_id, winner, status, true)?;
    Ok(apply_result(bracket, plan))
}

/// Move a fully seated match to `ongoing`.
pub fn start_match(bracket: &mut Bracket, match_id: MatchId) -> Result<&Match, TournamentError> {
    record_result(bracket, match_id, None, Some(MatchStatus::Ongoing))
}

/// Append a finished game to a series. Completes the match once `winner` has the
/// wins its series type requires.
pub fn record_game(
    bracket: &mut Bracket,
    match_id: MatchId,
    winner: TeamId,
) -> Result<&Match, TournamentError> {
    let index = find_index(bracket, match_id)?;
    let m = &bracket.matches[index];
    if m.status.is_terminal() {
        return Err(TournamentError::MatchClosed(match_id));
    }
    if !m.is_seated() {
        return Err(TournamentError::TeamsNotSeated(match_id));
    }
    if m.team(winner).is_none() {
        return Err(TournamentError::InvalidWinner {
            match_id,
            team_id: winner,
        });
    }
    if m.games.len() >= m.series_type.max_games() {
        return Err(TournamentError::SeriesFinished(match_id));
    }
    let decides_series = m.games_won(winner) + 1 >= m.series_type.wins_required();
    let plan = if decides_series {
        Some(plan_result(bracket, match_id, Some(winner), Some(MatchStatus::Completed), true)?)
    } else {
        None
    };

    let now = Utc::now();
    let m = &mut bracket.matches[index];
    let started_at = m
        .games
        .last()
        .and_then(|g| g.completed_at)
        .or(m.started_at)
        .unwrap_or(now);
    m.games.push(Game {
        game_number: m.games.len() as u32 + 1,
        winner_team_id: Some(winner),
        status: MatchStatus::Completed,
        started_at: Some(started_at),
        completed_at: Some(now),
    });
    if m.status == MatchStatus::Scheduled {
        m.status = MatchStatus::Ongoing;
        m.started_at = Some(started_at);
    }
    m.updated_at = now;
    bracket.updated_at = now;

    match plan {
        Some(plan) => Ok(apply_result(bracket, plan)),
        None => Ok(&bracket.matches[index]),
    }
}

/// Administrative resolution of a bye: complete a match holding a single team with
/// that team as winner and advance it. Byes never resolve on their own.
///
/// Only a true bye qualifies: every match feeding the empty slot must already be
/// completed or cancelled, so the slot can never be filled later.
pub fn advance_bye(bracket: &mut Bracket, match_id: MatchId) -> Result<&Match, TournamentError> {
    let index = find_index(bracket, match_id)?;
    let m = &bracket.matches[index];
    if m.status.is_terminal() {
        return Err(TournamentError::MatchClosed(match_id));
    }
    let (lone, empty_is_a) = match (&m.slot_a, &m.slot_b) {
        (Some(team), None) => (team.id, false),
        (None, Some(team)) => (team.id, true),
        _ => return Err(TournamentError::NotABye(match_id)),
    };
    let awaiting_feeder = bracket.matches.iter().any(|f| {
        f.next_match_id == Some(match_id)
            && feeds_slot_a(f.position) == empty_is_a
            && !f.status.is_terminal()
    });
    if awaiting_feeder {
        return Err(TournamentError::NotABye(match_id));
    }
    let plan = plan_result(bracket, match_id, Some(lone), Some(MatchStatus::Completed), false)?;
    log::info!("Bye in match {} resolved by administrator", match_id);
    Ok(apply_result(bracket, plan))
}
