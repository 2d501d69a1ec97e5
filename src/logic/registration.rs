//! Tournament lifecycle: team registration, bracket generation, and result reporting
//! at the tournament level.

use crate::logic::advancer;
use crate::logic::generator::generate_bracket_with_rng;
use crate::models::{
    BracketTeam, Match, MatchId, MatchStatus, MemberRole, RegistrationStatus, TeamId, TeamPlayer,
    TeamRoster, Tournament, TournamentError, TournamentStatus, TournamentTeam,
};
use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

/// Minimum roster size for registration.
pub const MIN_ROSTER_SIZE: usize = 2;

/// Register a team from its roster. `requester_id` is the platform user id making the request
/// and must be the roster's captain.
pub fn register_team(
    tournament: &mut Tournament,
    roster: &TeamRoster,
    requester_id: Uuid,
) -> Result<TeamId, TournamentError> {
    if tournament.status != TournamentStatus::Registration {
        return Err(TournamentError::InvalidState);
    }
    if tournament.active_team_count() >= tournament.max_teams {
        return Err(TournamentError::TournamentFull);
    }
    let captain = roster
        .captain()
        .filter(|c| c.user_id == requester_id)
        .ok_or(TournamentError::NotCaptain)?;
    if roster.members.len() < MIN_ROSTER_SIZE {
        return Err(TournamentError::RosterTooSmall {
            min: MIN_ROSTER_SIZE,
            found: roster.members.len(),
        });
    }
    if tournament
        .teams
        .iter()
        .any(|t| t.source_team_id == roster.id || t.name.eq_ignore_ascii_case(&roster.name))
    {
        return Err(TournamentError::TeamAlreadyRegistered);
    }
    let captain_steam_id = captain
        .steam_id
        .clone()
        .ok_or(TournamentError::SteamNotLinked)?;

    let players = roster
        .members
        .iter()
        .map(|m| {
            Ok(TeamPlayer {
                steam_id: m.steam_id.clone().ok_or(TournamentError::SteamNotLinked)?,
                username: m.username.clone(),
                is_captain: m.role == MemberRole::Captain,
            })
        })
        .collect::<Result<Vec<_>, TournamentError>>()?;

    let now = Utc::now();
    let team = TournamentTeam {
        id: Uuid::new_v4(),
        source_team_id: roster.id,
        name: roster.name.clone(),
        tag: roster.tag.clone(),
        captain_id: captain_steam_id,
        players,
        rating: roster.rating,
        joined_at: now,
        status: RegistrationStatus::Registered,
    };
    let id = team.id;
    log::info!("Team {} registered for tournament {}", team.name, tournament.name);
    tournament.teams.push(team);
    tournament.updated_at = now;
    Ok(id)
}

fn bracket_teams(tournament: &Tournament) -> Vec<BracketTeam> {
    tournament
        .teams
        .iter()
        .filter(|t| t.status != RegistrationStatus::Disqualified)
        .map(TournamentTeam::to_bracket_team)
        .collect()
}

/// Close registration and build the bracket. Only from `registration`.
pub fn generate_tournament_bracket(tournament: &mut Tournament) -> Result<(), TournamentError> {
    generate_tournament_bracket_with_rng(tournament, &mut rand::thread_rng())
}

pub fn generate_tournament_bracket_with_rng<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Registration {
        return Err(TournamentError::InvalidState);
    }
    let teams = bracket_teams(tournament);
    let bracket = generate_bracket_with_rng(tournament, &teams, rng)?;
    tournament.bracket = Some(bracket);
    tournament.status = TournamentStatus::Ongoing;
    tournament.updated_at = Utc::now();
    Ok(())
}

/// Replace the bracket of an ongoing tournament. Refused once any match has started.
pub fn regenerate_bracket(tournament: &mut Tournament) -> Result<(), TournamentError> {
    regenerate_bracket_with_rng(tournament, &mut rand::thread_rng())
}

pub fn regenerate_bracket_with_rng<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Ongoing {
        return Err(TournamentError::InvalidState);
    }
    if tournament.bracket()?.has_progress() {
        return Err(TournamentError::BracketLocked);
    }
    let teams = bracket_teams(tournament);
    let bracket = generate_bracket_with_rng(tournament, &teams, rng)?;
    log::info!("Bracket of tournament {} regenerated", tournament.name);
    tournament.bracket = Some(bracket);
    // Lobbies point at matches of the discarded bracket.
    tournament.lobbies.clear();
    tournament.updated_at = Utc::now();
    Ok(())
}

fn ensure_ongoing(tournament: &Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Ongoing {
        return Err(TournamentError::InvalidState);
    }
    Ok(())
}

/// Mark the tournament completed once its final is decided.
fn finish_if_decided(tournament: &mut Tournament) {
    let champion = tournament
        .bracket
        .as_ref()
        .and_then(|b| b.champion())
        .map(|t| t.name.clone());
    if let Some(name) = champion {
        if tournament.status == TournamentStatus::Ongoing {
            log::info!("Tournament {} completed, champion {}", tournament.name, name);
            tournament.status = TournamentStatus::Completed;
            tournament.updated_at = Utc::now();
        }
    }
}

/// Report a match result for an ongoing tournament. Returns the updated match.
pub fn record_tournament_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: Option<TeamId>,
    status: Option<MatchStatus>,
) -> Result<Match, TournamentError> {
    ensure_ongoing(tournament)?;
    let updated =
        advancer::record_result(tournament.bracket_mut()?, match_id, winner, status)?.clone();
    finish_if_decided(tournament);
    Ok(updated)
}

/// Report one game of a series for an ongoing tournament.
pub fn record_tournament_game(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: TeamId,
) -> Result<Match, TournamentError> {
    ensure_ongoing(tournament)?;
    let updated = advancer::record_game(tournament.bracket_mut()?, match_id, winner)?.clone();
    finish_if_decided(tournament);
    Ok(updated)
}

/// Administrative bye resolution for an ongoing tournament.
pub fn advance_tournament_bye(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<Match, TournamentError> {
    ensure_ongoing(tournament)?;
    let updated = advancer::advance_bye(tournament.bracket_mut()?, match_id)?.clone();
    finish_if_decided(tournament);
    Ok(updated)
}

/// Start a seated match of an ongoing tournament.
pub fn start_tournament_match(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<Match, TournamentError> {
    ensure_ongoing(tournament)?;
    Ok(advancer::start_match(tournament.bracket_mut()?, match_id)?.clone())
}

/// Organizer, or captain of a team seated in the match.
pub fn can_report(tournament: &Tournament, match_id: MatchId, steam_id: &str) -> bool {
    if tournament.is_organizer(steam_id) {
        return true;
    }
    tournament
        .bracket
        .as_ref()
        .and_then(|b| b.get_match(match_id))
        .is_some_and(|m| m.is_captain(steam_id))
}
