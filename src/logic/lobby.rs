//! Lobby instructions: the captains create the Dota 2 lobby by hand, we hand out
//! a name, a password and the steps.

use crate::logic::advancer;
use crate::models::{
    Lobby, LobbySettings, MatchId, MatchStatus, Tournament, TournamentError, TournamentStatus,
};
use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

/// Excludes 0, 1, I and O.
const PASSWORD_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const PASSWORD_LEN: usize = 6;
/// Launches Dota 2 through the Steam client.
const DOTA_CONNECT_URL: &str = "steam://run/570";
const GAME_MODE: &str = "Captains Mode";
const SERVER_REGION: &str = "Europe";

pub fn generate_lobby_password<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..PASSWORD_LEN)
        .map(|_| PASSWORD_CHARSET[rng.gen_range(0..PASSWORD_CHARSET.len())] as char)
        .collect()
}

fn lobby_instructions(lobby_name: &str, password: &str) -> Vec<String> {
    vec![
        "Step 1: Press \"Open Dota 2\" below".to_string(),
        "Step 2: In the main menu choose Play Dota -> Lobby -> Create Lobby".to_string(),
        format!("Step 3: Lobby name: \"{}\"", lobby_name),
        format!("Step 4: Lobby password: \"{}\"", password),
        "Step 5: Lobby settings:".to_string(),
        format!("   - Game mode: {}", GAME_MODE),
        format!("   - Server region: {}", SERVER_REGION),
        "   - Spectators: allowed".to_string(),
        "   - Pauses: unlimited".to_string(),
        "Step 6: Invite the opposing team's captain".to_string(),
        "Step 7: Invite your own players".to_string(),
        "Step 8: Start the match when everyone is ready".to_string(),
    ]
}

/// Create lobby instructions for a seated match on behalf of one of its captains.
/// Replaces any earlier lobby for the match and moves the match to `ongoing`.
pub fn create_lobby(
    tournament: &mut Tournament,
    match_id: MatchId,
    requester_steam_id: &str,
) -> Result<Lobby, TournamentError> {
    create_lobby_with_rng(tournament, match_id, requester_steam_id, &mut rand::thread_rng())
}

pub fn create_lobby_with_rng<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    match_id: MatchId,
    requester_steam_id: &str,
    rng: &mut R,
) -> Result<Lobby, TournamentError> {
    if tournament.status != TournamentStatus::Ongoing {
        return Err(TournamentError::InvalidState);
    }
    let m = tournament
        .bracket()?
        .get_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let (team_a, team_b) = match (&m.slot_a, &m.slot_b) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(TournamentError::TeamsNotSeated(match_id)),
    };
    if !m.is_captain(requester_steam_id) {
        return Err(TournamentError::NotCaptain);
    }
    if m.status.is_terminal() {
        return Err(TournamentError::MatchClosed(match_id));
    }

    let password = generate_lobby_password(rng);
    let name = format!("{} vs {} - {}", team_a.tag, team_b.tag, tournament.name);
    let lobby = Lobby {
        id: Uuid::new_v4(),
        match_id,
        tournament_id: tournament.id,
        instructions: lobby_instructions(&name, &password),
        password,
        connect_url: DOTA_CONNECT_URL.to_string(),
        created_by: requester_steam_id.to_string(),
        created_at: Utc::now(),
        settings: LobbySettings {
            name,
            game_mode: GAME_MODE.to_string(),
            server_region: SERVER_REGION.to_string(),
            series_type: m.series_type,
        },
    };

    if m.status == MatchStatus::Scheduled {
        advancer::start_match(tournament.bracket_mut()?, match_id)?;
    }
    tournament.lobbies.retain(|l| l.match_id != match_id);
    tournament.lobbies.push(lobby.clone());
    log::info!("Lobby instructions generated for match {}", match_id);
    Ok(lobby)
}
