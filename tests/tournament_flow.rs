//! Integration tests for the tournament lifecycle: registration, bracket generation,
//! reporting permissions, lobbies and completion.

use chrono::{Duration, Utc};
use dota_tournament_web::logic::{
    can_report, create_lobby_with_rng, generate_tournament_bracket, record_tournament_result,
    regenerate_bracket, register_team, start_tournament_match,
};
use dota_tournament_web::{
    MatchRules, MatchStatus, MemberRole, RegistrationStatus, RosterMember, SeriesType, TeamRoster,
    Tournament, TournamentError, TournamentSchedule, TournamentStatus,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn tournament(max_teams: usize) -> Tournament {
    let schedule = TournamentSchedule::new(Utc::now(), Utc::now());
    let mut t = Tournament::new("Spring Cup", "Amateur cup", "organizer", max_teams, schedule);
    t.open_registration().unwrap();
    t
}

fn member(name: &str, role: MemberRole) -> RosterMember {
    RosterMember {
        user_id: Uuid::new_v4(),
        username: name.to_string(),
        steam_id: Some(format!("steam-{name}")),
        role,
    }
}

/// Roster of a captain and four players; returns it with the captain's user id.
fn roster(name: &str) -> (TeamRoster, Uuid) {
    let mut members = vec![member(&format!("{name}-cap"), MemberRole::Captain)];
    members.extend((1..5).map(|i| member(&format!("{name}-p{i}"), MemberRole::Player)));
    let captain = members[0].user_id;
    let roster = TeamRoster {
        id: Uuid::new_v4(),
        name: name.to_string(),
        tag: name.to_uppercase(),
        members,
        rating: None,
    };
    (roster, captain)
}

fn with_teams(names: &[&str]) -> Tournament {
    let mut t = tournament(16);
    for name in names {
        let (r, captain) = roster(name);
        register_team(&mut t, &r, captain).unwrap();
    }
    t
}

#[test]
fn draft_opens_registration_once() {
    let schedule = TournamentSchedule::new(Utc::now(), Utc::now());
    let mut t = Tournament::new("Spring Cup", "", "organizer", 8, schedule);
    assert_eq!(t.status, TournamentStatus::Draft);
    assert!(!t.can_register());
    let (r, captain) = roster("alpha");
    assert_eq!(register_team(&mut t, &r, captain), Err(TournamentError::InvalidState));

    t.open_registration().unwrap();
    assert!(t.can_register());
    register_team(&mut t, &r, captain).unwrap();
    assert_eq!(t.open_registration(), Err(TournamentError::InvalidState));
}

#[test]
fn registration_records_captain_and_players() {
    let mut t = tournament(16);
    let (r, captain) = roster("alpha");
    let id = register_team(&mut t, &r, captain).unwrap();

    let team = t.get_team(id).unwrap();
    assert_eq!(team.name, "alpha");
    assert_eq!(team.source_team_id, r.id);
    assert_eq!(team.captain_id, "steam-alpha-cap");
    assert_eq!(team.players.len(), 5);
    assert_eq!(team.players.iter().filter(|p| p.is_captain).count(), 1);
}

#[test]
fn only_the_captain_can_register() {
    let mut t = tournament(16);
    let (r, _) = roster("alpha");
    let player = r.members[1].user_id;
    assert_eq!(register_team(&mut t, &r, player), Err(TournamentError::NotCaptain));
    assert!(t.teams.is_empty());
}

#[test]
fn registration_checks_roster() {
    let mut t = tournament(16);

    let (mut small, captain) = roster("small");
    small.members.truncate(1);
    assert_eq!(
        register_team(&mut t, &small, captain),
        Err(TournamentError::RosterTooSmall { min: 2, found: 1 })
    );

    let (mut unlinked, captain) = roster("unlinked");
    unlinked.members[2].steam_id = None;
    assert_eq!(register_team(&mut t, &unlinked, captain), Err(TournamentError::SteamNotLinked));

    let (r, captain) = roster("alpha");
    register_team(&mut t, &r, captain).unwrap();
    assert_eq!(register_team(&mut t, &r, captain), Err(TournamentError::TeamAlreadyRegistered));
    assert_eq!(t.teams.len(), 1);
}

#[test]
fn registration_respects_capacity_and_status() {
    let mut t = tournament(2);
    for name in ["a", "b"] {
        let (r, captain) = roster(name);
        register_team(&mut t, &r, captain).unwrap();
    }
    assert!(!t.can_register());
    let (r, captain) = roster("c");
    assert_eq!(register_team(&mut t, &r, captain), Err(TournamentError::TournamentFull));

    let mut t = with_teams(&["a", "b"]);
    generate_tournament_bracket(&mut t).unwrap();
    let (r, captain) = roster("late");
    assert_eq!(register_team(&mut t, &r, captain), Err(TournamentError::InvalidState));
}

#[test]
fn disqualified_team_is_kept_but_not_bracketed() {
    let mut t = tournament(3);
    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        let (r, captain) = roster(name);
        ids.push(register_team(&mut t, &r, captain).unwrap());
    }
    assert!(!t.can_register());

    t.disqualify_team(ids[1]).unwrap();
    assert_eq!(t.teams.len(), 3);
    assert_eq!(t.get_team(ids[1]).unwrap().status, RegistrationStatus::Disqualified);
    assert!(t.can_register());
    let missing = Uuid::new_v4();
    assert_eq!(t.disqualify_team(missing), Err(TournamentError::TeamNotFound(missing)));

    generate_tournament_bracket(&mut t).unwrap();
    let bracket = t.bracket.as_ref().unwrap();
    assert_eq!(bracket.matches.len(), 1);
    let only = &bracket.matches[0];
    let seated = [only.slot_a.as_ref().unwrap().id, only.slot_b.as_ref().unwrap().id];
    assert!(!seated.contains(&ids[1]));
    assert_eq!(t.disqualify_team(ids[0]), Err(TournamentError::InvalidState));
}

#[test]
fn only_finished_tournaments_expire() {
    let retention = std::time::Duration::from_secs(3600);
    let later = Utc::now() + Duration::hours(2);

    let mut t = with_teams(&["a", "b"]);
    assert!(!t.is_expired(later, retention));
    generate_tournament_bracket(&mut t).unwrap();
    assert!(!t.is_expired(later, retention));

    t.cancel().unwrap();
    assert!(!t.is_expired(Utc::now(), retention));
    assert!(t.is_expired(later, retention));
}

#[test]
fn generation_needs_two_teams_and_leaves_state_alone() {
    let mut t = with_teams(&["solo"]);
    assert_eq!(
        generate_tournament_bracket(&mut t),
        Err(TournamentError::InsufficientTeams { found: 1 })
    );
    assert_eq!(t.status, TournamentStatus::Registration);
    assert!(t.bracket.is_none());
}

#[test]
fn generation_starts_the_tournament_once() {
    let mut t = with_teams(&["a", "b", "c", "d", "e"]);
    generate_tournament_bracket(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::Ongoing);
    let bracket = t.bracket.clone().unwrap();
    assert_eq!(bracket.tournament_id, t.id);
    assert_eq!(bracket.round_count(), 3);

    assert_eq!(generate_tournament_bracket(&mut t), Err(TournamentError::InvalidState));
    assert_eq!(t.bracket.as_ref(), Some(&bracket));
}

#[test]
fn rules_are_frozen_once_the_bracket_exists() {
    let mut t = with_teams(&["a", "b"]);
    generate_tournament_bracket(&mut t).unwrap();
    assert_eq!(
        t.set_match_rules(MatchRules {
            series_type: SeriesType::Bo3,
            final_series_type: SeriesType::Bo5,
        }),
        Err(TournamentError::BracketLocked)
    );
}

#[test]
fn regeneration_replaces_an_untouched_bracket() {
    let mut t = with_teams(&["a", "b", "c", "d"]);
    generate_tournament_bracket(&mut t).unwrap();
    let first = t.bracket.as_ref().unwrap().id;

    regenerate_bracket(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::Ongoing);
    let second = t.bracket.as_ref().unwrap();
    assert_ne!(second.id, first);
    assert_eq!(second.matches.len(), 3);
}

#[test]
fn regeneration_is_refused_after_a_result() {
    let mut t = with_teams(&["a", "b", "c", "d"]);
    generate_tournament_bracket(&mut t).unwrap();
    let m = t.bracket.as_ref().unwrap().match_at(1, 1).unwrap().clone();
    let winner = m.slot_a.as_ref().unwrap().id;
    record_tournament_result(&mut t, m.id, Some(winner), None).unwrap();
    let decided = t.bracket.clone();

    assert_eq!(regenerate_bracket(&mut t), Err(TournamentError::BracketLocked));
    assert_eq!(t.bracket, decided);
}

#[test]
fn final_result_completes_the_tournament() {
    let mut t = with_teams(&["a", "b"]);
    generate_tournament_bracket(&mut t).unwrap();
    let m = t.bracket.as_ref().unwrap().matches[0].clone();
    let winner = m.slot_b.as_ref().unwrap().clone();

    let updated = record_tournament_result(&mut t, m.id, Some(winner.id), None).unwrap();
    assert_eq!(updated.status, MatchStatus::Completed);
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.bracket.as_ref().unwrap().champion(), Some(&winner));

    assert_eq!(
        record_tournament_result(&mut t, m.id, Some(winner.id), None),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn reporting_is_limited_to_captains_and_organizer() {
    let mut t = with_teams(&["a", "b", "c", "d"]);
    generate_tournament_bracket(&mut t).unwrap();
    let bracket = t.bracket.as_ref().unwrap();
    let first = bracket.match_at(1, 1).unwrap();
    let captain = first
        .slot_a
        .as_ref()
        .unwrap()
        .players
        .iter()
        .find(|p| p.is_captain)
        .unwrap()
        .steam_id
        .clone();
    let other = bracket.match_at(1, 2).unwrap();

    assert!(can_report(&t, first.id, "organizer"));
    assert!(can_report(&t, first.id, &captain));
    assert!(!can_report(&t, other.id, &captain));
    assert!(!can_report(&t, first.id, "stranger"));
}

#[test]
fn captain_gets_lobby_instructions() {
    let mut t = with_teams(&["a", "b", "c", "d"]);
    generate_tournament_bracket(&mut t).unwrap();
    let m = t.bracket.as_ref().unwrap().match_at(1, 1).unwrap().clone();
    let (team_a, team_b) = (m.slot_a.clone().unwrap(), m.slot_b.clone().unwrap());
    let captain = team_b.players.iter().find(|p| p.is_captain).unwrap().steam_id.clone();
    let mut rng = StdRng::seed_from_u64(42);

    assert_eq!(
        create_lobby_with_rng(&mut t, m.id, "stranger", &mut rng),
        Err(TournamentError::NotCaptain)
    );

    let lobby = create_lobby_with_rng(&mut t, m.id, &captain, &mut rng).unwrap();
    assert_eq!(lobby.password.len(), 6);
    assert!(lobby
        .password
        .chars()
        .all(|c| "ABCDEFGHJKLMNPQRSTUVWXYZ23456789".contains(c)));
    assert_eq!(
        lobby.settings.name,
        format!("{} vs {} - Spring Cup", team_a.tag, team_b.tag)
    );
    assert_eq!(lobby.settings.series_type, SeriesType::Bo1);
    assert_eq!(lobby.connect_url, "steam://run/570");
    assert!(lobby.instructions.iter().any(|line| line.contains(&lobby.password)));

    let status = t.bracket.as_ref().unwrap().get_match(m.id).unwrap().status;
    assert_eq!(status, MatchStatus::Ongoing);

    create_lobby_with_rng(&mut t, m.id, &captain, &mut rng).unwrap();
    assert_eq!(t.lobbies.len(), 1);
}

#[test]
fn lobby_needs_both_teams() {
    let mut t = with_teams(&["a", "b", "c"]);
    generate_tournament_bracket(&mut t).unwrap();
    let bye = t.bracket.as_ref().unwrap().match_at(1, 2).unwrap().clone();
    let captain = bye.slot_a.as_ref().unwrap().players[0].steam_id.clone();
    assert_eq!(
        create_lobby_with_rng(&mut t, bye.id, &captain, &mut StdRng::seed_from_u64(1)),
        Err(TournamentError::TeamsNotSeated(bye.id))
    );
    assert_eq!(
        start_tournament_match(&mut t, bye.id),
        Err(TournamentError::TeamsNotSeated(bye.id))
    );
}

#[test]
fn cancelled_tournament_rejects_results() {
    let mut t = with_teams(&["a", "b"]);
    generate_tournament_bracket(&mut t).unwrap();
    t.cancel().unwrap();
    let m = t.bracket.as_ref().unwrap().matches[0].clone();
    let winner = m.slot_a.as_ref().unwrap().id;
    assert_eq!(
        record_tournament_result(&mut t, m.id, Some(winner), None),
        Err(TournamentError::InvalidState)
    );
    assert_eq!(t.cancel(), Err(TournamentError::InvalidState));
}
