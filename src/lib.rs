//! Dota 2 tournament backend: library with models and bracket logic.

pub mod config;
pub mod logic;
pub mod models;

pub use config::{Config, ConfigError};
pub use logic::{
    advance_bye, advance_tournament_bye, can_report, create_lobby, generate_bracket,
    generate_bracket_with_rng, generate_tournament_bracket, matches_in_round, next_match_position,
    record_game, record_result, record_tournament_game, record_tournament_result,
    regenerate_bracket, register_team, round_count, start_match, start_tournament_match,
};
pub use models::{
    Bracket, BracketTeam, Game, Lobby, Match, MatchId, MatchRules, MatchStatus, MemberRole,
    RegistrationStatus, RosterMember, SeedingStrategy, SeriesType, TeamId, TeamPlayer, TeamRoster, Tournament,
    TournamentError, TournamentId, TournamentSchedule, TournamentStatus, TournamentTeam,
};
