//! Tournament business logic: bracket generation, result advancement, registration, lobbies.

mod advancer;
mod generator;
mod lobby;
mod registration;
mod rounds;
mod seeding;

pub use advancer::{advance_bye, record_game, record_result, start_match};
pub use generator::{generate_bracket, generate_bracket_with_rng};
pub use lobby::{create_lobby, create_lobby_with_rng, generate_lobby_password};
pub use registration::{
    advance_tournament_bye, can_report, generate_tournament_bracket,
    generate_tournament_bracket_with_rng, record_tournament_game, record_tournament_result,
    regenerate_bracket, regenerate_bracket_with_rng, register_team, start_tournament_match,
    MIN_ROSTER_SIZE,
};
pub use rounds::{
    feeds_slot_a, matches_in_round, next_match_position, round_count, series_type_for_round,
};
pub use seeding::seed_teams;
