//! Data structures for the tournament platform: teams, matches, brackets, tournaments.

mod bracket;
mod game;
mod lobby;
mod team;
mod tournament;

pub use bracket::{Bracket, BracketId};
pub use game::{Game, Match, MatchId, MatchStatus, SeriesType};
pub use lobby::{Lobby, LobbyId, LobbySettings};
pub use team::{
    BracketTeam, MemberRole, RegistrationStatus, RosterMember, TeamId, TeamPlayer, TeamRoster,
    TournamentTeam,
};
pub use tournament::{
    MatchRules, SeedingStrategy, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentRules, TournamentSchedule, TournamentStatus,
};
