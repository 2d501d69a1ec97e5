//! Tournament, its rules and schedule, and the error type shared by all operations.

use crate::models::bracket::Bracket;
use crate::models::game::{MatchId, MatchStatus, SeriesType};
use crate::models::lobby::Lobby;
use crate::models::team::{RegistrationStatus, TeamId, TournamentTeam};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament and bracket operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Bracket generation needs at least 2 teams.
    InsufficientTeams { found: usize },
    /// No match with this id in the bracket.
    MatchNotFound(MatchId),
    /// Winner is not one of the two seated teams.
    InvalidWinner { match_id: MatchId, team_id: TeamId },
    /// A result needs both slots filled.
    TeamsNotSeated(MatchId),
    /// Match status change not allowed by the match state machine.
    InvalidTransition { from: MatchStatus, to: MatchStatus },
    /// Completed needs a winner; a winner is only accepted with `ongoing` or `completed`.
    WinnerStatusMismatch { status: MatchStatus },
    /// Match is completed or cancelled; its result can no longer change.
    MatchClosed(MatchId),
    /// The next-round match this result feeds has already started or closed.
    NextMatchStarted(MatchId),
    /// All games of the series are already played.
    SeriesFinished(MatchId),
    /// Advancing a bye needs exactly one seated team.
    NotABye(MatchId),
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Bracket has matches in progress or finished and cannot be regenerated or reconfigured.
    BracketLocked,
    /// No bracket has been generated yet.
    BracketNotGenerated,
    /// Manual seeding order is not a permutation of the registered teams.
    InvalidSeeding,
    /// Registration is at `max_teams`.
    TournamentFull,
    /// A team with this name is already registered.
    TeamAlreadyRegistered,
    /// Team not registered in this tournament.
    TeamNotFound(TeamId),
    /// Only a captain may perform this action.
    NotCaptain,
    /// Roster below the minimum size.
    RosterTooSmall { min: usize, found: usize },
    /// A member (or the captain) has no linked Steam account.
    SteamNotLinked,
}

impl TournamentError {
    /// Errors the HTTP layer renders as 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::MatchNotFound(_)
                | TournamentError::TeamNotFound(_)
                | TournamentError::BracketNotGenerated
        )
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InsufficientTeams { found } => {
                write!(f, "Need at least 2 teams to generate a bracket (found {})", found)
            }
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::InvalidWinner { .. } => {
                write!(f, "Winner must be one of the participating teams")
            }
            TournamentError::TeamsNotSeated(_) => write!(f, "Both teams must be set"),
            TournamentError::InvalidTransition { from, to } => {
                write!(f, "Match cannot go from {} to {}", from, to)
            }
            TournamentError::WinnerStatusMismatch { status } => {
                write!(f, "Winner does not fit match status {}", status)
            }
            TournamentError::MatchClosed(_) => write!(f, "Match result is already final"),
            TournamentError::NextMatchStarted(_) => {
                write!(f, "The next match has already started")
            }
            TournamentError::SeriesFinished(_) => write!(f, "All games of this series are played"),
            TournamentError::NotABye(_) => write!(f, "Match does not have exactly one team"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::BracketLocked => {
                write!(f, "Bracket already has results and cannot be changed")
            }
            TournamentError::BracketNotGenerated => write!(f, "Bracket not generated yet"),
            TournamentError::InvalidSeeding => {
                write!(f, "Seeding order must list every registered team exactly once")
            }
            TournamentError::TournamentFull => write!(f, "Tournament is full"),
            TournamentError::TeamAlreadyRegistered => {
                write!(f, "Team is already registered in this tournament")
            }
            TournamentError::TeamNotFound(_) => write!(f, "Team not found"),
            TournamentError::NotCaptain => write!(f, "Only the team captain can do this"),
            TournamentError::RosterTooSmall { min, found } => {
                write!(f, "Team must have at least {} players (has {})", min, found)
            }
            TournamentError::SteamNotLinked => {
                write!(f, "All team members must have a linked Steam account")
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Being set up by the organizer; not visible for registration yet.
    #[default]
    Draft,
    /// Teams may register; the bracket is generated from here.
    Registration,
    /// Bracket exists; results are being reported.
    Ongoing,
    Completed,
    Cancelled,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    #[default]
    SingleElimination,
}

/// Series policy: one format for the final, another for every other round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRules {
    pub series_type: SeriesType,
    pub final_series_type: SeriesType,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            series_type: SeriesType::Bo1,
            final_series_type: SeriesType::Bo3,
        }
    }
}

/// How round-1 slots are filled.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "order")]
pub enum SeedingStrategy {
    /// Uniform shuffle.
    #[default]
    Random,
    /// By team rating, strongest against weakest.
    Ranked,
    /// Explicit order of team ids.
    Manual(Vec<TeamId>),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentRules {
    pub max_mmr: u32,
    pub min_matches: u32,
    pub format: TournamentFormat,
    pub match_rules: MatchRules,
    #[serde(default)]
    pub seeding: SeedingStrategy,
}

impl Default for TournamentRules {
    fn default() -> Self {
        Self {
            max_mmr: 4000,
            min_matches: 100,
            format: TournamentFormat::SingleElimination,
            match_rules: MatchRules::default(),
            seeding: SeedingStrategy::Random,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSchedule {
    pub registration_start: DateTime<Utc>,
    pub registration_end: DateTime<Utc>,
    pub tournament_start: DateTime<Utc>,
    pub checkin_time: DateTime<Utc>,
}

impl TournamentSchedule {
    /// Registration opens now; check-in is 30 minutes before the start.
    pub fn new(registration_end: DateTime<Utc>, tournament_start: DateTime<Utc>) -> Self {
        Self {
            registration_start: Utc::now(),
            registration_end,
            tournament_start,
            checkin_time: tournament_start - Duration::minutes(30),
        }
    }
}

/// A tournament with its registered teams, bracket and lobbies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: String,
    /// Steam id of the organizer.
    pub organizer_id: String,
    pub max_teams: usize,
    pub status: TournamentStatus,
    pub rules: TournamentRules,
    pub schedule: TournamentSchedule,
    pub teams: Vec<TournamentTeam>,
    pub bracket: Option<Bracket>,
    pub lobbies: Vec<Lobby>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a draft tournament with default rules. Teams can register after
    /// [`Tournament::open_registration`].
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        organizer_id: impl Into<String>,
        max_teams: usize,
        schedule: TournamentSchedule,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            organizer_id: organizer_id.into(),
            max_teams,
            status: TournamentStatus::Draft,
            rules: TournamentRules::default(),
            schedule,
            teams: Vec::new(),
            bracket: None,
            lobbies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_organizer(&self, steam_id: &str) -> bool {
        self.organizer_id == steam_id
    }

    pub fn can_register(&self) -> bool {
        self.status == TournamentStatus::Registration && self.active_team_count() < self.max_teams
    }

    /// Registered teams that have not been disqualified.
    pub fn active_team_count(&self) -> usize {
        self.teams
            .iter()
            .filter(|t| t.status != RegistrationStatus::Disqualified)
            .count()
    }

    /// Completed or cancelled, and unchanged for at least `retention`.
    pub fn is_expired(&self, now: DateTime<Utc>, retention: std::time::Duration) -> bool {
        let finished = matches!(
            self.status,
            TournamentStatus::Completed | TournamentStatus::Cancelled
        );
        finished
            && (now - self.updated_at)
                .to_std()
                .is_ok_and(|age| age >= retention)
    }

    pub fn get_team(&self, id: TeamId) -> Option<&TournamentTeam> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn bracket(&self) -> Result<&Bracket, TournamentError> {
        self.bracket.as_ref().ok_or(TournamentError::BracketNotGenerated)
    }

    pub fn bracket_mut(&mut self) -> Result<&mut Bracket, TournamentError> {
        self.bracket.as_mut().ok_or(TournamentError::BracketNotGenerated)
    }

    /// Replace the series policy (only before a bracket exists).
    pub fn set_match_rules(&mut self, rules: MatchRules) -> Result<(), TournamentError> {
        self.ensure_configurable()?;
        self.rules.match_rules = rules;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replace the seeding strategy (only before a bracket exists).
    pub fn set_seeding(&mut self, seeding: SeedingStrategy) -> Result<(), TournamentError> {
        self.ensure_configurable()?;
        self.rules.seeding = seeding;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove a registered team (only during registration).
    pub fn withdraw_team(&mut self, team_id: TeamId) -> Result<TournamentTeam, TournamentError> {
        if self.status != TournamentStatus::Registration {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        self.updated_at = Utc::now();
        Ok(self.teams.remove(idx))
    }

    /// Exclude a team from the bracket while keeping its registration on record
    /// (only during registration). Frees its place.
    pub fn disqualify_team(&mut self, team_id: TeamId) -> Result<&TournamentTeam, TournamentError> {
        if self.status != TournamentStatus::Registration {
            return Err(TournamentError::InvalidState);
        }
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        team.status = RegistrationStatus::Disqualified;
        self.updated_at = Utc::now();
        Ok(team)
    }

    /// Move `draft -> registration`.
    pub fn open_registration(&mut self) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Draft {
            return Err(TournamentError::InvalidState);
        }
        self.status = TournamentStatus::Registration;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Cancel a tournament that has not finished. The bracket is kept for display.
    pub fn cancel(&mut self) -> Result<(), TournamentError> {
        if matches!(
            self.status,
            TournamentStatus::Completed | TournamentStatus::Cancelled
        ) {
            return Err(TournamentError::InvalidState);
        }
        self.status = TournamentStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn ensure_configurable(&self) -> Result<(), TournamentError> {
        match self.status {
            TournamentStatus::Draft | TournamentStatus::Registration => Ok(()),
            _ => Err(TournamentError::BracketLocked),
        }
    }
}
