//! Match (a series between two team slots), Game (one map of a series),
//! and the status / series vocabulary they share.

use crate::models::team::{BracketTeam, TeamId};
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Lifecycle of a match or a single game.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

impl MatchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Cancelled)
    }

    /// Whether a match may move from `self` to `to`.
    ///
    /// Staying in the same non-cancelled state is allowed (re-applying a result).
    /// `ongoing -> scheduled` resets a series that never got played.
    pub fn can_transition_to(self, to: MatchStatus) -> bool {
        use MatchStatus::*;
        match (self, to) {
            (Scheduled, Scheduled | Ongoing | Completed | Cancelled) => true,
            (Ongoing, Scheduled | Ongoing | Completed | Cancelled) => true,
            (Completed, Completed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Ongoing => "ongoing",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Series format of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Bo1,
    Bo2,
    Bo3,
    Bo5,
}

impl SeriesType {
    /// Games a team must win to take the series.
    pub fn wins_required(self) -> usize {
        match self {
            SeriesType::Bo1 => 1,
            SeriesType::Bo2 => 2,
            SeriesType::Bo3 => 2,
            SeriesType::Bo5 => 3,
        }
    }

    /// Maximum number of games in the series.
    pub fn max_games(self) -> usize {
        match self {
            SeriesType::Bo1 => 1,
            SeriesType::Bo2 => 2,
            SeriesType::Bo3 => 3,
            SeriesType::Bo5 => 5,
        }
    }
}

impl fmt::Display for SeriesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SeriesType::Bo1 => "bo1",
            SeriesType::Bo2 => "bo2",
            SeriesType::Bo3 => "bo3",
            SeriesType::Bo5 => "bo5",
        };
        f.write_str(s)
    }
}

/// One game of a series.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// 1-based within the match.
    pub game_number: u32,
    pub winner_team_id: Option<TeamId>,
    pub status: MatchStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A bracket match: two optional team slots feeding the match at `next_match_id`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// 1-based, round 1 is the first round.
    pub round: u32,
    /// 1-based index within the round.
    pub position: u32,
    pub slot_a: Option<BracketTeam>,
    pub slot_b: Option<BracketTeam>,
    pub winner_team_id: Option<TeamId>,
    pub status: MatchStatus,
    pub series_type: SeriesType,
    /// None only for the final.
    pub next_match_id: Option<MatchId>,
    pub games: Vec<Game>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Match {
    /// An empty scheduled match.
    pub fn new(
        tournament_id: TournamentId,
        round: u32,
        position: u32,
        series_type: SeriesType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            position,
            slot_a: None,
            slot_b: None,
            winner_team_id: None,
            status: MatchStatus::Scheduled,
            series_type,
            next_match_id: None,
            games: Vec::new(),
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn is_seated(&self) -> bool {
        self.slot_a.is_some() && self.slot_b.is_some()
    }

    /// Exactly one slot occupied.
    pub fn is_bye(&self) -> bool {
        self.slot_a.is_some() != self.slot_b.is_some()
    }

    /// The seated team with this id, if any.
    pub fn team(&self, team_id: TeamId) -> Option<&BracketTeam> {
        self.slot_a
            .iter()
            .chain(self.slot_b.iter())
            .find(|t| t.id == team_id)
    }

    /// True if the Steam id is the captain of either seated team.
    pub fn is_captain(&self, steam_id: &str) -> bool {
        self.slot_a
            .iter()
            .chain(self.slot_b.iter())
            .any(|t| t.is_captain(steam_id))
    }

    /// Games won so far by the given team.
    pub fn games_won(&self, team_id: TeamId) -> usize {
        self.games
            .iter()
            .filter(|g| g.winner_team_id == Some(team_id))
            .count()
    }
}
