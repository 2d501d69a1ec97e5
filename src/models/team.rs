//! Teams: the roster handed over by the team service, the registered
//! tournament team, and the bracket-scoped snapshot placed into match slots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team registered in a tournament.
pub type TeamId = Uuid;

/// A player entry inside a bracket team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamPlayer {
    pub steam_id: String,
    pub username: String,
    pub is_captain: bool,
}

/// Team as it sits in a match slot. Immutable once seated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketTeam {
    pub id: TeamId,
    pub name: String,
    pub tag: String,
    pub players: Vec<TeamPlayer>,
    /// Used by ranked seeding only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u32>,
}

impl BracketTeam {
    pub fn new(name: impl Into<String>, tag: impl Into<String>, players: Vec<TeamPlayer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tag: tag.into(),
            players,
            rating: None,
        }
    }

    pub fn with_rating(self, rating: u32) -> Self {
        Self {
            rating: Some(rating),
            ..self
        }
    }

    /// True if the given Steam id belongs to this team's captain.
    pub fn is_captain(&self, steam_id: &str) -> bool {
        self.players
            .iter()
            .any(|p| p.is_captain && p.steam_id == steam_id)
    }
}

/// Registration status of a team inside a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    Registered,
    /// Kept on record but left out of the bracket.
    Disqualified,
}

/// A team registered for one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentTeam {
    pub id: TeamId,
    /// Id of the persistent team this registration was made from.
    pub source_team_id: Uuid,
    pub name: String,
    pub tag: String,
    /// Steam id of the captain.
    pub captain_id: String,
    pub players: Vec<TeamPlayer>,
    pub rating: Option<u32>,
    pub joined_at: DateTime<Utc>,
    pub status: RegistrationStatus,
}

impl TournamentTeam {
    /// Snapshot for seating into a bracket.
    pub fn to_bracket_team(&self) -> BracketTeam {
        BracketTeam {
            id: self.id,
            name: self.name.clone(),
            tag: self.tag.clone(),
            players: self.players.clone(),
            rating: self.rating,
        }
    }
}

/// Role of a member within a persistent team.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Captain,
    Player,
    Substitute,
    Coach,
}

/// One member of a persistent team, as reported by the team service.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RosterMember {
    pub user_id: Uuid,
    pub username: String,
    /// None when the member has not linked a Steam account.
    pub steam_id: Option<String>,
    pub role: MemberRole,
}

/// A persistent team's roster, the input for tournament registration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub id: Uuid,
    pub name: String,
    pub tag: String,
    pub members: Vec<RosterMember>,
    #[serde(default)]
    pub rating: Option<u32>,
}

impl TeamRoster {
    pub fn captain(&self) -> Option<&RosterMember> {
        self.members.iter().find(|m| m.role == MemberRole::Captain)
    }
}
