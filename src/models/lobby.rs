//! Lobby instructions handed to a captain before a match.

use crate::models::game::{MatchId, SeriesType};
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a lobby record.
pub type LobbyId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LobbySettings {
    pub name: String,
    pub game_mode: String,
    pub server_region: String,
    pub series_type: SeriesType,
}

/// A lobby the captain creates by hand in the Dota 2 client.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Lobby {
    pub id: LobbyId,
    pub match_id: MatchId,
    pub tournament_id: TournamentId,
    pub password: String,
    pub connect_url: String,
    /// Steam id of the captain who requested it.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub settings: LobbySettings,
    pub instructions: Vec<String>,
}
