//! Bracket: the flat set of matches of a single-elimination tournament.

use crate::models::game::{Match, MatchId, MatchStatus};
use crate::models::team::BracketTeam;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a bracket.
pub type BracketId = Uuid;

/// All matches of a tournament. Rounds are derived by filtering on `Match::round`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub id: BracketId,
    pub tournament_id: TournamentId,
    /// `1..=R`.
    pub rounds: Vec<u32>,
    /// Ordered by round, then position.
    pub matches: Vec<Match>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bracket {
    pub fn round_count(&self) -> u32 {
        self.rounds.len() as u32
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Matches of one round, in position order.
    pub fn round_matches(&self, round: u32) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    pub fn match_at(&self, round: u32, position: u32) -> Option<&Match> {
        self.matches
            .iter()
            .find(|m| m.round == round && m.position == position)
    }

    /// The single match without a successor.
    pub fn final_match(&self) -> Option<&Match> {
        self.matches.iter().find(|m| m.next_match_id.is_none())
    }

    /// Winner of the completed final, if any.
    pub fn champion(&self) -> Option<&BracketTeam> {
        let last = self.final_match()?;
        if last.status != MatchStatus::Completed {
            return None;
        }
        last.team(last.winner_team_id?)
    }

    /// True once any match has started or finished; regeneration is refused after that.
    pub fn has_progress(&self) -> bool {
        self.matches
            .iter()
            .any(|m| matches!(m.status, MatchStatus::Ongoing | MatchStatus::Completed))
    }
}
