//! Ranked standings and the serializable tournament summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Bye, Format, Match, PlayerId, PlayerRecord, TournamentStatus};

/// One row of the ranked standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based rank
    pub rank: u32,
    pub player_id: PlayerId,
    pub name: String,
    pub match_points: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub opponent_match_win_pct: f64,
    pub game_win_pct: f64,
    pub is_active: bool,
}

impl Standing {
    pub fn from_record(rank: u32, record: &PlayerRecord) -> Self {
        Self {
            rank,
            player_id: record.id,
            name: record.name.clone(),
            match_points: record.match_points(),
            wins: record.wins,
            losses: record.losses,
            draws: record.draws,
            opponent_match_win_pct: record.opponent_match_win_pct,
            game_win_pct: record.game_win_pct,
            is_active: record.is_active,
        }
    }
}

/// Roster entry in the exported summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub deck: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub byes: u32,
    pub match_points: u32,
    pub match_win_pct: f64,
    pub opponent_match_win_pct: f64,
    pub game_win_pct: f64,
    pub is_active: bool,
    pub dropped_round: Option<u32>,
}

impl From<&PlayerRecord> for PlayerSummary {
    fn from(record: &PlayerRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            deck: record.deck.clone(),
            wins: record.wins,
            losses: record.losses,
            draws: record.draws,
            byes: record.byes,
            match_points: record.match_points(),
            match_win_pct: record.match_win_pct(),
            opponent_match_win_pct: record.opponent_match_win_pct,
            game_win_pct: record.game_win_pct,
            is_active: record.is_active,
            dropped_round: record.dropped_round,
        }
    }
}

/// Everything an export or display collaborator needs about a tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub name: String,
    pub format: Format,
    pub status: TournamentStatus,

    /// Configured number of rounds (resolved at start when not configured)
    pub rounds_configured: Option<u32>,

    /// Rounds paired so far
    pub rounds_played: u32,

    pub best_of: u32,
    pub players: Vec<PlayerSummary>,
    pub matches: Vec<Match>,
    pub byes: Vec<Bye>,
    pub standings: Vec<Standing>,

    /// When this summary was produced
    pub generated_at: DateTime<Utc>,
}

impl TournamentSummary {
    /// Leader of the standings, if any players are registered.
    pub fn leader(&self) -> Option<&Standing> {
        self.standings.first()
    }
}
