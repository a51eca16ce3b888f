//! Per-player running record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PlayerId;
use crate::calculate;

/// A registered participant and their running record.
///
/// Records are never removed from the roster; dropping a player only marks
/// the record inactive so historical matches stay resolvable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Unique identifier
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Opaque deck reference supplied by the caller
    pub deck: Option<String>,

    pub wins: u32,
    pub losses: u32,
    pub draws: u32,

    /// Byes received (already counted in `wins`)
    pub byes: u32,

    pub games_won: u32,
    pub games_lost: u32,

    /// False once the player has dropped
    pub is_active: bool,

    /// Round in which the player dropped
    pub dropped_round: Option<u32>,

    /// Opponents' match-win percentage, written by finalize
    pub opponent_match_win_pct: f64,

    /// Game-win percentage, written by finalize
    pub game_win_pct: f64,

    /// When the player registered
    pub registered_at: DateTime<Utc>,
}

impl PlayerRecord {
    /// Create a fresh, active record.
    pub fn new(id: PlayerId, name: String, deck: Option<String>) -> Self {
        Self {
            id,
            name,
            deck,
            wins: 0,
            losses: 0,
            draws: 0,
            byes: 0,
            games_won: 0,
            games_lost: 0,
            is_active: true,
            dropped_round: None,
            opponent_match_win_pct: 0.0,
            game_win_pct: 0.0,
            registered_at: Utc::now(),
        }
    }

    /// Matches played, byes included.
    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// 3 per win, 1 per draw.
    pub fn match_points(&self) -> u32 {
        calculate::match_points(self.wins, self.draws)
    }

    pub fn match_win_pct(&self) -> f64 {
        calculate::match_win_pct(self.wins, self.draws, self.matches_played())
    }

    pub(crate) fn record_win(&mut self, games_won: u32, games_lost: u32) {
        self.wins += 1;
        self.add_games(games_won, games_lost);
    }

    pub(crate) fn record_loss(&mut self, games_won: u32, games_lost: u32) {
        self.losses += 1;
        self.add_games(games_won, games_lost);
    }

    pub(crate) fn record_draw(&mut self, games_won: u32, games_lost: u32) {
        self.draws += 1;
        self.add_games(games_won, games_lost);
    }

    /// A bye is a match win with no games recorded.
    pub(crate) fn record_bye(&mut self) {
        self.wins += 1;
        self.byes += 1;
    }

    pub(crate) fn mark_dropped(&mut self, round: u32) {
        self.is_active = false;
        self.dropped_round = Some(round);
    }

    pub(crate) fn set_tiebreakers(&mut self, opponent_match_win_pct: f64, game_win_pct: f64) {
        self.opponent_match_win_pct = opponent_match_win_pct;
        self.game_win_pct = game_win_pct;
    }

    fn add_games(&mut self, won: u32, lost: u32) {
        self.games_won += won;
        self.games_lost += lost;
    }
}
