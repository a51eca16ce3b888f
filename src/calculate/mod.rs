//! Standings calculation.
//!
//! Derives ranking inputs from the raw match log:
//! - Match points (3 per win, 1 per draw, byes count as wins)
//! - Match-win percentage
//! - Opponents' match-win percentage (OMW%)
//! - Game-win percentage (GW%)
//!
//! Everything is recomputed from scratch on each call, never maintained
//! incrementally.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::{Bye, Match, PlayerId, PlayerRecord};

pub const POINTS_PER_WIN: u32 = 3;
pub const POINTS_PER_DRAW: u32 = 1;

/// Weight of a draw in the match-win percentage.
pub const DRAW_WEIGHT: f64 = 0.333;

/// Calculate match points from wins and draws.
pub fn match_points(wins: u32, draws: u32) -> u32 {
    POINTS_PER_WIN * wins + POINTS_PER_DRAW * draws
}

/// Calculate match-win percentage; 0 when nothing has been played.
pub fn match_win_pct(wins: u32, draws: u32, matches_played: u32) -> f64 {
    if matches_played == 0 {
        0.0
    } else {
        (wins as f64 + DRAW_WEIGHT * draws as f64) / matches_played as f64
    }
}

/// Calculate game-win percentage; 0 when no games were recorded.
pub fn game_win_pct(games_won: u32, games_lost: u32) -> f64 {
    let total = games_won + games_lost;
    if total == 0 {
        0.0
    } else {
        games_won as f64 / total as f64
    }
}

/// Standings order: match points, OMW%, GW% (all descending), then id.
pub fn compare_records(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    b.match_points()
        .cmp(&a.match_points())
        .then_with(|| b.opponent_match_win_pct.total_cmp(&a.opponent_match_win_pct))
        .then_with(|| b.game_win_pct.total_cmp(&a.game_win_pct))
        .then_with(|| a.id.cmp(&b.id))
}

/// Results of one player, tallied from the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_won: u32,
    pub games_lost: u32,
}

impl Tally {
    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    pub fn match_points(&self) -> u32 {
        match_points(self.wins, self.draws)
    }

    pub fn match_win_pct(&self) -> f64 {
        match_win_pct(self.wins, self.draws, self.matches_played())
    }

    pub fn game_win_pct(&self) -> f64 {
        game_win_pct(self.games_won, self.games_lost)
    }
}

/// Derived ranking values for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tiebreakers {
    pub match_points: u32,
    pub match_win_pct: f64,
    pub opponent_match_win_pct: f64,
    pub game_win_pct: f64,
}

/// Computes standings values from a match log and bye log.
#[derive(Debug, Clone, Default)]
pub struct StandingsCalculator {
    tallies: BTreeMap<PlayerId, Tally>,
    opponents: BTreeMap<PlayerId, BTreeSet<PlayerId>>,
}

impl StandingsCalculator {
    /// Scan the log. Unreported matches are ignored.
    pub fn new(matches: &[Match], byes: &[Bye]) -> Self {
        let mut calculator = Self::default();

        for m in matches.iter().filter(|m| m.is_reported()) {
            for (player, opponent) in [(m.player1_id, m.player2_id), (m.player2_id, m.player1_id)] {
                let (won, lost) = m.games_for(player);
                let tally = calculator.tallies.entry(player).or_default();
                if m.is_draw {
                    tally.draws += 1;
                } else if m.winner_id == Some(player) {
                    tally.wins += 1;
                } else {
                    tally.losses += 1;
                }
                tally.games_won += won;
                tally.games_lost += lost;

                calculator
                    .opponents
                    .entry(player)
                    .or_default()
                    .insert(opponent);
            }
        }

        for bye in byes {
            calculator.tallies.entry(bye.player_id).or_default().wins += 1;
        }

        calculator
    }

    /// The player's tally; empty if they never played.
    pub fn tally(&self, player: PlayerId) -> Tally {
        self.tallies.get(&player).copied().unwrap_or_default()
    }

    /// Distinct opponents faced in reported matches.
    pub fn opponents(&self, player: PlayerId) -> Vec<PlayerId> {
        self.opponents
            .get(&player)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn match_points(&self, player: PlayerId) -> u32 {
        self.tally(player).match_points()
    }

    pub fn match_win_pct(&self, player: PlayerId) -> f64 {
        self.tally(player).match_win_pct()
    }

    /// Mean match-win percentage over distinct opponents; 0 with none.
    pub fn opponent_match_win_pct(&self, player: PlayerId) -> f64 {
        let opponents = self.opponents(player);
        if opponents.is_empty() {
            return 0.0;
        }
        let sum: f64 = opponents.iter().map(|&o| self.match_win_pct(o)).sum();
        sum / opponents.len() as f64
    }

    pub fn game_win_pct(&self, player: PlayerId) -> f64 {
        self.tally(player).game_win_pct()
    }

    pub fn tiebreakers(&self, player: PlayerId) -> Tiebreakers {
        Tiebreakers {
            match_points: self.match_points(player),
            match_win_pct: self.match_win_pct(player),
            opponent_match_win_pct: self.opponent_match_win_pct(player),
            game_win_pct: self.game_win_pct(player),
        }
    }
}
