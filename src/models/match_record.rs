//! A single scheduled contest between two players.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MatchId, PlayerId};

/// A single contest between two players in one round.
///
/// Player names are copied in at creation so the log survives a later rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Unique identifier (`R<round>M<sequence>`)
    pub id: MatchId,

    /// Round number
    pub round: u32,

    pub player1_id: PlayerId,
    pub player1_name: String,
    pub player2_id: PlayerId,
    pub player2_name: String,

    /// Winner, absent while unreported or when drawn
    pub winner_id: Option<PlayerId>,

    pub is_draw: bool,

    /// Games won by player 1 in a best-of-N match
    pub player1_games: u32,

    /// Games won by player 2 in a best-of-N match
    pub player2_games: u32,

    /// When the pairing was created
    pub started_at: DateTime<Utc>,

    /// When the result was reported
    pub ended_at: Option<DateTime<Utc>>,

    /// Wall-clock time between pairing and report
    pub duration_ms: Option<i64>,
}

impl Match {
    /// Create an unreported match.
    pub fn new(
        round: u32,
        sequence: u32,
        player1: (PlayerId, String),
        player2: (PlayerId, String),
    ) -> Self {
        Self {
            id: MatchId::generate(round, sequence),
            round,
            player1_id: player1.0,
            player1_name: player1.1,
            player2_id: player2.0,
            player2_name: player2.1,
            winner_id: None,
            is_draw: false,
            player1_games: 0,
            player2_games: 0,
            started_at: Utc::now(),
            ended_at: None,
            duration_ms: None,
        }
    }

    /// Whether a winner or a draw has been recorded.
    pub fn is_reported(&self) -> bool {
        self.winner_id.is_some() || self.is_draw
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.player1_id == player || self.player2_id == player
    }

    /// The other player in this match, if `player` took part.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if self.player1_id == player {
            Some(self.player2_id)
        } else if self.player2_id == player {
            Some(self.player1_id)
        } else {
            None
        }
    }

    pub fn loser_id(&self) -> Option<PlayerId> {
        self.winner_id.and_then(|winner| self.opponent_of(winner))
    }

    /// Games (won, lost) from `player`'s side.
    pub fn games_for(&self, player: PlayerId) -> (u32, u32) {
        if self.player1_id == player {
            (self.player1_games, self.player2_games)
        } else if self.player2_id == player {
            (self.player2_games, self.player1_games)
        } else {
            (0, 0)
        }
    }

    /// Record the outcome. Callers validate the result beforehand.
    pub(crate) fn complete(
        &mut self,
        winner_id: Option<PlayerId>,
        is_draw: bool,
        games: [u32; 2],
        ended_at: DateTime<Utc>,
    ) {
        self.winner_id = winner_id;
        self.is_draw = is_draw;
        self.player1_games = games[0];
        self.player2_games = games[1];
        self.ended_at = Some(ended_at);
        self.duration_ms = Some((ended_at - self.started_at).num_milliseconds().max(0));
    }
}

/// An automatic win granted to a player left without an opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bye {
    pub round: u32,
    pub player_id: PlayerId,
    pub player_name: String,
}
