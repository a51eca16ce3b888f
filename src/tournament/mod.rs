//! Tournament orchestration.
//!
//! `Tournament` owns the roster, the match log and the pairing history, and
//! drives the `NotStarted -> InProgress -> Finished` lifecycle. Pairing is
//! delegated to the format's [`PairingStrategy`](crate::pairing::PairingStrategy)
//! and ranking to [`StandingsCalculator`].
//!
//! Every mutator validates its input completely before changing anything,
//! so a failed call leaves the tournament untouched.

mod shared;

pub use shared::SharedTournament;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculate::{compare_records, StandingsCalculator};
use crate::config::TournamentConfig;
use crate::models::{
    Bye, Format, Match, MatchId, PlayerId, PlayerRecord, PlayerSummary, Standing,
    TournamentStatus, TournamentSummary,
};
use crate::pairing::{strategy_for, PairingCandidate, PairingContext, PairingHistory};

/// Minimum number of active players needed to start.
pub const MIN_PLAYERS: usize = 2;

/// Errors returned by tournament operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TournamentError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Match {0} has already been reported")]
    AlreadyReported(MatchId),

    #[error("Not enough players: {found} active, at least {required} required")]
    InsufficientPlayers { required: usize, found: usize },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(Format),

    #[error("Invalid result: {0}")]
    InvalidResult(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Stable error categories for mapping errors to user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidState,
    NotFound,
    AlreadyReported,
    InsufficientPlayers,
    UnsupportedFormat,
    InvalidResult,
    InvalidConfig,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidState => "INVALID_STATE",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::AlreadyReported => "ALREADY_REPORTED",
            ErrorKind::InsufficientPlayers => "INSUFFICIENT_PLAYERS",
            ErrorKind::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorKind::InvalidResult => "INVALID_RESULT",
            ErrorKind::InvalidConfig => "INVALID_CONFIG",
        }
    }
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TournamentError::InvalidState(_) => ErrorKind::InvalidState,
            TournamentError::NotFound(_) => ErrorKind::NotFound,
            TournamentError::AlreadyReported(_) => ErrorKind::AlreadyReported,
            TournamentError::InsufficientPlayers { .. } => ErrorKind::InsufficientPlayers,
            TournamentError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            TournamentError::InvalidResult(_) => ErrorKind::InvalidResult,
            TournamentError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }
}

/// What a call to [`Tournament::generate_round`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// A new round was paired.
    Paired {
        round: u32,
        matches: Vec<MatchId>,
        byes: Vec<PlayerId>,
    },
    /// No round was left to play; the tournament is now finished.
    Finished,
}

/// A tournament and everything recorded in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    config: TournamentConfig,

    /// Round count in effect, resolved at start when not configured
    total_rounds: Option<u32>,

    players: BTreeMap<PlayerId, PlayerRecord>,
    matches: Vec<Match>,
    byes: Vec<Bye>,
    history: PairingHistory,

    /// Next round to pair
    current_round: u32,
    next_player_id: u32,
    started: bool,
    finished: bool,
    created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a tournament. Fails for formats without a pairing strategy.
    pub fn new(mut config: TournamentConfig) -> Result<Self, TournamentError> {
        config
            .validate()
            .map_err(|e| TournamentError::InvalidConfig(e.to_string()))?;

        if strategy_for(config.format).is_none() {
            return Err(TournamentError::UnsupportedFormat(config.format));
        }

        let seed = *config.seed.get_or_insert_with(rand::random);
        info!(
            "Created tournament '{}' ({}, seed {})",
            config.name, config.format, seed
        );

        Ok(Self {
            total_rounds: config.rounds,
            config,
            players: BTreeMap::new(),
            matches: Vec::new(),
            byes: Vec::new(),
            history: PairingHistory::new(),
            current_round: 0,
            next_player_id: 1,
            started: false,
            finished: false,
            created_at: Utc::now(),
        })
    }

    /// Register a player. Only allowed before the tournament starts.
    pub fn register(
        &mut self,
        name: &str,
        deck: Option<String>,
    ) -> Result<PlayerId, TournamentError> {
        self.require_status(TournamentStatus::NotStarted, "register players")?;

        let id = PlayerId::new(self.next_player_id);
        self.next_player_id += 1;
        self.players
            .insert(id, PlayerRecord::new(id, name.to_string(), deck));

        debug!("Registered player {} ({})", id, name);
        Ok(id)
    }

    /// Start the tournament and pair round 1.
    pub fn start(&mut self) -> Result<RoundOutcome, TournamentError> {
        if self.started {
            return Err(TournamentError::InvalidState(
                "tournament has already started".to_string(),
            ));
        }

        let active = self.active_count();
        if active < MIN_PLAYERS {
            return Err(TournamentError::InsufficientPlayers {
                required: MIN_PLAYERS,
                found: active,
            });
        }

        let rounds = self
            .config
            .rounds
            .unwrap_or_else(|| self.config.format.default_rounds(active));
        self.total_rounds = Some(rounds);
        self.started = true;
        self.current_round = 1;

        info!(
            "Starting '{}' with {} players over {} rounds",
            self.config.name, active, rounds
        );
        self.generate_round()
    }

    /// Pair the next round, or finish the tournament when no rounds remain.
    pub fn generate_round(&mut self) -> Result<RoundOutcome, TournamentError> {
        self.require_status(TournamentStatus::InProgress, "generate a round")?;

        if let Some(pending) = self.matches.iter().find(|m| !m.is_reported()) {
            return Err(TournamentError::InvalidState(format!(
                "match {} of round {} has not been reported",
                pending.id, pending.round
            )));
        }

        let total_rounds = self.total_rounds.unwrap_or(0);
        if self.current_round > total_rounds {
            info!("All {} rounds played", total_rounds);
            self.finalize()?;
            return Ok(RoundOutcome::Finished);
        }

        let strategy = strategy_for(self.config.format)
            .ok_or(TournamentError::UnsupportedFormat(self.config.format))?;

        let round = self.current_round;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed().wrapping_add(round as u64));
        let paired = {
            let ctx = self.pairing_context(round);
            let eligible = strategy.eligible(&ctx).len();
            if eligible < MIN_PLAYERS {
                Err(eligible)
            } else {
                Ok(strategy.pair(&ctx, &mut rng))
            }
        };

        let pairings = match paired {
            Ok(pairings) => pairings,
            Err(eligible) => {
                info!(
                    "Only {} player(s) left to pair in round {}, finishing",
                    eligible, round
                );
                self.finalize()?;
                return Ok(RoundOutcome::Finished);
            }
        };
        debug!(
            "{} produced {} pairs and {} byes for round {}",
            strategy.name(),
            pairings.pairs.len(),
            pairings.byes.len(),
            round
        );

        let mut match_ids = Vec::with_capacity(pairings.pairs.len());
        for (sequence, &(a, b)) in (1u32..).zip(pairings.pairs.iter()) {
            let m = Match::new(
                round,
                sequence,
                (a, self.player_name(a)),
                (b, self.player_name(b)),
            );
            if !self.history.insert(a, b) {
                warn!("Rematch between {} and {} in round {}", a, b, round);
            }
            match_ids.push(m.id.clone());
            self.matches.push(m);
        }

        for &player_id in &pairings.byes {
            if let Some(record) = self.players.get_mut(&player_id) {
                record.record_bye();
                self.byes.push(Bye {
                    round,
                    player_id,
                    player_name: record.name.clone(),
                });
                debug!("Player {} receives a bye in round {}", player_id, round);
            }
        }

        self.current_round += 1;
        info!(
            "Paired round {}: {} matches, {} byes",
            round,
            match_ids.len(),
            pairings.byes.len()
        );

        Ok(RoundOutcome::Paired {
            round,
            matches: match_ids,
            byes: pairings.byes,
        })
    }

    /// Record the result of a match.
    ///
    /// `games` holds the games won by player 1 and player 2 respectively.
    pub fn report(
        &mut self,
        match_id: &MatchId,
        winner: Option<PlayerId>,
        is_draw: bool,
        games: [u32; 2],
    ) -> Result<(), TournamentError> {
        let index = self
            .matches
            .iter()
            .position(|m| &m.id == match_id)
            .ok_or_else(|| TournamentError::NotFound(format!("match {}", match_id)))?;

        let m = &self.matches[index];
        if m.is_reported() {
            return Err(TournamentError::AlreadyReported(match_id.clone()));
        }
        if self.finished {
            return Err(TournamentError::InvalidState(
                "tournament is finished".to_string(),
            ));
        }
        self.validate_result(m, winner, is_draw, games)?;

        let ended_at = Utc::now();
        let m = &mut self.matches[index];
        m.complete(winner, is_draw, games, ended_at);
        let (p1, p2) = (m.player1_id, m.player2_id);

        for (player, won, lost) in [(p1, games[0], games[1]), (p2, games[1], games[0])] {
            if let Some(record) = self.players.get_mut(&player) {
                if is_draw {
                    record.record_draw(won, lost);
                } else if winner == Some(player) {
                    record.record_win(won, lost);
                } else {
                    record.record_loss(won, lost);
                }
            }
        }

        match winner {
            Some(winner) => info!("Match {}: player {} wins", match_id, winner),
            None => info!("Match {}: draw", match_id),
        }
        Ok(())
    }

    /// Drop a player. The record stays in the roster, marked inactive.
    pub fn drop_player(&mut self, player_id: PlayerId, round: u32) -> Result<(), TournamentError> {
        if self.finished {
            return Err(TournamentError::InvalidState(
                "tournament is finished".to_string(),
            ));
        }

        let record = self
            .players
            .get(&player_id)
            .ok_or_else(|| TournamentError::NotFound(format!("player {}", player_id)))?;

        if !record.is_active {
            return Err(TournamentError::InvalidState(format!(
                "player {} already dropped in round {}",
                player_id,
                record.dropped_round.unwrap_or_default()
            )));
        }

        if let Some(pending) = self
            .matches
            .iter()
            .find(|m| !m.is_reported() && m.involves(player_id))
        {
            return Err(TournamentError::InvalidState(format!(
                "player {} still has match {} to report",
                player_id, pending.id
            )));
        }

        if let Some(record) = self.players.get_mut(&player_id) {
            record.mark_dropped(round);
        }
        info!("Player {} dropped in round {}", player_id, round);
        Ok(())
    }

    /// Players ranked by match points, OMW%, GW%, then id.
    ///
    /// Tiebreaker columns read zero until [`finalize`](Self::finalize) has run.
    pub fn standings(&self) -> Vec<Standing> {
        let mut records: Vec<&PlayerRecord> = self.players.values().collect();
        records.sort_by(|a, b| compare_records(a, b));
        (1u32..)
            .zip(records)
            .map(|(rank, record)| Standing::from_record(rank, record))
            .collect()
    }

    /// Compute tiebreakers from the full log and mark the tournament finished.
    ///
    /// Idempotent: repeated calls write the same values.
    pub fn finalize(&mut self) -> Result<(), TournamentError> {
        if !self.started {
            return Err(TournamentError::InvalidState(
                "cannot finalize a tournament that has not started".to_string(),
            ));
        }

        let calculator = StandingsCalculator::new(&self.matches, &self.byes);
        for (&id, record) in self.players.iter_mut() {
            record.set_tiebreakers(
                calculator.opponent_match_win_pct(id),
                calculator.game_win_pct(id),
            );
        }

        if !self.finished {
            info!(
                "Tournament '{}' finished after {} rounds",
                self.config.name,
                self.rounds_played()
            );
        }
        self.finished = true;
        Ok(())
    }

    /// Serializable snapshot of the whole tournament.
    pub fn summary(&self) -> TournamentSummary {
        TournamentSummary {
            name: self.config.name.clone(),
            format: self.config.format,
            status: self.status(),
            rounds_configured: self.total_rounds,
            rounds_played: self.rounds_played(),
            best_of: self.config.best_of,
            players: self.players.values().map(PlayerSummary::from).collect(),
            matches: self.matches.clone(),
            byes: self.byes.clone(),
            standings: self.standings(),
            generated_at: Utc::now(),
        }
    }

    pub fn status(&self) -> TournamentStatus {
        if self.finished {
            TournamentStatus::Finished
        } else if self.started {
            TournamentStatus::InProgress
        } else {
            TournamentStatus::NotStarted
        }
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn format(&self) -> Format {
        self.config.format
    }

    /// Seed that per-round pairing randomness is derived from.
    pub fn seed(&self) -> u64 {
        self.config.seed.unwrap_or_default()
    }

    /// Next round to pair (0 before start).
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    /// Rounds paired so far.
    pub fn rounds_played(&self) -> u32 {
        self.current_round.saturating_sub(1)
    }

    pub fn total_rounds(&self) -> Option<u32> {
        self.total_rounds
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.players.get(&id)
    }

    /// All players in registration order, dropped ones included.
    pub fn players(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.values()
    }

    pub fn active_players(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.values().filter(|p| p.is_active)
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn match_by_id(&self, id: &MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| &m.id == id)
    }

    pub fn round_matches(&self, round: u32) -> Vec<&Match> {
        self.matches.iter().filter(|m| m.round == round).collect()
    }

    pub fn pending_matches(&self) -> Vec<&Match> {
        self.matches.iter().filter(|m| !m.is_reported()).collect()
    }

    pub fn byes(&self) -> &[Bye] {
        &self.byes
    }

    pub fn history(&self) -> &PairingHistory {
        &self.history
    }

    fn active_count(&self) -> usize {
        self.active_players().count()
    }

    fn player_name(&self, id: PlayerId) -> String {
        self.players
            .get(&id)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }

    fn require_status(
        &self,
        expected: TournamentStatus,
        action: &str,
    ) -> Result<(), TournamentError> {
        let status = self.status();
        if status == expected {
            Ok(())
        } else {
            Err(TournamentError::InvalidState(format!(
                "cannot {} while the tournament is {}",
                action, status
            )))
        }
    }

    fn validate_result(
        &self,
        m: &Match,
        winner: Option<PlayerId>,
        is_draw: bool,
        games: [u32; 2],
    ) -> Result<(), TournamentError> {
        match (winner, is_draw) {
            (Some(_), true) => {
                return Err(TournamentError::InvalidResult(
                    "a match cannot have both a winner and a draw".to_string(),
                ))
            }
            (None, false) => {
                return Err(TournamentError::InvalidResult(
                    "a result needs either a winner or a draw".to_string(),
                ))
            }
            (Some(winner), false) if !m.involves(winner) => {
                return Err(TournamentError::InvalidResult(format!(
                    "player {} is not part of match {}",
                    winner, m.id
                )))
            }
            _ => {}
        }

        let best_of = self.config.best_of;
        match games[0].checked_add(games[1]) {
            Some(played) if played <= best_of => {}
            _ => {
                return Err(TournamentError::InvalidResult(format!(
                    "{}-{} is too many games for a best-of-{} match",
                    games[0], games[1], best_of
                )))
            }
        }

        if let Some(winner) = winner {
            let [won, lost] = if m.player1_id == winner {
                games
            } else {
                [games[1], games[0]]
            };
            if won + lost > 0 && won <= lost {
                return Err(TournamentError::InvalidResult(format!(
                    "player {} won match {} with {}-{} in games",
                    winner, m.id, won, lost
                )));
            }
        }

        // A draw cannot hand either side a match-winning majority.
        let majority = best_of / 2 + 1;
        if is_draw && games.iter().any(|&g| g >= majority) {
            return Err(TournamentError::InvalidResult(format!(
                "a draw cannot score {}-{} in a best-of-{} match",
                games[0], games[1], best_of
            )));
        }

        Ok(())
    }

    fn pairing_context(&self, round: u32) -> PairingContext<'_> {
        let calculator = StandingsCalculator::new(&self.matches, &self.byes);
        let players = self
            .active_players()
            .map(|p| PairingCandidate {
                id: p.id,
                losses: p.losses,
                tiebreakers: calculator.tiebreakers(p.id),
            })
            .collect();

        let previous = round.saturating_sub(1);
        let previous_order = self
            .matches
            .iter()
            .filter(|m| m.round == previous)
            .flat_map(|m| [m.player1_id, m.player2_id])
            .chain(
                self.byes
                    .iter()
                    .filter(|b| b.round == previous)
                    .map(|b| b.player_id),
            )
            .collect();

        PairingContext {
            round,
            players,
            history: &self.history,
            previous_order,
        }
    }
}
