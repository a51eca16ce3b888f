//! Thread-safe handle around a single tournament.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{RoundOutcome, Tournament, TournamentError};
use crate::models::{MatchId, PlayerId, Standing, TournamentSummary};

/// A tournament behind one coarse lock.
///
/// Every operation holds the lock for its whole duration, so a report can
/// never interleave with round generation.
#[derive(Debug, Clone)]
pub struct SharedTournament {
    inner: Arc<Mutex<Tournament>>,
}

impl SharedTournament {
    pub fn new(tournament: Tournament) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tournament)),
        }
    }

    /// Lock the tournament.
    ///
    /// A poisoned lock is recovered: mutators validate before they mutate,
    /// so a panicking holder cannot have left a half-applied update.
    pub fn lock(&self) -> MutexGuard<'_, Tournament> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut Tournament) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn register(&self, name: &str, deck: Option<String>) -> Result<PlayerId, TournamentError> {
        self.lock().register(name, deck)
    }

    pub fn start(&self) -> Result<RoundOutcome, TournamentError> {
        self.lock().start()
    }

    pub fn generate_round(&self) -> Result<RoundOutcome, TournamentError> {
        self.lock().generate_round()
    }

    pub fn report(
        &self,
        match_id: &MatchId,
        winner: Option<PlayerId>,
        is_draw: bool,
        games: [u32; 2],
    ) -> Result<(), TournamentError> {
        self.lock().report(match_id, winner, is_draw, games)
    }

    pub fn drop_player(&self, player_id: PlayerId, round: u32) -> Result<(), TournamentError> {
        self.lock().drop_player(player_id, round)
    }

    pub fn finalize(&self) -> Result<(), TournamentError> {
        self.lock().finalize()
    }

    pub fn standings(&self) -> Vec<Standing> {
        self.lock().standings()
    }

    pub fn summary(&self) -> TournamentSummary {
        self.lock().summary()
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> Tournament {
        self.lock().clone()
    }
}
