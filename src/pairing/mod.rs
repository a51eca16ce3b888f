//! Round pairing strategies.
//!
//! Each competition format has a strategy that turns the eligible players of
//! a round into an ordered list of pairs plus any players left without an
//! opponent (who receive byes). Randomness is always injected by the caller.

mod elimination;
mod random;
mod round_robin;
mod swiss;

use std::collections::BTreeSet;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::calculate::Tiebreakers;
use crate::models::{Format, PlayerId};

pub use elimination::SingleElimination;
pub use random::RandomPairing;
pub use round_robin::RoundRobin;
pub use swiss::Swiss;

/// Unordered player pairs already matched in a tournament.
///
/// Grows monotonically and is never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingHistory {
    pairs: BTreeSet<(PlayerId, PlayerId)>,
}

impl PairingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Whether `a` and `b` have been paired before, in either order.
    pub fn contains(&self, a: PlayerId, b: PlayerId) -> bool {
        self.pairs.contains(&Self::key(a, b))
    }

    /// Record a pairing. Returns false if it was already present.
    pub fn insert(&mut self, a: PlayerId, b: PlayerId) -> bool {
        self.pairs.insert(Self::key(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(PlayerId, PlayerId)> {
        self.pairs.iter()
    }
}

/// A player offered to a strategy, with the values strategies sort on.
#[derive(Debug, Clone, PartialEq)]
pub struct PairingCandidate {
    pub id: PlayerId,
    pub losses: u32,
    pub tiebreakers: Tiebreakers,
}

/// Everything a strategy may look at when pairing a round.
#[derive(Debug, Clone)]
pub struct PairingContext<'a> {
    /// Round being paired
    pub round: u32,

    /// Active players in roster order
    pub players: Vec<PairingCandidate>,

    pub history: &'a PairingHistory,

    /// Players in the order they were seated last round (pairs, then byes)
    pub previous_order: Vec<PlayerId>,
}

/// Output of a strategy for one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairings {
    pub pairs: Vec<(PlayerId, PlayerId)>,

    /// Players left without an opponent
    pub byes: Vec<PlayerId>,
}

impl Pairings {
    /// Pair neighbours in order; an odd player out takes the bye.
    pub fn consecutive(ids: &[PlayerId]) -> Self {
        let mut chunks = ids.chunks_exact(2);
        let pairs = chunks.by_ref().map(|pair| (pair[0], pair[1])).collect();
        Self {
            pairs,
            byes: chunks.remainder().to_vec(),
        }
    }

    /// Every player seated this round, in seating order.
    pub fn seating(&self) -> Vec<PlayerId> {
        self.pairs
            .iter()
            .flat_map(|&(a, b)| [a, b])
            .chain(self.byes.iter().copied())
            .collect()
    }
}

/// A pluggable pairing algorithm for one competition format.
pub trait PairingStrategy: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &'static str;

    /// Players from the context that may still be paired.
    fn eligible(&self, ctx: &PairingContext<'_>) -> Vec<PlayerId> {
        ctx.players.iter().map(|p| p.id).collect()
    }

    /// Produce this round's pairings.
    fn pair(&self, ctx: &PairingContext<'_>, rng: &mut dyn RngCore) -> Pairings;
}

/// Strategy implementing `format`, or `None` for formats without one.
pub fn strategy_for(format: Format) -> Option<Box<dyn PairingStrategy>> {
    match format {
        Format::Swiss => Some(Box::new(Swiss)),
        Format::RoundRobin => Some(Box::new(RoundRobin)),
        Format::SingleElimination => Some(Box::new(SingleElimination)),
        Format::League => Some(Box::new(RandomPairing)),
        Format::DoubleElimination => None,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::id;
    use super::*;

    #[test]
    fn test_history_is_unordered() {
        let mut history = PairingHistory::new();
        assert!(history.is_empty());
        assert!(history.insert(id(2), id(1)));
        assert!(history.contains(id(1), id(2)));
        assert!(history.contains(id(2), id(1)));
        assert!(!history.insert(id(1), id(2)));
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());
        // Stored with the lower id first.
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![&(id(1), id(2))]);
    }

    #[test]
    fn test_history_serialization() {
        let mut history = PairingHistory::new();
        history.insert(id(1), id(3));
        let json = serde_json::to_string(&history).unwrap();
        let deserialized: PairingHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(history, deserialized);
    }

    #[test]
    fn test_consecutive_even() {
        let pairings = Pairings::consecutive(&[id(1), id(2), id(3), id(4)]);
        assert_eq!(pairings.pairs, vec![(id(1), id(2)), (id(3), id(4))]);
        assert!(pairings.byes.is_empty());
    }

    #[test]
    fn test_consecutive_odd_gives_last_the_bye() {
        let pairings = Pairings::consecutive(&[id(5), id(1), id(3)]);
        assert_eq!(pairings.pairs, vec![(id(5), id(1))]);
        assert_eq!(pairings.byes, vec![id(3)]);
        assert_eq!(pairings.seating(), vec![id(5), id(1), id(3)]);
    }

    #[test]
    fn test_strategy_for_formats() {
        assert_eq!(strategy_for(Format::Swiss).unwrap().name(), "swiss");
        assert_eq!(strategy_for(Format::League).unwrap().name(), "random");
        assert!(strategy_for(Format::DoubleElimination).is_none());
    }
}
