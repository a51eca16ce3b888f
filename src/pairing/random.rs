//! Random (league) pairing.

use rand::seq::SliceRandom;
use rand::RngCore;

use super::{PairingContext, PairingStrategy, Pairings};

/// Shuffles the field each round and pairs neighbours. Rematches are allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPairing;

impl PairingStrategy for RandomPairing {
    fn name(&self) -> &'static str {
        "random"
    }

    fn pair(&self, ctx: &PairingContext<'_>, rng: &mut dyn RngCore) -> Pairings {
        let mut players = self.eligible(ctx);
        players.shuffle(rng);
        Pairings::consecutive(&players)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{candidate, context, id};
    use super::super::PairingHistory;
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_same_seed_same_pairings() {
        let history = PairingHistory::new();
        let players: Vec<_> = (1..=6).map(|n| candidate(n, 0)).collect();

        let a = RandomPairing.pair(&context(1, players.clone(), &history), &mut ChaCha8Rng::seed_from_u64(9));
        let b = RandomPairing.pair(&context(1, players, &history), &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_everyone_seated_once() {
        let history = PairingHistory::new();
        let players = (1..=7).map(|n| candidate(n, 0)).collect();
        let pairings = RandomPairing.pair(&context(1, players, &history), &mut ChaCha8Rng::seed_from_u64(11));

        assert_eq!(pairings.pairs.len(), 3);
        assert_eq!(pairings.byes.len(), 1);
        let mut seated = pairings.seating();
        seated.sort();
        assert_eq!(seated, (1..=7).map(id).collect::<Vec<_>>());
    }

    #[test]
    fn test_rematches_are_allowed() {
        let mut history = PairingHistory::new();
        history.insert(id(1), id(2));
        let players = (1..=2).map(|n| candidate(n, 0)).collect();
        let pairings = RandomPairing.pair(&context(2, players, &history), &mut ChaCha8Rng::seed_from_u64(5));

        assert_eq!(pairings.pairs.len(), 1);
    }
}
