//! Round robin pairing.

use std::collections::HashSet;

use rand::RngCore;

use super::{PairingContext, PairingStrategy, Pairings};

/// Everyone meets everyone once, one new opponent per round.
///
/// Walking the roster in order, each free player takes the first free player
/// after them they have not met. Full coverage takes `n-1` rounds for an even
/// roster; anyone left without a fresh opponent gets a bye.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin;

impl PairingStrategy for RoundRobin {
    fn name(&self) -> &'static str {
        "round_robin"
    }

    fn pair(&self, ctx: &PairingContext<'_>, _rng: &mut dyn RngCore) -> Pairings {
        let roster: Vec<_> = ctx.players.iter().map(|p| p.id).collect();
        let mut consumed = HashSet::new();
        let mut pairings = Pairings::default();

        for (i, &player) in roster.iter().enumerate() {
            if consumed.contains(&player) {
                continue;
            }
            consumed.insert(player);

            let opponent = roster[i + 1..]
                .iter()
                .copied()
                .find(|&other| !consumed.contains(&other) && !ctx.history.contains(player, other));

            match opponent {
                Some(opponent) => {
                    consumed.insert(opponent);
                    pairings.pairs.push((player, opponent));
                }
                None => pairings.byes.push(player),
            }
        }

        pairings
    }
}
