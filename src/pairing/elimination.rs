//! Single elimination bracket pairing.

use rand::seq::SliceRandom;
use rand::RngCore;

use super::{PairingContext, PairingStrategy, Pairings};
use crate::models::PlayerId;

/// Knockout bracket.
///
/// Only players without a loss stay in the bracket. The first round seats
/// them in shuffled order; later rounds keep last round's seating so winners
/// of neighbouring matches meet. An odd player out takes the bye.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleElimination;

impl PairingStrategy for SingleElimination {
    fn name(&self) -> &'static str {
        "single_elimination"
    }

    fn eligible(&self, ctx: &PairingContext<'_>) -> Vec<PlayerId> {
        ctx.players
            .iter()
            .filter(|p| p.losses == 0)
            .map(|p| p.id)
            .collect()
    }

    fn pair(&self, ctx: &PairingContext<'_>, rng: &mut dyn RngCore) -> Pairings {
        let mut survivors = self.eligible(ctx);

        if ctx.previous_order.is_empty() {
            survivors.shuffle(rng);
        } else {
            // Players missing from last round's seating go last, in roster order.
            survivors.sort_by_key(|id| {
                ctx.previous_order
                    .iter()
                    .position(|seated| seated == id)
                    .unwrap_or(usize::MAX)
            });
        }

        Pairings::consecutive(&survivors)
    }
}
