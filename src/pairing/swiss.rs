//! Swiss pairing.

use std::collections::HashSet;

use rand::RngCore;

use super::{PairingContext, PairingStrategy, Pairings};

/// Pairs players with similar scores while avoiding rematches.
///
/// Players are ranked by match points, OMW% and GW% (descending). Each
/// unpaired player, top down, takes the next unpaired player below them they
/// have not met yet. A player with no such opponent gets a bye.
///
/// The matcher is greedy: it can strand a player on a bye even when a
/// complete rematch-free pairing exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct Swiss;

impl PairingStrategy for Swiss {
    fn name(&self) -> &'static str {
        "swiss"
    }

    fn pair(&self, ctx: &PairingContext<'_>, _rng: &mut dyn RngCore) -> Pairings {
        let mut ranked: Vec<_> = ctx.players.iter().collect();
        // Stable sort keeps roster order among exact ties.
        ranked.sort_by(|a, b| {
            let (a, b) = (&a.tiebreakers, &b.tiebreakers);
            b.match_points
                .cmp(&a.match_points)
                .then_with(|| b.opponent_match_win_pct.total_cmp(&a.opponent_match_win_pct))
                .then_with(|| b.game_win_pct.total_cmp(&a.game_win_pct))
        });

        let mut paired = HashSet::new();
        let mut pairings = Pairings::default();

        for (i, player) in ranked.iter().enumerate() {
            if paired.contains(&player.id) {
                continue;
            }

            let opponent = ranked[i + 1..]
                .iter()
                .find(|other| !paired.contains(&other.id) && !ctx.history.contains(player.id, other.id));

            match opponent {
                Some(opponent) => {
                    paired.insert(player.id);
                    paired.insert(opponent.id);
                    pairings.pairs.push((player.id, opponent.id));
                }
                None => {
                    paired.insert(player.id);
                    pairings.byes.push(player.id);
                }
            }
        }

        pairings
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{candidate, context, id};
    use super::super::PairingHistory;
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_first_round_pairs_in_roster_order() {
        let history = PairingHistory::new();
        let players = (1..=4).map(|n| candidate(n, 0)).collect();
        let pairings = Swiss.pair(&context(1, players, &history), &mut rng());

        assert_eq!(pairings.pairs, vec![(id(1), id(2)), (id(3), id(4))]);
        assert!(pairings.byes.is_empty());
    }

    #[test]
    fn test_pairs_by_score() {
        let history = PairingHistory::new();
        let players = vec![candidate(1, 0), candidate(2, 3), candidate(3, 0), candidate(4, 3)];
        let pairings = Swiss.pair(&context(2, players, &history), &mut rng());

        assert_eq!(pairings.pairs, vec![(id(2), id(4)), (id(1), id(3))]);
    }

    #[test]
    fn test_avoids_rematch() {
        let mut history = PairingHistory::new();
        history.insert(id(1), id(2));
        history.insert(id(3), id(4));
        let players = vec![candidate(1, 3), candidate(3, 3), candidate(2, 0), candidate(4, 0)];
        let pairings = Swiss.pair(&context(2, players, &history), &mut rng());

        assert_eq!(pairings.pairs, vec![(id(1), id(3)), (id(2), id(4))]);
        for (a, b) in &pairings.pairs {
            assert!(!history.contains(*a, *b));
        }
    }

    #[test]
    fn test_skips_to_next_legal_opponent() {
        let mut history = PairingHistory::new();
        history.insert(id(1), id(2));
        let players = (1..=4).map(|n| candidate(n, 0)).collect();
        let pairings = Swiss.pair(&context(2, players, &history), &mut rng());

        assert_eq!(pairings.pairs, vec![(id(1), id(3)), (id(2), id(4))]);
    }

    #[test]
    fn test_odd_player_out_gets_bye() {
        let history = PairingHistory::new();
        let players = (1..=5).map(|n| candidate(n, 0)).collect();
        let pairings = Swiss.pair(&context(1, players, &history), &mut rng());

        assert_eq!(pairings.pairs.len(), 2);
        assert_eq!(pairings.byes, vec![id(5)]);
    }

    #[test]
    fn test_greedy_can_strand_players() {
        // 1-4 / 2-3 would be rematch-free, but greedy takes 1-3 first.
        let mut history = PairingHistory::new();
        history.insert(id(1), id(2));
        history.insert(id(2), id(4));
        let players = (1..=4).map(|n| candidate(n, 0)).collect();
        let pairings = Swiss.pair(&context(3, players, &history), &mut rng());

        assert_eq!(pairings.pairs, vec![(id(1), id(3))]);
        assert_eq!(pairings.byes, vec![id(2), id(4)]);
    }
}
