//! Asynchronous (Gauss-Seidel) Fictitious Play (C7): same belief/utility
//! equations as the synchronous variant, but players are visited in a
//! freshly shuffled order each sweep and a just-updated player's belief is
//! folded into the running average immediately, so later players in the
//! same sweep react to it. Synchronous FP on symmetric graphs creates
//! phase-locked cycles; breaking symmetry per sweep collapses these.
//!
//! Reusing a permutation across sweeps destroys the symmetry-breaking
//! property, so the order is reshuffled from the game's own PRNG on every
//! call, never cached.

use crate::eventlog::Update;
use crate::game::{Auxiliary, GameState, COST_SECURITY, PENALTY_UNSECURED};
use rand::seq::SliceRandom;

pub fn iterate(game: &mut GameState, mut updates: Option<&mut Vec<Update>>) -> bool {
    let n = game.graph().num_nodes();
    let mut order: Vec<u64> = (0..n).collect();
    order.shuffle(game.rng());

    let turn_before = match game.aux() {
        Auxiliary::FictitiousPlay(fs) => fs.turn,
        _ => panic!("async fictitious play iterate called without fictitious-play state"),
    };
    let next_turn = turn_before + 1;

    let mut changed = false;
    for &i in &order {
        let mut eu_0 = 0.0;
        {
            let fs = match game.aux() {
                Auxiliary::FictitiousPlay(fs) => fs,
                _ => unreachable!("checked above"),
            };
            for &neighbor in game.graph().neighbors(i) {
                eu_0 -= PENALTY_UNSECURED * (1.0 - fs.belief[neighbor as usize]);
            }
        }
        let eu_1 = -COST_SECURITY;
        let new = if eu_1 > eu_0 { 1 } else { 0 };

        let old = game.strategies()[i as usize];
        if new != old {
            changed = true;
            if let Some(log) = updates.as_deref_mut() {
                log.push(Update { id: i, old, new, u: 0.0 });
            }
        }
        game.strategies_mut()[i as usize] = new;

        let fs = match game.aux_mut() {
            Auxiliary::FictitiousPlay(fs) => fs,
            _ => unreachable!("checked above"),
        };
        if new == 1 {
            fs.count[i as usize] += 1;
        }
        // Fold this player's updated observation into its belief immediately,
        // using the sweep's final turn count as the shared denominator so a
        // later player in this same sweep sees an up-to-date belief.
        fs.belief[i as usize] = fs.count[i as usize] as f64 / next_turn as f64;
    }

    let fs = match game.aux_mut() {
        Auxiliary::FictitiousPlay(fs) => fs,
        _ => unreachable!("checked above"),
    };
    fs.turn = next_turn;

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Algorithm;
    use crate::graph::Graph;

    #[test]
    fn belief_monotonicity_holds_across_iterations() {
        let g = Graph::from_edges(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]).unwrap();
        let mut game = GameState::new(&g, 21);
        game.begin(Algorithm::FpAsync);
        let mut last_turn = match game.aux() {
            Auxiliary::FictitiousPlay(fs) => fs.turn,
            _ => unreachable!(),
        };
        for _ in 0..30 {
            iterate(&mut game, None);
            match game.aux() {
                Auxiliary::FictitiousPlay(fs) => {
                    assert!(fs.turn > last_turn);
                    for i in 0..6 {
                        assert!(fs.count[i] <= fs.turn);
                    }
                    last_turn = fs.turn;
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn disconnected_isolated_vertices_never_secure() {
        let g = Graph::from_edges(15, &[]).unwrap();
        let mut game = GameState::new(&g, 6);
        game.begin(Algorithm::FpAsync);
        *game.strategies_mut() = vec![0; 15];
        let changed = iterate(&mut game, None);
        assert!(!changed);
    }
}
