//! Regret Matching (C5): a no-regret dynamic whose time-averaged play
//! converges to correlated equilibrium. The instantaneous profile keeps
//! fluctuating, so the driver (C9) relies on a no-change streak rather
//! than a single clean sweep to declare convergence.
//!
//! Sampling and regret computation are two strictly separate passes over
//! all players — sampling every player first, then computing every
//! player's regret against the resulting joint strategy. Interleaving the
//! two (sample player i, immediately compute its regret, move to i+1)
//! lets a later player's regret calculation see an already-updated
//! neighbour that a synchronous round would not have seen yet, which one
//! early source variant got wrong.

use crate::eventlog::Update;
use crate::game::{utility, Auxiliary, GameState, EPSILON};
use rand::Rng;

pub fn iterate(game: &mut GameState, mut updates: Option<&mut Vec<Update>>) -> bool {
    let n = game.graph().num_nodes();

    // Pass 1: sample every player's action from last iteration's mixed strategy.
    for i in 0..n {
        let prob_1 = match game.aux() {
            Auxiliary::RegretMatching(rs) => rs.prob[2 * i as usize + 1],
            _ => panic!("regret matching iterate called without regret-matching state"),
        };
        let draw: f64 = game.rng().random();
        let old = game.strategies()[i as usize];
        let new = if draw < prob_1 { 1 } else { 0 };
        if new != old {
            if let Some(log) = updates.as_deref_mut() {
                log.push(Update { id: i, old, new, u: 0.0 });
            }
        }
        game.strategies_mut()[i as usize] = new;
    }

    // Pass 2: compute regrets against the now-fixed joint strategy, accumulate,
    // and renormalise each player's mixed strategy for the next iteration.
    let mut any_regret = false;
    for i in 0..n {
        let u0 = utility(game.graph(), game.strategies(), i, 0);
        let u1 = utility(game.graph(), game.strategies(), i, 1);
        let played = game.strategies()[i as usize];
        let u_real = if played == 1 { u1 } else { u0 };
        let r0 = u0 - u_real;
        let r1 = u1 - u_real;
        if r0 > EPSILON || r1 > EPSILON {
            any_regret = true;
        }

        let rs = match game.aux_mut() {
            Auxiliary::RegretMatching(rs) => rs,
            _ => unreachable!("checked above"),
        };
        rs.regret_sum[2 * i as usize] += r0;
        rs.regret_sum[2 * i as usize + 1] += r1;

        let p0 = rs.regret_sum[2 * i as usize].max(0.0);
        let p1 = rs.regret_sum[2 * i as usize + 1].max(0.0);
        let sum = p0 + p1;
        if sum > EPSILON {
            rs.prob[2 * i as usize] = p0 / sum;
            rs.prob[2 * i as usize + 1] = p1 / sum;
        } else {
            rs.prob[2 * i as usize] = 0.5;
            rs.prob[2 * i as usize + 1] = 0.5;
        }
    }

    any_regret
}
