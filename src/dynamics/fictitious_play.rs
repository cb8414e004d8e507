//! Fictitious Play (C6): each player best-responds to the empirical belief
//! about its neighbours' play. Best response against a belief-weighted
//! utility is a step function of those beliefs, so pure-strategy
//! oscillation is possible — the driver's streak/restart logic (§4.6,
//! §4.8) is what turns this into a terminating algorithm, not this
//! iterator itself.

use crate::eventlog::Update;
use crate::game::{Auxiliary, GameState, COST_SECURITY, PENALTY_UNSECURED};

pub fn iterate(game: &mut GameState, mut updates: Option<&mut Vec<Update>>) -> bool {
    let n = game.graph().num_nodes();

    // Refresh beliefs from counts observed so far.
    {
        let fs = match game.aux_mut() {
            Auxiliary::FictitiousPlay(fs) => fs,
            _ => panic!("fictitious play iterate called without fictitious-play state"),
        };
        for i in 0..n as usize {
            fs.belief[i] = fs.count[i] as f64 / fs.turn as f64;
        }
    }

    // Compute the synchronous shadow profile: best response to beliefs,
    // ties toward 0 (prefer not paying unless strictly forced).
    let mut shadow = Vec::with_capacity(n as usize);
    for i in 0..n {
        let eu_1 = -COST_SECURITY;
        let mut eu_0 = 0.0;
        let fs = match game.aux() {
            Auxiliary::FictitiousPlay(fs) => fs,
            _ => unreachable!("checked above"),
        };
        for &neighbor in game.graph().neighbors(i) {
            eu_0 -= PENALTY_UNSECURED * (1.0 - fs.belief[neighbor as usize]);
        }
        shadow.push(if eu_1 > eu_0 { 1 } else { 0 });
    }

    // Commit atomically, then update counts/turn for the next round.
    let mut changed = false;
    for i in 0..n as usize {
        let old = game.strategies()[i];
        let new = shadow[i];
        if new != old {
            changed = true;
            if let Some(log) = updates.as_deref_mut() {
                log.push(Update { id: i as u64, old, new, u: 0.0 });
            }
        }
        game.strategies_mut()[i] = new;
    }
    let fs = match game.aux_mut() {
        Auxiliary::FictitiousPlay(fs) => fs,
        _ => unreachable!("checked above"),
    };
    for i in 0..n as usize {
        if shadow[i] == 1 {
            fs.count[i] += 1;
        }
    }
    fs.turn += 1;

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Algorithm;
    use crate::graph::Graph;

    #[test]
    fn belief_monotonicity_holds_across_iterations() {
        let g = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
        let mut game = GameState::new(&g, 9);
        game.begin(Algorithm::Fp);
        let mut last_turn = match game.aux() {
            Auxiliary::FictitiousPlay(fs) => fs.turn,
            _ => unreachable!(),
        };
        for _ in 0..20 {
            iterate(&mut game, None);
            match game.aux() {
                Auxiliary::FictitiousPlay(fs) => {
                    assert!(fs.turn > last_turn);
                    for i in 0..5 {
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
        let g = Graph::from_edges(20, &[]).unwrap();
        let mut game = GameState::new(&g, 5);
        game.begin(Algorithm::Fp);
        *game.strategies_mut() = vec![0; 20];
        let changed = iterate(&mut game, None);
        assert!(!changed);
        assert_eq!(game.strategies(), vec![0u8; 20].as_slice());
    }
}
