//! Best-Response Dynamics (C4): one synchronous sweep, Gauss-Seidel update
//! order. For potential games of this shape (asymmetric cost-sharing on
//! edges) a finite number of sweeps reaches a pure Nash equilibrium; no
//! restart logic is needed.

use crate::eventlog::Update;
use crate::game::{utility, GameState};

/// Runs one sweep over players `0..n` in index order. Ties keep the
/// current strategy rather than flipping, matching §4.2's deterministic
/// tie-break rule.
pub fn iterate(game: &mut GameState, mut updates: Option<&mut Vec<Update>>) -> bool {
    let n = game.graph().num_nodes();
    let mut changed = false;
    for i in 0..n {
        let current = game.strategies()[i as usize];
        let u0 = utility(game.graph(), game.strategies(), i, 0);
        let u1 = utility(game.graph(), game.strategies(), i, 1);

        let best = if u1 > u0 {
            1
        } else if u0 > u1 {
            0
        } else {
            current
        };

        if best != current {
            game.strategies_mut()[i as usize] = best;
            changed = true;
            if let Some(log) = updates.as_deref_mut() {
                let u = if best == 1 { u1 } else { u0 };
                log.push(Update { id: i, old: current, new: best, u });
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::validators::{is_minimal, is_valid_cover};

    #[test]
    fn single_edge_converges_in_two_sweeps() {
        let g = Graph::from_edges(2, &[(0, 1)]).unwrap();
        let mut game = GameState::new(&g, 7);
        game.strategies_mut()[0] = 0;
        game.strategies_mut()[1] = 0;
        iterate(&mut game, None);
        iterate(&mut game, None);
        let s = game.strategies();
        assert!((s[0] == 1) != (s[1] == 1), "exactly one endpoint covers the single edge");
    }

    #[test]
    fn triangle_from_all_zero_matches_hand_traced_result() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]).unwrap();
        let mut game = GameState::new(&g, 1);
        *game.strategies_mut() = vec![0, 0, 0];
        let changed = iterate(&mut game, None);
        assert!(changed);
        assert_eq!(game.strategies(), &[1, 1, 0]);
        assert!(is_valid_cover(game.graph(), game.strategies()));
        assert!(is_minimal(game.graph(), game.strategies()));
    }

    #[test]
    fn path_of_four_converges_to_a_minimum_cover() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let mut game = GameState::new(&g, 1);
        *game.strategies_mut() = vec![0, 0, 0, 0];
        loop {
            if !iterate(&mut game, None) {
                break;
            }
        }
        assert_eq!(game.strategies(), &[0, 1, 1, 0]);
        assert!(is_valid_cover(game.graph(), game.strategies()));
        assert!(is_minimal(game.graph(), game.strategies()));
    }

    #[test]
    fn disconnected_isolated_vertices_converge_immediately() {
        let g = Graph::from_edges(100, &[]).unwrap();
        let mut game = GameState::new(&g, 3);
        *game.strategies_mut() = vec![0; 100];
        assert!(!iterate(&mut game, None));
        assert!(is_valid_cover(game.graph(), game.strategies()));
        assert!(is_minimal(game.graph(), game.strategies()));
    }

    #[test]
    fn idempotence_after_no_change_sweep() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]).unwrap();
        let mut game = GameState::new(&g, 1);
        *game.strategies_mut() = vec![0, 0, 0];
        while iterate(&mut game, None) {}
        let before = game.strategies().to_vec();
        assert!(!iterate(&mut game, None));
        assert_eq!(game.strategies(), before.as_slice());
    }
}
