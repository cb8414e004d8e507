//! Mutable game state: strategy vector, per-algorithm auxiliary state, and
//! the utility oracle (C2/C3).

use crate::error::GameError;
use crate::graph::Graph;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

pub const COST_SECURITY: f64 = 1.0;
pub const PENALTY_UNSECURED: f64 = 10.0;
pub const EPSILON: f64 = 1e-9;
pub const STREAK_THRESHOLD: u64 = 500;
pub const RESTART_INTERVAL: u64 = 1000;

/// Algorithm identifiers, stable across the CLI and the driver (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Brd = 1,
    Rm = 2,
    Fp = 3,
    Shapley = 4,
    FpAsync = 5,
}

impl TryFrom<u64> for Algorithm {
    type Error = GameError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Self::Brd),
            2 => Ok(Self::Rm),
            3 => Ok(Self::Fp),
            4 => Ok(Self::Shapley),
            5 => Ok(Self::FpAsync),
            other => Err(GameError::UnknownAlgorithm(other)),
        }
    }
}

/// Per-algorithm auxiliary state, modeled as a tagged variant (§9). The
/// driver dispatches on the tag; mismatched tag/algorithm combinations are
/// a programming error and panic rather than returning a `Result`.
pub enum Auxiliary {
    None,
    RegretMatching(RegretState),
    FictitiousPlay(FictitiousState),
}

/// Regret-matching state: cumulative regret and mixed-strategy probability
/// per player per action, laid out as `[2*i + a]`.
pub struct RegretState {
    pub regret_sum: Vec<f64>,
    pub prob: Vec<f64>,
}

impl RegretState {
    fn new(n: u64) -> Self {
        Self {
            regret_sum: vec![0.0; 2 * n as usize],
            prob: vec![0.5; 2 * n as usize],
        }
    }
}

/// Fictitious-play belief state, warm-started per §3 so the dynamic starts
/// near the indifference threshold instead of spending thousands of
/// iterations accumulating history from a flat prior.
pub struct FictitiousState {
    pub count: Vec<u64>,
    pub belief: Vec<f64>,
    pub turn: u64,
}

impl FictitiousState {
    fn warm_start(n: u64, rng: &mut SmallRng) -> Self {
        let turn = 100;
        let mut count = Vec::with_capacity(n as usize);
        let mut belief = Vec::with_capacity(n as usize);
        for _ in 0..n {
            let c = rng.random_range(90..=100);
            count.push(c);
            belief.push(c as f64 / turn as f64);
        }
        Self { count, belief, turn }
    }
}

pub struct GameState<'g> {
    graph: &'g Graph,
    strategies: Vec<u8>,
    aux: Auxiliary,
    rng: SmallRng,
}

impl<'g> GameState<'g> {
    /// Builds a fresh run with a uniformly random initial strategy vector
    /// and no auxiliary state. Call [`GameState::begin`] to attach the
    /// state an algorithm needs before iterating.
    pub fn new(graph: &'g Graph, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let n = graph.num_nodes();
        let strategies = (0..n).map(|_| rng.random_range(0..=1)).collect();
        Self { graph, strategies, aux: Auxiliary::None, rng }
    }

    pub fn graph(&self) -> &Graph {
        self.graph
    }

    pub fn strategies(&self) -> &[u8] {
        &self.strategies
    }

    pub fn strategies_mut(&mut self) -> &mut Vec<u8> {
        &mut self.strategies
    }

    pub fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    pub fn aux(&self) -> &Auxiliary {
        &self.aux
    }

    pub fn aux_mut(&mut self) -> &mut Auxiliary {
        &mut self.aux
    }

    /// Attaches the auxiliary state required by `algorithm`, releasing
    /// whatever was there before. BRD and Shapley need none.
    pub fn begin(&mut self, algorithm: Algorithm) {
        self.aux = match algorithm {
            Algorithm::Brd | Algorithm::Shapley => Auxiliary::None,
            Algorithm::Rm => Auxiliary::RegretMatching(RegretState::new(self.graph.num_nodes())),
            Algorithm::Fp | Algorithm::FpAsync => {
                Auxiliary::FictitiousPlay(FictitiousState::warm_start(self.graph.num_nodes(), &mut self.rng))
            }
        };
    }

    /// Re-initializes fictitious-play state in place (§4.6 periodic
    /// restart). Panics if the current auxiliary state is not FP — that
    /// mismatch is a driver bug, not recoverable input.
    pub fn restart_fictitious_play(&mut self) {
        let n = self.graph.num_nodes();
        match &mut self.aux {
            Auxiliary::FictitiousPlay(_) => {
                self.aux = Auxiliary::FictitiousPlay(FictitiousState::warm_start(n, &mut self.rng));
                for s in self.strategies.iter_mut() {
                    *s = self.rng.random_range(0..=1);
                }
            }
            _ => panic!("restart_fictitious_play called without fictitious-play state"),
        }
    }
}

/// Utility oracle (C3): pure function of the graph, the current joint
/// strategy, a player, and a hypothetical action.
pub fn utility(graph: &Graph, strategies: &[u8], player: u64, action: u8) -> f64 {
    if action == 1 {
        return -COST_SECURITY;
    }
    let mut payoff = 0.0;
    for &neighbor in graph.neighbors(player) {
        if strategies[neighbor as usize] == 0 {
            payoff -= PENALTY_UNSECURED;
        }
    }
    payoff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utility_of_playing_one_is_constant() {
        let g = Graph::from_edges(2, &[(0, 1)]).unwrap();
        let s = vec![0, 0];
        assert_eq!(utility(&g, &s, 0, 1), -COST_SECURITY);
        let s2 = vec![1, 1];
        assert_eq!(utility(&g, &s2, 0, 1), -COST_SECURITY);
    }

    #[test]
    fn utility_of_playing_zero_is_nonpositive_and_zero_when_all_neighbors_secure() {
        let g = Graph::from_edges(3, &[(0, 1), (0, 2)]).unwrap();
        let all_secure = vec![0, 1, 1];
        assert_eq!(utility(&g, &all_secure, 0, 0), 0.0);
        let one_unsecured = vec![0, 0, 1];
        assert!(utility(&g, &one_unsecured, 0, 0) < 0.0);
    }

    #[test]
    fn algorithm_id_roundtrip() {
        assert_eq!(Algorithm::try_from(1).unwrap(), Algorithm::Brd);
        assert_eq!(Algorithm::try_from(5).unwrap(), Algorithm::FpAsync);
        assert!(Algorithm::try_from(6).is_err());
    }

    #[test]
    fn restart_produces_warm_start_invariants() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let mut gs = GameState::new(&g, 42);
        gs.begin(Algorithm::Fp);
        gs.restart_fictitious_play();
        match gs.aux() {
            Auxiliary::FictitiousPlay(fs) => {
                assert_eq!(fs.turn, 100);
                for i in 0..3 {
                    assert!(fs.count[i] >= 90 && fs.count[i] <= 100);
                    assert!((fs.belief[i] - fs.count[i] as f64 / 100.0).abs() < 1e-12);
                }
            }
            _ => panic!("expected fictitious play state"),
        }
    }
}
