//! Matching market (C15): a bipartite min-cost flow between the cover and a
//! vendor pool, solved by successive shortest augmenting paths. Costs go
//! negative once a path is routed through a reverse edge, so the
//! shortest-path subroutine is Bellman-Ford (SPFA queue variant), not
//! Dijkstra. Never mutates the strategy vector or the graph.

use rand::rngs::SmallRng;
use rand::Rng;

const INF_COST: f64 = 1e9;

#[derive(Debug, Clone, Copy)]
pub struct Vendor {
    pub price: i64,
    pub quality: i64,
    pub capacity: u64,
}

/// One match from a buyer (a cover vertex) to a vendor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub buyer: u64,
    pub vendor: u64,
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub matches: Vec<Match>,
    pub total_flow: u64,
    pub social_welfare: f64,
}

#[derive(Debug, Clone, Copy)]
struct FlowEdge {
    to: usize,
    cap: i64,
    cost: f64,
}

struct FlowNetwork {
    adj: Vec<Vec<FlowEdge>>,
}

impl FlowNetwork {
    fn new(n: usize) -> Self {
        Self { adj: vec![Vec::new(); n] }
    }

    /// Adds a forward edge `u -> v` and its zero-capacity, negated-cost
    /// reverse twin. The two always sit at the same index in their
    /// respective adjacency lists, so `rev` is recovered as "the other
    /// list's current length at insertion time".
    fn add_edge(&mut self, u: usize, v: usize, cap: i64, cost: f64) {
        let fwd_idx = self.adj[u].len();
        let rev_idx = self.adj[v].len();
        self.adj[u].push(FlowEdge { to: v, cap, cost });
        self.adj[v].push(FlowEdge { to: u, cap: 0, cost: -cost });
        debug_assert_eq!(self.rev_index(u, fwd_idx), rev_idx);
    }

    fn rev_index(&self, u: usize, edge_idx: usize) -> usize {
        let v = self.adj[u][edge_idx].to;
        self.adj[v].len() - 1
    }
}

/// SPFA shortest path from `s` to `t` over residual edges. Returns the
/// parent (node, edge-index-within-that-node's-list) chain if `t` is
/// reachable with positive residual capacity.
fn spfa(net: &FlowNetwork, s: usize, t: usize) -> Option<Vec<(usize, usize)>> {
    let n = net.adj.len();
    let mut dist = vec![INF_COST; n];
    let mut parent = vec![None; n];
    let mut in_queue = vec![false; n];
    let mut queue = std::collections::VecDeque::new();

    dist[s] = 0.0;
    queue.push_back(s);
    in_queue[s] = true;

    while let Some(u) = queue.pop_front() {
        in_queue[u] = false;
        for (i, e) in net.adj[u].iter().enumerate() {
            if e.cap > 0 && dist[u] + e.cost + 1e-9 < dist[e.to] {
                dist[e.to] = dist[u] + e.cost;
                parent[e.to] = Some((u, i));
                if !in_queue[e.to] {
                    queue.push_back(e.to);
                    in_queue[e.to] = true;
                }
            }
        }
    }

    if dist[t] >= INF_COST / 2.0 {
        return None;
    }
    let mut path = Vec::new();
    let mut curr = t;
    while let Some((prev, edge_idx)) = parent[curr] {
        path.push((prev, edge_idx));
        curr = prev;
    }
    path.reverse();
    Some(path)
}

fn min_cost_max_flow(net: &mut FlowNetwork, s: usize, t: usize) -> (i64, f64) {
    let mut total_flow = 0i64;
    let mut total_cost = 0.0;

    while let Some(path) = spfa(net, s, t) {
        let push = path
            .iter()
            .map(|&(u, idx)| net.adj[u][idx].cap)
            .min()
            .unwrap_or(0);
        if push <= 0 {
            break;
        }
        for &(u, idx) in &path {
            let v = net.adj[u][idx].to;
            let rev_idx = net.rev_index(u, idx);
            net.adj[u][idx].cap -= push;
            total_cost += push as f64 * net.adj[u][idx].cost;
            net.adj[v][rev_idx].cap += push;
        }
        total_flow += push;
    }

    (total_flow, total_cost)
}

/// Draws a vendor pool sized at roughly half the buyer count, per the
/// legacy tool's convention for "interesting competition". `capacity_mode`
/// 0 = infinite (capacity equals the number of buyers), 1 = limited
/// (capacity drawn uniformly from `1..=5`), anything else falls back to 0.
pub fn build_vendor_pool(num_buyers: u64, capacity_mode: u8, rng: &mut SmallRng) -> Vec<Vendor> {
    let num_vendors = (num_buyers / 2) + 1;
    (0..num_vendors)
        .map(|_| Vendor {
            price: rng.random_range(1..=100),
            quality: rng.random_range(1..=10),
            capacity: if capacity_mode == 1 {
                rng.random_range(1..=5)
            } else {
                num_buyers
            },
        })
        .collect()
}

/// Runs the market: `buyers` is the cover's vertex ids, `budgets` a
/// per-buyer budget aligned by index. Utility of a match is
/// `(budget - price) + 10 * quality`; the flow network minimizes negated
/// utility, so `social_welfare` is the total utility of the chosen matches.
pub fn run(buyers: &[u64], budgets: &[i64], vendors: &[Vendor]) -> MatchResult {
    let num_buyers = buyers.len();
    let num_vendors = vendors.len();
    if num_buyers == 0 {
        return MatchResult { matches: Vec::new(), total_flow: 0, social_welfare: 0.0 };
    }

    let s = 0usize;
    let t = num_buyers + num_vendors + 1;
    let mut net = FlowNetwork::new(t + 1);

    for i in 0..num_buyers {
        net.add_edge(s, i + 1, 1, 0.0);
    }
    for (i, &budget) in budgets.iter().enumerate() {
        for (j, vendor) in vendors.iter().enumerate() {
            if budget >= vendor.price {
                let utility = (budget - vendor.price) as f64 + vendor.quality as f64 * 10.0;
                net.add_edge(i + 1, num_buyers + j + 1, 1, -utility);
            }
        }
    }
    for (j, vendor) in vendors.iter().enumerate() {
        net.add_edge(num_buyers + j + 1, t, vendor.capacity as i64, 0.0);
    }

    let (total_flow, min_cost) = min_cost_max_flow(&mut net, s, t);

    let mut matches = Vec::new();
    for i in 0..num_buyers {
        for edge in &net.adj[i + 1] {
            let is_vendor_edge = edge.to > num_buyers && edge.to <= num_buyers + num_vendors;
            if is_vendor_edge && edge.cap == 0 {
                matches.push(Match { buyer: buyers[i], vendor: (edge.to - num_buyers - 1) as u64 });
            }
        }
    }

    MatchResult { matches, total_flow: total_flow as u64, social_welfare: -min_cost }
}
