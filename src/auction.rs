//! VCG shortest-path auction (C16): buyers bid a private cost to traverse
//! each node; the auctioneer picks the cheapest path from `s` to `t`, and
//! pays each node on it the externality it imposes on everyone else —
//! making truthful bidding a dominant strategy. Read-only with respect to
//! the cover.

use crate::graph::Graph;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const INF_DIST: f64 = 1e14;
/// Disutility added for traversing a node outside the security cover.
pub const PENALTY_COST: f64 = 200.0;

#[derive(Debug, Clone)]
pub struct Path {
    pub nodes: Vec<u64>,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    node: u64,
    dist: f64,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist
    }
}
impl Eq for HeapEntry {}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (a max-heap) pops the smallest distance.
        other.dist.partial_cmp(&self.dist).unwrap_or(Ordering::Equal)
    }
}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn node_weight(bid: f64, secure: bool) -> f64 {
    bid + if secure { 0.0 } else { PENALTY_COST }
}

/// Dijkstra from `s` to `t`, treating `exclude` as removed from the graph
/// (pass `None` to include every node). Cost is incurred on entering a
/// node, including `s` itself.
fn shortest_path(graph: &Graph, s: u64, t: u64, bids: &[f64], covered: &[u8], exclude: Option<u64>) -> Path {
    let n = graph.num_nodes() as usize;
    let mut dist = vec![INF_DIST; n];
    let mut parent: Vec<Option<u64>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut heap = BinaryHeap::new();

    if Some(s) != exclude {
        dist[s as usize] = node_weight(bids[s as usize], covered[s as usize] == 1);
        heap.push(HeapEntry { node: s, dist: dist[s as usize] });
    }

    while let Some(HeapEntry { node: u, .. }) = heap.pop() {
        if visited[u as usize] {
            continue;
        }
        visited[u as usize] = true;
        if u == t {
            break;
        }
        for &v in graph.neighbors(u) {
            if Some(v) == exclude {
                continue;
            }
            let weight_v = node_weight(bids[v as usize], covered[v as usize] == 1);
            let candidate = dist[u as usize] + weight_v;
            if candidate < dist[v as usize] {
                dist[v as usize] = candidate;
                parent[v as usize] = Some(u);
                heap.push(HeapEntry { node: v, dist: candidate });
            }
        }
    }

    if dist[t as usize] >= INF_DIST {
        return Path { nodes: Vec::new(), cost: dist[t as usize] };
    }

    let mut nodes = Vec::new();
    let mut curr = Some(t);
    while let Some(node) = curr {
        nodes.push(node);
        curr = parent[node as usize];
    }
    nodes.reverse();
    Path { nodes, cost: dist[t as usize] }
}

#[derive(Debug, Clone, Copy)]
pub struct Payment {
    pub node: u64,
    pub bid: f64,
    /// `None` marks a bridge node: removing it disconnects `s` from `t`, so
    /// no finite externality-based payment exists.
    pub payment: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AuctionResult {
    pub winning_path: Path,
    pub payments: Vec<Payment>,
}

/// Runs the auction for one `s`-`t` request. Returns `None` if no path
/// exists between `s` and `t`.
pub fn run(graph: &Graph, s: u64, t: u64, bids: &[f64], covered: &[u8]) -> Option<AuctionResult> {
    let optimal = shortest_path(graph, s, t, bids, covered, None);
    if optimal.nodes.is_empty() {
        return None;
    }

    let mut payments = Vec::with_capacity(optimal.nodes.len());
    for &u in &optimal.nodes {
        let w_u = node_weight(bids[u as usize], covered[u as usize] == 1);
        let cost_of_others = optimal.cost - w_u;
        let alt = shortest_path(graph, s, t, bids, covered, Some(u));
        let payment = if alt.nodes.is_empty() {
            None
        } else {
            Some(alt.cost - cost_of_others)
        };
        payments.push(Payment { node: u, bid: bids[u as usize], payment });
    }

    Some(AuctionResult { winning_path: optimal, payments })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_edge_path_pays_the_externality_of_the_only_alternative() {
        // s=0 -- a=1 -- t=2, and a direct s-t edge as the alternative route.
        let g = Graph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]).unwrap();
        let bids = vec![10.0, 5.0, 10.0];
        let covered = vec![1u8, 1, 1];
        let result = run(&g, 0, 2, &bids, &covered).unwrap();
        assert!(result.winning_path.nodes.contains(&1));
        let node1 = result.payments.iter().find(|p| p.node == 1).unwrap();
        assert!(node1.payment.is_some());
    }

    #[test]
    fn a_bridge_node_has_no_finite_payment() {
        // 0 - 1 - 2: node 1 is the only way from 0 to 2.
        let g = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let bids = vec![1.0, 1.0, 1.0];
        let covered = vec![1u8, 1, 1];
        let result = run(&g, 0, 2, &bids, &covered).unwrap();
        let bridge = result.payments.iter().find(|p| p.node == 1).unwrap();
        assert!(bridge.payment.is_none());
    }

    #[test]
    fn traversing_an_uncovered_node_costs_the_penalty() {
        let g = Graph::from_edges(2, &[(0, 1)]).unwrap();
        let bids = vec![0.0, 0.0];
        let secure = run(&g, 0, 1, &bids, &[1, 1]).unwrap();
        let insecure = run(&g, 0, 1, &bids, &[0, 1]).unwrap();
        assert!(insecure.winning_path.cost > secure.winning_path.cost);
    }

    #[test]
    fn disconnected_endpoints_yield_no_auction_result() {
        let g = Graph::from_edges(4, &[(0, 1), (2, 3)]).unwrap();
        let bids = vec![1.0; 4];
        assert!(run(&g, 0, 3, &bids, &[1, 1, 1, 1]).is_none());
    }
}
