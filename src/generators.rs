//! Random graph generators (C11). Each family builds an intermediate
//! `petgraph::graph::UnGraph` — dedup and symmetry are trivial to check
//! with its own adjacency API — then lowers the result to the immutable
//! CSR [`Graph`] used everywhere else. No `petgraph` type crosses into the
//! dynamics hot loop.

use crate::error::GameError;
use crate::graph::Graph;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

fn edges_of(g: &UnGraph<(), ()>) -> Vec<(u64, u64)> {
    g.edge_references()
        .map(|e| (e.source().index() as u64, e.target().index() as u64))
        .collect()
}

/// Configuration-model random `degree`-regular graph via stub matching,
/// retrying the whole shuffle on a self-loop or repeated-pair collision.
pub fn random_regular(n: u64, degree: u64, rng: &mut SmallRng) -> Result<Graph, GameError> {
    if degree >= n {
        return Err(GameError::DegreeTooLarge { degree, n });
    }
    if (n * degree) % 2 != 0 {
        return Err(GameError::OddStubCount { n, degree });
    }

    loop {
        let mut stubs: Vec<u64> = (0..n).flat_map(|i| std::iter::repeat(i).take(degree as usize)).collect();
        stubs.shuffle(rng);

        let mut g: UnGraph<(), ()> = UnGraph::with_capacity(n as usize, stubs.len() / 2);
        let nodes: Vec<_> = (0..n).map(|_| g.add_node(())).collect();

        let mut collision = false;
        for pair in stubs.chunks(2) {
            let (u, v) = (pair[0], pair[1]);
            if u == v || g.contains_edge(nodes[u as usize], nodes[v as usize]) {
                collision = true;
                break;
            }
            g.add_edge(nodes[u as usize], nodes[v as usize], ());
        }

        if !collision {
            return Graph::from_edges(n, &edges_of(&g));
        }
    }
}

/// Erdős–Rényi `G(n, p)`: each unordered pair is an edge independently
/// with probability `p`.
pub fn erdos_renyi(n: u64, p: f64, rng: &mut SmallRng) -> Result<Graph, GameError> {
    if n == 0 {
        return Err(GameError::EmptyGraph);
    }
    let mut g: UnGraph<(), ()> = UnGraph::with_capacity(n as usize, 0);
    let nodes: Vec<_> = (0..n).map(|_| g.add_node(())).collect();

    for u in 0..n {
        for v in (u + 1)..n {
            if rng.random::<f64>() < p {
                g.add_edge(nodes[u as usize], nodes[v as usize], ());
            }
        }
    }
    Graph::from_edges(n, &edges_of(&g))
}

/// Barabási–Albert preferential attachment: start from a fully connected
/// seed clique of `m` vertices, then attach each new vertex to `m` existing
/// vertices sampled with probability proportional to current degree.
pub fn barabasi_albert(n: u64, m: u64, rng: &mut SmallRng) -> Result<Graph, GameError> {
    if m < 1 || m >= n {
        return Err(GameError::InvalidBarabasiAlbert { m, n });
    }

    let mut g: UnGraph<(), ()> = UnGraph::with_capacity(n as usize, 0);
    let nodes: Vec<_> = (0..n).map(|_| g.add_node(())).collect();

    for i in 0..m {
        for j in (i + 1)..m {
            g.add_edge(nodes[i as usize], nodes[j as usize], ());
        }
    }

    // Repeated-node list: each existing edge endpoint appears once per
    // incident edge, so a uniform draw from this list is degree-weighted.
    let mut targets: Vec<u64> = Vec::new();
    for i in 0..m {
        for _ in 0..g.edges(nodes[i as usize]).count() {
            targets.push(i);
        }
    }

    for new_node in m..n {
        let mut chosen: HashSet<u64> = HashSet::new();
        while chosen.len() < m as usize {
            let candidate = if targets.is_empty() {
                rng.random_range(0..new_node)
            } else {
                targets[rng.random_range(0..targets.len())]
            };
            chosen.insert(candidate);
        }
        for &t in &chosen {
            g.add_edge(nodes[new_node as usize], nodes[t as usize], ());
            targets.push(new_node);
            targets.push(t);
        }
    }

    Graph::from_edges(n, &edges_of(&g))
}
