//! Monte-Carlo Shapley approximation + greedy cover synthesis (C8).
//!
//! This is an alternative entry point to a finished strategy vector: it
//! never touches [`crate::game::GameState`] or the dynamics iterators, it
//! goes straight from a graph to a cover by ranking vertices with an
//! approximated cooperative-game value and then greedily discarding the
//! least valuable ones.

use crate::error::GameError;
use crate::graph::Graph;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Which characteristic function values a coalition. All three reward edge
/// coverage; they differ in how hard they push toward validity/minimality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    V1 = 1,
    V2 = 2,
    V3 = 3,
}

impl TryFrom<u64> for Variant {
    type Error = GameError;
    fn try_from(id: u64) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Variant::V1),
            2 => Ok(Variant::V2),
            3 => Ok(Variant::V3),
            other => Err(GameError::UnknownShapleyVariant(other)),
        }
    }
}

fn covered_edge_count(graph: &Graph, in_coalition: &[bool]) -> u64 {
    graph
        .edges()
        .filter(|&(u, v)| in_coalition[u as usize] || in_coalition[v as usize])
        .count() as u64
}

fn coalition_is_valid_cover(graph: &Graph, in_coalition: &[bool]) -> bool {
    for (u, v) in graph.edges() {
        if !in_coalition[u as usize] && !in_coalition[v as usize] {
            return false;
        }
    }
    true
}

fn coalition_is_minimal(graph: &Graph, in_coalition: &[bool]) -> bool {
    let n = graph.num_nodes();
    let mut has_private = vec![false; n as usize];
    for (u, v) in graph.edges() {
        let iu = in_coalition[u as usize];
        let iv = in_coalition[v as usize];
        if iu && !iv {
            has_private[u as usize] = true;
        } else if !iu && iv {
            has_private[v as usize] = true;
        }
    }
    (0..n as usize).all(|i| !in_coalition[i] || has_private[i])
}

/// Value of `in_coalition` (with `coalition_size` members set) under `variant`.
fn characteristic_value(graph: &Graph, in_coalition: &[bool], coalition_size: u64, variant: Variant) -> f64 {
    if coalition_size == 0 {
        return 0.0;
    }
    let covered = covered_edge_count(graph, in_coalition) as f64;
    match variant {
        Variant::V1 => {
            let mut value = covered / graph.num_edges() as f64 * 100.0;
            if coalition_is_valid_cover(graph, in_coalition) && !coalition_is_minimal(graph, in_coalition) {
                value -= 10.0;
            }
            value
        }
        Variant::V2 => {
            let mut value = covered;
            if coalition_is_valid_cover(graph, in_coalition) {
                value += 100.0;
                if coalition_is_minimal(graph, in_coalition) {
                    value += 50.0;
                }
            }
            value
        }
        Variant::V3 => {
            let mut value = covered - coalition_size as f64 * 0.5;
            if coalition_is_valid_cover(graph, in_coalition) {
                value += 50.0;
                if coalition_is_minimal(graph, in_coalition) {
                    value += 30.0;
                }
            }
            value
        }
    }
}

/// Approximates every vertex's Shapley value over `iterations` random
/// permutations. Each permutation contributes one marginal-contribution
/// sample per vertex; the average over all permutations is the estimate.
///
/// `rng` is threaded in explicitly rather than seeded internally, so a
/// caller can reproduce a run or share a PRNG across several calls.
pub fn compute_values(graph: &Graph, iterations: u64, variant: Variant, rng: &mut SmallRng) -> Vec<f64> {
    let n = graph.num_nodes();
    let mut totals = vec![0.0f64; n as usize];
    let mut permutation: Vec<u64> = (0..n).collect();
    let mut in_coalition = vec![false; n as usize];

    let bar = crate::progress(iterations as usize);
    for _ in 0..iterations {
        permutation.shuffle(rng);
        in_coalition.iter_mut().for_each(|b| *b = false);

        for (position, &node) in permutation.iter().enumerate() {
            let size_before = position as u64;
            let value_without = characteristic_value(graph, &in_coalition, size_before, variant);
            in_coalition[node as usize] = true;
            let value_with = characteristic_value(graph, &in_coalition, size_before + 1, variant);
            totals[node as usize] += value_with - value_without;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    for total in &mut totals {
        *total /= iterations as f64;
    }
    totals
}

/// Greedily discards vertices in ascending Shapley-value order, keeping a
/// removal only when every neighbour of the removed vertex stays covered by
/// someone else. Starts from the full vertex set.
pub fn reverse_delete(graph: &Graph, values: &[f64]) -> Vec<u8> {
    let n = graph.num_nodes();
    let mut order: Vec<u64> = (0..n).collect();
    order.sort_by(|&a, &b| values[a as usize].partial_cmp(&values[b as usize]).unwrap());

    let mut cover = vec![1u8; n as usize];
    for candidate in order {
        cover[candidate as usize] = 0;
        let still_covered = graph
            .neighbors(candidate)
            .iter()
            .all(|&neighbor| cover[neighbor as usize] != 0);
        if !still_covered {
            cover[candidate as usize] = 1;
        }
    }
    cover
}

/// Repeatedly drops any in-cover vertex with no private edge, until none
/// remain. The reverse-delete pass above can still leave such vertices
/// behind since it only ever checks local coverage at removal time.
pub fn polish_to_minimal(graph: &Graph, cover: &mut [u8]) {
    let n = graph.num_nodes();
    loop {
        let mut has_private = vec![false; n as usize];
        for (u, v) in graph.edges() {
            let su = cover[u as usize];
            let sv = cover[v as usize];
            if su == 1 && sv == 0 {
                has_private[u as usize] = true;
            } else if su == 0 && sv == 1 {
                has_private[v as usize] = true;
            }
        }
        let culprit = (0..n as usize).find(|&i| cover[i] == 1 && !has_private[i]);
        match culprit {
            Some(i) => cover[i] = 0,
            None => break,
        }
    }
}

/// Full C8 pipeline: approximate, rank, reverse-delete, polish.
pub fn synthesize(
    graph: &Graph,
    iterations: u64,
    variant: Variant,
    rng: &mut SmallRng,
) -> Vec<u8> {
    let values = compute_values(graph, iterations, variant, rng);
    let mut cover = reverse_delete(graph, &values);
    polish_to_minimal(graph, &mut cover);
    cover
}
