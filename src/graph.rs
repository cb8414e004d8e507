//! Immutable compressed-sparse-row (CSR) graph storage.
//!
//! `Graph` is the sole read path into adjacency for every dynamics iterator
//! (C4-C8): two flat integer arrays, no owning pointer cycles, no per-edge
//! heap allocation. Builders (generators, loaders) are the only code allowed
//! to construct one; everything downstream treats it as read-only and may
//! freely alias it.

use crate::error::GameError;

/// Undirected, simple, static graph in CSR form.
///
/// Invariants (checked in [`Graph::from_edges`] and [`Graph::from_csr`]):
/// - `row_ptr` has length `n + 1`, is non-decreasing, `row_ptr[0] == 0`.
/// - `col_ind` has length `row_ptr[n]` (== `2 * num_edges`).
/// - every entry `v` in `col_ind[row_ptr[u]..row_ptr[u+1]]` has the reverse
///   entry `u` present in `col_ind[row_ptr[v]..row_ptr[v+1]]`.
/// - no self-loops, no duplicate neighbours within one adjacency list.
#[derive(Debug, Clone)]
pub struct Graph {
    row_ptr: Vec<u64>,
    col_ind: Vec<u64>,
    num_edges: u64,
}

impl Graph {
    /// Builds a graph from an undirected edge list, deduplicating and
    /// validating as it goes. `n` is the (fixed) node count; edges outside
    /// `0..n` are rejected.
    pub fn from_edges(n: u64, edges: &[(u64, u64)]) -> Result<Self, GameError> {
        if n == 0 {
            return Err(GameError::EmptyGraph);
        }
        let mut adjacency: Vec<Vec<u64>> = vec![Vec::new(); n as usize];
        for &(u, v) in edges {
            if u >= n || v >= n {
                return Err(GameError::MalformedGraphFile(format!(
                    "edge ({u}, {v}) out of range for n={n}"
                )));
            }
            if u == v {
                continue; // self-loops are silently dropped, matching the reference generators
            }
            if !adjacency[u as usize].contains(&v) {
                adjacency[u as usize].push(v);
                adjacency[v as usize].push(u);
            }
        }
        let mut row_ptr = Vec::with_capacity(n as usize + 1);
        let mut col_ind = Vec::new();
        row_ptr.push(0);
        for list in &mut adjacency {
            list.sort_unstable();
            col_ind.extend_from_slice(list);
            row_ptr.push(col_ind.len() as u64);
        }
        let num_edges = col_ind.len() as u64 / 2;
        Ok(Self { row_ptr, col_ind, num_edges })
    }

    /// Builds a graph directly from already-CSR-shaped arrays, e.g. when
    /// loading a binary dump. Validates every invariant in §3 of the spec.
    pub fn from_csr(row_ptr: Vec<u64>, col_ind: Vec<u64>) -> Result<Self, GameError> {
        if row_ptr.is_empty() {
            return Err(GameError::EmptyGraph);
        }
        let n = row_ptr.len() - 1;
        if row_ptr[0] != 0 {
            return Err(GameError::MalformedGraphFile("row_ptr[0] != 0".into()));
        }
        if row_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(GameError::MalformedGraphFile("row_ptr is not non-decreasing".into()));
        }
        let total = *row_ptr.last().unwrap();
        if total as usize != col_ind.len() {
            return Err(GameError::MalformedGraphFile(
                "row_ptr[n] does not match col_ind length".into(),
            ));
        }
        for u in 0..n {
            let start = row_ptr[u] as usize;
            let end = row_ptr[u + 1] as usize;
            for &v in &col_ind[start..end] {
                if v as usize == u {
                    return Err(GameError::MalformedGraphFile(format!("self-loop at {u}")));
                }
                if v as usize >= n {
                    return Err(GameError::MalformedGraphFile(format!(
                        "neighbour {v} out of range for n={n}"
                    )));
                }
                let rstart = row_ptr[v as usize] as usize;
                let rend = row_ptr[v as usize + 1] as usize;
                if !col_ind[rstart..rend].contains(&(u as u64)) {
                    return Err(GameError::MalformedGraphFile(format!(
                        "asymmetric edge: {u} lists {v} but not vice versa"
                    )));
                }
            }
        }
        let num_edges = col_ind.len() as u64 / 2;
        Ok(Self { row_ptr, col_ind, num_edges })
    }

    pub fn num_nodes(&self) -> u64 {
        self.row_ptr.len() as u64 - 1
    }

    pub fn num_edges(&self) -> u64 {
        self.num_edges
    }

    /// Neighbours of `u` in ascending order. Panics if `u >= num_nodes()`,
    /// matching the teacher's convention of trusting internal callers and
    /// validating only at the public boundary.
    pub fn neighbors(&self, u: u64) -> &[u64] {
        let start = self.row_ptr[u as usize] as usize;
        let end = self.row_ptr[u as usize + 1] as usize;
        &self.col_ind[start..end]
    }

    pub fn degree(&self, u: u64) -> u64 {
        self.neighbors(u).len() as u64
    }

    pub fn row_ptr(&self) -> &[u64] {
        &self.row_ptr
    }

    pub fn col_ind(&self) -> &[u64] {
        &self.col_ind
    }

    /// Iterates each undirected edge exactly once, in `u < v` order.
    pub fn edges(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        (0..self.num_nodes()).flat_map(move |u| {
            self.neighbors(u)
                .iter()
                .filter(move |&&v| u < v)
                .map(move |&v| (u, v))
        })
    }
}
