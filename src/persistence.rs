//! Graph persistence (C12): little-endian binary dumps (load and save) and
//! a load-only whitespace-separated text format for feeding in graphs built
//! by external tools.

use crate::error::GameError;
use crate::graph::Graph;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Writes `n`, `m`, the `n+1` row-pointer words, then the `2m` neighbour
/// words, all as little-endian `u64`.
pub fn save_binary<W: Write>(graph: &Graph, mut out: W) -> Result<(), GameError> {
    out.write_u64::<LittleEndian>(graph.num_nodes())?;
    out.write_u64::<LittleEndian>(graph.num_edges())?;
    for &word in graph.row_ptr() {
        out.write_u64::<LittleEndian>(word)?;
    }
    for &word in graph.col_ind() {
        out.write_u64::<LittleEndian>(word)?;
    }
    Ok(())
}

/// Inverse of [`save_binary`]. Rejects a header whose `row_ptr`/`col_ind`
/// lengths don't match the declared `n`/`m`, and anything [`Graph::from_csr`]
/// itself would reject.
pub fn load_binary<R: Read>(mut input: R) -> Result<Graph, GameError> {
    let n = input.read_u64::<LittleEndian>()?;
    let m = input.read_u64::<LittleEndian>()?;
    if n == 0 {
        return Err(GameError::EmptyGraph);
    }

    let mut row_ptr = Vec::with_capacity(n as usize + 1);
    for _ in 0..=n {
        row_ptr.push(input.read_u64::<LittleEndian>()?);
    }

    let mut col_ind = Vec::with_capacity(2 * m as usize);
    for _ in 0..(2 * m) {
        col_ind.push(input.read_u64::<LittleEndian>()?);
    }

    Graph::from_csr(row_ptr, col_ind)
}

/// Reads a text graph: first whitespace-separated token is `n`, then `u v`
/// pairs until EOF, each one undirected edge.
pub fn load_text<R: Read>(mut input: R) -> Result<Graph, GameError> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .map_err(|e| GameError::MalformedGraphFile(e.to_string()))?;

    let mut tokens = text.split_ascii_whitespace();
    let n: u64 = tokens
        .next()
        .ok_or_else(|| GameError::MalformedGraphFile("missing node count".into()))?
        .parse()
        .map_err(|_| GameError::MalformedGraphFile("node count is not an integer".into()))?;

    let mut edges = Vec::new();
    loop {
        let u = match tokens.next() {
            None => break,
            Some(tok) => tok
                .parse::<u64>()
                .map_err(|_| GameError::MalformedGraphFile(format!("expected an integer, got {tok:?}")))?,
        };
        let v: u64 = tokens
            .next()
            .ok_or_else(|| GameError::MalformedGraphFile("dangling edge endpoint with no pair".into()))?
            .parse()
            .map_err(|_| GameError::MalformedGraphFile("edge endpoint is not an integer".into()))?;
        edges.push((u, v));
    }

    Graph::from_edges(n, &edges)
}
