//! A game-theoretic minimal-vertex-cover engine: players sit on graph
//! vertices, pay a fixed cost to "secure" themselves or risk a penalty for
//! every insecure neighbour, and several learning dynamics drive the
//! population toward the fixed points of that game — which are exactly the
//! minimal vertex covers. See [`driver::run`] for the entry point that ties
//! a graph, an algorithm choice, and a dynamic together.

pub mod auction;
pub mod driver;
pub mod dynamics;
pub mod error;
pub mod eventlog;
pub mod game;
pub mod generators;
pub mod graph;
pub mod matching;
pub mod persistence;
pub mod shapley;
pub mod validators;

/// A spinner-style progress bar for long-running, non-interactive stages
/// (currently just the Shapley sampler). Ticks once per unit of work.
pub fn progress(n: usize) -> indicatif::ProgressBar {
    let style = "{spinner:.cyan} {elapsed} ~ {percent:>3}% {wide_bar:.cyan}";
    let style = indicatif::ProgressStyle::with_template(style).unwrap();
    let bar = indicatif::ProgressBar::new(n as u64);
    bar.set_style(style);
    bar
}
