//! Command-line front end (C14): generate or load a graph, solve it with a
//! learning dynamic or the Shapley synthesizer, validate the result, and
//! optionally run the downstream matching market and VCG auction.

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;
use vertex_cover_games::driver;
use vertex_cover_games::error::GameError;
use vertex_cover_games::eventlog::EventLog;
use vertex_cover_games::game::{Algorithm, GameState};
use vertex_cover_games::generators;
use vertex_cover_games::persistence;
use vertex_cover_games::shapley::{self, Variant};
use vertex_cover_games::validators::{is_minimal, is_valid_cover};
use vertex_cover_games::{auction, matching};

#[derive(Parser, Debug)]
#[command(author, version, about = "Minimal vertex cover via game dynamics", long_about = None)]
struct Cli {
    /// Node count for a generated graph.
    #[arg(short = 'n', default_value_t = 10_000)]
    nodes: u64,

    /// Degree (regular), average degree (Erdős–Rényi), or `m` (Barabási–Albert).
    #[arg(short = 'k', default_value_t = 4)]
    k_param: u64,

    /// Graph family: 0 = regular, 1 = Erdős–Rényi, 2 = Barabási–Albert.
    #[arg(short = 't', default_value_t = 0)]
    graph_type: u8,

    /// Maximum driver iterations (or Monte-Carlo samples, for Shapley).
    #[arg(short = 'i', default_value_t = 100_000)]
    max_it: u64,

    /// Algorithm: 1=BRD, 2=RM, 3=FP, 4=Shapley, 5=async FP.
    #[arg(short = 'a', default_value_t = 3)]
    algorithm: u64,

    /// Shapley characteristic function variant: 1, 2, or 3.
    #[arg(short = 'v', default_value_t = 3)]
    shapley_variant: u64,

    /// Matching-market capacity mode: 0=infinite, 1=limited, 2=both.
    #[arg(short = 'c', default_value_t = 0)]
    capacity_mode: u8,

    /// Load a graph from this binary dump instead of generating one.
    #[arg(short = 'f')]
    file: Option<String>,

    /// Seed for every PRNG used in this run.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Enable the line-delimited JSON event log at this path.
    #[arg(long)]
    log: Option<String>,
}

/// Mirrors each match produced by a matching-market run into the event log,
/// resolving the matched buyer's budget and the matched vendor's price back
/// out to log the same `(buyer, vendor, price, utility)` tuple the original
/// tool's `LOG_P3_MATCH` emitted.
fn log_matches(
    log_file: Option<&mut BufWriter<File>>,
    buyers: &[u64],
    budgets: &[i64],
    vendors: &[matching::Vendor],
    result: &matching::MatchResult,
) {
    let Some(sink) = log_file else { return };
    let mut event_log = EventLog::new(sink);
    for m in &result.matches {
        let Some(idx) = buyers.iter().position(|&b| b == m.buyer) else { continue };
        let vendor = &vendors[m.vendor as usize];
        let utility = (budgets[idx] - vendor.price) as f64 + vendor.quality as f64 * 10.0;
        if let Err(e) = event_log.log_match(m.buyer, m.vendor, vendor.price, utility) {
            log::warn!("event log write failed: {e}");
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = SmallRng::seed_from_u64(cli.seed);

    let algorithm = Algorithm::try_from(cli.algorithm).map_err(|e: GameError| anyhow::anyhow!("bad -a value: {e}"))?;

    let graph = match &cli.file {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening graph file {path}"))?;
            persistence::load_binary(file).map_err(|e| anyhow::anyhow!("loading graph from {path}: {e}"))?
        }
        None => {
            log::info!("generating graph type {} with {} nodes and param {}", cli.graph_type, cli.nodes, cli.k_param);
            match cli.graph_type {
                0 => generators::random_regular(cli.nodes, cli.k_param, &mut rng)
                    .map_err(|e| anyhow::anyhow!("generating regular graph: {e}"))?,
                1 => {
                    let p = cli.k_param as f64 / (cli.nodes.saturating_sub(1)) as f64;
                    generators::erdos_renyi(cli.nodes, p, &mut rng)
                        .map_err(|e| anyhow::anyhow!("generating Erdős–Rényi graph: {e}"))?
                }
                2 => generators::barabasi_albert(cli.nodes, cli.k_param, &mut rng)
                    .map_err(|e| anyhow::anyhow!("generating Barabási–Albert graph: {e}"))?,
                other => bail!("invalid graph type {other}, expected 0, 1, or 2"),
            }
        }
    };

    if cli.file.is_none() {
        let out = File::create("graph_dump.bin").context("saving generated graph")?;
        persistence::save_binary(&graph, out).map_err(|e| anyhow::anyhow!("saving graph: {e}"))?;
    }

    let mut log_file = match &cli.log {
        Some(path) => Some(BufWriter::new(File::create(path).with_context(|| format!("opening log file {path}"))?)),
        None => None,
    };

    let strategies: Vec<u8> = if algorithm == Algorithm::Shapley {
        let variant = Variant::try_from(cli.shapley_variant).map_err(|e| anyhow::anyhow!("bad -v value: {e}"))?;
        log::info!("running Shapley synthesis, variant {}, {} samples", cli.shapley_variant, cli.max_it);
        shapley::synthesize(&graph, cli.max_it, variant, &mut rng)
    } else {
        let mut game = GameState::new(&graph, cli.seed);
        let converged = match log_file.as_mut() {
            Some(sink) => {
                let mut event_log = EventLog::new(sink);
                driver::run_logged(&mut game, algorithm, cli.max_it, true, Some(&mut event_log))
            }
            None => driver::run(&mut game, algorithm, cli.max_it, true),
        };
        log::info!("converged: {}", converged.is_some());
        game.strategies().to_vec()
    };

    let valid = is_valid_cover(&graph, &strategies);
    let minimal = is_minimal(&graph, &strategies);
    let active = strategies.iter().filter(|&&s| s == 1).count();

    println!("Cover size: {} / {} ({:.2}%)", active, graph.num_nodes(), active as f64 / graph.num_nodes() as f64 * 100.0);
    println!("Valid cover: {}", if valid { "YES" } else { "NO" });
    println!("Minimal: {}", if minimal { "YES" } else { "NO" });

    let buyers: Vec<u64> = (0..graph.num_nodes()).filter(|&i| strategies[i as usize] == 1).collect();
    let budgets: Vec<i64> = buyers.iter().map(|_| rng.random_range(1..=100)).collect();

    if matches!(cli.capacity_mode, 0 | 2) {
        let vendors = matching::build_vendor_pool(buyers.len() as u64, 0, &mut rng);
        let result = matching::run(&buyers, &budgets, &vendors);
        println!("Matching (infinite capacity): {} / {} matched, welfare {:.2}", result.total_flow, buyers.len(), result.social_welfare);
        log_matches(log_file.as_mut(), &buyers, &budgets, &vendors, &result);
    }
    if matches!(cli.capacity_mode, 1 | 2) {
        let vendors = matching::build_vendor_pool(buyers.len() as u64, 1, &mut rng);
        let result = matching::run(&buyers, &budgets, &vendors);
        println!("Matching (limited capacity): {} / {} matched, welfare {:.2}", result.total_flow, buyers.len(), result.social_welfare);
        log_matches(log_file.as_mut(), &buyers, &budgets, &vendors, &result);
    }

    if graph.num_nodes() >= 2 {
        let bids: Vec<f64> = (0..graph.num_nodes()).map(|_| rng.random_range(10..=100) as f64).collect();
        let s = rng.random_range(0..graph.num_nodes());
        let mut t = s;
        while t == s {
            t = rng.random_range(0..graph.num_nodes());
        }
        match auction::run(&graph, s, t, &bids, &strategies) {
            Some(result) => {
                println!("VCG auction {s} -> {t}: winning cost {:.2}, {} payments computed", result.winning_path.cost, result.payments.len());
                if let Some(sink) = log_file.as_mut() {
                    let mut event_log = EventLog::new(sink);
                    for payment in &result.payments {
                        let Some(pay) = payment.payment else { continue };
                        if let Err(e) = event_log.log_vcg_payment(payment.node, payment.bid, pay) {
                            log::warn!("event log write failed: {e}");
                        }
                    }
                }
            }
            None => println!("VCG auction {s} -> {t}: no path exists"),
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
