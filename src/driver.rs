//! Simulation driver (C9): turns an intrinsically oscillating dynamic into
//! a terminating algorithm via a no-change streak and, for the fictitious
//! play variants, periodic random restart.

use crate::eventlog::{EventLog, Update};
use crate::game::{Algorithm, GameState, RESTART_INTERVAL, STREAK_THRESHOLD};
use std::io::Write;

fn algorithm_name(algorithm: Algorithm) -> &'static str {
    match algorithm {
        Algorithm::Brd => "BRD",
        Algorithm::Rm => "RM",
        Algorithm::Fp => "FP",
        Algorithm::FpAsync => "FP_ASYNC",
        Algorithm::Shapley => "SHAPLEY",
    }
}

/// Runs `algorithm` on `game` until a no-change streak of [`STREAK_THRESHOLD`]
/// iterations is observed, or `max_it` iterations have elapsed.
///
/// Returns `Some(iteration)` on convergence, `None` if `max_it` was
/// exhausted first. Non-convergence is not an error: the final strategy
/// profile is still valid for inspection.
pub fn run(game: &mut GameState, algorithm: Algorithm, max_it: u64, verbose: bool) -> Option<u64> {
    run_logged::<std::io::Sink>(game, algorithm, max_it, verbose, None)
}

/// Same as [`run`], but mirrors every iteration's updates into an event log.
pub fn run_logged<W: Write>(
    game: &mut GameState,
    algorithm: Algorithm,
    max_it: u64,
    verbose: bool,
    mut log: Option<&mut EventLog<W>>,
) -> Option<u64> {
    game.begin(algorithm);
    let iterate = crate::dynamics::iterator_for(algorithm);
    let restarts = matches!(algorithm, Algorithm::Fp | Algorithm::FpAsync);

    let mut iteration: u64 = 0;
    let mut no_change_streak: u64 = 0;
    let mut last_restart_it: u64 = 0;

    while iteration < max_it {
        if restarts && iteration.saturating_sub(last_restart_it) >= RESTART_INTERVAL {
            if verbose {
                log::info!("iteration {iteration}: random restart triggered");
            }
            game.restart_fictitious_play();
            last_restart_it = iteration;
            no_change_streak = 0;
        }

        if verbose && iteration % 100 == 0 {
            log::debug!("iteration {iteration}");
        }

        let mut updates: Vec<Update> = Vec::new();
        let changed = iterate(game, log.is_some().then_some(&mut updates));

        if let Some(log) = log.as_deref_mut() {
            if let Err(e) = log.log_step(iteration, algorithm_name(algorithm), &updates) {
                log::warn!("event log write failed: {e}");
            }
        }

        if changed {
            no_change_streak = 0;
        } else {
            no_change_streak += 1;
        }

        if no_change_streak >= STREAK_THRESHOLD {
            if verbose {
                log::info!("convergence reached at iteration {iteration}");
            }
            return Some(iteration);
        }

        iteration += 1;
    }

    None
}
