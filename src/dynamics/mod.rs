//! The four learning dynamics (C4-C7). Each module exposes a single
//! `iterate` function with the shape `(&mut GameState, Option<&mut Vec<Update>>) -> bool`
//! — "any change this sweep" — which is the only thing the driver (C9) needs.

pub mod brd;
pub mod fictitious_play;
pub mod fictitious_play_async;
pub mod regret_matching;

use crate::eventlog::Update;
use crate::game::GameState;

/// Common shape of one dynamics sweep, so the driver can dispatch on
/// [`crate::game::Algorithm`] without matching on four different function
/// pointer types.
pub type Iterate = fn(&mut GameState, Option<&mut Vec<Update>>) -> bool;

pub fn iterator_for(algorithm: crate::game::Algorithm) -> Iterate {
    use crate::game::Algorithm::*;
    match algorithm {
        Brd => brd::iterate,
        Rm => regret_matching::iterate,
        Fp => fictitious_play::iterate,
        FpAsync => fictitious_play_async::iterate,
        Shapley => panic!("shapley is not a driver iterator, see crate::shapley"),
    }
}
