//! Counter policy applied whenever a creature comes into existence.

use rand::Rng;
use wator_core::{Countdown, Predator, PredatorParams, Prey, PreyParams, SpawnPhase};

/// Winds a countdown for a newly created creature.
///
/// [`SpawnPhase::Discrete`] starts at the full cycle. [`SpawnPhase::Stochastic`]
/// draws the starting counter uniformly from `1..=cycle`; a zero cycle has no
/// such range and starts due.
pub fn countdown<R: Rng + ?Sized>(cycle: u32, phase: SpawnPhase, rng: &mut R) -> Countdown {
    match phase {
        SpawnPhase::Discrete => Countdown::full(cycle),
        SpawnPhase::Stochastic if cycle == 0 => Countdown::full(0),
        SpawnPhase::Stochastic => Countdown::with_remaining(cycle, rng.gen_range(1..=cycle)),
    }
}

/// Creates a prey whose counters follow the provided phase policy.
pub fn prey<R: Rng + ?Sized>(params: PreyParams, phase: SpawnPhase, rng: &mut R) -> Prey {
    Prey {
        reproduce: countdown(params.reproduce_cycle, phase, rng),
    }
}

/// Creates a predator whose counters follow the provided phase policy.
///
/// The reproduction counter is drawn before the starvation counter.
pub fn predator<R: Rng + ?Sized>(
    params: PredatorParams,
    phase: SpawnPhase,
    rng: &mut R,
) -> Predator {
    let reproduce = countdown(params.reproduce_cycle, phase, rng);
    let starve = countdown(params.starve_cycle, phase, rng);
    Predator { reproduce, starve }
}
