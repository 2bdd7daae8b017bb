//! Market return simulation: random walk (default) and historical block bootstrap
//!
//! All randomness flows through an explicitly passed, seedable generator so a run's
//! ensemble can be regenerated exactly and shared across scenario comparisons.

mod random_walk;
mod historical;
mod ensemble;

pub use random_walk::{constant_returns, simulate_random_walk};
pub use historical::{sample_contiguous, sample_windowed, wrapped_indices, HistoricalReturns};
pub use ensemble::{generate_ensemble, ReturnEnsemble, SampledYears};

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Generator used for all market simulation
pub type SimulationRng = Pcg64Mcg;

/// Deterministic generator for a run seed
pub fn seeded_rng(seed: u64) -> SimulationRng {
    Pcg64Mcg::seed_from_u64(seed)
}
