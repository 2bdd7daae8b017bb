//! Wealth projection: per-run context, deterministic schedules and the wealth recurrence

mod context;
mod schedules;
mod engine;
mod growth;

pub use context::{HorizonSource, SimulationContext, Timeline};
pub use schedules::{
    build_allocations, build_contributions, total_planned_savings, AllocationSchedule,
    ContributionSchedule,
};
pub use engine::{project_wealth, WealthEngine};
pub use growth::{annualized_return_through, cumulative_growth_factors, geometric_return};
