//! Deterministic per-period schedules: net contributions and equity allocation
//!
//! Both schedules are indexed by period, where period `i` corresponds to age
//! `current_age + i` and runs through `final_age` inclusive.

/// Net cash flow per period (savings positive, spending negative, benefits positive)
pub type ContributionSchedule = Vec<f64>;

/// Equity fraction per period, within [terminal allocation, 1]
pub type AllocationSchedule = Vec<f64>;

fn num_periods(current_age: u32, final_age: u32) -> usize {
    final_age.checked_sub(current_age).map_or(0, |span| span as usize + 1)
}

/// Build the net contribution schedule
///
/// Before retirement the household saves `annual_savings`; from retirement on it spends
/// `annual_spending`. Social security is added from `social_security_age` on. Period 0 is
/// the starting point and carries no flow.
pub fn build_contributions(
    current_age: u32,
    retirement_age: u32,
    final_age: u32,
    annual_savings: f64,
    annual_spending: f64,
    social_security_age: u32,
    social_security_benefit: f64,
) -> ContributionSchedule {
    let mut contributions: Vec<f64> = (0..num_periods(current_age, final_age))
        .map(|i| {
            let age = current_age + i as u32;
            let base = if age < retirement_age {
                annual_savings
            } else {
                -annual_spending
            };
            let benefit = if age >= social_security_age {
                social_security_benefit
            } else {
                0.0
            };
            base + benefit
        })
        .collect();

    if let Some(first) = contributions.first_mut() {
        *first = 0.0;
    }
    contributions
}

/// Build the equity allocation schedule
///
/// Fully in equities until `glide_length` years before retirement, then a linear glide down
/// to `terminal_allocation`, which is held from retirement onward. A zero glide length
/// switches straight to the terminal allocation at retirement.
pub fn build_allocations(
    current_age: u32,
    retirement_age: u32,
    final_age: u32,
    terminal_allocation: f64,
    glide_length: u32,
) -> AllocationSchedule {
    let glide_start = i64::from(retirement_age) - i64::from(glide_length);
    let step = if glide_length > 0 {
        (1.0 - terminal_allocation) / f64::from(glide_length)
    } else {
        0.0
    };

    (0..num_periods(current_age, final_age))
        .map(|i| {
            let age = i64::from(current_age) + i as i64;
            if age >= i64::from(retirement_age) {
                terminal_allocation
            } else if age < glide_start {
                1.0
            } else {
                1.0 - step * (age - glide_start) as f64
            }
        })
        .collect()
}

/// Sum of all contributions made before retirement
pub fn total_planned_savings(contributions: &[f64], retirement_index: usize) -> f64 {
    contributions.iter().take(retirement_index).sum()
}
