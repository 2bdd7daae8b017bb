//! Export per-age wealth percentiles for a plan to CSV
//!
//! One row per simulated period, suitable for charting the fan of outcomes

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use wealth_projection::assumptions::loader::{load_mortality_table, DEFAULT_MORTALITY_TABLE_PATH};
use wealth_projection::{
    Assumptions, PlanReport, ScenarioRunner, SimulationContext, SimulationParameters,
};

#[derive(Debug, Parser)]
#[command(name = "export-trajectories")]
struct Cli {
    /// JSON file with plan parameters
    #[arg(long)]
    params: PathBuf,

    /// JSON file with glide path and counterfactual settings
    #[arg(long)]
    assumptions: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_MORTALITY_TABLE_PATH)]
    mortality: PathBuf,

    #[arg(long, default_value = "trajectories.csv")]
    output: PathBuf,
}

/// One output row per period
#[derive(Debug, Serialize)]
struct TrajectoryRow {
    period: usize,
    age: u32,
    year: i32,
    allocation: f64,
    contribution: f64,
    cumulative_survival: f64,
    mean: f64,
    p75: f64,
    p50: f64,
    p25: f64,
    p10: f64,
    p5: f64,
    p1: f64,
}

fn trajectory_rows(report: &PlanReport) -> Vec<TrajectoryRow> {
    let wealth = &report.wealth;
    report
        .timeline
        .ages
        .iter()
        .enumerate()
        .map(|(i, &age)| TrajectoryRow {
            period: i,
            age,
            year: report.timeline.calendar_years[i],
            allocation: report.allocations[i],
            contribution: report.contributions[i],
            // survival profile runs to the end of the table, past the horizon
            cumulative_survival: report.profile.cumulative_survival[i],
            mean: wealth.mean[i],
            p75: wealth.p75[i],
            p50: wealth.p50[i],
            p25: wealth.p25[i],
            p10: wealth.p10[i],
            p5: wealth.p5[i],
            p1: wealth.p1[i],
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let table = load_mortality_table(&cli.mortality)
        .with_context(|| format!("Failed to load mortality table {}", cli.mortality.display()))?;
    let params = SimulationParameters::from_json_path(&cli.params)
        .with_context(|| format!("Failed to load parameters from {}", cli.params.display()))?;
    let assumptions = match &cli.assumptions {
        Some(path) => Assumptions::from_json_path(path)
            .with_context(|| format!("Failed to load assumptions from {}", path.display()))?,
        None => Assumptions::default(),
    };

    let ctx = SimulationContext::new(&table, params).context("Invalid plan parameters")?;
    let report = ScenarioRunner::with_assumptions(assumptions)
        .run(&ctx)
        .context("Projection failed")?;

    let rows = trajectory_rows(&report);
    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Wrote {} periods to {}", rows.len(), cli.output.display());
    Ok(())
}
