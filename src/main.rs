//! Wealth Projection CLI
//!
//! Runs a baseline plan and its counterfactuals, printing milestone and scenario tables

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use wealth_projection::assumptions::loader::{
    load_historical_returns, load_mortality_table, DEFAULT_BOND_COLUMN, DEFAULT_EQUITY_COLUMN,
    DEFAULT_MORTALITY_TABLE_PATH,
};
use wealth_projection::{
    Assumptions, CounterfactualFamily, PlanReport, ReturnModel, ScenarioRunner,
    SimulationContext, SimulationParameters, Statistic,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    RandomWalk,
    Contiguous,
    Windowed,
}

/// Monte Carlo retirement wealth projection
#[derive(Debug, Parser)]
#[command(name = "wealth-projection")]
struct Cli {
    /// JSON file with plan parameters; overrides the individual plan flags
    #[arg(long)]
    params: Option<PathBuf>,

    /// JSON file with glide path and counterfactual settings
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// Mortality table CSV
    #[arg(long, default_value = DEFAULT_MORTALITY_TABLE_PATH)]
    mortality: PathBuf,

    #[arg(long, default_value_t = 39)]
    current_age: u32,

    #[arg(long, default_value_t = 46)]
    retirement_age: u32,

    #[arg(long, default_value_t = 1_100_000.0)]
    wealth: f64,

    #[arg(long, default_value_t = 105_000.0)]
    savings: f64,

    #[arg(long, default_value_t = 70_000.0)]
    spending: f64,

    #[arg(long, default_value_t = 67)]
    social_security_age: u32,

    #[arg(long, default_value_t = 0.0)]
    social_security_benefit: f64,

    #[arg(long, default_value_t = 10_000)]
    paths: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Return model
    #[arg(long, value_enum, default_value_t = ModelArg::RandomWalk)]
    model: ModelArg,

    /// Block length for the windowed historical model
    #[arg(long, default_value_t = 10)]
    window_length: usize,

    /// Historical annual returns CSV (required by the historical models)
    #[arg(long)]
    history: Option<PathBuf>,

    /// Print the full report as JSON instead of tables
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn parameters(&self) -> Result<SimulationParameters> {
        let mut params = match &self.params {
            Some(path) => SimulationParameters::from_json_path(path)
                .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
            None => SimulationParameters::new(
                self.current_age,
                self.retirement_age,
                self.wealth,
                self.savings,
                self.spending,
            )
            .with_social_security(self.social_security_age, self.social_security_benefit)
            .with_paths(self.paths)
            .with_seed(self.seed),
        };

        // A parameter file carries its own return model
        if self.params.is_none() {
            params.market.model = match self.model {
                ModelArg::RandomWalk => ReturnModel::RandomWalk,
                ModelArg::Contiguous => ReturnModel::HistoricalContiguous,
                ModelArg::Windowed => ReturnModel::HistoricalWindowed {
                    window_length: self.window_length,
                },
            };
        }
        Ok(params)
    }
}

fn money(value: f64) -> String {
    format!("${:.0}", value)
}

fn print_report(report: &PlanReport) {
    let profile = &report.profile;
    let timeline = &report.timeline;

    println!("Survival outlook from age {}:", profile.current_age);
    println!("  Expected age at death: {}", profile.expected_age_at_death);
    for (label, age) in [
        ("25%", profile.age_at_25_pct),
        ("10%", profile.age_at_10_pct),
        ("5%", profile.age_at_5_pct),
        ("1%", profile.age_at_1_pct),
    ] {
        match age {
            Some(age) => println!("  {:>3} still alive at age {}", label, age),
            None => println!("  {:>3} survival not reached in table", label),
        }
    }
    println!(
        "  Planning horizon: age {} ({}-{}, {:?})",
        timeline.horizon_age(),
        timeline.calendar_years[0],
        timeline.calendar_years[timeline.final_index],
        report.horizon_source
    );
    println!("  Total planned savings: {}", money(report.total_planned_savings));
    println!();

    println!(
        "{:>6} {:>16} {:>9} {:>16} {:>9} {:>14} {:>22}",
        "Stat", "At Retirement", "Return", "At End", "Return", "Forever Inc", "Outlook"
    );
    println!("{}", "-".repeat(98));
    for (stat, record) in report.milestones.iter() {
        let pct = |r: Option<f64>| r.map_or("-".to_string(), |v| format!("{:.2}%", v * 100.0));
        println!(
            "{:>6} {:>16} {:>9} {:>16} {:>9} {:>14} {:>22}",
            stat.label(),
            money(record.wealth_at_retirement),
            pct(record.return_to_retirement),
            money(record.wealth_at_end),
            pct(record.return_to_end),
            money(*report.forever_income.get(stat)),
            record.outlook.describe(),
        );
    }

    for family in CounterfactualFamily::ALL {
        println!();
        println!("Counterfactual: {}", family.label());
        println!(
            "{:>8} {:>16} {:>16} {:>16} {:>10} {:>10}",
            "Level", "p50 Retirement", "p50 End", "p50 Forever", "p50 Runs", "p10 Runs"
        );
        println!("{}", "-".repeat(81));
        let runs_out = |age: Option<u32>| age.map_or("never".to_string(), |a| a.to_string());
        for row in report.scenarios_for(family) {
            let level = match family {
                CounterfactualFamily::DelayRetirement => format!("+{}y", row.level),
                CounterfactualFamily::IncreaseSavings => format!("+{}", money(row.level)),
                CounterfactualFamily::ReduceSpending => format!("-{}", money(row.level)),
            };
            println!(
                "{:>8} {:>16} {:>16} {:>16} {:>10} {:>10}",
                level,
                money(*row.wealth_at_retirement.get(Statistic::P50)),
                money(*row.wealth_at_end.get(Statistic::P50)),
                money(*row.forever_income.get(Statistic::P50)),
                runs_out(*row.depletion_age.get(Statistic::P50)),
                runs_out(*row.depletion_age.get(Statistic::P10)),
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let table = load_mortality_table(&cli.mortality)
        .with_context(|| format!("Failed to load mortality table {}", cli.mortality.display()))?;

    let assumptions = match &cli.assumptions {
        Some(path) => Assumptions::from_json_path(path)
            .with_context(|| format!("Failed to load assumptions from {}", path.display()))?,
        None => Assumptions::default(),
    };

    let mut runner = ScenarioRunner::with_assumptions(assumptions);
    if let Some(path) = &cli.history {
        let history = load_historical_returns(path, DEFAULT_EQUITY_COLUMN, DEFAULT_BOND_COLUMN)
            .with_context(|| format!("Failed to load return history {}", path.display()))?;
        runner = runner.with_history(history);
    }

    let params = cli.parameters()?;
    let ctx = SimulationContext::new(&table, params).context("Invalid plan parameters")?;
    let report = runner.run(&ctx).context("Projection failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}
