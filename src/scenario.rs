//! Scenario runner for baseline and counterfactual plan projections
//!
//! Generates one return ensemble per run, then projects the baseline plan and every
//! counterfactual level (more savings, later retirement, less spending) against that same
//! ensemble so differences come from the plan and not from the draws.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::{Assumptions, SurvivalProfile};
use crate::error::{ProjectionError, ProjectionResult};
use crate::market::{generate_ensemble, seeded_rng, HistoricalReturns, ReturnEnsemble};
use crate::projection::{
    build_allocations, build_contributions, cumulative_growth_factors, total_planned_savings,
    HorizonSource, SimulationContext, Timeline, WealthEngine,
};
use crate::summary::{
    forever_income, milestone_stats, summarize, ByStatistic, DistributionSummary, MilestoneRecord,
};

/// Default perpetual withdrawal rate for the forever-income estimate
pub const DEFAULT_WITHDRAWAL_RATE: f64 = 0.04;

fn default_savings_increments() -> Vec<f64> {
    vec![5_000.0, 10_000.0, 15_000.0, 20_000.0]
}

fn default_retirement_delays() -> Vec<u32> {
    vec![1, 2, 3, 4]
}

fn default_spending_reductions() -> Vec<f64> {
    vec![5_000.0, 10_000.0, 15_000.0, 20_000.0]
}

fn default_withdrawal_rate() -> f64 {
    DEFAULT_WITHDRAWAL_RATE
}

/// Levels explored by each counterfactual family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterfactualConfig {
    /// Added to annual savings
    #[serde(default = "default_savings_increments")]
    pub savings_increments: Vec<f64>,

    /// Years added to the retirement age
    #[serde(default = "default_retirement_delays")]
    pub retirement_delays: Vec<u32>,

    /// Subtracted from annual spending (floored at zero spending)
    #[serde(default = "default_spending_reductions")]
    pub spending_reductions: Vec<f64>,

    #[serde(default = "default_withdrawal_rate")]
    pub withdrawal_rate: f64,
}

impl Default for CounterfactualConfig {
    fn default() -> Self {
        Self {
            savings_increments: default_savings_increments(),
            retirement_delays: default_retirement_delays(),
            spending_reductions: default_spending_reductions(),
            withdrawal_rate: default_withdrawal_rate(),
        }
    }
}

impl CounterfactualConfig {
    pub fn validate(&self) -> ProjectionResult<()> {
        let amounts = self
            .savings_increments
            .iter()
            .map(|v| ("savings_increments", *v))
            .chain(self.spending_reductions.iter().map(|v| ("spending_reductions", *v)));
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ProjectionError::invalid_parameter(
                    name,
                    format!("levels must be finite amounts >= 0, got {}", value),
                ));
            }
        }

        if !(self.withdrawal_rate > 0.0 && self.withdrawal_rate <= 1.0) {
            return Err(ProjectionError::invalid_parameter(
                "withdrawal_rate",
                format!("must lie in (0, 1], got {}", self.withdrawal_rate),
            ));
        }
        Ok(())
    }

    fn levels(&self, family: CounterfactualFamily) -> Vec<f64> {
        match family {
            CounterfactualFamily::IncreaseSavings => self.savings_increments.clone(),
            CounterfactualFamily::DelayRetirement => {
                self.retirement_delays.iter().map(|d| f64::from(*d)).collect()
            }
            CounterfactualFamily::ReduceSpending => self.spending_reductions.clone(),
        }
    }
}

/// Which single parameter a counterfactual changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterfactualFamily {
    IncreaseSavings,
    DelayRetirement,
    ReduceSpending,
}

impl CounterfactualFamily {
    pub const ALL: [CounterfactualFamily; 3] = [
        CounterfactualFamily::IncreaseSavings,
        CounterfactualFamily::DelayRetirement,
        CounterfactualFamily::ReduceSpending,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CounterfactualFamily::IncreaseSavings => "save more",
            CounterfactualFamily::DelayRetirement => "retire later",
            CounterfactualFamily::ReduceSpending => "spend less",
        }
    }
}

/// Result of one counterfactual level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub family: CounterfactualFamily,

    /// Dollars for savings and spending, years for retirement
    pub level: f64,

    pub retirement_age: u32,
    pub annual_savings: f64,
    pub annual_spending: f64,
    pub wealth_at_retirement: ByStatistic<f64>,
    pub wealth_at_end: ByStatistic<f64>,
    pub forever_income: ByStatistic<f64>,
    pub depletion_age: ByStatistic<Option<u32>>,
}

/// Everything produced by one run: baseline projection plus counterfactual table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub profile: SurvivalProfile,
    pub horizon_source: HorizonSource,
    pub timeline: Timeline,
    pub allocations: Vec<f64>,
    pub contributions: Vec<f64>,
    pub total_planned_savings: f64,

    /// Per-period wealth distribution
    pub wealth: DistributionSummary,

    /// Per-period distribution of cumulative equity growth, starting at period 1
    pub growth: DistributionSummary,

    pub milestones: ByStatistic<MilestoneRecord>,
    pub forever_income: ByStatistic<f64>,
    pub scenarios: Vec<ScenarioRow>,
}

impl PlanReport {
    /// Counterfactual rows for one family, in level order
    pub fn scenarios_for(&self, family: CounterfactualFamily) -> impl Iterator<Item = &ScenarioRow> {
        self.scenarios.iter().filter(move |row| row.family == family)
    }
}

/// Plan inputs a counterfactual may change
#[derive(Debug, Clone, Copy)]
struct PlanVariant {
    retirement_age: u32,
    annual_savings: f64,
    annual_spending: f64,
}

/// Wealth summary and milestones of one projected plan
struct PlanOutcome {
    wealth: DistributionSummary,
    milestones: ByStatistic<MilestoneRecord>,
}

/// Runs baseline and counterfactual projections for a household
///
/// # Example
/// ```ignore
/// let table = load_default_mortality_table()?;
/// let ctx = SimulationContext::new(&table, params)?;
/// let report = ScenarioRunner::new().run(&ctx)?;
/// println!("median wealth at retirement: {}", report.milestones.p50.wealth_at_retirement);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    base_assumptions: Assumptions,

    /// Annual return history, required by the historical return models
    history: Option<HistoricalReturns>,
}

impl ScenarioRunner {
    /// Runner with default assumptions and no return history
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
            history: None,
        }
    }

    pub fn with_history(mut self, history: HistoricalReturns) -> Self {
        self.history = Some(history);
        self
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.base_assumptions
    }

    pub fn history(&self) -> Option<&HistoricalReturns> {
        self.history.as_ref()
    }

    /// Draw the return ensemble for a run from the parameters' seed
    pub fn generate_ensemble(&self, ctx: &SimulationContext) -> ProjectionResult<ReturnEnsemble> {
        let params = ctx.params();
        let mut rng = seeded_rng(params.seed);
        generate_ensemble(
            &mut rng,
            &params.market,
            self.history.as_ref(),
            ctx.num_periods(),
            params.num_paths,
        )
    }

    /// Generate the ensemble, then project baseline and counterfactuals against it
    pub fn run(&self, ctx: &SimulationContext) -> ProjectionResult<PlanReport> {
        let ensemble = self.generate_ensemble(ctx)?;
        self.run_with_ensemble(ctx, &ensemble)
    }

    /// Project baseline and counterfactuals against a supplied ensemble
    pub fn run_with_ensemble(
        &self,
        ctx: &SimulationContext,
        ensemble: &ReturnEnsemble,
    ) -> ProjectionResult<PlanReport> {
        self.base_assumptions.validate()?;

        let params = ctx.params();
        let timeline = ctx.timeline();
        let expected = (params.num_paths, timeline.num_periods());
        if ensemble.shape() != expected {
            return Err(ProjectionError::ShapeMismatch {
                what: "return ensemble",
                expected,
                found: ensemble.shape(),
            });
        }

        let glide = &self.base_assumptions.glide;
        let allocations = build_allocations(
            timeline.current_age(),
            timeline.retirement_age(),
            timeline.horizon_age(),
            glide.terminal_allocation,
            glide.glide_length,
        );

        let baseline = PlanVariant {
            retirement_age: params.retirement_age,
            annual_savings: params.annual_savings,
            annual_spending: params.annual_spending,
        };
        let contributions = self.contributions(ctx, baseline);

        let engine = WealthEngine::new(ensemble);
        let growth = summarize(&cumulative_growth_factors(ensemble.equity()));
        let outcome = self.evaluate(ctx, &engine, &growth, timeline, &allocations, &contributions);

        let counterfactuals = &self.base_assumptions.counterfactuals;
        let scenarios: Vec<ScenarioRow> = CounterfactualFamily::ALL
            .par_iter()
            .map(|family| self.counterfactual_rows(*family, ctx, &engine, &growth, &allocations))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        log::info!(
            "Projected baseline and {} counterfactual plans over {} paths x {} periods",
            scenarios.len(),
            ensemble.paths(),
            ensemble.periods()
        );

        Ok(PlanReport {
            profile: ctx.profile().clone(),
            horizon_source: ctx.horizon_source(),
            timeline: timeline.clone(),
            total_planned_savings: total_planned_savings(&contributions, timeline.retirement_index),
            allocations,
            contributions,
            wealth: outcome.wealth,
            growth,
            forever_income: forever_income(&outcome.milestones, counterfactuals.withdrawal_rate),
            milestones: outcome.milestones,
            scenarios,
        })
    }

    fn contributions(&self, ctx: &SimulationContext, plan: PlanVariant) -> Vec<f64> {
        let params = ctx.params();
        build_contributions(
            params.current_age,
            plan.retirement_age,
            ctx.horizon_age(),
            plan.annual_savings,
            plan.annual_spending,
            params.social_security_age,
            params.social_security_benefit,
        )
    }

    fn evaluate(
        &self,
        ctx: &SimulationContext,
        engine: &WealthEngine,
        growth: &DistributionSummary,
        timeline: &Timeline,
        allocations: &[f64],
        contributions: &[f64],
    ) -> PlanOutcome {
        let wealth = engine.project(ctx.params().current_wealth, allocations, contributions);
        let summary = summarize(&wealth);
        let milestones = milestone_stats(
            &summary,
            growth,
            &timeline.ages,
            timeline.retirement_index,
            timeline.final_index,
        );
        PlanOutcome {
            wealth: summary,
            milestones,
        }
    }

    /// All levels of one family; allocations stay on the baseline glide path
    fn counterfactual_rows(
        &self,
        family: CounterfactualFamily,
        ctx: &SimulationContext,
        engine: &WealthEngine,
        growth: &DistributionSummary,
        allocations: &[f64],
    ) -> Vec<ScenarioRow> {
        let params = ctx.params();
        let config = &self.base_assumptions.counterfactuals;
        let mut rows = Vec::new();

        for level in config.levels(family) {
            let mut plan = PlanVariant {
                retirement_age: params.retirement_age,
                annual_savings: params.annual_savings,
                annual_spending: params.annual_spending,
            };
            match family {
                CounterfactualFamily::IncreaseSavings => plan.annual_savings += level,
                CounterfactualFamily::DelayRetirement => plan.retirement_age += level as u32,
                CounterfactualFamily::ReduceSpending => {
                    plan.annual_spending = (plan.annual_spending - level).max(0.0)
                }
            }

            let Some(timeline) = ctx.timeline().with_retirement_age(plan.retirement_age) else {
                log::warn!(
                    "Skipping {} by {}: retirement age {} is past the horizon age {}",
                    family.label(),
                    level,
                    plan.retirement_age,
                    ctx.horizon_age()
                );
                continue;
            };

            let contributions = self.contributions(ctx, plan);
            let outcome = self.evaluate(ctx, engine, growth, &timeline, allocations, &contributions);
            let milestones = &outcome.milestones;

            rows.push(ScenarioRow {
                family,
                level,
                retirement_age: plan.retirement_age,
                annual_savings: plan.annual_savings,
                annual_spending: plan.annual_spending,
                wealth_at_retirement: milestones.map(|_, m| m.wealth_at_retirement),
                wealth_at_end: milestones.map(|_, m| m.wealth_at_end),
                forever_income: forever_income(milestones, config.withdrawal_rate),
                depletion_age: milestones.map(|_, m| m.depletion_age),
            });
        }

        log::debug!("{}: {} levels projected", family.label(), rows.len());
        rows
    }
}
