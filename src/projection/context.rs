//! Per-run simulation context: validated parameters, survival profile and timeline

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::assumptions::{MortalityTable, SurvivalProfile};
use crate::error::{ProjectionError, ProjectionResult};
use crate::params::SimulationParameters;

/// Where the planning horizon age came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizonSource {
    /// First age at which cumulative survival falls to 1% or below
    OnePercentSurvival,
    /// The table never reaches 1% survival, so the table's last age is used instead
    TableMaximumAge,
}

/// Ages, calendar years and key indices of the simulated periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Age in each period; period 0 is the current age
    pub ages: Vec<u32>,

    /// Calendar year of each period
    pub calendar_years: Vec<i32>,

    /// Period index of the retirement age
    pub retirement_index: usize,

    /// Period index of the horizon age (the last period)
    pub final_index: usize,
}

impl Timeline {
    pub fn new(
        current_age: u32,
        retirement_age: u32,
        horizon_age: u32,
        start_year: i32,
    ) -> ProjectionResult<Self> {
        if horizon_age < current_age {
            return Err(ProjectionError::invalid_age(
                horizon_age,
                format!("horizon age is before current age {}", current_age),
            ));
        }
        if retirement_age < current_age || retirement_age > horizon_age {
            return Err(ProjectionError::invalid_age(
                retirement_age,
                format!(
                    "retirement age must lie within {}..={}",
                    current_age, horizon_age
                ),
            ));
        }

        let ages: Vec<u32> = (current_age..=horizon_age).collect();
        let calendar_years = (0..ages.len()).map(|i| start_year + i as i32).collect();

        Ok(Self {
            retirement_index: (retirement_age - current_age) as usize,
            final_index: ages.len() - 1,
            ages,
            calendar_years,
        })
    }

    /// Number of simulated periods (horizon age - current age + 1)
    pub fn num_periods(&self) -> usize {
        self.ages.len()
    }

    pub fn current_age(&self) -> u32 {
        self.ages[0]
    }

    pub fn horizon_age(&self) -> u32 {
        self.ages[self.final_index]
    }

    pub fn retirement_age(&self) -> u32 {
        self.ages[self.retirement_index]
    }

    pub fn index_of_age(&self, age: u32) -> Option<usize> {
        let offset = age.checked_sub(self.current_age())? as usize;
        (offset < self.ages.len()).then_some(offset)
    }

    /// Same horizon with a different retirement age; None if it falls outside the horizon
    pub fn with_retirement_age(&self, retirement_age: u32) -> Option<Self> {
        let retirement_index = self.index_of_age(retirement_age)?;
        Some(Self {
            retirement_index,
            ..self.clone()
        })
    }
}

/// Everything one projection run needs, built once and passed by reference
#[derive(Debug, Clone)]
pub struct SimulationContext<'a> {
    table: &'a MortalityTable,
    params: SimulationParameters,
    profile: SurvivalProfile,
    horizon_source: HorizonSource,
    timeline: Timeline,
}

impl<'a> SimulationContext<'a> {
    /// Validate parameters and derive the survival profile, horizon and timeline
    pub fn new(table: &'a MortalityTable, params: SimulationParameters) -> ProjectionResult<Self> {
        params.validate()?;

        let profile = table.survival_profile(params.current_age)?;

        let (horizon_age, horizon_source) = match profile.age_at_1_pct {
            Some(age) => (age, HorizonSource::OnePercentSurvival),
            None => {
                log::warn!(
                    "Mortality table never reaches 1% survival from age {}; using table maximum age {}",
                    params.current_age,
                    table.max_age()
                );
                (table.max_age(), HorizonSource::TableMaximumAge)
            }
        };

        let start_year = params
            .start_year
            .unwrap_or_else(|| chrono::Local::now().year());

        let timeline = Timeline::new(
            params.current_age,
            params.retirement_age,
            horizon_age,
            start_year,
        )?;

        log::debug!(
            "Context: age {} retiring at {}, horizon {} ({:?}), {} periods",
            params.current_age,
            params.retirement_age,
            horizon_age,
            horizon_source,
            timeline.num_periods()
        );

        Ok(Self {
            table,
            params,
            profile,
            horizon_source,
            timeline,
        })
    }

    pub fn table(&self) -> &MortalityTable {
        self.table
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn profile(&self) -> &SurvivalProfile {
        &self.profile
    }

    pub fn horizon_source(&self) -> HorizonSource {
        self.horizon_source
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn horizon_age(&self) -> u32 {
        self.timeline.horizon_age()
    }

    pub fn num_periods(&self) -> usize {
        self.timeline.num_periods()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Nobody dies before 99; survival drops to 0.5% at 100
    fn table_to_100() -> MortalityTable {
        let mut rates = vec![(0.0, 0.0); 79];
        rates.push((0.995, 0.995));
        rates.push((1.0, 1.0));
        MortalityTable::from_rates(20, rates).unwrap()
    }

    #[test]
    fn test_horizon_from_one_percent_survival() {
        let table = table_to_100();
        let mut params = SimulationParameters::new(40, 65, 100_000.0, 10_000.0, 40_000.0);
        params.start_year = Some(2024);

        let ctx = SimulationContext::new(&table, params).unwrap();
        assert_eq!(ctx.horizon_age(), 100);
        assert_eq!(ctx.horizon_source(), HorizonSource::OnePercentSurvival);
        assert_eq!(ctx.num_periods(), 61);

        let timeline = ctx.timeline();
        assert_eq!(timeline.retirement_index, 25);
        assert_eq!(timeline.final_index, 60);
        assert_eq!(timeline.calendar_years[0], 2024);
        assert_eq!(timeline.calendar_years[60], 2084);
        assert_eq!(timeline.ages[25], 65);
    }

    #[test]
    fn test_horizon_falls_back_to_table_maximum() {
        let table = MortalityTable::from_rates(50, vec![(0.02, 0.02); 40]).unwrap();
        let params = SimulationParameters::new(55, 60, 0.0, 0.0, 0.0);

        let ctx = SimulationContext::new(&table, params).unwrap();
        assert_eq!(ctx.horizon_source(), HorizonSource::TableMaximumAge);
        assert_eq!(ctx.horizon_age(), 89);
        assert!(ctx.profile().age_at_1_pct.is_none());
    }

    #[test]
    fn test_invalid_ages_rejected() {
        let table = table_to_100();

        let params = SimulationParameters::new(15, 65, 0.0, 0.0, 0.0);
        assert!(matches!(
            SimulationContext::new(&table, params),
            Err(ProjectionError::InvalidAge { age: 15, .. })
        ));

        // Retirement past the horizon
        let params = SimulationParameters::new(40, 101, 0.0, 0.0, 0.0);
        assert!(matches!(
            SimulationContext::new(&table, params),
            Err(ProjectionError::InvalidAge { age: 101, .. })
        ));
    }

    #[test]
    fn test_timeline_with_retirement_age() {
        let timeline = Timeline::new(40, 60, 90, 2030).unwrap();
        let delayed = timeline.with_retirement_age(63).unwrap();
        assert_eq!(delayed.retirement_index, 23);
        assert_eq!(delayed.ages, timeline.ages);
        assert!(timeline.with_retirement_age(91).is_none());
        assert!(timeline.with_retirement_age(39).is_none());
    }
}
