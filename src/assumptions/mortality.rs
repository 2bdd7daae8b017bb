//! Mortality table and survival-horizon derivation
//!
//! The table holds one-year forward death probabilities by integer age for both sexes.
//! Survival calculations use the unisex forward survival probability
//! `1 - (q_male + q_female) / 2`, matching how the planner treats a household
//! of unknown composition.
//!
//! A [`SurvivalProfile`] is derived for one current age: the running product of forward
//! survival probabilities (1.0 at the current age) and the first ages at which that
//! product falls to or below the 25%, 10%, 5% and 1% targets.

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, ProjectionResult};

/// Sex used for per-sex table lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

/// One input row of a mortality table
///
/// Life expectancies are optional; missing values are derived from the death probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct MortalityRow {
    pub age: u32,
    pub death_prob_male: f64,
    pub death_prob_female: f64,
    pub life_expectancy_male: Option<f64>,
    pub life_expectancy_female: Option<f64>,
}

/// Mortality table covering a contiguous range of ages
#[derive(Debug, Clone)]
pub struct MortalityTable {
    /// Age of the first entry
    start_age: u32,

    /// One-year forward death probabilities (index = age - start_age)
    /// Stored as (male_rate, female_rate)
    death_probs: Vec<(f64, f64)>,

    /// Expected remaining years of life (index = age - start_age)
    /// Stored as (male, female)
    life_expectancy: Vec<(f64, f64)>,
}

impl MortalityTable {
    /// Build from table rows, validating contiguity and probability bounds
    pub fn from_rows(mut rows: Vec<MortalityRow>) -> ProjectionResult<Self> {
        if rows.is_empty() {
            return Err(ProjectionError::EmptyTable);
        }
        rows.sort_by_key(|r| r.age);

        let start_age = rows[0].age;
        for (i, row) in rows.iter().enumerate() {
            let expected = start_age + i as u32;
            if row.age != expected {
                return Err(ProjectionError::NonContiguousTable {
                    expected,
                    found: row.age,
                });
            }
            for value in [row.death_prob_male, row.death_prob_female] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ProjectionError::ProbabilityOutOfRange { age: row.age, value });
                }
            }
        }

        let death_probs: Vec<(f64, f64)> = rows
            .iter()
            .map(|r| (r.death_prob_male, r.death_prob_female))
            .collect();

        let male: Vec<f64> = death_probs.iter().map(|&(m, _)| m).collect();
        let female: Vec<f64> = death_probs.iter().map(|&(_, f)| f).collect();

        let life_expectancy = rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                (
                    r.life_expectancy_male
                        .unwrap_or_else(|| complete_expectation(&male[i..])),
                    r.life_expectancy_female
                        .unwrap_or_else(|| complete_expectation(&female[i..])),
                )
            })
            .collect();

        Ok(Self {
            start_age,
            death_probs,
            life_expectancy,
        })
    }

    /// Build from (male, female) death probabilities starting at `start_age`
    pub fn from_rates(start_age: u32, rates: Vec<(f64, f64)>) -> ProjectionResult<Self> {
        let rows = rates
            .into_iter()
            .enumerate()
            .map(|(i, (male, female))| MortalityRow {
                age: start_age + i as u32,
                death_prob_male: male,
                death_prob_female: female,
                life_expectancy_male: None,
                life_expectancy_female: None,
            })
            .collect();
        Self::from_rows(rows)
    }

    pub fn min_age(&self) -> u32 {
        self.start_age
    }

    pub fn max_age(&self) -> u32 {
        self.start_age + self.death_probs.len() as u32 - 1
    }

    pub fn contains(&self, age: u32) -> bool {
        age >= self.min_age() && age <= self.max_age()
    }

    fn index(&self, age: u32) -> Option<usize> {
        self.contains(age).then(|| (age - self.start_age) as usize)
    }

    /// One-year death probability for a given age and sex
    pub fn death_prob(&self, age: u32, sex: Sex) -> Option<f64> {
        let (male, female) = self.death_probs[self.index(age)?];
        Some(match sex {
            Sex::Male => male,
            Sex::Female => female,
        })
    }

    /// Expected remaining years of life for a given age and sex
    pub fn life_expectancy(&self, age: u32, sex: Sex) -> Option<f64> {
        let (male, female) = self.life_expectancy[self.index(age)?];
        Some(match sex {
            Sex::Male => male,
            Sex::Female => female,
        })
    }

    /// Unisex one-year forward survival probability: 1 - average(q_male, q_female)
    pub fn forward_survival_prob(&self, age: u32) -> Option<f64> {
        let (male, female) = self.death_probs[self.index(age)?];
        Some(1.0 - (male + female) / 2.0)
    }

    /// Derive the survival profile for someone currently `current_age`
    pub fn survival_profile(&self, current_age: u32) -> ProjectionResult<SurvivalProfile> {
        derive_survival_profile(self, current_age)
    }
}

/// Complete expectation of life from a run of one-year death probabilities:
/// e = 0.5 + sum over k >= 1 of the k-year survival probability
fn complete_expectation(death_probs: &[f64]) -> f64 {
    let mut survival = 1.0;
    let mut total = 0.0;
    for q in death_probs {
        survival *= 1.0 - q;
        total += survival;
    }
    total + 0.5
}

/// Cumulative survival probability targets used to pick planning horizons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurvivalTarget {
    P25,
    P10,
    P5,
    P1,
}

impl SurvivalTarget {
    /// All targets, from most to least likely
    pub const ALL: [SurvivalTarget; 4] = [
        SurvivalTarget::P25,
        SurvivalTarget::P10,
        SurvivalTarget::P5,
        SurvivalTarget::P1,
    ];

    pub fn probability(self) -> f64 {
        match self {
            SurvivalTarget::P25 => 0.25,
            SurvivalTarget::P10 => 0.10,
            SurvivalTarget::P5 => 0.05,
            SurvivalTarget::P1 => 0.01,
        }
    }
}

/// Survival statistics for one current age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalProfile {
    pub current_age: u32,

    /// Current age plus the truncated average of male and female life expectancy
    pub expected_age_at_death: u32,

    /// Ages from the current age to the end of the table
    pub ages: Vec<u32>,

    /// Probability of being alive at each age in `ages`, given alive at the current age
    pub cumulative_survival: Vec<f64>,

    /// First age at which cumulative survival <= 25%; None if the table never gets there
    pub age_at_25_pct: Option<u32>,
    pub age_at_10_pct: Option<u32>,
    pub age_at_5_pct: Option<u32>,
    pub age_at_1_pct: Option<u32>,
}

impl SurvivalProfile {
    pub fn age_at(&self, target: SurvivalTarget) -> Option<u32> {
        match target {
            SurvivalTarget::P25 => self.age_at_25_pct,
            SurvivalTarget::P10 => self.age_at_10_pct,
            SurvivalTarget::P5 => self.age_at_5_pct,
            SurvivalTarget::P1 => self.age_at_1_pct,
        }
    }
}

/// First age whose cumulative survival probability is at or below `target`
pub fn age_for_survival_prob(target: f64, ages: &[u32], cumulative_survival: &[f64]) -> Option<u32> {
    ages.iter()
        .zip(cumulative_survival)
        .find(|(_, &prob)| prob <= target)
        .map(|(&age, _)| age)
}

/// Restrict the table to ages >= `current_age`, accumulate survival and locate the
/// 25/10/5/1 percent thresholds
pub fn derive_survival_profile(
    table: &MortalityTable,
    current_age: u32,
) -> ProjectionResult<SurvivalProfile> {
    if !table.contains(current_age) {
        return Err(ProjectionError::invalid_age(
            current_age,
            format!(
                "outside mortality table range {}..={}",
                table.min_age(),
                table.max_age()
            ),
        ));
    }

    let ages: Vec<u32> = (current_age..=table.max_age()).collect();

    // Alive at the current age with certainty; each later age multiplies in the
    // prior age's one-year survival
    let mut cumulative_survival = Vec::with_capacity(ages.len());
    let mut running = 1.0;
    for &age in &ages {
        cumulative_survival.push(running);
        running *= table.forward_survival_prob(age).unwrap_or(0.0);
    }

    let male = table.life_expectancy(current_age, Sex::Male).unwrap_or(0.0);
    let female = table.life_expectancy(current_age, Sex::Female).unwrap_or(0.0);
    let expected_age_at_death = current_age + ((male + female) / 2.0) as u32;

    let threshold = |target: SurvivalTarget| {
        age_for_survival_prob(target.probability(), &ages, &cumulative_survival)
    };

    Ok(SurvivalProfile {
        current_age,
        expected_age_at_death,
        age_at_25_pct: threshold(SurvivalTarget::P25),
        age_at_10_pct: threshold(SurvivalTarget::P10),
        age_at_5_pct: threshold(SurvivalTarget::P5),
        age_at_1_pct: threshold(SurvivalTarget::P1),
        ages,
        cumulative_survival,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    /// Gompertz-style table from age 20 to 110 with both sexes sharing a hazard
    fn gompertz_table() -> MortalityTable {
        let rates = (20..=110)
            .map(|age| {
                let q = (0.00005 * (0.095 * age as f64).exp()).min(1.0);
                (q, q * 0.85)
            })
            .collect();
        MortalityTable::from_rates(20, rates).unwrap()
    }

    #[test]
    fn test_forward_survival_is_unisex_average() {
        let table = MortalityTable::from_rates(60, vec![(0.02, 0.01), (0.04, 0.02)]).unwrap();
        assert_relative_eq!(table.forward_survival_prob(60).unwrap(), 0.985);
        assert_relative_eq!(table.forward_survival_prob(61).unwrap(), 0.97);
        assert!(table.forward_survival_prob(62).is_none());
    }

    #[test]
    fn test_threshold_at_age_100_for_40_year_old() {
        // Nobody dies until 99, then almost everybody does
        let mut rates = vec![(0.0, 0.0); 59];
        rates.push((0.995, 0.995));
        rates.push((1.0, 1.0));
        let table = MortalityTable::from_rates(40, rates).unwrap();
        assert_eq!(table.max_age(), 100);

        let profile = table.survival_profile(40).unwrap();
        assert_eq!(profile.age_at_1_pct, Some(100));
        assert_eq!(profile.age_at_25_pct, Some(100));
        assert_relative_eq!(profile.cumulative_survival[0], 1.0);
        assert_relative_eq!(*profile.cumulative_survival.last().unwrap(), 0.005, epsilon = 1e-12);
    }

    #[test]
    fn test_unreachable_target_is_none() {
        // Flat 5% mortality reaches 25% survival but never 1% within 30 years
        let table = MortalityTable::from_rates(50, vec![(0.05, 0.05); 30]).unwrap();
        let profile = table.survival_profile(50).unwrap();

        assert!(profile.age_at_25_pct.is_some());
        assert_eq!(profile.age_at_1_pct, None);
        assert_eq!(profile.age_at(SurvivalTarget::P1), None);
    }

    #[test]
    fn test_invalid_current_age() {
        let table = gompertz_table();
        let err = table.survival_profile(15).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidAge { age: 15, .. }));
        assert!(table.survival_profile(111).is_err());
    }

    #[test]
    fn test_table_validation() {
        assert!(matches!(
            MortalityTable::from_rows(vec![]),
            Err(ProjectionError::EmptyTable)
        ));

        let row = |age, q| MortalityRow {
            age,
            death_prob_male: q,
            death_prob_female: q,
            life_expectancy_male: None,
            life_expectancy_female: None,
        };
        assert!(matches!(
            MortalityTable::from_rows(vec![row(60, 0.01), row(62, 0.01)]),
            Err(ProjectionError::NonContiguousTable { expected: 61, found: 62 })
        ));
        assert!(matches!(
            MortalityTable::from_rows(vec![row(60, 1.5)]),
            Err(ProjectionError::ProbabilityOutOfRange { age: 60, .. })
        ));
    }

    #[test]
    fn test_expected_age_at_death_truncates_average() {
        let rows = vec![MortalityRow {
            age: 40,
            death_prob_male: 0.002,
            death_prob_female: 0.001,
            life_expectancy_male: Some(38.6),
            life_expectancy_female: Some(42.1),
        }];
        let table = MortalityTable::from_rows(rows).unwrap();
        let profile = table.survival_profile(40).unwrap();
        // (38.6 + 42.1) / 2 = 40.35 -> 40
        assert_eq!(profile.expected_age_at_death, 80);
    }

    #[test]
    fn test_derived_life_expectancy() {
        // Certain death within the year leaves half a year on average
        let table = MortalityTable::from_rates(100, vec![(1.0, 1.0)]).unwrap();
        assert_relative_eq!(table.life_expectancy(100, Sex::Male).unwrap(), 0.5);

        let table = gompertz_table();
        let young = table.life_expectancy(30, Sex::Female).unwrap();
        let old = table.life_expectancy(80, Sex::Female).unwrap();
        assert!(young > old);
    }

    proptest! {
        #[test]
        fn prop_thresholds_non_decreasing(current_age in 20u32..100) {
            let table = gompertz_table();
            let profile = table.survival_profile(current_age).unwrap();

            // Cumulative survival only falls with age
            for pair in profile.cumulative_survival.windows(2) {
                prop_assert!(pair[1] <= pair[0]);
            }

            let ages: Vec<Option<u32>> = SurvivalTarget::ALL
                .iter()
                .map(|&t| profile.age_at(t))
                .collect();
            for pair in ages.windows(2) {
                match (pair[0], pair[1]) {
                    (Some(a), Some(b)) => prop_assert!(a <= b),
                    // A stricter target can only be missed if the looser one is hit or missed
                    (_, None) => {}
                    (None, Some(_)) => prop_assert!(false, "looser target unreached but stricter reached"),
                }
            }
        }
    }
}
