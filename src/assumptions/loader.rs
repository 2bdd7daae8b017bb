//! CSV-based assumption loader
//!
//! Loads the mortality table and the historical annual-return series from data/

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::mortality::{MortalityRow, MortalityTable};
use crate::error::{ProjectionError, ProjectionResult};
use crate::market::HistoricalReturns;

/// Default location of the mortality table
pub const DEFAULT_MORTALITY_TABLE_PATH: &str = "data/mortality_table.csv";

/// Default equity column of the historical return file (S&P 500 incl. dividends, real)
pub const DEFAULT_EQUITY_COLUMN: &str = "sp500_including_dividends_real_return";

/// Default bond column of the historical return file (US Treasury, real)
pub const DEFAULT_BOND_COLUMN: &str = "ust_real_return";

/// Raw CSV row matching mortality_table.csv columns
#[derive(Debug, serde::Deserialize)]
struct MortalityCsvRow {
    current_age: u32,
    forward_death_prob_1y_male: f64,
    forward_death_prob_1y_female: f64,
    #[serde(default)]
    expected_years_till_death_male: Option<f64>,
    #[serde(default)]
    expected_years_till_death_female: Option<f64>,
}

impl From<MortalityCsvRow> for MortalityRow {
    fn from(row: MortalityCsvRow) -> Self {
        MortalityRow {
            age: row.current_age,
            death_prob_male: row.forward_death_prob_1y_male,
            death_prob_female: row.forward_death_prob_1y_female,
            life_expectancy_male: row.expected_years_till_death_male,
            life_expectancy_female: row.expected_years_till_death_female,
        }
    }
}

/// Load a mortality table from a CSV file
pub fn load_mortality_table<P: AsRef<Path>>(path: P) -> ProjectionResult<MortalityTable> {
    let file = File::open(path.as_ref())?;
    let table = load_mortality_table_from_reader(file)?;
    log::debug!(
        "Loaded mortality table {} covering ages {}..={}",
        path.as_ref().display(),
        table.min_age(),
        table.max_age()
    );
    Ok(table)
}

/// Load a mortality table from any reader (e.g., string buffer)
pub fn load_mortality_table_from_reader<R: Read>(reader: R) -> ProjectionResult<MortalityTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in csv_reader.deserialize() {
        let row: MortalityCsvRow = result?;
        rows.push(row.into());
    }

    MortalityTable::from_rows(rows)
}

/// Load the mortality table from the default data/ location
pub fn load_default_mortality_table() -> ProjectionResult<MortalityTable> {
    load_mortality_table(DEFAULT_MORTALITY_TABLE_PATH)
}

/// Parse a return cell given either as a decimal ("-0.0256") or a percent string ("-2.56%")
pub fn parse_return(raw: &str) -> ProjectionResult<f64> {
    let trimmed = raw.trim();
    let parse_err = || ProjectionError::ParseReturn {
        value: raw.to_string(),
    };

    match trimmed.strip_suffix('%') {
        Some(pct) => pct
            .trim()
            .parse::<f64>()
            .map(|v| v / 100.0)
            .map_err(|_| parse_err()),
        None => trimmed.parse::<f64>().map_err(|_| parse_err()),
    }
}

/// Load historical annual returns from a CSV file with a `year` column plus the named
/// equity and bond columns
pub fn load_historical_returns<P: AsRef<Path>>(
    path: P,
    equity_column: &str,
    bond_column: &str,
) -> ProjectionResult<HistoricalReturns> {
    let file = File::open(path.as_ref())?;
    let history = load_historical_returns_from_reader(file, equity_column, bond_column)?;
    log::debug!(
        "Loaded {} years of return history from {}",
        history.len(),
        path.as_ref().display()
    );
    Ok(history)
}

pub fn load_historical_returns_from_reader<R: Read>(
    reader: R,
    equity_column: &str,
    bond_column: &str,
) -> ProjectionResult<HistoricalReturns> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| {
                ProjectionError::invalid_parameter("history_column", format!("missing column '{}'", name))
            })
    };
    let year_idx = column("year")?;
    let equity_idx = column(equity_column)?;
    let bond_idx = column(bond_column)?;

    let mut years = Vec::new();
    let mut equity = Vec::new();
    let mut bond = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let year: i32 = record[year_idx]
            .trim()
            .parse()
            .map_err(|_| ProjectionError::ParseReturn {
                value: record[year_idx].to_string(),
            })?;
        years.push(year);
        equity.push(parse_return(&record[equity_idx])?);
        bond.push(parse_return(&record[bond_idx])?);
    }

    HistoricalReturns::new(years, equity, bond)
}
