//! Code for reading the EIA State Energy Data System tables.
//!
//! Each table is "wide": a title line, then a header of `State` followed by one column per year,
//! then one row per state with a magnitude (billion Btu) in each year column. The tables are
//! reshaped into production and consumption [`EnergyBalance`]s and joined into a [`MetricTable`].
use super::{input_err_msg, parse_magnitude};
use crate::metrics::{EnergyBalance, MetricKey, MetricTable};
use crate::region::StateCode;
use crate::units::Energy;
use crate::year::YearRange;
use anyhow::{Context, Result, ensure};
use log::{info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use unicase::UniCase;

/// Values from a single wide table, keyed by state code and year
pub type LongTable = HashMap<MetricKey, Energy>;

/// Names of the CSV files making up the dataset
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricFiles {
    /// Renewable energy production
    #[serde(default = "default_production_renewable")]
    pub production_renewable: String,
    /// Total primary energy production
    #[serde(default = "default_production_total")]
    pub production_total: String,
    /// Renewable energy consumption
    #[serde(default = "default_consumption_renewable")]
    pub consumption_renewable: String,
    /// Non-renewable consumption categories summed with renewables to give total consumption.
    ///
    /// Nuclear is left out by default.
    #[serde(default = "default_consumption_other")]
    pub consumption_other: Vec<String>,
}

fn default_production_renewable() -> String {
    "Total renewables-Table 1.csv".to_string()
}

fn default_production_total() -> String {
    "Total primary energy-Table 1.csv".to_string()
}

fn default_consumption_renewable() -> String {
    "CONSUMPTION Total renewable energy-Table 1.csv".to_string()
}

fn default_consumption_other() -> Vec<String> {
    [
        "CONSUMPTION Coal-Table 1.csv",
        "CONSUMPTION Natural gas-Table 1.csv",
        "CONSUMPTION Petroleum-Table 1.csv",
    ]
    .map(String::from)
    .to_vec()
}

impl Default for MetricFiles {
    fn default() -> Self {
        Self {
            production_renewable: default_production_renewable(),
            production_total: default_production_total(),
            consumption_renewable: default_consumption_renewable(),
            consumption_other: default_consumption_other(),
        }
    }
}

/// Read a wide table from any reader, keeping only years in `years`
fn read_wide_table_from_reader<R: Read>(reader: R, years: &YearRange) -> Result<LongTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records();

    // The first line is a title, the second the header
    records.next().context("Table is empty")??;
    let header = records.next().context("Table has no header row")??;
    ensure!(
        header
            .get(0)
            .is_some_and(|c| UniCase::new(c.trim()) == UniCase::new("State")),
        "First column of the header must be 'State'"
    );

    let year_columns: Vec<(usize, u32)> = header
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(i, c)| Some((i, c.trim().parse::<u32>().ok()?)))
        .filter(|(_, year)| years.contains(*year))
        .collect();
    ensure!(!year_columns.is_empty(), "Header has no year columns");

    let mut table = LongTable::new();
    for record in records {
        let record = record?;
        let Some(state) = record.get(0).map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        let code = StateCode::new(state);

        for &(column, year) in &year_columns {
            if let Some(value) = record.get(column).and_then(parse_magnitude) {
                table.insert((code.clone(), year), Energy(value));
            }
        }
    }

    Ok(table)
}

/// Read a wide table from a CSV file.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
/// * `years` - Year columns outside this range are ignored
pub fn read_wide_table(file_path: &Path, years: &YearRange) -> Result<LongTable> {
    let file = std::fs::File::open(file_path).with_context(|| input_err_msg(file_path))?;
    read_wide_table_from_reader(file, years).with_context(|| input_err_msg(file_path))
}

/// Pair renewable and total values present for the same key
fn join_balances(totals: &LongTable, renewables: &LongTable) -> HashMap<MetricKey, EnergyBalance> {
    renewables
        .iter()
        .filter_map(|(key, renewable)| {
            let total = totals.get(key)?;
            Some((key.clone(), EnergyBalance::new(*total, *renewable)))
        })
        .collect()
}

/// Sum the categories of consumption into a total for every key with renewable data
fn total_consumption(renewables: &LongTable, others: &[LongTable]) -> LongTable {
    renewables
        .iter()
        .map(|(key, renewable)| {
            let rest: Energy = others.iter().filter_map(|table| table.get(key)).copied().sum();
            (key.clone(), *renewable + rest)
        })
        .collect()
}

/// Build the metric table from already-read tables
fn metrics_from_tables(
    production_total: &LongTable,
    production_renewable: &LongTable,
    consumption_renewable: &LongTable,
    consumption_other: &[LongTable],
) -> MetricTable {
    let production = join_balances(production_total, production_renewable);
    let consumption_total = total_consumption(consumption_renewable, consumption_other);
    let consumption = join_balances(&consumption_total, consumption_renewable);

    let noisy = production
        .values()
        .chain(consumption.values())
        .filter(|b| b.exceeds_total())
        .count();
    if noisy > 0 {
        warn!("{noisy} entries have renewable energy exceeding the total; their shares are capped at 1");
    }

    MetricTable::from_balances(&production, &consumption)
}

/// Reads and joins all the energy tables in a data directory.
///
/// # Arguments
///
/// * `data_dir` - Folder containing the CSV files
/// * `files` - Names of the CSV files
/// * `years` - The years to keep
///
/// # Returns
///
/// A [`MetricTable`] with a row for every state and year that has production or consumption
/// data.
pub fn read_metrics(data_dir: &Path, files: &MetricFiles, years: &YearRange) -> Result<MetricTable> {
    let read = |name: &str| read_wide_table(&data_dir.join(name), years);

    let production_total = read(&files.production_total)?;
    let production_renewable = read(&files.production_renewable)?;
    let consumption_renewable = read(&files.consumption_renewable)?;
    let consumption_other = files
        .consumption_other
        .iter()
        .map(|name| read(name))
        .collect::<Result<Vec<_>>>()?;

    let table = metrics_from_tables(
        &production_total,
        &production_renewable,
        &consumption_renewable,
        &consumption_other,
    );
    ensure!(
        !table.is_empty(),
        "No state has production or consumption data in {}",
        data_dir.display()
    );
    info!(
        "Read {} state/year rows (maximum consumption share {:.3})",
        table.len(),
        table.max_consumption_share().value()
    );

    Ok(table)
}
