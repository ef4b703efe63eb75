//! Per-state, per-year energy metrics joined from the production and consumption tables.
use crate::playback::Mode;
use crate::region::StateCode;
use crate::units::{Dimensionless, Energy};
use std::collections::HashMap;

/// Key for a metric row: state code and year
pub type MetricKey = (StateCode, u32);

/// Renewable and total energy for one category (production or consumption)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBalance {
    /// Total energy, in billion Btu
    pub total: Energy,
    /// Renewable energy, in billion Btu
    pub renewable: Energy,
    /// `renewable / total`, clamped to `[0, 1]`
    pub share: Dimensionless,
}

impl EnergyBalance {
    /// Create a balance, computing the clamped renewable share.
    ///
    /// A total of zero or less gives a share of zero.
    pub fn new(total: Energy, renewable: Energy) -> Self {
        let share = if total.value() > 0.0 {
            (renewable / total).clamp_unit()
        } else {
            Dimensionless(0.0)
        };

        Self {
            total,
            renewable,
            share,
        }
    }

    /// Whether the unclamped ratio was above one (renewable exceeding the reported total)
    pub fn exceeds_total(&self) -> bool {
        self.total.value() > 0.0 && self.renewable > self.total
    }
}

/// All the metrics for a single state in a single year.
///
/// Either balance may be missing; each mode is coloured from its own balance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricRow {
    /// Energy production
    pub production: Option<EnergyBalance>,
    /// Energy consumption (excluding nuclear)
    pub consumption: Option<EnergyBalance>,
    /// Consumption share divided by the largest consumption share in the table.
    ///
    /// Only used to stretch the contrast of the consumption map.
    pub normalised_consumption_share: Option<Dimensionless>,
}

impl MetricRow {
    /// The balance shown in the given mode, if there is data for it
    pub fn balance(&self, mode: Mode) -> Option<&EnergyBalance> {
        match mode {
            Mode::Production => self.production.as_ref(),
            Mode::Consumption => self.consumption.as_ref(),
        }
    }

    /// The proportion used to colour the map in the given mode
    pub fn fill_proportion(&self, mode: Mode, stretch_consumption: bool) -> Option<Dimensionless> {
        match mode {
            Mode::Consumption if stretch_consumption => self.normalised_consumption_share,
            _ => self.balance(mode).map(|balance| balance.share),
        }
    }
}

/// An immutable table of [`MetricRow`]s keyed by state code and year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    rows: HashMap<MetricKey, MetricRow>,
    max_consumption_share: Dimensionless,
}

impl MetricTable {
    /// Combine production and consumption balances.
    ///
    /// A row is created for every key present in either map.
    pub fn from_balances(
        production: &HashMap<MetricKey, EnergyBalance>,
        consumption: &HashMap<MetricKey, EnergyBalance>,
    ) -> Self {
        let max_consumption_share = consumption
            .values()
            .map(|balance| balance.share)
            .fold(Dimensionless(0.0), |max, share| {
                if share > max { share } else { max }
            });
        let normalise = |share: Dimensionless| {
            if max_consumption_share.value() > 0.0 {
                Dimensionless(share.value() / max_consumption_share.value()).clamp_unit()
            } else {
                Dimensionless(0.0)
            }
        };

        let mut rows: HashMap<MetricKey, MetricRow> = production
            .iter()
            .map(|(key, production)| {
                let row = MetricRow {
                    production: Some(*production),
                    ..MetricRow::default()
                };
                (key.clone(), row)
            })
            .collect();
        for (key, consumption) in consumption {
            let row = rows.entry(key.clone()).or_default();
            row.consumption = Some(*consumption);
            row.normalised_consumption_share = Some(normalise(consumption.share));
        }

        Self {
            rows,
            max_consumption_share,
        }
    }

    /// Look up the row for a state and year
    pub fn get(&self, code: &StateCode, year: u32) -> Option<&MetricRow> {
        self.rows.get(&(code.clone(), year))
    }

    /// The largest consumption share over all state/year pairs
    pub fn max_consumption_share(&self) -> Dimensionless {
        self.max_consumption_share
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn balance(total: f64, renewable: f64) -> EnergyBalance {
        EnergyBalance::new(Energy(total), Energy(renewable))
    }

    #[rstest]
    #[case(200.0, 50.0, 0.25)]
    #[case(100.0, 130.0, 1.0)] // noisy data: clamped
    #[case(0.0, 10.0, 0.0)]
    #[case(100.0, -5.0, 0.0)]
    fn test_energy_balance_share(
        #[case] total: f64,
        #[case] renewable: f64,
        #[case] expected: f64,
    ) {
        assert_eq!(balance(total, renewable).share, Dimensionless(expected));
    }

    #[test]
    fn test_exceeds_total() {
        assert!(balance(100.0, 130.0).exceeds_total());
        assert!(!balance(100.0, 100.0).exceeds_total());
        assert!(!balance(0.0, 10.0).exceeds_total());
    }

    #[test]
    fn test_from_balances_outer_join_and_normalise() {
        let ca: MetricKey = ("CA".into(), 2000);
        let tx: MetricKey = ("TX".into(), 2000);
        let wa: MetricKey = ("WA".into(), 2000);
        let nv: MetricKey = ("NV".into(), 2000);
        let production = HashMap::from([
            (ca.clone(), balance(100.0, 10.0)),
            (tx.clone(), balance(100.0, 1.0)),
            (nv.clone(), balance(100.0, 5.0)),
        ]);
        let consumption = HashMap::from([
            (ca.clone(), balance(200.0, 50.0)),
            (tx.clone(), balance(100.0, 10.0)),
            // No production data, but still counts towards the maximum
            (wa.clone(), balance(100.0, 50.0)),
        ]);

        let table = MetricTable::from_balances(&production, &consumption);
        assert_eq!(table.len(), 4);
        assert_eq!(table.max_consumption_share(), Dimensionless(0.5));

        let wa_row = table.get(&"WA".into(), 2000).unwrap();
        assert!(wa_row.production.is_none());
        assert_eq!(wa_row.normalised_consumption_share, Some(Dimensionless(1.0)));

        let ca_row = table.get(&"CA".into(), 2000).unwrap();
        assert_eq!(ca_row.normalised_consumption_share, Some(Dimensionless(0.5)));
        let tx_row = table.get(&"TX".into(), 2000).unwrap();
        assert_approx_eq!(
            f64,
            tx_row.normalised_consumption_share.unwrap().value(),
            0.2
        );

        let nv_row = table.get(&"NV".into(), 2000).unwrap();
        assert!(nv_row.consumption.is_none());
        assert!(nv_row.normalised_consumption_share.is_none());
    }

    #[test]
    fn test_fill_proportion() {
        let row = MetricRow {
            production: Some(balance(100.0, 30.0)),
            consumption: Some(balance(100.0, 20.0)),
            normalised_consumption_share: Some(Dimensionless(0.5)),
        };
        assert_eq!(row.fill_proportion(Mode::Production, true), Some(Dimensionless(0.3)));
        assert_eq!(row.fill_proportion(Mode::Consumption, true), Some(Dimensionless(0.5)));
        assert_eq!(row.fill_proportion(Mode::Consumption, false), Some(Dimensionless(0.2)));
    }

    #[rstest]
    #[case(Mode::Production, true)]
    #[case(Mode::Consumption, false)]
    #[case(Mode::Consumption, true)]
    fn test_fill_proportion_missing_balance(#[case] mode: Mode, #[case] stretch: bool) {
        let row = MetricRow::default();
        assert!(row.balance(mode).is_none());
        assert_eq!(row.fill_proportion(mode, stretch), None);
    }

    #[test]
    fn test_empty_table() {
        let table = MetricTable::from_balances(&HashMap::new(), &HashMap::new());
        assert!(table.is_empty());
        assert_eq!(table.max_consumption_share(), Dimensionless(0.0));
    }
}
