//! Fixtures for tests
use crate::metrics::{EnergyBalance, MetricKey, MetricTable};
use crate::region::RegionGeometry;
use crate::units::Energy;
use geo::{MultiPolygon, Polygon, Rect, coord};
use rstest::fixture;
use std::collections::HashMap;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// An axis-aligned square with its lower-left corner at `(x, y)`
pub fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
    Rect::new(coord! { x: x, y: y }, coord! { x: x + size, y: y + size }).to_polygon()
}

fn region(name: &str, x: f64, y: f64, size: f64) -> RegionGeometry {
    RegionGeometry {
        name: name.to_string(),
        boundary: MultiPolygon::new(vec![square(x, y, size)]),
    }
}

#[fixture]
pub fn region_geometry() -> Vec<RegionGeometry> {
    vec![
        region("Alaska", -156.0, 58.0, 8.0),
        region("California", -122.0, 34.0, 4.0),
        region("Texas", -103.0, 27.0, 6.0),
        region("Hawaii", -157.5, 19.5, 1.0),
        region("Guam", 144.6, 13.2, 0.4),
        region("Puerto Rico", -67.0, 18.0, 1.0),
        // Not a known state or territory
        region("Atlantis", -40.0, 30.0, 2.0),
    ]
}

fn balance(total: f64, renewable: f64) -> EnergyBalance {
    EnergyBalance::new(Energy(total), Energy(renewable))
}

#[fixture]
pub fn metric_table() -> MetricTable {
    let ca: MetricKey = ("CA".into(), 2000);
    let tx: MetricKey = ("TX".into(), 2000);
    let production = HashMap::from([
        (ca.clone(), balance(100.0, 30.0)),
        (tx.clone(), balance(1000.0, 50.0)),
    ]);
    let consumption = HashMap::from([(ca, balance(200.0, 50.0)), (tx, balance(1000.0, 100.0))]);

    MetricTable::from_balances(&production, &consumption)
}
