//! Finding the region nearest to the pointer.
//!
//! Lookup is by centroid distance rather than point-in-polygon: whichever selectable region has
//! its centroid closest to the pointer wins. With around fifty regions a linear scan every frame
//! is cheap enough.
use crate::id::RegionId;
use crate::region::RegionRegistry;
use anyhow::{Result, ensure};
use geo::Point;

fn distance(a: Point<f64>, b: Point<f64>) -> f64 {
    (a.x() - b.x()).hypot(a.y() - b.y())
}

/// Nearest-centroid lookup over the selectable regions of a registry
#[derive(Debug, Clone)]
pub struct NearestLocator {
    centroids: Vec<(RegionId, Point<f64>)>,
}

impl NearestLocator {
    /// Collect the centroids of all selectable regions, in registry order
    pub fn new(registry: &RegionRegistry) -> Result<Self> {
        let centroids: Vec<_> = registry
            .regions()
            .iter()
            .filter(|r| r.selectable)
            .map(|r| (r.id, r.centroid))
            .collect();
        ensure!(
            !centroids.is_empty(),
            "At least one selectable region is required for lookup"
        );

        Ok(Self { centroids })
    }

    /// The selectable region whose centroid is closest to `point`.
    ///
    /// Ties go to the region that comes first in registry order.
    pub fn nearest(&self, point: Point<f64>) -> RegionId {
        let mut best = self.centroids[0];
        let mut best_distance = distance(point, best.1);
        for &(id, centroid) in &self.centroids[1..] {
            let d = distance(point, centroid);
            if d < best_distance {
                best = (id, centroid);
                best_distance = d;
            }
        }

        best.0
    }

    /// Number of regions that can be returned
    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    /// Always false: construction fails for an empty set
    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{metric_table, region_geometry, square};
    use crate::metrics::MetricTable;
    use crate::projection::{ProjectionConfig, Projector};
    use crate::region::{RegionGeometry, RegionLayout};
    use geo::MultiPolygon;
    use itertools::iproduct;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry(region_geometry: Vec<RegionGeometry>, metric_table: MetricTable) -> RegionRegistry {
        RegionRegistry::build(
            region_geometry,
            metric_table,
            &RegionLayout::default(),
            &Projector::new(&ProjectionConfig::default()),
        )
        .unwrap()
    }

    #[rstest]
    fn test_nearest_to_own_centroid(registry: RegionRegistry) {
        let locator = NearestLocator::new(&registry).unwrap();
        for region in registry.regions().iter().filter(|r| r.selectable) {
            assert_eq!(locator.nearest(region.centroid), region.id);
        }
    }

    #[rstest]
    fn test_nearest_never_excluded(registry: RegionRegistry) {
        let locator = NearestLocator::new(&registry).unwrap();
        assert_eq!(locator.len(), 5);

        // Sweep the whole canvas, including right on top of the excluded territories
        let points = iproduct!((0..=1200).step_by(25), (0..=800).step_by(25))
            .map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
            .chain(
                ["Puerto Rico", "Guam"]
                    .iter()
                    .map(|name| registry.find(name).unwrap().centroid),
            );
        for point in points {
            let id = locator.nearest(point);
            assert!(registry.get(id).selectable);
        }
    }

    #[test]
    fn test_tie_goes_to_first() {
        // Two identical squares: both centroids are equidistant from any point
        let geometry = ["Texas", "California"]
            .map(|name| RegionGeometry {
                name: name.into(),
                boundary: MultiPolygon::new(vec![square(-100.0, 35.0, 2.0)]),
            })
            .to_vec();
        let registry = RegionRegistry::build(
            geometry,
            MetricTable::default(),
            &RegionLayout::default(),
            &Projector::new(&ProjectionConfig::default()),
        )
        .unwrap();
        let locator = NearestLocator::new(&registry).unwrap();
        let texas = registry.find("Texas").unwrap().id;
        assert_eq!(locator.nearest(Point::new(0.0, 0.0)), texas);
    }
}
