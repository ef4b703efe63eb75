//! Regions are the states and territories drawn on the map.
use crate::canvas::{ScreenShape, ScreenTransform};
use crate::id::{RegionId, define_id_type};
use crate::metrics::{MetricRow, MetricTable};
use crate::projection::Projector;
use anyhow::{Result, ensure};
use geo::{Centroid, MapCoords, MultiPolygon, Point};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Deserialize;
use unicase::UniCase;

define_id_type! {StateCode}

/// Two-letter postal codes for every state, D.C. and the inhabited territories
const STATE_CODES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("American Samoa", "AS"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Commonwealth of the Northern Mariana Islands", "MP"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Guam", "GU"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Puerto Rico", "PR"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("United States Virgin Islands", "VI"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Look up the postal code for a full state or territory name (case-insensitive)
pub fn state_code_for(name: &str) -> Option<StateCode> {
    let name = UniCase::new(name.trim());
    STATE_CODES
        .iter()
        .find(|(full, _)| UniCase::new(*full) == name)
        .map(|(_, code)| StateCode::new(code))
}

/// A named boundary read from the geometry file, in longitude/latitude
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGeometry {
    /// The feature's name property (e.g. "California")
    pub name: String,
    /// One or more polygon parts
    pub boundary: MultiPolygon<f64>,
}

/// Which regions are special-cased when building the registry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionLayout {
    /// Regions that can be drawn but are never returned by the nearest-region lookup
    #[serde(default = "default_lookup_excluded")]
    pub lookup_excluded: Vec<String>,
    /// Regions that are not drawn at all
    #[serde(default = "default_draw_excluded")]
    pub draw_excluded: Vec<String>,
    /// Draw-time transforms which move far-away regions into empty canvas space
    #[serde(default = "default_relocations")]
    pub relocations: IndexMap<String, ScreenTransform>,
}

fn default_lookup_excluded() -> Vec<String> {
    [
        "American Samoa",
        "Guam",
        "Commonwealth of the Northern Mariana Islands",
        "Puerto Rico",
        "United States Virgin Islands",
    ]
    .map(String::from)
    .to_vec()
}

fn default_draw_excluded() -> Vec<String> {
    // Puerto Rico's geometry destabilises the renderer when hovered near, so it is left off the map
    vec!["Puerto Rico".to_string()]
}

fn default_relocations() -> IndexMap<String, ScreenTransform> {
    IndexMap::from([
        (
            "Alaska".to_string(),
            ScreenTransform {
                translate: [100.0, 350.0],
                scale: 0.4,
            },
        ),
        (
            "Hawaii".to_string(),
            ScreenTransform {
                translate: [350.0, -675.0],
                scale: 2.0,
            },
        ),
    ])
}

impl Default for RegionLayout {
    fn default() -> Self {
        Self {
            lookup_excluded: default_lookup_excluded(),
            draw_excluded: default_draw_excluded(),
            relocations: default_relocations(),
        }
    }
}

fn contains_name(names: &[String], name: &str) -> bool {
    let name = UniCase::new(name);
    names.iter().any(|n| UniCase::new(n.as_str()) == name)
}

fn relocation_for(layout: &RegionLayout, name: &str) -> Option<ScreenTransform> {
    let name = UniCase::new(name);
    layout
        .relocations
        .iter()
        .find(|(n, _)| UniCase::new(n.as_str()) == name)
        .map(|(_, t)| *t)
}

/// Names in `layout` which match none of `regions`, in layout order
fn unmatched_layout_names<'a>(layout: &'a RegionLayout, regions: &[Region]) -> Vec<&'a str> {
    let known: Vec<_> = regions.iter().map(|r| UniCase::new(r.name.as_str())).collect();
    layout
        .lookup_excluded
        .iter()
        .chain(&layout.draw_excluded)
        .chain(layout.relocations.keys())
        .map(String::as_str)
        .filter(|name| !known.contains(&UniCase::new(*name)))
        .collect()
}

/// A state or territory
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Position in the registry
    pub id: RegionId,
    /// Canonical name from the geometry file
    pub name: String,
    /// Postal code, if the name is a known state or territory
    pub code: Option<StateCode>,
    /// Boundary in longitude/latitude
    pub boundary: MultiPolygon<f64>,
    /// Area-weighted centroid of all polygon parts, in pixels
    pub centroid: Point<f64>,
    /// Polygon parts projected to pixels, ready to draw
    pub shapes: Vec<ScreenShape>,
    /// Whether the nearest-region lookup may return this region
    pub selectable: bool,
    /// Whether the region is drawn
    pub drawable: bool,
    /// Transform applied only when drawing
    pub relocation: Option<ScreenTransform>,
}

impl Region {
    /// Number of polygon parts making up the region
    pub fn shape_count(&self) -> usize {
        self.boundary.0.len()
    }
}

/// All regions, in geometry file order, together with their metrics
#[derive(Debug)]
pub struct RegionRegistry {
    regions: Vec<Region>,
    metrics: MetricTable,
}

impl RegionRegistry {
    /// Build the registry from loaded geometry and metrics.
    ///
    /// Centroids are computed once, in geographic coordinates, and then projected. Relocations
    /// are not applied to centroids, so lookup always uses a region's true position.
    pub fn build(
        geometry: Vec<RegionGeometry>,
        metrics: MetricTable,
        layout: &RegionLayout,
        projector: &Projector,
    ) -> Result<Self> {
        let mut regions = Vec::with_capacity(geometry.len());
        for (index, RegionGeometry { name, boundary }) in geometry.into_iter().enumerate() {
            let Some(centroid) = boundary.centroid() else {
                warn!("Region '{name}' has an empty boundary and will be skipped");
                continue;
            };

            let code = state_code_for(&name);
            if code.is_none() {
                warn!("No state code known for region '{name}'; it will be drawn without data");
            }

            let shapes = boundary
                .0
                .iter()
                .map(|polygon| {
                    ScreenShape::from_polygon(&polygon.map_coords(|c| projector.project_coord(c)))
                })
                .collect();

            let region = Region {
                id: RegionId(regions.len()),
                centroid: projector.project(centroid.x(), centroid.y()),
                selectable: !contains_name(&layout.lookup_excluded, &name),
                drawable: !contains_name(&layout.draw_excluded, &name),
                relocation: relocation_for(layout, &name),
                code,
                shapes,
                boundary,
                name,
            };
            debug!(
                "Region {index} '{}': {} part(s), centroid at ({:.1}, {:.1})",
                region.name,
                region.shape_count(),
                region.centroid.x(),
                region.centroid.y()
            );
            regions.push(region);
        }

        for name in unmatched_layout_names(layout, &regions) {
            warn!("Layout refers to region '{name}', which is not in the geometry file");
        }

        ensure!(
            regions.iter().any(|r| r.selectable),
            "No selectable regions remain after exclusions"
        );

        Ok(Self { regions, metrics })
    }

    /// All regions in registry order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Get a region by ID
    pub fn get(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }

    /// Find a region by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&Region> {
        let name = UniCase::new(name);
        self.regions
            .iter()
            .find(|r| UniCase::new(r.name.as_str()) == name)
    }

    /// The metric row for a region and year, if the region has a code and data for that year
    pub fn metric(&self, id: RegionId, year: u32) -> Option<&MetricRow> {
        let code = self.get(id).code.as_ref()?;
        self.metrics.get(code, year)
    }

    /// The underlying metric table
    pub fn metrics(&self) -> &MetricTable {
        &self.metrics
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether there are no regions
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, metric_table, region_geometry, square};
    use crate::projection::ProjectionConfig;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn projector() -> Projector {
        Projector::new(&ProjectionConfig::default())
    }

    #[rstest]
    #[case("California", Some("CA"))]
    #[case("california", Some("CA"))]
    #[case(" Puerto Rico ", Some("PR"))]
    #[case("Atlantis", None)]
    fn test_state_code_for(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(state_code_for(name), expected.map(StateCode::new));
    }

    #[rstest]
    fn test_build_flags(region_geometry: Vec<RegionGeometry>, metric_table: MetricTable) {
        let registry = RegionRegistry::build(
            region_geometry,
            metric_table,
            &RegionLayout::default(),
            &projector(),
        )
        .unwrap();

        let ca = registry.find("California").unwrap();
        assert!(ca.selectable && ca.drawable && ca.relocation.is_none());
        assert_eq!(ca.code, Some("CA".into()));

        let pr = registry.find("Puerto Rico").unwrap();
        assert!(!pr.selectable);
        assert!(!pr.drawable);

        let guam = registry.find("Guam").unwrap();
        assert!(!guam.selectable);
        assert!(guam.drawable);

        let hi = registry.find("Hawaii").unwrap();
        assert_eq!(
            hi.relocation,
            Some(ScreenTransform {
                translate: [350.0, -675.0],
                scale: 2.0
            })
        );
    }

    #[rstest]
    fn test_unmatched_layout_names(region_geometry: Vec<RegionGeometry>) {
        let layout = RegionLayout {
            lookup_excluded: vec!["guam".into(), "Lemuria".into()],
            draw_excluded: vec!["Puerto Rico".into()],
            relocations: IndexMap::from([
                ("Alaska".into(), ScreenTransform::IDENTITY),
                ("Mu".into(), ScreenTransform::IDENTITY),
            ]),
        };
        let registry = RegionRegistry::build(
            region_geometry,
            MetricTable::default(),
            &layout,
            &projector(),
        )
        .unwrap();

        assert_eq!(
            unmatched_layout_names(&layout, registry.regions()),
            ["Lemuria", "Mu"]
        );

        // The default layout names territories missing from the fixture
        assert_eq!(
            unmatched_layout_names(&RegionLayout::default(), registry.regions()).len(),
            3
        );
    }

    #[test]
    fn test_centroid_is_area_weighted() {
        // Two parts: a 2x2 square centred on (0, 0) and a 1x1 square centred on (10.5, 0.5).
        // Area-weighted: x = (4 * 0 + 1 * 10.5) / 5 = 2.1, y = (4 * 0 + 1 * 0.5) / 5 = 0.1
        let boundary = MultiPolygon::new(vec![square(-1.0, -1.0, 2.0), square(10.0, 0.0, 1.0)]);
        let geometry = vec![RegionGeometry {
            name: "Hawaii".into(),
            boundary,
        }];
        let projector = projector();
        let registry = RegionRegistry::build(
            geometry,
            MetricTable::default(),
            &RegionLayout::default(),
            &projector,
        )
        .unwrap();

        let hi = registry.find("Hawaii").unwrap();
        let expected = projector.project(2.1, 0.1);
        assert_approx_eq!(f64, hi.centroid.x(), expected.x(), epsilon = 1e-6);
        assert_approx_eq!(f64, hi.centroid.y(), expected.y(), epsilon = 1e-6);
        assert_eq!(hi.shape_count(), 2);
        assert_eq!(hi.shapes.len(), 2);
    }

    #[test]
    fn test_build_no_selectable_regions() {
        let geometry = vec![RegionGeometry {
            name: "Guam".into(),
            boundary: MultiPolygon::new(vec![square(144.0, 13.0, 0.5)]),
        }];
        assert_error!(
            RegionRegistry::build(
                geometry,
                MetricTable::default(),
                &RegionLayout::default(),
                &projector()
            ),
            "No selectable regions remain after exclusions"
        );
    }

    #[rstest]
    fn test_metric_lookup(region_geometry: Vec<RegionGeometry>, metric_table: MetricTable) {
        let registry = RegionRegistry::build(
            region_geometry,
            metric_table,
            &RegionLayout::default(),
            &projector(),
        )
        .unwrap();

        let ca = registry.find("California").unwrap().id;
        assert!(registry.metric(ca, 2000).is_some());
        assert!(registry.metric(ca, 1961).is_none());
    }
}
