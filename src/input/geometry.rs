//! Code for reading region boundaries from a GeoJSON file.
use super::input_err_msg;
use crate::region::RegionGeometry;
use anyhow::{Context, Result, bail};
use geo::{Geometry, MultiPolygon};
use geojson::GeoJson;
use std::fs;
use std::path::Path;

/// Reads region boundaries from a GeoJSON file.
///
/// # Arguments
///
/// * `file_path` - Path to a GeoJSON `FeatureCollection`
/// * `name_property` - The feature property holding each region's name
///
/// # Returns
///
/// One [`RegionGeometry`] per feature, in file order, or an error.
pub fn read_geometry(file_path: &Path, name_property: &str) -> Result<Vec<RegionGeometry>> {
    let json = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    parse_geometry(&json, name_property).with_context(|| input_err_msg(file_path))
}

/// Parse region boundaries from GeoJSON text
pub fn parse_geometry(json: &str, name_property: &str) -> Result<Vec<RegionGeometry>> {
    let GeoJson::FeatureCollection(collection) = json.parse::<GeoJson>()? else {
        bail!("Expected a GeoJSON FeatureCollection");
    };

    let mut regions = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let Some(name) = feature.property(name_property).and_then(|v| v.as_str()) else {
            bail!("Feature {index} has no string property '{name_property}'");
        };
        let name = name.to_string();

        let Some(geometry) = feature.geometry else {
            bail!("Feature {index} ('{name}') has no geometry");
        };
        let geometry: Geometry<f64> = geometry
            .value
            .try_into()
            .with_context(|| format!("Invalid geometry for feature {index} ('{name}')"))?;
        let boundary = match geometry {
            Geometry::Polygon(polygon) => MultiPolygon::new(vec![polygon]),
            Geometry::MultiPolygon(multi) => multi,
            _ => bail!("Feature {index} ('{name}') must be a Polygon or MultiPolygon"),
        };

        regions.push(RegionGeometry { name, boundary });
    }

    Ok(regions)
}
