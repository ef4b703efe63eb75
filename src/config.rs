//! Defines the `ViewConfig` struct, which represents the contents of `view.toml`.
use crate::colour::Colour;
use crate::input::metrics::MetricFiles;
use crate::input::{input_err_msg, read_toml};
use crate::projection::ProjectionConfig;
use crate::region::RegionLayout;
use crate::year::{FIRST_YEAR, LAST_YEAR, YearRange};
use anyhow::{Context, Result, ensure};
use log::info;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const VIEW_CONFIG_FILE_NAME: &str = "view.toml";

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_width, f64, 1200.0);
define_param_default!(default_height, f64, 800.0);
define_param_default!(default_background, Colour, Colour::new(0xF0, 0xF0, 0xF0));
define_param_default!(default_stroke, Colour, Colour::new(0x33, 0x33, 0x33));
define_param_default!(default_stroke_weight, f64, 1.0);
define_param_default!(default_no_data, Colour, Colour::BLACK);
define_param_default!(default_production_colour, Colour, Colour::new(0x83, 0x00, 0xC4));
define_param_default!(default_consumption_colour, Colour, Colour::new(0xDB, 0x4C, 0x00));
define_param_default!(default_first_year, u32, FIRST_YEAR);
define_param_default!(default_last_year, u32, LAST_YEAR);
define_param_default!(default_autoplay_interval_ms, u64, 200);
define_param_default!(default_stretch_consumption, bool, true);
define_param_default!(default_name_property, String, "NAME".to_string());
define_param_default!(default_geometry_file, String, "states.geojson".to_string());

/// Represents the contents of the entire view file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    /// Canvas width in pixels
    #[serde(default = "default_width")]
    pub width: f64,
    /// Canvas height in pixels
    #[serde(default = "default_height")]
    pub height: f64,
    /// Colour the canvas is cleared to each frame
    #[serde(default = "default_background")]
    pub background: Colour,
    /// Outline colour for region shapes
    #[serde(default = "default_stroke")]
    pub stroke: Colour,
    /// Outline width for region shapes
    #[serde(default = "default_stroke_weight")]
    pub stroke_weight: f64,
    /// Fill for regions without data for the current year
    #[serde(default = "default_no_data")]
    pub no_data: Colour,
    /// Target hue for the production map
    #[serde(default = "default_production_colour")]
    pub production_colour: Colour,
    /// Target hue for the consumption map
    #[serde(default = "default_consumption_colour")]
    pub consumption_colour: Colour,
    /// First year that can be shown
    #[serde(default = "default_first_year")]
    pub first_year: u32,
    /// Last year that can be shown
    #[serde(default = "default_last_year")]
    pub last_year: u32,
    /// Milliseconds between years while autoplaying
    #[serde(default = "default_autoplay_interval_ms")]
    pub autoplay_interval_ms: u64,
    /// Whether the consumption map is coloured by the share relative to the largest share.
    ///
    /// Consumption shares are small compared with production shares, so without stretching most
    /// of the map is close to white.
    #[serde(default = "default_stretch_consumption")]
    pub stretch_consumption: bool,
    /// The GeoJSON feature property holding region names
    #[serde(default = "default_name_property")]
    pub name_property: String,
    /// The GeoJSON boundary file, relative to the data directory
    #[serde(default = "default_geometry_file")]
    pub geometry_file: String,
    /// Map projection
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// Lookup and drawing exclusions and relocations
    #[serde(default)]
    pub layout: RegionLayout,
    /// The energy tables, relative to the data directory
    #[serde(default)]
    pub files: MetricFiles,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            stroke: default_stroke(),
            stroke_weight: default_stroke_weight(),
            no_data: default_no_data(),
            production_colour: default_production_colour(),
            consumption_colour: default_consumption_colour(),
            first_year: default_first_year(),
            last_year: default_last_year(),
            autoplay_interval_ms: default_autoplay_interval_ms(),
            stretch_consumption: default_stretch_consumption(),
            name_property: default_name_property(),
            geometry_file: default_geometry_file(),
            projection: ProjectionConfig::default(),
            layout: RegionLayout::default(),
            files: MetricFiles::default(),
        }
    }
}

/// Check that a canvas dimension is valid
fn check_dimension(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{name} must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that the projection parameters are valid
fn check_projection(projection: &ProjectionConfig) -> Result<()> {
    ensure!(
        projection.zoom.is_finite() && projection.zoom > 0.0,
        "projection.zoom must be a finite number greater than zero"
    );
    ensure!(
        projection
            .pan
            .iter()
            .chain(&projection.placement)
            .all(|v| v.is_finite()),
        "projection.pan and projection.placement must be finite"
    );

    Ok(())
}

impl ViewConfig {
    /// Read the view file from the specified data directory.
    ///
    /// If the file is not present, default values are used.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Folder containing the data files
    ///
    /// # Returns
    ///
    /// The view file contents as a [`ViewConfig`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(data_dir: P) -> Result<ViewConfig> {
        let file_path = data_dir.as_ref().join(VIEW_CONFIG_FILE_NAME);
        if !file_path.is_file() {
            info!("No {VIEW_CONFIG_FILE_NAME} found; using default view settings");
            return Ok(ViewConfig::default());
        }

        let config: ViewConfig = read_toml(&file_path)?;
        config
            .validate()
            .with_context(|| input_err_msg(&file_path))?;

        Ok(config)
    }

    /// Validate parameters after reading in file
    pub fn validate(&self) -> Result<()> {
        check_dimension("width", self.width)?;
        check_dimension("height", self.height)?;
        ensure!(
            self.stroke_weight.is_finite() && self.stroke_weight >= 0.0,
            "stroke_weight must be a finite number no less than zero"
        );
        self.years()?;
        ensure!(
            self.autoplay_interval_ms > 0,
            "autoplay_interval_ms cannot be zero"
        );
        ensure!(
            !self.name_property.trim().is_empty(),
            "name_property cannot be empty"
        );
        check_projection(&self.projection)?;
        for (name, relocation) in &self.layout.relocations {
            ensure!(
                relocation.scale.is_finite() && relocation.scale > 0.0,
                "Relocation scale for '{name}' must be a finite number greater than zero"
            );
            ensure!(
                relocation.translate.iter().all(|v| v.is_finite()),
                "Relocation translate for '{name}' must be finite"
            );
        }

        Ok(())
    }

    /// The years that can be shown
    pub fn years(&self) -> Result<YearRange> {
        YearRange::new(self.first_year, self.last_year)
    }

    /// Time between years while autoplaying
    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_view_file(dir: &Path, contents: &str) {
        let mut file = File::create(dir.join(VIEW_CONFIG_FILE_NAME)).unwrap();
        writeln!(file, "{contents}").unwrap();
    }

    #[test]
    fn test_from_path_no_file() {
        let dir = tempdir().unwrap();
        assert_eq!(
            ViewConfig::from_path(dir.path()).unwrap(),
            ViewConfig::default()
        );
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: ViewConfig = toml::from_str("").unwrap();
        assert_eq!(config, ViewConfig::default());
        assert_eq!(config.consumption_colour.to_string(), "#DB4C00");
        assert_eq!(config.autoplay_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        write_view_file(
            dir.path(),
            r##"
first_year = 1990
stretch_consumption = false
production_colour = "#00FF00"

[projection]
zoom = 2.0

[layout]
draw_excluded = []
relocations = { Alaska = { translate = [0.0, 0.0], scale = 0.5 } }

[files]
consumption_other = ["CONSUMPTION Coal-Table 1.csv"]
"##,
        );

        let config = ViewConfig::from_path(dir.path()).unwrap();
        assert_eq!(config.years().unwrap().first(), 1990);
        assert!(!config.stretch_consumption);
        assert_eq!(config.production_colour, Colour::new(0, 255, 0));
        assert_eq!(config.projection.zoom, 2.0);
        assert_eq!(config.projection.pan, [-100.0, 40.0]);
        assert!(config.layout.draw_excluded.is_empty());
        assert_eq!(config.layout.relocations.len(), 1);
        assert_eq!(config.layout.relocations["Alaska"].scale, 0.5);
        assert_eq!(config.files.consumption_other.len(), 1);
        assert_eq!(
            config.files.production_total,
            MetricFiles::default().production_total
        );
    }

    #[test]
    fn test_invalid_colour() {
        assert!(toml::from_str::<ViewConfig>("background = \"#GGGGGG\"").is_err());
    }

    #[test]
    fn test_unknown_field() {
        assert!(toml::from_str::<ViewConfig>("colour_scheme = \"dark\"").is_err());
    }

    #[rstest]
    #[case("width = 0.0", "width must be a finite number greater than zero")]
    #[case(
        "first_year = 2000\nlast_year = 1990",
        "First year (2000) must not be later than last year (1990)"
    )]
    #[case("autoplay_interval_ms = 0", "autoplay_interval_ms cannot be zero")]
    #[case("name_property = \" \"", "name_property cannot be empty")]
    #[case(
        "[projection]\nzoom = -1.0",
        "projection.zoom must be a finite number greater than zero"
    )]
    #[case(
        "[layout.relocations]\nAlaska = { translate = [0.0, 0.0], scale = 0.0 }",
        "Relocation scale for 'Alaska' must be a finite number greater than zero"
    )]
    #[case(
        "[layout.relocations]\nHawaii = { translate = [nan, 10.0], scale = 2.0 }",
        "Relocation translate for 'Hawaii' must be finite"
    )]
    fn test_validate_invalid(#[case] toml: &str, #[case] msg: &str) {
        let config: ViewConfig = toml::from_str(toml).unwrap();
        assert_error!(config.validate(), msg);
    }

    #[test]
    fn test_from_path_invalid_has_context() {
        let dir = tempdir().unwrap();
        write_view_file(dir.path(), "height = -5.0");
        let err = ViewConfig::from_path(dir.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            input_err_msg(dir.path().join(VIEW_CONFIG_FILE_NAME))
        );
    }
}
