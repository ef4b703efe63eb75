//! Mapping geographic coordinates onto the canvas.
//!
//! A single spherical Web Mercator projection is supported, configured by a geographic pan centre,
//! a zoom factor and the pixel at which the pan centre is placed. The projection is computed once
//! per region at startup; the map is never re-panned or re-zoomed at runtime.
use geo::{Coord, Point};
use serde::Deserialize;
use std::f64::consts::FRAC_PI_4;

/// Pixels per radian of longitude at a zoom of 1
pub const PIXELS_PER_RADIAN: f64 = 600.0;

/// Latitudes beyond this are clamped so that the projection stays finite
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Pan, zoom and placement for the map
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    /// The geographic centre of the view as `[longitude, latitude]`
    #[serde(default = "default_pan")]
    pub pan: [f64; 2],
    /// Zoom factor, where 1 is the default scale
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Where on the canvas the pan centre is drawn, as `[x, y]` in pixels
    #[serde(default = "default_placement")]
    pub placement: [f64; 2],
}

fn default_pan() -> [f64; 2] {
    [-100.0, 40.0]
}

fn default_zoom() -> f64 {
    1.0
}

fn default_placement() -> [f64; 2] {
    [500.0, 375.0]
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            pan: default_pan(),
            zoom: default_zoom(),
            placement: default_placement(),
        }
    }
}

/// Spherical Mercator coordinates, in radians
fn mercator(lon: f64, lat: f64) -> Coord<f64> {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    Coord {
        x: lon.to_radians(),
        y: (FRAC_PI_4 + lat / 2.0).tan().ln(),
    }
}

/// Projects geographic coordinates to pixels for a fixed [`ProjectionConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct Projector {
    anchor: Coord<f64>,
    placement: Coord<f64>,
    scale: f64,
}

impl Projector {
    /// Create a projector for the given configuration
    pub fn new(config: &ProjectionConfig) -> Self {
        Self {
            anchor: mercator(config.pan[0], config.pan[1]),
            placement: Coord {
                x: config.placement[0],
                y: config.placement[1],
            },
            scale: PIXELS_PER_RADIAN * config.zoom,
        }
    }

    /// Project a longitude/latitude pair (in degrees) to pixel coordinates.
    ///
    /// Pixel y grows downwards, so northern latitudes have smaller y values.
    pub fn project(&self, lon: f64, lat: f64) -> Point<f64> {
        let m = mercator(lon, lat);
        Point::new(
            self.placement.x + (m.x - self.anchor.x) * self.scale,
            self.placement.y - (m.y - self.anchor.y) * self.scale,
        )
    }

    /// Project a geographic coordinate
    pub fn project_coord(&self, coord: Coord<f64>) -> Coord<f64> {
        self.project(coord.x, coord.y).0
    }
}
