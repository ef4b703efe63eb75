//! The interactive map: everything loaded at startup plus the per-frame loop.
use crate::canvas::Canvas;
use crate::config::ViewConfig;
use crate::controls::InputSnapshot;
use crate::input::{read_geometry, read_metrics};
use crate::locator::NearestLocator;
use crate::metrics::MetricTable;
use crate::playback::{Playback, ViewState};
use crate::projection::Projector;
use crate::region::{RegionGeometry, RegionRegistry};
use crate::render::{FrameRenderer, Hover};
use anyhow::{Context, Result};
use geo::Point;
use log::info;
use std::path::Path;
use std::time::Duration;

/// The map and its interaction state
#[derive(Debug)]
pub struct Atlas {
    config: ViewConfig,
    registry: RegionRegistry,
    locator: NearestLocator,
    playback: Playback,
    renderer: FrameRenderer,
    pointer: [f64; 2],
}

impl Atlas {
    /// Load the view configuration, geometry and energy tables from a data directory
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config = ViewConfig::from_path(data_dir)?;
        let years = config.years()?;

        let geometry_path = data_dir.join(&config.geometry_file);
        let geometry = read_geometry(&geometry_path, &config.name_property)?;
        info!(
            "Read {} region(s) from {}",
            geometry.len(),
            geometry_path.display()
        );

        let metrics = read_metrics(data_dir, &config.files, &years)?;

        Self::new(config, geometry, metrics)
    }

    /// Build the map from already-loaded data
    pub fn new(
        config: ViewConfig,
        geometry: Vec<RegionGeometry>,
        metrics: MetricTable,
    ) -> Result<Self> {
        config.validate()?;
        let years = config.years()?;

        let projector = Projector::new(&config.projection);
        let registry = RegionRegistry::build(geometry, metrics, &config.layout, &projector)
            .context("Failed to build region registry")?;
        let locator = NearestLocator::new(&registry)?;
        info!(
            "{} region(s) on the map, {} available for lookup",
            registry.len(),
            locator.len()
        );

        Ok(Self {
            playback: Playback::new(years, config.autoplay_interval()),
            renderer: FrameRenderer::new(&config),
            config,
            registry,
            locator,
            pointer: [0.0, 0.0],
        })
    }

    /// The view configuration
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// All regions and their metrics
    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    /// The current view
    pub fn state(&self) -> &ViewState {
        self.playback.state()
    }

    /// Run one frame.
    ///
    /// Input is applied first, then `dt` of wall-clock time is passed to autoplay, then the frame
    /// is drawn. If the snapshot has no pointer position, the last known one is used.
    pub fn frame(
        &mut self,
        input: &InputSnapshot,
        dt: Duration,
        canvas: &mut impl Canvas,
    ) -> Result<()> {
        self.playback.handle_input(input);
        self.playback.advance(dt);
        if let Some(pointer) = input.pointer {
            self.pointer = pointer;
        }

        let nearest = self
            .locator
            .nearest(Point::new(self.pointer[0], self.pointer[1]));
        let hover = Hover {
            pointer: self.pointer,
            region: self.registry.get(nearest),
        };
        self.renderer
            .draw(canvas, &self.registry, self.playback.state(), &hover)?;

        Ok(())
    }
}
