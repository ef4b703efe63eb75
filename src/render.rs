//! Drawing one frame of the map.
//!
//! The frame is drawn in four layers: the choropleth, the hover panel (region name, totals and the
//! production/consumption bars), the colour-scale legend for the active mode and the fixed
//! instructions. Everything is drawn in immediate mode through a [`Canvas`]; nothing is retained
//! between frames.
use crate::canvas::{Canvas, ScreenTransform};
use crate::colour::{Colour, ColourError, encode};
use crate::config::ViewConfig;
use crate::metrics::MetricRow;
use crate::playback::{Mode, ViewState};
use crate::region::{Region, RegionRegistry};

const TITLE: &str =
    "Data Visualization Final Project: A Look At Renewable Energy Trends in U.S States";
const SUBTITLE: &str =
    "Renewable Proportion (Share) of Total Energy Consumption/Production (1960-2022)";
const NOTE: &str = "**Note: U.S Territories not represented (i.e American Samoa, Guam, etc.) due \
                    to missing data";

/// Offset of the hover panel from the top of the canvas
const PANEL_OFFSET: f64 = 450.0;
/// Left end of the comparison bars, in panel coordinates
const BAR_ORIGIN: f64 = 500.0;
/// Length of a bar with a share of one
const BAR_LENGTH: f64 = 300.0;
/// Number of axis intervals under the bars
const AXIS_TICKS: u32 = 5;
/// The legend is shifted up from the panel by this much
const LEGEND_OFFSET: f64 = -50.0;
/// Number of colour steps in the legend, excluding zero
const LEGEND_STEPS: u32 = 200;
/// A legend label is drawn every this many steps
const LEGEND_LABEL_EVERY: u32 = 40;
/// Height of each legend step
const LEGEND_STEP_HEIGHT: f64 = 2.0;
/// Width of the legend bar
const LEGEND_WIDTH: f64 = 20.0;

/// What the pointer is currently over
#[derive(Debug, Clone, Copy)]
pub struct Hover<'a> {
    /// Pointer position in pixels
    pub pointer: [f64; 2],
    /// The selectable region nearest to the pointer
    pub region: &'a Region,
}

/// A display name for the share shown in a mode
fn share_title(mode: Mode) -> &'static str {
    match mode {
        Mode::Production => "Renewable Production Share",
        Mode::Consumption => "Renewable Consumption Share",
    }
}

/// Draws frames for a fixed view configuration
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    width: f64,
    height: f64,
    background: Colour,
    stroke: Colour,
    stroke_weight: f64,
    no_data: Colour,
    production_colour: Colour,
    consumption_colour: Colour,
    stretch_consumption: bool,
}

impl FrameRenderer {
    /// Create a renderer for the given view
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            background: config.background,
            stroke: config.stroke,
            stroke_weight: config.stroke_weight,
            no_data: config.no_data,
            production_colour: config.production_colour,
            consumption_colour: config.consumption_colour,
            stretch_consumption: config.stretch_consumption,
        }
    }

    /// The target hue for a mode
    pub fn target_colour(&self, mode: Mode) -> Colour {
        match mode {
            Mode::Production => self.production_colour,
            Mode::Consumption => self.consumption_colour,
        }
    }

    /// The colour a region is filled with for the current view
    pub fn region_fill(
        &self,
        registry: &RegionRegistry,
        region: &Region,
        state: &ViewState,
    ) -> Result<Colour, ColourError> {
        let proportion = registry
            .metric(region.id, state.year())
            .and_then(|row| row.fill_proportion(state.mode(), self.stretch_consumption));
        let Some(proportion) = proportion else {
            return Ok(self.no_data);
        };

        encode(proportion.value(), self.target_colour(state.mode()))
    }

    /// Draw a complete frame
    pub fn draw(
        &self,
        canvas: &mut impl Canvas,
        registry: &RegionRegistry,
        state: &ViewState,
        hover: &Hover,
    ) -> Result<(), ColourError> {
        canvas.clear(self.background);
        self.draw_map(canvas, registry, state)?;

        canvas.push_transform(ScreenTransform::translate(0.0, PANEL_OFFSET));
        canvas.set_stroke_weight(0.0);
        self.draw_panel(canvas, registry, state, hover);
        canvas.push_transform(ScreenTransform::translate(0.0, LEGEND_OFFSET));
        let legend = self.draw_legend(canvas, registry, state.mode());
        canvas.pop_transform();
        canvas.pop_transform();
        legend?;

        self.draw_instructions(canvas, state);

        Ok(())
    }

    fn draw_map(
        &self,
        canvas: &mut impl Canvas,
        registry: &RegionRegistry,
        state: &ViewState,
    ) -> Result<(), ColourError> {
        canvas.set_stroke(self.stroke);
        canvas.set_stroke_weight(self.stroke_weight);

        for region in registry.regions().iter().filter(|r| r.drawable) {
            canvas.set_fill(self.region_fill(registry, region, state)?);

            if let Some(relocation) = region.relocation {
                canvas.push_transform(relocation);
            }
            for shape in &region.shapes {
                canvas.draw_shape(shape);
            }
            if region.relocation.is_some() {
                canvas.pop_transform();
            }
        }

        Ok(())
    }

    fn draw_panel(
        &self,
        canvas: &mut impl Canvas,
        registry: &RegionRegistry,
        state: &ViewState,
        hover: &Hover,
    ) {
        let [x, y] = hover.pointer;
        let name = &hover.region.name;
        let year = state.year();

        canvas.set_fill(Colour::BLACK);
        canvas.draw_text([150.0, 160.0], 12.0, &format!("Mouse Position: {x:.0}, {y:.0}"));
        canvas.draw_text(
            [150.0, 135.0],
            16.0,
            &format!("Closest State to Mouse Pos: {name}"),
        );
        canvas.draw_text(
            [BAR_ORIGIN, 160.0],
            14.0,
            &format!("{name} {year} : Renewable Production (P), Consumption (C)"),
        );

        match registry.metric(hover.region.id, year) {
            Some(row) => Self::draw_totals_and_bars(canvas, row, state.mode(), year),
            None => canvas.draw_text([100.0, 200.0], 14.0, &format!("No data for {year}")),
        }

        canvas.draw_text([310.0, 180.0], 12.0, "Billion Btu");
        canvas.draw_text([650.0, 270.0], 12.0, "Proportion");
        self.draw_axis(canvas);
    }

    fn draw_totals_and_bars(canvas: &mut impl Canvas, row: &MetricRow, mode: Mode, year: u32) {
        let noun = match mode {
            Mode::Production => "Production",
            Mode::Consumption => "Consumption",
        };
        if let Some(balance) = row.balance(mode) {
            canvas.draw_text(
                [100.0, 200.0],
                14.0,
                &format!("Total Energy {noun}: {:.0}", balance.total.value()),
            );
            canvas.draw_text(
                [100.0, 220.0],
                14.0,
                &format!("Renewable Energy {noun}: {:.0}", balance.renewable.value()),
            );
        } else {
            canvas.draw_text([100.0, 200.0], 14.0, &format!("No {noun} data for {year}"));
        }

        for (bar_mode, label, top) in [
            (Mode::Production, "P", 180.0),
            (Mode::Consumption, "C", 210.0),
        ] {
            let baseline = top + 15.0;
            canvas.draw_text([BAR_ORIGIN - 20.0, baseline], 14.0, label);

            let Some(balance) = row.balance(bar_mode) else {
                canvas.draw_text([BAR_ORIGIN + 5.0, baseline], 12.0, "No data");
                continue;
            };
            let share = balance.share.value();
            let end = BAR_ORIGIN + BAR_LENGTH * share;
            canvas.draw_rect([BAR_ORIGIN, top], [end, top + 20.0]);
            canvas.draw_text([end + 5.0, baseline], 12.0, &format!("{share:.2}"));
        }
    }

    fn draw_axis(&self, canvas: &mut impl Canvas) {
        canvas.set_stroke(self.background);
        for i in 0..=AXIS_TICKS {
            let value = f64::from(i) / f64::from(AXIS_TICKS);
            let x = BAR_ORIGIN + BAR_LENGTH * value;
            canvas.draw_text([x, 250.0], 12.0, &format!("{value:.1}"));

            // Gaps in the bars at each tick
            if i > 0 {
                canvas.set_stroke_weight(2.0);
                canvas.draw_line([x, 260.0], [x, 175.0]);
                canvas.set_stroke_weight(0.0);
            }
        }
    }

    /// The value a legend step stands for.
    ///
    /// With contrast stretching, the full colour range covers shares up to the largest one.
    fn legend_value(&self, registry: &RegionRegistry, mode: Mode, proportion: f64) -> f64 {
        match mode {
            Mode::Consumption if self.stretch_consumption => {
                proportion * registry.metrics().max_consumption_share().value()
            }
            _ => proportion,
        }
    }

    fn draw_legend(
        &self,
        canvas: &mut impl Canvas,
        registry: &RegionRegistry,
        mode: Mode,
    ) -> Result<(), ColourError> {
        let target = self.target_colour(mode);
        let x = self.width / 2.0 + 400.0;
        let base = self.height - 600.0;

        for i in 0..=LEGEND_STEPS {
            let proportion = f64::from(i) / f64::from(LEGEND_STEPS);
            let y = base - LEGEND_STEP_HEIGHT * f64::from(i);
            canvas.set_fill(encode(proportion, target)?);
            canvas.draw_rect([x, y], [x + LEGEND_WIDTH, y + 1.0]);

            if i % LEGEND_LABEL_EVERY == 0 {
                let value = self.legend_value(registry, mode, proportion);
                canvas.set_fill(Colour::BLACK);
                canvas.draw_text([x - 30.0, y], 12.0, &format!("{value:.2}"));

                canvas.set_stroke(Colour::BLACK);
                canvas.set_stroke_weight(1.0);
                canvas.draw_line([x - 5.0, y], [x + 5.0, y]);
                canvas.set_stroke_weight(0.0);
            }
        }

        Ok(())
    }

    fn draw_instructions(&self, canvas: &mut impl Canvas, state: &ViewState) {
        let right = self.width / 2.0 + 100.0;

        canvas.set_fill(Colour::BLACK);
        canvas.draw_text(
            [100.0, 200.0],
            22.0,
            &format!("Current Display: {}", share_title(state.mode())),
        );
        canvas.draw_text([100.0, 225.0], 16.0, "Press 'C' to switch");

        canvas.draw_text([right, 200.0], 22.0, &format!("Year: {}", state.year()));
        canvas.draw_text([right, 225.0], 12.0, "Arrow Keys (L), (R) to Change Year");
        let autoplay = if state.autoplay() {
            "Press 'P' to stop autoplay"
        } else {
            "Press 'P' for autoplay"
        };
        canvas.draw_text([right, 235.0], 12.0, autoplay);

        canvas.draw_text([100.0, 45.0], 24.0, TITLE);
        canvas.draw_text([100.0, 75.0], 20.0, SUBTITLE);
        canvas.draw_text([100.0, 95.0], 12.0, NOTE);
    }
}
