//! The playback state machine: current year, display mode and autoplay.
//!
//! [`Playback`] is the only owner of the [`ViewState`]. Everything else reads it through
//! [`Playback::state`]; it changes only through the transition methods below.
use crate::controls::{Control, InputEdges, InputSnapshot};
use crate::year::YearRange;
use log::debug;
use std::time::Duration;
use strum::Display;

/// Which share the map is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Mode {
    /// Renewable share of total energy production
    #[strum(serialize = "production")]
    Production,
    /// Renewable share of total energy consumption
    #[strum(serialize = "consumption")]
    Consumption,
}

impl Mode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            Self::Production => Self::Consumption,
            Self::Consumption => Self::Production,
        }
    }
}

/// What the renderer needs to know about the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    year: u32,
    mode: Mode,
    autoplay: bool,
}

impl ViewState {
    /// The year being shown
    pub fn year(&self) -> u32 {
        self.year
    }

    /// The share being shown
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether years are currently advancing on their own
    pub fn autoplay(&self) -> bool {
        self.autoplay
    }
}

/// Default time between years while autoplaying
pub const DEFAULT_AUTOPLAY_INTERVAL: Duration = Duration::from_millis(200);

/// Owns the [`ViewState`] and applies input and timer events to it
#[derive(Debug, Clone)]
pub struct Playback {
    state: ViewState,
    years: YearRange,
    edges: InputEdges,
    interval: Duration,
    elapsed: Duration,
}

impl Playback {
    /// Start at the first year, showing consumption, with autoplay off
    pub fn new(years: YearRange, interval: Duration) -> Self {
        Self {
            state: ViewState {
                year: years.first(),
                mode: Mode::Consumption,
                autoplay: false,
            },
            years,
            edges: InputEdges::default(),
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// The current view
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Run one frame's input through edge detection and apply the resulting presses
    pub fn handle_input(&mut self, snapshot: &InputSnapshot) {
        for control in self.edges.update(snapshot) {
            self.apply(control);
        }
    }

    /// Apply a single discrete press
    pub fn apply(&mut self, control: Control) {
        match control {
            Control::StepBack => self.step_back(),
            Control::StepForward => self.step_forward(),
            Control::ToggleMode => self.toggle_mode(),
            Control::ToggleAutoplay => self.toggle_autoplay(),
        }
    }

    /// Flip between production and consumption
    pub fn toggle_mode(&mut self) {
        self.state.mode = self.state.mode.toggled();
        debug!("Switched to {} mode", self.state.mode);
    }

    /// Start or stop autoplay.
    ///
    /// Starting at the last year rewinds to the first year so that the animation plays again.
    pub fn toggle_autoplay(&mut self) {
        if self.state.autoplay {
            self.state.autoplay = false;
            debug!("Autoplay stopped at {}", self.state.year);
            return;
        }

        if self.state.year == self.years.last() {
            self.state.year = self.years.first();
        }
        self.state.autoplay = true;
        self.elapsed = Duration::ZERO;
        debug!("Autoplay started from {}", self.state.year);
    }

    /// Go back one year, stopping at the first
    pub fn step_back(&mut self) {
        self.state.year = self.years.previous(self.state.year);
    }

    /// Go forward one year, stopping at the last
    pub fn step_forward(&mut self) {
        self.state.year = self.years.next(self.state.year);
    }

    /// Let wall-clock time pass.
    ///
    /// While autoplay is on, the year advances once per interval. Reaching the last year turns
    /// autoplay off.
    pub fn advance(&mut self, dt: Duration) {
        if !self.state.autoplay {
            return;
        }

        self.elapsed += dt;
        while self.state.autoplay && self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.autoplay_tick();
        }
    }

    fn autoplay_tick(&mut self) {
        self.step_forward();
        if self.state.year == self.years.last() {
            self.state.autoplay = false;
            self.elapsed = Duration::ZERO;
            debug!("Autoplay finished at {}", self.state.year);
        }
    }
}
