//! Edge detection for keyboard and mouse input.
//!
//! Input sources identify themselves by name (`"left"`, `"right"`, `"c"`, `"p"`), whether they
//! come from held-key polling or from press callbacks. [`InputEdges`] reduces both to discrete
//! presses once per frame so that holding a key down never repeats its action.
use indexmap::IndexSet;
use std::collections::HashSet;
use strum::{Display, EnumString};

/// The actions the map responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Control {
    /// Go back a year
    #[strum(serialize = "left")]
    StepBack,
    /// Go forward a year
    #[strum(serialize = "right")]
    StepForward,
    /// Switch between production and consumption
    #[strum(serialize = "c", ascii_case_insensitive)]
    ToggleMode,
    /// Start or stop autoplay
    #[strum(serialize = "p", ascii_case_insensitive)]
    ToggleAutoplay,
}

/// Everything the input surface reported for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Pointer position in pixels, if the pointer is over the window
    pub pointer: Option<[f64; 2]>,
    /// Names of the keys and buttons held down at the end of the frame
    pub held: HashSet<String>,
    /// Names from press callbacks delivered during the frame, in order
    pub presses: Vec<String>,
}

impl InputSnapshot {
    /// A snapshot with only a pointer position
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            pointer: Some([x, y]),
            ..Self::default()
        }
    }

    /// Add a press callback for `name`
    pub fn press(mut self, name: &str) -> Self {
        self.presses.push(name.to_string());
        self
    }

    /// Mark `name` as held down
    pub fn hold(mut self, name: &str) -> Self {
        self.held.insert(name.to_string());
        self
    }
}

/// Tracks held inputs between frames and reports not-pressed → pressed transitions
#[derive(Debug, Clone, Default)]
pub struct InputEdges {
    previously_held: HashSet<Control>,
}

impl InputEdges {
    /// Compute this frame's presses.
    ///
    /// A control counts as pressed if a press callback named it, or if it is held now but was
    /// not held in the previous frame. Each control is reported at most once per frame. Names
    /// that are not controls are ignored.
    pub fn update(&mut self, snapshot: &InputSnapshot) -> Vec<Control> {
        let held: HashSet<Control> = snapshot
            .held
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect();

        let mut pressed: IndexSet<Control> = snapshot
            .presses
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect();
        for control in &held {
            if !self.previously_held.contains(control) {
                pressed.insert(*control);
            }
        }

        self.previously_held = held;
        pressed.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("left", Control::StepBack)]
    #[case("right", Control::StepForward)]
    #[case("c", Control::ToggleMode)]
    #[case("P", Control::ToggleAutoplay)]
    fn test_control_from_name(#[case] name: &str, #[case] expected: Control) {
        assert_eq!(name.parse::<Control>().unwrap(), expected);
    }

    #[test]
    fn test_held_key_fires_once() {
        let mut edges = InputEdges::default();
        let held = InputSnapshot::default().hold("right");
        assert_eq!(edges.update(&held), [Control::StepForward]);
        for _ in 0..10 {
            assert!(edges.update(&held).is_empty());
        }

        // Release and press again
        assert!(edges.update(&InputSnapshot::default()).is_empty());
        assert_eq!(edges.update(&held), [Control::StepForward]);
    }

    #[test]
    fn test_press_and_hold_in_same_frame_counts_once() {
        let mut edges = InputEdges::default();
        let snapshot = InputSnapshot::default().press("left").hold("left");
        assert_eq!(edges.update(&snapshot), [Control::StepBack]);
    }

    #[test]
    fn test_click_without_hold() {
        // A click can start and finish inside a single frame
        let mut edges = InputEdges::default();
        let snapshot = InputSnapshot::default().press("c");
        assert_eq!(edges.update(&snapshot), [Control::ToggleMode]);
        assert!(edges.update(&InputSnapshot::default()).is_empty());
    }

    #[test]
    fn test_unknown_names_ignored() {
        let mut edges = InputEdges::default();
        let snapshot = InputSnapshot::default().press("space").hold("shift");
        assert!(edges.update(&snapshot).is_empty());
    }

    #[test]
    fn test_presses_keep_order() {
        let mut edges = InputEdges::default();
        let snapshot = InputSnapshot::default().press("p").press("c").press("p");
        assert_eq!(
            edges.update(&snapshot),
            [Control::ToggleAutoplay, Control::ToggleMode]
        );
    }
}
