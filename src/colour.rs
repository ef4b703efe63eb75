//! Colours and the proportion-to-colour encoding used for the choropleth.
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// An opaque 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Colour {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Colour {
    /// Pure white, the colour of a zero proportion
    pub const WHITE: Colour = Colour::new(255, 255, 255);
    /// Pure black
    pub const BLACK: Colour = Colour::new(0, 0, 0);

    /// Create a colour from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a colour identity of the form `#RRGGBB` (the leading `#` is optional)
    pub fn from_hex(s: &str) -> Result<Self, ColourError> {
        let invalid = || ColourError::InvalidHex(s.to_string());
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl FromStr for Colour {
    type Err = ColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Colour {
    type Error = ColourError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A caller passed a value the colour code cannot represent
#[derive(Debug, Clone, PartialEq)]
pub enum ColourError {
    /// A proportion outside the closed unit interval (or NaN)
    InvalidProportion(f64),
    /// A colour identity that is not of the form `#RRGGBB`
    InvalidHex(String),
}

impl fmt::Display for ColourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidProportion(p) => write!(f, "Proportion must be between 0 and 1, got {p}"),
            Self::InvalidHex(s) => {
                write!(f, "Invalid colour '{s}': expected six hex digits, e.g. #DB4C00")
            }
        }
    }
}

impl Error for ColourError {}

/// Blend linearly from white (at `proportion = 0`) to `target` (at `proportion = 1`).
///
/// Each channel is `round(255 * (1 - p) + target * p)`. Proportions are expected to have been
/// clamped already, so anything outside `[0, 1]` is rejected rather than clamped here.
pub fn encode(proportion: f64, target: Colour) -> Result<Colour, ColourError> {
    if !(0.0..=1.0).contains(&proportion) {
        return Err(ColourError::InvalidProportion(proportion));
    }

    let blend = |channel: u8| {
        (255.0 * (1.0 - proportion) + f64::from(channel) * proportion).round() as u8
    };

    Ok(Colour::new(blend(target.r), blend(target.g), blend(target.b)))
}
