//! An interactive choropleth of renewable energy shares in U.S. states, 1960-2022.
#![warn(missing_docs)]
pub mod atlas;
pub mod canvas;
pub mod cli;
pub mod colour;
pub mod config;
pub mod controls;
pub mod id;
pub mod input;
pub mod locator;
pub mod log;
pub mod metrics;
pub mod playback;
pub mod projection;
pub mod region;
pub mod render;
pub mod settings;
pub mod units;
pub mod window;
pub mod year;

#[cfg(test)]
mod fixture;
