//! Calendar heatmaps: a grid of day cells colored by intensity, laid out as a
//! week, a month, or a year.
//!
//! The core is independent of any renderer:
//!
//! - [`calendar::layout`] pads periods to whole weeks & places cells in the
//!   grid
//! - [`level`] maps day values to level classes
//! - [`locale`] supplies localized month & weekday names
//! - [`tooltip`] manages the lifecycle of tooltips shared across cells
//!
//! [`heatmap::HeatmapView`] combines these into a render model, which
//! [`calendar::HeatmapCalendar`] draws with `ratatui`.
pub mod calendar;
pub mod config;
pub mod heatmap;
pub mod level;
pub mod locale;
pub mod model;
pub mod options;
pub mod theme;
pub mod tooltip;
