//! Charts module - chart rendering

mod plotter;

pub use plotter::{ChartPlotter, CSE_COLOR, ECE_COLOR};
