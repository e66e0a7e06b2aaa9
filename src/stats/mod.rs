//! Statistics module - aggregations behind the dashboard views

mod calculator;

pub use calculator::{BoxStats, Overview, StatsCalculator, TTest, SIGNIFICANCE_THRESHOLD};
