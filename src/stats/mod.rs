//! Stats module - Per-clinic aggregation

mod calculator;

pub use calculator::{DashboardView, StatsCalculator};
