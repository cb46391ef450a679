//! Charts module - Chart data shaping and rendering

mod plotter;
mod renderer;

pub use plotter::{ChartData, ChartPlotter};
pub use renderer::{StaticChartRenderer, DEFAULT_SIZE};
