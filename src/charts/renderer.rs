//! Static Chart Renderer
//! Writes the two dashboard charts to PNG files with plotters.
//!
//! Output per export:
//! 1. `mortality_by_clinic_<start>_<end>.png` - bar chart of the range rate per clinic
//! 2. `deaths_over_time_<start>_<end>.png` - one line of yearly deaths per clinic

use crate::charts::ChartData;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Series colors, same order as the on-screen palette
const SERIES_COLORS: [RGBColor; 6] = [
    RGBColor(231, 76, 60),
    RGBColor(52, 152, 219),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(243, 156, 18),
    RGBColor(26, 188, 156),
];

pub const DEFAULT_SIZE: (u32, u32) = (1200, 800);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to render for the selected range")]
    NoData,
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Cannot write to {0}")]
    Io(#[from] std::io::Error),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render both charts into `dir`, returning the written paths.
    pub fn export_all(
        data: &ChartData,
        dir: &Path,
        size: (u32, u32),
    ) -> Result<Vec<PathBuf>, RenderError> {
        if data.is_empty() {
            return Err(RenderError::NoData);
        }
        std::fs::create_dir_all(dir)?;

        let (bar_name, line_name) = Self::file_names(data);
        let bar_path = dir.join(bar_name);
        let line_path = dir.join(line_name);

        Self::render_bar_chart(data, &bar_path, size)?;
        Self::render_deaths_chart(data, &line_path, size)?;

        tracing::info!(
            "Exported charts to {} and {}",
            bar_path.display(),
            line_path.display()
        );
        Ok(vec![bar_path, line_path])
    }

    pub fn file_names(data: &ChartData) -> (String, String) {
        let (start, end) = (data.range.start(), data.range.end());
        (
            format!("mortality_by_clinic_{}_{}.png", start, end),
            format!("deaths_over_time_{}_{}.png", start, end),
        )
    }

    fn series_color(idx: usize) -> RGBColor {
        SERIES_COLORS[idx % SERIES_COLORS.len()]
    }

    /// Upper bound of the rate axis with headroom above the tallest bar.
    pub fn rate_axis_max(data: &ChartData) -> f64 {
        let max = data.max_rate();
        if max <= 0.0 {
            0.1
        } else {
            max * 1.15
        }
    }

    pub fn deaths_axis_max(data: &ChartData) -> f64 {
        let max = data.max_deaths() as f64;
        if max <= 0.0 {
            10.0
        } else {
            (max * 1.15).ceil()
        }
    }

    pub fn render_bar_chart(
        data: &ChartData,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        if data.is_empty() {
            return Err(RenderError::NoData);
        }

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let n = data.bars.len() as i32;
        let labels: Vec<String> = data.bars.iter().map(|b| b.clinic.clone()).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Mortality rate by clinic, {}", data.range),
                ("sans-serif", 28),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..Self::rate_axis_max(data))
            .map_err(draw_err)?;

        let x_formatter = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i as usize).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Clinic")
            .y_desc("Mortality rate (deaths / births)")
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&|v: &f64| format!("{:.2}", v))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(data.bars.iter().enumerate().map(|(i, bar)| {
                let x = i as i32;
                let mut rect = Rectangle::new(
                    [
                        (SegmentValue::Exact(x), 0.0),
                        (SegmentValue::Exact(x + 1), bar.mortality_rate),
                    ],
                    Self::series_color(i).filled(),
                );
                rect.set_margin(0, 0, 40, 40);
                rect
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    pub fn render_deaths_chart(
        data: &ChartData,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let x_min = data.range.start() as f64 - 0.5;
        let x_max = data.range.end() as f64 + 0.5;
        let year_count = (data.range.end() - data.range.start() + 1) as usize;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Deaths over time, {}", data.range),
                ("sans-serif", 28),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, 0f64..Self::deaths_axis_max(data))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Number of deaths")
            .x_labels(year_count.min(12) + 1)
            .x_label_formatter(&|x: &f64| {
                if (x - x.round()).abs() < 1e-6 {
                    format!("{:.0}", x)
                } else {
                    String::new()
                }
            })
            .y_label_formatter(&|y: &f64| format!("{:.0}", y))
            .draw()
            .map_err(draw_err)?;

        for (i, series) in data.series.iter().enumerate() {
            let color = Self::series_color(i);
            let points: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|p| (p.year as f64, p.deaths as f64))
                .collect();

            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(3)))
                .map_err(draw_err)?
                .label(series.clinic.clone())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
                });

            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 5, color.filled())),
                )
                .map_err(draw_err)?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}
