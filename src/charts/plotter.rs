//! Chart Plotter Module
//! Shapes a dashboard view into chart datasets and draws them with egui_plot.

use crate::data::{ClinicSummary, YearRange};
use crate::stats::DashboardView;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

/// Per-clinic series colors, in clinic order.
pub const PALETTE: [Color32; 6] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
];

/// One point of a deaths-over-time line, with tooltip fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub deaths: u64,
    pub births: u64,
    pub mortality_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeathSeries {
    pub clinic: String,
    pub points: Vec<SeriesPoint>,
}

/// Chart-ready data for one selected range.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub range: YearRange,
    /// Bar chart rows, one per clinic.
    pub bars: Vec<ClinicSummary>,
    /// Line chart series, one per clinic, years ascending.
    pub series: Vec<DeathSeries>,
}

impl ChartData {
    pub fn from_view(view: &DashboardView) -> Self {
        let mut series: Vec<DeathSeries> = Vec::new();

        for record in &view.records {
            let point = SeriesPoint {
                year: record.year,
                deaths: record.deaths,
                births: record.births,
                mortality_rate: record.mortality_rate,
            };
            match series.iter_mut().find(|s| s.clinic == record.clinic) {
                Some(s) => s.points.push(point),
                None => series.push(DeathSeries {
                    clinic: record.clinic.clone(),
                    points: vec![point],
                }),
            }
        }

        for s in &mut series {
            s.points.sort_by_key(|p| p.year);
        }

        Self {
            range: view.range,
            bars: view.summaries.clone(),
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn max_rate(&self) -> f64 {
        self.bars
            .iter()
            .map(|b| b.mortality_rate)
            .fold(0.0, f64::max)
    }

    pub fn max_deaths(&self) -> u64 {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.deaths))
            .max()
            .unwrap_or(0)
    }

    /// Look up the point behind a hovered line position.
    pub fn point_at(&self, clinic: &str, year: i32) -> Option<&SeriesPoint> {
        self.series
            .iter()
            .find(|s| s.clinic == clinic)?
            .points
            .iter()
            .find(|p| p.year == year)
    }
}

/// Draws the interactive dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn get_clinic_color(clinic_index: usize) -> Color32 {
        PALETTE[clinic_index % PALETTE.len()]
    }

    /// Bar chart of the mortality rate per clinic.
    /// X-axis: clinics, Y-axis: deaths / births over the range
    pub fn draw_bar_chart(ui: &mut egui::Ui, data: &ChartData, height: f32) {
        let labels: Vec<String> = data.bars.iter().map(|b| b.clinic.clone()).collect();
        let hover_bars = data.bars.clone();

        let bars: Vec<Bar> = data
            .bars
            .iter()
            .enumerate()
            .map(|(i, summary)| {
                let color = Self::get_clinic_color(i);
                Bar::new(i as f64, summary.mortality_rate)
                    .name(&summary.clinic)
                    .width(0.6)
                    .fill(color.gamma_multiply(0.8))
                    .stroke(egui::Stroke::new(1.5, color))
            })
            .collect();

        let chart = BarChart::new(bars)
            .name("Mortality rate")
            .element_formatter(Box::new(move |bar, _chart| {
                let idx = bar.argument.round() as usize;
                match hover_bars.get(idx) {
                    Some(s) => format!(
                        "{}\nBirths: {}\nDeaths: {}\nRate: {:.4}",
                        s.clinic, s.total_births, s.total_deaths, s.mortality_rate
                    ),
                    None => String::new(),
                }
            }));

        Plot::new(format!("mortality_bars_{}", data.range))
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .include_y(data.max_rate() * 1.15)
            .x_axis_label("Clinic")
            .y_axis_label("Mortality rate (deaths / births)")
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if (v - v.round()).abs() > 1e-6 || v < 0.0 {
                    return String::new();
                }
                labels.get(v.round() as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(chart);
            });
    }

    /// Line chart of deaths per year, one line per clinic.
    pub fn draw_deaths_chart(ui: &mut egui::Ui, data: &ChartData, height: f32) {
        let hover_data = data.clone();

        Plot::new(format!("deaths_over_time_{}", data.range))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .include_y(0.0)
            .include_x(data.range.start() as f64 - 0.5)
            .include_x(data.range.end() as f64 + 0.5)
            .x_axis_label("Year")
            .y_axis_label("Number of deaths")
            .x_axis_formatter(|mark, _range| {
                let v = mark.value;
                if (v - v.round()).abs() > 1e-6 {
                    String::new()
                } else {
                    format!("{:.0}", v)
                }
            })
            .label_formatter(move |name, value| {
                let year = value.x.round() as i32;
                match hover_data.point_at(name, year) {
                    Some(p) => format!(
                        "{}\nYear: {}\nBirths: {}\nDeaths: {}\nRate: {:.4}",
                        name, p.year, p.births, p.deaths, p.mortality_rate
                    ),
                    None => format!("Year: {:.0}\nDeaths: {:.0}", value.x, value.y),
                }
            })
            .show(ui, |plot_ui| {
                for (i, series) in data.series.iter().enumerate() {
                    let color = Self::get_clinic_color(i);
                    let points: Vec<[f64; 2]> = series
                        .points
                        .iter()
                        .map(|p| [p.year as f64, p.deaths as f64])
                        .collect();

                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(points.iter().copied()))
                            .color(color)
                            .width(2.0)
                            .name(&series.clinic),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(points.iter().copied()))
                            .radius(4.0)
                            .color(color)
                            .name(&series.clinic),
                    );
                }
            });
    }

    /// Per-clinic totals table
    pub fn draw_summary_table(ui: &mut egui::Ui, data: &ChartData) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id("clinic_summary_table"))
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Clinic", "Total births", "Total deaths", "Mortality rate"] {
                            ui.label(RichText::new(header).strong().size(12.0));
                        }
                        ui.end_row();

                        for (i, s) in data.bars.iter().enumerate() {
                            ui.label(
                                RichText::new(&s.clinic)
                                    .size(12.0)
                                    .color(Self::get_clinic_color(i)),
                            );
                            ui.label(RichText::new(s.total_births.to_string()).size(12.0));
                            ui.label(RichText::new(s.total_deaths.to_string()).size(12.0));
                            ui.label(RichText::new(format!("{:.4}", s.mortality_rate)).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    }
}
