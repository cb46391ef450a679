//! Chart Viewer Widget
//! Central scrollable panel: yearly table, mortality bar chart, deaths line
//! chart and the written findings.

use crate::charts::{ChartData, ChartPlotter};
use crate::stats::DashboardView;
use egui::{Color32, RichText, ScrollArea};

const CHART_HEIGHT: f32 = 360.0;
const SECTION_SPACING: f32 = 18.0;

const INTRO: &str = "In the early 1840s, Dr. Ignaz Semmelweis noticed that Clinic 1 had far more \
maternal deaths than Clinic 2, even though both clinics were part of the same hospital. \
Use the year range on the left to explore how deadly each clinic was across different years.";

const FINDINGS: [&str; 3] = [
    "For most year ranges, Clinic 1 shows a higher mortality rate than Clinic 2.",
    "Both clinics served similar patients, but Clinic 1 was staffed by doctors who often \
     moved from autopsies straight to deliveries without washing their hands.",
    "Sliding across the years shows the gap is not one bad year but a persistent pattern, \
     the evidence Semmelweis used to argue for hand hygiene.",
];

/// Holds the last successfully built view. A failed recompute never touches it.
#[derive(Default)]
pub struct ChartViewer {
    pub view: Option<DashboardView>,
    pub chart_data: Option<ChartData>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.view = None;
        self.chart_data = None;
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.chart_data = Some(ChartData::from_view(&view));
        self.view = Some(view);
    }

    pub fn show(&mut self, _ctx: &egui::Context, ui: &mut egui::Ui) {
        let (Some(view), Some(data)) = (&self.view, &self.chart_data) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(
                    RichText::new("Deadlier Than Expected: Clinic 1's Shocking Numbers")
                        .size(24.0)
                        .strong(),
                );
                ui.add_space(6.0);
                ui.label(INTRO);
                ui.add_space(SECTION_SPACING);

                ui.label(
                    RichText::new(format!("Yearly Data for Selected Range: {}", view.range))
                        .size(18.0)
                        .strong(),
                );
                ui.add_space(6.0);
                Self::draw_records_table(ui, view);
                ui.add_space(SECTION_SPACING);

                ui.label(
                    RichText::new("Clinic 1 vs Clinic 2: How Deadly Were They?")
                        .size(18.0)
                        .strong(),
                );
                ui.add_space(6.0);
                if data.is_empty() {
                    ui.label(
                        RichText::new("No records in the selected years").color(Color32::GRAY),
                    );
                } else {
                    ChartPlotter::draw_bar_chart(ui, data, CHART_HEIGHT);
                    ui.add_space(6.0);
                    ChartPlotter::draw_summary_table(ui, data);
                }
                ui.add_space(SECTION_SPACING);

                ui.label(
                    RichText::new("Deaths Over Time in Selected Years")
                        .size(18.0)
                        .strong(),
                );
                ui.add_space(6.0);
                ChartPlotter::draw_deaths_chart(ui, data, CHART_HEIGHT);
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("What do we learn from this?").size(18.0).strong());
                ui.add_space(6.0);
                for finding in FINDINGS {
                    ui.horizontal_wrapped(|ui| {
                        ui.label("•");
                        ui.label(finding);
                    });
                }
                ui.add_space(SECTION_SPACING);
            });
    }

    fn draw_records_table(ui: &mut egui::Ui, view: &DashboardView) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("records_table_{}", view.range)))
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["year", "clinic", "births", "deaths", "mortality_rate"] {
                            ui.label(RichText::new(header).strong().size(12.0));
                        }
                        ui.end_row();

                        for r in &view.records {
                            ui.label(RichText::new(r.year.to_string()).size(12.0));
                            ui.label(RichText::new(&r.clinic).size(12.0));
                            ui.label(RichText::new(r.births.to_string()).size(12.0));
                            ui.label(RichText::new(r.deaths.to_string()).size(12.0));
                            ui.label(RichText::new(format!("{:.4}", r.mortality_rate)).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    }
}
