//! Control Panel Widget
//! Left side panel with data source, year range and export controls.

use crate::data::{DataError, DataProcessor, YearRange};
use crate::settings::AppSettings;
use egui::{Color32, RichText};

/// Left side control panel with file selection and range controls.
pub struct ControlPanel {
    pub settings: AppSettings,
    /// Observed span of the loaded data; `None` until a file is loaded.
    pub span: Option<YearRange>,
    pub start_year: i32,
    pub end_year: i32,
    pub row_count: usize,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            settings,
            span: None,
            start_year: 0,
            end_year: 0,
            row_count: 0,
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }

    /// Install a freshly loaded data span and pick the initial selection:
    /// the remembered range when it still overlaps, else the default window.
    pub fn set_span(&mut self, span: YearRange, row_count: usize) {
        self.span = Some(span);
        self.row_count = row_count;

        let remembered = self
            .settings
            .year_range
            .and_then(|(start, end)| YearRange::new(start, end).ok())
            .filter(|r| r.overlaps(&span))
            .map(|r| r.clamp_to(&span));

        let initial = remembered.unwrap_or_else(|| DataProcessor::default_range(span));
        self.start_year = initial.start();
        self.end_year = initial.end();
    }

    /// Current slider selection. Fails when start is after end.
    pub fn selected_range(&self) -> Result<YearRange, DataError> {
        YearRange::new(self.start_year, self.end_year)
    }

    /// Names the years the reset button actually selects for `span`.
    pub fn reset_label(span: YearRange) -> String {
        format!("Reset to {}", DataProcessor::default_range(span))
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🏥 Clinic Mortality")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Vienna General Hospital")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
                if self.span.is_some() {
                    ui.label(
                        RichText::new(format!("{} rows", self.row_count))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year Range Section =====
        ui.label(RichText::new("📅 Year Range").size(14.0).strong());
        ui.add_space(5.0);

        match self.span {
            Some(span) => {
                let start = ui.add(
                    egui::Slider::new(&mut self.start_year, span.start()..=span.end())
                        .text("Start"),
                );
                let end = ui.add(
                    egui::Slider::new(&mut self.end_year, span.start()..=span.end()).text("End"),
                );
                if start.changed() || end.changed() {
                    action = ControlPanelAction::RangeChanged;
                }

                ui.add_space(5.0);
                if ui.small_button(Self::reset_label(span)).clicked() {
                    action = ControlPanelAction::ResetRange;
                }
            }
            None => {
                ui.label(RichText::new("Load a file first").color(Color32::GRAY));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let png_button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(png_button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }

                ui.add_space(6.0);

                let json_button = egui::Button::new(RichText::new("📄 Export JSON").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(json_button).clicked() {
                    action = ControlPanelAction::ExportJson;
                }
            });
            ui.checkbox(&mut self.settings.open_after_export, "Open after export");
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.progress >= 100.0 {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }

    pub fn set_error(&mut self, error: &str) {
        self.set_progress(0.0, &format!("Error: {}", error));
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    RangeChanged,
    ResetRange,
    ExportPng,
    ExportJson,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_uses_default_window() {
        let mut panel = ControlPanel::new(AppSettings::default());
        panel.set_span(YearRange::new(1833, 1858).unwrap(), 52);

        assert_eq!(panel.selected_range().unwrap(), YearRange::new(1841, 1846).unwrap());
    }

    #[test]
    fn test_span_restores_remembered_range() {
        let settings = AppSettings {
            year_range: Some((1843, 1850)),
            ..AppSettings::default()
        };
        let mut panel = ControlPanel::new(settings);
        panel.set_span(YearRange::new(1841, 1846).unwrap(), 12);

        assert_eq!(panel.selected_range().unwrap(), YearRange::new(1843, 1846).unwrap());
    }

    #[test]
    fn test_span_ignores_disjoint_remembered_range() {
        let settings = AppSettings {
            year_range: Some((1900, 1910)),
            ..AppSettings::default()
        };
        let mut panel = ControlPanel::new(settings);
        panel.set_span(YearRange::new(1841, 1846).unwrap(), 12);

        assert_eq!(panel.selected_range().unwrap(), YearRange::new(1841, 1846).unwrap());
    }

    #[test]
    fn test_crossed_sliders_are_an_error() {
        let mut panel = ControlPanel::new(AppSettings::default());
        panel.set_span(YearRange::new(1841, 1846).unwrap(), 12);
        panel.start_year = 1845;
        panel.end_year = 1842;

        assert!(panel.selected_range().is_err());
    }

    #[test]
    fn test_reset_label_follows_clamped_window() {
        assert_eq!(
            ControlPanel::reset_label(YearRange::new(1833, 1858).unwrap()),
            "Reset to 1841–1846"
        );
        assert_eq!(
            ControlPanel::reset_label(YearRange::new(1844, 1850).unwrap()),
            "Reset to 1844–1846"
        );
        assert_eq!(
            ControlPanel::reset_label(YearRange::new(1900, 1905).unwrap()),
            "Reset to 1900–1905"
        );
    }

    #[test]
    fn test_set_error_prefixes_status() {
        let mut panel = ControlPanel::new(AppSettings::default());
        panel.set_error("boom");
        assert_eq!(panel.status, "Error: boom");
        assert_eq!(panel.progress, 0.0);
    }
}
