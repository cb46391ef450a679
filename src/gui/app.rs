//! Clinic Mortality Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{ChartData, StaticChartRenderer, DEFAULT_SIZE};
use crate::data::{DataLoader, DataProcessor, Dataset};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::settings::AppSettings;
use crate::stats::StatsCalculator;
use anyhow::Context;
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Complete { dataset: Dataset, path: PathBuf },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    dataset: Option<Dataset>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        let startup_csv = settings.startup_csv();
        let mut app = Self {
            dataset: None,
            control_panel: ControlPanel::new(settings),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };

        if let Some(path) = startup_csv {
            app.start_load(path);
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    /// Load a CSV in a background thread
    fn start_load(&mut self, path: PathBuf) {
        self.control_panel.set_progress(10.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = match DataLoader::load_csv(&path) {
                Ok(dataset) => LoadResult::Complete { dataset, path },
                Err(e) => {
                    tracing::error!("Failed to load {}: {}", path.display(), e);
                    LoadResult::Error(e.to_string())
                }
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete { dataset, path }) => {
                self.is_loading = false;
                self.install_dataset(dataset, path);
            }
            Ok(LoadResult::Error(error)) => {
                // The previously loaded data, if any, stays on screen.
                self.is_loading = false;
                self.control_panel.set_error(&error);
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.is_loading = false;
                self.control_panel.set_error("loader thread stopped unexpectedly");
            }
        }
    }

    fn install_dataset(&mut self, dataset: Dataset, path: PathBuf) {
        self.control_panel.set_span(dataset.year_span(), dataset.len());
        self.control_panel.settings.csv_path = Some(path);
        self.chart_viewer.clear();
        self.dataset = Some(dataset);
        self.recompute();
    }

    /// Rebuild the view for the current slider selection. On failure the
    /// previous view is left in place and only the status line changes.
    fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.control_panel.set_error("No data loaded");
            return;
        };

        let result = self
            .control_panel
            .selected_range()
            .and_then(|range| StatsCalculator::build_view(dataset, range));

        match result {
            Ok(view) => {
                let status = format!(
                    "{}: {} rows, {} clinics",
                    view.range,
                    view.records.len(),
                    view.summaries.len()
                );
                self.control_panel.settings.year_range =
                    Some((view.range.start(), view.range.end()));
                self.chart_viewer.set_view(view);
                self.control_panel.export_enabled = true;
                self.control_panel.set_progress(100.0, &status);
                self.save_settings();
            }
            Err(e) => {
                tracing::warn!("Keeping previous view ({:?} error): {}", e.kind(), e);
                self.control_panel.set_error(&e.to_string());
            }
        }
    }

    fn handle_reset_range(&mut self) {
        if let Some(dataset) = &self.dataset {
            let range = DataProcessor::default_range(dataset.year_span());
            self.control_panel.start_year = range.start();
            self.control_panel.end_year = range.end();
            self.recompute();
        }
    }

    /// Render both charts to PNG files in a chosen folder
    fn handle_export_png(&mut self) {
        let Some(view) = &self.chart_viewer.view else {
            self.control_panel.set_error("No charts to export");
            return;
        };
        let data = ChartData::from_view(view);

        let Some(dir) = rfd::FileDialog::new()
            .set_directory(self.control_panel.settings.export_dir())
            .pick_folder()
        else {
            return;
        };

        self.control_panel.set_progress(50.0, "Rendering charts...");

        match StaticChartRenderer::export_all(&data, &dir, DEFAULT_SIZE) {
            Ok(paths) => {
                self.control_panel
                    .set_progress(100.0, &format!("Exported {} charts", paths.len()));
                self.control_panel.settings.export_dir = Some(dir);
                self.save_settings();
                if self.control_panel.settings.open_after_export {
                    if let Some(first) = paths.first() {
                        if let Err(e) = open::that(first) {
                            tracing::warn!("Could not open {}: {}", first.display(), e);
                        }
                    }
                }
            }
            Err(e) => {
                tracing::error!("Chart export failed: {}", e);
                self.control_panel.set_error(&e.to_string());
            }
        }
    }

    /// Write the current table and summaries as JSON
    fn handle_export_json(&mut self) {
        let Some(view) = &self.chart_viewer.view else {
            self.control_panel.set_error("Nothing to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_directory(self.control_panel.settings.export_dir())
            .set_file_name(format!(
                "clinic_mortality_{}_{}.json",
                view.range.start(),
                view.range.end()
            ))
            .save_file()
        else {
            return;
        };

        match view.write_json(&path) {
            Ok(()) => {
                self.control_panel
                    .set_progress(100.0, &format!("Exported {}", path.display()));
            }
            Err(e) => {
                tracing::error!("JSON export failed: {:#}", e);
                self.control_panel.set_error(&format!("{:#}", e));
            }
        }
    }

    fn save_settings(&self) {
        if let Err(e) = self
            .control_panel
            .settings
            .save()
            .context("Failed to save settings")
        {
            tracing::warn!("{:#}", e);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(330.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::RangeChanged => self.recompute(),
                        ControlPanelAction::ResetRange => self.handle_reset_range(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ctx, ui);
        });
    }
}
