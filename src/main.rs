//! Clinic Mortality Dashboard
//!
//! Loads yearly births and deaths per clinic, filters them by a year range and
//! charts the mortality rate of each clinic.

mod charts;
mod data;
mod gui;
mod settings;
mod stats;

use eframe::egui;
use gui::DashboardApp;
use settings::AppSettings;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` overrides the default `info` level.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn main() -> eframe::Result<()> {
    setup_logging();

    let settings = AppSettings::load();
    tracing::info!(
        "Clinic Mortality Dashboard v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 850.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Clinic Mortality Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Clinic Mortality Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, settings)))),
    )
}
