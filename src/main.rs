//! FacultyScope - Faculty Research Metrics Dashboard
//!
//! Ingests the ECE and CSE research-output files, reconciles them into one
//! canonical table, and shows aggregate and per-professor visualizations.

mod charts;
mod data;
mod gui;
mod stats;

use eframe::egui;
use gui::FacultyScopeApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("FacultyScope"),
        ..Default::default()
    };

    eframe::run_native(
        "FacultyScope",
        options,
        Box::new(|cc| Ok(Box::new(FacultyScopeApp::new(cc)))),
    )
}
