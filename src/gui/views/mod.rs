//! View modules - the four dashboard pages

mod comparison;
mod overview;
mod profile;
mod rankings;

pub use comparison::ComparisonView;
pub use overview::OverviewView;
pub use profile::ProfileView;
pub use rankings::RankingsView;

use egui::{Color32, RichText};

/// One headline number in a rounded card.
pub(crate) fn metric_card(ui: &mut egui::Ui, label: &str, value: String) {
    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(8.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                ui.label(RichText::new(value).size(20.0).strong());
            });
        });
}

pub(crate) fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.add_space(5.0);
    ui.label(RichText::new(text).size(18.0).strong());
    ui.add_space(8.0);
}

pub(crate) fn error_label(ui: &mut egui::Ui, err: impl std::fmt::Display) {
    ui.colored_label(Color32::from_rgb(220, 53, 69), format!("Error: {err}"));
}
