//! Control Panel Widget
//! Left side panel with file upload, pairing feedback and view navigation.

use crate::data::department_of;
use egui::{Color32, RichText};

/// The four dashboard views.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Overview,
    Comparison,
    Rankings,
    Profile,
}

impl View {
    pub const ALL: [View; 4] = [
        View::Overview,
        View::Comparison,
        View::Rankings,
        View::Profile,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Comparison => "Department Comparison",
            View::Rankings => "Faculty Rankings",
            View::Profile => "Teacher Profile",
        }
    }
}

/// Actions triggered by the control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    BrowseFiles,
}

/// Left side control panel.
pub struct ControlPanel {
    pub view: View,
    pub file_names: Vec<String>,
    pub status: String,
    pub has_data: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            view: View::Overview,
            file_names: Vec::new(),
            status: "Waiting for upload...".to_string(),
            has_data: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 FacultyScope")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Research Performance Dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("Upload two files, one named for ECE and one for CSE.")
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                ui.add_space(5.0);

                if ui.button("📂 Browse files").clicked() {
                    action = ControlPanelAction::BrowseFiles;
                }

                for name in &self.file_names {
                    let tag = department_of(name)
                        .map(|d| d.as_str())
                        .unwrap_or("?");
                    ui.label(RichText::new(format!("[{tag}] {name}")).size(12.0));
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Navigation Section =====
        ui.label(RichText::new("🧭 Go to").size(14.0).strong());
        ui.add_space(5.0);

        ui.add_enabled_ui(self.has_data, |ui| {
            for view in View::ALL {
                ui.radio_value(&mut self.view, view, view.label());
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("ready") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}
