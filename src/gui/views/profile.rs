//! Teacher Profile page: one professor's metrics, publication composition
//! pie and activity radar.

use crate::charts::ChartPlotter;
use crate::data::Department;
use crate::gui::views::{error_label, metric_card, section_heading};
use crate::stats::StatsCalculator;
use egui::{Color32, ComboBox, RichText};
use polars::prelude::DataFrame;

pub struct ProfileView {
    department: Department,
    professor: String,
}

impl Default for ProfileView {
    fn default() -> Self {
        Self {
            department: Department::Ece,
            professor: String::new(),
        }
    }
}

impl ProfileView {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame) {
        section_heading(ui, "🧑‍🏫 Individual Teacher Profile");

        let professors = match StatsCalculator::professors_of_department(df, self.department) {
            Ok(p) => p,
            Err(err) => return error_label(ui, err),
        };
        if !professors.contains(&self.professor) {
            self.professor = professors.first().cloned().unwrap_or_default();
        }

        ui.horizontal(|ui| {
            ui.label("Department:");
            ComboBox::from_id_salt("profile_department")
                .width(80.0)
                .selected_text(self.department.as_str())
                .show_ui(ui, |ui| {
                    for dept in Department::ALL {
                        ui.selectable_value(&mut self.department, dept, dept.as_str());
                    }
                });

            ui.add_space(10.0);
            ui.label("Professor:");
            ComboBox::from_id_salt("profile_professor")
                .width(220.0)
                .selected_text(&self.professor)
                .show_ui(ui, |ui| {
                    for name in &professors {
                        ui.selectable_value(&mut self.professor, name.clone(), name);
                    }
                });
        });
        ui.add_space(10.0);

        if self.professor.is_empty() {
            ui.label("No professors in this department.");
            return;
        }

        let row = match StatsCalculator::professor_row(df, &self.professor) {
            Ok(Some(row)) => row,
            Ok(None) => {
                ui.label("Professor not found.");
                return;
            }
            Err(err) => return error_label(ui, err),
        };

        let metric = |name: &str| StatsCalculator::row_metric(&row, name).unwrap_or(0.0);
        let designation = StatsCalculator::string_values(&row, "Designation")
            .ok()
            .and_then(|v| v.into_iter().next())
            .unwrap_or_default();
        let department = StatsCalculator::string_values(&row, "Department")
            .ok()
            .and_then(|v| v.into_iter().next())
            .unwrap_or_default();

        ui.label(RichText::new(&self.professor).size(20.0).strong());
        ui.label(format!("Designation: {designation}"));
        ui.label(format!("Department: {department}"));
        ui.separator();

        let journals = metric("Journal Publications");
        let conferences = metric("Conference Publications");
        let books = metric("Books/Chapters");
        let patents = metric("Patents");
        let projects = metric("Projects");

        ui.horizontal(|ui| {
            metric_card(ui, "Journals", format!("{journals:.0}"));
            metric_card(ui, "Conferences", format!("{conferences:.0}"));
            metric_card(ui, "Citations", format!("{:.0}", metric("Citations")));
            metric_card(ui, "H-Index", format!("{:.0}", metric("H Index")));
            metric_card(ui, "Patents", format!("{patents:.0}"));
        });

        ui.add_space(15.0);
        section_heading(ui, "Publication Composition");

        let profile_color = ChartPlotter::department_color(self.department);

        ui.columns(2, |columns| {
            {
                let ui = &mut columns[0];
                ui.label("Publication Types");
                let slices = [
                    ("Journals".to_string(), journals, ChartPlotter::department_color(Department::Ece)),
                    ("Conferences".to_string(), conferences, ChartPlotter::department_color(Department::Cse)),
                    ("Books/Chapters".to_string(), books, Color32::from_rgb(0, 204, 150)),
                ];
                ChartPlotter::draw_pie(ui, &slices, 220.0);
            }
            {
                let ui = &mut columns[1];
                ui.label("Activity Radar");
                let axes = [
                    ("Journals".to_string(), journals),
                    ("Conferences".to_string(), conferences),
                    ("Projects".to_string(), projects),
                    ("Patents".to_string(), patents),
                ];
                ChartPlotter::draw_radar(ui, "profile_radar", &axes, profile_color, 260.0);
            }
        });
    }
}
