//! Overview page: headline totals and the department split.

use crate::charts::ChartPlotter;
use crate::gui::views::{error_label, metric_card, section_heading};
use crate::stats::StatsCalculator;
use polars::prelude::DataFrame;

#[derive(Default)]
pub struct OverviewView;

impl OverviewView {
    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame) {
        section_heading(ui, "General Overview");

        let overview = match StatsCalculator::overview(df) {
            Ok(ov) => ov,
            Err(err) => return error_label(ui, err),
        };

        ui.horizontal(|ui| {
            metric_card(ui, "Total Faculty", overview.faculty_count.to_string());
            metric_card(
                ui,
                "Total Publications",
                format!("{:.0}", overview.total_publications),
            );
            metric_card(
                ui,
                "Total Citations",
                format!("{:.0}", overview.total_citations),
            );
            metric_card(ui, "Avg H-Index", format!("{:.2}", overview.mean_h_index));
        });

        ui.add_space(15.0);
        section_heading(ui, "Department Split");

        ui.columns(2, |columns| {
            {
                let ui = &mut columns[0];
                ui.label("Faculty Distribution");
                match StatsCalculator::department_counts(df) {
                    Ok(counts) => {
                        let slices: Vec<(String, f64, egui::Color32)> = counts
                            .iter()
                            .map(|&(dept, count)| {
                                (
                                    dept.to_string(),
                                    count as f64,
                                    ChartPlotter::department_color(dept),
                                )
                            })
                            .collect();
                        ChartPlotter::draw_pie(ui, &slices, 220.0);
                    }
                    Err(err) => error_label(ui, err),
                }
            }
            {
                let ui = &mut columns[1];
                ui.label("Total Journal Publications by Dept");
                match StatsCalculator::department_sums(df, "Journal Publications") {
                    Ok(sums) => ChartPlotter::draw_department_bars(
                        ui,
                        "overview_journals",
                        &sums,
                        "Journal Publications",
                        240.0,
                    ),
                    Err(err) => error_label(ui, err),
                }
            }
        });
    }
}
