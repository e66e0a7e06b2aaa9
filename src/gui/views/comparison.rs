//! Department Comparison page: totals, averages, distribution, correlations.

use crate::charts::ChartPlotter;
use crate::data::Department;
use crate::gui::views::{error_label, section_heading};
use crate::stats::{BoxStats, StatsCalculator};
use egui::{Color32, ComboBox, RichText};
use polars::prelude::DataFrame;

/// Metrics offered for side-by-side comparison.
pub const COMPARISON_METRICS: [&str; 6] = [
    "Journal Publications",
    "Citations",
    "Patents",
    "Projects",
    "H Index",
    "Total Publications",
];

/// Metric set for the correlation heatmap.
pub const CORRELATION_METRICS: [&str; 7] = [
    "Journal Publications",
    "Conference Publications",
    "Total Publications",
    "Citations",
    "H Index",
    "Patents",
    "Projects",
];

pub struct ComparisonView {
    metric: &'static str,
}

impl Default for ComparisonView {
    fn default() -> Self {
        Self {
            metric: COMPARISON_METRICS[0],
        }
    }
}

impl ComparisonView {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame) {
        section_heading(ui, "Inter-Department Comparison");

        ui.horizontal(|ui| {
            ui.label("Select Feature to Compare:");
            ComboBox::from_id_salt("comparison_metric")
                .width(180.0)
                .selected_text(self.metric)
                .show_ui(ui, |ui| {
                    for metric in COMPARISON_METRICS {
                        ui.selectable_value(&mut self.metric, metric, metric);
                    }
                });
        });
        ui.add_space(10.0);

        let metric = self.metric;

        ui.columns(2, |columns| {
            {
                let ui = &mut columns[0];
                ui.label(RichText::new(format!("Total {metric} (Sum)")).strong());
                match StatsCalculator::department_sums(df, metric) {
                    Ok(sums) => ChartPlotter::draw_department_bars(
                        ui,
                        "comparison_sum",
                        &sums,
                        metric,
                        240.0,
                    ),
                    Err(err) => error_label(ui, err),
                }
            }
            {
                let ui = &mut columns[1];
                ui.label(RichText::new(format!("Average {metric} per Faculty")).strong());
                match StatsCalculator::department_means(df, metric) {
                    Ok(means) => ChartPlotter::draw_department_bars(
                        ui,
                        "comparison_mean",
                        &means,
                        metric,
                        240.0,
                    ),
                    Err(err) => error_label(ui, err),
                }
            }
        });

        ui.add_space(15.0);
        ui.label(RichText::new(format!("Distribution of {metric}")).strong());
        match self.box_groups(df, metric) {
            Ok(groups) => {
                ChartPlotter::draw_box_chart(ui, "comparison_box", &groups, metric, 280.0);
                self.ttest_annotation(ui, &groups);
            }
            Err(err) => error_label(ui, err),
        }

        ui.add_space(15.0);
        ui.label(RichText::new("Correlation Heatmap (Numeric Features)").strong());
        match StatsCalculator::correlation_matrix(df, &CORRELATION_METRICS) {
            Ok(matrix) => ChartPlotter::draw_heatmap(ui, &CORRELATION_METRICS, &matrix),
            Err(err) => error_label(ui, err),
        }
    }

    fn box_groups(
        &self,
        df: &DataFrame,
        metric: &str,
    ) -> polars::prelude::PolarsResult<Vec<(Department, Vec<f64>, BoxStats)>> {
        let mut groups = Vec::new();
        for dept in Department::ALL {
            let values = StatsCalculator::metric_values(df, metric, Some(dept))?;
            if let Some(stats) = StatsCalculator::box_stats(&values) {
                groups.push((dept, values, stats));
            }
        }
        Ok(groups)
    }

    fn ttest_annotation(&self, ui: &mut egui::Ui, groups: &[(Department, Vec<f64>, BoxStats)]) {
        let ece = groups.iter().find(|(d, _, _)| *d == Department::Ece);
        let cse = groups.iter().find(|(d, _, _)| *d == Department::Cse);
        let (Some((_, ece_values, _)), Some((_, cse_values, _))) = (ece, cse) else {
            return;
        };

        if let Some(test) = StatsCalculator::welch_ttest(ece_values, cse_values) {
            let (verdict, color) = if test.is_significant() {
                ("significant", Color32::from_rgb(220, 53, 69))
            } else {
                ("not significant", Color32::GRAY)
            };
            ui.label(
                RichText::new(format!(
                    "Welch t-test ECE vs CSE: t = {:.3}, p = {:.4} ({verdict})",
                    test.t, test.p_value
                ))
                .size(12.0)
                .color(color),
            );
        }
    }
}
