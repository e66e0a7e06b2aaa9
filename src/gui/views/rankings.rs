//! Faculty Rankings page: top-N horizontal bars plus a data table.

use crate::charts::ChartPlotter;
use crate::data::Department;
use crate::gui::views::{error_label, section_heading};
use crate::stats::StatsCalculator;
use egui::{ComboBox, RichText, Slider};
use polars::prelude::{DataFrame, PolarsResult};

/// Metrics offered for ranking.
pub const RANKING_METRICS: [&str; 5] = [
    "Journal Publications",
    "Citations",
    "Patents",
    "Projects",
    "H Index",
];

pub struct RankingsView {
    department: Option<Department>,
    metric: &'static str,
    top_n: usize,
}

impl Default for RankingsView {
    fn default() -> Self {
        Self {
            department: None,
            metric: RANKING_METRICS[0],
            top_n: 10,
        }
    }
}

struct RankingRows {
    entries: Vec<(String, f64, Department)>,
    designations: Vec<String>,
    citations: Vec<f64>,
    h_indices: Vec<f64>,
}

impl RankingsView {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame) {
        section_heading(ui, "🏆 Faculty Rankings");

        ui.horizontal(|ui| {
            ui.label("Department:");
            ComboBox::from_id_salt("ranking_department")
                .width(80.0)
                .selected_text(self.department.map(|d| d.as_str()).unwrap_or("All"))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.department, None, "All");
                    for dept in Department::ALL {
                        ui.selectable_value(&mut self.department, Some(dept), dept.as_str());
                    }
                });

            ui.add_space(10.0);
            ui.label("Rank By:");
            ComboBox::from_id_salt("ranking_metric")
                .width(170.0)
                .selected_text(self.metric)
                .show_ui(ui, |ui| {
                    for metric in RANKING_METRICS {
                        ui.selectable_value(&mut self.metric, metric, metric);
                    }
                });

            ui.add_space(10.0);
            ui.label("Show Top:");
            ui.add(Slider::new(&mut self.top_n, 5..=20));
        });
        ui.add_space(10.0);

        let rows = match self.collect_rows(df) {
            Ok(rows) => rows,
            Err(err) => return error_label(ui, err),
        };

        ui.label(
            RichText::new(format!("Top {} Faculty by {}", rows.entries.len(), self.metric))
                .strong(),
        );
        ChartPlotter::draw_ranking_bars(
            ui,
            "ranking_bars",
            &rows.entries,
            self.metric,
            (rows.entries.len() as f32 * 26.0 + 60.0).max(180.0),
        );

        ui.add_space(10.0);
        self.draw_table(ui, &rows);
    }

    fn collect_rows(&self, df: &DataFrame) -> PolarsResult<RankingRows> {
        let ranked = StatsCalculator::rank_top_n(df, self.metric, self.department, self.top_n)?;

        let names = StatsCalculator::string_values(&ranked, "Name")?;
        let departments = StatsCalculator::string_values(&ranked, "Department")?;
        let designations = StatsCalculator::string_values(&ranked, "Designation")?;
        let values = StatsCalculator::metric_values(&ranked, self.metric, None)?;
        let citations = StatsCalculator::metric_values(&ranked, "Citations", None)?;
        let h_indices = StatsCalculator::metric_values(&ranked, "H Index", None)?;

        let entries = names
            .into_iter()
            .zip(values)
            .zip(departments)
            .map(|((name, value), dept)| {
                let dept = Department::from_tag(&dept).unwrap_or(Department::Ece);
                (name, value, dept)
            })
            .collect();

        Ok(RankingRows {
            entries,
            designations,
            citations,
            h_indices,
        })
    }

    fn draw_table(&self, ui: &mut egui::Ui, rows: &RankingRows) {
        // Keep the column list free of duplicates when the ranking metric is
        // itself Citations or H Index.
        let show_citations = self.metric != "Citations";
        let show_h_index = self.metric != "H Index";

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("ranking_table")
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Name").strong().size(12.0));
                        ui.label(RichText::new("Department").strong().size(12.0));
                        ui.label(RichText::new("Designation").strong().size(12.0));
                        ui.label(RichText::new(self.metric).strong().size(12.0));
                        if show_citations {
                            ui.label(RichText::new("Citations").strong().size(12.0));
                        }
                        if show_h_index {
                            ui.label(RichText::new("H Index").strong().size(12.0));
                        }
                        ui.end_row();

                        for (i, (name, value, dept)) in rows.entries.iter().enumerate() {
                            ui.label(RichText::new(name).size(12.0));
                            ui.label(
                                RichText::new(dept.as_str())
                                    .size(12.0)
                                    .color(ChartPlotter::department_color(*dept)),
                            );
                            ui.label(
                                RichText::new(rows.designations.get(i).cloned().unwrap_or_default())
                                    .size(12.0),
                            );
                            ui.label(RichText::new(format!("{value:.0}")).size(12.0));
                            if show_citations {
                                ui.label(
                                    RichText::new(format!(
                                        "{:.0}",
                                        rows.citations.get(i).copied().unwrap_or(0.0)
                                    ))
                                    .size(12.0),
                                );
                            }
                            if show_h_index {
                                ui.label(
                                    RichText::new(format!(
                                        "{:.0}",
                                        rows.h_indices.get(i).copied().unwrap_or(0.0)
                                    ))
                                    .size(12.0),
                                );
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
