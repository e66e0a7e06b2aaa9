//! Chart Plotter Module
//! Creates the dashboard visualizations using egui_plot and the egui
//! painter (pie slices and heatmap cells have no egui_plot primitive).

use crate::data::Department;
use crate::stats::BoxStats;
use egui::{Align2, Color32, FontId, Rect, RichText, Sense, Stroke, Vec2};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Plot, PlotPoint, PlotPoints, Points};
use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Fixed department palette.
pub const ECE_COLOR: Color32 = Color32::from_rgb(239, 85, 59);
pub const CSE_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

/// Creates dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn department_color(department: Department) -> Color32 {
        match department {
            Department::Ece => ECE_COLOR,
            Department::Cse => CSE_COLOR,
        }
    }

    /// Vertical bars, one per department.
    pub fn draw_department_bars(
        ui: &mut egui::Ui,
        id: &str,
        data: &[(Department, f64)],
        value_label: &str,
        height: f32,
    ) {
        let labels: Vec<String> = data.iter().map(|(d, _)| d.to_string()).collect();
        let bars: Vec<Bar> = data
            .iter()
            .enumerate()
            .map(|(i, &(dept, value))| {
                Bar::new(i as f64, value)
                    .width(0.6)
                    .fill(Self::department_color(dept))
                    .name(dept.to_string())
            })
            .collect();

        Plot::new(id.to_string())
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .y_axis_label(value_label.to_string())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Calculate beeswarm positions for points with duplicate values.
    pub fn beeswarm_positions(y_values: &[f64], center: f64, width: f64) -> Vec<f64> {
        let n = y_values.len();
        if n == 0 {
            return Vec::new();
        }

        let mut positions = vec![center; n];

        // Round values and find duplicates
        let precision = 1e6;
        let mut value_indices: HashMap<i64, Vec<usize>> = HashMap::new();

        for (i, &y) in y_values.iter().enumerate() {
            let key = (y * precision).round() as i64;
            value_indices.entry(key).or_default().push(i);
        }

        // Spread duplicates symmetrically
        for indices in value_indices.values() {
            if indices.len() > 1 {
                let count = indices.len();
                let step = width / (count.max(2) - 1) as f64;
                let start = center - width / 2.0;

                for (i, &idx) in indices.iter().enumerate() {
                    positions[idx] = start + i as f64 * step;
                }
            }
        }

        positions
    }

    /// Box plot per department with all points overlaid.
    pub fn draw_box_chart(
        ui: &mut egui::Ui,
        id: &str,
        groups: &[(Department, Vec<f64>, BoxStats)],
        value_label: &str,
        height: f32,
    ) {
        let labels: Vec<String> = groups.iter().map(|(d, _, _)| d.to_string()).collect();

        Plot::new(id.to_string())
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .y_axis_label(value_label.to_string())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (i, (dept, values, stats)) in groups.iter().enumerate() {
                    let color = Self::department_color(*dept);

                    let box_elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(
                            stats.whisker_low,
                            stats.q1,
                            stats.median,
                            stats.q3,
                            stats.whisker_high,
                        ),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(Stroke::new(1.5, color));

                    plot_ui.box_plot(BoxPlot::new(vec![box_elem]).name(dept.to_string()));

                    let x_positions = Self::beeswarm_positions(values, i as f64, 0.35);
                    let points: PlotPoints = x_positions
                        .iter()
                        .zip(values.iter())
                        .map(|(&x, &y)| [x, y])
                        .collect();

                    plot_ui.points(
                        Points::new(points)
                            .radius(3.0)
                            .color(color.gamma_multiply(0.7)),
                    );
                }
            });
    }

    /// Horizontal ranking bars, longest at the top.
    pub fn draw_ranking_bars(
        ui: &mut egui::Ui,
        id: &str,
        entries: &[(String, f64, Department)],
        metric_label: &str,
        height: f32,
    ) {
        // Entries arrive best-first; plot bottom-up so the top entry renders
        // at the top of the chart.
        let n = entries.len();
        let labels: Vec<String> = entries.iter().rev().map(|(name, _, _)| name.clone()).collect();
        let bars: Vec<Bar> = entries
            .iter()
            .rev()
            .enumerate()
            .map(|(i, (name, value, dept))| {
                Bar::new(i as f64, *value)
                    .width(0.6)
                    .fill(Self::department_color(*dept))
                    .name(name.clone())
            })
            .collect();

        Plot::new(id.to_string())
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label(metric_label.to_string())
            .set_margin_fraction(Vec2::new(0.05, 1.0 / (n.max(1) as f32 * 2.0)))
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });
    }

    /// Pie chart with percentage labels and a side legend.
    pub fn draw_pie(ui: &mut egui::Ui, slices: &[(String, f64, Color32)], size: f32) {
        let total: f64 = slices.iter().map(|(_, v, _)| v.max(0.0)).sum();

        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), Sense::hover());
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = size * 0.45;

            if total <= 0.0 {
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    "no data",
                    FontId::proportional(12.0),
                    ui.visuals().text_color(),
                );
            } else {
                let mut angle = -FRAC_PI_2;
                for (_, value, color) in slices {
                    let value = value.max(0.0);
                    if value == 0.0 {
                        continue;
                    }
                    let sweep = value / total * TAU;

                    let steps = ((sweep / 0.05).ceil() as usize).max(2);
                    let mut points = Vec::with_capacity(steps + 2);
                    points.push(center);
                    for s in 0..=steps {
                        let a = angle + sweep * s as f64 / steps as f64;
                        points.push(
                            center + Vec2::angled(a as f32) * radius,
                        );
                    }
                    painter.add(egui::Shape::convex_polygon(points, *color, Stroke::NONE));

                    let fraction = value / total;
                    if fraction > 0.05 {
                        let mid = angle + sweep / 2.0;
                        let pos = center + Vec2::angled(mid as f32) * (radius * 0.6);
                        painter.text(
                            pos,
                            Align2::CENTER_CENTER,
                            format!("{:.0}%", fraction * 100.0),
                            FontId::proportional(12.0),
                            Color32::WHITE,
                        );
                    }

                    angle += sweep;
                }
            }

            ui.vertical(|ui| {
                for (label, value, color) in slices {
                    ui.horizontal(|ui| {
                        let (swatch, _) =
                            ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                        ui.painter().rect_filled(swatch, 2.0, *color);
                        ui.label(RichText::new(format!("{label}: {value:.0}")).size(12.0));
                    });
                }
            });
        });
    }

    /// Radar polygon over a fixed set of axes.
    pub fn draw_radar(
        ui: &mut egui::Ui,
        id: &str,
        axes: &[(String, f64)],
        color: Color32,
        height: f32,
    ) {
        let n = axes.len();
        if n < 3 {
            return;
        }
        let max = axes
            .iter()
            .map(|(_, v)| *v)
            .fold(f64::MIN, f64::max)
            .max(1.0);

        let spoke = |i: usize, r: f64| -> [f64; 2] {
            let a = TAU * i as f64 / n as f64 - FRAC_PI_2;
            [r * a.cos(), r * a.sin()]
        };

        Plot::new(id.to_string())
            .height(height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .show_x(false)
            .show_y(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(-1.45)
            .include_x(1.45)
            .include_y(-1.35)
            .include_y(1.35)
            .show(ui, |plot_ui| {
                let grid_color = Color32::from_gray(90);

                for ring in [0.25, 0.5, 0.75, 1.0] {
                    let circle: PlotPoints = (0..=n)
                        .map(|i| spoke(i % n, ring))
                        .collect();
                    plot_ui.line(egui_plot::Line::new(circle).color(grid_color).width(0.5));
                }
                for i in 0..n {
                    let ray: PlotPoints = vec![[0.0, 0.0], spoke(i, 1.0)].into();
                    plot_ui.line(egui_plot::Line::new(ray).color(grid_color).width(0.5));
                }

                let shape: PlotPoints = axes
                    .iter()
                    .enumerate()
                    .map(|(i, (_, v))| spoke(i, (v / max).clamp(0.0, 1.0)))
                    .collect();
                plot_ui.polygon(
                    egui_plot::Polygon::new(shape)
                        .fill_color(color.gamma_multiply(0.35))
                        .stroke(Stroke::new(1.5, color)),
                );

                for (i, (label, value)) in axes.iter().enumerate() {
                    let [x, y] = spoke(i, 1.18);
                    plot_ui.text(egui_plot::Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(format!("{label} ({value:.0})")).size(12.0),
                    ));
                }
            });
    }

    /// Correlation heatmap with in-cell values on a diverging scale.
    pub fn draw_heatmap(ui: &mut egui::Ui, labels: &[&str], matrix: &[Vec<f64>]) {
        let n = labels.len();
        if n == 0 || matrix.len() != n {
            return;
        }

        let cell: f32 = 58.0;
        let left = 170.0;
        let top = 34.0;
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(left + cell * n as f32, top + cell * n as f32),
            Sense::hover(),
        );
        let painter = ui.painter_at(rect);
        let font = FontId::proportional(11.0);
        let text_color = ui.visuals().text_color();

        for (j, label) in labels.iter().enumerate() {
            painter.text(
                egui::pos2(
                    rect.left() + left + cell * (j as f32 + 0.5),
                    rect.top() + top * 0.5,
                ),
                Align2::CENTER_CENTER,
                Self::short_label(label),
                font.clone(),
                text_color,
            );
        }

        for (i, label) in labels.iter().enumerate() {
            painter.text(
                egui::pos2(
                    rect.left() + left - 8.0,
                    rect.top() + top + cell * (i as f32 + 0.5),
                ),
                Align2::RIGHT_CENTER,
                *label,
                font.clone(),
                text_color,
            );

            for j in 0..n {
                let value = matrix[i][j];
                let cell_rect = Rect::from_min_size(
                    egui::pos2(
                        rect.left() + left + cell * j as f32,
                        rect.top() + top + cell * i as f32,
                    ),
                    egui::vec2(cell - 2.0, cell - 2.0),
                );
                painter.rect_filled(cell_rect, 3.0, Self::diverging_color(value));

                let text = if value.is_nan() {
                    "-".to_string()
                } else {
                    format!("{value:.2}")
                };
                let ink = if value.is_nan() || value.abs() < 0.55 {
                    Color32::BLACK
                } else {
                    Color32::WHITE
                };
                painter.text(
                    cell_rect.center(),
                    Align2::CENTER_CENTER,
                    text,
                    font.clone(),
                    ink,
                );
            }
        }
    }

    /// Diverging color scale: blue at -1, near-white at 0, red at +1.
    fn diverging_color(value: f64) -> Color32 {
        if value.is_nan() {
            return Color32::from_gray(160);
        }
        let v = value.clamp(-1.0, 1.0);
        let t = v.abs() as f32;
        let lerp = |a: u8, b: u8| -> u8 { (a as f32 + (b as f32 - a as f32) * t) as u8 };
        if v >= 0.0 {
            Color32::from_rgb(lerp(245, 178), lerp(245, 24), lerp(245, 43))
        } else {
            Color32::from_rgb(lerp(245, 33), lerp(245, 102), lerp(245, 172))
        }
    }

    fn short_label(label: &str) -> String {
        // Column headers are long; keep the first word for the top axis.
        label.split_whitespace().next().unwrap_or(label).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beeswarm_spreads_duplicates_symmetrically() {
        let positions = ChartPlotter::beeswarm_positions(&[3.0, 3.0, 3.0, 7.0], 1.0, 0.4);
        assert_eq!(positions.len(), 4);
        // The unique value stays centered.
        assert_eq!(positions[3], 1.0);
        // Duplicates straddle the center.
        assert!(positions[0] < 1.0 && positions[2] > 1.0);
        let mid = (positions[0] + positions[2]) / 2.0;
        assert!((mid - 1.0).abs() < 1e-9);
    }

    #[test]
    fn diverging_color_endpoints() {
        assert_eq!(
            ChartPlotter::diverging_color(1.0),
            Color32::from_rgb(178, 24, 43)
        );
        assert_eq!(
            ChartPlotter::diverging_color(-1.0),
            Color32::from_rgb(33, 102, 172)
        );
        assert_eq!(
            ChartPlotter::diverging_color(0.0),
            Color32::from_rgb(245, 245, 245)
        );
    }

    #[test]
    fn department_palette_is_fixed() {
        assert_eq!(ChartPlotter::department_color(Department::Ece), ECE_COLOR);
        assert_eq!(ChartPlotter::department_color(Department::Cse), CSE_COLOR);
    }
}
