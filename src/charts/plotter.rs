//! Chart Plotter Module
//! Interactive bar, histogram, scatter and heat-map views using egui_plot.

use crate::stats::{CorrelationMatrix, GroupedAggregate, Histogram};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};
use std::fmt::Display;

pub const PROFIT_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green
pub const LOSS_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red
pub const NEUTRAL_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Draws aggregates with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Colour for a signed value: green for gains, red for losses.
    pub fn signed_color(value: f64) -> Color32 {
        if value < 0.0 {
            LOSS_COLOR
        } else {
            PROFIT_COLOR
        }
    }

    /// Labels for the x axis of a grouped aggregate.
    pub fn labels<K: Display>(aggregate: &GroupedAggregate<K>) -> Vec<String> {
        aggregate.keys().map(|k| k.to_string()).collect()
    }

    /// One bar per group; labels are drawn on the x axis.
    pub fn draw_bar_chart(
        ui: &mut egui::Ui,
        id: &str,
        labels: Vec<String>,
        values: &[f64],
        y_label: &str,
        signed: bool,
    ) {
        let bars: Vec<Bar> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let color = if signed {
                    Self::signed_color(v)
                } else {
                    NEUTRAL_COLOR
                };
                let name = labels.get(i).cloned().unwrap_or_default();
                Bar::new(i as f64, v).width(0.7).fill(color).name(name)
            })
            .collect();

        Plot::new(id.to_string())
            .height(260.0)
            .allow_scroll(false)
            .y_axis_label(y_label.to_string())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Bar chart straight from a grouped aggregate.
    pub fn draw_aggregate<K: Display>(
        ui: &mut egui::Ui,
        id: &str,
        aggregate: &GroupedAggregate<K>,
        y_label: &str,
        signed: bool,
    ) {
        let values: Vec<f64> = aggregate.values().collect();
        Self::draw_bar_chart(ui, id, Self::labels(aggregate), &values, y_label, signed);
    }

    /// Share of each group as a horizontal list of percentage bars.
    pub fn draw_shares<K: Display>(ui: &mut egui::Ui, title: &str, shares: &GroupedAggregate<K>) {
        ui.label(RichText::new(title).strong());
        for (i, (key, share)) in shares.iter().enumerate() {
            ui.horizontal(|ui| {
                ui.add_sized([140.0, 18.0], egui::Label::new(key.to_string()));
                ui.add(
                    egui::ProgressBar::new(share.clamp(0.0, 1.0) as f32)
                        .fill(Self::series_color(i))
                        .text(format!("{:.1}%", share * 100.0)),
                );
            });
        }
    }

    pub fn draw_histogram(ui: &mut egui::Ui, id: &str, histogram: &Histogram, x_label: &str) {
        let width = histogram.bin_width();
        let bars: Vec<Bar> = histogram
            .centers()
            .into_iter()
            .zip(histogram.counts.iter())
            .map(|(center, &count)| Bar::new(center, count as f64).width(width).fill(NEUTRAL_COLOR))
            .collect();

        Plot::new(id.to_string())
            .height(220.0)
            .allow_scroll(false)
            .x_axis_label(x_label.to_string())
            .y_axis_label("Count")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Scatter with one colour per named series. Points are `[x, y]`.
    pub fn draw_scatter(
        ui: &mut egui::Ui,
        id: &str,
        series: &[(String, Vec<[f64; 2]>)],
        x_label: &str,
    ) {
        Plot::new(id.to_string())
            .height(300.0)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label(x_label.to_string())
            .show(ui, |plot_ui| {
                for (i, (name, points)) in series.iter().enumerate() {
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(points.iter().copied()))
                            .radius(3.0)
                            .color(Self::series_color(i))
                            .name(name),
                    );
                }
            });
    }

    /// Correlation matrix as a coloured grid.
    pub fn draw_correlation_grid(ui: &mut egui::Ui, matrix: &CorrelationMatrix) {
        egui::Grid::new("correlation_grid")
            .striped(false)
            .spacing([4.0, 4.0])
            .show(ui, |ui| {
                ui.label("");
                for field in &matrix.fields {
                    ui.label(RichText::new(field).strong().size(11.0));
                }
                ui.end_row();

                for (i, field) in matrix.fields.iter().enumerate() {
                    ui.label(RichText::new(field).strong().size(11.0));
                    for &r in &matrix.values[i] {
                        let (text, fill) = if r.is_nan() {
                            ("-".to_string(), Color32::GRAY)
                        } else {
                            (format!("{:.2}", r), Self::heat_color(r))
                        };
                        egui::Frame::none()
                            .fill(fill)
                            .rounding(3.0)
                            .inner_margin(4.0)
                            .show(ui, |ui| {
                                ui.label(RichText::new(text).size(11.0).color(Color32::BLACK));
                            });
                    }
                    ui.end_row();
                }
            });
    }

    /// Blend from red (-1) through white (0) to blue (+1).
    pub fn heat_color(r: f64) -> Color32 {
        let t = r.clamp(-1.0, 1.0);
        let fade = |c: u8| -> u8 {
            let c = c as f64;
            (255.0 + (c - 255.0) * t.abs()).round() as u8
        };
        let target = if t < 0.0 { LOSS_COLOR } else { NEUTRAL_COLOR };
        Color32::from_rgb(fade(target.r()), fade(target.g()), fade(target.b()))
    }

    /// Two-column table of key/value rows.
    pub fn draw_table<K: Display>(
        ui: &mut egui::Ui,
        id: &str,
        headers: (&str, &str),
        aggregate: &GroupedAggregate<K>,
    ) {
        egui::Grid::new(id.to_string())
            .striped(true)
            .min_col_width(80.0)
            .show(ui, |ui| {
                ui.label(RichText::new(headers.0).strong());
                ui.label(RichText::new(headers.1).strong());
                ui.end_row();
                for (key, value) in aggregate.iter() {
                    ui.label(key.to_string());
                    ui.label(format!("{:.2}", value));
                    ui.end_row();
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(ChartPlotter::heat_color(0.0), Color32::WHITE);
        assert_eq!(ChartPlotter::heat_color(1.0), NEUTRAL_COLOR);
        assert_eq!(ChartPlotter::heat_color(-1.0), LOSS_COLOR);
    }

    #[test]
    fn test_signed_color() {
        assert_eq!(ChartPlotter::signed_color(-0.1), LOSS_COLOR);
        assert_eq!(ChartPlotter::signed_color(3.0), PROFIT_COLOR);
    }
}
