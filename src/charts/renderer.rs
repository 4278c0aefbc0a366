//! Static Chart Renderer
//! Writes PNG charts with plotters for headless export.
//!
//! Three layouts:
//! 1. Bar chart of a grouped aggregate, labels under each bar
//! 2. Histogram of a continuous field
//! 3. Correlation heat map with the coefficient printed in each cell

use crate::stats::{CorrelationMatrix, GroupedAggregate, Histogram};
use plotters::prelude::*;
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

const PROFIT_GREEN: RGBColor = RGBColor(46, 204, 113);
const LOSS_RED: RGBColor = RGBColor(231, 76, 60);
const BAR_BLUE: RGBColor = RGBColor(52, 152, 219);
const NAN_GRAY: RGBColor = RGBColor(200, 200, 200);

// Labels longer than this are cut to keep the x axis readable
const MAX_LABEL_CHARS: usize = 18;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Chart rendering failed: {0}")]
    Render(String),
    #[error("Nothing to draw for '{0}'")]
    Empty(String),
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Renders charts to PNG files.
pub struct StaticChartRenderer {
    width: u32,
    height: u32,
}

impl StaticChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(200),
            height: height.max(150),
        }
    }

    fn short_label(label: &str) -> String {
        if label.chars().count() <= MAX_LABEL_CHARS {
            label.to_string()
        } else {
            let cut: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
            format!("{}…", cut)
        }
    }

    /// Y range covering zero and every finite value, with 10% headroom.
    fn value_range(values: &[f64]) -> (f64, f64) {
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let (lo, hi) = finite.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let pad = ((hi - lo) * 0.1).max(1e-9);
        (
            if lo < 0.0 { lo - pad } else { 0.0 },
            if hi > 0.0 { hi + pad } else { pad },
        )
    }

    /// Bar chart of a grouped aggregate. Negative bars are red when `signed`.
    pub fn render_bar_chart<K: Display>(
        &self,
        path: &Path,
        title: &str,
        y_desc: &str,
        aggregate: &GroupedAggregate<K>,
        signed: bool,
    ) -> Result<(), ChartError> {
        if aggregate.is_empty() {
            return Err(ChartError::Empty(title.to_string()));
        }

        let labels: Vec<String> = aggregate
            .keys()
            .map(|k| Self::short_label(&k.to_string()))
            .collect();
        let values: Vec<f64> = aggregate.values().collect();
        let n = values.len();
        let (y_min, y_max) = Self::value_range(&values);

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(90)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)
            .map_err(render_err)?;

        let label_fmt = |x: &f64| {
            let idx = x.round();
            if (x - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&label_fmt)
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_desc(y_desc)
            .axis_desc_style(("sans-serif", 15))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(values.iter().enumerate().map(|(i, &v)| {
                let color = if signed && v < 0.0 {
                    LOSS_RED
                } else if signed {
                    PROFIT_GREEN
                } else {
                    BAR_BLUE
                };
                let x = i as f64;
                Rectangle::new([(x - 0.35, 0.0), (x + 0.35, v)], color.filled())
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }

    pub fn render_histogram(
        &self,
        path: &Path,
        title: &str,
        histogram: &Histogram,
    ) -> Result<(), ChartError> {
        let (Some(&lo), Some(&hi)) = (histogram.edges.first(), histogram.edges.last()) else {
            return Err(ChartError::Empty(title.to_string()));
        };
        let peak = histogram.counts.iter().copied().max().unwrap_or(0) as f64;

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(lo..hi, 0.0..(peak * 1.1).max(1.0))
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .y_desc("Count")
            .axis_desc_style(("sans-serif", 15))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(
                histogram
                    .edges
                    .windows(2)
                    .zip(histogram.counts.iter())
                    .map(|(edge, &count)| {
                        Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], BAR_BLUE.filled())
                    }),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }

    /// Heat map of a correlation matrix, red for negative and blue for positive.
    pub fn render_correlation(
        &self,
        path: &Path,
        title: &str,
        matrix: &CorrelationMatrix,
    ) -> Result<(), ChartError> {
        if matrix.is_empty() {
            return Err(ChartError::Empty(title.to_string()));
        }

        let n = matrix.len();
        let fields = matrix.fields.clone();

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(120)
            .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)
            .map_err(render_err)?;

        // Row 0 is drawn at the top
        let x_fmt = |v: &f64| Self::cell_label(&fields, *v, false);
        let y_fmt = |v: &f64| Self::cell_label(&fields, *v, true);

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(2 * n + 1)
            .y_labels(2 * n + 1)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .draw()
            .map_err(render_err)?;

        let cells: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .collect();
        let top = n as f64;

        chart
            .draw_series(cells.iter().map(|&(i, j)| {
                let color = Self::heat_color(matrix.values[i][j]);
                Rectangle::new(
                    [(j as f64, top - i as f64 - 1.0), (j as f64 + 1.0, top - i as f64)],
                    color.filled(),
                )
            }))
            .map_err(render_err)?;

        chart
            .draw_series(cells.iter().map(|&(i, j)| {
                let r = matrix.values[i][j];
                let text = if r.is_nan() {
                    "-".to_string()
                } else {
                    format!("{:.2}", r)
                };
                Text::new(
                    text,
                    (j as f64 + 0.4, top - i as f64 - 0.5),
                    ("sans-serif", 16).into_font(),
                )
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }

    /// Field name for a tick at the centre of a cell, blank elsewhere.
    fn cell_label(fields: &[String], v: f64, reversed: bool) -> String {
        let idx = v.floor();
        if idx < 0.0 || (v - idx - 0.5).abs() > 1e-6 {
            return String::new();
        }
        let idx = idx as usize;
        let idx = if reversed {
            match fields.len().checked_sub(idx + 1) {
                Some(i) => i,
                None => return String::new(),
            }
        } else {
            idx
        };
        fields.get(idx).cloned().unwrap_or_default()
    }

    fn heat_color(r: f64) -> RGBColor {
        if r.is_nan() {
            return NAN_GRAY;
        }
        let t = r.clamp(-1.0, 1.0);
        let target = if t < 0.0 { LOSS_RED } else { BAR_BLUE };
        let fade = |c: u8| (255.0 + (c as f64 - 255.0) * t.abs()).round() as u8;
        RGBColor(fade(target.0), fade(target.1), fade(target.2))
    }
}
