//! Chart Exporter
//! Writes the full insight report to a directory: PNG charts plus `report.json`.

use super::renderer::{ChartError, StaticChartRenderer};
use crate::config::ExportConfig;
use crate::insights::InsightReport;
use crate::stats::GroupedAggregate;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const REPORT_FILE: &str = "report.json";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// Renders every exportable chart of a report.
pub struct ChartExporter {
    renderer: StaticChartRenderer,
}

impl ChartExporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            renderer: StaticChartRenderer::new(config.width, config.height),
        }
    }

    /// File-system safe name: lowercase ASCII alphanumerics joined by `_`.
    pub fn slug(name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                out.push(c.to_ascii_lowercase());
            } else if !out.ends_with('_') {
                out.push('_');
            }
        }
        out.trim_matches('_').to_string()
    }

    /// Write `report.json` and one PNG per chart into `out_dir`.
    /// Returns every file written, report first.
    pub fn export_report(
        &self,
        report: &InsightReport,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(out_dir)?;
        let mut written = Vec::new();

        let json_path = out_dir.join(REPORT_FILE);
        fs::write(&json_path, serde_json::to_string_pretty(report)?)?;
        written.push(json_path);

        let correlation = out_dir.join("correlation.png");
        self.keep(
            self.renderer.render_correlation(
                &correlation,
                "Correlation of numerical variables",
                &report.numerical.correlation,
            ),
            correlation,
            &mut written,
        )?;

        for dist in &report.numerical.continuous {
            let path = out_dir.join(format!("histogram_{}.png", Self::slug(&dist.field)));
            let title = format!("Distribution of {}", dist.field);
            self.keep(
                self.renderer.render_histogram(&path, &title, &dist.histogram),
                path,
                &mut written,
            )?;
        }

        for rel in &report.numerical.discrete {
            let path = out_dir.join(format!("median_sales_by_{}.png", Self::slug(&rel.field)));
            let title = format!("Median Sales by {}", rel.field);
            self.bar(&path, &title, "Sales", &rel.median_sales, false, &mut written)?;
        }

        for insight in &report.dimensions {
            let dim = Self::slug(&insight.dimension.to_string());
            for named in &insight.means {
                let path = out_dir.join(format!(
                    "{}_mean_{}.png",
                    dim,
                    Self::slug(&named.field)
                ));
                let title = format!("Mean {} by {}", named.field, insight.dimension);
                let signed = named.field == crate::data::schema::PROFIT;
                self.bar(&path, &title, &named.field, &named.aggregate, signed, &mut written)?;
            }
        }

        self.bar(
            &out_dir.join("city_deals.png"),
            "Deals per city",
            "Deals",
            &report.city.deals,
            false,
            &mut written,
        )?;
        self.bar(
            &out_dir.join("city_lowest_profit.png"),
            "Least profitable cities",
            "Mean profit",
            &report.city.lowest_profit,
            true,
            &mut written,
        )?;
        self.bar(
            &out_dir.join("city_highest_profit.png"),
            "Most profitable cities",
            "Mean profit",
            &report.city.highest_profit,
            true,
            &mut written,
        )?;

        self.bar(
            &out_dir.join("state_sales.png"),
            "Total sales per state",
            "Sales",
            &report.state.sales_by_code.sorted_by_value(false),
            false,
            &mut written,
        )?;
        self.bar(
            &out_dir.join("state_profit.png"),
            "Total profit per state",
            "Profit",
            &report.state.profit_by_code.sorted_by_value(false),
            true,
            &mut written,
        )?;

        for turnover in &report.state.turnover {
            for category in &turnover.categories {
                let path = out_dir.join(format!(
                    "turnover_{}_{}.png",
                    Self::slug(&turnover.state),
                    Self::slug(&category.category.to_string())
                ));
                let title = format!("{}: {} profit", turnover.state, category.category);
                self.bar(
                    &path,
                    &title,
                    "Profit",
                    &category.profit_by_sub_category,
                    true,
                    &mut written,
                )?;
            }
        }

        let sub_profit = GroupedAggregate::from_entries(
            report
                .sub_category
                .ranked
                .iter()
                .map(|row| (row.sub_category.clone(), row.profit))
                .collect(),
        );
        self.bar(
            &out_dir.join("sub_category_profit.png"),
            "Mean profit per sub-category",
            "Profit",
            &sub_profit,
            true,
            &mut written,
        )?;

        info!(files = written.len(), dir = %out_dir.display(), "report exported");
        Ok(written)
    }

    fn bar<K: std::fmt::Display>(
        &self,
        path: &Path,
        title: &str,
        y_desc: &str,
        aggregate: &GroupedAggregate<K>,
        signed: bool,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), ExportError> {
        let result = self
            .renderer
            .render_bar_chart(path, title, y_desc, aggregate, signed);
        self.keep(result, path.to_path_buf(), written)
    }

    /// Record a rendered file; empty charts are skipped, other failures abort.
    fn keep(
        &self,
        result: Result<(), ChartError>,
        path: PathBuf,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), ExportError> {
        match result {
            Ok(()) => {
                debug!(path = %path.display(), "chart written");
                written.push(path);
                Ok(())
            }
            Err(ChartError::Empty(title)) => {
                warn!(chart = %title, "nothing to draw, skipping");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(ChartExporter::slug("Sub-Category"), "sub_category");
        assert_eq!(ChartExporter::slug("Ship Mode"), "ship_mode");
        assert_eq!(ChartExporter::slug("  Office Supplies!"), "office_supplies");
    }

    #[test]
    fn test_empty_chart_is_skipped() {
        let exporter = ChartExporter::new(&ExportConfig::default());
        let mut written = Vec::new();
        exporter
            .keep(
                Err(ChartError::Empty("t".to_string())),
                PathBuf::from("x.png"),
                &mut written,
            )
            .unwrap();
        assert!(written.is_empty());

        let failed = exporter.keep(
            Err(ChartError::Render("boom".to_string())),
            PathBuf::from("y.png"),
            &mut written,
        );
        assert!(matches!(failed, Err(ExportError::Chart(ChartError::Render(_)))));
    }
}
