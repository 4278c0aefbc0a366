//! Retail EDA Main Application
//! Main window with navigation panel and page view.

use super::nav::Nav;
use super::nav_panel::{NavAction, NavPanel};
use super::view_panel::{ViewContent, ViewPanel};
use crate::charts::ChartExporter;
use crate::config::Config;
use crate::data::Dataset;
use crate::insights::InsightEngine;
use egui::SidePanel;
use std::path::Path;
use tracing::{error, info};

/// Main application window.
pub struct InsightsApp {
    dataset: Dataset,
    config: Config,
    source: String,
    nav_panel: NavPanel,
    view_panel: ViewPanel,
}

impl InsightsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dataset: Dataset, config: Config) -> Self {
        let source = config.data.path.display().to_string();
        let content = {
            let engine = InsightEngine::new(&dataset, &config.analysis);
            ViewContent::compute(Nav::default(), &engine, &source)
        };

        Self {
            nav_panel: NavPanel::new(source.clone(), dataset.height()),
            view_panel: ViewPanel::new(content),
            dataset,
            config,
            source,
        }
    }

    /// Recompute the page for the current selection.
    fn refresh_view(&mut self) {
        let nav = self.nav_panel.selected;
        let engine = InsightEngine::new(&self.dataset, &self.config.analysis);
        let content = ViewContent::compute(nav, &engine, &self.source);
        if let ViewContent::Error(message) = &content {
            error!(view = %nav, error = %message, "failed to compute view");
        }
        self.view_panel.set_content(content);
    }

    /// Handle chart export - pick a folder and write the report into it
    fn handle_export_charts(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        match self.export_to(&dir) {
            Ok(count) => {
                info!(dir = %dir.display(), files = count, "charts exported");
                self.nav_panel
                    .set_status(format!("Exported {} files to {}", count, dir.display()));
            }
            Err(e) => {
                error!(error = %e, "chart export failed");
                self.nav_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    fn export_to(&self, dir: &Path) -> anyhow::Result<usize> {
        let engine = InsightEngine::new(&self.dataset, &self.config.analysis);
        let report = engine.report()?;
        let written = ChartExporter::new(&self.config.export).export_report(&report, dir)?;
        Ok(written.len())
    }
}

impl eframe::App for InsightsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Navigation
        SidePanel::left("nav_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.nav_panel.show(ui) {
                        NavAction::ViewChanged => self.refresh_view(),
                        NavAction::ExportCharts => self.handle_export_charts(),
                        NavAction::None => {}
                    }
                });
            });

        // Central panel - Page view
        egui::CentralPanel::default().show(ctx, |ui| {
            self.view_panel.show(ui);
        });
    }
}
