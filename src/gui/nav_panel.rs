//! Navigation Panel Widget
//! Left side panel with the page menu, dataset status and export button.

use super::nav::{HomeView, Nav};
use egui::{Color32, RichText};

/// Left side navigation panel.
pub struct NavPanel {
    pub selected: Nav,
    pub status: String,
    pub source: String,
    pub records: usize,
}

impl NavPanel {
    pub fn new(source: String, records: usize) -> Self {
        Self {
            selected: Nav::default(),
            status: "Ready".to_string(),
            source,
            records,
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> NavAction {
        let mut export_clicked = false;
        let before = self.selected;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🛒 Retail EDA")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Superstore sales").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Home =====
        ui.label(RichText::new("🏠 Home").size(14.0).strong());
        ui.add_space(5.0);
        for view in HomeView::all() {
            ui.radio_value(&mut self.selected, Nav::Home(view), view.to_string());
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== About =====
        ui.label(RichText::new("ℹ About").size(14.0).strong());
        ui.add_space(5.0);
        ui.radio_value(&mut self.selected, Nav::Dataset, "Dataset");
        ui.radio_value(&mut self.selected, Nav::Technologies, "Technologies");

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&self.source).size(12.0));
                ui.label(
                    RichText::new(format!("{} records", self.records))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            });

        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("🖼 Export charts").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(button).clicked() {
                export_clicked = true;
            }
        });

        ui.add_space(10.0);
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        Self::resolve_action(before, self.selected, export_clicked)
    }

    /// One action per frame; an export click wins over a selection change.
    pub fn resolve_action(before: Nav, after: Nav, export_clicked: bool) -> NavAction {
        if export_clicked {
            NavAction::ExportCharts
        } else if before != after {
            NavAction::ViewChanged
        } else {
            NavAction::None
        }
    }
}

/// Actions triggered by the navigation panel
#[derive(Debug, Clone, PartialEq)]
pub enum NavAction {
    None,
    ViewChanged,
    ExportCharts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::Dimension;

    #[test]
    fn test_resolve_action() {
        let home = Nav::default();
        let city = Nav::Home(HomeView::Insights(Dimension::City));

        assert_eq!(NavPanel::resolve_action(home, home, false), NavAction::None);
        assert_eq!(NavPanel::resolve_action(home, city, false), NavAction::ViewChanged);
        assert_eq!(NavPanel::resolve_action(home, home, true), NavAction::ExportCharts);
    }
}
