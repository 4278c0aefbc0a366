//! View Panel Widget
//! Central scrollable area showing the page selected in the navigation panel.
//! Page content is computed once per selection and drawn every frame.

use super::nav::{HomeView, Nav};
use crate::charts::ChartPlotter;
use crate::data::schema::{PROFIT, SALES};
use crate::data::{AnalysisError, Dataset};
use crate::insights::{
    CategoricalOverview, CityInsight, Conclusion, Dimension, DimensionInsight, InsightEngine,
    NumericalOverview, RetailOverview, StateInsight, SubCategoryInsight,
};
use crate::stats::GroupedAggregate;
use egui::{Color32, RichText, ScrollArea};

/// Rows shown in the data preview table.
const PREVIEW_ROWS: usize = 10;

const DATASET_URL: &str = "https://bit.ly/3i4rbWl";

const HEADER_COLOR: Color32 = Color32::from_rgb(100, 149, 237);

/// Computed content of one page.
pub enum ViewContent {
    RetailData {
        overview: RetailOverview,
        columns: Vec<String>,
        preview: Vec<Vec<String>>,
    },
    Numerical(NumericalOverview),
    Categorical(CategoricalOverview),
    Dimension(DimensionInsight),
    City(CityInsight),
    State(StateInsight),
    SubCategory(SubCategoryInsight),
    Conclusion(Conclusion),
    DatasetSource { source: String },
    Technologies,
    Error(String),
}

impl ViewContent {
    /// Recompute the insights a page needs.
    pub fn compute(nav: Nav, engine: &InsightEngine<'_>, source: &str) -> Self {
        let result = match nav {
            Nav::Home(view) => Self::compute_home(view, engine),
            Nav::Dataset => Ok(ViewContent::DatasetSource {
                source: source.to_string(),
            }),
            Nav::Technologies => Ok(ViewContent::Technologies),
        };
        result.unwrap_or_else(|e| ViewContent::Error(e.to_string()))
    }

    fn compute_home(view: HomeView, engine: &InsightEngine<'_>) -> Result<Self, AnalysisError> {
        Ok(match view {
            HomeView::RetailData => {
                let (columns, preview) = Self::preview(engine.dataset());
                ViewContent::RetailData {
                    overview: engine.retail_overview()?,
                    columns,
                    preview,
                }
            }
            HomeView::Numerical => ViewContent::Numerical(engine.numerical()?),
            HomeView::Categorical => ViewContent::Categorical(engine.categorical()?),
            HomeView::Insights(Dimension::City) => ViewContent::City(engine.city()?),
            HomeView::Insights(Dimension::State) => ViewContent::State(engine.state()?),
            HomeView::Insights(Dimension::SubCategory) => {
                ViewContent::SubCategory(engine.sub_category()?)
            }
            HomeView::Insights(d) => ViewContent::Dimension(engine.dimension(d)?),
            HomeView::Conclusion => ViewContent::Conclusion(engine.conclusion()?),
        })
    }

    /// Column names and the first rows rendered as text.
    fn preview(dataset: &Dataset) -> (Vec<String>, Vec<Vec<String>>) {
        let head = dataset.frame().head(Some(PREVIEW_ROWS));
        let rows = (0..head.height())
            .map(|i| {
                head.get_columns()
                    .iter()
                    .map(|c| c.get(i).map(|v| v.to_string()).unwrap_or_default())
                    .collect()
            })
            .collect();
        (dataset.column_names(), rows)
    }

    pub fn title(&self) -> String {
        match self {
            ViewContent::RetailData { .. } => "Retail Data".to_string(),
            ViewContent::Numerical(_) => "Numerical Variables".to_string(),
            ViewContent::Categorical(_) => "Categorical Variables".to_string(),
            ViewContent::Dimension(d) => format!("{} Insights", d.dimension),
            ViewContent::City(_) => "City Insights".to_string(),
            ViewContent::State(_) => "State Insights".to_string(),
            ViewContent::SubCategory(_) => "Sub-Category Insights".to_string(),
            ViewContent::Conclusion(_) => "Conclusion".to_string(),
            ViewContent::DatasetSource { .. } => "Dataset".to_string(),
            ViewContent::Technologies => "Technologies".to_string(),
            ViewContent::Error(_) => "Error".to_string(),
        }
    }
}

/// Central panel drawing the current page.
pub struct ViewPanel {
    pub content: ViewContent,
}

impl ViewPanel {
    pub fn new(content: ViewContent) -> Self {
        Self { content }
    }

    pub fn set_content(&mut self, content: ViewContent) {
        self.content = content;
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new(self.content.title())
                        .size(24.0)
                        .strong()
                        .color(HEADER_COLOR),
                );
                ui.add_space(10.0);

                match &self.content {
                    ViewContent::RetailData {
                        overview,
                        columns,
                        preview,
                    } => Self::show_retail_data(ui, overview, columns, preview),
                    ViewContent::Numerical(n) => Self::show_numerical(ui, n),
                    ViewContent::Categorical(c) => Self::show_categorical(ui, c),
                    ViewContent::Dimension(d) => Self::show_dimension(ui, d),
                    ViewContent::City(c) => Self::show_city(ui, c),
                    ViewContent::State(s) => Self::show_state(ui, s),
                    ViewContent::SubCategory(s) => Self::show_sub_category(ui, s),
                    ViewContent::Conclusion(c) => Self::show_conclusion(ui, c),
                    ViewContent::DatasetSource { source } => Self::show_dataset(ui, source),
                    ViewContent::Technologies => Self::show_technologies(ui),
                    ViewContent::Error(message) => {
                        ui.label(
                            RichText::new(format!("Error: {}", message))
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    }
                }
            });
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.add_space(15.0);
        ui.separator();
        ui.label(RichText::new(title).size(16.0).strong());
        ui.add_space(5.0);
    }

    fn show_retail_data(
        ui: &mut egui::Ui,
        overview: &RetailOverview,
        columns: &[String],
        preview: &[Vec<String>],
    ) {
        ui.label(format!(
            "{} records, {} attributes",
            overview.records, overview.attributes
        ));

        Self::section(ui, "First records");
        ScrollArea::horizontal().id_salt("preview_scroll").show(ui, |ui| {
            egui::Grid::new("preview_grid").striped(true).show(ui, |ui| {
                for column in columns {
                    ui.label(RichText::new(column).strong());
                }
                ui.end_row();
                for row in preview {
                    for cell in row {
                        ui.label(cell);
                    }
                    ui.end_row();
                }
            });
        });

        Self::section(ui, "Data dictionary");
        egui::Grid::new("dictionary_grid").striped(true).show(ui, |ui| {
            for (field, meaning) in &overview.dictionary {
                ui.label(RichText::new(field).strong());
                ui.label(meaning);
                ui.end_row();
            }
        });

        Self::section(ui, "Summary statistics");
        egui::Grid::new("summary_grid").striped(true).show(ui, |ui| {
            for header in ["Field", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max", "Missing"] {
                ui.label(RichText::new(header).strong());
            }
            ui.end_row();
            for summary in &overview.numeric_summary {
                let s = &summary.stats;
                ui.label(&summary.field);
                ui.label(s.count.to_string());
                for v in [s.mean, s.std, s.min, s.p25, s.median, s.p75, s.max] {
                    ui.label(format!("{:.2}", v));
                }
                ui.label(summary.missing.to_string());
                ui.end_row();
            }
        });
    }

    fn show_numerical(ui: &mut egui::Ui, numerical: &NumericalOverview) {
        ui.label(format!(
            "Numerical fields: {}",
            numerical.numeric_fields.join(", ")
        ));

        Self::section(ui, "Correlation");
        ChartPlotter::draw_correlation_grid(ui, &numerical.correlation);

        Self::section(ui, "Discrete variables: median Sales");
        for rel in &numerical.discrete {
            ui.label(RichText::new(&rel.field).strong());
            ChartPlotter::draw_aggregate(
                ui,
                &format!("discrete_{}", rel.field),
                &rel.median_sales,
                "Median Sales",
                false,
            );
        }

        Self::section(ui, "Continuous variables: distribution");
        for dist in &numerical.continuous {
            ui.label(RichText::new(&dist.field).strong());
            ChartPlotter::draw_histogram(
                ui,
                &format!("hist_{}", dist.field),
                &dist.histogram,
                &dist.field,
            );
        }
    }

    fn show_categorical(ui: &mut egui::Ui, categorical: &CategoricalOverview) {
        for rel in &categorical.fields {
            Self::section(
                ui,
                &format!("{} ({} categories)", rel.field, rel.unique_count),
            );
            for (label, aggregate, signed) in [
                ("Mean Sales", &rel.mean_sales, false),
                ("Mean Profit", &rel.mean_profit, true),
                ("Mean Discount", &rel.mean_discount, false),
            ] {
                ui.label(label);
                ChartPlotter::draw_aggregate(
                    ui,
                    &format!("cat_{}_{}", rel.field, label),
                    aggregate,
                    label,
                    signed,
                );
            }
        }
    }

    fn show_dimension(ui: &mut egui::Ui, insight: &DimensionInsight) {
        let dim = insight.dimension;

        for (mean, share) in insight.means.iter().zip(&insight.shares) {
            Self::section(ui, &format!("Mean {} by {}", mean.field, dim));
            ui.columns(2, |cols| {
                ChartPlotter::draw_aggregate(
                    &mut cols[0],
                    &format!("{}_{}", dim, mean.field),
                    &mean.aggregate,
                    &mean.field,
                    mean.field == PROFIT,
                );
                ChartPlotter::draw_shares(&mut cols[1], "Share", &share.aggregate);
            });
        }

        Self::section(ui, &format!("Mean Profit by {} and Discount", dim));
        ChartPlotter::draw_aggregate(
            ui,
            &format!("{}_discount_profit", dim),
            &insight.profit_by_discount.labelled(),
            "Mean Profit",
            true,
        );

        Self::section(ui, &format!("Mean Sales by {} and Sub-Category", dim));
        ChartPlotter::draw_aggregate(
            ui,
            &format!("{}_sub_category_sales", dim),
            &insight.sales_by_sub_category.labelled(),
            "Mean Sales",
            false,
        );
    }

    fn show_city(ui: &mut egui::Ui, city: &CityInsight) {
        Self::section(ui, "Deals per city");
        ChartPlotter::draw_aggregate(ui, "city_deals", &city.deals, "Deals", false);

        Self::section(ui, "Least profitable cities");
        ChartPlotter::draw_aggregate(ui, "city_low", &city.lowest_profit, "Mean Profit", true);

        Self::section(ui, "Most profitable cities");
        ChartPlotter::draw_aggregate(ui, "city_high", &city.highest_profit, "Mean Profit", true);
    }

    fn show_state(ui: &mut egui::Ui, state: &StateInsight) {
        Self::section(ui, "Total sales per state");
        ChartPlotter::draw_aggregate(
            ui,
            "state_sales",
            &state.sales_by_code.sorted_by_value(false),
            SALES,
            false,
        );

        Self::section(ui, "Total profit per state");
        ChartPlotter::draw_aggregate(
            ui,
            "state_profit",
            &state.profit_by_code.sorted_by_value(false),
            PROFIT,
            true,
        );

        Self::section(ui, "Deals per state");
        ChartPlotter::draw_aggregate(ui, "state_deals", &state.deals, "Deals", false);

        for turnover in &state.turnover {
            Self::section(ui, &format!("{}: profit by sub-category", turnover.state));
            ui.columns(turnover.categories.len().max(1), |cols| {
                for (col, category) in cols.iter_mut().zip(&turnover.categories) {
                    col.label(RichText::new(category.category.to_string()).strong());
                    ChartPlotter::draw_table(
                        col,
                        &format!("turnover_{}_{}", turnover.state, category.category),
                        ("Sub-Category", "Profit"),
                        &category.profit_by_sub_category,
                    );
                }
            });
        }
    }

    fn show_sub_category(ui: &mut egui::Ui, insight: &SubCategoryInsight) {
        Self::section(ui, "Sub-categories ranked by mean profit");
        let profits = GroupedAggregate::from_entries(
            insight
                .ranked
                .iter()
                .map(|row| (row.sub_category.clone(), row.profit))
                .collect(),
        );
        ChartPlotter::draw_aggregate(ui, "sub_profit", &profits, "Mean Profit", true);

        egui::Grid::new("sub_category_grid").striped(true).show(ui, |ui| {
            for header in ["Sub-Category", "Sales", "Discount", "Profit"] {
                ui.label(RichText::new(header).strong());
            }
            ui.end_row();
            for row in &insight.ranked {
                ui.label(row.sub_category.to_string());
                ui.label(format!("{:.2}", row.sales));
                ui.label(format!("{:.2}", row.discount));
                ui.label(
                    RichText::new(format!("{:.2}", row.profit))
                        .color(ChartPlotter::signed_color(row.profit)),
                );
                ui.end_row();
            }
        });

        for category in &insight.per_unit {
            Self::section(ui, &format!("{}: price vs profit per product", category.category));
            let mut series: Vec<(String, Vec<[f64; 2]>)> = Vec::new();
            for point in &category.points {
                let xy = [point.price_per_product, point.profit_per_product];
                match series.iter_mut().find(|(name, _)| *name == point.sub_category) {
                    Some((_, points)) => points.push(xy),
                    None => series.push((point.sub_category.clone(), vec![xy])),
                }
            }
            ChartPlotter::draw_scatter(
                ui,
                &format!("per_unit_{}", category.category),
                &series,
                "Price per product",
            );
        }
    }

    fn show_conclusion(ui: &mut egui::Ui, conclusion: &Conclusion) {
        ui.label(format!(
            "On average {:.1} deals per state and {:.1} deals per city.",
            conclusion.avg_deals_per_state, conclusion.avg_deals_per_city
        ));

        Self::section(ui, "Top states by sales");
        for headline in &conclusion.top_states_by_sales {
            ui.label(format!(
                "{}: sales {:.2}, profit {:.2}",
                headline.state, headline.sales, headline.profit
            ));
        }
        if let Some(worst) = &conclusion.least_profitable_state {
            Self::section(ui, "Least profitable state");
            ui.label(
                RichText::new(format!("{}: profit {:.2}", worst.state, worst.profit))
                    .color(ChartPlotter::signed_color(worst.profit)),
            );
        }

        Self::section(ui, "Correlations");
        ui.label(format!(
            "Sales vs Profit: {:.3}",
            conclusion.sales_profit_correlation
        ));
        ui.label(format!(
            "Discount vs Profit: {:.3}",
            conclusion.discount_profit_correlation
        ));
    }

    fn show_dataset(ui: &mut egui::Ui, source: &str) {
        ui.label("Sample Superstore retail dataset.");
        ui.label(format!("Loaded from: {}", source));
        ui.hyperlink_to("Retail Dataset", DATASET_URL);
    }

    fn show_technologies(ui: &mut egui::Ui) {
        for (name, role) in [
            ("polars", "CSV loading and columnar data"),
            ("statrs", "Descriptive statistics"),
            ("rayon", "Parallel aggregation"),
            ("egui / eframe / egui_plot", "Dashboard and interactive charts"),
            ("plotters", "Static PNG charts"),
            ("serde / serde_json", "JSON report"),
        ] {
            ui.horizontal(|ui| {
                ui.label(RichText::new(name).strong());
                ui.label(role);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::insights::Dimension;
    use polars::prelude::*;

    fn superstore() -> Dataset {
        Dataset::new(
            df!(
                "Ship Mode" => ["Second Class", "Standard Class", "First Class", "Standard Class"],
                "Segment" => ["Consumer", "Corporate", "Consumer", "Home Office"],
                "Country" => ["United States"; 4],
                "City" => ["Henderson", "Los Angeles", "Fort Lauderdale", "Los Angeles"],
                "State" => ["Kentucky", "California", "Florida", "California"],
                "Postal Code" => [42420i64, 90036, 33311, 90032],
                "Region" => ["South", "West", "South", "West"],
                "Category" => ["Furniture", "Office Supplies", "Furniture", "Technology"],
                "Sub-Category" => ["Bookcases", "Labels", "Tables", "Phones"],
                "Sales" => [261.96, 14.62, 957.5775, 907.152],
                "Quantity" => [2i64, 2, 5, 6],
                "Discount" => [0.0, 0.0, 0.45, 0.2],
                "Profit" => [41.9136, 6.8714, -383.031, 90.7152],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_every_page_computes() {
        let ds = superstore();
        let config = AnalysisConfig::default();
        let engine = InsightEngine::new(&ds, &config);

        let mut pages: Vec<Nav> = HomeView::all().into_iter().map(Nav::Home).collect();
        pages.push(Nav::Dataset);
        pages.push(Nav::Technologies);

        for nav in pages {
            let content = ViewContent::compute(nav, &engine, "sample.csv");
            assert!(
                !matches!(content, ViewContent::Error(_)),
                "page {} failed: {}",
                nav,
                content.title()
            );
        }
    }

    #[test]
    fn test_pages_map_to_content() {
        let ds = superstore();
        let config = AnalysisConfig::default();
        let engine = InsightEngine::new(&ds, &config);

        let state = ViewContent::compute(
            Nav::Home(HomeView::Insights(Dimension::State)),
            &engine,
            "sample.csv",
        );
        assert!(matches!(state, ViewContent::State(_)));

        let region = ViewContent::compute(
            Nav::Home(HomeView::Insights(Dimension::Region)),
            &engine,
            "sample.csv",
        );
        assert_eq!(region.title(), "Region Insights");

        match ViewContent::compute(Nav::Home(HomeView::RetailData), &engine, "sample.csv") {
            ViewContent::RetailData {
                overview,
                columns,
                preview,
            } => {
                assert_eq!(overview.records, 4);
                assert_eq!(columns.len(), 13);
                assert_eq!(preview.len(), 4);
                assert_eq!(preview[0].len(), 13);
            }
            other => panic!("unexpected page {}", other.title()),
        }
    }
}
