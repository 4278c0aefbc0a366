//! Insights module - the numeric content of every dashboard page
//!
//! Each page is one pure function of the dataset and [`AnalysisConfig`].
//! Intermediate subsets and derived datasets are separate values; the loaded
//! dataset is only ever borrowed.

mod breakdown;
mod overview;

pub use breakdown::{
    CategoryPerUnit, CategoryTurnover, CityInsight, Conclusion, DimensionInsight, PerUnitPoint,
    StateHeadline, StateInsight, StateTurnover, SubCategoryInsight, SubCategoryRow,
};
pub use overview::{
    CategoricalOverview, CategoricalRelation, ContinuousDistribution, DiscreteRelation,
    FieldSummary, NumericalOverview, RetailOverview,
};

use crate::config::AnalysisConfig;
use crate::data::schema::{CATEGORY, CITY, REGION, SEGMENT, SHIP_MODE, STATE, SUB_CATEGORY};
use crate::data::{AnalysisError, Dataset};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Categorical field an insight page is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dimension {
    ShipMode,
    Segment,
    Region,
    City,
    State,
    Category,
    SubCategory,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::ShipMode,
        Dimension::Segment,
        Dimension::Region,
        Dimension::City,
        Dimension::State,
        Dimension::Category,
        Dimension::SubCategory,
    ];

    /// Dimensions rendered with the shared mean/discount/sub-category breakdown.
    pub const BREAKDOWNS: [Dimension; 4] = [
        Dimension::ShipMode,
        Dimension::Segment,
        Dimension::Region,
        Dimension::Category,
    ];

    /// Dataset column backing this dimension.
    pub fn field(self) -> &'static str {
        match self {
            Dimension::ShipMode => SHIP_MODE,
            Dimension::Segment => SEGMENT,
            Dimension::Region => REGION,
            Dimension::City => CITY,
            Dimension::State => STATE,
            Dimension::Category => CATEGORY,
            Dimension::SubCategory => SUB_CATEGORY,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Every page at once, for the JSON report and static export.
#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    pub overview: RetailOverview,
    pub numerical: NumericalOverview,
    pub categorical: CategoricalOverview,
    pub dimensions: Vec<DimensionInsight>,
    pub city: CityInsight,
    pub state: StateInsight,
    pub sub_category: SubCategoryInsight,
    pub conclusion: Conclusion,
}

/// Computes insight pages over a borrowed dataset.
pub struct InsightEngine<'a> {
    dataset: &'a Dataset,
    config: &'a AnalysisConfig,
}

impl<'a> InsightEngine<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a AnalysisConfig) -> Self {
        Self { dataset, config }
    }

    pub fn dataset(&self) -> &Dataset {
        self.dataset
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.config
    }

    /// Compute every page.
    pub fn report(&self) -> Result<InsightReport, AnalysisError> {
        let dimensions = Dimension::BREAKDOWNS
            .iter()
            .map(|&d| self.dimension(d))
            .collect::<Result<Vec<_>, _>>()?;

        let report = InsightReport {
            overview: self.retail_overview()?,
            numerical: self.numerical()?,
            categorical: self.categorical()?,
            dimensions,
            city: self.city()?,
            state: self.state()?,
            sub_category: self.sub_category()?,
            conclusion: self.conclusion()?,
        };
        info!(records = report.overview.records, "insight report computed");
        Ok(report)
    }
}
