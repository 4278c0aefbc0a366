//! Dataset-wide pages: retail data, numerical and categorical variables.

use super::InsightEngine;
use crate::data::schema::{DATA_DICTIONARY, DISCOUNT, PROFIT, SALES};
use crate::data::{AnalysisError, GroupKey};
use crate::stats::{
    Aggregator, CorrelationMatrix, DescriptiveStats, GroupedAggregate, Histogram, StatsCalculator,
};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub field: String,
    pub stats: DescriptiveStats,
    pub missing: usize,
}

/// Shape, data dictionary and per-field summaries.
#[derive(Debug, Clone, Serialize)]
pub struct RetailOverview {
    pub records: usize,
    pub attributes: usize,
    pub dictionary: Vec<(String, String)>,
    pub numeric_summary: Vec<FieldSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscreteRelation {
    pub field: String,
    pub median_sales: GroupedAggregate<GroupKey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContinuousDistribution {
    pub field: String,
    pub histogram: Histogram,
}

#[derive(Debug, Clone, Serialize)]
pub struct NumericalOverview {
    pub numeric_fields: Vec<String>,
    pub correlation: CorrelationMatrix,
    pub discrete: Vec<DiscreteRelation>,
    pub continuous: Vec<ContinuousDistribution>,
}

/// Mean Sales, Profit and Discount per category of one categorical field.
#[derive(Debug, Clone, Serialize)]
pub struct CategoricalRelation {
    pub field: String,
    pub unique_count: usize,
    pub mean_sales: GroupedAggregate<GroupKey>,
    pub mean_profit: GroupedAggregate<GroupKey>,
    pub mean_discount: GroupedAggregate<GroupKey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoricalOverview {
    pub fields: Vec<CategoricalRelation>,
}

impl InsightEngine<'_> {
    pub fn retail_overview(&self) -> Result<RetailOverview, AnalysisError> {
        let ds = self.dataset;

        let dictionary = DATA_DICTIONARY
            .iter()
            .filter(|(field, _)| ds.has_field(field))
            .map(|(field, meaning)| (field.to_string(), meaning.to_string()))
            .collect();

        let numeric_summary = StatsCalculator::numeric_fields(ds)
            .into_iter()
            .map(|field| {
                let values = ds.present_values(&field)?;
                Ok(FieldSummary {
                    stats: StatsCalculator::describe(&values),
                    missing: ds.null_count(&field)?,
                    field,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        Ok(RetailOverview {
            records: ds.height(),
            attributes: ds.width(),
            dictionary,
            numeric_summary,
        })
    }

    pub fn numerical(&self) -> Result<NumericalOverview, AnalysisError> {
        let ds = self.dataset;
        let threshold = self.config.discrete_threshold;

        let discrete = StatsCalculator::discrete_fields(ds, threshold)?
            .into_iter()
            .map(|field| {
                Ok(DiscreteRelation {
                    median_sales: Aggregator::group_median(ds, &field, SALES)?,
                    field,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        let continuous = StatsCalculator::continuous_fields(ds, threshold)?
            .into_iter()
            .map(|field| {
                let values = ds.present_values(&field)?;
                Ok(ContinuousDistribution {
                    histogram: StatsCalculator::histogram(&values, self.config.histogram_bins),
                    field,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        debug!(
            discrete = discrete.len(),
            continuous = continuous.len(),
            "numerical fields classified"
        );

        Ok(NumericalOverview {
            numeric_fields: StatsCalculator::numeric_fields(ds),
            correlation: StatsCalculator::correlation_matrix(ds)?,
            discrete,
            continuous,
        })
    }

    pub fn categorical(&self) -> Result<CategoricalOverview, AnalysisError> {
        let ds = self.dataset;
        let fields = StatsCalculator::categorical_fields(ds);

        // Fields are independent; compute them in parallel
        let fields = fields
            .par_iter()
            .map(|field| {
                Ok(CategoricalRelation {
                    field: field.clone(),
                    unique_count: Aggregator::unique_count(ds, field)?,
                    mean_sales: Aggregator::group_mean(ds, field, SALES)?,
                    mean_profit: Aggregator::group_mean(ds, field, PROFIT)?,
                    mean_discount: Aggregator::group_mean(ds, field, DISCOUNT)?,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        Ok(CategoricalOverview { fields })
    }
}
