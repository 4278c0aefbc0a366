//! Per-dimension pages: ship mode, segment, region, category, city, state,
//! sub-category and the closing summary.

use super::{Dimension, InsightEngine};
use crate::data::schema::{
    CATEGORY, CITY, DISCOUNT, PROFIT, SALES, STATE, STATE_CODE, SUB_CATEGORY, SUMMARY_FIELDS,
};
use crate::data::{AnalysisError, DataProcessor, GroupKey};
use crate::stats::{Aggregator, GroupedAggregate, NamedAggregate, Reduction, StatsCalculator};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize)]
pub struct DimensionInsight {
    pub dimension: Dimension,
    /// Mean Sales, Discount and Profit per group.
    pub means: Vec<NamedAggregate>,
    /// The same means as fractions of their column total.
    pub shares: Vec<NamedAggregate>,
    pub profit_by_discount: GroupedAggregate<(GroupKey, GroupKey)>,
    pub sales_by_sub_category: GroupedAggregate<(GroupKey, GroupKey)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityInsight {
    /// Most frequent cities by number of deals.
    pub deals: GroupedAggregate<GroupKey>,
    /// Lowest mean profit first.
    pub lowest_profit: GroupedAggregate<GroupKey>,
    /// Highest mean profit last.
    pub highest_profit: GroupedAggregate<GroupKey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTurnover {
    pub category: GroupKey,
    pub profit_by_sub_category: GroupedAggregate<GroupKey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateTurnover {
    pub state: String,
    pub categories: Vec<CategoryTurnover>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateInsight {
    /// Total sales per state code (map data).
    pub sales_by_code: GroupedAggregate<GroupKey>,
    /// Total profit per state code (map data).
    pub profit_by_code: GroupedAggregate<GroupKey>,
    pub deals: GroupedAggregate<GroupKey>,
    pub turnover: Vec<StateTurnover>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubCategoryRow {
    pub sub_category: GroupKey,
    pub sales: f64,
    pub discount: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerUnitPoint {
    pub sub_category: String,
    pub price_per_product: f64,
    pub profit_per_product: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPerUnit {
    pub category: String,
    pub points: Vec<PerUnitPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubCategoryInsight {
    /// Mean Sales/Discount/Profit per sub-category, ascending by profit.
    pub ranked: Vec<SubCategoryRow>,
    pub per_unit: Vec<CategoryPerUnit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateHeadline {
    pub state: String,
    pub sales: f64,
    pub profit: f64,
}

/// Headline figures drawn from the data.
#[derive(Debug, Clone, Serialize)]
pub struct Conclusion {
    pub avg_deals_per_state: f64,
    pub avg_deals_per_city: f64,
    pub top_states_by_sales: Vec<StateHeadline>,
    pub least_profitable_state: Option<StateHeadline>,
    pub sales_profit_correlation: f64,
    pub discount_profit_correlation: f64,
}

impl InsightEngine<'_> {
    pub fn dimension(&self, dimension: Dimension) -> Result<DimensionInsight, AnalysisError> {
        let ds = self.dataset;
        let by = dimension.field();

        let means = Aggregator::group_by_many(ds, by, &SUMMARY_FIELDS, Reduction::Mean)?;
        let shares = means
            .iter()
            .map(|m| NamedAggregate {
                field: m.field.clone(),
                aggregate: m.aggregate.shares(),
            })
            .collect();

        debug!(
            dimension = %dimension,
            groups = means.first().map_or(0, |m| m.aggregate.len()),
            "dimension breakdown"
        );

        Ok(DimensionInsight {
            dimension,
            means,
            shares,
            profit_by_discount: Aggregator::group_by_pair(ds, by, DISCOUNT, PROFIT, Reduction::Mean)?,
            sales_by_sub_category: Aggregator::group_by_pair(
                ds,
                by,
                SUB_CATEGORY,
                SALES,
                Reduction::Mean,
            )?,
        })
    }

    pub fn city(&self) -> Result<CityInsight, AnalysisError> {
        let ds = self.dataset;
        let n = self.config.top_profit_cities;

        let deals = Aggregator::value_counts(ds, CITY)?.top_k(self.config.top_deal_cities, false);
        let by_profit = Aggregator::group_mean(ds, CITY, PROFIT)?.sorted_by_value(true);

        Ok(CityInsight {
            deals,
            lowest_profit: by_profit.top_k(n, true),
            highest_profit: by_profit.tail(n),
        })
    }

    pub fn state(&self) -> Result<StateInsight, AnalysisError> {
        let ds = self.dataset;
        let coded = DataProcessor::with_state_codes(ds)?;

        let mut turnover = Vec::new();
        for state in &self.config.turnover_states {
            let subset = ds.filter_eq(STATE, &GroupKey::from(state.as_str()))?;
            if subset.height() == 0 {
                warn!(state = %state, "no records for configured state, skipping");
                continue;
            }

            let by_category =
                Aggregator::group_by_pair(&subset, CATEGORY, SUB_CATEGORY, PROFIT, Reduction::Sum)?;

            let mut categories: BTreeMap<GroupKey, Vec<(GroupKey, f64)>> = BTreeMap::new();
            for ((category, sub_category), profit) in by_category.into_entries() {
                categories
                    .entry(category)
                    .or_default()
                    .push((sub_category, profit));
            }

            turnover.push(StateTurnover {
                state: state.clone(),
                categories: categories
                    .into_iter()
                    .map(|(category, entries)| CategoryTurnover {
                        category,
                        profit_by_sub_category: GroupedAggregate::from_entries(entries),
                    })
                    .collect(),
            });
        }

        Ok(StateInsight {
            sales_by_code: Aggregator::group_sum(&coded, STATE_CODE, SALES)?,
            profit_by_code: Aggregator::group_sum(&coded, STATE_CODE, PROFIT)?,
            deals: Aggregator::value_counts(ds, STATE)?,
            turnover,
        })
    }

    pub fn sub_category(&self) -> Result<SubCategoryInsight, AnalysisError> {
        let ds = self.dataset;

        let sales = Aggregator::group_mean(ds, SUB_CATEGORY, SALES)?;
        let discount = Aggregator::group_mean(ds, SUB_CATEGORY, DISCOUNT)?;
        let profit = Aggregator::group_mean(ds, SUB_CATEGORY, PROFIT)?;

        let ranked = profit
            .sorted_by_value(true)
            .into_entries()
            .into_iter()
            .map(|(key, profit)| SubCategoryRow {
                sales: sales.get(&key).unwrap_or(f64::NAN),
                discount: discount.get(&key).unwrap_or(f64::NAN),
                profit,
                sub_category: key,
            })
            .collect();

        // Per-unit values are only defined for rows with a positive quantity
        let sellable = DataProcessor::positive_quantity(ds)?;
        let prices = DataProcessor::price_per_product(&sellable)?;
        let unit_profits = DataProcessor::profit_per_product(&sellable)?;
        let categories = sellable.keys(CATEGORY)?;
        let sub_categories = sellable.keys(SUB_CATEGORY)?;

        let mut per_category: BTreeMap<GroupKey, Vec<PerUnitPoint>> = BTreeMap::new();
        for (i, (category, sub_category)) in categories.into_iter().zip(sub_categories).enumerate() {
            let (Some(category), Some(sub_category)) = (category, sub_category) else {
                continue;
            };
            per_category.entry(category).or_default().push(PerUnitPoint {
                sub_category: sub_category.to_string(),
                price_per_product: prices[i],
                profit_per_product: unit_profits[i],
            });
        }

        Ok(SubCategoryInsight {
            ranked,
            per_unit: per_category
                .into_iter()
                .map(|(category, points)| CategoryPerUnit {
                    category: category.to_string(),
                    points,
                })
                .collect(),
        })
    }

    pub fn conclusion(&self) -> Result<Conclusion, AnalysisError> {
        let ds = self.dataset;
        let records = ds.height() as f64;

        let states = Aggregator::unique_count(ds, STATE)?;
        let cities = Aggregator::unique_count(ds, CITY)?;
        let sales = Aggregator::group_sum(ds, STATE, SALES)?;
        let profit = Aggregator::group_sum(ds, STATE, PROFIT)?;

        let headline = |key: &GroupKey| StateHeadline {
            state: key.to_string(),
            sales: sales.get(key).unwrap_or(f64::NAN),
            profit: profit.get(key).unwrap_or(f64::NAN),
        };

        let top_states_by_sales = sales
            .top_k(self.config.headline_states, false)
            .keys()
            .map(headline)
            .collect();
        let least_profitable_state = profit.top_k(1, true).keys().next().map(headline);

        let pearson = |a: &str, b: &str| -> Result<f64, AnalysisError> {
            let pairs: (Vec<f64>, Vec<f64>) = ds
                .numeric_values(a)?
                .into_iter()
                .zip(ds.numeric_values(b)?)
                .filter_map(|(x, y)| Some((x?, y?)))
                .unzip();
            Ok(StatsCalculator::pearson(&pairs.0, &pairs.1))
        };

        Ok(Conclusion {
            avg_deals_per_state: if states == 0 { f64::NAN } else { records / states as f64 },
            avg_deals_per_city: if cities == 0 { f64::NAN } else { records / cities as f64 },
            top_states_by_sales,
            least_profitable_state,
            sales_profit_correlation: pearson(SALES, PROFIT)?,
            discount_profit_correlation: pearson(DISCOUNT, PROFIT)?,
        })
    }
}
