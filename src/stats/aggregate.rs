//! Grouped aggregation
//! Partitions rows on one or two categorical fields and reduces a numeric field per group.

use crate::data::{AnalysisError, Dataset, GroupKey};
use crate::stats::StatsCalculator;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, BTreeSet};

/// Reduction applied to the values of each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reduction {
    Mean,
    Median,
    Sum,
    Count,
}

impl Reduction {
    /// Reduce a group's present values. Empty groups give NaN for mean and
    /// median, 0 for sum and count.
    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            Reduction::Mean => values.iter().mean(),
            Reduction::Median => StatsCalculator::median(values),
            Reduction::Sum => values.iter().fold(0.0, |acc, v| acc + v),
            Reduction::Count => values.len() as f64,
        }
    }
}

/// Ordered key -> value mapping produced by a group-by.
///
/// Group-by results come out sorted ascending by key; [`top_k`] and
/// [`sorted_by_value`] reorder by value.
///
/// [`top_k`]: GroupedAggregate::top_k
/// [`sorted_by_value`]: GroupedAggregate::sorted_by_value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAggregate<K> {
    entries: Vec<(K, f64)>,
}

impl<K> Default for GroupedAggregate<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K> GroupedAggregate<K> {
    pub fn from_entries(entries: Vec<(K, f64)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, f64)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    pub fn entries(&self) -> &[(K, f64)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(K, f64)> {
        self.entries
    }

    /// Sum of all group values.
    pub fn total(&self) -> f64 {
        self.values().sum()
    }
}

impl<K: PartialEq> GroupedAggregate<K> {
    pub fn get(&self, key: &K) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }
}

impl<K: Clone> GroupedAggregate<K> {
    /// Stable sort by value. Equal values keep their current relative order.
    pub fn sorted_by_value(&self, ascending: bool) -> Self {
        let mut entries = self.entries.clone();
        if ascending {
            entries.sort_by(|a, b| a.1.total_cmp(&b.1));
        } else {
            entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        }
        Self { entries }
    }

    /// First `k` entries after sorting by value.
    pub fn top_k(&self, k: usize, ascending: bool) -> Self {
        let mut sorted = self.sorted_by_value(ascending);
        sorted.entries.truncate(k);
        sorted
    }

    /// Last `k` entries in the current order.
    pub fn tail(&self, k: usize) -> Self {
        let start = self.entries.len().saturating_sub(k);
        Self {
            entries: self.entries[start..].to_vec(),
        }
    }

    /// Each value as a fraction of the total, as drawn on a pie chart.
    pub fn shares(&self) -> Self {
        let total = self.total();
        Self {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v / total))
                .collect(),
        }
    }
}

impl<A: std::fmt::Display, B: std::fmt::Display> GroupedAggregate<(A, B)> {
    /// Two-level keys joined as `"outer / inner"` for axis labels.
    pub fn labelled(&self) -> GroupedAggregate<String> {
        GroupedAggregate {
            entries: self
                .entries
                .iter()
                .map(|((a, b), v)| (format!("{} / {}", a, b), *v))
                .collect(),
        }
    }
}

/// One value field aggregated over a shared grouping.
#[derive(Debug, Clone, Serialize)]
pub struct NamedAggregate {
    pub field: String,
    pub aggregate: GroupedAggregate<GroupKey>,
}

/// Grouping and reduction over a [`Dataset`].
pub struct Aggregator;

impl Aggregator {
    fn partition<K: Ord>(
        keys: impl IntoIterator<Item = Option<K>>,
        values: &[Option<f64>],
    ) -> BTreeMap<K, Vec<f64>> {
        let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
        for (key, value) in keys.into_iter().zip(values.iter()) {
            let Some(key) = key else {
                continue;
            };
            let bucket = groups.entry(key).or_default();
            if let Some(v) = value {
                bucket.push(*v);
            }
        }
        groups
    }

    fn reduce<K>(groups: BTreeMap<K, Vec<f64>>, reduction: Reduction) -> GroupedAggregate<K> {
        GroupedAggregate::from_entries(
            groups
                .into_iter()
                .map(|(key, values)| {
                    let reduced = reduction.apply(&values);
                    (key, reduced)
                })
                .collect(),
        )
    }

    /// Group rows by `by` and reduce `value` per group.
    pub fn group_by(
        dataset: &Dataset,
        by: &str,
        value: &str,
        reduction: Reduction,
    ) -> Result<GroupedAggregate<GroupKey>, AnalysisError> {
        let keys = dataset.keys(by)?;
        let values = dataset.numeric_values(value)?;
        Ok(Self::reduce(Self::partition(keys, &values), reduction))
    }

    pub fn group_mean(
        dataset: &Dataset,
        by: &str,
        value: &str,
    ) -> Result<GroupedAggregate<GroupKey>, AnalysisError> {
        Self::group_by(dataset, by, value, Reduction::Mean)
    }

    pub fn group_median(
        dataset: &Dataset,
        by: &str,
        value: &str,
    ) -> Result<GroupedAggregate<GroupKey>, AnalysisError> {
        Self::group_by(dataset, by, value, Reduction::Median)
    }

    pub fn group_sum(
        dataset: &Dataset,
        by: &str,
        value: &str,
    ) -> Result<GroupedAggregate<GroupKey>, AnalysisError> {
        Self::group_by(dataset, by, value, Reduction::Sum)
    }

    pub fn group_count(
        dataset: &Dataset,
        by: &str,
        value: &str,
    ) -> Result<GroupedAggregate<GroupKey>, AnalysisError> {
        Self::group_by(dataset, by, value, Reduction::Count)
    }

    /// Two-level grouping on `(by1, by2)`. Rows missing either key are dropped.
    pub fn group_by_pair(
        dataset: &Dataset,
        by1: &str,
        by2: &str,
        value: &str,
        reduction: Reduction,
    ) -> Result<GroupedAggregate<(GroupKey, GroupKey)>, AnalysisError> {
        let outer = dataset.keys(by1)?;
        let inner = dataset.keys(by2)?;
        let values = dataset.numeric_values(value)?;

        let keys = outer
            .into_iter()
            .zip(inner)
            .map(|(a, b)| Some((a?, b?)));
        Ok(Self::reduce(Self::partition(keys, &values), reduction))
    }

    /// Same grouping applied to several value fields.
    pub fn group_by_many(
        dataset: &Dataset,
        by: &str,
        values: &[&str],
        reduction: Reduction,
    ) -> Result<Vec<NamedAggregate>, AnalysisError> {
        values
            .iter()
            .map(|field| {
                Ok(NamedAggregate {
                    field: field.to_string(),
                    aggregate: Self::group_by(dataset, by, field, reduction)?,
                })
            })
            .collect()
    }

    /// Sort a grouped result by value and keep the first `k`.
    pub fn top_k<K: Clone>(
        aggregate: &GroupedAggregate<K>,
        k: usize,
        ascending: bool,
    ) -> GroupedAggregate<K> {
        aggregate.top_k(k, ascending)
    }

    /// Rows per distinct value of `field`, most frequent first.
    pub fn value_counts(
        dataset: &Dataset,
        field: &str,
    ) -> Result<GroupedAggregate<GroupKey>, AnalysisError> {
        let mut counts: BTreeMap<GroupKey, usize> = BTreeMap::new();
        for key in dataset.keys(field)?.into_iter().flatten() {
            *counts.entry(key).or_default() += 1;
        }

        let by_key = GroupedAggregate::from_entries(
            counts.into_iter().map(|(k, n)| (k, n as f64)).collect(),
        );
        Ok(by_key.sorted_by_value(false))
    }

    /// Number of distinct non-null values of `field`.
    pub fn unique_count(dataset: &Dataset, field: &str) -> Result<usize, AnalysisError> {
        let distinct: BTreeSet<GroupKey> = dataset.keys(field)?.into_iter().flatten().collect();
        Ok(distinct.len())
    }
}
