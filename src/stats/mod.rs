//! Stats module - Aggregation engine and descriptive statistics

mod aggregate;
mod calculator;

pub use aggregate::{Aggregator, GroupedAggregate, NamedAggregate, Reduction};
pub use calculator::{
    CorrelationMatrix, DescriptiveStats, Histogram, StatsCalculator, DEFAULT_DISCRETE_THRESHOLD,
    DEFAULT_HISTOGRAM_BINS,
};
