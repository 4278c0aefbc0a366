//! Statistics Calculator Module
//! Descriptive statistics, histograms, field classification and Pearson correlation.

use crate::data::{is_numeric_dtype, AnalysisError, Dataset};
use crate::stats::Aggregator;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Numeric fields with fewer distinct values than this are treated as discrete.
pub const DEFAULT_DISCRETE_THRESHOLD: usize = 25;

/// Default number of histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// Summary of one numeric field.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for DescriptiveStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Equal-width histogram. `edges` has one more element than `counts`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Centre of each bin.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }
}

/// Square, symmetric matrix of Pearson coefficients over numeric fields.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.fields.iter().position(|f| f == a)?;
        let j = self.fields.iter().position(|f| f == b)?;
        Some(self.values[i][j])
    }
}

/// Statistical computations over datasets and value slices.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Median with the mean of the two middle values for even lengths.
    pub fn median(values: &[f64]) -> f64 {
        let n = values.len();
        if n == 0 {
            return f64::NAN;
        }

        let sorted = Self::sorted(values);
        if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        }
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }

    /// Percentile using linear interpolation between closest ranks.
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Count, mean, sample standard deviation, extremes and quartiles.
    pub fn describe(values: &[f64]) -> DescriptiveStats {
        let n = values.len();
        if n == 0 {
            return DescriptiveStats::default();
        }

        let sorted = Self::sorted(values);
        let std = if n > 1 { values.iter().std_dev() } else { f64::NAN };

        DescriptiveStats {
            count: n,
            mean: values.iter().mean(),
            std,
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Equal-width bins spanning the finite values. The last bin is closed.
    pub fn histogram(values: &[f64], bins: usize) -> Histogram {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Histogram::default();
        }

        let bins = bins.max(1);
        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for v in finite {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram { edges, counts }
    }

    /// Pearson coefficient of two equally long samples; NaN when either side
    /// has fewer than two points or no variance.
    pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
        if xs.len() != ys.len() || xs.len() < 2 {
            return f64::NAN;
        }

        let sx = xs.iter().std_dev();
        let sy = ys.iter().std_dev();
        if !(sx > 0.0 && sy > 0.0) {
            return f64::NAN;
        }

        let r = xs.iter().covariance(ys.iter()) / (sx * sy);
        r.clamp(-1.0, 1.0)
    }

    /// Pearson over the rows where both columns are present.
    fn pairwise_pearson(x: &[Option<f64>], y: &[Option<f64>], diagonal: bool) -> f64 {
        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(y.iter())
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .unzip();

        if diagonal {
            let varies = xs.len() > 1 && xs.iter().std_dev() > 0.0;
            return if varies { 1.0 } else { f64::NAN };
        }
        Self::pearson(&xs, &ys)
    }

    /// Correlation matrix over every numeric field of the dataset.
    pub fn correlation_matrix(dataset: &Dataset) -> Result<CorrelationMatrix, AnalysisError> {
        let fields = Self::numeric_fields(dataset);
        let columns = fields
            .iter()
            .map(|f| dataset.numeric_values(f))
            .collect::<Result<Vec<_>, _>>()?;

        let n = fields.len();
        let pairs: Vec<(usize, usize)> = (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect();

        // Each cell is independent of the others
        let coefficients: Vec<((usize, usize), f64)> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let r = Self::pairwise_pearson(&columns[i], &columns[j], i == j);
                ((i, j), r)
            })
            .collect();

        let mut values = vec![vec![f64::NAN; n]; n];
        for ((i, j), r) in coefficients {
            values[i][j] = r;
            values[j][i] = r;
        }

        Ok(CorrelationMatrix { fields, values })
    }

    /// Numeric columns in file order.
    pub fn numeric_fields(dataset: &Dataset) -> Vec<String> {
        dataset
            .frame()
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Non-numeric columns in file order.
    pub fn categorical_fields(dataset: &Dataset) -> Vec<String> {
        dataset
            .frame()
            .get_columns()
            .iter()
            .filter(|col| !is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Numeric fields with fewer than `threshold` distinct values.
    pub fn discrete_fields(
        dataset: &Dataset,
        threshold: usize,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut discrete = Vec::new();
        for field in Self::numeric_fields(dataset) {
            if Aggregator::unique_count(dataset, &field)? < threshold {
                discrete.push(field);
            }
        }
        Ok(discrete)
    }

    /// Numeric fields that are not discrete.
    pub fn continuous_fields(
        dataset: &Dataset,
        threshold: usize,
    ) -> Result<Vec<String>, AnalysisError> {
        let discrete = Self::discrete_fields(dataset, threshold)?;
        Ok(Self::numeric_fields(dataset)
            .into_iter()
            .filter(|f| !discrete.contains(f))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn numeric() -> Dataset {
        Dataset::new(
            df!(
                "Segment" => ["Consumer", "Corporate", "Consumer", "Home Office", "Consumer"],
                "Sales" => [10.0, 20.0, 30.0, 40.0, 50.0],
                "Profit" => [2.0, 4.0, 6.0, 8.0, 10.0],
                "Discount" => [0.5, 0.4, 0.3, 0.2, 0.1],
                "Quantity" => [Some(3i64), Some(1), None, Some(2), Some(7)],
                "Flat" => [1.0, 1.0, 1.0, 1.0, 1.0],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_field_classification() {
        let ds = numeric();
        assert_eq!(
            StatsCalculator::numeric_fields(&ds),
            vec!["Sales", "Profit", "Discount", "Quantity", "Flat"]
        );
        assert_eq!(StatsCalculator::categorical_fields(&ds), vec!["Segment"]);
        assert_eq!(
            StatsCalculator::discrete_fields(&ds, 5).unwrap(),
            vec!["Quantity", "Flat"]
        );
        assert_eq!(
            StatsCalculator::continuous_fields(&ds, 5).unwrap(),
            vec!["Sales", "Profit", "Discount"]
        );
    }

    #[test]
    fn test_correlation_matrix_symmetric_with_unit_diagonal() {
        let corr = StatsCalculator::correlation_matrix(&numeric()).unwrap();
        assert_eq!(corr.len(), 5);

        for i in 0..corr.len() {
            for j in 0..corr.len() {
                let (a, b) = (corr.values[i][j], corr.values[j][i]);
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }

        assert_eq!(corr.get("Sales", "Sales"), Some(1.0));
        assert_eq!(corr.get("Quantity", "Quantity"), Some(1.0));
        assert!(corr.get("Flat", "Flat").unwrap().is_nan());
        assert!((corr.get("Sales", "Profit").unwrap() - 1.0).abs() < 1e-12);
        assert!((corr.get("Sales", "Discount").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_complete_observations() {
        // Quantity is null on row 3, so only four pairs are used.
        let corr = StatsCalculator::correlation_matrix(&numeric()).unwrap();
        let expected = StatsCalculator::pearson(&[10.0, 20.0, 40.0, 50.0], &[3.0, 1.0, 2.0, 7.0]);
        assert!((corr.get("Sales", "Quantity").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_describe() {
        let stats = StatsCalculator::describe(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.p25, 1.75);
        assert!((stats.std - 1.2909944487358056).abs() < 1e-12);

        assert_eq!(StatsCalculator::describe(&[]).count, 0);
    }

    #[test]
    fn test_histogram_counts_every_finite_value() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0, f64::NAN];
        let hist = StatsCalculator::histogram(&values, 5);
        assert_eq!(hist.counts.len(), 5);
        assert_eq!(hist.edges.len(), 6);
        assert_eq!(hist.total(), 6);
        assert_eq!(hist.counts[4], 1);
        assert_eq!(hist.bin_width(), 2.0);

        let constant = StatsCalculator::histogram(&[3.0, 3.0], 4);
        assert_eq!(constant.total(), 2);
        assert_eq!(constant.edges[0], 2.5);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(StatsCalculator::median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(StatsCalculator::median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(StatsCalculator::median(&[]).is_nan());
    }
}
