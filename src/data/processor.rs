//! Data Processor Module
//! Derived fields: per-unit price/profit and state abbreviations.

use crate::data::schema::{
    PRICE_PER_PRODUCT, PROFIT, PROFIT_PER_PRODUCT, QUANTITY, SALES, STATE, STATE_CODE,
};
use crate::data::{state_abbreviation, AnalysisError, Dataset};
use polars::prelude::*;

/// Builds derived columns. Every operation returns new values and leaves
/// the input dataset untouched.
pub struct DataProcessor;

impl DataProcessor {
    /// `total / Quantity` per row.
    ///
    /// Rows with a null operand yield NaN. A zero quantity is not guarded and
    /// yields an infinite or NaN value; filter those rows first.
    pub fn per_unit(dataset: &Dataset, total_field: &str) -> Result<Vec<f64>, AnalysisError> {
        let totals = dataset.numeric_values(total_field)?;
        let quantities = dataset.numeric_values(QUANTITY)?;

        Ok(totals
            .iter()
            .zip(quantities.iter())
            .map(|(total, qty)| match (total, qty) {
                (Some(t), Some(q)) => t / q,
                _ => f64::NAN,
            })
            .collect())
    }

    /// Sales / Quantity per row.
    pub fn price_per_product(dataset: &Dataset) -> Result<Vec<f64>, AnalysisError> {
        Self::per_unit(dataset, SALES)
    }

    /// Profit / Quantity per row.
    pub fn profit_per_product(dataset: &Dataset) -> Result<Vec<f64>, AnalysisError> {
        Self::per_unit(dataset, PROFIT)
    }

    /// New dataset with `price_per_product` and `profit_per_product` appended.
    pub fn with_per_unit_fields(dataset: &Dataset) -> Result<Dataset, AnalysisError> {
        let price = Self::price_per_product(dataset)?;
        let profit = Self::profit_per_product(dataset)?;

        dataset
            .with_column(Column::new(PRICE_PER_PRODUCT.into(), price))?
            .with_column(Column::new(PROFIT_PER_PRODUCT.into(), profit))
    }

    /// Abbreviation for every row's state. Fails on the first unknown name.
    pub fn state_codes(dataset: &Dataset) -> Result<Vec<Option<&'static str>>, AnalysisError> {
        dataset
            .keys(STATE)?
            .iter()
            .map(|key| match key {
                Some(key) => Ok(Some(state_abbreviation(&key.to_string())?)),
                None => Ok(None),
            })
            .collect()
    }

    /// New dataset with a `state_code` column appended.
    pub fn with_state_codes(dataset: &Dataset) -> Result<Dataset, AnalysisError> {
        let codes = Self::state_codes(dataset)?;
        dataset.with_column(Column::new(STATE_CODE.into(), codes))
    }

    /// Subset of rows with a strictly positive quantity, safe for per-unit fields.
    pub fn positive_quantity(dataset: &Dataset) -> Result<Dataset, AnalysisError> {
        let mask: BooleanChunked = dataset
            .numeric_values(QUANTITY)?
            .iter()
            .map(|q| q.is_some_and(|q| q > 0.0))
            .collect();
        Ok(Dataset::new(dataset.frame().filter(&mask)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LookupError;

    fn two_rows() -> Dataset {
        Dataset::new(
            df!(
                "State" => ["California", "Texas"],
                "Sales" => [10.0, 20.0],
                "Quantity" => [2i64, 5],
                "Profit" => [4.0, -5.0],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_price_per_product_exact() {
        let ds = two_rows();
        assert_eq!(DataProcessor::price_per_product(&ds).unwrap(), vec![5.0, 4.0]);
        assert_eq!(DataProcessor::profit_per_product(&ds).unwrap(), vec![2.0, -1.0]);
    }

    #[test]
    fn test_with_per_unit_fields_returns_new_dataset() {
        let ds = two_rows();
        let derived = DataProcessor::with_per_unit_fields(&ds).unwrap();
        assert_eq!(derived.width(), ds.width() + 2);
        assert_eq!(
            derived.present_values(PRICE_PER_PRODUCT).unwrap(),
            vec![5.0, 4.0]
        );
        assert!(!ds.has_field(PRICE_PER_PRODUCT));
    }

    #[test]
    fn test_state_codes() {
        let ds = DataProcessor::with_state_codes(&two_rows()).unwrap();
        let codes: Vec<String> = ds
            .keys(STATE_CODE)
            .unwrap()
            .into_iter()
            .flatten()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(codes, vec!["CA", "TX"]);
    }

    #[test]
    fn test_unknown_state_surfaces_lookup_error() {
        let ds = Dataset::new(df!("State" => ["Atlantis"]).unwrap());
        let err = DataProcessor::with_state_codes(&ds).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Lookup(LookupError::UnknownState(ref s)) if s == "Atlantis"
        ));
    }

    #[test]
    fn test_zero_quantity_is_not_a_panic() {
        let ds = Dataset::new(
            df!("Sales" => [10.0, 3.0], "Quantity" => [0i64, 3]).unwrap(),
        );
        let price = DataProcessor::price_per_product(&ds).unwrap();
        assert!(price[0].is_infinite());

        let safe = DataProcessor::positive_quantity(&ds).unwrap();
        assert_eq!(DataProcessor::price_per_product(&safe).unwrap(), vec![1.0]);
    }
}
