//! Immutable dataset wrapper
//! Read-only access to a loaded DataFrame: typed column extraction and grouping keys.

use crate::data::states::LookupError;
use polars::prelude::*;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Field '{0}' is not numeric")]
    NotNumeric(String),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Whether a column dtype holds numbers.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// A single categorical value used as a grouping key.
///
/// Keys of one column share a variant. Numeric keys order numerically and
/// text keys lexicographically; numbers sort before text when mixed.
#[derive(Debug, Clone)]
pub enum GroupKey {
    Int(i64),
    Float(f64),
    Text(String),
}

impl GroupKey {
    /// Convert a cell into a key. Nulls and NaN have no key.
    pub fn from_any_value(value: AnyValue<'_>) -> Option<Self> {
        match value {
            AnyValue::Null => None,
            AnyValue::Int8(v) => Some(Self::Int(v as i64)),
            AnyValue::Int16(v) => Some(Self::Int(v as i64)),
            AnyValue::Int32(v) => Some(Self::Int(v as i64)),
            AnyValue::Int64(v) => Some(Self::Int(v)),
            AnyValue::UInt8(v) => Some(Self::Int(v as i64)),
            AnyValue::UInt16(v) => Some(Self::Int(v as i64)),
            AnyValue::UInt32(v) => Some(Self::Int(v as i64)),
            AnyValue::UInt64(v) => Some(Self::Int(v as i64)),
            AnyValue::Float32(v) if !v.is_nan() => Some(Self::from(v as f64)),
            AnyValue::Float64(v) if !v.is_nan() => Some(Self::from(v)),
            AnyValue::Float32(_) | AnyValue::Float64(_) => None,
            AnyValue::String(s) => Some(Self::Text(s.to_string())),
            AnyValue::StringOwned(s) => Some(Self::Text(s.to_string())),
            other => Some(Self::Text(other.to_string().trim_matches('"').to_string())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for GroupKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for GroupKey {
    /// `-0.0` is stored as `0.0` so both zeros share a group.
    fn from(value: f64) -> Self {
        Self::Float(value + 0.0)
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).total_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.total_cmp(&(*b as f64)),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Text(_), _) => Ordering::Greater,
            (_, Self::Text(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// The loaded retail table. Never mutated after construction; derived
/// columns produce a new `Dataset`.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
}

impl Dataset {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Number of records.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Number of attributes.
    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.df.column(field).is_ok()
    }

    fn column(&self, field: &str) -> Result<&Column, AnalysisError> {
        self.df
            .column(field)
            .map_err(|_| AnalysisError::UnknownField(field.to_string()))
    }

    pub fn is_numeric(&self, field: &str) -> Result<bool, AnalysisError> {
        Ok(is_numeric_dtype(self.column(field)?.dtype()))
    }

    /// Values of a numeric field as f64. Nulls and NaN become `None`.
    pub fn numeric_values(&self, field: &str) -> Result<Vec<Option<f64>>, AnalysisError> {
        let column = self.column(field)?;
        if !is_numeric_dtype(column.dtype()) {
            return Err(AnalysisError::NotNumeric(field.to_string()));
        }

        let as_f64 = column.cast(&DataType::Float64)?;
        let values = as_f64
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    /// Present values of a numeric field, nulls dropped.
    pub fn present_values(&self, field: &str) -> Result<Vec<f64>, AnalysisError> {
        Ok(self.numeric_values(field)?.into_iter().flatten().collect())
    }

    /// Grouping keys of a field, one per row.
    pub fn keys(&self, field: &str) -> Result<Vec<Option<GroupKey>>, AnalysisError> {
        let column = self.column(field)?;
        let keys = (0..self.df.height())
            .map(|i| column.get(i).ok().and_then(GroupKey::from_any_value))
            .collect();
        Ok(keys)
    }

    pub fn null_count(&self, field: &str) -> Result<usize, AnalysisError> {
        Ok(self.column(field)?.null_count())
    }

    /// New dataset with `column` appended (or replaced if the name exists).
    pub fn with_column(&self, column: Column) -> Result<Dataset, AnalysisError> {
        let mut df = self.df.clone();
        df.with_column(column)?;
        Ok(Dataset::new(df))
    }

    /// Subset of rows whose `field` equals `key`.
    pub fn filter_eq(&self, field: &str, key: &GroupKey) -> Result<Dataset, AnalysisError> {
        let mask: BooleanChunked = self
            .keys(field)?
            .iter()
            .map(|k| k.as_ref() == Some(key))
            .collect();
        Ok(Dataset::new(self.df.filter(&mask)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let df = df!(
            "City" => ["Houston", "Austin", "Houston"],
            "Quantity" => [2i64, 5, 3],
            "Sales" => [Some(10.0), None, Some(f64::NAN)],
        )
        .unwrap();
        Dataset::new(df)
    }

    #[test]
    fn test_numeric_values_skip_null_and_nan() {
        let ds = sample();
        assert_eq!(ds.numeric_values("Sales").unwrap(), vec![Some(10.0), None, None]);
        assert_eq!(ds.present_values("Quantity").unwrap(), vec![2.0, 5.0, 3.0]);
    }

    #[test]
    fn test_text_field_is_not_numeric() {
        let ds = sample();
        assert!(matches!(
            ds.numeric_values("City"),
            Err(AnalysisError::NotNumeric(_))
        ));
        assert!(matches!(
            ds.keys("Nope"),
            Err(AnalysisError::UnknownField(_))
        ));
    }

    #[test]
    fn test_keys_and_filter() {
        let ds = sample();
        let keys = ds.keys("City").unwrap();
        assert_eq!(keys[0], Some(GroupKey::from("Houston")));

        let houston = ds.filter_eq("City", &GroupKey::from("Houston")).unwrap();
        assert_eq!(houston.height(), 2);
        // The source dataset is untouched.
        assert_eq!(ds.height(), 3);
    }

    #[test]
    fn test_negative_zero_key_is_normalised() {
        match GroupKey::from_any_value(AnyValue::Float64(-0.0)) {
            Some(GroupKey::Float(v)) => assert!(v == 0.0 && v.is_sign_positive()),
            other => panic!("unexpected key {:?}", other),
        }
        assert_eq!(GroupKey::from(-0.0), GroupKey::from(0.0));
    }

    #[test]
    fn test_group_key_ordering() {
        let mut keys = vec![
            GroupKey::from("b"),
            GroupKey::from(0.5),
            GroupKey::from("a"),
            GroupKey::from(1i64),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                GroupKey::from(0.5),
                GroupKey::from(1i64),
                GroupKey::from("a"),
                GroupKey::from("b"),
            ]
        );
        assert_eq!(GroupKey::from(2i64), GroupKey::from(2.0));
    }
}
