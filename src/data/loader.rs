//! CSV Data Loader Module
//! Reads the retail CSV once with Polars and checks it carries the expected columns.

use crate::data::schema::REQUIRED_COLUMNS;
use crate::data::Dataset;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("No data loaded")]
    NoData,
}

/// Loads CSV files into an immutable [`Dataset`].
pub struct DataLoader {
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: 10_000,
        }
    }

    /// Number of rows Polars inspects when inferring column types.
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows.max(1);
        self
    }

    /// Load any CSV file. Parsing is strict: a malformed cell fails the load.
    pub fn load_csv(&self, path: &Path) -> Result<Dataset, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .finish()?
            .collect()?;

        if df.height() == 0 {
            return Err(LoaderError::NoData);
        }

        debug!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "csv parsed"
        );
        Ok(Dataset::new(df))
    }

    /// Load the retail dataset and verify its schema.
    pub fn load_retail(&self, path: &Path) -> Result<Dataset, LoaderError> {
        let dataset = self.load_csv(path)?;
        Self::validate_schema(&dataset)?;
        info!(
            rows = dataset.height(),
            attributes = dataset.width(),
            "retail dataset loaded"
        );
        Ok(dataset)
    }

    /// Check that every required retail column is present.
    pub fn validate_schema(dataset: &Dataset) -> Result<(), LoaderError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !dataset.has_field(name))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LoaderError::MissingColumns(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file() {
        let err = DataLoader::new()
            .load_csv(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn test_schema_check_lists_missing_columns() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Ship Mode,Sales").unwrap();
        writeln!(file, "Standard Class,12.5").unwrap();

        let loader = DataLoader::new();
        let dataset = loader.load_csv(file.path()).unwrap();
        assert_eq!(dataset.height(), 1);

        match loader.load_retail(file.path()) {
            Err(LoaderError::MissingColumns(cols)) => {
                assert_eq!(cols.len(), 11);
                assert!(cols.contains(&"Profit".to_string()));
                assert!(!cols.contains(&"Sales".to_string()));
            }
            other => panic!("expected missing columns, got {:?}", other.map(|d| d.height())),
        }
    }

    #[test]
    fn test_header_only_file_has_no_data() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Ship Mode,Sales").unwrap();
        let err = DataLoader::new().load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::NoData));
    }
}
