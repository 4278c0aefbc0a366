//! Data module - CSV loading, dataset access and derived fields

mod dataset;
mod loader;
mod processor;
pub mod schema;
mod states;

pub use dataset::{is_numeric_dtype, AnalysisError, Dataset, GroupKey};
pub use loader::{DataLoader, LoaderError};
pub use processor::DataProcessor;
pub use states::{state_abbreviation, LookupError, STATE_CODES};
