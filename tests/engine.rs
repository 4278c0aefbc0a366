//! End-to-end checks: load a retail CSV from disk and run the aggregation
//! engine and insight pages over it.

use polars::prelude::*;
use retail_eda::config::AnalysisConfig;
use retail_eda::data::{
    state_abbreviation, DataLoader, DataProcessor, Dataset, GroupKey, LoaderError, LookupError,
};
use retail_eda::insights::{Dimension, InsightEngine};
use retail_eda::stats::{Aggregator, StatsCalculator};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "Ship Mode,Segment,Country,City,State,Postal Code,Region,Category,Sub-Category,Sales,Quantity,Discount,Profit";

const ROWS: [&str; 10] = [
    "Second Class,Consumer,United States,Henderson,Kentucky,42420,South,Furniture,Bookcases,261.96,2,0,41.9136",
    "Second Class,Consumer,United States,Henderson,Kentucky,42420,South,Furniture,Chairs,731.94,3,0,219.582",
    "Second Class,Corporate,United States,Los Angeles,California,90036,West,Office Supplies,Labels,14.62,2,0,6.8714",
    "Standard Class,Consumer,United States,Fort Lauderdale,Florida,33311,South,Furniture,Tables,957.5775,5,0.45,-383.031",
    "Standard Class,Consumer,United States,Fort Lauderdale,Florida,33311,South,Office Supplies,Storage,22.368,2,0.2,2.5164",
    "Standard Class,Consumer,United States,Los Angeles,California,90032,West,Furniture,Furnishings,48.86,7,0,14.1694",
    "Standard Class,Consumer,United States,Los Angeles,California,90032,West,Office Supplies,Art,7.28,4,0,1.9656",
    "Standard Class,Consumer,United States,Los Angeles,California,90032,West,Technology,Phones,907.152,6,0.2,90.7152",
    "Standard Class,Home Office,United States,Concord,North Carolina,28027,South,Office Supplies,Binders,18.504,3,0.2,5.7825",
    "First Class,Corporate,United States,Seattle,Washington,98103,West,Technology,Accessories,114.9,5,0,34.47",
];

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn load_store() -> Dataset {
    let mut lines = vec![HEADER];
    lines.extend(ROWS);
    let file = write_csv(&lines);
    DataLoader::new().load_retail(file.path()).unwrap()
}

#[test]
fn test_load_retail_csv() {
    let ds = load_store();
    assert_eq!(ds.height(), 10);
    assert_eq!(ds.width(), 13);
    assert!(ds.is_numeric("Sales").unwrap());
    assert!(!ds.is_numeric("State").unwrap());
}

#[test]
fn test_load_rejects_missing_columns_and_files() {
    let file = write_csv(&["State,Sales", "Texas,10.0"]);
    match DataLoader::new().load_retail(file.path()) {
        Err(LoaderError::MissingColumns(missing)) => {
            assert!(missing.contains(&"Profit".to_string()));
            assert!(!missing.contains(&"State".to_string()));
        }
        other => panic!("expected missing columns, got {:?}", other.map(|d| d.height())),
    }

    let missing = std::path::Path::new("definitely/not/here.csv");
    assert!(matches!(
        DataLoader::new().load_retail(missing),
        Err(LoaderError::NotFound(_))
    ));
}

#[test]
fn test_group_sums_partition_the_total() {
    let ds = load_store();
    let total: f64 = ds.present_values("Sales").unwrap().iter().sum();
    for by in ["State", "Region", "Category", "Ship Mode", "Segment"] {
        let grouped = Aggregator::group_sum(&ds, by, "Sales").unwrap();
        assert!((grouped.total() - total).abs() < 1e-6, "grouping by {}", by);
    }
}

#[test]
fn test_single_group_mean_is_global_mean() {
    let ds = load_store();
    let grouped = Aggregator::group_mean(&ds, "Country", "Sales").unwrap();
    assert_eq!(grouped.len(), 1);

    let values = ds.present_values("Sales").unwrap();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let only = grouped.get(&GroupKey::from("United States")).unwrap();
    assert!((only - mean).abs() < 1e-9);
}

#[test]
fn test_top_states_by_sales() {
    let ds = load_store();
    let sales = Aggregator::group_sum(&ds, "State", "Sales").unwrap();
    let top = Aggregator::top_k(&sales, 3, false);
    let names: Vec<String> = top.keys().map(|k| k.to_string()).collect();
    assert_eq!(names, vec!["Kentucky", "Florida", "California"]);
}

#[test]
fn test_value_counts_sum_to_row_count() {
    let ds = load_store();
    let counts = Aggregator::value_counts(&ds, "City").unwrap();
    assert_eq!(counts.total() as usize, ds.height());
    assert_eq!(counts.entries()[0].0, GroupKey::from("Los Angeles"));
    assert_eq!(counts.entries()[0].1, 4.0);
}

#[test]
fn test_correlation_matrix_is_symmetric() {
    let ds = load_store();
    let matrix = StatsCalculator::correlation_matrix(&ds).unwrap();
    assert_eq!(matrix.len(), 5);
    for i in 0..matrix.len() {
        assert_eq!(matrix.values[i][i], 1.0);
        for j in 0..matrix.len() {
            let (a, b) = (matrix.values[i][j], matrix.values[j][i]);
            assert!((a - b).abs() < 1e-12);
            assert!((-1.0..=1.0).contains(&a));
        }
    }
    assert!(matrix.get("Sales", "Profit").is_some());
}

#[test]
fn test_histogram_counts_every_value() {
    let ds = load_store();
    let values = ds.present_values("Profit").unwrap();
    let histogram = StatsCalculator::histogram(&values, 4);
    assert_eq!(histogram.counts.len(), 4);
    assert_eq!(histogram.total(), values.len());
}

#[test]
fn test_state_abbreviations() {
    assert_eq!(state_abbreviation("California"), Ok("CA"));
    assert_eq!(
        state_abbreviation("Atlantis"),
        Err(LookupError::UnknownState("Atlantis".to_string()))
    );

    let ds = load_store();
    let coded = DataProcessor::with_state_codes(&ds).unwrap();
    let by_code = Aggregator::group_sum(&coded, "state_code", "Sales").unwrap();
    let codes: Vec<String> = by_code.keys().map(|k| k.to_string()).collect();
    assert_eq!(codes, vec!["CA", "FL", "KY", "NC", "WA"]);
}

#[test]
fn test_price_per_product() {
    let ds = Dataset::new(
        df!(
            "Quantity" => [2i64, 5],
            "Sales" => [10.0, 20.0],
        )
        .unwrap(),
    );
    assert_eq!(DataProcessor::price_per_product(&ds).unwrap(), vec![5.0, 4.0]);
}

#[test]
fn test_report_over_loaded_csv() {
    let ds = load_store();
    let config = AnalysisConfig::default();
    let engine = InsightEngine::new(&ds, &config);
    let report = engine.report().unwrap();

    assert_eq!(report.overview.records, 10);
    assert_eq!(report.dimensions.len(), Dimension::BREAKDOWNS.len());

    let top: Vec<&str> = report
        .conclusion
        .top_states_by_sales
        .iter()
        .map(|s| s.state.as_str())
        .collect();
    assert_eq!(top, vec!["Kentucky", "Florida", "California"]);
    assert_eq!(
        report.conclusion.least_profitable_state.as_ref().unwrap().state,
        "Florida"
    );

    // Only California and Washington of the default states appear in this sample.
    let turnover: Vec<&str> = report.state.turnover.iter().map(|t| t.state.as_str()).collect();
    assert_eq!(turnover, vec!["California", "Washington"]);

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("Kentucky"));
}
