//! Retail EDA - exploratory analysis of superstore sales
//!
//! Loads a retail transactions CSV, computes grouped aggregates, correlations
//! and per-unit metrics, and presents them as an egui dashboard, a JSON report
//! or static PNG charts.

pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod gui;
pub mod insights;
pub mod stats;
