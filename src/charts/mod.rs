//! Charts module - Chart rendering

mod exporter;
mod plotter;
mod renderer;

pub use exporter::{ChartExporter, ExportError, REPORT_FILE};
pub use plotter::ChartPlotter;
pub use renderer::{ChartError, StaticChartRenderer};
