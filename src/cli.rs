//! Command-line interface argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Retail EDA - exploratory analysis of superstore sales
///
/// Examples:
///   retail-eda --data SampleSuperstore.csv
///   retail-eda summary --pretty
///   retail-eda export --out charts
///   retail-eda --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Retail CSV to analyze
    ///
    /// Overrides `data.path` from the configuration file.
    #[arg(short, long, value_name = "FILE", env = "RETAIL_EDA_DATA")]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for retail_eda.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Write a default config (to --config, or retail_eda.toml) and exit
    #[arg(long)]
    pub init_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Open the interactive dashboard (default)
    Dashboard,

    /// Print every insight as JSON
    Summary {
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Write PNG charts and report.json to a directory
    Export {
        /// Output directory, created if missing
        #[arg(short, long, default_value = "charts", value_name = "DIR")]
        out: PathBuf,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Subcommand to run, the dashboard when none is given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Dashboard)
    }

    /// Default log level; `RUST_LOG` takes precedence when set.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_dashboard() {
        let args = Args::try_parse_from(["retail-eda"]).unwrap();
        assert_eq!(args.command(), Command::Dashboard);
        assert_eq!(args.log_level(), tracing::Level::INFO);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_summary_and_export() {
        let args = Args::try_parse_from(["retail-eda", "-v", "summary", "--pretty"]).unwrap();
        assert_eq!(args.command(), Command::Summary { pretty: true });
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        let args = Args::try_parse_from(["retail-eda", "export"]).unwrap();
        assert_eq!(
            args.command(),
            Command::Export {
                out: PathBuf::from("charts")
            }
        );

        let args =
            Args::try_parse_from(["retail-eda", "--data", "store.csv", "export", "--out", "png"])
                .unwrap();
        assert_eq!(args.data, Some(PathBuf::from("store.csv")));
        assert_eq!(
            args.command(),
            Command::Export {
                out: PathBuf::from("png")
            }
        );
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["retail-eda", "-v", "-q"]).is_err());
    }
}
