use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use thiserror::Error;

use crate::services::backtest::BacktestError;
use crate::services::manual_forecast::ManualForecastError;
use crate::services::portfolio_forecast::PortfolioForecastError;
use crate::services::settings::SettingsError;

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    /// Forecast settings YAML file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
    /// Number of Monte Carlo trials, overrides the settings file
    #[arg(short = 'n', long, global = true)]
    pub trials: Option<usize>,
    /// Seed for reproducible forecasts, overrides the settings file
    #[arg(long, global = true)]
    pub seed: Option<u64>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forecast when remaining items are done and how many items are done by a date
    Forecast {
        /// Throughput YAML file
        #[arg(short = 'f', long)]
        throughput: String,
        /// Output report file
        #[arg(short, long)]
        output: String,
        /// Number of items still to do
        #[arg(short, long, default_value_t = 0)]
        remaining_items: usize,
        /// Forecast start date (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_start_date())]
        start_date: String,
        /// Target date (YYYY-MM-DD)
        #[arg(short, long)]
        target_date: Option<String>,
        /// Write a histogram of the completion forecast to this PNG file
        #[arg(long)]
        histogram: Option<String>,
        /// Output report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Yaml)]
        format: ReportFormat,
    },
    /// Forecast all features of a portfolio across teams
    Portfolio {
        /// Portfolio YAML file
        #[arg(short, long)]
        input: String,
        /// Output report file
        #[arg(short, long)]
        output: String,
        /// Forecast start date (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_start_date())]
        start_date: String,
        /// Output report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Yaml)]
        format: ReportFormat,
    },
    /// Compare a how many forecast against the throughput actually recorded
    Backtest {
        /// Throughput YAML file
        #[arg(short = 'f', long)]
        throughput: String,
        /// Output report file
        #[arg(short, long)]
        output: String,
        /// First day of the backtest period (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,
        /// Day after the backtest period (YYYY-MM-DD)
        #[arg(long)]
        end_date: String,
        /// Days of history before the start date used for the forecast
        #[arg(long, default_value_t = 30)]
        history_days: usize,
        /// Output report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Yaml)]
        format: ReportFormat,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Yaml,
    Json,
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("forecast failed: {0}")]
    Forecast(#[from] ManualForecastError),
    #[error("portfolio forecast failed: {0}")]
    Portfolio(#[from] PortfolioForecastError),
    #[error("backtest failed: {0}")]
    Backtest(#[from] BacktestError),
    #[error("failed to serialize report: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn default_start_date() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_defaults_start_date_to_today() {
        let args = CliArgs::parse_from([
            "lighthouse",
            "forecast",
            "-f",
            "throughput.yaml",
            "-o",
            "output.yaml",
            "-r",
            "5",
        ]);

        if let Commands::Forecast {
            start_date,
            remaining_items,
            format,
            ..
        } = args.command
        {
            assert_eq!(start_date, default_start_date());
            assert_eq!(remaining_items, 5);
            assert_eq!(format, ReportFormat::Yaml);
        } else {
            panic!("expected forecast command");
        }
    }

    #[test]
    fn portfolio_defaults_start_date_to_today() {
        let args = CliArgs::parse_from([
            "lighthouse",
            "portfolio",
            "-i",
            "portfolio.yaml",
            "-o",
            "output.yaml",
        ]);

        if let Commands::Portfolio { start_date, .. } = args.command {
            assert_eq!(start_date, default_start_date());
        } else {
            panic!("expected portfolio command");
        }
    }

    #[test]
    fn global_options_are_accepted_after_subcommand() {
        let args = CliArgs::parse_from([
            "lighthouse",
            "backtest",
            "-f",
            "throughput.yaml",
            "-o",
            "output.json",
            "--start-date",
            "2026-01-01",
            "--end-date",
            "2026-01-15",
            "--format",
            "json",
            "--trials",
            "500",
            "--seed",
            "7",
        ]);

        assert_eq!(args.trials, Some(500));
        assert_eq!(args.seed, Some(7));
        if let Commands::Backtest {
            history_days,
            format,
            ..
        } = args.command
        {
            assert_eq!(history_days, 30);
            assert_eq!(format, ReportFormat::Json);
        } else {
            panic!("expected backtest command");
        }
    }
}
