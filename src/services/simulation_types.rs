use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::services::forecast::{Forecast, REPORT_PERCENTILES};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ForecastPercentile {
    pub percentile: u32,
    /// Days for when forecasts, items for how many forecasts. `None` when the
    /// forecast has no trial results.
    pub value: Option<usize>,
    pub date: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WhenReport {
    pub remaining_items: usize,
    pub trials: usize,
    /// Trials that had not finished when the simulated days ran out.
    pub unfinished_trials: usize,
    pub percentiles: Vec<ForecastPercentile>,
    pub likelihood: Option<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HowManyReport {
    pub days: usize,
    pub trials: usize,
    pub percentiles: Vec<ForecastPercentile>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ManualForecastReport {
    pub data_source: String,
    pub start_date: String,
    pub target_date: Option<String>,
    pub remaining_items: usize,
    pub when: Option<WhenReport>,
    pub how_many: Option<HowManyReport>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FeatureForecastReport {
    pub id: String,
    pub name: String,
    pub remaining_items: usize,
    pub total_items: usize,
    pub limiting_team: Option<String>,
    pub percentiles: Vec<ForecastPercentile>,
    pub target_date: Option<String>,
    pub likelihood: Option<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PortfolioReport {
    pub name: String,
    pub start_date: String,
    pub trials: usize,
    pub features: Vec<FeatureForecastReport>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BacktestReport {
    pub data_source: String,
    pub start_date: String,
    pub end_date: String,
    pub history_window_days: usize,
    pub forecast_days: usize,
    pub actual_throughput: usize,
    pub percentiles: Vec<ForecastPercentile>,
}

/// Report percentiles of a when forecast, with the date each one lands on.
pub fn when_percentiles(forecast: &Forecast, start_date: NaiveDate) -> Vec<ForecastPercentile> {
    forecast
        .percentiles(&REPORT_PERCENTILES)
        .into_iter()
        .map(|(percentile, value)| ForecastPercentile {
            percentile,
            value,
            date: value.map(|days| format_date(date_after_days(start_date, days))),
        })
        .collect()
}

pub fn how_many_percentiles(forecast: &Forecast) -> Vec<ForecastPercentile> {
    forecast
        .percentiles(&REPORT_PERCENTILES)
        .into_iter()
        .map(|(percentile, value)| ForecastPercentile {
            percentile,
            value,
            date: None,
        })
        .collect()
}

pub fn date_after_days(start_date: NaiveDate, days: usize) -> NaiveDate {
    start_date + Duration::days(days as i64)
}

/// Whole days from `start_date` to `target_date`, `None` if the target is not
/// after the start.
pub fn days_until(start_date: NaiveDate, target_date: NaiveDate) -> Option<usize> {
    let days = target_date.signed_duration_since(start_date).num_days();
    if days > 0 { Some(days as usize) } else { None }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn data_source_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_string()
}
