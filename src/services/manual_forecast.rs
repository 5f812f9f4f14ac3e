use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::throughput::Throughput;
use crate::services::forecast::WhenForecast;
use crate::services::histogram::{write_histogram_png, HistogramError};
use crate::services::random::RandomSourceProvider;
use crate::services::simulation::ForecastService;
use crate::services::simulation_types::{
    data_source_name, days_until, format_date, how_many_percentiles, when_percentiles,
    HowManyReport, ManualForecastReport, WhenReport,
};
use crate::services::throughput_yaml::{load_throughput_from_yaml_file, ThroughputYamlError};

#[derive(Error, Debug)]
pub enum ManualForecastError {
    #[error("failed to load throughput: {0}")]
    Throughput(#[from] ThroughputYamlError),
    #[error("invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("nothing to forecast: give remaining items or a target date after the start date")]
    NothingToForecast,
    #[error("failed to render histogram: {0}")]
    Histogram(#[from] HistogramError),
}

pub struct ManualForecastRequest<'a> {
    pub throughput_path: &'a str,
    pub remaining_items: usize,
    pub start_date: &'a str,
    pub target_date: Option<&'a str>,
    pub histogram_path: Option<&'a str>,
}

pub fn manual_forecast_from_throughput_file<P: RandomSourceProvider>(
    service: &ForecastService<P>,
    request: &ManualForecastRequest<'_>,
) -> Result<ManualForecastReport, ManualForecastError> {
    let records = load_throughput_from_yaml_file(request.throughput_path)?;
    let throughput = Throughput::from_daily_records(&records);
    let start_date = parse_date(request.start_date)?;
    let target_date = request.target_date.map(parse_date).transpose()?;

    let (mut report, when_forecast) = run_manual_forecast(
        service,
        &throughput,
        request.remaining_items,
        start_date,
        target_date,
    )?;
    report.data_source = data_source_name(request.throughput_path);

    if let (Some(path), Some(forecast)) = (request.histogram_path, when_forecast.as_ref()) {
        write_histogram_png(path, forecast.forecast(), "Duration in days")?;
    }

    Ok(report)
}

/// When forecast for the remaining items, and a how many forecast plus the
/// likelihood of finishing when a target date after the start is given.
pub fn run_manual_forecast<P: RandomSourceProvider>(
    service: &ForecastService<P>,
    throughput: &Throughput,
    remaining_items: usize,
    start_date: NaiveDate,
    target_date: Option<NaiveDate>,
) -> Result<(ManualForecastReport, Option<WhenForecast>), ManualForecastError> {
    let days_to_target_date = target_date.and_then(|target| days_until(start_date, target));
    if remaining_items == 0 && days_to_target_date.is_none() {
        return Err(ManualForecastError::NothingToForecast);
    }

    let when_forecast =
        (remaining_items > 0).then(|| service.when_for_throughput(throughput, remaining_items));
    let when = when_forecast.as_ref().map(|forecast| WhenReport {
        remaining_items,
        trials: forecast.total_trials(),
        unfinished_trials: forecast.unfinished_trials(),
        percentiles: when_percentiles(forecast.forecast(), start_date),
        likelihood: days_to_target_date.map(|days| forecast.likelihood(days)),
    });

    let how_many = days_to_target_date.map(|days| {
        let forecast = service.how_many(throughput, days);
        HowManyReport {
            days,
            trials: forecast.total_trials(),
            percentiles: how_many_percentiles(forecast.forecast()),
        }
    });

    let report = ManualForecastReport {
        data_source: String::new(),
        start_date: format_date(start_date),
        target_date: target_date.map(format_date),
        remaining_items,
        when,
        how_many,
    };
    Ok((report, when_forecast))
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, ManualForecastError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ManualForecastError::InvalidDate(value.to_string()))
}
