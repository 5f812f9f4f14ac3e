use chrono::{Duration, NaiveDate};
use thiserror::Error;
use tracing::info;

use crate::domain::throughput::{DailyThroughput, Throughput};
use crate::services::random::RandomSourceProvider;
use crate::services::simulation::ForecastService;
use crate::services::simulation_types::{
    data_source_name, format_date, how_many_percentiles, BacktestReport,
};
use crate::services::throughput_yaml::{load_throughput_from_yaml_file, ThroughputYamlError};

pub const MIN_BACKTEST_DAYS: usize = 14;
pub const MAX_HISTORY_WINDOW_DAYS: usize = 365;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("failed to load throughput: {0}")]
    Throughput(#[from] ThroughputYamlError),
    #[error("invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("end date must be at least {} days after start date", MIN_BACKTEST_DAYS)]
    PeriodTooShort,
    #[error("history window must be between 1 and {} days", MAX_HISTORY_WINDOW_DAYS)]
    InvalidHistoryWindow,
    #[error("no throughput recorded through {0}, the backtest period has not ended yet")]
    MissingActualThroughput(String),
}

/// Forecasts how many items are done in `[start_date, end_date)` from the
/// `history_window_days` before `start_date` and compares the forecast with
/// what was actually done.
pub fn run_backtest<P: RandomSourceProvider>(
    service: &ForecastService<P>,
    records: &[DailyThroughput],
    start_date: NaiveDate,
    end_date: NaiveDate,
    history_window_days: usize,
) -> Result<BacktestReport, BacktestError> {
    let forecast_days = end_date.signed_duration_since(start_date).num_days();
    if forecast_days < MIN_BACKTEST_DAYS as i64 {
        return Err(BacktestError::PeriodTooShort);
    }
    if !(1..=MAX_HISTORY_WINDOW_DAYS).contains(&history_window_days) {
        return Err(BacktestError::InvalidHistoryWindow);
    }
    let last_day = end_date - Duration::days(1);
    if !records.iter().any(|record| record.date >= last_day) {
        return Err(BacktestError::MissingActualThroughput(format_date(last_day)));
    }

    let history_start = start_date - Duration::days(history_window_days as i64);
    let history = Throughput::between(records, history_start, start_date);
    let actual = Throughput::between(records, start_date, end_date);

    info!(
        start_date = %start_date,
        end_date = %end_date,
        history_window_days,
        "running backtest"
    );
    let forecast = service.how_many(&history, forecast_days as usize);

    Ok(BacktestReport {
        data_source: String::new(),
        start_date: format_date(start_date),
        end_date: format_date(end_date),
        history_window_days,
        forecast_days: forecast_days as usize,
        actual_throughput: actual.total_throughput(),
        percentiles: how_many_percentiles(forecast.forecast()),
    })
}

pub fn backtest_from_throughput_file<P: RandomSourceProvider>(
    service: &ForecastService<P>,
    throughput_path: &str,
    start_date: &str,
    end_date: &str,
    history_window_days: usize,
) -> Result<BacktestReport, BacktestError> {
    let records = load_throughput_from_yaml_file(throughput_path)?;
    let start_date = parse_date(start_date)?;
    let end_date = parse_date(end_date)?;

    let mut report = run_backtest(service, &records, start_date, end_date, history_window_days)?;
    report.data_source = data_source_name(throughput_path);
    Ok(report)
}

fn parse_date(value: &str) -> Result<NaiveDate, BacktestError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| BacktestError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::random::ReplayRandomProvider;
    use crate::services::settings::ForecastSettings;
    use crate::test_support::{daily_records, on_date};

    fn service() -> ForecastService<ReplayRandomProvider> {
        let settings = ForecastSettings {
            trials: 50,
            ..ForecastSettings::default()
        };
        ForecastService::new(ReplayRandomProvider::default(), settings)
    }

    #[test]
    fn forecast_uses_history_before_start_and_reports_actual_total() {
        // 30 days of history at 1 item per day, then 14 days of 2 items per day.
        let mut counts = vec![1; 30];
        counts.extend(vec![2; 14]);
        let records = daily_records(on_date(2026, 1, 1), &counts);

        let report = run_backtest(
            &service(),
            &records,
            on_date(2026, 1, 31),
            on_date(2026, 2, 14),
            30,
        )
        .unwrap();

        assert_eq!(report.forecast_days, 14);
        assert_eq!(report.actual_throughput, 28);
        assert!(report.percentiles.iter().all(|p| p.value == Some(14)));
    }

    #[test]
    fn rejects_short_period() {
        let records = daily_records(on_date(2026, 1, 1), &[1; 60]);

        let result = run_backtest(
            &service(),
            &records,
            on_date(2026, 2, 1),
            on_date(2026, 2, 10),
            30,
        );

        assert!(matches!(result, Err(BacktestError::PeriodTooShort)));
    }

    #[test]
    fn rejects_history_window_out_of_range() {
        let records = daily_records(on_date(2026, 1, 1), &[1; 60]);

        for window in [0, 366] {
            let result = run_backtest(
                &service(),
                &records,
                on_date(2026, 1, 31),
                on_date(2026, 2, 14),
                window,
            );
            assert!(matches!(result, Err(BacktestError::InvalidHistoryWindow)));
        }
    }

    #[test]
    fn rejects_period_without_recorded_throughput() {
        let records = daily_records(on_date(2026, 1, 1), &[1; 35]);

        let result = run_backtest(
            &service(),
            &records,
            on_date(2026, 1, 31),
            on_date(2026, 2, 14),
            30,
        );

        assert!(matches!(result, Err(BacktestError::MissingActualThroughput(day)) if day == "2026-02-13"));
    }
}
