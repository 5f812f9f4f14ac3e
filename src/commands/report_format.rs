use serde::Serialize;

use crate::commands::base_commands::{CommandError, ReportFormat};
use crate::services::simulation_types::{
    BacktestReport, FeatureForecastReport, ForecastPercentile, ManualForecastReport,
    PortfolioReport,
};

/// Serializes the report in the requested format and writes it to `output`.
pub fn write_report<T: Serialize>(
    report: &T,
    format: ReportFormat,
    output: &str,
) -> Result<(), CommandError> {
    let contents = match format {
        ReportFormat::Yaml => serde_yaml::to_string(report)?,
        ReportFormat::Json => serde_json::to_string_pretty(report)?,
    };
    std::fs::write(output, contents).map_err(|source| CommandError::Write {
        path: output.to_string(),
        source,
    })
}

pub fn format_manual_forecast_report(report: &ManualForecastReport) -> String {
    let mut lines = Vec::new();
    lines.push("Forecast Report".to_string());
    lines.push(format!("Data source: {}", report.data_source));
    lines.push(format!("Start date: {}", report.start_date));
    if let Some(target_date) = &report.target_date {
        lines.push(format!("Target date: {target_date}"));
    }

    if let Some(when) = &report.when {
        lines.push(String::new());
        lines.push(format!(
            "When will {} items be done? ({} trials)",
            when.remaining_items, when.trials
        ));
        lines.push("Percentile | Days | Date".to_string());
        lines.push("-----------|------|-----".to_string());
        lines.extend(when.percentiles.iter().map(format_when_row));
        if when.unfinished_trials > 0 {
            lines.push(format!(
                "Unfinished trials: {} (not done within the simulated days)",
                when.unfinished_trials
            ));
        }
        if let Some(likelihood) = when.likelihood {
            lines.push(format!("Likelihood to finish by target date: {likelihood:.1}%"));
        }
    }

    if let Some(how_many) = &report.how_many {
        lines.push(String::new());
        lines.push(format!(
            "How many items in {} days? ({} trials)",
            how_many.days, how_many.trials
        ));
        lines.push("Percentile | Items".to_string());
        lines.push("-----------|------".to_string());
        lines.extend(how_many.percentiles.iter().map(format_how_many_row));
    }

    lines.join("\n")
}

pub fn format_portfolio_report(report: &PortfolioReport) -> String {
    let mut lines = Vec::new();
    lines.push("Portfolio Report".to_string());
    lines.push(format!("Portfolio: {}", report.name));
    lines.push(format!("Start date: {}", report.start_date));
    lines.push(format!("Trials: {}", report.trials));
    lines.push(String::new());
    lines.push("Feature | Remaining | P85 | Likelihood | Team".to_string());
    lines.push("--------|-----------|-----|------------|-----".to_string());
    lines.extend(report.features.iter().map(format_feature_row));

    lines.join("\n")
}

pub fn format_backtest_report(report: &BacktestReport) -> String {
    let mut lines = Vec::new();
    lines.push("Backtest Report".to_string());
    lines.push(format!("Data source: {}", report.data_source));
    lines.push(format!(
        "Period: {} to {} ({} days)",
        report.start_date, report.end_date, report.forecast_days
    ));
    lines.push(format!("History: {} days", report.history_window_days));
    lines.push(format!("Actual items: {}", report.actual_throughput));
    lines.push(String::new());
    lines.push("Percentile | Items".to_string());
    lines.push("-----------|------".to_string());
    lines.extend(report.percentiles.iter().map(format_how_many_row));

    lines.join("\n")
}

fn format_when_row(percentile: &ForecastPercentile) -> String {
    format!(
        "P{} | {} | {}",
        percentile.percentile,
        format_value(percentile.value),
        percentile.date.as_deref().unwrap_or("n/a")
    )
}

fn format_how_many_row(percentile: &ForecastPercentile) -> String {
    format!(
        "P{} | {}",
        percentile.percentile,
        format_value(percentile.value)
    )
}

fn format_feature_row(feature: &FeatureForecastReport) -> String {
    let p85 = feature
        .percentiles
        .iter()
        .find(|percentile| percentile.percentile == 85)
        .and_then(|percentile| percentile.date.as_deref())
        .unwrap_or("n/a");
    let likelihood = match feature.likelihood {
        Some(value) => format!("{value:.1}%"),
        None => "n/a".to_string(),
    };
    format!(
        "{} {} | {}/{} | {} | {} | {}",
        feature.id,
        feature.name,
        feature.remaining_items,
        feature.total_items,
        p85,
        likelihood,
        feature.limiting_team.as_deref().unwrap_or("-")
    )
}

fn format_value(value: Option<usize>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::simulation_types::{HowManyReport, WhenReport};

    fn percentile(percentile: u32, value: Option<usize>, date: Option<&str>) -> ForecastPercentile {
        ForecastPercentile {
            percentile,
            value,
            date: date.map(str::to_string),
        }
    }

    fn build_manual_report() -> ManualForecastReport {
        ManualForecastReport {
            data_source: "input.yaml".to_string(),
            start_date: "2026-02-01".to_string(),
            target_date: Some("2026-02-15".to_string()),
            remaining_items: 12,
            when: Some(WhenReport {
                remaining_items: 12,
                trials: 100,
                unfinished_trials: 0,
                percentiles: vec![
                    percentile(50, Some(6), Some("2026-02-07")),
                    percentile(85, Some(10), Some("2026-02-11")),
                ],
                likelihood: Some(92.5),
            }),
            how_many: Some(HowManyReport {
                days: 14,
                trials: 100,
                percentiles: vec![percentile(50, Some(20), None), percentile(85, None, None)],
            }),
        }
    }

    #[test]
    fn format_manual_forecast_report_includes_both_tables() {
        let output = format_manual_forecast_report(&build_manual_report());

        assert!(output.contains("Forecast Report"));
        assert!(output.contains("Data source: input.yaml"));
        assert!(output.contains("Target date: 2026-02-15"));
        assert!(output.contains("When will 12 items be done? (100 trials)"));
        assert!(output.contains("P50 | 6 | 2026-02-07"));
        assert!(output.contains("P85 | 10 | 2026-02-11"));
        assert!(output.contains("Likelihood to finish by target date: 92.5%"));
        assert!(output.contains("How many items in 14 days? (100 trials)"));
        assert!(output.contains("P50 | 20"));
        assert!(output.contains("P85 | n/a"));
    }

    #[test]
    fn format_manual_forecast_report_skips_missing_sections() {
        let mut report = build_manual_report();
        report.target_date = None;
        report.how_many = None;

        let output = format_manual_forecast_report(&report);

        assert!(!output.contains("Target date"));
        assert!(!output.contains("How many items"));
        assert!(!output.contains("Unfinished trials"));
    }

    #[test]
    fn format_manual_forecast_report_flags_unfinished_trials() {
        let mut report = build_manual_report();
        if let Some(when) = report.when.as_mut() {
            when.unfinished_trials = 40;
        }

        let output = format_manual_forecast_report(&report);

        assert!(output.contains("Unfinished trials: 40 (not done within the simulated days)"));
    }

    #[test]
    fn format_portfolio_report_lists_features() {
        let report = PortfolioReport {
            name: "Platform".to_string(),
            start_date: "2026-01-01".to_string(),
            trials: 500,
            features: vec![FeatureForecastReport {
                id: "F-1".to_string(),
                name: "Login".to_string(),
                remaining_items: 4,
                total_items: 10,
                limiting_team: Some("Core".to_string()),
                percentiles: vec![percentile(85, Some(9), Some("2026-01-10"))],
                target_date: None,
                likelihood: None,
            }],
        };

        let output = format_portfolio_report(&report);

        assert!(output.contains("Portfolio: Platform"));
        assert!(output.contains("Trials: 500"));
        assert!(output.contains("F-1 Login | 4/10 | 2026-01-10 | n/a | Core"));
    }

    #[test]
    fn format_backtest_report_shows_actual_items() {
        let report = BacktestReport {
            data_source: "throughput.yaml".to_string(),
            start_date: "2026-01-01".to_string(),
            end_date: "2026-01-15".to_string(),
            history_window_days: 30,
            forecast_days: 14,
            actual_throughput: 18,
            percentiles: vec![percentile(50, Some(16), None)],
        };

        let output = format_backtest_report(&report);

        assert!(output.contains("Period: 2026-01-01 to 2026-01-15 (14 days)"));
        assert!(output.contains("Actual items: 18"));
        assert!(output.contains("P50 | 16"));
    }
}
