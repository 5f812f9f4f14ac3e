use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::feature::Feature;
use crate::domain::portfolio::Portfolio;
use crate::services::portfolio_yaml::{load_portfolio_from_yaml_file, PortfolioYamlError};
use crate::services::random::RandomSourceProvider;
use crate::services::simulation::{ForecastService, SimulationError};
use crate::services::simulation_types::{
    days_until, format_date, when_percentiles, FeatureForecastReport, PortfolioReport,
};

#[derive(Error, Debug)]
pub enum PortfolioForecastError {
    #[error("failed to load portfolio: {0}")]
    Portfolio(#[from] PortfolioYamlError),
    #[error("failed to simulate portfolio: {0}")]
    Simulation(#[from] SimulationError),
    #[error("invalid start date: {0}")]
    InvalidStartDate(String),
}

pub fn forecast_portfolio_from_yaml_file<P: RandomSourceProvider>(
    service: &ForecastService<P>,
    path: &str,
    start_date: &str,
) -> Result<PortfolioReport, PortfolioForecastError> {
    let mut portfolio = load_portfolio_from_yaml_file(path)?;
    let start_date = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")
        .map_err(|_| PortfolioForecastError::InvalidStartDate(start_date.to_string()))?;
    forecast_portfolio(service, &mut portfolio, start_date)
}

/// Forecasts all features of the portfolio. Forecasts are stored on the
/// features and summarised in the returned report.
pub fn forecast_portfolio<P: RandomSourceProvider>(
    service: &ForecastService<P>,
    portfolio: &mut Portfolio,
    start_date: NaiveDate,
) -> Result<PortfolioReport, PortfolioForecastError> {
    service.forecast_features(&portfolio.teams, &mut portfolio.features)?;

    Ok(PortfolioReport {
        name: portfolio.name.clone(),
        start_date: format_date(start_date),
        trials: service.settings().trials,
        features: portfolio
            .features
            .iter()
            .map(|feature| feature_report(feature, start_date))
            .collect(),
    })
}

fn feature_report(feature: &Feature, start_date: NaiveDate) -> FeatureForecastReport {
    let forecast = feature.forecast();
    let percentiles = forecast
        .map(|forecast| when_percentiles(forecast.when_forecast().forecast(), start_date))
        .unwrap_or_default();
    let likelihood = feature.target_date.map(|target_date| {
        match days_until(start_date, target_date) {
            Some(days) => feature.likelihood(days),
            None if feature.remaining_items() == 0 => 100.0,
            None => 0.0,
        }
    });

    FeatureForecastReport {
        id: feature.id.clone(),
        name: feature.name.clone(),
        remaining_items: feature.remaining_items(),
        total_items: feature.total_items(),
        limiting_team: forecast.and_then(|forecast| forecast.team().map(str::to_string)),
        percentiles,
        target_date: feature.target_date.map(format_date),
        likelihood,
    }
}
