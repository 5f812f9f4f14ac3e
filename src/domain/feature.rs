use chrono::NaiveDate;

use crate::services::forecast::{AggregatedWhenForecast, WhenForecast};

/// Work a single team still has to do on a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureWork {
    pub team: String,
    pub remaining_items: usize,
    pub total_items: usize,
}

impl FeatureWork {
    pub fn new(team: &str, remaining_items: usize, total_items: usize) -> Self {
        Self {
            team: team.to_string(),
            remaining_items,
            total_items,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Feature {
    pub id: String,
    pub name: String,
    pub work: Vec<FeatureWork>,
    pub target_date: Option<NaiveDate>,
    forecasts: Vec<WhenForecast>,
    forecast: Option<AggregatedWhenForecast>,
}

impl Feature {
    pub fn new(id: &str, name: &str, work: Vec<FeatureWork>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            work,
            target_date: None,
            forecasts: Vec::new(),
            forecast: None,
        }
    }

    pub fn remaining_items(&self) -> usize {
        self.work.iter().map(|work| work.remaining_items).sum()
    }

    pub fn total_items(&self) -> usize {
        self.work.iter().map(|work| work.total_items).sum()
    }

    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.work.iter().map(|work| work.team.as_str())
    }

    /// Stores the per-team forecasts and recomputes the aggregate.
    pub fn set_feature_forecasts(&mut self, forecasts: Vec<WhenForecast>) {
        self.forecast = AggregatedWhenForecast::from_forecasts(&forecasts);
        self.forecasts = forecasts;
    }

    pub fn forecasts(&self) -> &[WhenForecast] {
        &self.forecasts
    }

    pub fn forecast(&self) -> Option<&AggregatedWhenForecast> {
        self.forecast.as_ref()
    }

    /// Likelihood (0-100) of being done within the given number of days.
    pub fn likelihood(&self, days_to_target_date: usize) -> f64 {
        if self.remaining_items() == 0 {
            return 100.0;
        }
        self.forecast
            .as_ref()
            .map(|forecast| forecast.likelihood(days_to_target_date))
            .unwrap_or(0.0)
    }
}
