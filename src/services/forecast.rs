//! Forecast results built from Monte Carlo trial outcomes.
//!
//! A forecast is a frequency table mapping an outcome (days until done, or
//! items done) to the number of trials that produced it. Percentile queries
//! walk the table in the order given by the forecast type and return the
//! first outcome whose cumulative trial count reaches the requested share.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

/// Percentiles reported for every forecast.
pub const REPORT_PERCENTILES: [u32; 4] = [50, 70, 85, 95];

/// Percentile used to pick the slowest team when aggregating forecasts.
pub const AGGREGATION_PERCENTILE: u32 = 85;

/// Walk order of a frequency table for percentile queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest outcome first, used for days until completion.
    Ascending,
    /// Largest outcome first, used for items completed.
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    simulation_result: BTreeMap<usize, usize>,
    order: SortOrder,
    total_trials: usize,
    creation_time: DateTime<Utc>,
}

impl Forecast {
    pub fn new(simulation_result: HashMap<usize, usize>, order: SortOrder) -> Self {
        let mut forecast = Self {
            simulation_result: BTreeMap::new(),
            order,
            total_trials: 0,
            creation_time: Utc::now(),
        };
        forecast.set_simulation_result(simulation_result);
        forecast
    }

    /// Replaces the whole frequency table.
    pub fn set_simulation_result(&mut self, simulation_result: HashMap<usize, usize>) {
        self.simulation_result = simulation_result.into_iter().collect();
        self.total_trials = self.simulation_result.values().sum();
    }

    pub fn simulation_result(&self) -> &BTreeMap<usize, usize> {
        &self.simulation_result
    }

    pub fn total_trials(&self) -> usize {
        self.total_trials
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    /// Outcome at the given percentile, `None` if the table cannot answer it.
    pub fn probability(&self, percentile: u32) -> Option<usize> {
        if percentile > 100 {
            return None;
        }

        // ceil(total * percentile / 100)
        let target = (self.total_trials * percentile as usize).div_ceil(100);
        let mut accumulated = 0;
        for (outcome, trials) in self.walk() {
            accumulated += trials;
            if accumulated >= target {
                return Some(*outcome);
            }
        }

        None
    }

    pub fn percentiles(&self, percentiles: &[u32]) -> Vec<(u32, Option<usize>)> {
        percentiles
            .iter()
            .map(|percentile| (*percentile, self.probability(*percentile)))
            .collect()
    }

    fn walk(&self) -> Box<dyn Iterator<Item = (&usize, &usize)> + '_> {
        match self.order {
            SortOrder::Ascending => Box::new(self.simulation_result.iter()),
            SortOrder::Descending => Box::new(self.simulation_result.iter().rev()),
        }
    }
}

/// Days until a number of items is done.
///
/// Trials that did not finish within the simulated days are kept in the
/// table one day past the cap, so they count towards `total_trials` and push
/// the high percentiles out, but never towards a likelihood.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenForecast {
    forecast: Forecast,
    team: Option<String>,
    number_of_items: usize,
    max_simulated_days: Option<usize>,
}

impl WhenForecast {
    pub fn new(simulation_result: HashMap<usize, usize>, number_of_items: usize) -> Self {
        Self {
            forecast: Forecast::new(simulation_result, SortOrder::Ascending),
            team: None,
            number_of_items,
            max_simulated_days: None,
        }
    }

    pub fn for_team(
        team: &str,
        simulation_result: HashMap<usize, usize>,
        number_of_items: usize,
    ) -> Self {
        let mut forecast = Self::new(simulation_result, number_of_items);
        forecast.team = Some(team.to_string());
        forecast
    }

    /// Marks outcomes beyond `max_simulated_days` as unfinished trials.
    pub fn with_max_simulated_days(mut self, max_simulated_days: usize) -> Self {
        self.max_simulated_days = Some(max_simulated_days);
        self
    }

    /// Outcome under which trials that hit the day cap are recorded.
    pub fn unfinished_outcome(max_simulated_days: usize) -> usize {
        max_simulated_days + 1
    }

    /// Forecast for work that is already done: zero days, always likely.
    pub fn no_remaining_work(team: Option<&str>) -> Self {
        let mut forecast = Self::new(HashMap::from([(0, 0)]), 0);
        forecast.team = team.map(str::to_string);
        forecast
    }

    pub fn forecast(&self) -> &Forecast {
        &self.forecast
    }

    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    pub fn number_of_items(&self) -> usize {
        self.number_of_items
    }

    pub fn total_trials(&self) -> usize {
        self.forecast.total_trials()
    }

    /// Trials recorded as not finished within the simulated days.
    pub fn unfinished_trials(&self) -> usize {
        self.forecast
            .simulation_result()
            .iter()
            .filter(|(days, _)| self.is_unfinished(**days))
            .map(|(_, trials)| trials)
            .sum()
    }

    pub fn set_simulation_result(&mut self, simulation_result: HashMap<usize, usize>) {
        self.forecast.set_simulation_result(simulation_result);
    }

    pub fn probability(&self, percentile: u32) -> Option<usize> {
        self.forecast.probability(percentile)
    }

    /// Share of trials (0-100) that finished within `days_to_target_date`.
    pub fn likelihood(&self, days_to_target_date: usize) -> f64 {
        if self.number_of_items == 0 {
            return 100.0;
        }

        let total_trials = self.forecast.total_trials();
        let mut accumulated = 0;
        for (days, trials) in self.forecast.simulation_result() {
            if self.is_unfinished(*days) {
                return percentage(accumulated, total_trials);
            }
            accumulated += trials;
            if *days >= days_to_target_date {
                return percentage(accumulated, total_trials);
            }
        }

        if accumulated > 0 { 100.0 } else { 0.0 }
    }

    fn is_unfinished(&self, days: usize) -> bool {
        self.max_simulated_days
            .is_some_and(|max_simulated_days| days > max_simulated_days)
    }
}

/// Items done within a fixed number of days.
#[derive(Debug, Clone, PartialEq)]
pub struct HowManyForecast {
    forecast: Forecast,
    days: usize,
}

impl HowManyForecast {
    pub fn new(simulation_result: HashMap<usize, usize>, days: usize) -> Self {
        Self {
            forecast: Forecast::new(simulation_result, SortOrder::Descending),
            days,
        }
    }

    pub fn forecast(&self) -> &Forecast {
        &self.forecast
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn total_trials(&self) -> usize {
        self.forecast.total_trials()
    }

    pub fn probability(&self, percentile: u32) -> Option<usize> {
        self.forecast.probability(percentile)
    }
}

/// Worst case over the forecasts of all teams contributing to a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedWhenForecast {
    forecast: WhenForecast,
}

impl AggregatedWhenForecast {
    /// Picks the forecast with the latest 85th percentile. Forecasts that
    /// cannot answer the percentile rank below all others, ties keep the
    /// first one.
    pub fn from_forecasts(forecasts: &[WhenForecast]) -> Option<Self> {
        let mut slowest: Option<&WhenForecast> = None;
        for forecast in forecasts {
            let is_slower = match slowest {
                None => true,
                Some(current) => {
                    forecast.probability(AGGREGATION_PERCENTILE)
                        > current.probability(AGGREGATION_PERCENTILE)
                }
            };
            if is_slower {
                slowest = Some(forecast);
            }
        }

        slowest.map(|forecast| Self {
            forecast: forecast.clone(),
        })
    }

    pub fn when_forecast(&self) -> &WhenForecast {
        &self.forecast
    }

    pub fn team(&self) -> Option<&str> {
        self.forecast.team()
    }

    pub fn number_of_items(&self) -> usize {
        self.forecast.number_of_items()
    }

    pub fn probability(&self, percentile: u32) -> Option<usize> {
        self.forecast.probability(percentile)
    }

    pub fn likelihood(&self, days_to_target_date: usize) -> f64 {
        self.forecast.likelihood(days_to_target_date)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * part as f64 / total as f64
}
