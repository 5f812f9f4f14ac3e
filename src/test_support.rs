use chrono::NaiveDate;

use crate::domain::feature::{Feature, FeatureWork};
use crate::domain::team::Team;
use crate::domain::throughput::{DailyThroughput, Throughput};

// Daily throughput of a real team over one month
pub const REAL_THROUGHPUT: [usize; 31] = [
    2, 0, 0, 5, 1, 3, 2, 4, 0, 0, 1, 1, 2, 4, 0, 0, 0, 1, 0, 1, 2, 0, 0, 0, 0, 0, 0, 1, 2, 0, 0,
];

pub fn on_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn build_team(name: &str, feature_wip: usize, throughput: &[usize]) -> Team {
    Team::new(name, feature_wip, Throughput::new(throughput.to_vec()))
}

/// Feature with one work entry per `(team, remaining_items)`.
pub fn build_feature(id: &str, work: &[(&str, usize)]) -> Feature {
    let work = work
        .iter()
        .map(|(team, remaining_items)| FeatureWork::new(team, *remaining_items, *remaining_items))
        .collect();
    Feature::new(id, &format!("Feature {id}"), work)
}

/// Consecutive daily records starting at `start`.
pub fn daily_records(start: NaiveDate, counts: &[usize]) -> Vec<DailyThroughput> {
    start
        .iter_days()
        .zip(counts)
        .map(|(date, completed_issues)| DailyThroughput {
            date,
            completed_issues: *completed_issues,
        })
        .collect()
}
