use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

/// Items completed on a single calendar day, as stored in throughput files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DailyThroughput {
    pub date: NaiveDate,
    pub completed_issues: usize,
}

/// Ordered per-day completion counts. Index 0 is the oldest day.
///
/// A throughput is never edited in place: refreshing a team's data builds a
/// new value from its daily records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Throughput {
    counts: Vec<usize>,
}

impl Throughput {
    pub fn new(counts: Vec<usize>) -> Self {
        Self { counts }
    }

    /// Builds one slot per calendar day from the earliest to the latest record.
    /// Days without a record count as zero, records on the same date are summed.
    pub fn from_daily_records(records: &[DailyThroughput]) -> Self {
        let by_date = sum_by_date(records);
        match (by_date.keys().next(), by_date.keys().next_back()) {
            (Some(first), Some(last)) => {
                let end = last.succ_opt().unwrap_or(*last);
                Self::fill_days(&by_date, *first, end)
            }
            _ => Self::default(),
        }
    }

    /// Series covering `[start, end)`, one slot per day.
    pub fn between(records: &[DailyThroughput], start: NaiveDate, end: NaiveDate) -> Self {
        Self::fill_days(&sum_by_date(records), start, end)
    }

    fn fill_days(by_date: &BTreeMap<NaiveDate, usize>, start: NaiveDate, end: NaiveDate) -> Self {
        let counts = start
            .iter_days()
            .take_while(|date| *date < end)
            .map(|date| by_date.get(&date).copied().unwrap_or(0))
            .collect();
        Self { counts }
    }

    pub fn throughput_on_day(&self, day: usize) -> Option<usize> {
        self.counts.get(day).copied()
    }

    /// Number of observed periods.
    pub fn history(&self) -> usize {
        self.counts.len()
    }

    pub fn total_throughput(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
}

fn sum_by_date(records: &[DailyThroughput]) -> BTreeMap<NaiveDate, usize> {
    let mut by_date = BTreeMap::new();
    for record in records {
        *by_date.entry(record.date).or_insert(0) += record.completed_issues;
    }
    by_date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::on_date;

    fn record(date: NaiveDate, completed_issues: usize) -> DailyThroughput {
        DailyThroughput {
            date,
            completed_issues,
        }
    }

    #[test]
    fn empty_throughput_has_no_history() {
        let throughput = Throughput::new(vec![]);

        assert_eq!(throughput.history(), 0);
        assert_eq!(throughput.total_throughput(), 0);
        assert_eq!(throughput.throughput_on_day(0), None);
    }

    #[test]
    fn history_and_total_reflect_counts() {
        let throughput = Throughput::new(vec![2, 0, 5, 1]);

        assert_eq!(throughput.history(), 4);
        assert_eq!(throughput.total_throughput(), 8);
        assert_eq!(throughput.throughput_on_day(2), Some(5));
    }

    #[test]
    fn from_daily_records_fills_missing_days_with_zero() {
        let records = vec![
            record(on_date(2026, 1, 30), 1),
            record(on_date(2026, 1, 26), 2),
            record(on_date(2026, 1, 28), 3),
        ];

        let throughput = Throughput::from_daily_records(&records);

        assert_eq!(throughput.counts(), &[2, 0, 3, 0, 1]);
    }

    #[test]
    fn from_daily_records_sums_duplicate_dates() {
        let records = vec![
            record(on_date(2026, 2, 1), 1),
            record(on_date(2026, 2, 1), 2),
        ];

        let throughput = Throughput::from_daily_records(&records);

        assert_eq!(throughput.counts(), &[3]);
    }

    #[test]
    fn between_excludes_end_date() {
        let records = vec![
            record(on_date(2026, 2, 1), 1),
            record(on_date(2026, 2, 3), 4),
            record(on_date(2026, 2, 4), 7),
        ];

        let throughput = Throughput::between(&records, on_date(2026, 1, 31), on_date(2026, 2, 4));

        assert_eq!(throughput.counts(), &[0, 1, 0, 4]);
    }
}
