use assert_fs::prelude::*;
use chrono::{Duration, NaiveDate};
use predicates::prelude::*;

/// `history_days` days with one item each followed by `period_days` days
/// with two items each, starting 2026-01-01.
fn throughput_yaml(history_days: i64, period_days: i64) -> String {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    (0..history_days + period_days)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let completed_issues = if offset < history_days { 1 } else { 2 };
            format!("- date: {date}\n  completed_issues: {completed_issues}\n")
        })
        .collect()
}

#[test]
fn backtest_compares_forecast_with_actual_throughput() {
    let temp = assert_fs::TempDir::new().unwrap();
    let throughput = temp.child("throughput.yaml");
    throughput.write_str(&throughput_yaml(30, 14)).unwrap();
    let output = temp.child("backtest.yaml");
    let output_arg = output.path().to_str().unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("lighthouse");
    cmd.args([
        "backtest",
        "-f",
        throughput.path().to_str().unwrap(),
        "-o",
        output_arg,
        "--start-date",
        "2026-01-31",
        "--end-date",
        "2026-02-14",
        "-n",
        "100",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Period: 2026-01-31 to 2026-02-14 (14 days)"))
        .stdout(predicate::str::contains("Actual items: 28"))
        .stdout(predicate::str::contains("P50 | 14"))
        .stdout(predicate::str::contains(format!("Backtest written to {output_arg}")));

    output.assert(predicate::str::contains("actual_throughput: 28"));
    output.assert(predicate::str::contains("history_window_days: 30"));
}

#[test]
fn backtest_rejects_short_period() {
    let temp = assert_fs::TempDir::new().unwrap();
    let throughput = temp.child("throughput.yaml");
    throughput.write_str(&throughput_yaml(30, 14)).unwrap();
    let output = temp.child("backtest.yaml");

    let mut cmd = assert_cmd::cargo_bin_cmd!("lighthouse");
    cmd.args([
        "backtest",
        "-f",
        throughput.path().to_str().unwrap(),
        "-o",
        output.path().to_str().unwrap(),
        "--start-date",
        "2026-01-31",
        "--end-date",
        "2026-02-05",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("at least 14 days"));
}
