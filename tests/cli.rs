use assert_fs::prelude::*;
use predicates::prelude::*;

#[test]
fn test_cli_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::cargo_bin_cmd!("lighthouse");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("forecast"))
        .stdout(predicate::str::contains("portfolio"))
        .stdout(predicate::str::contains("backtest"));
    Ok(())
}

#[test]
fn zero_trials_is_rejected() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("lighthouse");
    cmd.args([
        "forecast",
        "-f",
        "missing.yaml",
        "-o",
        "out.yaml",
        "-r",
        "3",
        "--trials",
        "0",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("trials must be greater than zero"));
}

#[test]
fn settings_file_is_validated() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("settings.yaml");
    config.write_str("max_simulated_days: 0\n").unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("lighthouse");
    cmd.args([
        "--config",
        config.path().to_str().unwrap(),
        "forecast",
        "-f",
        "missing.yaml",
        "-o",
        "out.yaml",
        "-r",
        "3",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("max_simulated_days must be greater than zero"));
}
