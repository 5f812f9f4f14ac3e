use crate::commands::base_commands::{CommandError, Commands};
use crate::commands::report_format::{format_backtest_report, write_report};
use crate::services::backtest::backtest_from_throughput_file;
use crate::services::simulation::ForecastService;

pub fn backtest_command(service: &ForecastService, cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Backtest {
        throughput,
        output,
        start_date,
        end_date,
        history_days,
        format,
    } = cmd
    {
        let report =
            backtest_from_throughput_file(service, &throughput, &start_date, &end_date, history_days)?;
        write_report(&report, format, &output)?;

        println!("{}", format_backtest_report(&report));
        println!("Backtest written to {output}");
    }
    Ok(())
}
