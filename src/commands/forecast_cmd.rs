use crate::commands::base_commands::{CommandError, Commands};
use crate::commands::report_format::{format_manual_forecast_report, write_report};
use crate::services::manual_forecast::{manual_forecast_from_throughput_file, ManualForecastRequest};
use crate::services::simulation::ForecastService;

pub fn forecast_command(service: &ForecastService, cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Forecast {
        throughput,
        output,
        remaining_items,
        start_date,
        target_date,
        histogram,
        format,
    } = cmd
    {
        let request = ManualForecastRequest {
            throughput_path: &throughput,
            remaining_items,
            start_date: &start_date,
            target_date: target_date.as_deref(),
            histogram_path: histogram.as_deref(),
        };
        let report = manual_forecast_from_throughput_file(service, &request)?;
        write_report(&report, format, &output)?;

        println!("{}", format_manual_forecast_report(&report));
        println!("Forecast written to {output}");
        if let (Some(path), Some(_)) = (histogram, report.when.as_ref()) {
            println!("Forecast histogram written to {path}");
        }
    }
    Ok(())
}
