use crate::commands::base_commands::{CommandError, Commands};
use crate::commands::report_format::{format_portfolio_report, write_report};
use crate::services::portfolio_forecast::forecast_portfolio_from_yaml_file;
use crate::services::simulation::ForecastService;

pub fn portfolio_command(service: &ForecastService, cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Portfolio {
        input,
        output,
        start_date,
        format,
    } = cmd
    {
        let report = forecast_portfolio_from_yaml_file(service, &input, &start_date)?;
        write_report(&report, format, &output)?;

        println!("{}", format_portfolio_report(&report));
        println!("Portfolio forecast for {} features written to {output}", report.features.len());
    }
    Ok(())
}
