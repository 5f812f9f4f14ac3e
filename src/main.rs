use std::process::ExitCode;

use clap::Parser;
use lighthouse::commands::backtest_cmd::backtest_command;
use lighthouse::commands::base_commands::{CliArgs, CommandError, Commands};
use lighthouse::commands::completions_cmd::completions_command;
use lighthouse::commands::forecast_cmd::forecast_command;
use lighthouse::commands::portfolio_cmd::portfolio_command;
use lighthouse::logging::init_tracing;
use lighthouse::services::settings::ForecastSettings;
use lighthouse::services::simulation::ForecastService;

fn main() -> ExitCode {
    init_tracing();
    let args = CliArgs::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<(), CommandError> {
    if let Commands::Completions { shell } = args.command {
        completions_command(shell);
        return Ok(());
    }

    let settings = ForecastSettings::resolve(args.config.as_deref(), args.trials, args.seed)?;
    let service = ForecastService::from_settings(settings);

    match args.command {
        cmd @ Commands::Forecast { .. } => forecast_command(&service, cmd),
        cmd @ Commands::Portfolio { .. } => portfolio_command(&service, cmd),
        cmd @ Commands::Backtest { .. } => backtest_command(&service, cmd),
        Commands::Completions { .. } => Ok(()),
    }
}
