pub mod backtest;
pub mod forecast;
pub mod histogram;
pub mod manual_forecast;
pub mod portfolio_forecast;
pub mod portfolio_yaml;
pub mod random;
pub mod settings;
pub mod simulation;
pub mod simulation_types;
pub mod throughput_yaml;
