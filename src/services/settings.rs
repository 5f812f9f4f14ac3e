use std::io;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_TRIALS: usize = 10_000;

/// Ten years. A trial that has not finished by then is recorded as unfinished.
pub const DEFAULT_MAX_SIMULATED_DAYS: usize = 3_650;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse settings yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("trials must be greater than zero")]
    InvalidTrials,
    #[error("max_simulated_days must be greater than zero")]
    InvalidMaxSimulatedDays,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    pub trials: usize,
    pub max_simulated_days: usize,
    pub seed: Option<u64>,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            max_simulated_days: DEFAULT_MAX_SIMULATED_DAYS,
            seed: None,
        }
    }
}

impl ForecastSettings {
    pub fn from_yaml_file(path: &str) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, SettingsError> {
        let settings: ForecastSettings = serde_yaml::from_str(input)?;
        Ok(settings)
    }

    /// Loads the optional settings file, applies command line overrides and
    /// validates the result.
    pub fn resolve(
        config_path: Option<&str>,
        trials: Option<usize>,
        seed: Option<u64>,
    ) -> Result<Self, SettingsError> {
        let mut settings = match config_path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        if let Some(trials) = trials {
            settings.trials = trials;
        }
        if seed.is_some() {
            settings.seed = seed;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.trials == 0 {
            return Err(SettingsError::InvalidTrials);
        }
        if self.max_simulated_days == 0 {
            return Err(SettingsError::InvalidMaxSimulatedDays);
        }
        Ok(())
    }
}
