use std::io;

use thiserror::Error;

use crate::domain::throughput::DailyThroughput;

#[derive(Error, Debug)]
pub enum ThroughputYamlError {
    #[error("failed to read throughput yaml: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse throughput yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub fn load_throughput_from_yaml_file(
    path: &str,
) -> Result<Vec<DailyThroughput>, ThroughputYamlError> {
    let contents = std::fs::read_to_string(path)?;
    deserialize_throughput_from_yaml_str(&contents)
}

/// Records sorted by date. An empty document is an empty throughput.
pub fn deserialize_throughput_from_yaml_str(
    input: &str,
) -> Result<Vec<DailyThroughput>, ThroughputYamlError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut data: Vec<DailyThroughput> = serde_yaml::from_str(input)?;
    data.sort_by_key(|record| record.date);
    Ok(data)
}
