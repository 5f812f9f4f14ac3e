use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::feature::{Feature, FeatureWork};
use crate::domain::portfolio::Portfolio;
use crate::domain::team::Team;
use crate::domain::throughput::Throughput;
use crate::services::throughput_yaml::{load_throughput_from_yaml_file, ThroughputYamlError};

#[derive(Error, Debug)]
pub enum PortfolioYamlError {
    #[error("failed to read portfolio yaml: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse portfolio yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to load throughput of team {team} from {}: {source}", path.display())]
    Throughput {
        team: String,
        path: PathBuf,
        source: ThroughputYamlError,
    },
    #[error("team {0} has neither throughput nor throughput_file")]
    MissingThroughput(String),
    #[error("team {0} has both throughput and throughput_file")]
    AmbiguousThroughput(String),
    #[error("duplicate team name: {0}")]
    DuplicateTeam(String),
    #[error("duplicate feature id: {0}")]
    DuplicateFeature(String),
    #[error("missing feature id")]
    MissingFeatureId,
    #[error("feature {feature} has more remaining than total items for team {team}")]
    InvalidRemainingItems { feature: String, team: String },
    #[error("invalid date format: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

#[derive(Debug, Deserialize)]
struct PortfolioRecord {
    name: String,
    #[serde(default)]
    teams: Vec<TeamRecord>,
    #[serde(default)]
    features: Vec<FeatureRecord>,
}

#[derive(Debug, Deserialize)]
struct TeamRecord {
    name: String,
    #[serde(default = "default_feature_wip")]
    feature_wip: usize,
    throughput: Option<Vec<usize>>,
    throughput_file: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeatureRecord {
    id: String,
    name: Option<String>,
    target_date: Option<String>,
    #[serde(default)]
    work: Vec<FeatureWorkRecord>,
}

#[derive(Debug, Deserialize)]
struct FeatureWorkRecord {
    team: String,
    remaining_items: usize,
    total_items: Option<usize>,
}

fn default_feature_wip() -> usize {
    1
}

/// Loads a portfolio. Relative `throughput_file` paths are resolved against
/// the directory of the portfolio file.
pub fn load_portfolio_from_yaml_file<P: AsRef<Path>>(
    path: P,
) -> Result<Portfolio, PortfolioYamlError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    deserialize_portfolio_from_yaml_str(&contents, base_dir)
}

pub fn deserialize_portfolio_from_yaml_str(
    input: &str,
    base_dir: &Path,
) -> Result<Portfolio, PortfolioYamlError> {
    let record: PortfolioRecord = serde_yaml::from_str(input)?;

    let mut team_names = HashSet::new();
    let mut teams = Vec::with_capacity(record.teams.len());
    for team_record in record.teams {
        if !team_names.insert(team_record.name.clone()) {
            return Err(PortfolioYamlError::DuplicateTeam(team_record.name));
        }
        teams.push(team_from_record(team_record, base_dir)?);
    }

    let mut feature_ids = HashSet::new();
    let mut features = Vec::with_capacity(record.features.len());
    for feature_record in record.features {
        if feature_record.id.trim().is_empty() {
            return Err(PortfolioYamlError::MissingFeatureId);
        }
        if !feature_ids.insert(feature_record.id.clone()) {
            return Err(PortfolioYamlError::DuplicateFeature(feature_record.id));
        }
        features.push(feature_from_record(feature_record)?);
    }

    Ok(Portfolio {
        name: record.name,
        teams,
        features,
    })
}

fn team_from_record(record: TeamRecord, base_dir: &Path) -> Result<Team, PortfolioYamlError> {
    let throughput = match (record.throughput, record.throughput_file) {
        (Some(counts), None) => Throughput::new(counts),
        (None, Some(file)) => {
            let path = base_dir.join(file);
            let records = load_throughput_from_yaml_file(&path.to_string_lossy()).map_err(
                |source| PortfolioYamlError::Throughput {
                    team: record.name.clone(),
                    path: path.clone(),
                    source,
                },
            )?;
            Throughput::from_daily_records(&records)
        }
        (Some(_), Some(_)) => return Err(PortfolioYamlError::AmbiguousThroughput(record.name)),
        (None, None) => return Err(PortfolioYamlError::MissingThroughput(record.name)),
    };

    Ok(Team::new(&record.name, record.feature_wip, throughput))
}

fn feature_from_record(record: FeatureRecord) -> Result<Feature, PortfolioYamlError> {
    let mut work = Vec::with_capacity(record.work.len());
    for work_record in record.work {
        let total_items = work_record.total_items.unwrap_or(work_record.remaining_items);
        if work_record.remaining_items > total_items {
            return Err(PortfolioYamlError::InvalidRemainingItems {
                feature: record.id.clone(),
                team: work_record.team.clone(),
            });
        }
        work.push(FeatureWork::new(
            &work_record.team,
            work_record.remaining_items,
            total_items,
        ));
    }

    let name = record.name.unwrap_or_else(|| record.id.clone());
    let mut feature = Feature::new(&record.id, &name, work);
    feature.target_date = parse_date_opt(record.target_date.as_deref())?;
    Ok(feature)
}

fn parse_date_opt(value: Option<&str>) -> Result<Option<NaiveDate>, PortfolioYamlError> {
    value
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| PortfolioYamlError::InvalidDate(value.to_string()))
        })
        .transpose()
}
