use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::feature::{Feature, FeatureWork};
use crate::domain::team::Team;
use crate::domain::throughput::Throughput;
use crate::services::forecast::{HowManyForecast, WhenForecast};
use crate::services::random::{RandomNumberSource, RandomSourceProvider, SeededRandomProvider};
use crate::services::settings::ForecastSettings;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("feature {feature} references unknown team {team}")]
    UnknownTeam { feature: String, team: String },
}

/// Remaining work of one feature for one team during a simulation.
struct SimulationState {
    feature_index: usize,
    initial_remaining_items: usize,
    remaining_items: usize,
    simulation_result: HashMap<usize, usize>,
}

impl SimulationState {
    fn new(feature_index: usize, work: &FeatureWork) -> Self {
        Self {
            feature_index,
            initial_remaining_items: work.remaining_items,
            remaining_items: work.remaining_items,
            simulation_result: HashMap::new(),
        }
    }

    fn has_work_remaining(&self) -> bool {
        self.remaining_items > 0
    }
}

struct TeamSimulation<'a> {
    team: &'a Team,
    run: u64,
    states: Vec<SimulationState>,
}

/// Monte Carlo forecasts over historical throughput.
pub struct ForecastService<P: RandomSourceProvider = SeededRandomProvider> {
    settings: ForecastSettings,
    provider: P,
}

impl ForecastService<SeededRandomProvider> {
    pub fn from_settings(settings: ForecastSettings) -> Self {
        let provider = SeededRandomProvider::new(settings.seed);
        Self::new(provider, settings)
    }
}

impl<P: RandomSourceProvider> ForecastService<P> {
    pub fn new(provider: P, settings: ForecastSettings) -> Self {
        Self { settings, provider }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// How many items are done after `days` days.
    pub fn how_many(&self, throughput: &Throughput, days: usize) -> HowManyForecast {
        info!(days, "running how many forecast");

        let mut source = self.provider.source_for_run(0);
        let mut simulation_result = HashMap::new();
        for _ in 0..self.settings.trials {
            let simulated_throughput: usize = (0..days)
                .map(|_| simulated_throughput(throughput, &mut source))
                .sum();
            add_simulation_result(&mut simulation_result, simulated_throughput);
        }

        info!(days, "finished how many forecast");
        HowManyForecast::new(simulation_result, days)
    }

    /// Days until `remaining_items` are done by `team`.
    pub fn when(&self, team: &Team, remaining_items: usize) -> WhenForecast {
        info!(team = %team.name, remaining_items, "running when forecast");

        if remaining_items == 0 {
            return WhenForecast::no_remaining_work(Some(&team.name));
        }

        let work = FeatureWork::new(&team.name, remaining_items, remaining_items);
        let mut states = vec![SimulationState::new(0, &work)];
        if team.has_throughput() {
            states = self.simulate_team(TeamSimulation {
                team,
                run: 0,
                states,
            });
        } else {
            warn!(team = %team.name, "team has no throughput, skipping simulation");
        }

        info!(team = %team.name, remaining_items, "finished when forecast");
        let state = states.remove(0);
        WhenForecast::for_team(&team.name, state.simulation_result, remaining_items)
            .with_max_simulated_days(self.settings.max_simulated_days)
    }

    /// [`ForecastService::when`] for a bare throughput worked on one item at a time.
    pub fn when_for_throughput(
        &self,
        throughput: &Throughput,
        remaining_items: usize,
    ) -> WhenForecast {
        let team = Team::new("Team", 1, throughput.clone());
        self.when(&team, remaining_items)
    }

    /// Forecasts every feature. Feature order is priority order: a team only
    /// works on its first `feature_wip` unfinished features at a time.
    pub fn forecast_features(
        &self,
        teams: &[Team],
        features: &mut [Feature],
    ) -> Result<(), SimulationError> {
        info!(
            teams = teams.len(),
            features = features.len(),
            "running feature forecasts"
        );

        let (active, idle): (Vec<_>, Vec<_>) = initialize_team_simulations(teams, features)?
            .into_iter()
            .partition(|simulation| simulation.team.has_throughput());

        for simulation in &idle {
            warn!(team = %simulation.team.name, "team has no throughput, skipping simulation");
        }

        let finished: Vec<(String, Vec<SimulationState>)> = active
            .into_par_iter()
            .map(|simulation| {
                let team_name = simulation.team.name.clone();
                (team_name, self.simulate_team(simulation))
            })
            .chain(
                idle.into_par_iter()
                    .map(|simulation| (simulation.team.name.clone(), simulation.states)),
            )
            .collect();

        update_feature_forecasts(features, finished, self.settings.max_simulated_days);

        info!(features = features.len(), "finished feature forecasts");
        Ok(())
    }

    fn simulate_team(&self, simulation: TeamSimulation<'_>) -> Vec<SimulationState> {
        let TeamSimulation {
            team,
            run,
            mut states,
        } = simulation;
        debug!(team = %team.name, features = states.len(), "simulating team");

        let mut source = self.provider.source_for_run(run);
        let feature_wip = team.effective_feature_wip();
        let mut unfinished_trials = 0;

        for _ in 0..self.settings.trials {
            for state in states.iter_mut() {
                state.remaining_items = state.initial_remaining_items;
            }

            let mut simulated_day = 1;
            while has_work_remaining(&states) {
                if simulated_day > self.settings.max_simulated_days {
                    record_unfinished_trial(&mut states, self.settings.max_simulated_days);
                    unfinished_trials += 1;
                    break;
                }
                simulate_day(
                    &team.throughput,
                    feature_wip,
                    &mut states,
                    simulated_day,
                    &mut source,
                );
                simulated_day += 1;
            }
        }

        if unfinished_trials > 0 {
            warn!(
                team = %team.name,
                unfinished_trials,
                max_simulated_days = self.settings.max_simulated_days,
                "trials did not finish within the simulated days, recorded as unfinished"
            );
        }

        states
    }
}

fn initialize_team_simulations<'a>(
    teams: &'a [Team],
    features: &[Feature],
) -> Result<Vec<TeamSimulation<'a>>, SimulationError> {
    let known_teams: HashSet<&str> = teams.iter().map(|team| team.name.as_str()).collect();
    for feature in features {
        if let Some(team) = feature.teams().find(|team| !known_teams.contains(team)) {
            return Err(SimulationError::UnknownTeam {
                feature: feature.id.clone(),
                team: team.to_string(),
            });
        }
    }

    let simulations = teams
        .iter()
        .enumerate()
        .map(|(run, team)| {
            let states = features
                .iter()
                .enumerate()
                .flat_map(|(feature_index, feature)| {
                    feature
                        .work
                        .iter()
                        .filter(move |work| work.team == team.name && work.remaining_items > 0)
                        .map(move |work| SimulationState::new(feature_index, work))
                })
                .collect();
            TeamSimulation {
                team,
                run: run as u64,
                states,
            }
        })
        .filter(|simulation| !simulation.states.is_empty())
        .collect();

    Ok(simulations)
}

fn simulate_day<S: RandomNumberSource>(
    throughput: &Throughput,
    feature_wip: usize,
    states: &mut [SimulationState],
    simulated_day: usize,
    source: &mut S,
) {
    let closable_items = simulated_throughput(throughput, source);
    let mut closed_items = 0;
    while closed_items < closable_items && has_work_remaining(states) {
        let open_features = states
            .iter()
            .filter(|state| state.has_work_remaining())
            .count();
        let worked_on = source.random_number(feature_wip.min(open_features));
        let Some(state) = states
            .iter_mut()
            .filter(|state| state.has_work_remaining())
            .nth(worked_on)
        else {
            break;
        };

        state.remaining_items -= 1;
        if !state.has_work_remaining() {
            add_simulation_result(&mut state.simulation_result, simulated_day);
        }
        closed_items += 1;
    }
}

/// Features still open when a trial hits the day cap count as unfinished.
fn record_unfinished_trial(states: &mut [SimulationState], max_simulated_days: usize) {
    let unfinished_outcome = WhenForecast::unfinished_outcome(max_simulated_days);
    for state in states.iter_mut().filter(|state| state.has_work_remaining()) {
        add_simulation_result(&mut state.simulation_result, unfinished_outcome);
    }
}

fn update_feature_forecasts(
    features: &mut [Feature],
    finished: Vec<(String, Vec<SimulationState>)>,
    max_simulated_days: usize,
) {
    let mut forecasts_by_feature: HashMap<usize, Vec<WhenForecast>> = HashMap::new();
    for (team, states) in finished {
        for state in states {
            forecasts_by_feature
                .entry(state.feature_index)
                .or_default()
                .push(
                    WhenForecast::for_team(
                        &team,
                        state.simulation_result,
                        state.initial_remaining_items,
                    )
                    .with_max_simulated_days(max_simulated_days),
                );
        }
    }

    for (feature_index, feature) in features.iter_mut().enumerate() {
        let mut forecasts = forecasts_by_feature
            .remove(&feature_index)
            .unwrap_or_default();
        if forecasts.is_empty() {
            forecasts.push(WhenForecast::no_remaining_work(None));
        }
        feature.set_feature_forecasts(forecasts);
    }
}

fn has_work_remaining(states: &[SimulationState]) -> bool {
    states.iter().any(SimulationState::has_work_remaining)
}

fn simulated_throughput<S: RandomNumberSource>(throughput: &Throughput, source: &mut S) -> usize {
    let random_day = source.random_number(throughput.history());
    throughput.throughput_on_day(random_day).unwrap_or(0)
}

fn add_simulation_result(simulation_result: &mut HashMap<usize, usize>, outcome: usize) {
    *simulation_result.entry(outcome).or_insert(0) += 1;
}
