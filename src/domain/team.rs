use crate::domain::throughput::Throughput;

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub name: String,
    /// Number of features the team works on in parallel.
    pub feature_wip: usize,
    pub throughput: Throughput,
}

impl Team {
    pub fn new(name: &str, feature_wip: usize, throughput: Throughput) -> Self {
        Self {
            name: name.to_string(),
            feature_wip,
            throughput,
        }
    }

    /// Feature WIP as used by the simulation; anything below one counts as one.
    pub fn effective_feature_wip(&self) -> usize {
        self.feature_wip.max(1)
    }

    pub fn has_throughput(&self) -> bool {
        self.throughput.total_throughput() > 0
    }
}
