use crate::domain::feature::Feature;
use crate::domain::team::Team;

/// Teams and the features they deliver. Feature order is priority order.
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub name: String,
    pub teams: Vec<Team>,
    pub features: Vec<Feature>,
}
