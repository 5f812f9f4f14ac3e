pub mod feature;
pub mod portfolio;
pub mod team;
pub mod throughput;
