pub mod config;
pub mod dataset;
pub mod export;
pub mod fair_odds;
pub mod form;
pub mod lambda;
pub mod league_params;
pub mod predict;
pub mod ratio;
pub mod scoreline;
pub mod segments;
pub mod tables;
