use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

pub const DEFAULT_MAX_GOALS: u32 = 10;
/// The grid holds (MAX_GOALS + 1)^2 cells, so the bound is capped.
pub const MAX_GOALS_LIMIT: u32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MAX_GOALS must be a positive integer, got {0}")]
    NonPositiveMaxGoals(i64),
    #[error("MAX_GOALS must be a positive integer, got {0:?}")]
    InvalidMaxGoals(String),
    #[error("MAX_GOALS must be at most {MAX_GOALS_LIMIT}, got {0}")]
    MaxGoalsTooLarge(i64),
    #[error("thread count must be at least 1")]
    ZeroThreads,
}

/// Per-side bound of the scoreline grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxGoals(u32);

impl MaxGoals {
    pub fn new(value: i64) -> Result<Self, ConfigError> {
        if value <= 0 {
            return Err(ConfigError::NonPositiveMaxGoals(value));
        }
        if value > i64::from(MAX_GOALS_LIMIT) {
            return Err(ConfigError::MaxGoalsTooLarge(value));
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| ConfigError::InvalidMaxGoals(value.to_string()))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for MaxGoals {
    fn default() -> Self {
        Self(DEFAULT_MAX_GOALS)
    }
}

pub fn parse_max_goals(raw: &str) -> Result<MaxGoals, ConfigError> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidMaxGoals(trimmed.to_string()))?;
    MaxGoals::new(value)
}

/// Prices upcoming fixtures from historical results, recent form and
/// segment bins.
#[derive(Parser, Debug, Clone)]
#[command(name = "poisson_odds", version, about)]
pub struct RunConfig {
    /// Directory holding results.json, matches.json, recent_form.json and segments.json
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Per-side goal bound of the scoreline grid
    #[arg(long, env = "MAX_GOALS", default_value = "10", value_parser = parse_max_goals)]
    pub max_goals: MaxGoals,

    /// Where the predictions JSON is written
    #[arg(long, env = "MODEL_OUTPUT", default_value = "data/model_input.json")]
    pub output: PathBuf,

    /// Optional spreadsheet export
    #[arg(long = "xlsx", env = "EXPORT_XLSX")]
    pub export_xlsx: Option<PathBuf>,

    /// Pre-aggregated bookmaker quotes joined into the spreadsheet export
    #[arg(long, env = "AGG_QUOTES_PATH")]
    pub quotes: Option<PathBuf>,

    /// Worker threads for the per-fixture loop (rayon's global pool when unset)
    #[arg(long, env = "MODEL_THREADS")]
    pub threads: Option<usize>,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_bound() {
        assert_eq!(parse_max_goals("10").unwrap().get(), 10);
        assert_eq!(parse_max_goals(" 6 ").unwrap().get(), 6);
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        assert_eq!(parse_max_goals("0"), Err(ConfigError::NonPositiveMaxGoals(0)));
        assert_eq!(parse_max_goals("-3"), Err(ConfigError::NonPositiveMaxGoals(-3)));
        assert!(matches!(parse_max_goals("ten"), Err(ConfigError::InvalidMaxGoals(_))));
        assert!(matches!(parse_max_goals("2.5"), Err(ConfigError::InvalidMaxGoals(_))));
        assert_eq!(parse_max_goals("100").unwrap().get(), MAX_GOALS_LIMIT);
        assert_eq!(parse_max_goals("101"), Err(ConfigError::MaxGoalsTooLarge(101)));
        assert_eq!(
            parse_max_goals("4000000000"),
            Err(ConfigError::MaxGoalsTooLarge(4_000_000_000))
        );
    }

    #[test]
    fn cli_defaults() {
        let cfg = RunConfig::try_parse_from(["poisson_odds"]).unwrap();
        assert_eq!(cfg.max_goals, MaxGoals::default());
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert!(cfg.export_xlsx.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn cli_rejects_bad_max_goals() {
        assert!(RunConfig::try_parse_from(["poisson_odds", "--max-goals", "0"]).is_err());
        assert!(RunConfig::try_parse_from(["poisson_odds", "--max-goals", "abc"]).is_err());
        assert!(RunConfig::try_parse_from(["poisson_odds", "--max-goals", "5000"]).is_err());
    }

    #[test]
    fn zero_threads_is_rejected() {
        let cfg = RunConfig::try_parse_from(["poisson_odds", "--threads", "0"]).unwrap();
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroThreads));
    }
}
