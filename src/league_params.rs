use std::collections::HashMap;

use crate::tables::HistoricalResult;

pub const DEFAULT_MU_HOME: f64 = 1.5;
pub const DEFAULT_MU_AWAY: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeagueBaseline {
    pub sample_matches: usize,
    pub mu_home: f64,
    pub mu_away: f64,
}

impl LeagueBaseline {
    /// Priors for a league with no history. Not zeros, so the Poisson model
    /// never degenerates for a league we have simply not seen yet.
    pub fn defaults() -> Self {
        Self {
            sample_matches: 0,
            mu_home: DEFAULT_MU_HOME,
            mu_away: DEFAULT_MU_AWAY,
        }
    }

    pub fn pair(&self) -> (f64, f64) {
        (self.mu_home, self.mu_away)
    }
}

/// Per-league goal rates derived from historical results.
#[derive(Debug, Clone, Default)]
pub struct BaselineTable {
    leagues: HashMap<String, LeagueBaseline>,
}

impl BaselineTable {
    pub fn from_results(results: &[HistoricalResult]) -> Self {
        let mut sums: HashMap<&str, (f64, f64, usize)> = HashMap::new();
        for r in results {
            let entry = sums.entry(r.league.as_str()).or_insert((0.0, 0.0, 0));
            entry.0 += r.home_goals as f64;
            entry.1 += r.away_goals as f64;
            entry.2 += 1;
        }

        let leagues = sums
            .into_iter()
            .filter(|(_, (_, _, n))| *n > 0)
            .map(|(league, (home, away, n))| {
                (
                    league.to_string(),
                    LeagueBaseline {
                        sample_matches: n,
                        mu_home: home / n as f64,
                        mu_away: away / n as f64,
                    },
                )
            })
            .collect();

        Self { leagues }
    }

    /// Baseline for `league`, falling back to the priors.
    pub fn baseline(&self, league: &str) -> LeagueBaseline {
        self.leagues
            .get(league)
            .copied()
            .unwrap_or_else(LeagueBaseline::defaults)
    }

    /// Empirical (home, away) goal averages for `league`, `None` when it
    /// has no results.
    pub fn realized(&self, league: &str) -> Option<(f64, f64)> {
        self.leagues
            .get(league)
            .filter(|b| b.sample_matches > 0)
            .map(LeagueBaseline::pair)
    }

    pub fn len(&self) -> usize {
        self.leagues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leagues.is_empty()
    }
}
