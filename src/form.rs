use std::collections::HashMap;

use crate::league_params::BaselineTable;
use crate::ratio::{FORM_EPS, saturating_ratio};
use crate::tables::{FormMetric, MatchFixture, RecentForm};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamForm {
    pub gf_home: Option<f64>,
    pub ga_home: Option<f64>,
    pub gf_away: Option<f64>,
    pub ga_away: Option<f64>,
}

impl TeamForm {
    fn slot(&mut self, metric: FormMetric) -> &mut Option<f64> {
        match metric {
            FormMetric::GoalsForHome => &mut self.gf_home,
            FormMetric::GoalsAgainstHome => &mut self.ga_home,
            FormMetric::GoalsForAway => &mut self.gf_away,
            FormMetric::GoalsAgainstAway => &mut self.ga_away,
        }
    }

    pub fn get(&self, metric: FormMetric) -> Option<f64> {
        match metric {
            FormMetric::GoalsForHome => self.gf_home,
            FormMetric::GoalsAgainstHome => self.ga_home,
            FormMetric::GoalsForAway => self.gf_away,
            FormMetric::GoalsAgainstAway => self.ga_away,
        }
    }
}

/// Recent-form rates indexed by league, then team.
#[derive(Debug, Clone, Default)]
pub struct FormTable {
    leagues: HashMap<String, HashMap<String, TeamForm>>,
}

impl FormTable {
    /// Later rows for the same (league, team, metric) overwrite earlier ones.
    pub fn from_rows(rows: &[RecentForm]) -> Self {
        let mut leagues: HashMap<String, HashMap<String, TeamForm>> = HashMap::new();
        for row in rows {
            let Some(metric) = row.known_metric() else {
                continue;
            };
            let team = leagues
                .entry(row.league.clone())
                .or_default()
                .entry(row.team.clone())
                .or_default();
            *team.slot(metric) = Some(row.value);
        }
        Self { leagues }
    }

    pub fn lookup(&self, league: &str, team: &str, metric: FormMetric) -> Option<f64> {
        self.leagues
            .get(league)
            .and_then(|teams| teams.get(team))
            .and_then(|form| form.get(metric))
    }

    pub fn team_count(&self) -> usize {
        self.leagues.values().map(HashMap::len).sum()
    }
}

/// Attack-strength and defence-weakness ratios for both sides of a fixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormRatios {
    pub home_attack: f64,
    pub away_defence: f64,
    pub away_attack: f64,
    pub home_defence: f64,
}

impl FormRatios {
    pub fn neutral() -> Self {
        Self {
            home_attack: 1.0,
            away_defence: 1.0,
            away_attack: 1.0,
            home_defence: 1.0,
        }
    }
}

/// First-pass intensities before the segment correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormIntensity {
    pub mu_home: f64,
    pub mu_away: f64,
    pub ratios: FormRatios,
    pub home: f64,
    pub away: f64,
}

/// Scales the league baseline by each side's recent scoring and the
/// opponent's recent conceding, relative to the league's realized averages.
///
/// Home-venue rates (home attack, home defence) are normalised by the league
/// average home goals; away-venue rates by the league average away goals.
/// Missing form entries fall back to the league baseline for that venue.
pub fn form_intensity(
    fixture: &MatchFixture,
    baselines: &BaselineTable,
    form: &FormTable,
) -> FormIntensity {
    let league = fixture.league.as_str();
    let (mu_home, mu_away) = baselines.baseline(league).pair();
    let (league_home_avg, league_away_avg) = baselines
        .realized(league)
        .unwrap_or((mu_home, mu_away));

    let gf_home = form
        .lookup(league, &fixture.home, FormMetric::GoalsForHome)
        .unwrap_or(mu_home);
    let ga_home = form
        .lookup(league, &fixture.home, FormMetric::GoalsAgainstHome)
        .unwrap_or(mu_home);
    let gf_away = form
        .lookup(league, &fixture.away, FormMetric::GoalsForAway)
        .unwrap_or(mu_away);
    let ga_away = form
        .lookup(league, &fixture.away, FormMetric::GoalsAgainstAway)
        .unwrap_or(mu_away);

    let ratios = FormRatios {
        home_attack: saturating_ratio(gf_home, league_home_avg, FORM_EPS),
        away_defence: saturating_ratio(ga_away, league_away_avg, FORM_EPS),
        away_attack: saturating_ratio(gf_away, league_away_avg, FORM_EPS),
        home_defence: saturating_ratio(ga_home, league_home_avg, FORM_EPS),
    };

    FormIntensity {
        mu_home,
        mu_away,
        ratios,
        home: mu_home * ratios.home_attack * ratios.away_defence,
        away: mu_away * ratios.away_attack * ratios.home_defence,
    }
}
