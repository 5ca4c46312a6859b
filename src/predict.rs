use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MaxGoals;
use crate::fair_odds::FairOdds1x2;
use crate::lambda::ModelTables;
use crate::scoreline::ScoreGrid;
use crate::tables::{MatchFixture, ModelInputs};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPrediction {
    pub match_key: String,
    pub league: String,
    pub utc_date: String,
    pub home: String,
    pub away: String,
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub p_home: f64,
    pub p_draw: f64,
    pub p_away: f64,
    pub p_over25: f64,
    pub p_under25: f64,
    pub p_btts_yes: f64,
    pub p_btts_no: f64,
    pub fair_home: Option<f64>,
    pub fair_draw: Option<f64>,
    pub fair_away: Option<f64>,
}

pub fn predict_fixture(
    tables: &ModelTables,
    fixture: &MatchFixture,
    max_goals: MaxGoals,
) -> MatchPrediction {
    let lambdas = tables.lambdas(fixture);
    let grid = ScoreGrid::new(lambdas.lambda_home, lambdas.lambda_away, max_goals);
    let markets = grid.markets();
    let fair = FairOdds1x2::from_markets(&markets);

    debug!(
        match_key = %fixture.match_key(),
        mu_home = lambdas.form.mu_home,
        mu_away = lambdas.form.mu_away,
        form_home = lambdas.form.home,
        form_away = lambdas.form.away,
        segment_home = lambdas.segment_home,
        segment_away = lambdas.segment_away,
        tail_mass = grid.tail_mass(),
        "priced fixture"
    );

    MatchPrediction {
        match_key: fixture.match_key(),
        league: fixture.league.clone(),
        utc_date: fixture.utc_date.clone(),
        home: fixture.home.clone(),
        away: fixture.away.clone(),
        lambda_home: lambdas.lambda_home,
        lambda_away: lambdas.lambda_away,
        p_home: markets.p_home,
        p_draw: markets.p_draw,
        p_away: markets.p_away,
        p_over25: markets.p_over25,
        p_under25: markets.p_under25,
        p_btts_yes: markets.p_btts_yes,
        p_btts_no: markets.p_btts_no,
        fair_home: fair.home,
        fair_draw: fair.draw,
        fair_away: fair.away,
    }
}

/// One prediction per fixture, in input order. Fixtures are independent, so
/// the loop runs on rayon; `collect` keeps the input order.
pub fn predict_fixtures(
    tables: &ModelTables,
    fixtures: &[MatchFixture],
    max_goals: MaxGoals,
) -> Vec<MatchPrediction> {
    fixtures
        .par_iter()
        .map(|fixture| predict_fixture(tables, fixture, max_goals))
        .collect()
}

/// Builds the lookup tables from `inputs` and prices every fixture.
pub fn predict(inputs: &ModelInputs, max_goals: MaxGoals) -> Vec<MatchPrediction> {
    let tables = ModelTables::build(inputs);
    predict_fixtures(&tables, &inputs.fixtures, max_goals)
}

pub fn build_pool(threads: Option<usize>) -> Option<rayon::ThreadPool> {
    let threads = threads?;
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .ok()
}

pub fn with_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}
