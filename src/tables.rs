//! Row types for the model's input tables, and the per-record parsers that
//! turn loosely typed JSON rows into them.
//!
//! A parser returns `None` when a row is malformed; callers skip the row and
//! keep going.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalResult {
    pub league: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormMetric {
    GoalsForHome,
    GoalsAgainstHome,
    GoalsForAway,
    GoalsAgainstAway,
}

impl FormMetric {
    pub const ALL: [FormMetric; 4] = [
        FormMetric::GoalsForHome,
        FormMetric::GoalsAgainstHome,
        FormMetric::GoalsForAway,
        FormMetric::GoalsAgainstAway,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormMetric::GoalsForHome => "gf_wavg_home",
            FormMetric::GoalsAgainstHome => "ga_wavg_home",
            FormMetric::GoalsForAway => "gf_wavg_away",
            FormMetric::GoalsAgainstAway => "ga_wavg_away",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

/// One recent-form row. `metric` is kept as the raw name; names outside
/// [`FormMetric`] are valid rows the model simply does not read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentForm {
    pub league: String,
    pub team: String,
    pub metric: String,
    pub value: f64,
}

impl RecentForm {
    pub fn known_metric(&self) -> Option<FormMetric> {
        FormMetric::from_name(&self.metric)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentBin {
    pub league: String,
    pub team: String,
    pub bin_start_min: i32,
    pub gf_per90_bin: Option<f64>,
    pub ga_per90_bin: Option<f64>,
}

impl SegmentBin {
    pub fn rate(&self, for_scored: bool) -> Option<f64> {
        if for_scored {
            self.gf_per90_bin
        } else {
            self.ga_per90_bin
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFixture {
    pub league: String,
    pub utc_date: String,
    pub home: String,
    pub away: String,
}

impl MatchFixture {
    /// Deterministic key for a fixture within a run.
    pub fn match_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.league, self.utc_date, self.home, self.away
        )
    }
}

/// The four already-materialized tables the model reads.
#[derive(Debug, Clone, Default)]
pub struct ModelInputs {
    pub results: Vec<HistoricalResult>,
    pub recent_form: Vec<RecentForm>,
    pub segments: Vec<SegmentBin>,
    pub fixtures: Vec<MatchFixture>,
}

pub fn parse_result_row(v: &Value) -> Option<HistoricalResult> {
    Some(HistoricalResult {
        league: text_field(v, "league")?,
        home_goals: goals_field(v, "home_goals")?,
        away_goals: goals_field(v, "away_goals")?,
    })
}

pub fn parse_fixture_row(v: &Value) -> Option<MatchFixture> {
    Some(MatchFixture {
        league: text_field(v, "league")?,
        utc_date: text_field(v, "utc_date")?,
        home: text_field(v, "home")?,
        away: text_field(v, "away")?,
    })
}

pub fn parse_form_row(v: &Value) -> Option<RecentForm> {
    let value = match number_cell(v.get("value")) {
        Cell::Value(x) if x >= 0.0 => x,
        _ => return None,
    };
    Some(RecentForm {
        league: text_field(v, "league")?,
        team: text_field(v, "team")?,
        metric: text_field(v, "metric")?,
        value,
    })
}

pub fn parse_segment_row(v: &Value) -> Option<SegmentBin> {
    let bin_start_min = match number_cell(v.get("bin_start_min")) {
        Cell::Value(x) if x.fract() == 0.0 && x.abs() <= i32::MAX as f64 => x as i32,
        _ => return None,
    };
    Some(SegmentBin {
        league: text_field(v, "league")?,
        team: text_field(v, "team")?,
        bin_start_min,
        gf_per90_bin: rate_cell(v.get("gf_per90_bin")).optional()?,
        ga_per90_bin: rate_cell(v.get("ga_per90_bin")).optional()?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    Absent,
    Value(f64),
    Malformed,
}

impl Cell {
    /// `Some(None)` for an absent cell, `None` when the cell is malformed.
    fn optional(self) -> Option<Option<f64>> {
        match self {
            Cell::Absent => Some(None),
            Cell::Value(x) => Some(Some(x)),
            Cell::Malformed => None,
        }
    }
}

fn number_cell(value: Option<&Value>) -> Cell {
    match value {
        None | Some(Value::Null) => Cell::Absent,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(x) if x.is_finite() => Cell::Value(x),
            _ => Cell::Malformed,
        },
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Cell::Absent;
            }
            match s.parse::<f64>() {
                Ok(x) if x.is_finite() => Cell::Value(x),
                _ => Cell::Malformed,
            }
        }
        Some(_) => Cell::Malformed,
    }
}

/// A goal rate: like `number_cell`, but negative values are malformed.
fn rate_cell(value: Option<&Value>) -> Cell {
    match number_cell(value) {
        Cell::Value(x) if x < 0.0 => Cell::Malformed,
        cell => cell,
    }
}

/// `Some(None)` when `key` is absent or blank, `None` when it is present but
/// not a finite number.
pub(crate) fn optional_number_field(v: &Value, key: &str) -> Option<Option<f64>> {
    number_cell(v.get(key)).optional()
}

pub(crate) fn text_field(v: &Value, key: &str) -> Option<String> {
    let s = match v.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if s.is_empty() { None } else { Some(s) }
}

fn goals_field(v: &Value, key: &str) -> Option<u32> {
    match number_cell(v.get(key)) {
        Cell::Value(x) if x >= 0.0 && x.fract() == 0.0 && x <= u32::MAX as f64 => Some(x as u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_row_accepts_numeric_strings() {
        let row = json!({"league": "epl", "home_goals": "2", "away_goals": 1});
        let r = parse_result_row(&row).unwrap();
        assert_eq!(r.home_goals, 2);
        assert_eq!(r.away_goals, 1);
    }

    #[test]
    fn result_row_rejects_negative_and_fractional_goals() {
        for row in [
            json!({"league": "epl", "home_goals": -1, "away_goals": 0}),
            json!({"league": "epl", "home_goals": 1.5, "away_goals": 0}),
            json!({"league": "epl", "home_goals": "x", "away_goals": 0}),
            json!({"league": "", "home_goals": 1, "away_goals": 0}),
        ] {
            assert!(parse_result_row(&row).is_none(), "{row}");
        }
    }

    #[test]
    fn fixture_row_requires_all_fields() {
        let ok = json!({
            "league": "epl", "utc_date": "2025-08-16T14:00:00Z",
            "home": "A", "away": "B", "round": ""
        });
        assert!(parse_fixture_row(&ok).is_some());
        let missing = json!({"league": "epl", "utc_date": "2025-08-16T14:00:00Z", "home": "A"});
        assert!(parse_fixture_row(&missing).is_none());
    }

    #[test]
    fn segment_row_blank_rate_is_absent_but_garbage_is_malformed() {
        let blank = json!({
            "league": "epl", "team": "A", "bin_start_min": "0",
            "gf_per90_bin": "", "ga_per90_bin": 0.8
        });
        let seg = parse_segment_row(&blank).unwrap();
        assert_eq!(seg.gf_per90_bin, None);
        assert_eq!(seg.ga_per90_bin, Some(0.8));

        let garbage =
            json!({"league": "epl", "team": "A", "bin_start_min": 0, "gf_per90_bin": "n/a"});
        assert!(parse_segment_row(&garbage).is_none());

        let bad_bin = json!({"league": "epl", "team": "A", "bin_start_min": "early"});
        assert!(parse_segment_row(&bad_bin).is_none());
    }

    #[test]
    fn negative_rates_are_malformed() {
        let form = json!({"league": "epl", "team": "A", "metric": "gf_wavg_home", "value": -0.8});
        assert!(parse_form_row(&form).is_none());
        let form = json!({"league": "epl", "team": "A", "metric": "gf_wavg_home", "value": "-1"});
        assert!(parse_form_row(&form).is_none());
        let zero = json!({"league": "epl", "team": "A", "metric": "gf_wavg_home", "value": 0});
        assert_eq!(parse_form_row(&zero).map(|r| r.value), Some(0.0));

        let seg = json!({
            "league": "epl", "team": "A", "bin_start_min": 0,
            "gf_per90_bin": 1.0, "ga_per90_bin": -0.2
        });
        assert!(parse_segment_row(&seg).is_none());
    }

    #[test]
    fn form_metric_vocabulary() {
        assert_eq!(FormMetric::from_name("gf_wavg_home"), Some(FormMetric::GoalsForHome));
        assert_eq!(FormMetric::from_name(" ga_wavg_away "), Some(FormMetric::GoalsAgainstAway));
        assert_eq!(FormMetric::from_name("xg_wavg_home"), None);
    }

    #[test]
    fn match_key_is_pipe_joined() {
        let f = MatchFixture {
            league: "epl".to_string(),
            utc_date: "2025-08-16T14:00:00Z".to_string(),
            home: "Arsenal".to_string(),
            away: "Chelsea".to_string(),
        };
        assert_eq!(f.match_key(), "epl|2025-08-16T14:00:00Z|Arsenal|Chelsea");
    }
}
