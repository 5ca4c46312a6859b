use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{info, warn};

use crate::tables::{
    ModelInputs, parse_fixture_row, parse_form_row, parse_result_row, parse_segment_row,
};

pub const RESULTS_FILE: &str = "results.json";
pub const MATCHES_FILE: &str = "matches.json";
pub const RECENT_FORM_FILE: &str = "recent_form.json";
pub const SEGMENTS_FILE: &str = "segments.json";

#[derive(Debug, Clone)]
pub struct LoadedTable<T> {
    pub rows: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for LoadedTable<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            skipped: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub loaded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub data_dir: PathBuf,
    pub results: TableCounts,
    pub fixtures: TableCounts,
    pub recent_form: TableCounts,
    pub segments: TableCounts,
}

impl LoadReport {
    pub fn skipped_total(&self) -> usize {
        self.results.skipped
            + self.fixtures.skipped
            + self.recent_form.skipped
            + self.segments.skipped
    }
}

/// Parses a JSON array of rows, keeping the ones `parse` accepts.
pub fn parse_table<T>(raw: &str, parse: impl Fn(&Value) -> Option<T>) -> Result<LoadedTable<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(LoadedTable::default());
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid table json")?;
    let Some(items) = v.as_array() else {
        return Err(anyhow!("table json must be an array of rows"));
    };

    let mut out = LoadedTable::default();
    for item in items {
        match parse(item) {
            Some(row) => out.rows.push(row),
            None => out.skipped += 1,
        }
    }
    Ok(out)
}

/// Loads one table file. A missing file is an empty table.
pub fn load_table<T>(path: &Path, parse: impl Fn(&Value) -> Option<T>) -> Result<LoadedTable<T>> {
    if !path.exists() {
        info!(path = %path.display(), "table file missing, treating as empty");
        return Ok(LoadedTable::default());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let table = parse_table(&raw, parse).with_context(|| format!("parse {}", path.display()))?;
    if table.skipped > 0 {
        warn!(
            path = %path.display(),
            skipped = table.skipped,
            kept = table.rows.len(),
            "skipped malformed rows"
        );
    }
    Ok(table)
}

pub fn load_inputs(data_dir: &Path) -> Result<(ModelInputs, LoadReport)> {
    let results = load_table(&data_dir.join(RESULTS_FILE), parse_result_row)?;
    let fixtures = load_table(&data_dir.join(MATCHES_FILE), parse_fixture_row)?;
    let recent_form = load_table(&data_dir.join(RECENT_FORM_FILE), parse_form_row)?;
    let segments = load_table(&data_dir.join(SEGMENTS_FILE), parse_segment_row)?;

    let report = LoadReport {
        data_dir: data_dir.to_path_buf(),
        results: counts(&results),
        fixtures: counts(&fixtures),
        recent_form: counts(&recent_form),
        segments: counts(&segments),
    };

    let inputs = ModelInputs {
        results: results.rows,
        recent_form: recent_form.rows,
        segments: segments.rows,
        fixtures: fixtures.rows,
    };
    Ok((inputs, report))
}

fn counts<T>(table: &LoadedTable<T>) -> TableCounts {
    TableCounts {
        loaded: table.rows.len(),
        skipped: table.skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_empty_are_empty_tables() {
        assert!(parse_table("null", parse_result_row).unwrap().rows.is_empty());
        assert!(parse_table("  ", parse_result_row).unwrap().rows.is_empty());
        assert!(parse_table("[]", parse_result_row).unwrap().rows.is_empty());
    }

    #[test]
    fn non_array_is_an_error() {
        assert!(parse_table(r#"{"league": "epl"}"#, parse_result_row).is_err());
        assert!(parse_table("[1, 2", parse_result_row).is_err());
    }

    #[test]
    fn bad_rows_are_counted_not_fatal() {
        let raw = r#"[
            {"league": "epl", "home_goals": 2, "away_goals": 0},
            {"league": "epl", "home_goals": "two", "away_goals": 0},
            "not an object",
            {"league": "epl", "home_goals": 1, "away_goals": 1}
        ]"#;
        let table = parse_table(raw, parse_result_row).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.skipped, 2);
    }

    #[test]
    fn negative_form_value_is_skipped() {
        let raw = r#"[
            {"league": "epl", "team": "A", "metric": "gf_wavg_home", "value": -0.8},
            {"league": "epl", "team": "A", "metric": "ga_wavg_home", "value": 1.1}
        ]"#;
        let table = parse_table(raw, parse_form_row).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.skipped, 1);
        assert_eq!(table.rows[0].metric, "ga_wavg_home");
    }

    #[test]
    fn missing_file_is_empty() {
        let table = load_table(Path::new("/definitely/not/here.json"), parse_result_row).unwrap();
        assert!(table.rows.is_empty());
        assert_eq!(table.skipped, 0);
    }
}
