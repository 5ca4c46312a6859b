use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;
use serde_json::Value;

use crate::config::MaxGoals;
use crate::dataset::{LoadedTable, load_table};
use crate::predict::MatchPrediction;
use crate::tables::{optional_number_field, text_field};

#[derive(Debug, Serialize)]
struct PredictionsFile<'a> {
    generated_at: String,
    max_goals: u32,
    predictions: &'a [MatchPrediction],
}

pub fn write_predictions_json(
    path: &Path,
    predictions: &[MatchPrediction],
    max_goals: MaxGoals,
) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = PredictionsFile {
        generated_at: Utc::now().to_rfc3339(),
        max_goals: max_goals.get(),
        predictions,
    };
    let json = serde_json::to_string_pretty(&file).context("serialize predictions")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write predictions")?;
    fs::rename(&tmp, path).context("swap predictions")?;
    Ok(())
}

/// Bookmaker quotes for one fixture, already averaged and maxed upstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggQuote {
    pub league: String,
    pub commence_time: String,
    pub home: String,
    pub away: String,
    pub avg_home: Option<f64>,
    pub avg_draw: Option<f64>,
    pub avg_away: Option<f64>,
    pub best_home: Option<f64>,
    pub best_draw: Option<f64>,
    pub best_away: Option<f64>,
}

impl AggQuote {
    fn join_key(&self) -> (&str, &str, &str, &str) {
        (&self.league, &self.commence_time, &self.home, &self.away)
    }
}

pub fn parse_quote_row(v: &Value) -> Option<AggQuote> {
    Some(AggQuote {
        league: text_field(v, "league")?,
        commence_time: text_field(v, "commence_time")?,
        home: text_field(v, "home")?,
        away: text_field(v, "away")?,
        avg_home: optional_number_field(v, "avg_home")?,
        avg_draw: optional_number_field(v, "avg_draw")?,
        avg_away: optional_number_field(v, "avg_away")?,
        best_home: optional_number_field(v, "best_home")?,
        best_draw: optional_number_field(v, "best_draw")?,
        best_away: optional_number_field(v, "best_away")?,
    })
}

pub fn load_quotes(path: &Path) -> Result<LoadedTable<AggQuote>> {
    load_table(path, parse_quote_row)
}

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

impl Cell {
    fn opt(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Blank,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReport {
    pub predictions: usize,
    pub with_quotes: usize,
}

/// Writes a workbook with the full predictions and a side-by-side sheet of
/// model prices next to the joined market quotes.
pub fn export_workbook(
    path: &Path,
    predictions: &[MatchPrediction],
    quotes: &[AggQuote],
) -> Result<ExportReport> {
    let prediction_rows = prediction_rows(predictions);
    let (export_rows, with_quotes) = side_by_side_rows(predictions, quotes);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Predictions")?;
        write_rows(sheet, &prediction_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Export")?;
        write_rows(sheet, &export_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        predictions: predictions.len(),
        with_quotes,
    })
}

fn header(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|n| Cell::Text(n.to_string())).collect()
}

fn prediction_rows(predictions: &[MatchPrediction]) -> Vec<Vec<Cell>> {
    let mut rows = vec![header(&[
        "match_key",
        "league",
        "utc_date",
        "home",
        "away",
        "lambda_home",
        "lambda_away",
        "p_home",
        "p_draw",
        "p_away",
        "p_over25",
        "p_under25",
        "p_btts_yes",
        "p_btts_no",
        "fair_home",
        "fair_draw",
        "fair_away",
    ])];
    for p in predictions {
        rows.push(vec![
            Cell::Text(p.match_key.clone()),
            Cell::Text(p.league.clone()),
            Cell::Text(p.utc_date.clone()),
            Cell::Text(p.home.clone()),
            Cell::Text(p.away.clone()),
            Cell::Number(p.lambda_home),
            Cell::Number(p.lambda_away),
            Cell::Number(p.p_home),
            Cell::Number(p.p_draw),
            Cell::Number(p.p_away),
            Cell::Number(p.p_over25),
            Cell::Number(p.p_under25),
            Cell::Number(p.p_btts_yes),
            Cell::Number(p.p_btts_no),
            Cell::opt(p.fair_home),
            Cell::opt(p.fair_draw),
            Cell::opt(p.fair_away),
        ]);
    }
    rows
}

fn side_by_side_rows(
    predictions: &[MatchPrediction],
    quotes: &[AggQuote],
) -> (Vec<Vec<Cell>>, usize) {
    let by_key: HashMap<(&str, &str, &str, &str), &AggQuote> =
        quotes.iter().map(|q| (q.join_key(), q)).collect();

    let mut rows = vec![header(&[
        "match_key",
        "league",
        "utc_date",
        "home",
        "away",
        "p_home",
        "p_draw",
        "p_away",
        "fair_home",
        "fair_draw",
        "fair_away",
        "avg_home",
        "avg_draw",
        "avg_away",
        "best_home",
        "best_draw",
        "best_away",
    ])];

    let mut matched = 0usize;
    for p in predictions {
        let key = (
            p.league.as_str(),
            p.utc_date.as_str(),
            p.home.as_str(),
            p.away.as_str(),
        );
        let quote = by_key.get(&key).copied();
        if quote.is_some() {
            matched += 1;
        }
        let q = quote.cloned().unwrap_or_default();
        rows.push(vec![
            Cell::Text(p.match_key.clone()),
            Cell::Text(p.league.clone()),
            Cell::Text(p.utc_date.clone()),
            Cell::Text(p.home.clone()),
            Cell::Text(p.away.clone()),
            Cell::Number(p.p_home),
            Cell::Number(p.p_draw),
            Cell::Number(p.p_away),
            Cell::opt(p.fair_home),
            Cell::opt(p.fair_draw),
            Cell::opt(p.fair_away),
            Cell::opt(q.avg_home),
            Cell::opt(q.avg_draw),
            Cell::opt(q.avg_away),
            Cell::opt(q.best_home),
            Cell::opt(q.best_draw),
            Cell::opt(q.best_away),
        ]);
    }
    (rows, matched)
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            match cell {
                Cell::Text(s) => {
                    worksheet
                        .write_string(r, c, s)
                        .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
                }
                Cell::Number(v) => {
                    worksheet
                        .write_number(r, c, *v)
                        .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
                }
                Cell::Blank => {}
            }
        }
    }
    Ok(())
}
