use std::path::PathBuf;

use poisson_odds::config::MaxGoals;
use poisson_odds::dataset::{TableCounts, load_inputs};
use poisson_odds::export::load_quotes;
use poisson_odds::predict::predict;
use poisson_odds::scoreline::ScoreGrid;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn loads_fixture_tables_and_counts_skips() {
    let (inputs, report) = load_inputs(&fixture_path("data")).expect("fixture tables should load");

    assert_eq!(report.results, TableCounts { loaded: 6, skipped: 3 });
    assert_eq!(report.fixtures, TableCounts { loaded: 4, skipped: 1 });
    assert_eq!(report.recent_form, TableCounts { loaded: 5, skipped: 1 });
    assert_eq!(report.segments, TableCounts { loaded: 6, skipped: 1 });
    assert_eq!(report.skipped_total(), 6);

    assert_eq!(inputs.fixtures[0].home, "Arsenal");
    assert_eq!(inputs.fixtures[3].league, "soccer_spain_la_liga");
    assert_eq!(inputs.recent_form[1].value, 0.7);
    assert_eq!(inputs.segments[4].gf_per90_bin, None);
}

#[test]
fn bad_rows_never_abort_the_batch() {
    let (inputs, _) = load_inputs(&fixture_path("data")).expect("fixture tables should load");
    let preds = predict(&inputs, MaxGoals::default());
    assert_eq!(preds.len(), inputs.fixtures.len());
    for p in &preds {
        assert!(p.lambda_home > 0.0 && p.lambda_away > 0.0, "{}", p.match_key);
        // The only missing mass is what the grid truncates.
        let tail = ScoreGrid::new(p.lambda_home, p.lambda_away, MaxGoals::default()).tail_mass();
        assert!((p.p_home + p.p_draw + p.p_away + tail - 1.0).abs() < 1e-12);
    }
}

#[test]
fn missing_directory_is_all_empty() {
    let (inputs, report) =
        load_inputs(&fixture_path("no_such_dir")).expect("missing files are empty");
    assert!(inputs.results.is_empty());
    assert!(inputs.fixtures.is_empty());
    assert_eq!(report.skipped_total(), 0);
}

#[test]
fn loads_aggregated_quotes() {
    let quotes = load_quotes(&fixture_path("agg_h2h.json")).expect("quotes should load");
    assert_eq!(quotes.rows.len(), 2);
    assert_eq!(quotes.skipped, 0);
    assert_eq!(quotes.rows[0].best_away, Some(4.33));
    assert_eq!(quotes.rows[1].avg_draw, None);
}
