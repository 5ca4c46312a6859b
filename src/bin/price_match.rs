use anyhow::Result;
use clap::Parser;

use poisson_odds::config::{MaxGoals, parse_max_goals};
use poisson_odds::fair_odds::FairOdds1x2;
use poisson_odds::scoreline::ScoreGrid;

/// Prices a single pair of goal intensities without touching any input files.
#[derive(Parser, Debug)]
#[command(name = "price_match", about)]
struct Args {
    /// Expected home goals
    #[arg(long)]
    lambda_home: f64,

    /// Expected away goals
    #[arg(long)]
    lambda_away: f64,

    #[arg(long, env = "MAX_GOALS", default_value = "10", value_parser = parse_max_goals)]
    max_goals: MaxGoals,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let lambda_home = intensity("lambda-home", args.lambda_home)?;
    let lambda_away = intensity("lambda-away", args.lambda_away)?;

    let grid = ScoreGrid::new(lambda_home, lambda_away, args.max_goals);
    let m = grid.markets();
    let fair = FairOdds1x2::from_markets(&m);
    let (h, a) = grid.most_likely_score();

    println!("Home:      {:.4}  fair {}", m.p_home, fmt_odds(fair.home));
    println!("Draw:      {:.4}  fair {}", m.p_draw, fmt_odds(fair.draw));
    println!("Away:      {:.4}  fair {}", m.p_away, fmt_odds(fair.away));
    println!("Over 2.5:  {:.4}", m.p_over25);
    println!("Under 2.5: {:.4}", m.p_under25);
    println!("BTTS yes:  {:.4}", m.p_btts_yes);
    println!("BTTS no:   {:.4}", m.p_btts_no);
    println!("Mode:      {h}-{a}");
    println!("Tail mass: {:.2e}", grid.tail_mass());

    Ok(())
}

fn intensity(name: &str, value: f64) -> Result<f64> {
    if !(value.is_finite() && value >= 0.0) {
        anyhow::bail!("--{name} must be a finite non-negative number, got {value}");
    }
    Ok(value)
}

fn fmt_odds(odds: Option<f64>) -> String {
    odds.map(|o| format!("{o:.3}"))
        .unwrap_or_else(|| "n/a".to_string())
}
