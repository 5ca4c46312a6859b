use crate::scoreline::MarketProbs;

/// Zero-margin decimal price for a probability. `None` means undefined:
/// the outcome has no mass, so there is no finite price to quote.
pub fn fair_odds(p: f64) -> Option<f64> {
    if p > 0.0 && p.is_finite() {
        Some(1.0 / p)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FairOdds1x2 {
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
}

impl FairOdds1x2 {
    pub fn from_markets(m: &MarketProbs) -> Self {
        Self {
            home: fair_odds(m.p_home),
            draw: fair_odds(m.p_draw),
            away: fair_odds(m.p_away),
        }
    }
}
