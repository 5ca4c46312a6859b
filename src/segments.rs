use std::collections::HashMap;

use crate::ratio::{SEGMENT_EPS, clamp, saturating_ratio};
use crate::tables::SegmentBin;

/// Bins starting at or before this minute count as "early".
pub const EARLY_WINDOW_END_MIN: i32 = 30;

pub const MIN_SEGMENT_RATIO: f64 = 0.8;
pub const MAX_SEGMENT_RATIO: f64 = 1.2;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Tally {
    early: f64,
    total: f64,
    rows: usize,
}

impl Tally {
    fn add(&mut self, bin_start_min: i32, rate: f64) {
        if bin_start_min <= EARLY_WINDOW_END_MIN {
            self.early += rate;
        }
        self.total += rate;
        self.rows += 1;
    }

    /// Both sums are floored, so a team with no early goals (or no goals at
    /// all) gets a small positive share instead of zero.
    fn early_share(&self) -> f64 {
        saturating_ratio(self.early.max(SEGMENT_EPS), self.total, SEGMENT_EPS)
    }
}

#[derive(Debug, Clone, Default)]
struct SideTally {
    league: Tally,
    teams: HashMap<String, Tally>,
}

#[derive(Debug, Clone, Default)]
struct LeagueSegments {
    scored: SideTally,
    conceded: SideTally,
}

impl LeagueSegments {
    fn side(&self, for_scored: bool) -> &SideTally {
        if for_scored {
            &self.scored
        } else {
            &self.conceded
        }
    }

    fn side_mut(&mut self, for_scored: bool) -> &mut SideTally {
        if for_scored {
            &mut self.scored
        } else {
            &mut self.conceded
        }
    }
}

/// Early-window scoring/conceding tallies per league and team, built once
/// from the segment bins.
#[derive(Debug, Clone, Default)]
pub struct SegmentIndex {
    leagues: HashMap<String, LeagueSegments>,
}

impl SegmentIndex {
    pub fn from_bins(bins: &[SegmentBin]) -> Self {
        let mut leagues: HashMap<String, LeagueSegments> = HashMap::new();
        for bin in bins {
            let league = leagues.entry(bin.league.clone()).or_default();
            for for_scored in [true, false] {
                let Some(rate) = bin.rate(for_scored) else {
                    continue;
                };
                let side = league.side_mut(for_scored);
                side.league.add(bin.bin_start_min, rate);
                side.teams
                    .entry(bin.team.clone())
                    .or_default()
                    .add(bin.bin_start_min, rate);
            }
        }
        Self { leagues }
    }

    pub fn league_count(&self) -> usize {
        self.leagues.len()
    }

    /// Damped correction for a team that scores (`for_scored`) or concedes
    /// a larger or smaller share of its goals early than its league does.
    ///
    /// The raw share ratio is clamped to [0.8, 1.2] and square-rooted, so the
    /// result always lies in [sqrt(0.8), sqrt(1.2)]. Exactly 1.0 when the
    /// league or the team has no bins for the chosen metric.
    pub fn multiplier(&self, league: &str, team: &str, for_scored: bool) -> f64 {
        let Some(segments) = self.leagues.get(league) else {
            return 1.0;
        };
        let side = segments.side(for_scored);
        if side.league.rows == 0 {
            return 1.0;
        }
        let Some(team_tally) = side.teams.get(team).filter(|t| t.rows > 0) else {
            return 1.0;
        };

        // Shares are strictly positive, so no second floor here.
        let ratio = team_tally.early_share() / side.league.early_share();
        if !ratio.is_finite() {
            return 1.0;
        }
        clamp(ratio, MIN_SEGMENT_RATIO, MAX_SEGMENT_RATIO).sqrt()
    }
}
