//! Joint scoreline distribution for two independent Poisson goal counts,
//! and the market probabilities aggregated from it.
//!
//! The grid stops at `max_goals` per side. Mass beyond it is dropped, not
//! folded back in, so `total_mass()` is slightly below 1; `tail_mass()`
//! reports the gap. Home and away goals are treated as independent (no
//! Dixon-Coles style low-score correction).

use crate::config::MaxGoals;

/// Poisson PMF values for k = 0..=max_k. A non-positive (or non-finite)
/// rate puts all mass on k = 0.
pub fn poisson_pmf(lambda: f64, max_k: u32) -> Vec<f64> {
    let max_k = max_k as usize;
    let mut out = vec![0.0; max_k + 1];
    if !(lambda.is_finite() && lambda > 0.0) {
        out[0] = 1.0;
        return out;
    }

    out[0] = (-lambda).exp();
    for k in 1..=max_k {
        out[k] = out[k - 1] * lambda / k as f64;
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketProbs {
    pub p_home: f64,
    pub p_draw: f64,
    pub p_away: f64,
    pub p_over25: f64,
    pub p_under25: f64,
    pub p_btts_yes: f64,
    pub p_btts_no: f64,
}

#[derive(Debug, Clone)]
pub struct ScoreGrid {
    size: usize,
    cells: Vec<f64>,
}

impl ScoreGrid {
    pub fn new(lambda_home: f64, lambda_away: f64, max_goals: MaxGoals) -> Self {
        let pmf_h = poisson_pmf(lambda_home, max_goals.get());
        let pmf_a = poisson_pmf(lambda_away, max_goals.get());
        let size = pmf_h.len();

        let mut cells = Vec::with_capacity(size * size);
        for p_i in &pmf_h {
            for p_j in &pmf_a {
                cells.push(p_i * p_j);
            }
        }
        Self { size, cells }
    }

    pub fn max_goals(&self) -> u32 {
        (self.size - 1) as u32
    }

    /// P(home scores `home`, away scores `away`); zero outside the grid.
    pub fn prob(&self, home: u32, away: u32) -> f64 {
        let (i, j) = (home as usize, away as usize);
        if i >= self.size || j >= self.size {
            return 0.0;
        }
        self.cells[i * self.size + j]
    }

    pub fn total_mass(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Probability the grid leaves out.
    pub fn tail_mass(&self) -> f64 {
        (1.0 - self.total_mass()).max(0.0)
    }

    pub fn most_likely_score(&self) -> (u32, u32) {
        let mut best = (0usize, 0.0_f64);
        for (idx, p) in self.cells.iter().enumerate() {
            if *p > best.1 {
                best = (idx, *p);
            }
        }
        ((best.0 / self.size) as u32, (best.0 % self.size) as u32)
    }

    pub fn markets(&self) -> MarketProbs {
        let n = self.size;
        let mut p_home = 0.0;
        let mut p_draw = 0.0;
        let mut p_away = 0.0;
        let mut p_over25 = 0.0;
        let mut p_btts_yes = 0.0;

        for i in 0..n {
            p_draw += self.cells[i * n + i];
            // Mirror (i, j) and (j, i) in the same step so equal rates give
            // bit-identical home and away sums.
            for j in 0..i {
                p_home += self.cells[i * n + j];
                p_away += self.cells[j * n + i];
            }
        }

        for i in 0..n {
            for j in 0..n {
                let p = self.cells[i * n + j];
                if i + j > 2 {
                    p_over25 += p;
                }
                if i > 0 && j > 0 {
                    p_btts_yes += p;
                }
            }
        }

        MarketProbs {
            p_home,
            p_draw,
            p_away,
            p_over25,
            p_under25: 1.0 - p_over25,
            p_btts_yes,
            p_btts_no: 1.0 - p_btts_yes,
        }
    }
}

pub fn market_probs(lambda_home: f64, lambda_away: f64, max_goals: MaxGoals) -> MarketProbs {
    ScoreGrid::new(lambda_home, lambda_away, max_goals).markets()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn factorial(k: u32) -> f64 {
        (1..=k).fold(1.0_f64, |acc, x| acc * x as f64)
    }

    #[test]
    fn pmf_matches_closed_form() {
        let lambda = 1.7;
        let pmf = poisson_pmf(lambda, 10);
        for (k, p) in pmf.iter().enumerate() {
            let k = k as u32;
            let expected = (-lambda).exp() * lambda.powi(k as i32) / factorial(k);
            assert_relative_eq!(*p, expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn zero_rate_is_point_mass_at_zero() {
        let pmf = poisson_pmf(0.0, 5);
        assert_eq!(pmf, vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_zero_grid_is_a_certain_draw() {
        let m = market_probs(0.0, 0.0, MaxGoals::default());
        assert_eq!(m.p_draw, 1.0);
        assert_eq!(m.p_home, 0.0);
        assert_eq!(m.p_away, 0.0);
        assert_eq!(m.p_over25, 0.0);
        assert_eq!(m.p_btts_yes, 0.0);
    }

    #[test]
    fn equal_rates_are_exactly_symmetric() {
        let m = market_probs(1.2, 1.2, MaxGoals::default());
        assert_eq!(m.p_home, m.p_away);
    }

    #[test]
    fn grid_lookup_and_mode() {
        let grid = ScoreGrid::new(1.5, 1.2, MaxGoals::default());
        assert_eq!(grid.max_goals(), 10);
        assert_relative_eq!(
            grid.prob(1, 1),
            (1.5 * (-1.5_f64).exp()) * (1.2 * (-1.2_f64).exp()),
            max_relative = 1e-12
        );
        assert_eq!(grid.prob(11, 0), 0.0);
        assert_eq!(grid.most_likely_score(), (1, 1));
    }

    #[test]
    fn tail_mass_accounts_for_truncation() {
        let grid = ScoreGrid::new(1.5, 1.2, MaxGoals::default());
        assert!(grid.tail_mass() > 0.0);
        assert!(grid.tail_mass() < 1e-6);
        assert_relative_eq!(grid.total_mass() + grid.tail_mass(), 1.0, epsilon = 1e-15);
    }
}
