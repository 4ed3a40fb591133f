//! Ranks an observed number of wins against what chance alone would give.
//!
//! Wins over `n` rounds are modelled as `Binomial(n, p)`, where `p` is the
//! gambler's long-run win rate from a large reference simulation. The luck
//! percentile is the share of equally skilled players who would have won at
//! most as many rounds.

use serde::Serialize;
use statrs::distribution::{Binomial, Discrete, DiscreteCDF};

use super::SimulationReport;
use crate::{BlackjackError, Result};

/// The probability of every win count `0..=n`.
pub fn binomial_pmf(n: u64, p: f64) -> Result<Vec<f64>> {
    let distribution = binomial(n, p)?;
    Ok((0..=n).map(|wins| distribution.pmf(wins)).collect())
}

/// `P(X <= observed_wins)` for `X ~ Binomial(n, p)`, clamped to `[0, 1]`.
/// Win counts beyond `n` are certain to be beaten and give 1.
pub fn luck_percentile(n: u64, p: f64, observed_wins: u64) -> Result<f64> {
    let distribution = binomial(n, p)?;
    Ok(distribution.cdf(observed_wins.min(n)).clamp(0.0, 1.0))
}

fn binomial(n: u64, p: f64) -> Result<Binomial> {
    if n == 0 {
        return Err(BlackjackError::InvalidRoundCount(n));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(BlackjackError::InvalidProbability(p));
    }
    Binomial::new(p, n).map_err(|_| BlackjackError::InvalidProbability(p))
}

/// Everything the presentation layer needs to draw the luck distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuckAssessment {
    pub rounds: u64,
    pub win_probability: f64,
    pub observed_wins: u64,
    pub percentile: f64,
    pub pmf: Vec<f64>,
}

impl LuckAssessment {
    pub fn new(rounds: u64, win_probability: f64, observed_wins: u64) -> Result<Self> {
        let pmf = binomial_pmf(rounds, win_probability)?;
        let percentile = luck_percentile(rounds, win_probability, observed_wins)?;
        Ok(LuckAssessment {
            rounds,
            win_probability,
            observed_wins,
            percentile,
            pmf,
        })
    }

    /// Assesses the gambler's wins in `report` against `win_probability`.
    pub fn from_report(report: &SimulationReport, win_probability: f64) -> Result<Self> {
        Self::new(report.rounds(), win_probability, report.gambler_wins())
    }

    pub fn players_beaten_percent(&self) -> f64 {
        self.percentile * 100.0
    }
}
