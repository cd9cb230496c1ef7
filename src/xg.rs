use serde::{Deserialize, Serialize};

use crate::error::{Result, ensure_non_negative};
use crate::model::{LAMBDA_MAX, LAMBDA_MIN, LambdaPair};

const XG_SMOOTHING: f64 = 0.10;
const MULTIPLIER_BOUNDS: (f64, f64) = (0.60, 1.70);
const SHRINK_MATCHES: f64 = 6.0;
const MAX_ALPHA: f64 = 0.75;

/// Per-match expected-goals averages over a recent window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XgInputs {
    pub home_xg_for: f64,
    pub home_xg_against: f64,
    pub away_xg_for: f64,
    pub away_xg_against: f64,
    #[serde(default)]
    pub matches_sampled: u32,
}

impl XgInputs {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("home_xg_for", self.home_xg_for)?;
        ensure_non_negative("home_xg_against", self.home_xg_against)?;
        ensure_non_negative("away_xg_for", self.away_xg_for)?;
        ensure_non_negative("away_xg_against", self.away_xg_against)?;
        Ok(())
    }

    /// Weight given to the xG evidence; small samples barely move the rates.
    pub fn alpha(&self) -> f64 {
        let n = self.matches_sampled as f64;
        (n / (n + SHRINK_MATCHES)).clamp(0.0, MAX_ALPHA)
    }
}

/// Pulls each rate toward what the chance-quality numbers say it should be.
pub fn adjust_with_xg(lambdas: &LambdaPair, xg: &XgInputs) -> Result<LambdaPair> {
    xg.validate()?;
    let alpha = xg.alpha();

    let home_signal = (xg.home_xg_for + xg.away_xg_against) / 2.0;
    let away_signal = (xg.away_xg_for + xg.home_xg_against) / 2.0;

    let home = shift(lambdas.home(), home_signal, alpha);
    let away = shift(lambdas.away(), away_signal, alpha);
    log::debug!(
        "xg shift (alpha {alpha:.2}): home {:.3} -> {home:.3}, away {:.3} -> {away:.3}",
        lambdas.home(),
        lambdas.away()
    );
    LambdaPair::new(home, away)
}

fn shift(lambda: f64, signal: f64, alpha: f64) -> f64 {
    let mult = ((signal + XG_SMOOTHING) / (lambda + XG_SMOOTHING))
        .clamp(MULTIPLIER_BOUNDS.0, MULTIPLIER_BOUNDS.1);
    (lambda * mult.powf(alpha)).clamp(LAMBDA_MIN, LAMBDA_MAX)
}
