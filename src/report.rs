use serde::Serialize;

use crate::kernel::{Comparison, Method, Prediction};
use crate::model::RangeWarning;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub method: &'static str,
    pub home_lambda: f64,
    pub away_lambda: f64,
    pub home_win_pct: f64,
    pub draw_pct: f64,
    pub away_win_pct: f64,
    pub expected_home_goals: f64,
    pub expected_away_goals: f64,
    pub confidence_pct: f64,
    pub markets: MarketsReport,
    pub top_scorelines: Vec<ScorelineReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trials: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RangeWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketsReport {
    pub btts_pct: f64,
    pub over_1_5_pct: f64,
    pub over_2_5_pct: f64,
    pub under_2_5_pct: f64,
    pub over_3_5_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorelineReport {
    pub score: String,
    pub probability_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub predictions: Vec<PredictionReport>,
    pub max_gap_pct: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RangeWarning>,
}

// The only rounding step; everything upstream keeps full precision.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl Prediction {
    pub fn to_report(&self) -> PredictionReport {
        let d = &self.distribution;
        let m = &self.markets;
        let (trials, seed) = match self.method {
            Method::MonteCarlo { trials, seed } => (Some(trials), Some(seed)),
            _ => (None, None),
        };
        PredictionReport {
            method: self.method.name(),
            home_lambda: round1(self.lambdas.home()),
            away_lambda: round1(self.lambdas.away()),
            home_win_pct: round1(d.home_win_pct),
            draw_pct: round1(d.draw_pct),
            away_win_pct: round1(d.away_win_pct),
            expected_home_goals: round1(d.expected_home_goals),
            expected_away_goals: round1(d.expected_away_goals),
            confidence_pct: round1(d.confidence_pct),
            markets: MarketsReport {
                btts_pct: round1(m.btts_pct),
                over_1_5_pct: round1(m.over_1_5_pct),
                over_2_5_pct: round1(m.over_2_5_pct),
                under_2_5_pct: round1(m.under_2_5_pct()),
                over_3_5_pct: round1(m.over_3_5_pct),
            },
            top_scorelines: self
                .top_scorelines
                .iter()
                .map(|s| ScorelineReport {
                    score: format!("{}-{}", s.home_goals, s.away_goals),
                    probability_pct: round1(s.probability_pct),
                })
                .collect(),
            trials,
            seed,
            warnings: Vec::new(),
        }
    }
}

impl PredictionReport {
    pub fn with_warnings(mut self, warnings: Vec<RangeWarning>) -> Self {
        self.warnings = warnings;
        self
    }
}

impl Comparison {
    pub fn to_report(&self) -> ComparisonReport {
        ComparisonReport {
            predictions: self.predictions.iter().map(Prediction::to_report).collect(),
            max_gap_pct: round1(self.max_gap_pct),
            warnings: Vec::new(),
        }
    }
}

impl ComparisonReport {
    pub fn with_warnings(mut self, warnings: Vec<RangeWarning>) -> Self {
        self.warnings = warnings;
        self
    }
}
