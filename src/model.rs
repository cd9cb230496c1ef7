use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result, ensure_finite, ensure_non_negative};

pub const LAMBDA_MIN: f64 = 0.1;
pub const LAMBDA_MAX: f64 = 8.0;
pub const TOP_SCORELINES: usize = 8;
/// Totals checked by the over/under markets: 1.5, 2.5 and 3.5 goals.
pub const GOAL_LINES: [u32; 3] = [1, 2, 3];

const TYPICAL_RATE_MAX: f64 = 6.0;
const TYPICAL_FACTOR: (f64, f64) = (0.5, 1.5);
const TYPICAL_MOMENTUM: f64 = 0.5;

fn neutral_factor() -> f64 {
    1.0
}

/// Team-strength inputs. Rates are goals per match, the rest are
/// multipliers around 1.0 except `recent_form`, a signed momentum delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateParameters {
    pub home_attack: f64,
    pub away_attack: f64,
    pub home_concession: f64,
    pub away_concession: f64,
    #[serde(default = "neutral_factor")]
    pub home_advantage: f64,
    #[serde(default = "neutral_factor")]
    pub form: f64,
    #[serde(default = "neutral_factor")]
    pub weather: f64,
    #[serde(default = "neutral_factor")]
    pub motivation: f64,
    #[serde(default = "neutral_factor")]
    pub head_to_head: f64,
    #[serde(default)]
    pub recent_form: f64,
}

impl RateParameters {
    /// Neutral factors around the given rates.
    pub fn from_rates(
        home_attack: f64,
        away_attack: f64,
        home_concession: f64,
        away_concession: f64,
    ) -> Self {
        Self {
            home_attack,
            away_attack,
            home_concession,
            away_concession,
            home_advantage: 1.0,
            form: 1.0,
            weather: 1.0,
            motivation: 1.0,
            head_to_head: 1.0,
            recent_form: 0.0,
        }
    }

    fn factors(&self) -> [(&'static str, f64); 9] {
        [
            ("home_attack", self.home_attack),
            ("away_attack", self.away_attack),
            ("home_concession", self.home_concession),
            ("away_concession", self.away_concession),
            ("home_advantage", self.home_advantage),
            ("form", self.form),
            ("weather", self.weather),
            ("motivation", self.motivation),
            ("head_to_head", self.head_to_head),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.factors() {
            ensure_non_negative(field, value)?;
        }
        ensure_finite("recent_form", self.recent_form)?;
        Ok(())
    }

    /// Values the kernel accepts but a caller should sanity-check.
    pub fn range_warnings(&self) -> Vec<RangeWarning> {
        let mut out = Vec::new();
        for (idx, (field, value)) in self.factors().into_iter().enumerate() {
            let unusual = if idx < 4 {
                value > TYPICAL_RATE_MAX
            } else {
                value < TYPICAL_FACTOR.0 || value > TYPICAL_FACTOR.1
            };
            if unusual {
                out.push(RangeWarning { field, value });
            }
        }
        if self.recent_form.abs() > TYPICAL_MOMENTUM {
            out.push(RangeWarning {
                field: "recent_form",
                value: self.recent_form,
            });
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeWarning {
    pub field: &'static str,
    pub value: f64,
}

/// Poisson rates handed from the adjustment stage to a probability method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LambdaPair {
    home: f64,
    away: f64,
}

impl LambdaPair {
    /// Clamps both rates into `[0.1, 8.0]`.
    pub fn new(home: f64, away: f64) -> Result<Self> {
        let home = ensure_non_negative("home_lambda", home)?;
        let away = ensure_non_negative("away_lambda", away)?;
        Ok(Self {
            home: home.clamp(LAMBDA_MIN, LAMBDA_MAX),
            away: away.clamp(LAMBDA_MIN, LAMBDA_MAX),
        })
    }

    /// Skips the lower clamp so zero rates give the degenerate all-draw
    /// distribution. Rates above 8.0 are rejected.
    pub fn unclamped(home: f64, away: f64) -> Result<Self> {
        Ok(Self {
            home: ensure_rate("home_lambda", home)?,
            away: ensure_rate("away_lambda", away)?,
        })
    }

    pub fn home(&self) -> f64 {
        self.home
    }

    pub fn away(&self) -> f64 {
        self.away
    }
}

fn ensure_rate(field: &'static str, value: f64) -> Result<f64> {
    ensure_non_negative(field, value)?;
    if value > LAMBDA_MAX {
        return Err(KernelError::invalid(
            field,
            format!("{value} is above {LAMBDA_MAX}"),
        ));
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeDistribution {
    pub home_win_pct: f64,
    pub draw_pct: f64,
    pub away_win_pct: f64,
    pub expected_home_goals: f64,
    pub expected_away_goals: f64,
    pub confidence_pct: f64,
}

impl OutcomeDistribution {
    pub fn outcome_total(&self) -> f64 {
        self.home_win_pct + self.draw_pct + self.away_win_pct
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorelineFrequency {
    pub home_goals: u32,
    pub away_goals: u32,
    pub probability_pct: f64,
}

/// Derived markets. Unders are `100 - over`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSummary {
    pub btts_pct: f64,
    pub over_1_5_pct: f64,
    pub over_2_5_pct: f64,
    pub over_3_5_pct: f64,
}

impl MarketSummary {
    pub fn under_2_5_pct(&self) -> f64 {
        100.0 - self.over_2_5_pct
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalHistograms {
    pub home: Vec<u32>,
    pub away: Vec<u32>,
}

impl GoalHistograms {
    pub(crate) fn record(&mut self, home_goals: u32, away_goals: u32) {
        bump(&mut self.home, home_goals as usize);
        bump(&mut self.away, away_goals as usize);
    }
}

fn bump(bins: &mut Vec<u32>, idx: usize) {
    if bins.len() <= idx {
        bins.resize(idx + 1, 0);
    }
    bins[idx] += 1;
}

/// Weighted scoreline accumulator shared by the sampled and the analytic
/// methods. Sampled trials carry weight 1, grid cells their probability.
#[derive(Debug, Clone, Default)]
pub(crate) struct OutcomeTally {
    home: f64,
    draw: f64,
    away: f64,
    home_goals: f64,
    away_goals: f64,
    btts: f64,
    over: [f64; 3],
    scorelines: BTreeMap<(u32, u32), f64>,
}

impl OutcomeTally {
    pub(crate) fn record(&mut self, home_goals: u32, away_goals: u32, weight: f64) {
        if home_goals > away_goals {
            self.home += weight;
        } else if home_goals < away_goals {
            self.away += weight;
        } else {
            self.draw += weight;
        }
        self.home_goals += weight * home_goals as f64;
        self.away_goals += weight * away_goals as f64;
        if home_goals > 0 && away_goals > 0 {
            self.btts += weight;
        }
        let total = home_goals + away_goals;
        for (slot, line) in self.over.iter_mut().zip(GOAL_LINES) {
            if total > line {
                *slot += weight;
            }
        }
        *self.scorelines.entry((home_goals, away_goals)).or_insert(0.0) += weight;
    }

    pub(crate) fn mass(&self) -> f64 {
        self.home + self.draw + self.away
    }

    /// `(home, draw, away)` as percentages of the recorded mass.
    pub(crate) fn outcome_pcts(&self) -> (f64, f64, f64) {
        let mass = self.mass();
        if mass <= 0.0 {
            return (100.0 / 3.0, 100.0 / 3.0, 100.0 / 3.0);
        }
        (
            self.home / mass * 100.0,
            self.draw / mass * 100.0,
            self.away / mass * 100.0,
        )
    }

    pub(crate) fn mean_goals(&self) -> (f64, f64) {
        let mass = self.mass();
        if mass <= 0.0 {
            return (0.0, 0.0);
        }
        (self.home_goals / mass, self.away_goals / mass)
    }

    pub(crate) fn markets(&self) -> MarketSummary {
        let pct = |v: f64| {
            let mass = self.mass();
            if mass > 0.0 { v / mass * 100.0 } else { 0.0 }
        };
        MarketSummary {
            btts_pct: pct(self.btts),
            over_1_5_pct: pct(self.over[0]),
            over_2_5_pct: pct(self.over[1]),
            over_3_5_pct: pct(self.over[2]),
        }
    }

    /// Most likely scores, descending; ties fall back to score order.
    pub(crate) fn top_scorelines(&self, limit: usize) -> Vec<ScorelineFrequency> {
        let mass = self.mass();
        if mass <= 0.0 {
            return Vec::new();
        }
        let mut rows: Vec<ScorelineFrequency> = self
            .scorelines
            .iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(&(home_goals, away_goals), w)| ScorelineFrequency {
                home_goals,
                away_goals,
                probability_pct: w / mass * 100.0,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.probability_pct
                .total_cmp(&a.probability_pct)
                .then(a.home_goals.cmp(&b.home_goals))
                .then(a.away_goals.cmp(&b.away_goals))
        });
        rows.truncate(limit);
        rows
    }
}
