use crate::error::{KernelError, Result};
use crate::model::{
    GoalHistograms, LambdaPair, MarketSummary, OutcomeDistribution, OutcomeTally,
    ScorelineFrequency, TOP_SCORELINES,
};
use crate::poisson::PoissonEngine;
use crate::rng::RandomSource;

const MAX_CONFIDENCE: f64 = 99.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub distribution: OutcomeDistribution,
    pub markets: MarketSummary,
    pub top_scorelines: Vec<ScorelineFrequency>,
    pub histograms: GoalHistograms,
    pub trials: u32,
    pub seed: u64,
}

/// Plays `trials` independent matches. The source is reseeded first, so the
/// same `(lambdas, trials, seed)` always reproduces the same report.
pub fn simulate(
    engine: &PoissonEngine,
    rng: &mut RandomSource,
    lambdas: &LambdaPair,
    trials: u32,
    seed: u64,
) -> Result<SimulationReport> {
    if trials < 1 {
        return Err(KernelError::invalid(
            "trial_count",
            "at least one trial is required",
        ));
    }

    rng.reseed(seed);
    let mut tally = OutcomeTally::default();
    let mut histograms = GoalHistograms::default();
    for _ in 0..trials {
        let home_goals = engine.sample(rng, lambdas.home());
        let away_goals = engine.sample(rng, lambdas.away());
        tally.record(home_goals, away_goals, 1.0);
        histograms.record(home_goals, away_goals);
    }

    let (home_win_pct, draw_pct, away_win_pct) = tally.outcome_pcts();
    let (expected_home_goals, expected_away_goals) = tally.mean_goals();
    let confidence_pct = compute_confidence(home_win_pct / 100.0, trials);

    log::debug!(
        "simulated {trials} trials (seed {seed}): {home_win_pct:.1}/{draw_pct:.1}/{away_win_pct:.1}"
    );

    Ok(SimulationReport {
        distribution: OutcomeDistribution {
            home_win_pct,
            draw_pct,
            away_win_pct,
            expected_home_goals,
            expected_away_goals,
            confidence_pct,
        },
        markets: tally.markets(),
        top_scorelines: tally.top_scorelines(TOP_SCORELINES),
        histograms,
        trials,
        seed,
    })
}

/// Tight binomial error on the home-win rate plus a log bonus for run size.
fn compute_confidence(p_home: f64, trials: u32) -> f64 {
    let n = trials as f64;
    let se = (p_home * (1.0 - p_home) / n).sqrt();
    let precision = (1.0 - 2.0 * se).clamp(0.0, 1.0) * 100.0;
    let bonus = 2.0 * n.log10();
    (0.9 * precision + bonus).clamp(0.0, MAX_CONFIDENCE)
}
