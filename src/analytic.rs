use crate::model::{
    LambdaPair, MarketSummary, OutcomeDistribution, OutcomeTally, ScorelineFrequency,
    TOP_SCORELINES,
};
use crate::poisson::PoissonEngine;

/// Highest per-side goal count on the grid. Mass beyond it is dropped and the
/// outcome buckets renormalized, which understates tails for rates near the
/// 8.0 ceiling.
pub const MAX_GRID_GOALS: u32 = 10;
const MAX_CONFIDENCE: f64 = 99.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticReport {
    pub distribution: OutcomeDistribution,
    pub markets: MarketSummary,
    pub top_scorelines: Vec<ScorelineFrequency>,
    /// Raw probability captured by the grid before normalization.
    pub grid_mass: f64,
}

/// Exact outcome probabilities from the independent Poisson grid. No seed,
/// no sampling noise.
pub fn calculate(engine: &mut PoissonEngine, lambdas: &LambdaPair) -> AnalyticReport {
    let pmf_h = engine.densities(lambdas.home(), MAX_GRID_GOALS);
    let pmf_a = engine.densities(lambdas.away(), MAX_GRID_GOALS);

    let mut tally = OutcomeTally::default();
    for (i, p_i) in pmf_h.iter().enumerate() {
        for (j, p_j) in pmf_a.iter().enumerate() {
            tally.record(i as u32, j as u32, p_i * p_j);
        }
    }

    let grid_mass = tally.mass();
    let (home_win_pct, draw_pct, away_win_pct) = tally.outcome_pcts();

    AnalyticReport {
        distribution: OutcomeDistribution {
            home_win_pct,
            draw_pct,
            away_win_pct,
            expected_home_goals: lambdas.home(),
            expected_away_goals: lambdas.away(),
            confidence_pct: (grid_mass * 100.0).min(MAX_CONFIDENCE),
        },
        markets: tally.markets(),
        top_scorelines: tally.top_scorelines(TOP_SCORELINES),
        grid_mass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(home: f64, away: f64) -> AnalyticReport {
        let mut engine = PoissonEngine::default();
        calculate(&mut engine, &LambdaPair::new(home, away).unwrap())
    }

    #[test]
    fn reference_pair_matches_baseline() {
        let r = run(1.8, 1.2);
        let d = r.distribution;
        assert!((d.home_win_pct - 51.44).abs() < 0.05, "home {}", d.home_win_pct);
        assert!((d.draw_pct - 23.14).abs() < 0.05, "draw {}", d.draw_pct);
        assert!((d.away_win_pct - 25.42).abs() < 0.05, "away {}", d.away_win_pct);
        assert_eq!(d.expected_home_goals, 1.8);
        assert_eq!(d.expected_away_goals, 1.2);
        assert_eq!(d.confidence_pct, 99.0);
    }

    #[test]
    fn outcomes_normalize_to_one_hundred() {
        for (h, a) in [(0.1, 0.1), (1.8, 1.2), (3.3, 0.4), (8.0, 8.0), (8.0, 0.1)] {
            let d = run(h, a).distribution;
            assert!((d.outcome_total() - 100.0).abs() < 1e-9, "{h}/{a}");
            for pct in [d.home_win_pct, d.draw_pct, d.away_win_pct] {
                assert!((0.0..=100.0).contains(&pct));
            }
        }
    }

    #[test]
    fn truncated_grid_mass_is_reported() {
        assert!(run(1.8, 1.2).grid_mass > 0.99999);
        let heavy = run(8.0, 8.0);
        assert!(heavy.grid_mass < 0.7);
        assert!(heavy.distribution.confidence_pct < 70.0);
    }

    #[test]
    fn equal_rates_are_symmetric() {
        let d = run(1.0, 1.0).distribution;
        assert!((d.home_win_pct - d.away_win_pct).abs() < 1e-9);
        assert!((d.draw_pct - 30.85).abs() < 0.01);
    }

    #[test]
    fn markets_follow_the_grid() {
        let m = run(1.8, 1.2).markets;
        assert!((m.btts_pct - 58.33).abs() < 0.01);
        assert!((m.over_1_5_pct - 80.09).abs() < 0.01);
        assert!((m.over_2_5_pct - 57.68).abs() < 0.01);
        assert!((m.over_3_5_pct - 35.28).abs() < 0.01);
    }

    #[test]
    fn top_scorelines_are_sorted_and_capped() {
        let top = run(1.8, 1.2).top_scorelines;
        assert_eq!(top.len(), TOP_SCORELINES);
        assert_eq!((top[0].home_goals, top[0].away_goals), (1, 1));
        assert_eq!((top[1].home_goals, top[1].away_goals), (2, 1));
        assert_eq!((top[2].home_goals, top[2].away_goals), (1, 0));
        assert!(top.windows(2).all(|w| w[0].probability_pct >= w[1].probability_pct));
    }

    #[test]
    fn zero_rates_give_certain_draw() {
        let mut engine = PoissonEngine::default();
        let pair = LambdaPair::unclamped(0.0, 0.0).unwrap();
        let r = calculate(&mut engine, &pair);
        assert_eq!(r.distribution.draw_pct, 100.0);
        assert_eq!(r.distribution.home_win_pct, 0.0);
        assert_eq!(r.top_scorelines.len(), 1);
    }
}
