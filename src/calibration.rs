use crate::model::OutcomeDistribution;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

/// Outcome probabilities as fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prob3 {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub samples: usize,
    pub brier: f64,
    pub log_loss: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationBin {
    pub bucket_start: f64,
    pub bucket_end: f64,
    pub count: usize,
    pub avg_pred: f64,
    pub actual_rate: f64,
}

impl Prob3 {
    pub fn uniform() -> Self {
        Self {
            home: 1.0 / 3.0,
            draw: 1.0 / 3.0,
            away: 1.0 / 3.0,
        }
    }

    fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }
}

impl From<&OutcomeDistribution> for Prob3 {
    fn from(d: &OutcomeDistribution) -> Self {
        let total = d.outcome_total();
        if total <= 0.0 {
            return Prob3::uniform();
        }
        Prob3 {
            home: d.home_win_pct / total,
            draw: d.draw_pct / total,
            away: d.away_win_pct / total,
        }
    }
}

impl Metrics {
    fn empty() -> Self {
        Self {
            samples: 0,
            brier: 0.0,
            log_loss: 0.0,
            accuracy: 0.0,
        }
    }
}

pub fn classify_outcome(home_goals: u32, away_goals: u32) -> Outcome {
    if home_goals > away_goals {
        Outcome::Home
    } else if home_goals < away_goals {
        Outcome::Away
    } else {
        Outcome::Draw
    }
}

pub fn evaluate_probs(predictions: &[Prob3], outcomes: &[Outcome]) -> Metrics {
    if predictions.is_empty() || predictions.len() != outcomes.len() {
        return Metrics::empty();
    }

    let mut brier_sum = 0.0_f64;
    let mut log_loss_sum = 0.0_f64;
    let mut correct = 0usize;

    for (p, outcome) in predictions.iter().zip(outcomes) {
        for class in [Outcome::Home, Outcome::Draw, Outcome::Away] {
            let y = if class == *outcome { 1.0 } else { 0.0 };
            brier_sum += (p.get(class) - y).powi(2);
        }
        log_loss_sum += -p.get(*outcome).clamp(1e-12, 1.0).ln();
        if argmax(p) == *outcome {
            correct += 1;
        }
    }

    let n = predictions.len() as f64;
    Metrics {
        samples: predictions.len(),
        brier: brier_sum / n,
        log_loss: log_loss_sum / n,
        accuracy: correct as f64 / n,
    }
}

pub fn calibration_bins(
    predictions: &[Prob3],
    outcomes: &[Outcome],
    class: Outcome,
    bins: usize,
) -> Vec<CalibrationBin> {
    let bins = bins.max(2);
    let mut counts = vec![0usize; bins];
    let mut pred_sum = vec![0.0_f64; bins];
    let mut hit_sum = vec![0.0_f64; bins];

    for (p, outcome) in predictions.iter().zip(outcomes) {
        let prob = p.get(class).clamp(0.0, 1.0);
        let idx = ((prob * bins as f64).floor() as usize).min(bins - 1);
        counts[idx] += 1;
        pred_sum[idx] += prob;
        if *outcome == class {
            hit_sum[idx] += 1.0;
        }
    }

    (0..bins)
        .map(|i| {
            let count = counts[i];
            let (avg_pred, actual_rate) = if count > 0 {
                (pred_sum[i] / count as f64, hit_sum[i] / count as f64)
            } else {
                (0.0, 0.0)
            };
            CalibrationBin {
                bucket_start: i as f64 / bins as f64,
                bucket_end: (i + 1) as f64 / bins as f64,
                count,
                avg_pred,
                actual_rate,
            }
        })
        .collect()
}

/// Count-weighted gap between predicted and observed rates, averaged over
/// the three outcome classes.
pub fn expected_calibration_error(predictions: &[Prob3], outcomes: &[Outcome], bins: usize) -> f64 {
    if predictions.is_empty() || predictions.len() != outcomes.len() {
        return 0.0;
    }
    let n = predictions.len() as f64;
    let mut sum = 0.0;
    for class in [Outcome::Home, Outcome::Draw, Outcome::Away] {
        for b in calibration_bins(predictions, outcomes, class, bins) {
            if b.count > 0 {
                sum += (b.count as f64 / n) * (b.avg_pred - b.actual_rate).abs();
            }
        }
    }
    sum / 3.0
}

fn argmax(p: &Prob3) -> Outcome {
    if p.home >= p.draw && p.home >= p.away {
        Outcome::Home
    } else if p.draw >= p.away {
        Outcome::Draw
    } else {
        Outcome::Away
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sure(outcome: Outcome) -> Prob3 {
        let mut p = Prob3 {
            home: 0.0,
            draw: 0.0,
            away: 0.0,
        };
        match outcome {
            Outcome::Home => p.home = 1.0,
            Outcome::Draw => p.draw = 1.0,
            Outcome::Away => p.away = 1.0,
        }
        p
    }

    #[test]
    fn perfect_predictions_have_zero_brier() {
        let outcomes = vec![Outcome::Home, Outcome::Draw, Outcome::Away];
        let preds: Vec<Prob3> = outcomes.iter().copied().map(sure).collect();
        let m = evaluate_probs(&preds, &outcomes);
        assert_eq!(m.samples, 3);
        assert!(m.brier < 1e-12);
        assert!(m.log_loss < 1e-9);
        assert_eq!(m.accuracy, 1.0);
    }

    #[test]
    fn uniform_prediction_scores() {
        let m = evaluate_probs(&[Prob3::uniform()], &[Outcome::Draw]);
        assert!((m.brier - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.log_loss - 3f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn mismatched_inputs_give_empty_metrics() {
        let m = evaluate_probs(&[Prob3::uniform()], &[]);
        assert_eq!(m.samples, 0);
        assert_eq!(expected_calibration_error(&[], &[], 10), 0.0);
    }

    #[test]
    fn distribution_converts_to_fractions() {
        let d = OutcomeDistribution {
            home_win_pct: 50.0,
            draw_pct: 25.0,
            away_win_pct: 25.0,
            expected_home_goals: 1.6,
            expected_away_goals: 1.0,
            confidence_pct: 90.0,
        };
        let p = Prob3::from(&d);
        assert_eq!((p.home, p.draw, p.away), (0.5, 0.25, 0.25));
    }

    #[test]
    fn bins_cover_the_unit_interval() {
        let preds = vec![
            Prob3 {
                home: 0.05,
                draw: 0.5,
                away: 0.45,
            },
            Prob3 {
                home: 1.0,
                draw: 0.0,
                away: 0.0,
            },
        ];
        let outcomes = vec![Outcome::Away, Outcome::Home];
        let bins = calibration_bins(&preds, &outcomes, Outcome::Home, 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[9].count, 1);
        assert_eq!(bins[9].actual_rate, 1.0);
        assert_eq!(classify_outcome(2, 2), Outcome::Draw);
    }
}
