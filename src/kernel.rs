use crate::adjust;
use crate::analytic;
use crate::config::KernelConfig;
use crate::error::Result;
use crate::model::{
    GoalHistograms, LambdaPair, MarketSummary, OutcomeDistribution, RateParameters,
    ScorelineFrequency,
};
use crate::monte_carlo;
use crate::poisson::PoissonEngine;
use crate::rng::RandomSource;
use crate::xg::{self, XgInputs};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    /// Closed-form grid over 0..=10 goals each.
    Poisson,
    MonteCarlo { trials: u32, seed: u64 },
    /// Rates shifted toward recent xG, then the Poisson grid.
    Xg(XgInputs),
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::Poisson => "poisson",
            Method::MonteCarlo { .. } => "monte_carlo",
            Method::Xg(_) => "xg",
        }
    }
}

/// Common output of every method.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub method: Method,
    pub lambdas: LambdaPair,
    pub distribution: OutcomeDistribution,
    pub markets: MarketSummary,
    pub top_scorelines: Vec<ScorelineFrequency>,
    pub histograms: Option<GoalHistograms>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub predictions: Vec<Prediction>,
    /// Largest home/draw/away percentage gap between any two methods.
    pub max_gap_pct: f64,
}

/// One prediction context: a random source plus a Poisson engine whose cache
/// is reused across sequential calls. Build one per thread.
#[derive(Debug, Clone)]
pub struct Kernel {
    engine: PoissonEngine,
    rng: RandomSource,
    config: KernelConfig,
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new(KernelConfig::default())
    }
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            engine: PoissonEngine::new(config.density_precision, config.cache_capacity),
            rng: RandomSource::new(config.seed),
            config,
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn engine(&self) -> &PoissonEngine {
        &self.engine
    }

    /// Monte Carlo with the configured trial count and seed.
    pub fn default_monte_carlo(&self) -> Method {
        Method::MonteCarlo {
            trials: self.config.trials,
            seed: self.config.seed,
        }
    }

    pub fn clear_cache(&mut self) {
        self.engine.clear();
    }

    pub fn predict(&mut self, params: &RateParameters, method: Method) -> Result<Prediction> {
        let lambdas = adjust::adjust(params)?;
        self.predict_lambdas(lambdas, method)
    }

    /// Runs a method on rates that are already adjusted.
    pub fn predict_lambdas(&mut self, lambdas: LambdaPair, method: Method) -> Result<Prediction> {
        match method {
            Method::Poisson => {
                let r = analytic::calculate(&mut self.engine, &lambdas);
                Ok(Prediction {
                    method,
                    lambdas,
                    distribution: r.distribution,
                    markets: r.markets,
                    top_scorelines: r.top_scorelines,
                    histograms: None,
                })
            }
            Method::MonteCarlo { trials, seed } => {
                let r = monte_carlo::simulate(&self.engine, &mut self.rng, &lambdas, trials, seed)?;
                Ok(Prediction {
                    method,
                    lambdas,
                    distribution: r.distribution,
                    markets: r.markets,
                    top_scorelines: r.top_scorelines,
                    histograms: Some(r.histograms),
                })
            }
            Method::Xg(inputs) => {
                let shifted = xg::adjust_with_xg(&lambdas, &inputs)?;
                let r = analytic::calculate(&mut self.engine, &shifted);
                Ok(Prediction {
                    method,
                    lambdas: shifted,
                    distribution: r.distribution,
                    markets: r.markets,
                    top_scorelines: r.top_scorelines,
                    histograms: None,
                })
            }
        }
    }

    /// Every method on the same adjusted rates; xG only when inputs exist.
    pub fn compare(
        &mut self,
        params: &RateParameters,
        xg_inputs: Option<XgInputs>,
    ) -> Result<Comparison> {
        let lambdas = adjust::adjust(params)?;
        if let Some(inputs) = &xg_inputs {
            inputs.validate()?;
        }

        let mut methods = vec![Method::Poisson, self.default_monte_carlo()];
        if let Some(inputs) = xg_inputs {
            methods.push(Method::Xg(inputs));
        }

        let mut predictions = Vec::with_capacity(methods.len());
        for method in methods {
            predictions.push(self.predict_lambdas(lambdas, method)?);
        }

        let mut max_gap_pct: f64 = 0.0;
        for (i, a) in predictions.iter().enumerate() {
            for b in &predictions[i + 1..] {
                let (x, y) = (&a.distribution, &b.distribution);
                max_gap_pct = max_gap_pct
                    .max((x.home_win_pct - y.home_win_pct).abs())
                    .max((x.draw_pct - y.draw_pct).abs())
                    .max((x.away_win_pct - y.away_win_pct).abs());
            }
        }

        Ok(Comparison {
            predictions,
            max_gap_pct,
        })
    }
}
