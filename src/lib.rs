pub mod adjust;
pub mod analytic;
pub mod calibration;
pub mod config;
pub mod error;
pub mod kernel;
pub mod model;
pub mod monte_carlo;
pub mod poisson;
pub mod report;
pub mod rng;
pub mod xg;

pub use config::KernelConfig;
pub use error::KernelError;
pub use kernel::{Comparison, Kernel, Method, Prediction};
pub use model::{
    GoalHistograms, LambdaPair, MarketSummary, OutcomeDistribution, RateParameters,
    ScorelineFrequency,
};
pub use xg::XgInputs;
