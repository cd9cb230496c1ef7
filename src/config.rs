use std::env;
use std::str::FromStr;

use crate::poisson::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_DENSITY_PRECISION, MAX_DENSITY_PRECISION, MIN_DENSITY_PRECISION,
};

pub const DEFAULT_TRIALS: u32 = 10_000;
pub const DEFAULT_SEED: u64 = 42;
const DEFAULT_SWEEP_PARALLELISM: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// Monte Carlo run size when the caller does not pick one.
    pub trials: u32,
    pub seed: u64,
    /// Decimals of λ kept in the density cache key.
    pub density_precision: u32,
    pub cache_capacity: usize,
    pub sweep_parallelism: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
            density_precision: DEFAULT_DENSITY_PRECISION,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            sweep_parallelism: DEFAULT_SWEEP_PARALLELISM,
        }
    }
}

impl KernelConfig {
    /// Defaults overridden by `MATCHCAST_*` environment variables. Unparseable
    /// values fall back to the default; parsed ones are clamped.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            trials: env_or("MATCHCAST_TRIALS", d.trials).clamp(1, 5_000_000),
            seed: env_or("MATCHCAST_SEED", d.seed),
            density_precision: env_or("MATCHCAST_DENSITY_PRECISION", d.density_precision)
                .clamp(MIN_DENSITY_PRECISION, MAX_DENSITY_PRECISION),
            cache_capacity: env_or("MATCHCAST_CACHE_CAPACITY", d.cache_capacity)
                .clamp(64, 10_000_000),
            sweep_parallelism: env_or("MATCHCAST_SWEEP_PARALLELISM", d.sweep_parallelism)
                .clamp(1, 64),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let c = KernelConfig::default();
        assert_eq!(c.trials, 10_000);
        assert_eq!(c.density_precision, 6);
        assert!(c.cache_capacity > 1_000);
    }

    #[test]
    fn env_or_falls_back_on_garbage() {
        assert_eq!(env_or("MATCHCAST_TEST_UNSET_KEY", 7u32), 7);
    }
}
