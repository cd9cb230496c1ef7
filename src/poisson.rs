use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use crate::rng::RandomSource;

/// Above this rate the multiplicative sampler needs too many draws.
pub const EXACT_SAMPLER_MAX_LAMBDA: f64 = 30.0;
/// Beyond this, `λ^k` and `k!` leave f64 range; switch to log space.
pub const DIRECT_DENSITY_LIMIT: u32 = 50;

pub const DEFAULT_DENSITY_PRECISION: u32 = 6;
/// Coarser keys let the cached `k >= 1` terms drift from the exact `k = 0`
/// term enough to break normalization.
pub const MIN_DENSITY_PRECISION: u32 = 4;
pub const MAX_DENSITY_PRECISION: u32 = 12;
pub const DEFAULT_CACHE_CAPACITY: usize = 50_000;

/// Lookup tables owned by exactly one engine.
#[derive(Debug, Clone)]
pub struct PoissonCache {
    factorials: Vec<f64>,
    densities: HashMap<(i64, u32), f64>,
    capacity: usize,
    evictions: u64,
}

impl PoissonCache {
    fn new(capacity: usize) -> Self {
        Self {
            factorials: vec![1.0],
            densities: HashMap::new(),
            capacity: capacity.max(1),
            evictions: 0,
        }
    }

    fn factorial(&mut self, k: u32) -> f64 {
        let k = k as usize;
        while self.factorials.len() <= k {
            let n = self.factorials.len();
            let prev = self.factorials[n - 1];
            self.factorials.push(prev * n as f64);
        }
        self.factorials[k]
    }

    fn store(&mut self, key: (i64, u32), p: f64) {
        if self.densities.len() >= self.capacity {
            log::debug!(
                "poisson density cache reached {} entries, clearing",
                self.densities.len()
            );
            self.densities.clear();
            self.evictions += 1;
        }
        self.densities.insert(key, p);
    }

    pub fn density_entries(&self) -> usize {
        self.densities.len()
    }

    pub fn factorial_entries(&self) -> usize {
        self.factorials.len()
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    pub fn clear(&mut self) {
        self.factorials.truncate(1);
        self.densities.clear();
    }
}

/// Poisson sampler and density evaluator. Not meant to be shared across
/// threads; give each concurrent task its own engine.
#[derive(Debug, Clone)]
pub struct PoissonEngine {
    cache: PoissonCache,
    lambda_scale: f64,
}

impl Default for PoissonEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DENSITY_PRECISION, DEFAULT_CACHE_CAPACITY)
    }
}

impl PoissonEngine {
    /// `precision` is the number of decimals λ is rounded to when keying the
    /// density cache, held to `4..=12`.
    pub fn new(precision: u32, cache_capacity: usize) -> Self {
        let precision = precision.clamp(MIN_DENSITY_PRECISION, MAX_DENSITY_PRECISION);
        Self {
            cache: PoissonCache::new(cache_capacity),
            lambda_scale: 10f64.powi(precision as i32),
        }
    }

    pub fn cache(&self) -> &PoissonCache {
        &self.cache
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Draws a goal count from Poisson(λ). Multiplicative (Knuth) method up
    /// to λ = 30, rounded normal approximation above.
    pub fn sample(&self, rng: &mut RandomSource, lambda: f64) -> u32 {
        if lambda.is_nan() || lambda <= 0.0 {
            return 0;
        }
        if lambda <= EXACT_SAMPLER_MAX_LAMBDA {
            let limit = (-lambda).exp();
            let mut k: u32 = 0;
            let mut p = 1.0;
            loop {
                k += 1;
                p *= rng.next();
                if p < limit {
                    return k - 1;
                }
            }
        }

        // 1 - u keeps the log argument in (0, 1].
        let u1 = 1.0 - rng.next();
        let u2 = rng.next();
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        (lambda + lambda.sqrt() * z).round().max(0.0) as u32
    }

    /// P(X = k | λ).
    pub fn density(&mut self, lambda: f64, k: u32) -> f64 {
        if lambda.is_nan() || lambda <= 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if k == 0 {
            return (-lambda).exp();
        }

        let key = ((lambda * self.lambda_scale).round() as i64, k);
        if let Some(p) = self.cache.densities.get(&key) {
            return *p;
        }

        // Evaluate at the rounded rate so a cached value never depends on
        // which caller populated it.
        let lambda = key.0 as f64 / self.lambda_scale;
        let p = if k <= DIRECT_DENSITY_LIMIT && lambda <= DIRECT_DENSITY_LIMIT as f64 {
            lambda.powi(k as i32) * (-lambda).exp() / self.cache.factorial(k)
        } else {
            log_space_density(lambda, k).exp()
        }
        .clamp(0.0, 1.0);

        self.cache.store(key, p);
        p
    }

    /// Densities for `0..=max_k` in one call.
    pub fn densities(&mut self, lambda: f64, max_k: u32) -> Vec<f64> {
        (0..=max_k).map(|k| self.density(lambda, k)).collect()
    }
}

/// `ln P(X = k)` with Stirling's approximation standing in for `ln k!`.
fn log_space_density(lambda: f64, k: u32) -> f64 {
    let k = k as f64;
    let ln_k_factorial = 0.5 * (2.0 * PI * k).ln() + k * k.ln() - k;
    k * lambda.ln() - lambda - ln_k_factorial
}
