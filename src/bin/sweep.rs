use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;

use matchcast::report::round1;
use matchcast::{Kernel, KernelConfig, Method, Prediction, RateParameters};

const DEFAULT_STEPS: usize = 11;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .filter(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/match_case.json"));
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("read match case {}", path.display()))?;
    // Extra keys such as an `xg` block are ignored here.
    let base: RateParameters = serde_json::from_str(&raw).context("invalid match case json")?;

    let from = parse_f64_arg("--from").unwrap_or(0.5);
    let to = parse_f64_arg("--to").unwrap_or(3.5);
    let steps = parse_f64_arg("--steps")
        .map(|v| v as usize)
        .unwrap_or(DEFAULT_STEPS)
        .clamp(2, 10_000);
    if !(from.is_finite() && to.is_finite()) || from < 0.0 || to < from {
        return Err(anyhow!("sweep range must satisfy 0 <= from <= to"));
    }
    let monte_carlo = has_flag("--monte-carlo");

    let config = KernelConfig::from_env();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.sweep_parallelism)
        .build()
        .context("failed to build sweep pool")?;

    let points: Vec<f64> = (0..steps)
        .map(|i| from + (to - from) * i as f64 / (steps - 1) as f64)
        .collect();

    // One kernel per point: the engine cache and random source are not shared.
    let rows: Vec<(f64, Prediction)> = pool.install(|| {
        points
            .par_iter()
            .map(|&home_attack| {
                let mut kernel = Kernel::new(config);
                let method = if monte_carlo {
                    kernel.default_monte_carlo()
                } else {
                    Method::Poisson
                };
                let params = RateParameters { home_attack, ..base };
                kernel
                    .predict(&params, method)
                    .map(|p| (home_attack, p))
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    println!("home_attack  home_lambda  home%  draw%  away%");
    for (home_attack, p) in rows {
        let d = &p.distribution;
        println!(
            "{:>11.2}  {:>11.2}  {:>5.1}  {:>5.1}  {:>5.1}",
            home_attack,
            p.lambdas.home(),
            round1(d.home_win_pct),
            round1(d.draw_pct),
            round1(d.away_win_pct)
        );
    }

    Ok(())
}

fn parse_f64_arg(name: &str) -> Option<f64> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && let Ok(v) = raw.trim().parse::<f64>()
        {
            return Some(v);
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && let Ok(v) = next.trim().parse::<f64>()
        {
            return Some(v);
        }
    }
    None
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}
