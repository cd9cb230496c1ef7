use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use matchcast::{Kernel, KernelConfig, Method, RateParameters, XgInputs};

#[derive(Debug, serde::Deserialize)]
struct MatchCase {
    #[serde(flatten)]
    params: RateParameters,
    #[serde(default)]
    xg: Option<XgInputs>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::init();

    let path = std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with("--") && !is_flag_value(arg))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/match_case.json"));

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("read match case {}", path.display()))?;
    let case: MatchCase = serde_json::from_str(&raw).context("invalid match case json")?;

    let mut config = KernelConfig::from_env();
    if let Some(trials) = parse_arg::<u32>("--trials") {
        config.trials = trials;
    }
    config.seed = parse_arg::<u64>("--seed")
        .or_else(|| std::env::var("MATCHCAST_SEED").ok().and_then(|s| s.trim().parse().ok()))
        .unwrap_or_else(rand::random);

    let mut kernel = Kernel::new(config);
    let warnings = case.params.range_warnings();
    let method = parse_arg::<String>("--method").unwrap_or_else(|| "poisson".to_string());

    let json = match method.as_str() {
        "all" => {
            let cmp = kernel.compare(&case.params, case.xg)?;
            serde_json::to_string_pretty(&cmp.to_report().with_warnings(warnings))?
        }
        other => {
            let method = match other {
                "poisson" => Method::Poisson,
                "monte-carlo" | "mc" => kernel.default_monte_carlo(),
                "xg" => Method::Xg(
                    case.xg
                        .ok_or_else(|| anyhow!("--method xg needs an `xg` block in the case"))?,
                ),
                _ => return Err(anyhow!("unknown method `{other}`")),
            };
            let prediction = kernel.predict(&case.params, method)?;
            serde_json::to_string_pretty(&prediction.to_report().with_warnings(warnings))?
        }
    };

    println!("{json}");
    Ok(())
}

const VALUE_FLAGS: &[&str] = &["--trials", "--seed", "--method"];

fn is_flag_value(arg: &str) -> bool {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    args.windows(2)
        .any(|w| VALUE_FLAGS.contains(&w[0].as_str()) && w[1] == arg)
}

fn parse_arg<T: std::str::FromStr>(name: &str) -> Option<T> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && let Ok(v) = raw.trim().parse::<T>()
        {
            return Some(v);
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && let Ok(v) = next.trim().parse::<T>()
        {
            return Some(v);
        }
    }
    None
}
