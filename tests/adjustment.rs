use matchcast::adjust::adjust;
use matchcast::model::{LAMBDA_MAX, LAMBDA_MIN};
use matchcast::{Kernel, KernelError, LambdaPair, Method, RateParameters, XgInputs};

#[derive(Debug, serde::Deserialize)]
struct MatchCase {
    #[serde(flatten)]
    params: RateParameters,
    xg: Option<XgInputs>,
}

fn fixture() -> MatchCase {
    serde_json::from_str(MATCH_CASE_JSON).expect("valid fixture json")
}

#[test]
fn extreme_parameters_are_clamped() {
    let cases = [
        RateParameters::from_rates(1000.0, 1000.0, 0.0001, 0.0001),
        RateParameters::from_rates(1000.0, 0.0, 1000.0, 0.0001),
        RateParameters::from_rates(0.0, 0.0, 0.0, 0.0),
        RateParameters {
            home_advantage: 100.0,
            form: 100.0,
            weather: 100.0,
            motivation: 100.0,
            head_to_head: 100.0,
            recent_form: 100.0,
            ..RateParameters::from_rates(50.0, 50.0, 5.0, 5.0)
        },
    ];
    for params in cases {
        let pair = adjust(&params).unwrap();
        assert!((LAMBDA_MIN..=LAMBDA_MAX).contains(&pair.home()), "{params:?}");
        assert!((LAMBDA_MIN..=LAMBDA_MAX).contains(&pair.away()), "{params:?}");
    }
}

#[test]
fn negative_attack_is_invalid_input() {
    let params = RateParameters::from_rates(-1.0, 1.2, 1.0, 1.0);
    match adjust(&params) {
        Err(KernelError::InvalidInput { field, .. }) => assert_eq!(field, "home_attack"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn nan_attack_is_invalid_input() {
    let params = RateParameters::from_rates(f64::NAN, 1.2, 1.0, 1.0);
    assert!(matches!(
        adjust(&params),
        Err(KernelError::InvalidInput { field: "home_attack", .. })
    ));
}

#[test]
fn zero_trials_is_invalid_input() {
    let mut kernel = Kernel::default();
    let pair = LambdaPair::new(1.8, 1.2).unwrap();
    let err = kernel
        .predict_lambdas(pair, Method::MonteCarlo { trials: 0, seed: 1 })
        .unwrap_err();
    assert!(matches!(err, KernelError::InvalidInput { field: "trial_count", .. }));
}

#[test]
fn stronger_home_side_is_favoured() {
    let mut kernel = Kernel::default();
    let case = fixture();
    let p = kernel.predict(&case.params, Method::Poisson).unwrap();
    assert!(p.distribution.home_win_pct > p.distribution.away_win_pct);
    assert!(p.lambdas.home() > p.lambdas.away());
}

#[test]
fn fixture_runs_through_every_method() {
    let mut kernel = Kernel::default();
    let case = fixture();
    let cmp = kernel.compare(&case.params, case.xg).unwrap();
    assert_eq!(cmp.predictions.len(), 3);
    let names: Vec<&str> = cmp.predictions.iter().map(|p| p.method.name()).collect();
    assert_eq!(names, vec!["poisson", "monte_carlo", "xg"]);
    assert!(cmp.max_gap_pct > 0.0 && cmp.max_gap_pct < 50.0);

    let report = cmp.to_report();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["predictions"].as_array().unwrap().len(), 3);
}

static MATCH_CASE_JSON: &str = include_str!("fixtures/match_case.json");
