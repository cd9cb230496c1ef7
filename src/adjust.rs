use crate::error::Result;
use crate::model::{LambdaPair, RateParameters};

pub const DEFENSE_BOUNDS: (f64, f64) = (0.6, 1.4);
pub const DEFENSE_PIVOT: f64 = 1.8;
pub const FORM_BOUNDS: (f64, f64) = (0.5, 1.5);
pub const CONDITION_BOUNDS: (f64, f64) = (0.8, 1.2);
pub const HOME_BOOST_BOUNDS: (f64, f64) = (0.0, 1.0);
pub const MOMENTUM_BOUNDS: (f64, f64) = (-0.5, 0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub name: &'static str,
    pub apply: fn(f64, Side, &RateParameters) -> f64,
}

// Applied in order to both sides; each stage clamps its own factor before the
// final rate clamp.
pub const STAGES: [Stage; 7] = [
    Stage {
        name: "defense",
        apply: apply_defense,
    },
    Stage {
        name: "form",
        apply: apply_form,
    },
    Stage {
        name: "weather",
        apply: apply_weather,
    },
    Stage {
        name: "motivation",
        apply: apply_motivation,
    },
    Stage {
        name: "head_to_head",
        apply: apply_head_to_head,
    },
    Stage {
        name: "home_advantage",
        apply: apply_home_advantage,
    },
    Stage {
        name: "momentum",
        apply: apply_momentum,
    },
];

/// Rates after one stage, for explaining a prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageStep {
    pub stage: &'static str,
    pub home: f64,
    pub away: f64,
}

pub fn adjust(params: &RateParameters) -> Result<LambdaPair> {
    adjust_traced(params).map(|(pair, _)| pair)
}

pub fn adjust_traced(params: &RateParameters) -> Result<(LambdaPair, Vec<StageStep>)> {
    params.validate()?;
    for w in params.range_warnings() {
        log::warn!("{} = {} is outside its typical range", w.field, w.value);
    }

    let mut home = params.home_attack;
    let mut away = params.away_attack;
    let mut steps = Vec::with_capacity(STAGES.len());
    for stage in &STAGES {
        home = (stage.apply)(home, Side::Home, params);
        away = (stage.apply)(away, Side::Away, params);
        steps.push(StageStep {
            stage: stage.name,
            home,
            away,
        });
    }

    let pair = LambdaPair::new(home, away)?;
    log::debug!(
        "adjusted rates home {:.3} -> {:.3}, away {:.3} -> {:.3}",
        params.home_attack,
        pair.home(),
        params.away_attack,
        pair.away()
    );
    Ok((pair, steps))
}

/// Strength of a defense from its concession rate; higher is stronger.
/// A clean-sheet record (zero concession) counts as the strongest.
pub fn defensive_strength(concession: f64) -> f64 {
    if concession <= 0.0 {
        return DEFENSE_BOUNDS.1;
    }
    (1.0 / concession).clamp(DEFENSE_BOUNDS.0, DEFENSE_BOUNDS.1)
}

fn apply_defense(rate: f64, side: Side, p: &RateParameters) -> f64 {
    let opponent_concession = match side {
        Side::Home => p.away_concession,
        Side::Away => p.home_concession,
    };
    rate * (DEFENSE_PIVOT - defensive_strength(opponent_concession))
}

fn apply_form(rate: f64, _side: Side, p: &RateParameters) -> f64 {
    rate * p.form.clamp(FORM_BOUNDS.0, FORM_BOUNDS.1)
}

fn apply_weather(rate: f64, _side: Side, p: &RateParameters) -> f64 {
    rate * condition(p.weather)
}

fn apply_motivation(rate: f64, _side: Side, p: &RateParameters) -> f64 {
    rate * condition(p.motivation)
}

fn apply_head_to_head(rate: f64, side: Side, p: &RateParameters) -> f64 {
    let f = condition(p.head_to_head);
    match side {
        Side::Home => rate * f,
        Side::Away => rate * (2.0 - f),
    }
}

fn apply_home_advantage(rate: f64, side: Side, p: &RateParameters) -> f64 {
    match side {
        Side::Home => {
            rate * (1.0 + (p.home_advantage - 1.0).clamp(HOME_BOOST_BOUNDS.0, HOME_BOOST_BOUNDS.1))
        }
        Side::Away => rate,
    }
}

fn apply_momentum(rate: f64, side: Side, p: &RateParameters) -> f64 {
    let f = 1.0 + p.recent_form.clamp(MOMENTUM_BOUNDS.0, MOMENTUM_BOUNDS.1);
    match side {
        Side::Home => rate * f,
        Side::Away => rate * (2.0 - f),
    }
}

fn condition(factor: f64) -> f64 {
    factor.clamp(CONDITION_BOUNDS.0, CONDITION_BOUNDS.1)
}
