//! Fixed-threshold risk evaluator.
//!
//! Always available and used whenever no trained model is active or the
//! model fails on a call. Pure and total over every input.

use crate::models::{Classification, Features, RiskLevel};

// ---

const TEMP_HIGH: f64 = 60.0;
const TEMP_ELEVATED: f64 = 45.0;
const SMOKE_HIGH: i64 = 500;
const SMOKE_ELEVATED: i64 = 300;
const GAS_HIGH: i64 = 700;
const GAS_ELEVATED: i64 = 400;

/// Severity score in `0..=6`, two points at most per feature.
pub fn score(features: &Features) -> u8 {
    // ---
    let temperature = if features.temperature >= TEMP_HIGH {
        2
    } else if features.temperature >= TEMP_ELEVATED {
        1
    } else {
        0
    };

    temperature
        + band(features.smoke, SMOKE_ELEVATED, SMOKE_HIGH)
        + band(features.gas, GAS_ELEVATED, GAS_HIGH)
}

fn band(value: i64, elevated: i64, high: i64) -> u8 {
    if value >= high {
        2
    } else if value >= elevated {
        1
    } else {
        0
    }
}

pub fn level_for_score(score: u8) -> RiskLevel {
    match score {
        0..=1 => RiskLevel::Low,
        2..=3 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

/// Classify with the fixed thresholds. Never produces probabilities.
pub fn classify(features: &Features) -> Classification {
    Classification::new(level_for_score(score(features)), None)
}
