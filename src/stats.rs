//! Statistics over the reading log.
//!
//! Each count in a snapshot comes from its own query and is accurate as of
//! that read; the snapshot as a whole is not a single transaction. A failed
//! query fails the whole snapshot rather than reporting zeros.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::classifier::{ClassifierLoader, ModelInfo};
use crate::error::AggregationError;
use crate::models::{RiskDistribution, WindowSample};
use crate::store::ReadingStore;

// ---

/// Length of the rolling statistics window.
pub const WINDOW_HOURS: i64 = 24;

/// Aggregates over the trailing window. All values are 0 when it is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowStats {
    pub count: usize,
    pub avg_temp: f64,
    pub avg_smoke: f64,
    pub avg_gas: f64,
    pub max_temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_readings: i64,
    pub risk_distribution: RiskDistribution,
    pub last_24h: WindowStats,
    pub model: ModelInfo,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Means and maximum over a window, rounded to two decimals.
pub fn summarize_window(samples: &[WindowSample]) -> WindowStats {
    // ---
    if samples.is_empty() {
        return WindowStats {
            count: 0,
            avg_temp: 0.0,
            avg_smoke: 0.0,
            avg_gas: 0.0,
            max_temp: 0.0,
        };
    }

    let n = samples.len() as f64;
    let sum_temp: f64 = samples.iter().map(|s| s.temperature).sum();
    let sum_smoke: f64 = samples.iter().map(|s| s.smoke as f64).sum();
    let sum_gas: f64 = samples.iter().map(|s| s.gas as f64).sum();
    let max_temp = samples
        .iter()
        .map(|s| s.temperature)
        .fold(f64::NEG_INFINITY, f64::max);

    WindowStats {
        count: samples.len(),
        avg_temp: round2(sum_temp / n),
        avg_smoke: round2(sum_smoke / n),
        avg_gas: round2(sum_gas / n),
        max_temp: round2(max_temp),
    }
}

/// Compute a statistics snapshot as of `now`.
pub async fn compute_stats(
    store: &ReadingStore,
    classifier: &ClassifierLoader,
    now: DateTime<Utc>,
) -> Result<StatsSnapshot, AggregationError> {
    // ---
    let total_readings = store
        .count()
        .await
        .map_err(|source| AggregationError {
            stage: "total readings",
            source,
        })?;

    let risk_distribution = store
        .risk_counts()
        .await
        .map_err(|source| AggregationError {
            stage: "risk distribution",
            source,
        })?;

    let cutoff = now - Duration::hours(WINDOW_HOURS);
    let window = store
        .since(cutoff)
        .await
        .map_err(|source| AggregationError {
            stage: "24h window",
            source,
        })?;

    Ok(StatsSnapshot {
        total_readings,
        risk_distribution,
        last_24h: summarize_window(&window),
        model: classifier.model_info(),
    })
}
