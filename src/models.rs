//! Data models for the fire-risk pipeline.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---

/// Discrete fire-risk level.
///
/// The numeric code is fixed: `LOW = 0`, `MEDIUM = 1`, `HIGH = 2`. Every
/// reading, whichever strategy classified it, derives its code from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    // ---
    pub fn code(self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(RiskLevel::Low),
            1 => Some(RiskLevel::Medium),
            2 => Some(RiskLevel::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    /// Look up a label as produced by a label encoder. Unknown labels yield
    /// `None`; callers must not default them to `Low`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "LOW" => Some(RiskLevel::Low),
            "MEDIUM" => Some(RiskLevel::Medium),
            "HIGH" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature triple in the order the classifier consumes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub temperature: f64,
    pub smoke: i64,
    pub gas: i64,
}

impl Features {
    // ---
    pub fn as_vector(&self) -> [f64; 3] {
        [self.temperature, self.smoke as f64, self.gas as f64]
    }
}

/// Validated ingestion payload, not yet classified or stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub device_id: String,
    pub features: Features,
}

/// Outcome of one `classify` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    // ---
    pub risk_level: RiskLevel,
    pub risk_code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<BTreeMap<String, f64>>,
}

impl Classification {
    // ---
    pub fn new(risk_level: RiskLevel, probabilities: Option<BTreeMap<String, f64>>) -> Self {
        Self {
            risk_level,
            risk_code: risk_level.code(),
            probabilities,
        }
    }
}

/// A classified reading as stored in the log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    // ---
    pub id: i64,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub smoke: i64,
    pub gas: i64,
    pub risk_level: RiskLevel,
    pub risk_code: u8,
}

impl Reading {
    // ---
    pub fn new(
        id: i64,
        timestamp: DateTime<Utc>,
        reading: NewReading,
        risk_level: RiskLevel,
    ) -> Self {
        Reading {
            id,
            device_id: reading.device_id,
            timestamp,
            temperature: reading.features.temperature,
            smoke: reading.features.smoke,
            gas: reading.features.gas,
            risk_level,
            risk_code: risk_level.code(),
        }
    }
}

/// Per-level reading counts. Levels with no readings count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    #[serde(rename = "LOW")]
    pub low: i64,
    #[serde(rename = "MEDIUM")]
    pub medium: i64,
    #[serde(rename = "HIGH")]
    pub high: i64,
}

impl RiskDistribution {
    // ---
    pub fn add(&mut self, level: RiskLevel, count: i64) {
        match level {
            RiskLevel::Low => self.low += count,
            RiskLevel::Medium => self.medium += count,
            RiskLevel::High => self.high += count,
        }
    }
}

/// The `(temperature, smoke, gas)` projection used by window statistics.
#[derive(Debug, Clone, Copy, PartialEq, sqlx::FromRow)]
pub struct WindowSample {
    pub temperature: f64,
    pub smoke: i64,
    pub gas: i64,
}
