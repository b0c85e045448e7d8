//! Ingestion pipeline: validate, classify, persist.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::classifier::ClassifierLoader;
use crate::error::IngestError;
use crate::models::{Classification, Reading, RiskLevel};
use crate::store::ReadingStore;
use crate::validate;

// ---

/// Response body for a successful ingest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub risk_level: RiskLevel,
    pub risk_code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<BTreeMap<String, f64>>,
}

impl From<Classification> for IngestResponse {
    fn from(c: Classification) -> Self {
        Self {
            status: "ok",
            risk_level: c.risk_level,
            risk_code: c.risk_code,
            probabilities: c.probabilities,
        }
    }
}

/// Validate, classify and durably store one payload.
///
/// Success is only reported after the store has committed the reading.
pub async fn ingest(
    store: &ReadingStore,
    classifier: &ClassifierLoader,
    payload: &Value,
) -> Result<(Reading, Classification), IngestError> {
    // ---
    let reading = validate::validate(payload)?;
    let classification = classifier.classify(&reading.features);

    let stored = store.append(reading, classification.risk_level).await?;
    debug!(id = stored.id, device = %stored.device_id, "Reading stored");

    if stored.risk_level >= RiskLevel::Medium {
        warn!(
            "{} RISK - device={} T={}°C S={}ppm G={}ppm",
            stored.risk_level, stored.device_id, stored.temperature, stored.smoke, stored.gas
        );
    }

    Ok((stored, classification))
}
