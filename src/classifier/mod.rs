//! Fire-risk classification.
//!
//! Two strategies sit behind one `classify` call: the fixed-threshold rules
//! in [`rules`] and a trained model from `model`. [`ClassifierLoader`] owns
//! which one is active.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::warn;

use crate::models::{Classification, Features};

#[cfg(test)]
pub(crate) mod fixtures;
mod loader;
mod model;
pub mod rules;

pub use loader::{ClassifierLoader, LoaderStatus, ModelSnapshot};
pub use model::ModelMeta;

// ---

/// The strategy in effect for one call.
#[derive(Debug, Clone)]
pub enum ActiveClassifier {
    RuleBased,
    Trained(Arc<ModelSnapshot>),
}

impl ActiveClassifier {
    // ---
    /// Classify a feature triple.
    ///
    /// A trained model that fails on this input is logged and the call is
    /// answered by the rules instead; a corrupt prediction is never returned.
    pub fn classify(&self, features: &Features) -> Classification {
        // ---
        match self {
            ActiveClassifier::RuleBased => rules::classify(features),
            ActiveClassifier::Trained(snapshot) => match snapshot.model.classify(features) {
                Ok(result) => result,
                Err(e) => {
                    warn!(
                        "Classifier unavailable (generation {}), falling back to rules: {e}",
                        snapshot.generation
                    );
                    rules::classify(features)
                }
            },
        }
    }

    pub fn info(&self) -> ModelInfo {
        match self {
            ActiveClassifier::RuleBased => ModelInfo::RuleBased,
            ActiveClassifier::Trained(snapshot) => {
                ModelInfo::Trained(snapshot.model.meta().clone())
            }
        }
    }
}

/// Description of the active classifier as reported to clients.
///
/// Serializes as the metadata record, or as the string `"rule-based"`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelInfo {
    RuleBased,
    Trained(ModelMeta),
}

impl Serialize for ModelInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ModelInfo::RuleBased => serializer.serialize_str("rule-based"),
            ModelInfo::Trained(meta) => meta.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::RiskLevel;
    use serde_json::json;

    fn trained() -> ActiveClassifier {
        ActiveClassifier::Trained(Arc::new(ModelSnapshot {
            generation: 1,
            model: fixtures::forest_model(),
        }))
    }

    #[test]
    fn test_strategies_share_one_contract() {
        // ---
        let f = Features {
            temperature: 20.0,
            smoke: 900,
            gas: 0,
        };

        let by_rules = ActiveClassifier::RuleBased.classify(&f);
        assert_eq!(by_rules.risk_level, RiskLevel::Medium);
        assert!(by_rules.probabilities.is_none());

        let by_model = trained().classify(&f);
        assert_eq!(by_model.risk_level, RiskLevel::High);
        assert!(by_model.probabilities.is_some());

        for c in [by_rules, by_model] {
            assert_eq!(c.risk_code, c.risk_level.code());
        }
    }

    #[test]
    fn test_prediction_failure_falls_back_to_rules() {
        // ---
        let model = model::TrainedModel::new(
            fixtures::meta(&[], false),
            model::Predictor::LogisticRegression {
                coef: vec![vec![10.0, 0.0, 0.0], vec![0.0, 0.0, 0.0], vec![0.0, 0.0, 0.0]],
                intercept: vec![0.0, 0.0, 0.0],
            },
            None,
            fixtures::encoder(),
        )
        .unwrap();
        let active = ActiveClassifier::Trained(Arc::new(ModelSnapshot {
            generation: 3,
            model,
        }));

        // The HIGH logit overflows to infinity and the distribution turns NaN.
        let f = Features {
            temperature: 1e308,
            smoke: 0,
            gas: 0,
        };
        let result = active.classify(&f);
        assert_eq!(result, rules::classify(&f));
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_model_info_serialization() {
        // ---
        assert_eq!(
            serde_json::to_value(ActiveClassifier::RuleBased.info()).unwrap(),
            json!("rule-based")
        );

        let value = serde_json::to_value(trained().info()).unwrap();
        assert_eq!(value["model_name"], "RandomForest");
        assert_eq!(value["features"], json!(["temperature", "smoke", "gas"]));
        assert_eq!(value["use_scaled"], false);
    }
}
