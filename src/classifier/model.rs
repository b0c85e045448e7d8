//! Trained classifier artifacts and inference.
//!
//! A [`TrainedModel`] bundles the predictor, the optional feature scaler, the
//! label encoder and the metadata record. The bundle is validated once when it
//! is built, so a model that exists is always shape-consistent: three input
//! features, one output per encoder class, and only known risk labels.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;
use crate::models::{Classification, Features, RiskLevel};

// ---

/// Feature order every artifact must agree on.
pub const FEATURE_ORDER: [&str; 3] = ["temperature", "smoke", "gas"];

const N_FEATURES: usize = FEATURE_ORDER.len();

/// Metadata record written next to the model artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    // ---
    pub model_name: String,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(alias = "accuracy")]
    pub test_accuracy: f64,

    /// The predictor expects standardized features.
    #[serde(default)]
    pub use_scaled: bool,
}

/// Per-feature standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    // ---
    fn check(&self) -> Result<(), ClassifierError> {
        // ---
        if self.mean.len() != N_FEATURES || self.scale.len() != N_FEATURES {
            return Err(ClassifierError::Inconsistent(format!(
                "scaler has {} means and {} scales, expected {N_FEATURES}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(ClassifierError::Inconsistent(
                "scaler contains non-finite values".to_string(),
            ));
        }
        Ok(())
    }

    fn transform(&self, x: [f64; N_FEATURES]) -> [f64; N_FEATURES] {
        // ---
        let mut out = x;
        for (i, v) in out.iter_mut().enumerate() {
            // A zero scale means the feature was constant during training.
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            *v = (*v - self.mean[i]) / scale;
        }
        out
    }
}

/// Maps encoded class indices to labels, in training order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

/// One node of a decision tree in flattened array form.
///
/// Children always sit at a higher index than their parent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// What a tree's leaves hold.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LeafKind {
    /// Non-negative class counts or weights, one per class.
    Distribution(usize),
    /// A single additive score, as in a boosting stage.
    Regression,
}

impl DecisionTree {
    // ---
    fn check(&self, leaves: LeafKind) -> Result<(), ClassifierError> {
        // ---
        if self.nodes.is_empty() {
            return Err(ClassifierError::Inconsistent("empty decision tree".to_string()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let children_ok = *left > i
                        && *right > i
                        && *left < self.nodes.len()
                        && *right < self.nodes.len();
                    if *feature >= N_FEATURES || !threshold.is_finite() || !children_ok {
                        return Err(ClassifierError::Inconsistent(format!(
                            "invalid split at tree node {i}"
                        )));
                    }
                }
                TreeNode::Leaf { value } => match leaves {
                    LeafKind::Distribution(n_classes) => {
                        let total: f64 = value.iter().sum();
                        if value.len() != n_classes
                            || value.iter().any(|v| !v.is_finite() || *v < 0.0)
                            || total <= 0.0
                        {
                            return Err(ClassifierError::Inconsistent(format!(
                                "leaf {i} does not hold a distribution over {n_classes} classes"
                            )));
                        }
                    }
                    LeafKind::Regression => {
                        if value.len() != 1 || !value[0].is_finite() {
                            return Err(ClassifierError::Inconsistent(format!(
                                "regression leaf {i} must hold one finite value"
                            )));
                        }
                    }
                },
            }
        }
        Ok(())
    }

    /// Raw value of the leaf `x` falls into.
    fn leaf(&self, x: &[f64; N_FEATURES]) -> &[f64] {
        // ---
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }

    /// Normalized class distribution of the leaf `x` falls into.
    fn leaf_distribution(&self, x: &[f64; N_FEATURES]) -> Vec<f64> {
        // ---
        let value = self.leaf(x);
        let total: f64 = value.iter().sum();
        value.iter().map(|v| v / total).collect()
    }

    fn leaf_score(&self, x: &[f64; N_FEATURES]) -> f64 {
        self.leaf(x)[0]
    }
}

/// The statistical predictor. Outputs are ordered like the encoder classes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predictor {
    /// Multinomial logistic regression, or binary with a single coefficient row.
    LogisticRegression {
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    /// Averaged class distributions of independent decision trees.
    RandomForest { trees: Vec<DecisionTree> },
    /// Additive regression trees over raw class scores.
    ///
    /// Each stage holds one tree per score column: one column for two
    /// classes, otherwise one per class.
    GradientBoosting {
        init: Vec<f64>,
        learning_rate: f64,
        stages: Vec<Vec<DecisionTree>>,
    },
}

/// Score columns a raw-score model emits for `n_classes` classes.
fn score_columns(n_classes: usize) -> usize {
    if n_classes == 2 {
        1
    } else {
        n_classes
    }
}

impl Predictor {
    // ---
    fn check(&self, n_classes: usize) -> Result<(), ClassifierError> {
        // ---
        match self {
            Predictor::LogisticRegression { coef, intercept } => {
                let rows = score_columns(n_classes);
                if coef.len() != rows || intercept.len() != rows {
                    return Err(ClassifierError::Inconsistent(format!(
                        "logistic regression has {} coefficient rows and {} intercepts, expected {rows}",
                        coef.len(),
                        intercept.len()
                    )));
                }
                if coef.iter().any(|row| row.len() != N_FEATURES) {
                    return Err(ClassifierError::Inconsistent(format!(
                        "logistic regression rows must have {N_FEATURES} coefficients"
                    )));
                }
                if coef.iter().flatten().chain(intercept).any(|v| !v.is_finite()) {
                    return Err(ClassifierError::Inconsistent(
                        "logistic regression contains non-finite weights".to_string(),
                    ));
                }
                Ok(())
            }
            Predictor::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(ClassifierError::Inconsistent("forest has no trees".to_string()));
                }
                trees
                    .iter()
                    .try_for_each(|tree| tree.check(LeafKind::Distribution(n_classes)))
            }
            Predictor::GradientBoosting {
                init,
                learning_rate,
                stages,
            } => {
                let columns = score_columns(n_classes);
                if init.len() != columns || init.iter().any(|v| !v.is_finite()) {
                    return Err(ClassifierError::Inconsistent(format!(
                        "gradient boosting needs {columns} finite initial scores, got {init:?}"
                    )));
                }
                if !learning_rate.is_finite() || *learning_rate <= 0.0 {
                    return Err(ClassifierError::Inconsistent(format!(
                        "invalid learning rate {learning_rate}"
                    )));
                }
                if stages.is_empty() {
                    return Err(ClassifierError::Inconsistent(
                        "gradient boosting has no stages".to_string(),
                    ));
                }
                for (i, stage) in stages.iter().enumerate() {
                    if stage.len() != columns {
                        return Err(ClassifierError::Inconsistent(format!(
                            "boosting stage {i} has {} trees, expected {columns}",
                            stage.len()
                        )));
                    }
                    stage
                        .iter()
                        .try_for_each(|tree| tree.check(LeafKind::Regression))?;
                }
                Ok(())
            }
        }
    }

    /// Class distribution for one feature vector.
    pub fn predict_proba(&self, x: &[f64; N_FEATURES]) -> Vec<f64> {
        // ---
        match self {
            Predictor::LogisticRegression { coef, intercept } => {
                let logits: Vec<f64> = coef
                    .iter()
                    .zip(intercept)
                    .map(|(row, b)| row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + b)
                    .collect();
                scores_to_proba(&logits)
            }
            Predictor::RandomForest { trees } => {
                let mut acc: Vec<f64> = Vec::new();
                for tree in trees {
                    let dist = tree.leaf_distribution(x);
                    if acc.is_empty() {
                        acc = dist;
                    } else {
                        acc.iter_mut().zip(dist).for_each(|(a, d)| *a += d);
                    }
                }
                let n = trees.len() as f64;
                acc.into_iter().map(|v| v / n).collect()
            }
            Predictor::GradientBoosting {
                init,
                learning_rate,
                stages,
            } => {
                let mut raw = init.clone();
                for stage in stages {
                    for (score, tree) in raw.iter_mut().zip(stage) {
                        *score += learning_rate * tree.leaf_score(x);
                    }
                }
                scores_to_proba(&raw)
            }
        }
    }
}

/// Sigmoid over a single score column (binary), softmax otherwise.
fn scores_to_proba(scores: &[f64]) -> Vec<f64> {
    // ---
    if let [score] = scores {
        let p = 1.0 / (1.0 + (-score).exp());
        return vec![1.0 - p, p];
    }
    softmax(scores)
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    // ---
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// First index of the largest value; `None` if any value is not finite.
fn argmax(values: &[f64]) -> Option<usize> {
    // ---
    if values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let mut best: Option<usize> = None;
    for (i, v) in values.iter().enumerate() {
        if best.map_or(true, |b| *v > values[b]) {
            best = Some(i);
        }
    }
    best
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// A validated predictor, scaler, encoder and metadata bundle.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    meta: ModelMeta,
    predictor: Predictor,
    scaler: Option<StandardScaler>,
    encoder: LabelEncoder,
    levels: Vec<RiskLevel>,
}

impl TrainedModel {
    // ---
    /// Build a model, rejecting any inconsistency between the artifacts.
    ///
    /// Encoder classes must all be known risk labels; an unknown label would
    /// otherwise have to be guessed at prediction time.
    pub fn new(
        meta: ModelMeta,
        predictor: Predictor,
        scaler: Option<StandardScaler>,
        encoder: LabelEncoder,
    ) -> Result<Self, ClassifierError> {
        // ---
        if !meta.features.is_empty() && meta.features != FEATURE_ORDER {
            return Err(ClassifierError::Inconsistent(format!(
                "model features {:?} do not match {:?}",
                meta.features, FEATURE_ORDER
            )));
        }

        if encoder.classes.len() < 2 {
            return Err(ClassifierError::Inconsistent(
                "label encoder needs at least two classes".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        let mut levels = Vec::with_capacity(encoder.classes.len());
        for label in &encoder.classes {
            let level = RiskLevel::from_label(label).ok_or_else(|| {
                ClassifierError::Inconsistent(format!("unknown class label {label:?}"))
            })?;
            if !seen.insert(level) {
                return Err(ClassifierError::Inconsistent(format!(
                    "duplicate class label {label:?}"
                )));
            }
            levels.push(level);
        }

        if !meta.classes.is_empty() && meta.classes != encoder.classes {
            return Err(ClassifierError::Inconsistent(format!(
                "metadata classes {:?} differ from encoder classes {:?}",
                meta.classes, encoder.classes
            )));
        }

        if meta.use_scaled {
            scaler
                .as_ref()
                .ok_or_else(|| {
                    ClassifierError::Inconsistent("model requires a scaler".to_string())
                })?
                .check()?;
        }

        predictor.check(encoder.classes.len())?;

        Ok(Self {
            meta,
            predictor,
            scaler,
            encoder,
            levels,
        })
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    /// Predict the risk level and per-class probabilities.
    ///
    /// Returns an error rather than a guess when the predictor output cannot
    /// be decoded.
    pub fn classify(&self, features: &Features) -> Result<Classification, ClassifierError> {
        // ---
        let mut x = features.as_vector();
        if self.meta.use_scaled {
            if let Some(scaler) = &self.scaler {
                x = scaler.transform(x);
            }
        }

        let proba = self.predictor.predict_proba(&x);
        if proba.len() != self.levels.len() {
            return Err(ClassifierError::Prediction(format!(
                "predictor returned {} outputs for {} classes",
                proba.len(),
                self.levels.len()
            )));
        }

        let index = argmax(&proba).ok_or_else(|| {
            ClassifierError::Prediction(format!("non-finite class distribution {proba:?}"))
        })?;

        let probabilities: BTreeMap<String, f64> = self
            .encoder
            .classes
            .iter()
            .zip(&proba)
            .map(|(label, p)| (label.clone(), round4(*p)))
            .collect();

        Ok(Classification::new(self.levels[index], Some(probabilities)))
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::classifier::fixtures;

    fn features(temperature: f64, smoke: i64, gas: i64) -> Features {
        Features {
            temperature,
            smoke,
            gas,
        }
    }

    #[test]
    fn test_logistic_regression_uses_encoder_order() {
        // ---
        // Encoder classes are alphabetical: HIGH, LOW, MEDIUM.
        let model = fixtures::logistic_model();

        let hot = model.classify(&features(80.0, 0, 0)).unwrap();
        assert_eq!(hot.risk_level, RiskLevel::High);
        assert_eq!(hot.risk_code, 2);

        let cold = model.classify(&features(10.0, 0, 0)).unwrap();
        assert_eq!(cold.risk_level, RiskLevel::Low);
        assert_eq!(cold.risk_code, 0);

        let warm = model.classify(&features(40.0, 0, 0)).unwrap();
        assert_eq!(warm.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_probabilities_keyed_by_label_and_rounded() {
        // ---
        let model = fixtures::logistic_model();
        let result = model.classify(&features(80.0, 0, 0)).unwrap();
        let probs = result.probabilities.unwrap();

        assert_eq!(probs.len(), 3);
        let total: f64 = probs.values().sum();
        assert!((total - 1.0).abs() < 1e-3);
        assert!(probs["HIGH"] > probs["MEDIUM"]);
        assert!(probs["MEDIUM"] > probs["LOW"]);
        for p in probs.values() {
            assert_eq!(*p, (p * 10_000.0).round() / 10_000.0);
        }
    }

    #[test]
    fn test_random_forest_averages_leaves() {
        // ---
        let model = fixtures::forest_model();

        let clean = model.classify(&features(20.0, 100, 0)).unwrap();
        assert_eq!(clean.risk_level, RiskLevel::Low);
        assert_eq!(clean.probabilities.as_ref().unwrap()["LOW"], 1.0);

        let smoky = model.classify(&features(20.0, 900, 0)).unwrap();
        assert_eq!(smoky.risk_level, RiskLevel::High);
        let probs = smoky.probabilities.unwrap();
        assert_eq!(probs["HIGH"], 0.8);
        assert_eq!(probs["MEDIUM"], 0.2);
        assert_eq!(probs["LOW"], 0.0);
    }

    #[test]
    fn test_gradient_boosting_sums_stages() {
        // ---
        let model = fixtures::boosting_model();

        // Raw scores are init + 0.5 * (stage 1 + stage 2), columns HIGH, LOW, MEDIUM.
        let smoky = model.classify(&features(20.0, 900, 0)).unwrap();
        assert_eq!(smoky.risk_level, RiskLevel::High);
        let expected = softmax(&[3.5, -1.5, 0.0]);
        let probs = smoky.probabilities.unwrap();
        assert_eq!(probs["HIGH"], round4(expected[0]));
        assert_eq!(probs["LOW"], round4(expected[1]));
        assert_eq!(probs["MEDIUM"], round4(expected[2]));

        let clean = model.classify(&features(20.0, 100, 0)).unwrap();
        assert_eq!(clean.risk_level, RiskLevel::Low);
        let expected = softmax(&[-2.5, 4.5, 0.0]);
        assert_eq!(clean.probabilities.unwrap()["LOW"], round4(expected[1]));
    }

    #[test]
    fn test_binary_gradient_boosting() {
        // ---
        let stump = |low: f64, high: f64| DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 50.0,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: vec![low] },
                TreeNode::Leaf { value: vec![high] },
            ],
        };
        let model = TrainedModel::new(
            fixtures::meta(&["HIGH", "LOW"], false),
            Predictor::GradientBoosting {
                init: vec![0.0],
                learning_rate: 1.0,
                stages: vec![vec![stump(3.0, -3.0)]],
            },
            None,
            LabelEncoder {
                classes: vec!["HIGH".to_string(), "LOW".to_string()],
            },
        )
        .unwrap();

        // The single score column is the log-odds of the second class.
        let cool = model.classify(&features(20.0, 0, 0)).unwrap();
        assert_eq!(cool.risk_level, RiskLevel::Low);
        let p = 1.0 / (1.0 + (-3.0f64).exp());
        assert_eq!(cool.probabilities.unwrap()["LOW"], round4(p));

        let hot = model.classify(&features(90.0, 0, 0)).unwrap();
        assert_eq!(hot.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_rejects_bad_boosting_shapes() {
        // ---
        let regression_leaf = |v: f64| DecisionTree {
            nodes: vec![TreeNode::Leaf { value: vec![v] }],
        };

        let short_stage = Predictor::GradientBoosting {
            init: vec![0.0, 0.0, 0.0],
            learning_rate: 0.1,
            stages: vec![vec![regression_leaf(1.0), regression_leaf(1.0)]],
        };
        let wrong_init = Predictor::GradientBoosting {
            init: vec![0.0],
            learning_rate: 0.1,
            stages: vec![vec![regression_leaf(1.0); 3]],
        };
        let bad_rate = Predictor::GradientBoosting {
            init: vec![0.0, 0.0, 0.0],
            learning_rate: 0.0,
            stages: vec![vec![regression_leaf(1.0); 3]],
        };
        let no_stages = Predictor::GradientBoosting {
            init: vec![0.0, 0.0, 0.0],
            learning_rate: 0.1,
            stages: vec![],
        };
        let distribution_leaf = Predictor::GradientBoosting {
            init: vec![0.0, 0.0, 0.0],
            learning_rate: 0.1,
            stages: vec![vec![
                DecisionTree {
                    nodes: vec![TreeNode::Leaf {
                        value: vec![1.0, 0.0, 0.0],
                    }],
                };
                3
            ]],
        };

        for predictor in [short_stage, wrong_init, bad_rate, no_stages, distribution_leaf] {
            let err = TrainedModel::new(
                fixtures::meta(&[], false),
                predictor,
                None,
                fixtures::encoder(),
            )
            .unwrap_err();
            assert!(matches!(err, ClassifierError::Inconsistent(_)));
        }

        // Negative scores are fine in a regression leaf.
        let negative = Predictor::GradientBoosting {
            init: vec![0.0, 0.0, 0.0],
            learning_rate: 0.1,
            stages: vec![vec![regression_leaf(-1.5); 3]],
        };
        assert!(
            TrainedModel::new(fixtures::meta(&[], false), negative, None, fixtures::encoder())
                .is_ok()
        );
    }

    #[test]
    fn test_scaler_applied_only_when_declared() {
        // ---
        let scaled = fixtures::scaled_logistic_model();
        // Raw 80 degC standardizes to +3 against mean 50 / scale 10.
        let result = scaled.classify(&features(80.0, 0, 0)).unwrap();
        assert_eq!(result.risk_level, RiskLevel::High);

        // Raw 45 degC standardizes to -0.5, well below the HIGH boundary.
        let result = scaled.classify(&features(45.0, 0, 0)).unwrap();
        assert_ne!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_binary_logistic_regression() {
        // ---
        let model = TrainedModel::new(
            fixtures::meta(&["HIGH", "LOW"], false),
            Predictor::LogisticRegression {
                coef: vec![vec![-0.2, 0.0, 0.0]],
                intercept: vec![10.0],
            },
            None,
            LabelEncoder {
                classes: vec!["HIGH".to_string(), "LOW".to_string()],
            },
        )
        .unwrap();

        assert_eq!(model.classify(&features(20.0, 0, 0)).unwrap().risk_level, RiskLevel::Low);
        assert_eq!(model.classify(&features(90.0, 0, 0)).unwrap().risk_level, RiskLevel::High);
    }

    #[test]
    fn test_rejects_unknown_labels() {
        // ---
        let err = TrainedModel::new(
            fixtures::meta(&[], false),
            fixtures::logistic_predictor(),
            None,
            LabelEncoder {
                classes: vec!["HIGH".into(), "LOW".into(), "CRITICAL".into()],
            },
        )
        .unwrap_err();
        assert!(matches!(err, ClassifierError::Inconsistent(msg) if msg.contains("CRITICAL")));
    }

    #[test]
    fn test_rejects_shape_mismatches() {
        // ---
        let two_rows = Predictor::LogisticRegression {
            coef: vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]],
            intercept: vec![0.0, 0.0],
        };
        assert!(TrainedModel::new(
            fixtures::meta(&[], false),
            two_rows,
            None,
            fixtures::encoder()
        )
        .is_err());

        let short_row = Predictor::LogisticRegression {
            coef: vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 0.0]],
            intercept: vec![0.0, 0.0, 0.0],
        };
        assert!(TrainedModel::new(
            fixtures::meta(&[], false),
            short_row,
            None,
            fixtures::encoder()
        )
        .is_err());

        let mut meta = fixtures::meta(&["HIGH", "LOW", "MEDIUM"], false);
        meta.features = vec!["smoke".into(), "temperature".into(), "gas".into()];
        assert!(TrainedModel::new(meta, fixtures::logistic_predictor(), None, fixtures::encoder())
            .is_err());
    }

    #[test]
    fn test_rejects_bad_trees() {
        // ---
        let cyclic = Predictor::RandomForest {
            trees: vec![DecisionTree {
                nodes: vec![
                    TreeNode::Leaf {
                        value: vec![1.0, 0.0, 0.0],
                    },
                    TreeNode::Split {
                        feature: 0,
                        threshold: 1.0,
                        left: 0,
                        right: 0,
                    },
                ],
            }],
        };
        assert!(TrainedModel::new(fixtures::meta(&[], false), cyclic, None, fixtures::encoder())
            .is_err());

        let empty_leaf = Predictor::RandomForest {
            trees: vec![DecisionTree {
                nodes: vec![TreeNode::Leaf {
                    value: vec![0.0, 0.0, 0.0],
                }],
            }],
        };
        assert!(
            TrainedModel::new(fixtures::meta(&[], false), empty_leaf, None, fixtures::encoder())
                .is_err()
        );
    }

    #[test]
    fn test_scaled_model_requires_scaler() {
        // ---
        let err = TrainedModel::new(
            fixtures::meta(&[], true),
            fixtures::logistic_predictor(),
            None,
            fixtures::encoder(),
        )
        .unwrap_err();
        assert!(matches!(err, ClassifierError::Inconsistent(_)));
    }

    #[test]
    fn test_argmax_first_wins_ties() {
        // ---
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), Some(0));
        assert_eq!(argmax(&[0.1, 0.2, 0.7]), Some(2));
        assert_eq!(argmax(&[0.1, f64::NAN, 0.7]), None);
    }

    #[test]
    fn test_predictor_json_format() {
        // ---
        let predictor: Predictor = serde_json::from_value(fixtures::forest_json()).unwrap();
        assert!(matches!(predictor, Predictor::RandomForest { ref trees } if trees.len() == 1));

        let predictor: Predictor = serde_json::from_value(fixtures::logistic_json()).unwrap();
        assert_eq!(predictor, fixtures::logistic_predictor());

        let predictor: Predictor = serde_json::from_value(fixtures::boosting_json()).unwrap();
        assert!(
            matches!(predictor, Predictor::GradientBoosting { ref stages, .. } if stages.len() == 2)
        );
    }
}
