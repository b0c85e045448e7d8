//! Hand-built model artifacts shared by the classifier, loader and route tests.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use super::loader::{ENCODER_FILE, META_FILE, PREDICTOR_FILE, SCALER_FILE};
use super::model::{
    LabelEncoder, ModelMeta, Predictor, StandardScaler, TrainedModel, FEATURE_ORDER,
};

// ---

pub fn meta(classes: &[&str], use_scaled: bool) -> ModelMeta {
    ModelMeta {
        model_name: "LogisticRegression".to_string(),
        features: FEATURE_ORDER.iter().map(|f| f.to_string()).collect(),
        classes: classes.iter().map(|c| c.to_string()).collect(),
        test_accuracy: 0.9633,
        use_scaled,
    }
}

/// Alphabetical, the way a label encoder sorts them.
pub fn encoder() -> LabelEncoder {
    LabelEncoder {
        classes: vec!["HIGH".into(), "LOW".into(), "MEDIUM".into()],
    }
}

pub fn logistic_json() -> Value {
    json!({
        "kind": "logistic_regression",
        "coef": [[0.1, 0.0, 0.0], [-0.1, 0.0, 0.0], [0.0, 0.0, 0.0]],
        "intercept": [-5.0, 3.0, 0.0]
    })
}

pub fn logistic_predictor() -> Predictor {
    Predictor::LogisticRegression {
        coef: vec![vec![0.1, 0.0, 0.0], vec![-0.1, 0.0, 0.0], vec![0.0, 0.0, 0.0]],
        intercept: vec![-5.0, 3.0, 0.0],
    }
}

/// Single tree splitting on smoke at 400 ppm.
pub fn forest_json() -> Value {
    json!({
        "kind": "random_forest",
        "trees": [{
            "nodes": [
                {"feature": 1, "threshold": 400.0, "left": 1, "right": 2},
                {"value": [0.0, 10.0, 0.0]},
                {"value": [8.0, 0.0, 2.0]}
            ]
        }]
    })
}

/// Two boosting stages over smoke at 400 ppm; the MEDIUM column stays flat.
pub fn boosting_json() -> Value {
    let stage = json!([
        {"nodes": [
            {"feature": 1, "threshold": 400.0, "left": 1, "right": 2},
            {"value": [-2.0]},
            {"value": [4.0]}
        ]},
        {"nodes": [
            {"feature": 1, "threshold": 400.0, "left": 1, "right": 2},
            {"value": [4.0]},
            {"value": [-2.0]}
        ]},
        {"nodes": [{"value": [0.0]}]}
    ]);
    json!({
        "kind": "gradient_boosting",
        "init": [-0.5, 0.5, 0.0],
        "learning_rate": 0.5,
        "stages": [stage.clone(), stage]
    })
}

pub fn logistic_model() -> TrainedModel {
    TrainedModel::new(
        meta(&["HIGH", "LOW", "MEDIUM"], false),
        logistic_predictor(),
        None,
        encoder(),
    )
    .unwrap()
}

pub fn forest_model() -> TrainedModel {
    let mut meta = meta(&["HIGH", "LOW", "MEDIUM"], false);
    meta.model_name = "RandomForest".to_string();
    TrainedModel::new(
        meta,
        serde_json::from_value(forest_json()).unwrap(),
        None,
        encoder(),
    )
    .unwrap()
}

pub fn boosting_model() -> TrainedModel {
    let mut meta = meta(&["HIGH", "LOW", "MEDIUM"], false);
    meta.model_name = "GradientBoosting".to_string();
    TrainedModel::new(
        meta,
        serde_json::from_value(boosting_json()).unwrap(),
        None,
        encoder(),
    )
    .unwrap()
}

/// Weights act on standardized temperature (mean 50, scale 10).
pub fn scaled_logistic_model() -> TrainedModel {
    TrainedModel::new(
        meta(&["HIGH", "LOW", "MEDIUM"], true),
        Predictor::LogisticRegression {
            coef: vec![vec![2.0, 0.0, 0.0], vec![-2.0, 0.0, 0.0], vec![0.0, 0.0, 0.0]],
            intercept: vec![-2.0, 0.0, 0.0],
        },
        Some(StandardScaler {
            mean: vec![50.0, 300.0, 400.0],
            scale: vec![10.0, 100.0, 100.0],
        }),
        encoder(),
    )
    .unwrap()
}

/// Write a complete, valid artifact set for the unscaled logistic model.
pub fn write_model_dir(dir: &Path) {
    let meta_json = serde_json::to_value(meta(&["HIGH", "LOW", "MEDIUM"], false)).unwrap();
    write_json(dir, META_FILE, &meta_json);
    write_json(dir, PREDICTOR_FILE, &logistic_json());
    write_json(dir, SCALER_FILE, &json!({"mean": [0.0, 0.0, 0.0], "scale": [1.0, 1.0, 1.0]}));
    write_json(dir, ENCODER_FILE, &json!({"classes": ["HIGH", "LOW", "MEDIUM"]}));
}

pub fn write_json(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}
