//! Process-wide classifier lifecycle.
//!
//! The loader starts `NotLoaded` and moves to `Loaded` only when a complete,
//! consistent artifact set is read from the model directory. The active model
//! is held as one immutable snapshot: a reload builds the new bundle first and
//! swaps it in with a single write, so readers never pair a predictor from one
//! version with an encoder from another.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::model::{LabelEncoder, ModelMeta, Predictor, StandardScaler, TrainedModel};
use super::{ActiveClassifier, ModelInfo};
use crate::error::ClassifierError;
use crate::models::{Classification, Features};

// ---

pub const META_FILE: &str = "model_meta.json";
pub const PREDICTOR_FILE: &str = "fire_risk_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODER_FILE: &str = "label_encoder.json";

/// A loaded model tagged with the reload generation that produced it.
#[derive(Debug)]
pub struct ModelSnapshot {
    pub generation: u64,
    pub model: TrainedModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderStatus {
    NotLoaded,
    Loaded { generation: u64 },
}

#[derive(Debug)]
pub struct ClassifierLoader {
    model_dir: PathBuf,
    active: RwLock<Option<Arc<ModelSnapshot>>>,
}

impl ClassifierLoader {
    // ---
    /// A loader in the `NotLoaded` state. Performs no I/O.
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            active: RwLock::new(None),
        }
    }

    /// Create a loader and attempt the initial load.
    ///
    /// Missing or malformed artifacts are logged and leave the loader
    /// `NotLoaded`; they never fail startup.
    pub fn startup(model_dir: impl Into<PathBuf>) -> Self {
        // ---
        let loader = Self::new(model_dir);
        match loader.reload() {
            Ok(_) => {}
            Err(ClassifierError::MissingArtifact(path)) => {
                warn!(
                    "ML model not found ({}), using rule-based fallback",
                    path.display()
                );
            }
            Err(e) => {
                warn!("ML model failed to load, using rule-based fallback: {e}");
            }
        }
        loader
    }

    /// [`ClassifierLoader::startup`] run on the blocking pool, for callers
    /// already on the async runtime.
    pub async fn startup_blocking(
        model_dir: impl Into<PathBuf>,
    ) -> Result<Self, tokio::task::JoinError> {
        // ---
        let model_dir = model_dir.into();
        tokio::task::spawn_blocking(move || Self::startup(model_dir)).await
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Reload every artifact from the model directory and swap it in.
    ///
    /// On failure the current state, loaded or not, is kept unchanged.
    pub fn reload(&self) -> Result<u64, ClassifierError> {
        // ---
        let model = load_from_dir(&self.model_dir)?;

        let mut active = self.active.write();
        let generation = active.as_ref().map_or(0, |s| s.generation) + 1;
        info!(
            "Model loaded: {} (acc={}, generation {generation})",
            model.meta().model_name,
            model.meta().test_accuracy
        );
        *active = Some(Arc::new(ModelSnapshot { generation, model }));
        Ok(generation)
    }

    pub fn status(&self) -> LoaderStatus {
        match self.active.read().as_ref() {
            Some(snapshot) => LoaderStatus::Loaded {
                generation: snapshot.generation,
            },
            None => LoaderStatus::NotLoaded,
        }
    }

    /// The strategy in effect right now. The read lock is held only for the
    /// `Arc` clone.
    pub fn active(&self) -> ActiveClassifier {
        match self.active.read().as_ref() {
            Some(snapshot) => ActiveClassifier::Trained(Arc::clone(snapshot)),
            None => ActiveClassifier::RuleBased,
        }
    }

    pub fn classify(&self, features: &Features) -> Classification {
        self.active().classify(features)
    }

    pub fn model_info(&self) -> ModelInfo {
        self.active().info()
    }
}

/// Read and validate a full artifact set from `dir`.
///
/// The scaler is read only when the metadata declares the model
/// scale-sensitive.
pub fn load_from_dir(dir: &Path) -> Result<TrainedModel, ClassifierError> {
    // ---
    let meta: ModelMeta = read_artifact(&dir.join(META_FILE))?;
    let predictor: Predictor = read_artifact(&dir.join(PREDICTOR_FILE))?;
    let encoder: LabelEncoder = read_artifact(&dir.join(ENCODER_FILE))?;
    let scaler: Option<StandardScaler> = if meta.use_scaled {
        Some(read_artifact(&dir.join(SCALER_FILE))?)
    } else {
        None
    };

    TrainedModel::new(meta, predictor, scaler, encoder)
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ClassifierError> {
    // ---
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ClassifierError::MissingArtifact(path.to_path_buf()),
        _ => ClassifierError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ClassifierError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
