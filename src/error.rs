//! Error taxonomy for the ingestion, classification, storage and
//! aggregation paths.
//!
//! Validation and classifier problems are absorbed close to where they happen
//! (client error, rule-based fallback). Store and aggregation problems
//! propagate to the HTTP boundary as server errors.

use std::path::PathBuf;

use thiserror::Error;

// ---

/// Malformed or incomplete ingestion payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // ---
    #[error("No JSON body")]
    EmptyBody,

    #[error("Malformed JSON body: {0}")]
    MalformedBody(String),

    #[error("JSON body must be an object")]
    NotAnObject,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field: {field} must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Classifier artifacts are missing, inconsistent, or failed to predict.
#[derive(Debug, Error)]
pub enum ClassifierError {
    // ---
    #[error("model artifact not found: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("inconsistent model artifacts: {0}")]
    Inconsistent(String),

    #[error("prediction failed: {0}")]
    Prediction(String),
}

/// The persistence layer could not record or read readings.
#[derive(Debug, Error)]
pub enum StoreError {
    // ---
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt reading data: {0}")]
    Corrupt(String),
}

/// A statistics query failed; the snapshot must not be reported.
#[derive(Debug, Error)]
#[error("failed to compute {stage}: {source}")]
pub struct AggregationError {
    pub stage: &'static str,
    #[source]
    pub source: StoreError,
}

/// Failure of a full ingest call.
#[derive(Debug, Error)]
pub enum IngestError {
    // ---
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to persist reading: {0}")]
    Store(#[from] StoreError),
}
