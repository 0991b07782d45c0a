//! Collaborator traits: the remote predictor and the persistent store.
//!
//! These are implemented by the `gradepred-remote` and `gradepred-store`
//! crates respectively.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PredictorError;
use crate::grading::{MAX_GPA, MIN_GPA};
use crate::history::PredictionHistory;
use crate::model::PredictionInput;

// ---------------------------------------------------------------------------
// Remote predictor trait
// ---------------------------------------------------------------------------

/// A network service returning authoritative predictions.
#[async_trait]
pub trait RemotePredictor: Send + Sync {
    /// Human-readable predictor name (e.g. "http").
    fn name(&self) -> &str;

    /// Ask the service for a prediction.
    async fn predict(&self, input: &PredictionInput) -> Result<RemotePrediction, PredictorError>;

    /// Check that the service is up.
    async fn health(&self) -> Result<HealthStatus, PredictorError>;

    /// Quality metrics of the service's models, keyed by model name.
    async fn model_performance(&self) -> Result<ModelPerformance, PredictorError>;

    /// Ask the service to retrain its models.
    async fn retrain(&self) -> Result<RetrainReport, PredictorError>;

    /// The service's copy of the student document, as a JSON object.
    ///
    /// Returned untyped so callers can overlay only the fields it carries.
    async fn fetch_student_data(
        &self,
    ) -> Result<serde_json::Map<String, serde_json::Value>, PredictorError>;

    /// The service's copy of the prediction history.
    async fn fetch_predictions(&self) -> Result<PredictionHistory, PredictorError>;
}

/// Prediction body returned by a remote predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePrediction {
    pub predicted_gpa: f64,
    pub confidence: i64,
    #[serde(default)]
    pub insights: Vec<String>,
}

impl RemotePrediction {
    /// Reject values a prediction record cannot hold.
    pub fn validate(&self) -> Result<(), PredictorError> {
        if !self.predicted_gpa.is_finite()
            || !(MIN_GPA..=MAX_GPA).contains(&self.predicted_gpa)
        {
            return Err(PredictorError::MalformedResponse(format!(
                "predicted_gpa {} outside [{MIN_GPA}, {MAX_GPA}]",
                self.predicted_gpa
            )));
        }
        if !(0..=100).contains(&self.confidence) {
            return Err(PredictorError::MalformedResponse(format!(
                "confidence {} outside [0, 100]",
                self.confidence
            )));
        }
        Ok(())
    }
}

/// Health report returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Metrics reported for one model by `GET /models/performance`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Accuracy percentage.
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Mean absolute error in GPA points.
    #[serde(default)]
    pub mae: Option<f64>,
    #[serde(default)]
    pub r2_score: Option<f64>,
}

pub type ModelPerformance = BTreeMap<String, ModelMetrics>;

/// Body returned by `POST /models/retrain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainReport {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

// ---------------------------------------------------------------------------
// Persistent store trait
// ---------------------------------------------------------------------------

/// Storage key for the serialized `StudentData`.
pub const STUDENT_DATA_KEY: &str = "studentData";
/// Storage key for the serialized `PredictionHistory`.
pub const PREDICTION_HISTORY_KEY: &str = "predictionHistory";

/// Durable key/value storage for JSON documents.
///
/// The aggregator never calls this; callers load state, run the pure
/// operations, and save the result.
pub trait PersistentStore: Send + Sync {
    /// Load the document stored under `key`, or `None` if there is none.
    fn load(&self, key: &str) -> anyhow::Result<Option<serde_json::Value>>;

    /// Store `value` under `key`, replacing any previous document.
    fn save(&self, key: &str, value: &serde_json::Value) -> anyhow::Result<()>;
}
