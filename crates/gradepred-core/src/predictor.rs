//! Prediction service: remote predictor first, local heuristic on failure.
//!
//! `predict` never fails. Every remote failure (transport error, bad status,
//! unusable body, timeout) is downgraded to a fallback prediction, and the
//! reason is carried in the returned outcome.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::error::PredictorError;
use crate::heuristic::fallback_prediction;
use crate::model::{PredictionInput, PredictionRecord, PredictionSource};
use crate::traits::{RemotePrediction, RemotePredictor};

/// Default bound on a single remote prediction call.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of a prediction request, tagged by the path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    /// The remote predictor answered.
    Remote(PredictionRecord),
    /// The local heuristic was used. `reason` is `None` when no remote
    /// predictor was configured.
    Fallback {
        record: PredictionRecord,
        reason: Option<String>,
    },
}

impl PredictionOutcome {
    pub fn record(&self) -> &PredictionRecord {
        match self {
            PredictionOutcome::Remote(record) => record,
            PredictionOutcome::Fallback { record, .. } => record,
        }
    }

    pub fn into_record(self) -> PredictionRecord {
        match self {
            PredictionOutcome::Remote(record) => record,
            PredictionOutcome::Fallback { record, .. } => record,
        }
    }

    pub fn source(&self) -> PredictionSource {
        match self {
            PredictionOutcome::Remote(_) => PredictionSource::Remote,
            PredictionOutcome::Fallback { .. } => PredictionSource::Fallback,
        }
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            PredictionOutcome::Fallback { reason, .. } => reason.as_deref(),
            PredictionOutcome::Remote(_) => None,
        }
    }
}

/// Produces predictions, preferring an optional remote predictor.
#[derive(Clone)]
pub struct PredictionService {
    remote: Option<Arc<dyn RemotePredictor>>,
    timeout: Duration,
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("remote", &self.remote.as_ref().map(|r| r.name().to_string()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for PredictionService {
    fn default() -> Self {
        Self::offline()
    }
}

impl PredictionService {
    /// A service that always uses the local heuristic.
    pub fn offline() -> Self {
        Self {
            remote: None,
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    /// A service backed by `remote`, bounded by the default timeout.
    pub fn new(remote: Arc<dyn RemotePredictor>) -> Self {
        Self {
            remote: Some(remote),
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    /// Set the bound on a single remote call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn remote(&self) -> Option<&Arc<dyn RemotePredictor>> {
        self.remote.as_ref()
    }

    /// Produce a prediction with the given record id.
    #[instrument(skip(self, input))]
    pub async fn predict(&self, input: &PredictionInput, id: u64) -> PredictionOutcome {
        let Some(remote) = &self.remote else {
            tracing::debug!("no remote predictor configured, using fallback");
            return PredictionOutcome::Fallback {
                record: fallback_prediction(input, id, Utc::now()),
                reason: None,
            };
        };

        match self.call_remote(remote.as_ref(), input).await {
            Ok(prediction) => {
                tracing::info!(
                    predictor = remote.name(),
                    predicted_gpa = prediction.predicted_gpa,
                    "remote prediction received"
                );
                PredictionOutcome::Remote(wrap_remote(prediction, input, id, Utc::now()))
            }
            Err(e) => {
                tracing::warn!(
                    predictor = remote.name(),
                    "remote prediction failed, using fallback: {e}"
                );
                PredictionOutcome::Fallback {
                    record: fallback_prediction(input, id, Utc::now()),
                    reason: Some(e.to_string()),
                }
            }
        }
    }

    async fn call_remote(
        &self,
        remote: &dyn RemotePredictor,
        input: &PredictionInput,
    ) -> Result<RemotePrediction, PredictorError> {
        let prediction = tokio::time::timeout(self.timeout, remote.predict(input))
            .await
            .map_err(|_| PredictorError::Timeout(self.timeout))??;
        prediction.validate()?;
        Ok(prediction)
    }
}

/// Wrap a validated remote prediction as a record.
fn wrap_remote(
    prediction: RemotePrediction,
    input: &PredictionInput,
    id: u64,
    timestamp: DateTime<Utc>,
) -> PredictionRecord {
    PredictionRecord {
        id,
        predicted_gpa: prediction.predicted_gpa,
        // validate() guarantees 0..=100
        confidence: u8::try_from(prediction.confidence).unwrap_or(100),
        insights: prediction.insights,
        input_data: input.clone(),
        timestamp,
        is_fallback: false,
    }
}
