//! Mock predictor for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use gradepred_core::error::PredictorError;
use gradepred_core::model::PredictionInput;
use gradepred_core::traits::{
    HealthStatus, ModelMetrics, ModelPerformance, RemotePrediction, RemotePredictor,
    RetrainReport,
};
use gradepred_core::PredictionHistory;

#[derive(Debug, Clone)]
enum Behavior {
    Answer(RemotePrediction),
    Status(u16),
    Unreachable,
}

/// A remote predictor that answers from memory.
///
/// Used to exercise the prediction service and aggregator without a running
/// backend.
pub struct MockPredictor {
    behavior: Behavior,
    /// Number of predict calls made.
    call_count: AtomicU32,
    /// Last input received.
    last_input: Mutex<Option<PredictionInput>>,
}

impl MockPredictor {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            call_count: AtomicU32::new(0),
            last_input: Mutex::new(None),
        }
    }

    /// A mock that always answers with the given prediction.
    pub fn answering(predicted_gpa: f64, confidence: i64, insights: &[&str]) -> Self {
        Self::with_behavior(Behavior::Answer(RemotePrediction {
            predicted_gpa,
            confidence,
            insights: insights.iter().map(|s| s.to_string()).collect(),
        }))
    }

    /// A mock that always fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self::with_behavior(Behavior::Status(status))
    }

    /// A mock that behaves like a backend nobody is listening on.
    pub fn unreachable() -> Self {
        Self::with_behavior(Behavior::Unreachable)
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_input(&self) -> Option<PredictionInput> {
        self.last_input
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The failure every call reports, if any.
    fn check(&self) -> Result<(), PredictorError> {
        match &self.behavior {
            Behavior::Answer(_) => Ok(()),
            Behavior::Status(status) => Err(PredictorError::Api {
                status: *status,
                message: "mock failure".into(),
            }),
            Behavior::Unreachable => Err(PredictorError::Network("connection refused".into())),
        }
    }
}

#[async_trait]
impl RemotePredictor for MockPredictor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn predict(&self, input: &PredictionInput) -> Result<RemotePrediction, PredictorError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_input.lock().unwrap_or_else(|e| e.into_inner()) = Some(input.clone());

        self.check()?;
        let Behavior::Answer(prediction) = &self.behavior else {
            return Err(PredictorError::Unavailable);
        };
        Ok(prediction.clone())
    }

    async fn health(&self) -> Result<HealthStatus, PredictorError> {
        match &self.behavior {
            Behavior::Unreachable => Err(PredictorError::Network("connection refused".into())),
            _ => Ok(HealthStatus {
                status: "healthy".into(),
                backend: Some("mock".into()),
                timestamp: None,
            }),
        }
    }

    async fn model_performance(&self) -> Result<ModelPerformance, PredictorError> {
        self.check()?;
        Ok(ModelPerformance::from([(
            "mock".to_string(),
            ModelMetrics {
                accuracy: Some(100.0),
                mae: Some(0.0),
                r2_score: Some(1.0),
            },
        )]))
    }

    async fn retrain(&self) -> Result<RetrainReport, PredictorError> {
        self.check()?;
        Ok(RetrainReport {
            message: "mock retrained".into(),
            timestamp: None,
        })
    }

    async fn fetch_student_data(
        &self,
    ) -> Result<serde_json::Map<String, serde_json::Value>, PredictorError> {
        self.check()?;
        Ok(serde_json::Map::new())
    }

    async fn fetch_predictions(&self) -> Result<PredictionHistory, PredictorError> {
        self.check()?;
        Ok(PredictionHistory::default())
    }
}
