//! HTTP remote predictor.
//!
//! Endpoints, relative to the configured base URL: `POST /predict`,
//! `GET /health`, `GET /models/performance`, `POST /models/retrain`,
//! `GET /student-data` and `GET /predictions`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::instrument;

use gradepred_core::error::PredictorError;
use gradepred_core::model::PredictionInput;
use gradepred_core::traits::{
    HealthStatus, ModelPerformance, RemotePrediction, RemotePredictor, RetrainReport,
};
use gradepred_core::PredictionHistory;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;
/// Extra health attempts after a transport failure.
pub const DEFAULT_HEALTH_RETRIES: u32 = 3;
/// Delay before the first health retry; retry `n` waits `n` times this.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;

/// Prediction backend reached over HTTP.
pub struct HttpPredictor {
    base_url: String,
    timeout: Duration,
    health_timeout: Duration,
    health_retries: u32,
    retry_delay: Duration,
    client: reqwest::Client,
}

impl HttpPredictor {
    /// Create a predictor for `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeouts(
            base_url,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
        )
    }

    pub fn with_timeouts(
        base_url: &str,
        timeout: Duration,
        health_timeout: Duration,
    ) -> Result<Self> {
        anyhow::ensure!(!base_url.trim().is_empty(), "remote base_url is empty");

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout,
            health_timeout,
            health_retries: DEFAULT_HEALTH_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            client,
        })
    }

    /// Set how often a health check that could not reach the backend is
    /// repeated, and the base delay between attempts.
    pub fn with_health_retries(mut self, retries: u32, delay: Duration) -> Self {
        self.health_retries = retries;
        self.retry_delay = delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn transport_error(&self, e: reqwest::Error, timeout: Duration) -> PredictorError {
        if e.is_timeout() {
            PredictorError::Timeout(timeout)
        } else if e.is_connect() {
            PredictorError::Network(format!(
                "prediction service not reachable at {}",
                self.base_url
            ))
        } else {
            PredictorError::Network(e.to_string())
        }
    }

    /// Send `request` and decode a JSON body from a 2xx answer.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
        what: &str,
    ) -> Result<T, PredictorError> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                format!("backend responded with status {status}")
            } else {
                body
            };
            return Err(PredictorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(|e| {
            PredictorError::MalformedResponse(format!("failed to parse {what}: {e}"))
        })
    }
}

#[async_trait]
impl RemotePredictor for HttpPredictor {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, input), fields(base_url = %self.base_url))]
    async fn predict(&self, input: &PredictionInput) -> Result<RemotePrediction, PredictorError> {
        let request = self.client.post(self.url("predict")).json(input);
        self.fetch(request, self.timeout, "response").await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn health(&self) -> Result<HealthStatus, PredictorError> {
        let mut retry = 0;
        loop {
            let request = self.client.get(self.url("health"));
            match self.fetch(request, self.health_timeout, "health response").await {
                Err(e) if e.is_transport() && retry < self.health_retries => {
                    retry += 1;
                    let delay = self.retry_delay * retry;
                    tracing::warn!(error = %e, retry, ?delay, "health check failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn model_performance(&self) -> Result<ModelPerformance, PredictorError> {
        let request = self.client.get(self.url("models/performance"));
        self.fetch(request, self.timeout, "model performance").await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn retrain(&self) -> Result<RetrainReport, PredictorError> {
        let request = self.client.post(self.url("models/retrain"));
        self.fetch(request, self.timeout, "retrain response").await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_student_data(
        &self,
    ) -> Result<serde_json::Map<String, serde_json::Value>, PredictorError> {
        let request = self.client.get(self.url("student-data"));
        self.fetch(request, self.timeout, "student data").await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_predictions(&self) -> Result<PredictionHistory, PredictorError> {
        let request = self.client.get(self.url("predictions"));
        self.fetch(request, self.timeout, "prediction history").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gradepred_core::{
        AcademicRecordAggregator, GradeRecord, PredictionOutcome, PredictionService, StudentData,
    };
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn input() -> PredictionInput {
        PredictionInput {
            current_gpa: Some(3.0.into()),
            study_hours: Some(25.0.into()),
            attendance: Some(95.0.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn successful_prediction() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/predict"))
            .and(body_partial_json(serde_json::json!({"current_gpa": 3.0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "predicted_gpa": 3.45,
                "confidence": 87,
                "insights": ["Based on your current GPA of 3.0", "Good study habits!"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let predictor = HttpPredictor::new(&format!("{}/api/", server.uri())).unwrap();
        let prediction = predictor.predict(&input()).await.unwrap();
        assert_eq!(prediction.predicted_gpa, 3.45);
        assert_eq!(prediction.confidence, 87);
        assert_eq!(prediction.insights.len(), 2);
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let predictor = HttpPredictor::new(&server.uri()).unwrap();
        let err = predictor.predict(&input()).await.unwrap_err();
        assert!(matches!(err, PredictorError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn missing_fields_are_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "nope"})),
            )
            .mount(&server)
            .await;

        let predictor = HttpPredictor::new(&server.uri()).unwrap();
        let err = predictor.predict(&input()).await.unwrap_err();
        assert!(matches!(err, PredictorError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(serde_json::json!({"predicted_gpa": 3.0, "confidence": 80})),
            )
            .mount(&server)
            .await;

        let predictor = HttpPredictor::with_timeouts(
            &server.uri(),
            Duration::from_millis(100),
            Duration::from_millis(100),
        )
        .unwrap();
        let err = predictor.predict(&input()).await.unwrap_err();
        assert!(err.is_transport(), "expected transport error, got {err}");
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        let predictor = HttpPredictor::new("http://127.0.0.1:1").unwrap();
        let err = predictor.predict(&input()).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn health_check() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "healthy",
                "timestamp": "2026-10-18T09:00:00",
                "backend": "Flask",
                "ml_models": "simple_algorithm"
            })))
            .mount(&server)
            .await;

        let predictor = HttpPredictor::new(&server.uri()).unwrap();
        let health = predictor.health().await.unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.backend.as_deref(), Some("Flask"));
    }

    #[tokio::test]
    async fn health_check_reports_bad_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let predictor = HttpPredictor::new(&server.uri()).unwrap();
        let err = predictor.health().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn service_falls_back_on_http_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let predictor = HttpPredictor::new(&server.uri()).unwrap();
        let service = PredictionService::new(Arc::new(predictor));
        let outcome = service.predict(&input(), 1).await;

        let PredictionOutcome::Fallback { record, reason } = outcome else {
            panic!("expected fallback");
        };
        assert!(record.is_fallback);
        assert_eq!(record.confidence, 75);
        assert!(reason.unwrap().contains("502"));
    }

    #[tokio::test]
    async fn service_falls_back_on_out_of_range_answer() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "predicted_gpa": 5.2,
                "confidence": 90
            })))
            .mount(&server)
            .await;

        let predictor = HttpPredictor::new(&server.uri()).unwrap();
        let service = PredictionService::new(Arc::new(predictor));
        let outcome = service.predict(&input(), 1).await;
        assert!(outcome.record().is_fallback);
        assert!((outcome.record().predicted_gpa - 3.35).abs() < 1e-9);
    }

    #[tokio::test]
    async fn health_retries_after_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(serde_json::json!({"status": "healthy"})),
            )
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "healthy"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let predictor = HttpPredictor::with_timeouts(
            &server.uri(),
            Duration::from_secs(5),
            Duration::from_millis(100),
        )
        .unwrap()
        .with_health_retries(3, Duration::from_millis(10));
        let health = predictor.health().await.unwrap();
        assert_eq!(health.status, "healthy");
    }

    #[tokio::test]
    async fn health_gives_up_after_retries() {
        let predictor = HttpPredictor::new("http://127.0.0.1:1")
            .unwrap()
            .with_health_retries(2, Duration::from_millis(10));
        let err = predictor.health().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn bad_status_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let predictor = HttpPredictor::new(&server.uri())
            .unwrap()
            .with_health_retries(3, Duration::from_millis(10));
        assert_eq!(predictor.health().await.unwrap_err().status(), Some(500));
    }

    #[tokio::test]
    async fn model_performance_and_retrain() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/models/performance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "simple_algorithm": {"accuracy": 85, "mae": 0.3, "r2_score": 0.75}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/models/retrain"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Models retrained successfully",
                "timestamp": "2026-10-18T09:00:00"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let predictor = HttpPredictor::new(&format!("{}/api", server.uri())).unwrap();
        let report = predictor.retrain().await.unwrap();
        assert_eq!(report.message, "Models retrained successfully");

        let performance = predictor.model_performance().await.unwrap();
        let metrics = &performance["simple_algorithm"];
        assert_eq!(metrics.accuracy, Some(85.0));
        assert_eq!(metrics.mae, Some(0.3));
    }

    #[tokio::test]
    async fn retrain_failure_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/retrain"))
            .respond_with(ResponseTemplate::new(500).set_body_string("training crashed"))
            .mount(&server)
            .await;

        let predictor = HttpPredictor::new(&server.uri()).unwrap();
        let err = predictor.retrain().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("training crashed"));
    }

    #[tokio::test]
    async fn sync_merges_student_data_and_replaces_history() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/student-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "currentGpa": 3.2,
                "totalCredits": 45,
                "grades": [{
                    "id": 1729260000000.5,
                    "courseName": "Statistics",
                    "grade": "B+",
                    "credits": 3,
                    "timestamp": "2024-10-18T14:00:00Z"
                }],
                "academicHistory": []
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/predictions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": 1729260000999u64,
                "predicted_gpa": 3.4,
                "confidence": 82,
                "insights": ["steady"],
                "inputData": {"current_gpa": "3.2"},
                "timestamp": "2024-10-18T14:05:00Z",
                "isFallback": false
            }])))
            .mount(&server)
            .await;

        let mut agg = AcademicRecordAggregator::new(
            StudentData {
                grades: vec![GradeRecord::new("Calculus", "A", 4)],
                ..Default::default()
            },
            Default::default(),
        );
        let last_updated = agg.student().last_updated;
        let predictor = HttpPredictor::new(&server.uri()).unwrap();

        let report = agg.sync_from(&predictor).await.unwrap();
        assert!(report.student_data);
        assert_eq!(report.predictions, Some(1));

        let student = agg.student();
        assert_eq!(student.grades.len(), 1);
        assert_eq!(student.grades[0].id, "1729260000000.5");
        // Derived totals come from the received grades, not the payload.
        assert_eq!(student.total_credits, 3);
        assert_eq!(student.current_gpa, 3.3);
        assert_eq!(student.last_updated, last_updated);
        assert_eq!(agg.history().records()[0].id, 1729260000999);
    }

    #[tokio::test]
    async fn sync_skips_parts_the_backend_does_not_serve() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/student-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "currentCwa": 99.0
            })))
            .mount(&server)
            .await;

        let mut agg = AcademicRecordAggregator::default();
        agg.add_grade(GradeRecord::new("Calculus", "B", 3));
        agg.request_prediction(&PredictionService::offline(), Default::default()).await;

        let predictor = HttpPredictor::new(&server.uri()).unwrap();
        let report = agg.sync_from(&predictor).await.unwrap();

        assert!(report.student_data);
        assert_eq!(report.predictions, None);
        assert_eq!(agg.student().grades.len(), 1);
        assert_eq!(agg.student().current_cwa, 75.0);
        assert_eq!(agg.history().len(), 1);
    }

    #[tokio::test]
    async fn sync_rejects_unusable_student_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/student-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "grades": "none"
            })))
            .mount(&server)
            .await;

        let mut agg = AcademicRecordAggregator::default();
        agg.add_grade(GradeRecord::new("Calculus", "B", 3));
        let before = agg.student().clone();

        let predictor = HttpPredictor::new(&server.uri()).unwrap();
        let err = agg.sync_from(&predictor).await.unwrap_err();
        assert!(matches!(err, PredictorError::MalformedResponse(_)));
        assert_eq!(agg.student(), &before);
    }

    #[tokio::test]
    async fn sync_fails_when_backend_unreachable() {
        let mut agg = AcademicRecordAggregator::default();
        agg.add_grade(GradeRecord::new("Calculus", "B", 3));
        let before = agg.student().clone();

        let predictor = HttpPredictor::new("http://127.0.0.1:1").unwrap();
        let err = agg.sync_from(&predictor).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(agg.student(), &before);
    }
}
