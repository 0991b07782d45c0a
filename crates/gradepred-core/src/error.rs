//! Remote predictor error types.
//!
//! Defined in `gradepred-core` so the prediction service can classify
//! failures and log a precise fallback reason without string matching.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when asking a remote predictor for a prediction.
#[derive(Debug, Error)]
pub enum PredictorError {
    /// No remote predictor is configured.
    #[error("no remote predictor configured")]
    Unavailable,

    /// The request did not complete within the allotted time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The service could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered 2xx but the body was not a usable prediction.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl PredictorError {
    /// Returns `true` if the predictor never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PredictorError::Timeout(_) | PredictorError::Network(_) | PredictorError::Unavailable
        )
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PredictorError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(PredictorError::Timeout(Duration::from_secs(5)).is_transport());
        assert!(PredictorError::Network("refused".into()).is_transport());
        let api = PredictorError::Api {
            status: 503,
            message: "down".into(),
        };
        assert!(!api.is_transport());
        assert_eq!(api.status(), Some(503));
        assert_eq!(PredictorError::Unavailable.status(), None);
    }

    #[test]
    fn timeout_message_includes_duration() {
        let err = PredictorError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "request timed out after 250ms");
    }
}
