//! gradepred-remote — Remote predictor integrations.
//!
//! Implements the `RemotePredictor` trait over HTTP, provides a mock for
//! tests, and builds a `PredictionService` from the configuration file.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{load_config, prediction_service, GradepredConfig, RemoteConfig};
pub use http::HttpPredictor;
pub use mock::MockPredictor;
